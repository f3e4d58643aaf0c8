//! Per-invocation identity memo.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use solverforge_core::domain::{Identity, Value};
use solverforge_core::{Result, SolverForgeError};

/// Maps every original composite reached during one clone to its clone.
///
/// Originals are held alongside their clones so their addresses cannot be
/// reused by new allocations while the session is alive.
#[derive(Default)]
pub(crate) struct CloneSession {
    memo: HashMap<Identity, (Value, Value)>,
    clones: HashSet<Identity>,
    objects_cloned: u64,
    containers_cloned: u64,
    _not_sync: PhantomData<Cell<()>>,
}

impl CloneSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the clone registered for `original`, if any.
    pub(crate) fn lookup(&self, original: &Value) -> Option<Value> {
        let identity = original.identity()?;
        self.memo.get(&identity).map(|(_, clone)| clone.clone())
    }

    /// Records `clone` as the clone of `original`.
    ///
    /// Must be called exactly once per original, before the clone's members
    /// are populated.
    pub(crate) fn register(&mut self, original: &Value, clone: &Value) -> Result<()> {
        let identity = original.identity().ok_or_else(|| {
            SolverForgeError::Internal(format!(
                "Leaf value ({:?}) cannot be registered as a clone original.",
                original
            ))
        })?;
        if self.memo.contains_key(&identity) {
            return Err(SolverForgeError::Internal(format!(
                "The original ({:?}) was registered twice in one clone session.",
                original
            )));
        }
        match clone {
            Value::Object(_) => self.objects_cloned += 1,
            _ => self.containers_cloned += 1,
        }
        self.clones.extend(clone.identity());
        self.memo.insert(identity, (original.clone(), clone.clone()));
        Ok(())
    }

    /// Returns true if `value` is an original that has a clone in this session.
    pub(crate) fn is_cloned_original(&self, value: &Value) -> bool {
        value
            .identity()
            .is_some_and(|identity| self.memo.contains_key(&identity))
    }

    /// Returns true if `value` was created by this session.
    pub(crate) fn is_clone(&self, value: &Value) -> bool {
        value
            .identity()
            .is_some_and(|identity| self.clones.contains(&identity))
    }

    pub(crate) fn objects_cloned(&self) -> u64 {
        self.objects_cloned
    }

    pub(crate) fn containers_cloned(&self) -> u64 {
        self.containers_cloned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solverforge_core::domain::{CollectionKind, DomainCollection, DomainObject};

    #[test]
    fn test_register_then_lookup() {
        let mut session = CloneSession::new();
        let original = Value::Object(DomainObject::new("A".into(), 0));
        let clone = Value::Object(DomainObject::new("A".into(), 0));

        assert!(session.lookup(&original).is_none());
        session.register(&original, &clone).unwrap();
        assert!(session.lookup(&original).unwrap().ptr_eq(&clone));
        assert!(session.is_cloned_original(&original));
        assert!(!session.is_cloned_original(&clone));
        assert!(session.is_clone(&clone));
        assert!(!session.is_clone(&original));
        assert_eq!(session.objects_cloned(), 1);
        assert_eq!(session.containers_cloned(), 0);
    }

    #[test]
    fn test_double_registration_is_internal_error() {
        let mut session = CloneSession::new();
        let original = Value::Collection(DomainCollection::new(CollectionKind::List));
        let clone = Value::Collection(DomainCollection::new(CollectionKind::List));
        session.register(&original, &clone).unwrap();

        let err = session.register(&original, &clone).unwrap_err();
        assert!(matches!(err, SolverForgeError::Internal(_)));
        assert_eq!(session.containers_cloned(), 1);
    }

    #[test]
    fn test_leaf_values_are_never_memoized() {
        let mut session = CloneSession::new();
        let leaf = Value::str("fact");
        assert!(session.lookup(&leaf).is_none());
        assert!(session.register(&leaf, &leaf).is_err());
    }
}
