//! Collection, map and array cloners.

use solverforge_core::domain::{
    ArrayRef, CollectionKind, CollectionRef, DomainArray, DomainCollection, DomainMap, MapKind,
    MapRef, TypeRef, Value,
};
use solverforge_core::{Result, SolverForgeError};

use super::{GraphCloner, Task};

/// Category of the clone of a collection of `kind`.
fn cloned_collection_kind(kind: &CollectionKind) -> CollectionKind {
    match kind {
        CollectionKind::SortedSet(comparator) => CollectionKind::SortedSet(comparator.clone()),
        CollectionKind::LinkedSet | CollectionKind::HashSet => CollectionKind::LinkedSet,
        CollectionKind::List | CollectionKind::Deque => CollectionKind::List,
    }
}

/// Category of the clone of a map of `kind`: the same kind when it can be
/// constructed, otherwise a concurrent or linked map.
fn cloned_map_kind(kind: &MapKind) -> MapKind {
    if kind.is_constructible() {
        kind.clone()
    } else if kind.is_concurrent() {
        MapKind::Concurrent
    } else {
        MapKind::Linked
    }
}

impl GraphCloner<'_> {
    pub(super) fn clone_collection(
        &mut self,
        original: &CollectionRef,
        value: &Value,
        declared: &TypeRef,
    ) -> Result<Value> {
        let clone = DomainCollection::with_capacity(
            cloned_collection_kind(original.kind()),
            original.len(),
        );
        let cloned = Value::Collection(clone.clone());
        self.session.register(value, &cloned)?;
        self.stack.push(Task::Collection {
            original: original.clone(),
            clone,
            element: declared.element_type().cloned().unwrap_or(TypeRef::Any),
        });
        Ok(cloned)
    }

    pub(super) fn clone_map(
        &mut self,
        original: &MapRef,
        value: &Value,
        declared: &TypeRef,
    ) -> Result<Value> {
        let clone = DomainMap::with_capacity(cloned_map_kind(original.kind()), original.len());
        let cloned = Value::Map(clone.clone());
        self.session.register(value, &cloned)?;
        let (key, value_type) = declared
            .map_types()
            .map(|(k, v)| (k.clone(), v.clone()))
            .unwrap_or((TypeRef::Any, TypeRef::Any));
        self.stack.push(Task::Map {
            original: original.clone(),
            clone,
            clone_keys: self.plan.overlaps_entity(&key),
            key,
            value: value_type,
        });
        Ok(cloned)
    }

    pub(super) fn clone_array(&mut self, original: &ArrayRef, value: &Value) -> Result<Value> {
        let clone = DomainArray::new(original.component().clone(), original.len());
        let cloned = Value::Array(clone.clone());
        self.session.register(value, &cloned)?;
        self.stack.push(Task::Array {
            original: original.clone(),
            clone,
        });
        Ok(cloned)
    }

    /// Elements are appended in source order, which already satisfies the
    /// clone's ordering and uniqueness.
    pub(super) fn populate_collection(
        &mut self,
        original: &CollectionRef,
        clone: &CollectionRef,
        element: &TypeRef,
    ) -> Result<()> {
        let elements = original
            .snapshot()
            .iter()
            .map(|item| self.clone_value(item, element))
            .collect::<Result<Vec<_>>>()?;
        clone.extend_in_order(elements);
        Ok(())
    }

    /// Keys are cloned only when they may be planning entities.
    pub(super) fn populate_map(
        &mut self,
        original: &MapRef,
        clone: &MapRef,
        key: &TypeRef,
        value: &TypeRef,
        clone_keys: bool,
    ) -> Result<()> {
        let mut entries = Vec::with_capacity(original.len());
        for (k, v) in original.entries() {
            let k = if clone_keys {
                self.clone_value(&k, key)?
            } else {
                k
            };
            entries.push((k, self.clone_value(&v, value)?));
        }
        clone.extend_in_order(entries);
        Ok(())
    }

    pub(super) fn populate_array(&mut self, original: &ArrayRef, clone: &ArrayRef) -> Result<()> {
        let component = original.component();
        for (index, item) in original.snapshot().iter().enumerate() {
            let cloned = self.clone_value(item, component)?;
            if !clone.set(index, cloned) {
                return Err(SolverForgeError::Internal(format!(
                    "Array clone is shorter than its original ({} cells).",
                    original.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;
    use std::sync::Arc;

    #[test]
    fn test_collection_kinds() {
        assert!(matches!(
            cloned_collection_kind(&CollectionKind::HashSet),
            CollectionKind::LinkedSet
        ));
        assert!(matches!(
            cloned_collection_kind(&CollectionKind::Deque),
            CollectionKind::List
        ));

        let comparator: solverforge_core::domain::SharedComparator =
            Arc::new(|_: &Value, _: &Value| Ordering::Equal);
        match cloned_collection_kind(&CollectionKind::SortedSet(comparator.clone())) {
            CollectionKind::SortedSet(c) => assert!(Arc::ptr_eq(&c, &comparator)),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_map_kinds() {
        assert!(matches!(
            cloned_map_kind(&MapKind::ReadOnly { concurrent: true }),
            MapKind::Concurrent
        ));
        assert!(matches!(
            cloned_map_kind(&MapKind::ReadOnly { concurrent: false }),
            MapKind::Linked
        ));
        assert!(matches!(cloned_map_kind(&MapKind::Hash), MapKind::Hash));
        assert!(matches!(
            cloned_map_kind(&MapKind::Concurrent),
            MapKind::Concurrent
        ));

        let comparator: solverforge_core::domain::SharedComparator =
            Arc::new(|_: &Value, _: &Value| Ordering::Equal);
        match cloned_map_kind(&MapKind::Sorted(comparator.clone())) {
            MapKind::Sorted(c) => assert!(Arc::ptr_eq(&c, &comparator)),
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
