//! Work-stack driven graph cloner.
//!
//! Every composite clone is allocated and registered in the session as soon
//! as it is first reached, and a [`Task`] to populate it is pushed onto an
//! explicit stack. Handles to unpopulated clones can be stored immediately,
//! so cycles and shared references resolve through the memo and the native
//! call depth stays constant however deep the graph is.

mod container;

use solverforge_core::domain::{
    ArrayRef, CollectionRef, DomainObject, MapRef, ObjectRef, TypeRef, Value,
};
use solverforge_core::{Result, SolverForgeError};

use crate::plan::{ClonePlan, RootMatch, Route};
use crate::session::CloneSession;

/// A clone that has been registered but not yet populated.
enum Task {
    Object {
        original: ObjectRef,
        clone: ObjectRef,
    },
    Collection {
        original: CollectionRef,
        clone: CollectionRef,
        element: TypeRef,
    },
    Map {
        original: MapRef,
        clone: MapRef,
        key: TypeRef,
        value: TypeRef,
        clone_keys: bool,
    },
    Array {
        original: ArrayRef,
        clone: ArrayRef,
    },
}

pub(crate) struct GraphCloner<'a> {
    plan: &'a ClonePlan,
    session: CloneSession,
    stack: Vec<Task>,
}

impl<'a> GraphCloner<'a> {
    pub(crate) fn new(plan: &'a ClonePlan) -> Self {
        Self {
            plan,
            session: CloneSession::new(),
            stack: Vec::new(),
        }
    }

    /// Clones a solution root and everything it must own.
    pub(crate) fn clone_root(&mut self, root: &ObjectRef) -> Result<ObjectRef> {
        let clone = match self.plan.root_match(root.class_name()) {
            RootMatch::Known => self.instantiate(root)?,
            RootMatch::NotRoot | RootMatch::Unknown => {
                return Err(self.plan.unknown_root(root.class_name()))
            }
        };
        self.drain()?;
        Ok(clone)
    }

    /// Clones an arbitrary value as if it were stored in a deep member
    /// declared as `declared`.
    pub(crate) fn clone_detached(&mut self, value: &Value, declared: &TypeRef) -> Result<Value> {
        let clone = self.clone_value(value, declared)?;
        self.drain()?;
        Ok(clone)
    }

    pub(crate) fn into_session(self) -> CloneSession {
        self.session
    }

    fn drain(&mut self) -> Result<()> {
        while let Some(task) = self.stack.pop() {
            match task {
                Task::Object { original, clone } => self.populate_object(&original, &clone)?,
                Task::Collection {
                    original,
                    clone,
                    element,
                } => self.populate_collection(&original, &clone, &element)?,
                Task::Map {
                    original,
                    clone,
                    key,
                    value,
                    clone_keys,
                } => self.populate_map(&original, &clone, &key, &value, clone_keys)?,
                Task::Array { original, clone } => self.populate_array(&original, &clone)?,
            }
        }
        Ok(())
    }

    /// Returns the clone of `value` for a member declared as `declared`.
    ///
    /// Leaves and objects that are neither solutions nor planning entities
    /// within the scope of `declared` are returned as-is.
    fn clone_value(&mut self, value: &Value, declared: &TypeRef) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if let Some(clone) = self.session.lookup(value) {
            return Ok(clone);
        }
        match value {
            Value::Object(object) => match self.plan.root_match(object.class_name()) {
                RootMatch::Known => self.instantiate(object).map(Value::Object),
                RootMatch::Unknown => Err(self.plan.unknown_root(object.class_name())),
                RootMatch::NotRoot => self.clone_entity_or_share(object, value, declared),
            },
            Value::Array(array) => self.clone_array(array, value),
            Value::Collection(collection) => self.clone_collection(collection, value, declared),
            Value::Map(map) => self.clone_map(map, value, declared),
            _ => Ok(value.clone()),
        }
    }

    /// Shallow members whose declared type overlaps an entity class: only
    /// planning entities are cloned.
    fn clone_entity_member(&mut self, value: &Value, declared: &TypeRef) -> Result<Value> {
        if let Some(clone) = self.session.lookup(value) {
            return Ok(clone);
        }
        match value {
            Value::Object(object) => self.clone_entity_or_share(object, value, declared),
            _ => Ok(value.clone()),
        }
    }

    fn clone_entity_or_share(
        &mut self,
        object: &ObjectRef,
        value: &Value,
        declared: &TypeRef,
    ) -> Result<Value> {
        match self.plan.entity_match(object.class_name(), declared) {
            Some(entity) if entity.as_ref() == object.class_name() => {
                self.instantiate(object).map(Value::Object)
            }
            Some(_) => Err(self.plan.unknown_entity(object.class_name())),
            None => Ok(value.clone()),
        }
    }

    /// Allocates and registers an empty clone of a registered class.
    fn instantiate(&mut self, original: &ObjectRef) -> Result<ObjectRef> {
        let plan = self.plan.class_plan(original.class_name()).ok_or_else(|| {
            SolverForgeError::Internal(format!(
                "No clone plan for the registered class ({}).",
                original.class_name()
            ))
        })?;
        let clone = DomainObject::new(plan.class.clone(), plan.slot_count);
        self.session.register(
            &Value::Object(original.clone()),
            &Value::Object(clone.clone()),
        )?;
        self.stack.push(Task::Object {
            original: original.clone(),
            clone: clone.clone(),
        });
        Ok(clone)
    }

    fn populate_object(&mut self, original: &ObjectRef, clone: &ObjectRef) -> Result<()> {
        let plan: &'a ClonePlan = self.plan;
        let Some(class_plan) = plan.class_plan(original.class_name()) else {
            return Err(SolverForgeError::Internal(format!(
                "No clone plan for the registered class ({}).",
                original.class_name()
            )));
        };
        for member in &class_plan.members {
            let value = member.read(original);
            let cloned = match member.route() {
                Route::Copy => value,
                Route::Entity => self.clone_entity_member(&value, member.declared())?,
                Route::Deep => self.clone_value(&value, member.declared())?,
            };
            if !member.write(clone, cloned) {
                return Err(SolverForgeError::Internal(format!(
                    "Failed to write the member ({}) on a clone of ({}).",
                    member.name(),
                    class_plan.class
                )));
            }
        }
        Ok(())
    }
}
