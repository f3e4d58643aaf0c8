//! Tests for the solution cloner.

mod concurrency_tests;
mod config_tests;
mod plan_tests;

use std::sync::Arc;

use solverforge_core::domain::{DomainModel, ObjectRef, SolutionDescriptor, Value};

use crate::SolutionCloner;

pub(super) fn cloner_for(descriptor: SolutionDescriptor) -> SolutionCloner {
    SolutionCloner::new(Arc::new(descriptor)).unwrap()
}

pub(super) fn field(model: &DomainModel, object: &ObjectRef, name: &str) -> Value {
    model.read_field(object, name).unwrap()
}

pub(super) fn object_field(model: &DomainModel, object: &ObjectRef, name: &str) -> ObjectRef {
    field(model, object, name).as_object().unwrap().clone()
}

pub(super) fn objects(value: &Value) -> Vec<ObjectRef> {
    value
        .as_collection()
        .unwrap()
        .snapshot()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}
