//! Shared test fixtures for SolverForge crates.
//!
//! This crate provides domain models and graph builders for testing.
//! Every builder returns a `Result` so fixtures stay free of panics.
//!
//! - [`testdata`] - Solution, entity and value classes with extended subclasses
//! - [`chained`] - Chained entities referencing each other through a shared supertype
//! - [`collections`] - Maps, sorted sets and arrays of entities
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! solverforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use solverforge_test::testdata::{testdata_model, testdata_descriptor, generate_solution};
//! ```

pub mod chained;
pub mod collections;
pub mod testdata;

// Re-export commonly used builders at crate root for convenience
pub use chained::{build_chain, chained_descriptor, chained_model};
pub use collections::{build_collections_solution, collections_descriptor, collections_model};
pub use testdata::{generate_solution, testdata_descriptor, testdata_model};

use solverforge_core::domain::{CollectionKind, DomainCollection, DomainModel, ObjectRef, Value};
use solverforge_core::Result;

/// Writes several fields by name.
pub fn set_fields(
    model: &DomainModel,
    object: &ObjectRef,
    fields: impl IntoIterator<Item = (&'static str, Value)>,
) -> Result<()> {
    for (name, value) in fields {
        model.write_field(object, name, value)?;
    }
    Ok(())
}

/// Wraps objects in a new list.
pub fn list_of(objects: &[ObjectRef]) -> Value {
    Value::Collection(DomainCollection::from_values(
        CollectionKind::List,
        objects.iter().cloned().map(Value::Object),
    ))
}
