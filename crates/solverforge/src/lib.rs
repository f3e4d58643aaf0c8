//! SolverForge - deep solution cloning for metaheuristic search.
//!
//! Describe the domain once, then snapshot working solutions as often as
//! the search needs.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use solverforge::prelude::*;
//!
//! let model = Arc::new(
//!     DomainModel::new()
//!         .with_class(ClassDef::new("Queen").with_field(FieldDef::new("row", TypeRef::class("Integer"))))?
//!         .with_class(ClassDef::new("Board").with_field(FieldDef::deep("queens", TypeRef::list(TypeRef::class("Queen")))))?,
//! );
//! let config = SolverConfig::new()
//!     .with_solution_class("Board")
//!     .with_entity_class("Queen");
//! let cloner = SolutionCloner::from_config(&config, model.clone())?;
//!
//! let queen = model.new_instance("Queen")?;
//! model.write_field(&queen, "row", Value::Int(3))?;
//! let board = model.new_instance("Board")?;
//! model.write_field(
//!     &board,
//!     "queens",
//!     Value::Collection(DomainCollection::from_values(CollectionKind::List, [Value::Object(queen)])),
//! )?;
//!
//! let best = cloner.clone_solution(&board)?;
//! assert!(!Arc::ptr_eq(&best, &board));
//! # Ok::<(), SolverForgeError>(())
//! ```

pub mod logging;

// Domain model and descriptors
pub use solverforge_core::domain;
pub use solverforge_core::{Result, SolverForgeError};

// Configuration
pub use solverforge_config::{ConfigError, EnvironmentMode, SolutionClonerConfig, SolverConfig};

// Cloner
pub use solverforge_cloner::{ClonePlan, SolutionCloner};

pub mod prelude {
    pub use super::domain::{
        ClassDef, CollectionKind, DomainArray, DomainCollection, DomainMap, DomainModel,
        DomainRegistry, FieldDef, MapKind, MemberCategory, MemberDescriptor, ObjectRef,
        SolutionDescriptor, TypeRef, Value,
    };
    pub use super::{EnvironmentMode, SolutionCloner, SolverConfig, SolverForgeError};
}
