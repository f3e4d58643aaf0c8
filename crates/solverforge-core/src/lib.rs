//! SolverForge Core - Core types for solution cloning
//!
//! This crate provides the fundamental abstractions shared by the cloner:
//! - A runtime class catalog for domain models
//! - Values and shared object, collection, map and array handles
//! - Descriptor types for runtime metadata
//! - The error type

pub mod domain;
pub mod error;

pub use domain::{DomainModel, DomainRegistry, SolutionDescriptor, TypeRef, Value};
pub use error::{Result, SolverForgeError};
