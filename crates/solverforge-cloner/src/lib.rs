//! Deep solution cloner for SolverForge.
//!
//! Metaheuristic search keeps a working solution and snapshots the best one
//! found so far. [`SolutionCloner`] produces those snapshots: a new graph
//! that owns its own solution object, planning entities and the containers
//! holding them, while problem facts and immutable values stay shared.
//!
//! The registered domain (see
//! [`SolutionDescriptor`](solverforge_core::domain::SolutionDescriptor)) is
//! compiled once into a dispatch table; each clone then runs as a single
//! synchronous traversal driven by an explicit work stack.

mod cloner;
mod graph;
mod plan;
mod session;
mod verify;

#[cfg(test)]
mod tests;

pub use cloner::SolutionCloner;
pub use plan::ClonePlan;
