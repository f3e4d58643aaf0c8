//! Error types for SolverForge

use thiserror::Error;

/// Main error type for SolverForge operations
#[derive(Debug, Error)]
pub enum SolverForgeError {
    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error in domain model definition
    #[error("Domain model error: {0}")]
    DomainModel(String),

    /// A solution instance whose runtime class was never registered.
    #[error(
        "Failed to create clone: encountered ({class}) which is not a known subclass of \
         the solution class ({solution_class}). The known subclasses are [{}].",
        .known.join(", ")
    )]
    UnknownRootSubclass {
        class: String,
        solution_class: String,
        known: Vec<String>,
    },

    /// An entity instance whose runtime class was never registered.
    #[error(
        "Failed to create clone: encountered ({class}) which is not a known entity class. \
         The known entity classes are [{}].",
        .known.join(", ")
    )]
    UnknownEntitySubclass { class: String, known: Vec<String> },

    /// A member that must be written on the clone has no write accessor.
    #[error("The member ({member}) of class ({declaring_class}) does not have a setter.")]
    MissingWriteAccessor {
        member: String,
        declaring_class: String,
    },

    /// A container member whose element, key or value type is not declared.
    #[error(
        "Cannot infer element type for member ({member}) of class ({declaring_class}) \
         with declared type ({declared})."
    )]
    UnresolvableElementType {
        member: String,
        declaring_class: String,
        declared: String,
    },

    /// A cloned graph still references an original it should have replaced.
    #[error("Clone integrity violated: {0}")]
    CloneIntegrity(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for SolverForge operations
pub type Result<T> = std::result::Result<T, SolverForgeError>;
