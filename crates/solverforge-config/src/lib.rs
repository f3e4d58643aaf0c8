//! Configuration system for SolverForge.
//!
//! Load the solution domain registration and environment mode from TOML or
//! YAML files instead of wiring them in code.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use solverforge_config::{EnvironmentMode, SolverConfig};
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!     solution_class = "Schedule"
//!     entity_class_list = ["Shift"]
//!
//!     [solution_cloner]
//!     known_solution_subclasses = ["WeekendSchedule"]
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert_eq!(config.solution_class.as_deref(), Some("Schedule"));
//! assert_eq!(config.solution_cloner.known_solution_subclasses.len(), 1);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use solverforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Name of the planning solution class.
    #[serde(default)]
    pub solution_class: Option<String>,

    /// Names of the concrete planning entity classes.
    #[serde(default)]
    pub entity_class_list: Vec<String>,

    /// Solution cloner configuration.
    #[serde(default)]
    pub solution_cloner: SolutionClonerConfig,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Sets the solution class.
    pub fn with_solution_class(mut self, class: impl Into<String>) -> Self {
        self.solution_class = Some(class.into());
        self
    }

    /// Adds an entity class.
    pub fn with_entity_class(mut self, class: impl Into<String>) -> Self {
        self.entity_class_list.push(class.into());
        self
    }

    /// Adds a concrete solution subclass the cloner must accept.
    pub fn with_known_solution_subclass(mut self, class: impl Into<String>) -> Self {
        self.solution_cloner
            .known_solution_subclasses
            .push(class.into());
        self
    }

    /// Checks that every configured class name is non-blank.
    ///
    /// Whether the names exist is only known once they are resolved
    /// against a domain model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = self
            .solution_class
            .iter()
            .map(|name| ("solution_class", name))
            .chain(
                self.entity_class_list
                    .iter()
                    .map(|name| ("entity_class_list", name)),
            )
            .chain(
                self.solution_cloner
                    .known_solution_subclasses
                    .iter()
                    .map(|name| ("known_solution_subclasses", name)),
            );
        for (key, name) in names {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{} contains a blank class name",
                    key
                )));
            }
        }
        Ok(())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode with deterministic behavior.
    Reproducible,

    /// Fast assert mode with basic assertions.
    FastAssert,

    /// Full assert mode with comprehensive assertions.
    FullAssert,
}

impl EnvironmentMode {
    /// Returns true if this mode verifies the results it produces.
    pub fn is_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }
}

/// Solution cloner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolutionClonerConfig {
    /// Concrete subclasses of the solution class that may be cloned as roots.
    #[serde(default)]
    pub known_solution_subclasses: Vec<String>,
}
