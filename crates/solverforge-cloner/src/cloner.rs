//! The solution cloner.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use solverforge_config::{ConfigError, EnvironmentMode, SolverConfig};
use solverforge_core::domain::{
    DomainModel, DomainRegistry, ObjectRef, SolutionDescriptor, TypeRef, Value,
};
use solverforge_core::{Result, SolverForgeError};
use tracing::trace;

use crate::graph::GraphCloner;
use crate::plan::ClonePlan;
use crate::verify::verify_clone;

fn config_error(err: ConfigError) -> SolverForgeError {
    SolverForgeError::Config(err.to_string())
}

/// Deep-clones planning solutions.
///
/// The clone of a solution owns copies of the solution object, every
/// planning entity reachable through deep or entity-typed members, and every
/// container on those paths. Problem facts and immutable leaves stay shared
/// with the original. Shared references and cycles in the original are
/// reproduced among the clones.
///
/// The dispatch table is compiled once in the constructor; cloning the
/// cloner shares it, so one cloner per registry can be handed to any number
/// of worker threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use solverforge_cloner::SolutionCloner;
/// use solverforge_core::domain::{ClassDef, DomainModel, FieldDef, SolutionDescriptor, TypeRef, Value};
///
/// let model = Arc::new(
///     DomainModel::new()
///         .with_class(ClassDef::new("Shift").with_field(FieldDef::new("employee", TypeRef::class("String"))))?
///         .with_class(ClassDef::new("Schedule").with_field(FieldDef::deep("shifts", TypeRef::list(TypeRef::class("Shift")))))?,
/// );
/// let descriptor = SolutionDescriptor::builder(model.clone(), "Schedule")
///     .with_entity_class("Shift")
///     .build()?;
/// let cloner = SolutionCloner::new(Arc::new(descriptor))?;
///
/// let schedule = model.new_instance("Schedule")?;
/// let clone = cloner.clone_solution(&schedule)?;
/// assert!(!Arc::ptr_eq(&schedule, &clone));
/// # Ok::<(), solverforge_core::SolverForgeError>(())
/// ```
#[derive(Clone)]
pub struct SolutionCloner {
    registry: Arc<dyn DomainRegistry>,
    plan: Arc<ClonePlan>,
    environment_mode: EnvironmentMode,
}

impl SolutionCloner {
    /// Compiles a cloner for `registry`.
    ///
    /// # Errors
    ///
    /// Fails if a member that must be cloned has no write accessor or an
    /// unparameterized container type.
    pub fn new(registry: Arc<dyn DomainRegistry>) -> Result<Self> {
        let plan = ClonePlan::compile(registry.as_ref())?;
        Ok(Self {
            registry,
            plan: Arc::new(plan),
            environment_mode: EnvironmentMode::default(),
        })
    }

    /// Resolves the class names of `config` against `model` and compiles a
    /// cloner for them.
    ///
    /// # Errors
    ///
    /// Returns [`SolverForgeError::Config`] if the configuration is invalid
    /// or names no solution class, and [`SolverForgeError::DomainModel`] if
    /// a named class is undefined or abstract.
    pub fn from_config(config: &SolverConfig, model: Arc<DomainModel>) -> Result<Self> {
        config.validate().map_err(config_error)?;
        let solution_class = config.solution_class.as_deref().ok_or_else(|| {
            config_error(ConfigError::Invalid(
                "solution_class is required to build a solution cloner".to_string(),
            ))
        })?;

        let mut builder = SolutionDescriptor::builder(model, solution_class);
        for class in &config.solution_cloner.known_solution_subclasses {
            builder = builder.with_root_subclass(class.as_str());
        }
        for class in &config.entity_class_list {
            builder = builder.with_entity_class(class.as_str());
        }
        let descriptor = builder.build()?;

        Ok(Self::new(Arc::new(descriptor))?.with_environment_mode(config.environment_mode))
    }

    /// Sets the environment mode. Asserting modes verify every clone.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    /// The registry this cloner was compiled from.
    pub fn registry(&self) -> &dyn DomainRegistry {
        self.registry.as_ref()
    }

    /// Returns true if both cloners use the same compiled dispatch table.
    pub fn shares_plan_with(&self, other: &SolutionCloner) -> bool {
        Arc::ptr_eq(&self.plan, &other.plan)
    }

    /// Deep-clones a planning solution.
    ///
    /// # Errors
    ///
    /// Fails with [`SolverForgeError::UnknownRootSubclass`] or
    /// [`SolverForgeError::UnknownEntitySubclass`] when the graph contains an
    /// instance of an unregistered subclass, and with
    /// [`SolverForgeError::CloneIntegrity`] when an asserting environment
    /// mode finds an original referenced from the clone. No partial clone is
    /// returned.
    pub fn clone_solution(&self, solution: &ObjectRef) -> Result<ObjectRef> {
        let start = Instant::now();
        let mut graph = GraphCloner::new(&self.plan);
        let clone = graph.clone_root(solution)?;
        let session = graph.into_session();

        let verified = if self.environment_mode.is_asserted() {
            Some(verify_clone(&clone, &session)?)
        } else {
            None
        };

        trace!(
            event = "clone_end",
            solution_class = %solution.class_name(),
            objects = session.objects_cloned(),
            containers = session.containers_cloned(),
            verified = ?verified,
            duration_us = start.elapsed().as_micros() as u64,
        );
        Ok(clone)
    }

    /// Deep-clones a value that is not a solution root, such as a snapshot
    /// of an entity list, as if it were held by a deep member declared as
    /// `declared`.
    ///
    /// # Errors
    ///
    /// Fails with [`SolverForgeError::UnresolvableElementType`] when
    /// `declared` contains a container without element types, otherwise as
    /// [`clone_solution`](Self::clone_solution).
    pub fn clone_value(&self, value: &Value, declared: &TypeRef) -> Result<Value> {
        if declared.find_raw().is_some() {
            return Err(SolverForgeError::UnresolvableElementType {
                member: "value".to_string(),
                declaring_class: self.plan.solution_class().to_string(),
                declared: declared.to_string(),
            });
        }
        let start = Instant::now();
        let mut graph = GraphCloner::new(&self.plan);
        let clone = graph.clone_detached(value, declared)?;
        let session = graph.into_session();

        trace!(
            event = "clone_end",
            declared = %declared,
            objects = session.objects_cloned(),
            containers = session.containers_cloned(),
            duration_us = start.elapsed().as_micros() as u64,
        );
        Ok(clone)
    }
}

impl fmt::Debug for SolutionCloner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolutionCloner")
            .field("plan", &self.plan)
            .field("environment_mode", &self.environment_mode)
            .finish()
    }
}
