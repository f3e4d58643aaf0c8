//! Dispatch table compiled once per registry.
//!
//! A [`ClonePlan`] answers every question the graph cloner asks at run
//! time without touching the domain model again: which classes are solution
//! roots, which runtime classes resolve to which registered entity class for
//! a given declared type, and how each member of a registered class is
//! copied.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use solverforge_core::domain::{DomainObject, DomainRegistry, MemberDescriptor, TypeRef, Value};
use solverforge_core::{Result, SolverForgeError};
use tracing::{debug, trace};

/// How a member value reaches the clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    /// Shallow member: the reference is copied.
    Copy,
    /// Shallow member whose declared type can hold a planning entity:
    /// entities are cloned, anything else is copied.
    Entity,
    /// Deep member: cloned recursively.
    Deep,
}

pub(crate) struct PlannedMember {
    descriptor: MemberDescriptor,
    route: Route,
}

impl PlannedMember {
    pub(crate) fn route(&self) -> Route {
        self.route
    }

    pub(crate) fn declared(&self) -> &TypeRef {
        &self.descriptor.declared
    }

    pub(crate) fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub(crate) fn read(&self, object: &DomainObject) -> Value {
        self.descriptor.read(object)
    }

    /// Writes the member on a clone. Returns false if the write failed.
    pub(crate) fn write(&self, object: &DomainObject, value: Value) -> bool {
        self.descriptor
            .writer()
            .is_some_and(|writer| writer.write(object, value))
    }
}

/// Population recipe for one concrete registered class.
pub(crate) struct ClassPlan {
    pub(crate) class: Arc<str>,
    pub(crate) slot_count: usize,
    /// Shallow members first, then deep members, each in declaration order.
    pub(crate) members: Vec<PlannedMember>,
}

/// Outcome of matching a runtime class against the registered root classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RootMatch {
    /// Not assignable to the solution class.
    NotRoot,
    /// A registered root class.
    Known,
    /// Assignable to the solution class but not registered itself.
    Unknown,
}

#[derive(Debug)]
struct ClassInfo {
    root: RootMatch,
    /// Registered entity classes this class is assignable to, most-specific-first.
    entity_supertypes: Vec<Arc<str>>,
}

/// Compiled, immutable dispatch table shared by every clone of a cloner.
pub struct ClonePlan {
    solution_class: Arc<str>,
    roots: Vec<Arc<str>>,
    entities: Vec<Arc<str>>,
    classes: HashMap<Arc<str>, ClassPlan>,
    class_info: HashMap<Arc<str>, ClassInfo>,
    /// Registered entity classes assignable to each declared class name.
    entity_scopes: HashMap<Arc<str>, Vec<Arc<str>>>,
}

impl ClonePlan {
    /// Compiles the dispatch table for `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverForgeError::MissingWriteAccessor`] if any member of a
    /// registered class cannot be written, and
    /// [`SolverForgeError::UnresolvableElementType`] if a deep member's
    /// declared type contains a container without element types.
    pub fn compile(registry: &dyn DomainRegistry) -> Result<Self> {
        let model = registry.model();
        let solution_class = registry.solution_class().clone();
        let roots = registry.known_root_subclasses().to_vec();
        let entities = registry.entity_classes().to_vec();

        let mut entity_scopes = HashMap::new();
        let mut class_info = HashMap::new();
        for class in model.classes() {
            let scope = registry.known_subclasses(&TypeRef::Class(class.name.clone()));
            if !scope.is_empty() {
                entity_scopes.insert(class.name.clone(), scope);
            }

            let root = if !model.is_assignable(&solution_class, &class.name) {
                RootMatch::NotRoot
            } else {
                match roots.iter().find(|r| model.is_assignable(r, &class.name)) {
                    Some(first) if *first == class.name => RootMatch::Known,
                    _ => RootMatch::Unknown,
                }
            };
            let entity_supertypes: Vec<Arc<str>> = entities
                .iter()
                .filter(|e| model.is_assignable(e, &class.name))
                .cloned()
                .collect();
            if root != RootMatch::NotRoot || !entity_supertypes.is_empty() {
                class_info.insert(
                    class.name.clone(),
                    ClassInfo {
                        root,
                        entity_supertypes,
                    },
                );
            }
        }

        let mut plan = ClonePlan {
            solution_class,
            roots,
            entities,
            classes: HashMap::new(),
            class_info,
            entity_scopes,
        };

        let registered: Vec<Arc<str>> = plan.roots.iter().chain(&plan.entities).cloned().collect();
        let mut member_count = 0;
        for class in registered {
            let class_plan = plan.compile_class(registry, &class)?;
            trace!(
                event = "clone_class_planned",
                class = %class,
                slots = class_plan.slot_count,
                members = class_plan.members.len(),
            );
            member_count += class_plan.members.len();
            plan.classes.insert(class, class_plan);
        }

        debug!(
            event = "clone_plan_compiled",
            solution_class = %plan.solution_class,
            root_classes = plan.roots.len(),
            entity_classes = plan.entities.len(),
            members = member_count,
        );
        Ok(plan)
    }

    fn compile_class(&self, registry: &dyn DomainRegistry, class: &Arc<str>) -> Result<ClassPlan> {
        let shallow = registry.shallow_members(class).iter().map(|m| {
            let route = if self.overlaps_entity(&m.declared) {
                Route::Entity
            } else {
                Route::Copy
            };
            (m, route)
        });
        let deep = registry
            .deep_members(class)
            .iter()
            .map(|m| (m, Route::Deep));

        let mut members = Vec::new();
        for (descriptor, route) in shallow.chain(deep) {
            if !descriptor.has_writer() {
                return Err(SolverForgeError::MissingWriteAccessor {
                    member: descriptor.name.to_string(),
                    declaring_class: descriptor.declaring_class.to_string(),
                });
            }
            if route == Route::Deep && descriptor.declared.find_raw().is_some() {
                return Err(SolverForgeError::UnresolvableElementType {
                    member: descriptor.name.to_string(),
                    declaring_class: descriptor.declaring_class.to_string(),
                    declared: descriptor.declared.to_string(),
                });
            }
            members.push(PlannedMember {
                descriptor: descriptor.clone(),
                route,
            });
        }

        Ok(ClassPlan {
            class: class.clone(),
            slot_count: registry.model().layout(class).len(),
            members,
        })
    }

    pub(crate) fn solution_class(&self) -> &Arc<str> {
        &self.solution_class
    }

    pub(crate) fn class_plan(&self, class: &str) -> Option<&ClassPlan> {
        self.classes.get(class)
    }

    pub(crate) fn root_match(&self, class: &str) -> RootMatch {
        self.class_info
            .get(class)
            .map_or(RootMatch::NotRoot, |info| info.root)
    }

    /// Registered entity classes a value declared as `declared` may hold.
    fn entity_scope(&self, declared: &TypeRef) -> &[Arc<str>] {
        match declared {
            TypeRef::Any => &self.entities,
            TypeRef::Class(name) => self
                .entity_scopes
                .get(name)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => &[],
        }
    }

    /// Returns true if a value declared as `declared` may be a planning entity.
    pub(crate) fn overlaps_entity(&self, declared: &TypeRef) -> bool {
        !self.entity_scope(declared).is_empty()
    }

    /// Finds the first registered entity class within the scope of
    /// `declared` that `class` is assignable to.
    pub(crate) fn entity_match(&self, class: &str, declared: &TypeRef) -> Option<&Arc<str>> {
        let info = self.class_info.get(class)?;
        self.entity_scope(declared)
            .iter()
            .find(|e| info.entity_supertypes.contains(e))
    }

    pub(crate) fn unknown_root(&self, class: &str) -> SolverForgeError {
        SolverForgeError::UnknownRootSubclass {
            class: class.to_string(),
            solution_class: self.solution_class.to_string(),
            known: self.roots.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub(crate) fn unknown_entity(&self, class: &str) -> SolverForgeError {
        SolverForgeError::UnknownEntitySubclass {
            class: class.to_string(),
            known: self.entities.iter().map(|e| e.to_string()).collect(),
        }
    }

}

impl fmt::Debug for ClonePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClonePlan")
            .field("solution_class", &self.solution_class)
            .field("roots", &self.roots)
            .field("entities", &self.entities)
            .finish()
    }
}
