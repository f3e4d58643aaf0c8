//! Solution descriptor.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{MemberCategory, MemberDescriptor, SlotAccessor};
use crate::domain::model::{DomainModel, TypeRef};
use crate::error::{Result, SolverForgeError};

/// Read-only view of a registered domain: the closed sets of solution and
/// entity classes and the copyable members of each.
pub trait DomainRegistry: Send + Sync {
    /// The class catalog the registered classes belong to.
    fn model(&self) -> &DomainModel;

    /// The declared solution class.
    fn solution_class(&self) -> &Arc<str>;

    /// Concrete solution classes, most-specific-first, then by name.
    fn known_root_subclasses(&self) -> &[Arc<str>];

    /// Concrete entity classes, most-specific-first, then by name.
    fn entity_classes(&self) -> &[Arc<str>];

    /// Members copied by reference, in declaration order.
    fn shallow_members(&self, class: &str) -> &[MemberDescriptor];

    /// Members cloned recursively, in declaration order.
    fn deep_members(&self, class: &str) -> &[MemberDescriptor];

    /// Registered entity classes assignable to `declared`, in the same order
    /// as [`entity_classes`](Self::entity_classes).
    fn known_subclasses(&self, declared: &TypeRef) -> Vec<Arc<str>> {
        self.entity_classes()
            .iter()
            .filter(|class| self.model().is_assignable_to_type(declared, class))
            .cloned()
            .collect()
    }
}

#[derive(Clone, Default)]
struct ClassMembers {
    shallow: Vec<MemberDescriptor>,
    deep: Vec<MemberDescriptor>,
}

/// Describes a planning solution at runtime.
///
/// Contains metadata about:
/// - The solution class and its registered concrete subclasses
/// - Entity classes
/// - Shallow and deep members of every registered class
#[derive(Clone)]
pub struct SolutionDescriptor {
    model: Arc<DomainModel>,
    solution_class: Arc<str>,
    root_classes: Vec<Arc<str>>,
    entity_classes: Vec<Arc<str>>,
    members: HashMap<Arc<str>, ClassMembers>,
}

impl SolutionDescriptor {
    /// Starts describing a solution whose class is `solution_class`.
    pub fn builder(
        model: Arc<DomainModel>,
        solution_class: impl Into<Arc<str>>,
    ) -> SolutionDescriptorBuilder {
        SolutionDescriptorBuilder {
            model,
            solution_class: solution_class.into(),
            root_subclasses: Vec::new(),
            entity_classes: Vec::new(),
            member_overrides: HashMap::new(),
        }
    }

    /// Returns true if `class` is a registered entity class.
    pub fn is_entity_class(&self, class: &str) -> bool {
        self.entity_classes.iter().any(|c| c.as_ref() == class)
    }

    /// Finds a member of a registered class by name.
    pub fn find_member(&self, class: &str, name: &str) -> Option<&MemberDescriptor> {
        let members = self.members.get(class)?;
        members
            .shallow
            .iter()
            .chain(members.deep.iter())
            .find(|m| m.name.as_ref() == name)
    }

    /// Returns the number of registered entity classes.
    pub fn entity_class_count(&self) -> usize {
        self.entity_classes.len()
    }
}

impl DomainRegistry for SolutionDescriptor {
    fn model(&self) -> &DomainModel {
        &self.model
    }

    fn solution_class(&self) -> &Arc<str> {
        &self.solution_class
    }

    fn known_root_subclasses(&self) -> &[Arc<str>] {
        &self.root_classes
    }

    fn entity_classes(&self) -> &[Arc<str>] {
        &self.entity_classes
    }

    fn shallow_members(&self, class: &str) -> &[MemberDescriptor] {
        self.members
            .get(class)
            .map(|m| m.shallow.as_slice())
            .unwrap_or_default()
    }

    fn deep_members(&self, class: &str) -> &[MemberDescriptor] {
        self.members
            .get(class)
            .map(|m| m.deep.as_slice())
            .unwrap_or_default()
    }
}

impl fmt::Debug for SolutionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolutionDescriptor")
            .field("solution_class", &self.solution_class)
            .field("root_classes", &self.root_classes)
            .field("entity_classes", &self.entity_classes)
            .finish()
    }
}

/// Builder for [`SolutionDescriptor`].
pub struct SolutionDescriptorBuilder {
    model: Arc<DomainModel>,
    solution_class: Arc<str>,
    root_subclasses: Vec<Arc<str>>,
    entity_classes: Vec<Arc<str>>,
    member_overrides: HashMap<Arc<str>, Vec<MemberDescriptor>>,
}

impl SolutionDescriptorBuilder {
    /// Registers an additional concrete solution subclass.
    pub fn with_root_subclass(mut self, class: impl Into<Arc<str>>) -> Self {
        self.root_subclasses.push(class.into());
        self
    }

    /// Registers a concrete entity class.
    pub fn with_entity_class(mut self, class: impl Into<Arc<str>>) -> Self {
        self.entity_classes.push(class.into());
        self
    }

    /// Replaces the members derived from the model for `class`.
    pub fn with_members(
        mut self,
        class: impl Into<Arc<str>>,
        members: Vec<MemberDescriptor>,
    ) -> Self {
        self.member_overrides.insert(class.into(), members);
        self
    }

    /// Validates the registration and derives member descriptors.
    pub fn build(self) -> Result<SolutionDescriptor> {
        let model = self.model;
        model.validate()?;

        if !model.contains(&self.solution_class) {
            return Err(SolverForgeError::DomainModel(format!(
                "The solution class ({}) is not defined.",
                self.solution_class
            )));
        }

        let mut root_classes = Vec::new();
        for class in std::iter::once(&self.solution_class).chain(&self.root_subclasses) {
            require_concrete(&model, class, "solution")?;
            if !model.is_assignable(&self.solution_class, class) {
                return Err(SolverForgeError::DomainModel(format!(
                    "The class ({}) is not a subclass of the solution class ({}).",
                    class, self.solution_class
                )));
            }
            if !root_classes.contains(class) {
                root_classes.push(class.clone());
            }
        }

        let mut entity_classes = Vec::new();
        for class in &self.entity_classes {
            require_concrete(&model, class, "entity")?;
            if model.is_assignable(&self.solution_class, class) {
                return Err(SolverForgeError::DomainModel(format!(
                    "The class ({}) cannot be both a solution class and an entity class.",
                    class
                )));
            }
            if !entity_classes.contains(class) {
                entity_classes.push(class.clone());
            }
        }

        model.sort_most_specific_first(&mut root_classes);
        model.sort_most_specific_first(&mut entity_classes);

        let mut member_overrides = self.member_overrides;
        let mut members = HashMap::new();
        for class in root_classes.iter().chain(&entity_classes) {
            let class_members = match member_overrides.remove(class) {
                Some(overridden) => {
                    check_slots(&model, class, &overridden)?;
                    split_members(overridden)
                }
                None => derive_members(&model, class),
            };
            members.insert(class.clone(), class_members);
        }
        if let Some(class) = member_overrides.keys().next() {
            return Err(SolverForgeError::DomainModel(format!(
                "Members were supplied for the class ({}) which is neither a registered \
                 solution class nor a registered entity class.",
                class
            )));
        }

        Ok(SolutionDescriptor {
            model,
            solution_class: self.solution_class,
            root_classes,
            entity_classes,
            members,
        })
    }
}

fn require_concrete(model: &DomainModel, class: &str, role: &str) -> Result<()> {
    match model.class(class) {
        None => Err(SolverForgeError::DomainModel(format!(
            "The {} class ({}) is not defined.",
            role, class
        ))),
        Some(def) if def.is_abstract => Err(SolverForgeError::DomainModel(format!(
            "The {} class ({}) is abstract and has no default constructor.",
            role, class
        ))),
        Some(_) => Ok(()),
    }
}

fn check_slots(model: &DomainModel, class: &str, members: &[MemberDescriptor]) -> Result<()> {
    let slot_count = model.layout(class).len();
    for member in members {
        if let Some(slot) = member.slots().find(|&slot| slot >= slot_count) {
            return Err(SolverForgeError::DomainModel(format!(
                "The member ({}) of class ({}) uses slot {} but the class has {} slots.",
                member.name, class, slot, slot_count
            )));
        }
    }
    Ok(())
}

fn derive_members(model: &DomainModel, class: &str) -> ClassMembers {
    let members = model
        .layout(class)
        .into_iter()
        .enumerate()
        .map(|(slot, (declaring, field))| {
            let category = if field.deep {
                MemberCategory::Deep
            } else {
                MemberCategory::Shallow
            };
            let member = MemberDescriptor::new(
                field.name.clone(),
                declaring.name.clone(),
                field.declared.clone(),
                category,
                Box::new(SlotAccessor::new(slot)),
            );
            if field.writable {
                member.with_writer(Box::new(SlotAccessor::new(slot)))
            } else {
                member
            }
        })
        .collect();
    split_members(members)
}

fn split_members(members: Vec<MemberDescriptor>) -> ClassMembers {
    let (deep, shallow) = members.into_iter().partition(|m| m.is_deep());
    ClassMembers { shallow, deep }
}
