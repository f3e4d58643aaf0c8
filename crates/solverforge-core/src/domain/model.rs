//! Class catalog for runtime-defined domain models.
//!
//! A [`DomainModel`] records every class a solution graph may contain:
//! its superclass, the interfaces it implements, its declared fields and
//! whether it can be default-constructed. Descriptors and the solution
//! cloner consult it for assignability and field layout.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::domain::value::{DomainObject, ObjectRef, Value};
use crate::error::{Result, SolverForgeError};

static ANY_TYPE: TypeRef = TypeRef::Any;

/// Declared static type of a field, container element or array component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// The top type; every class is assignable to it.
    Any,
    /// A domain class, interface or leaf type, by name.
    Class(Arc<str>),
    /// An ordered list of the element type.
    List(Box<TypeRef>),
    /// A set of the element type.
    Set(Box<TypeRef>),
    /// A collection of unspecified category.
    Collection(Box<TypeRef>),
    /// A key-value mapping.
    Map(Box<TypeRef>, Box<TypeRef>),
    /// A fixed-length array of the component type.
    Array(Box<TypeRef>),
    /// A collection without an element type.
    RawCollection,
    /// A map without key and value types.
    RawMap,
}

impl TypeRef {
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        TypeRef::Class(name.into())
    }

    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(Box::new(element))
    }

    pub fn set(element: TypeRef) -> Self {
        TypeRef::Set(Box::new(element))
    }

    pub fn collection(element: TypeRef) -> Self {
        TypeRef::Collection(Box::new(element))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map(Box::new(key), Box::new(value))
    }

    pub fn array(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    /// Returns true for collection, map and array types, raw or not.
    pub fn is_container(&self) -> bool {
        !matches!(self, TypeRef::Any | TypeRef::Class(_))
    }

    /// Returns the element type of a collection or array type.
    ///
    /// `Any` yields `Any`, since a value declared as the top type may hold
    /// a container of anything. Returns `None` for raw containers and for
    /// types that are not collections.
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::List(e) | TypeRef::Set(e) | TypeRef::Collection(e) | TypeRef::Array(e) => {
                Some(e)
            }
            TypeRef::Any => Some(&ANY_TYPE),
            _ => None,
        }
    }

    /// Returns the key and value types of a map type.
    pub fn map_types(&self) -> Option<(&TypeRef, &TypeRef)> {
        match self {
            TypeRef::Map(k, v) => Some((k, v)),
            TypeRef::Any => Some((&ANY_TYPE, &ANY_TYPE)),
            _ => None,
        }
    }

    /// Finds the first unparameterized container nested in this type.
    pub fn find_raw(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::RawCollection | TypeRef::RawMap => Some(self),
            TypeRef::List(e) | TypeRef::Set(e) | TypeRef::Collection(e) | TypeRef::Array(e) => {
                e.find_raw()
            }
            TypeRef::Map(k, v) => k.find_raw().or_else(|| v.find_raw()),
            TypeRef::Any | TypeRef::Class(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Any => write!(f, "Object"),
            TypeRef::Class(name) => write!(f, "{}", name),
            TypeRef::List(e) => write!(f, "List<{}>", e),
            TypeRef::Set(e) => write!(f, "Set<{}>", e),
            TypeRef::Collection(e) => write!(f, "Collection<{}>", e),
            TypeRef::Map(k, v) => write!(f, "Map<{}, {}>", k, v),
            TypeRef::Array(e) => write!(f, "{}[]", e),
            TypeRef::RawCollection => write!(f, "Collection"),
            TypeRef::RawMap => write!(f, "Map"),
        }
    }
}

/// A field declared on a class.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: Arc<str>,
    pub declared: TypeRef,
    /// Always cloned recursively instead of copied by reference.
    pub deep: bool,
    /// Whether the field can be assigned on a fresh instance.
    pub writable: bool,
}

impl FieldDef {
    /// Creates a writable field that is copied by reference.
    pub fn new(name: impl Into<Arc<str>>, declared: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared,
            deep: false,
            writable: true,
        }
    }

    /// Creates a writable field that is cloned recursively.
    pub fn deep(name: impl Into<Arc<str>>, declared: TypeRef) -> Self {
        Self {
            deep: true,
            ..Self::new(name, declared)
        }
    }

    /// Marks the field as having no setter.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }
}

/// A class in the domain model.
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: Arc<str>,
    pub superclass: Option<Arc<str>>,
    pub interfaces: Vec<Arc<str>>,
    /// Fields declared on this class only; inherited fields live on the superclass.
    pub fields: Vec<FieldDef>,
    /// Abstract classes and interfaces have no default constructor.
    pub is_abstract: bool,
}

impl ClassDef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            is_abstract: false,
        }
    }

    /// Creates an interface: abstract, field-less, only usable as a supertype.
    pub fn interface(name: impl Into<Arc<str>>) -> Self {
        Self::new(name).abstract_class()
    }

    pub fn extends(mut self, superclass: impl Into<Arc<str>>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<Arc<str>>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    fn supertypes(&self) -> impl Iterator<Item = &Arc<str>> {
        self.superclass.iter().chain(self.interfaces.iter())
    }
}

/// Catalog of all classes of a domain model.
#[derive(Debug, Clone, Default)]
pub struct DomainModel {
    classes: Vec<ClassDef>,
    class_indices: HashMap<Arc<str>, usize>,
}

impl DomainModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class. Class names are unique within a model.
    pub fn add_class(&mut self, class: ClassDef) -> Result<()> {
        if self.class_indices.contains_key(&class.name) {
            return Err(SolverForgeError::DomainModel(format!(
                "The class ({}) is defined twice.",
                class.name
            )));
        }
        self.class_indices
            .insert(class.name.clone(), self.classes.len());
        self.classes.push(class);
        Ok(())
    }

    /// Builder-style variant of [`add_class`](Self::add_class).
    pub fn with_class(mut self, class: ClassDef) -> Result<Self> {
        self.add_class(class)?;
        Ok(self)
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.class_indices.get(name).map(|&idx| &self.classes[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.class_indices.contains_key(name)
    }

    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    /// Checks that every referenced supertype exists and that the
    /// hierarchy has no cycles.
    pub fn validate(&self) -> Result<()> {
        for class in &self.classes {
            for supertype in class.supertypes() {
                if !self.contains(supertype) {
                    return Err(SolverForgeError::DomainModel(format!(
                        "The class ({}) extends or implements an undefined type ({}).",
                        class.name, supertype
                    )));
                }
            }
            if self.ancestors(&class.name).contains(&class.name) {
                return Err(SolverForgeError::DomainModel(format!(
                    "The class ({}) is its own supertype.",
                    class.name
                )));
            }
        }
        Ok(())
    }

    /// All strict supertypes of `name`, transitively.
    fn ancestors(&self, name: &str) -> HashSet<Arc<str>> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&Arc<str>> = match self.class(name) {
            Some(class) => class.supertypes().collect(),
            None => return seen,
        };
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(class) = self.class(current) {
                stack.extend(class.supertypes());
            }
        }
        seen
    }

    /// Returns true if an instance of `source` is an instance of `target`.
    pub fn is_assignable(&self, target: &str, source: &str) -> bool {
        target == source || self.ancestors(source).contains(target)
    }

    /// Returns true if a value of runtime class `class` may be stored in
    /// a member declared as `declared`.
    pub fn is_assignable_to_type(&self, declared: &TypeRef, class: &str) -> bool {
        match declared {
            TypeRef::Any => true,
            TypeRef::Class(name) => self.is_assignable(name, class),
            _ => false,
        }
    }

    /// Length of the longest supertype path above `name`.
    ///
    /// A subclass is always deeper than any of its supertypes, so sorting
    /// by descending depth puts the most specific classes first.
    pub fn depth(&self, name: &str) -> usize {
        let mut depth = 0;
        let mut level: Vec<&Arc<str>> = match self.class(name) {
            Some(class) => class.supertypes().collect(),
            None => return 0,
        };
        // Bounded by the class count so a malformed hierarchy cannot spin.
        while !level.is_empty() && depth <= self.classes.len() {
            depth += 1;
            level = level
                .into_iter()
                .filter_map(|n| self.class(n))
                .flat_map(|c| c.supertypes())
                .collect();
        }
        depth
    }

    /// Sorts class names most-specific-first, then by name.
    pub fn sort_most_specific_first(&self, classes: &mut [Arc<str>]) {
        classes.sort_by(|a, b| {
            self.depth(b)
                .cmp(&self.depth(a))
                .then_with(|| a.cmp(b))
        });
    }

    /// Returns the fields of `name` in slot order: inherited fields first,
    /// starting at the root of the superclass chain.
    pub fn layout(&self, name: &str) -> Vec<(&ClassDef, &FieldDef)> {
        let mut chain = Vec::new();
        let mut current = self.class(name);
        while let Some(class) = current {
            if chain.len() > self.classes.len() {
                break;
            }
            chain.push(class);
            current = class.superclass.as_deref().and_then(|s| self.class(s));
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|class| class.fields.iter().map(move |field| (class, field)))
            .collect()
    }

    /// Returns the slot index of `field` in instances of `class`.
    ///
    /// When a subclass redeclares a field name, the most derived one wins.
    pub fn slot_of(&self, class: &str, field: &str) -> Option<usize> {
        self.layout(class)
            .iter()
            .rposition(|(_, f)| f.name.as_ref() == field)
    }

    /// Default-constructs an instance of a concrete class.
    pub fn new_instance(&self, name: &str) -> Result<ObjectRef> {
        let class = self.class(name).ok_or_else(|| {
            SolverForgeError::DomainModel(format!("The class ({}) is not defined.", name))
        })?;
        if class.is_abstract {
            return Err(SolverForgeError::DomainModel(format!(
                "The class ({}) is abstract and cannot be instantiated.",
                name
            )));
        }
        Ok(DomainObject::new(class.name.clone(), self.layout(name).len()))
    }

    /// Reads a field by name.
    pub fn read_field(&self, object: &DomainObject, field: &str) -> Option<Value> {
        self.slot_of(object.class_name(), field)
            .map(|slot| object.get(slot))
    }

    /// Writes a field by name.
    pub fn write_field(&self, object: &DomainObject, field: &str, value: Value) -> Result<()> {
        let slot = self.slot_of(object.class_name(), field).ok_or_else(|| {
            SolverForgeError::DomainModel(format!(
                "The class ({}) has no field ({}).",
                object.class_name(),
                field
            ))
        })?;
        object.set(slot, value);
        Ok(())
    }
}
