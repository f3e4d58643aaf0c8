//! Member descriptor.

use std::fmt;
use std::sync::Arc;

use crate::domain::model::TypeRef;
use crate::domain::value::{DomainObject, Value};

/// Reads a member's value from an instance.
pub trait MemberReader: Send + Sync {
    fn read(&self, object: &DomainObject) -> Value;

    /// The slot read from, for slot-backed readers.
    fn slot(&self) -> Option<usize> {
        None
    }

    /// Clone this reader.
    fn clone_box(&self) -> Box<dyn MemberReader>;
}

/// Writes a member's value into an instance.
pub trait MemberWriter: Send + Sync {
    /// Returns false if the instance has no storage for this member.
    fn write(&self, object: &DomainObject, value: Value) -> bool;

    /// The slot written to, for slot-backed writers.
    fn slot(&self) -> Option<usize> {
        None
    }

    /// Clone this writer.
    fn clone_box(&self) -> Box<dyn MemberWriter>;
}

impl Clone for Box<dyn MemberReader> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl Clone for Box<dyn MemberWriter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Direct access to a field slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAccessor {
    slot: usize,
}

impl SlotAccessor {
    pub fn new(slot: usize) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl MemberReader for SlotAccessor {
    fn read(&self, object: &DomainObject) -> Value {
        object.get(self.slot)
    }

    fn slot(&self) -> Option<usize> {
        Some(self.slot)
    }

    fn clone_box(&self) -> Box<dyn MemberReader> {
        Box::new(*self)
    }
}

impl MemberWriter for SlotAccessor {
    fn write(&self, object: &DomainObject, value: Value) -> bool {
        object.set(self.slot, value)
    }

    fn slot(&self) -> Option<usize> {
        Some(self.slot)
    }

    fn clone_box(&self) -> Box<dyn MemberWriter> {
        Box::new(*self)
    }
}

/// A reader backed by a function, for getter-style members.
#[derive(Clone)]
pub struct FnReader {
    read: Arc<dyn Fn(&DomainObject) -> Value + Send + Sync>,
}

impl FnReader {
    pub fn new(read: impl Fn(&DomainObject) -> Value + Send + Sync + 'static) -> Self {
        Self {
            read: Arc::new(read),
        }
    }
}

impl MemberReader for FnReader {
    fn read(&self, object: &DomainObject) -> Value {
        (self.read)(object)
    }

    fn clone_box(&self) -> Box<dyn MemberReader> {
        Box::new(self.clone())
    }
}

/// How the cloner copies a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberCategory {
    /// Copy the reference, unless the declared type can hold a planning entity.
    Shallow,
    /// Always clone recursively.
    Deep,
}

/// Describes one copyable member of a solution or entity class.
#[derive(Clone)]
pub struct MemberDescriptor {
    pub name: Arc<str>,
    pub declaring_class: Arc<str>,
    pub declared: TypeRef,
    pub category: MemberCategory,
    reader: Box<dyn MemberReader>,
    writer: Option<Box<dyn MemberWriter>>,
}

impl MemberDescriptor {
    pub fn new(
        name: impl Into<Arc<str>>,
        declaring_class: impl Into<Arc<str>>,
        declared: TypeRef,
        category: MemberCategory,
        reader: Box<dyn MemberReader>,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_class: declaring_class.into(),
            declared,
            category,
            reader,
            writer: None,
        }
    }

    /// Creates a readable and writable member stored in a slot.
    pub fn slot(
        name: impl Into<Arc<str>>,
        declaring_class: impl Into<Arc<str>>,
        declared: TypeRef,
        category: MemberCategory,
        slot: usize,
    ) -> Self {
        Self::new(
            name,
            declaring_class,
            declared,
            category,
            Box::new(SlotAccessor::new(slot)),
        )
        .with_writer(Box::new(SlotAccessor::new(slot)))
    }

    pub fn with_writer(mut self, writer: Box<dyn MemberWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn read(&self, object: &DomainObject) -> Value {
        self.reader.read(object)
    }

    pub fn writer(&self) -> Option<&dyn MemberWriter> {
        self.writer.as_deref()
    }

    /// Slots this member reads from or writes to directly.
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.reader
            .slot()
            .into_iter()
            .chain(self.writer.as_ref().and_then(|writer| writer.slot()))
    }

    pub fn has_writer(&self) -> bool {
        self.writer.is_some()
    }

    pub fn is_deep(&self) -> bool {
        self.category == MemberCategory::Deep
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("declaring_class", &self.declaring_class)
            .field("declared", &self.declared)
            .field("category", &self.category)
            .field("writable", &self.has_writer())
            .finish()
    }
}
