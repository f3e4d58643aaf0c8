//! Domain model types for describing solution graphs
//!
//! - `DomainModel`: The class catalog (hierarchy, fields, constructibility)
//! - `Value`: Runtime values, with shared handles for objects and containers
//! - `SolutionDescriptor`: The registered solution and entity classes and
//!   the copyable members of each

mod descriptor;
mod model;
mod value;

#[cfg(test)]
mod tests;

pub use descriptor::{
    DomainRegistry, FnReader, MemberCategory, MemberDescriptor, MemberReader, MemberWriter,
    SlotAccessor, SolutionDescriptor, SolutionDescriptorBuilder,
};
pub use model::{ClassDef, DomainModel, FieldDef, TypeRef};
pub use value::{
    ArrayRef, CollectionKind, CollectionRef, DomainArray, DomainCollection, DomainMap,
    DomainObject, Identity, MapKind, MapRef, ObjectRef, SharedComparator, Value,
    ValueComparator,
};
