//! Descriptor types for runtime metadata.

mod member;
mod solution;

#[cfg(test)]
mod tests;

pub use member::{
    FnReader, MemberCategory, MemberDescriptor, MemberReader, MemberWriter, SlotAccessor,
};
pub use solution::{DomainRegistry, SolutionDescriptor, SolutionDescriptorBuilder};
