//! Chained entity fixtures.
//!
//! Customers form chains anchored at a depot. Both implement the
//! `Standstill` interface, so a customer's `previous` member may hold either
//! another customer (a planning entity) or a depot (a problem fact).

use std::sync::Arc;

use solverforge_core::domain::{
    ClassDef, DomainModel, FieldDef, ObjectRef, SolutionDescriptor, TypeRef, Value,
};
use solverforge_core::Result;

use crate::{list_of, set_fields};

pub const SOLUTION: &str = "ChainSolution";
pub const STANDSTILL: &str = "Standstill";
pub const DEPOT: &str = "Depot";
pub const CUSTOMER: &str = "Customer";

/// Creates the chained domain model.
pub fn chained_model() -> Result<Arc<DomainModel>> {
    let model = DomainModel::new()
        .with_class(ClassDef::interface(STANDSTILL))?
        .with_class(
            ClassDef::new(DEPOT)
                .implements(STANDSTILL)
                .with_field(FieldDef::new("name", TypeRef::class("String"))),
        )?
        .with_class(
            ClassDef::new(CUSTOMER)
                .implements(STANDSTILL)
                .with_field(FieldDef::new("name", TypeRef::class("String")))
                .with_field(FieldDef::new("previous", TypeRef::class(STANDSTILL)))
                .with_field(FieldDef::new("next", TypeRef::class(CUSTOMER))),
        )?
        .with_class(
            ClassDef::new(SOLUTION)
                .with_field(FieldDef::new("depots", TypeRef::list(TypeRef::class(DEPOT))))
                .with_field(FieldDef::deep(
                    "customers",
                    TypeRef::list(TypeRef::class(CUSTOMER)),
                )),
        )?;
    Ok(Arc::new(model))
}

pub fn chained_descriptor(model: Arc<DomainModel>) -> Result<SolutionDescriptor> {
    SolutionDescriptor::builder(model, SOLUTION)
        .with_entity_class(CUSTOMER)
        .build()
}

/// Builds one depot and a chain of `length` customers. The first customer
/// follows the depot; every other customer follows its predecessor, which
/// links back through `next`.
pub fn build_chain(model: &DomainModel, length: usize) -> Result<ObjectRef> {
    let depot = model.new_instance(DEPOT)?;
    set_fields(model, &depot, [("name", Value::str("depot"))])?;

    let mut customers: Vec<ObjectRef> = Vec::with_capacity(length);
    for i in 0..length {
        let customer = model.new_instance(CUSTOMER)?;
        let previous = customers.last().unwrap_or(&depot).clone();
        set_fields(
            model,
            &customer,
            [
                ("name", Value::str(format!("c{}", i))),
                ("previous", Value::Object(previous)),
            ],
        )?;
        if let Some(predecessor) = customers.last() {
            model.write_field(predecessor, "next", Value::Object(customer.clone()))?;
        }
        customers.push(customer);
    }

    let solution = model.new_instance(SOLUTION)?;
    set_fields(
        model,
        &solution,
        [
            ("depots", list_of(std::slice::from_ref(&depot))),
            ("customers", list_of(&customers)),
        ],
    )?;
    Ok(solution)
}
