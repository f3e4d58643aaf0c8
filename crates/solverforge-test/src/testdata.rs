//! Basic solution, entity and value fixtures.
//!
//! `TestdataSolution` holds a deep list of values and a deep list of
//! entities. Each `TestdataEntity` references a value and, through its
//! shallow `extra` member, optionally another entity.
//!
//! # Example
//!
//! ```ignore
//! use solverforge_test::testdata::{generate_solution, testdata_descriptor, testdata_model};
//!
//! let model = testdata_model()?;
//! let descriptor = testdata_descriptor(model.clone())?;
//! let solution = generate_solution(&model, 2, 3)?;
//! ```

use std::sync::Arc;

use solverforge_core::domain::{
    ClassDef, DomainModel, FieldDef, ObjectRef, SolutionDescriptor, TypeRef, Value,
};
use solverforge_core::Result;

use crate::{list_of, set_fields};

pub const SOLUTION: &str = "TestdataSolution";
pub const EXTENDED_SOLUTION: &str = "TestdataExtendedSolution";
pub const UNREGISTERED_SOLUTION: &str = "TestdataUnregisteredSolution";
pub const ENTITY: &str = "TestdataEntity";
pub const EXTENDED_ENTITY: &str = "TestdataExtendedEntity";
pub const UNREGISTERED_ENTITY: &str = "TestdataUnregisteredEntity";
pub const VALUE: &str = "TestdataValue";

/// Creates the testdata domain model.
pub fn testdata_model() -> Result<Arc<DomainModel>> {
    let model = DomainModel::new()
        .with_class(
            ClassDef::new(VALUE).with_field(FieldDef::new("code", TypeRef::class("String"))),
        )?
        .with_class(
            ClassDef::new(ENTITY)
                .with_field(FieldDef::new("code", TypeRef::class("String")))
                .with_field(FieldDef::new("value", TypeRef::class(VALUE)))
                .with_field(FieldDef::new("extra", TypeRef::class(ENTITY))),
        )?
        .with_class(
            ClassDef::new(EXTENDED_ENTITY)
                .extends(ENTITY)
                .with_field(FieldDef::new("sub_value", TypeRef::class(VALUE))),
        )?
        .with_class(ClassDef::new(UNREGISTERED_ENTITY).extends(ENTITY))?
        .with_class(
            ClassDef::new(SOLUTION)
                .with_field(FieldDef::new("name", TypeRef::class("String")))
                .with_field(FieldDef::deep("values", TypeRef::list(TypeRef::class(VALUE))))
                .with_field(FieldDef::deep(
                    "entities",
                    TypeRef::list(TypeRef::class(ENTITY)),
                ))
                .with_field(FieldDef::new("score", TypeRef::class("SimpleScore"))),
        )?
        .with_class(
            ClassDef::new(EXTENDED_SOLUTION)
                .extends(SOLUTION)
                .with_field(FieldDef::new("note", TypeRef::class("String"))),
        )?
        .with_class(ClassDef::new(UNREGISTERED_SOLUTION).extends(SOLUTION))?;
    Ok(Arc::new(model))
}

/// Registers `TestdataSolution` and `TestdataEntity` only.
pub fn testdata_descriptor(model: Arc<DomainModel>) -> Result<SolutionDescriptor> {
    SolutionDescriptor::builder(model, SOLUTION)
        .with_entity_class(ENTITY)
        .build()
}

/// Registers the base classes plus their extended subclasses.
pub fn extended_descriptor(model: Arc<DomainModel>) -> Result<SolutionDescriptor> {
    SolutionDescriptor::builder(model, SOLUTION)
        .with_root_subclass(EXTENDED_SOLUTION)
        .with_entity_class(ENTITY)
        .with_entity_class(EXTENDED_ENTITY)
        .build()
}

pub fn new_value(model: &DomainModel, code: &str) -> Result<ObjectRef> {
    let value = model.new_instance(VALUE)?;
    set_fields(model, &value, [("code", Value::str(code))])?;
    Ok(value)
}

/// Creates an entity of `class`, which must be `TestdataEntity` or a subclass.
pub fn new_entity(
    model: &DomainModel,
    class: &str,
    code: &str,
    value: Option<&ObjectRef>,
) -> Result<ObjectRef> {
    let entity = model.new_instance(class)?;
    set_fields(
        model,
        &entity,
        [
            ("code", Value::str(code)),
            ("value", value.cloned().map(Value::Object).unwrap_or_default()),
        ],
    )?;
    Ok(entity)
}

/// Creates a solution of `class` over the given values and entities.
pub fn new_solution(
    model: &DomainModel,
    class: &str,
    name: &str,
    values: &[ObjectRef],
    entities: &[ObjectRef],
) -> Result<ObjectRef> {
    let solution = model.new_instance(class)?;
    set_fields(
        model,
        &solution,
        [
            ("name", Value::str(name)),
            ("values", list_of(values)),
            ("entities", list_of(entities)),
            ("score", Value::opaque(0i64)),
        ],
    )?;
    Ok(solution)
}

/// Generates a solution with `value_count` values and `entity_count`
/// entities. Entity `i` uses value `i % value_count` and has entity `i - 1`
/// as its `extra`.
pub fn generate_solution(
    model: &DomainModel,
    value_count: usize,
    entity_count: usize,
) -> Result<ObjectRef> {
    let values = (0..value_count)
        .map(|i| new_value(model, &format!("v{}", i)))
        .collect::<Result<Vec<_>>>()?;
    let mut entities: Vec<ObjectRef> = Vec::with_capacity(entity_count);
    for i in 0..entity_count {
        let value = values.get(i % value_count.max(1));
        let entity = new_entity(model, ENTITY, &format!("e{}", i), value)?;
        if let Some(previous) = entities.last() {
            model.write_field(&entity, "extra", Value::Object(previous.clone()))?;
        }
        entities.push(entity);
    }
    new_solution(model, SOLUTION, "Generated solution", &values, &entities)
}
