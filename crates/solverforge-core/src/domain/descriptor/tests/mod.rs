//! Tests for descriptor types.


use crate::domain::{ClassDef, DomainModel, FieldDef, TypeRef};
use std::sync::Arc;

// Shared test model: a schedule with shifts assigned to employees.

pub(super) fn create_schedule_model() -> Arc<DomainModel> {
    let mut model = DomainModel::new();
    for class in [
        ClassDef::new("Schedule")
            .with_field(FieldDef::new("name", TypeRef::class("String")))
            .with_field(FieldDef::deep("shifts", TypeRef::list(TypeRef::class("Shift"))))
            .with_field(FieldDef::new(
                "employees",
                TypeRef::list(TypeRef::class("Employee")),
            )),
        ClassDef::new("ExtendedSchedule")
            .extends("Schedule")
            .with_field(FieldDef::new("note", TypeRef::class("String"))),
        ClassDef::new("Shift")
            .with_field(FieldDef::new("employee", TypeRef::class("Employee")))
            .with_field(FieldDef::new("next", TypeRef::class("Shift")).read_only()),
        ClassDef::new("NightShift").extends("Shift"),
        ClassDef::new("AbstractShift").abstract_class(),
        ClassDef::new("Employee").with_field(FieldDef::new("name", TypeRef::class("String"))),
    ] {
        model.add_class(class).unwrap();
    }
    Arc::new(model)
}
