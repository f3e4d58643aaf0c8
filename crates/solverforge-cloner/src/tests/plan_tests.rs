use std::sync::Arc;

use solverforge_core::domain::{
    ClassDef, DomainModel, FieldDef, MemberCategory, MemberDescriptor, SlotAccessor,
    SolutionDescriptor, TypeRef,
};
use solverforge_core::{Result, SolverForgeError};
use solverforge_test::testdata::{self, generate_solution, testdata_model};

use super::*;

fn plan_model(extra_fields: Vec<FieldDef>) -> Arc<DomainModel> {
    let mut entity =
        ClassDef::new("Lesson").with_field(FieldDef::new("room", TypeRef::class("Room")));
    for field in extra_fields {
        entity = entity.with_field(field);
    }
    let model = DomainModel::new()
        .with_class(entity)
        .and_then(|m| {
            m.with_class(ClassDef::new("Timetable").with_field(FieldDef::deep(
                "lessons",
                TypeRef::list(TypeRef::class("Lesson")),
            )))
        })
        .unwrap();
    Arc::new(model)
}

fn compile(model: Arc<DomainModel>) -> Result<SolutionCloner> {
    let descriptor = SolutionDescriptor::builder(model, "Timetable")
        .with_entity_class("Lesson")
        .build()?;
    SolutionCloner::new(Arc::new(descriptor))
}

#[test]
fn test_entity_typed_member_without_setter_is_rejected() {
    let model = plan_model(vec![FieldDef::new("next", TypeRef::class("Lesson")).read_only()]);
    let err = compile(model).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The member (next) of class (Lesson) does not have a setter."
    );
}

#[test]
fn test_deep_member_without_setter_is_rejected() {
    let model = plan_model(vec![
        FieldDef::deep("history", TypeRef::list(TypeRef::class("Room"))).read_only(),
    ]);
    let err = compile(model).unwrap_err();
    match err {
        SolverForgeError::MissingWriteAccessor {
            member,
            declaring_class,
        } => {
            assert_eq!(member, "history");
            assert_eq!(declaring_class, "Lesson");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_read_only_shallow_member_is_rejected() {
    let model = plan_model(vec![FieldDef::new("label", TypeRef::class("String")).read_only()]);
    let err = compile(model).unwrap_err();
    match err {
        SolverForgeError::MissingWriteAccessor {
            member,
            declaring_class,
        } => {
            assert_eq!(member, "label");
            assert_eq!(declaring_class, "Lesson");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_raw_deep_collection_is_rejected() {
    let model = plan_model(vec![FieldDef::deep("things", TypeRef::RawCollection)]);
    let err = compile(model).unwrap_err();
    assert!(matches!(err, SolverForgeError::UnresolvableElementType { .. }));
    assert!(err.to_string().starts_with("Cannot infer element type"));
}

#[test]
fn test_nested_raw_map_is_rejected() {
    let model = plan_model(vec![FieldDef::deep(
        "index",
        TypeRef::map(TypeRef::class("String"), TypeRef::list(TypeRef::RawMap)),
    )]);
    let err = compile(model).unwrap_err();
    assert!(err.to_string().contains("Map<String, List<Map>>"));
}

#[test]
fn test_raw_shallow_collection_is_copied() {
    let model = plan_model(vec![FieldDef::new("notes", TypeRef::RawCollection)]);
    assert!(compile(model).is_ok());
}

#[test]
fn test_overridden_members_drive_cloning() {
    let model = testdata_model().unwrap();
    let code_slot = model.slot_of(testdata::ENTITY, "code").unwrap();
    let extra_slot = model.slot_of(testdata::ENTITY, "extra").unwrap();
    let descriptor = SolutionDescriptor::builder(model.clone(), testdata::SOLUTION)
        .with_entity_class(testdata::ENTITY)
        .with_members(
            testdata::ENTITY,
            vec![
                MemberDescriptor::slot(
                    "code",
                    testdata::ENTITY,
                    TypeRef::class("String"),
                    MemberCategory::Shallow,
                    code_slot,
                ),
                MemberDescriptor::new(
                    "extra",
                    testdata::ENTITY,
                    TypeRef::class(testdata::ENTITY),
                    MemberCategory::Shallow,
                    Box::new(SlotAccessor::new(extra_slot)),
                ),
            ],
        )
        .build()
        .unwrap();
    let err = SolutionCloner::new(Arc::new(descriptor)).unwrap_err();
    assert!(matches!(err, SolverForgeError::MissingWriteAccessor { .. }));

    let cloner = cloner_for(testdata::testdata_descriptor(model.clone()).unwrap());
    assert!(cloner.clone_solution(&generate_solution(&model, 1, 1).unwrap()).is_ok());
}

#[test]
fn test_cloned_cloner_shares_plan() {
    let model = testdata_model().unwrap();
    let cloner = cloner_for(testdata::testdata_descriptor(model.clone()).unwrap());
    let copy = cloner.clone();
    assert!(copy.shares_plan_with(&cloner));

    let other = cloner_for(testdata::testdata_descriptor(model).unwrap());
    assert!(!other.shares_plan_with(&cloner));
}
