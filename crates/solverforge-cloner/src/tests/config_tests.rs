use std::sync::Arc;

use solverforge_config::{EnvironmentMode, SolverConfig};
use solverforge_core::domain::{
    ClassDef, DomainModel, FieldDef, MemberCategory, MemberDescriptor, SolutionDescriptor,
    TypeRef, Value,
};
use solverforge_core::SolverForgeError;
use solverforge_test::testdata::{self, new_entity, new_solution, testdata_model};
use solverforge_test::{list_of, set_fields};

use super::*;

#[test]
fn test_from_config_registers_named_classes() {
    let model = testdata_model().unwrap();
    let config = SolverConfig::from_toml_str(
        r#"
        environment_mode = "full_assert"
        solution_class = "TestdataSolution"
        entity_class_list = ["TestdataEntity", "TestdataExtendedEntity"]

        [solution_cloner]
        known_solution_subclasses = ["TestdataExtendedSolution"]
    "#,
    )
    .unwrap();

    let cloner = SolutionCloner::from_config(&config, model.clone()).unwrap();
    assert_eq!(cloner.environment_mode(), EnvironmentMode::FullAssert);
    assert_eq!(cloner.registry().entity_classes().len(), 2);

    let entity = new_entity(&model, testdata::EXTENDED_ENTITY, "e", None).unwrap();
    let solution =
        new_solution(&model, testdata::EXTENDED_SOLUTION, "x", &[], &[entity]).unwrap();
    let clone = cloner.clone_solution(&solution).unwrap();
    assert_eq!(clone.class_name(), testdata::EXTENDED_SOLUTION);
}

#[test]
fn test_from_config_requires_solution_class() {
    let model = testdata_model().unwrap();
    let config = SolverConfig::new().with_entity_class("TestdataEntity");
    let err = SolutionCloner::from_config(&config, model).unwrap_err();
    assert!(matches!(err, SolverForgeError::Config(_)));
    assert!(err.to_string().contains("solution_class"));
}

#[test]
fn test_from_config_rejects_undefined_class() {
    let model = testdata_model().unwrap();
    let config = SolverConfig::new()
        .with_solution_class("TestdataSolution")
        .with_entity_class("Missing");
    let err = SolutionCloner::from_config(&config, model).unwrap_err();
    assert!(matches!(err, SolverForgeError::DomainModel(_)));
}

#[test]
fn test_from_config_rejects_blank_names() {
    let model = testdata_model().unwrap();
    let config = SolverConfig::new()
        .with_solution_class("TestdataSolution")
        .with_known_solution_subclass(" ");
    let err = SolutionCloner::from_config(&config, model).unwrap_err();
    assert!(matches!(err, SolverForgeError::Config(_)));
}

/// `extra` declared with a type that cannot hold an entity: the clone keeps
/// pointing at the original entity.
fn leaky_descriptor(model: Arc<DomainModel>) -> SolutionDescriptor {
    let layout_slot = |name| model.slot_of(testdata::ENTITY, name).unwrap();
    let members = vec![
        MemberDescriptor::slot(
            "code",
            testdata::ENTITY,
            TypeRef::class("String"),
            MemberCategory::Shallow,
            layout_slot("code"),
        ),
        MemberDescriptor::slot(
            "extra",
            testdata::ENTITY,
            TypeRef::class("Unrelated"),
            MemberCategory::Shallow,
            layout_slot("extra"),
        ),
    ];
    SolutionDescriptor::builder(model.clone(), testdata::SOLUTION)
        .with_entity_class(testdata::ENTITY)
        .with_members(testdata::ENTITY, members)
        .build()
        .unwrap()
}

fn leaky_solution(model: &DomainModel) -> (ObjectRef, ObjectRef) {
    let first = new_entity(model, testdata::ENTITY, "first", None).unwrap();
    let second = new_entity(model, testdata::ENTITY, "second", None).unwrap();
    model
        .write_field(&second, "extra", Value::Object(first.clone()))
        .unwrap();
    let solution = new_solution(model, testdata::SOLUTION, "x", &[], &[first.clone(), second])
        .unwrap();
    (solution, first)
}

#[test]
fn test_asserted_mode_detects_original_references() {
    let model = testdata_model().unwrap();
    let cloner = cloner_for(leaky_descriptor(model.clone()))
        .with_environment_mode(EnvironmentMode::FastAssert);
    let (solution, _) = leaky_solution(&model);

    let err = cloner.clone_solution(&solution).unwrap_err();
    assert!(matches!(err, SolverForgeError::CloneIntegrity(_)));
}

#[test]
fn test_non_asserted_mode_skips_verification() {
    let model = testdata_model().unwrap();
    let cloner = cloner_for(leaky_descriptor(model.clone()));
    let (solution, first) = leaky_solution(&model);

    let clone = cloner.clone_solution(&solution).unwrap();
    let second = objects(&field(&model, &clone, "entities"))[1].clone();
    assert!(Arc::ptr_eq(&object_field(&model, &second, "extra"), &first));
}

#[test]
fn test_asserted_mode_accepts_sound_clone() {
    let model = testdata_model().unwrap();
    let cloner = cloner_for(testdata::testdata_descriptor(model.clone()).unwrap())
        .with_environment_mode(EnvironmentMode::FullAssert);
    let solution = testdata::generate_solution(&model, 2, 4).unwrap();
    assert!(cloner.clone_solution(&solution).is_ok());
}

/// `Lesson.rooms` and `Lesson.siblings` are shallow aliases of the
/// timetable's deep `rooms` and `lessons` lists.
fn aliasing_timetable() -> (Arc<DomainModel>, ObjectRef) {
    let model = DomainModel::new()
        .with_class(ClassDef::new("Room").with_field(FieldDef::new("name", TypeRef::class("String"))))
        .and_then(|m| {
            m.with_class(
                ClassDef::new("Lesson")
                    .with_field(FieldDef::new("rooms", TypeRef::list(TypeRef::class("Room"))))
                    .with_field(FieldDef::new("siblings", TypeRef::RawCollection)),
            )
        })
        .and_then(|m| {
            m.with_class(
                ClassDef::new("Timetable")
                    .with_field(FieldDef::deep("rooms", TypeRef::list(TypeRef::class("Room"))))
                    .with_field(FieldDef::deep(
                        "lessons",
                        TypeRef::list(TypeRef::class("Lesson")),
                    )),
            )
        })
        .map(Arc::new)
        .unwrap();

    let room = model.new_instance("Room").unwrap();
    model.write_field(&room, "name", Value::str("A1")).unwrap();
    let rooms = list_of(&[room]);
    let lesson = model.new_instance("Lesson").unwrap();
    let lessons = list_of(&[lesson.clone()]);
    let timetable = model.new_instance("Timetable").unwrap();
    set_fields(&model, &timetable, [("rooms", rooms.clone()), ("lessons", lessons)]).unwrap();
    set_fields(&model, &lesson, [("rooms", rooms)]).unwrap();
    (model, timetable)
}

fn timetable_cloner(model: Arc<DomainModel>) -> SolutionCloner {
    cloner_for(
        SolutionDescriptor::builder(model, "Timetable")
            .with_entity_class("Lesson")
            .build()
            .unwrap(),
    )
    .with_environment_mode(EnvironmentMode::FullAssert)
}

#[test]
fn test_asserted_mode_accepts_shared_fact_container() {
    let (model, timetable) = aliasing_timetable();
    let cloner = timetable_cloner(model.clone());

    let clone = cloner.clone_solution(&timetable).unwrap();
    let lesson = objects(&field(&model, &clone, "lessons"))[0].clone();
    assert!(field(&model, &lesson, "rooms").ptr_eq(&field(&model, &timetable, "rooms")));
}

#[test]
fn test_asserted_mode_rejects_container_of_original_entities() {
    let (model, timetable) = aliasing_timetable();
    let lessons = field(&model, &timetable, "lessons");
    let lesson = objects(&lessons)[0].clone();
    set_fields(&model, &lesson, [("siblings", lessons)]).unwrap();
    let cloner = timetable_cloner(model);

    let err = cloner.clone_solution(&timetable).unwrap_err();
    assert!(matches!(err, SolverForgeError::CloneIntegrity(_)));
}
