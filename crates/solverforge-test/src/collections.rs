//! Container fixtures: maps keyed by entities, sorted sets and arrays.

use std::cmp::Ordering;
use std::sync::Arc;

use solverforge_core::domain::{
    ClassDef, CollectionKind, DomainArray, DomainCollection, DomainMap, DomainModel, FieldDef,
    MapKind, ObjectRef, SharedComparator, SolutionDescriptor, TypeRef, Value,
};
use solverforge_core::Result;

use crate::{list_of, set_fields};

pub const SOLUTION: &str = "CollectionsSolution";
pub const TASK: &str = "Task";
pub const TAG: &str = "Tag";

/// Creates the collections domain model.
pub fn collections_model() -> Result<Arc<DomainModel>> {
    let task = TypeRef::class(TASK);
    let model = DomainModel::new()
        .with_class(
            ClassDef::new(TAG).with_field(FieldDef::new("label", TypeRef::class("String"))),
        )?
        .with_class(
            ClassDef::new(TASK)
                .with_field(FieldDef::new("name", TypeRef::class("String")))
                .with_field(FieldDef::new("tag", TypeRef::class(TAG))),
        )?
        .with_class(
            ClassDef::new(SOLUTION)
                .with_field(FieldDef::deep("tasks", TypeRef::list(task.clone())))
                .with_field(FieldDef::deep("tags", TypeRef::list(TypeRef::class(TAG))))
                .with_field(FieldDef::deep(
                    "task_by_name",
                    TypeRef::map(TypeRef::class("String"), task.clone()),
                ))
                .with_field(FieldDef::deep(
                    "task_weights",
                    TypeRef::map(task.clone(), TypeRef::class("Integer")),
                ))
                .with_field(FieldDef::deep("ordered_tasks", TypeRef::set(task.clone())))
                .with_field(FieldDef::deep("task_array", TypeRef::array(task.clone())))
                .with_field(FieldDef::deep(
                    "read_only_index",
                    TypeRef::map(TypeRef::class("String"), task),
                )),
        )?;
    Ok(Arc::new(model))
}

pub fn collections_descriptor(model: Arc<DomainModel>) -> Result<SolutionDescriptor> {
    SolutionDescriptor::builder(model, SOLUTION)
        .with_entity_class(TASK)
        .build()
}

/// Orders tasks by descending name. Slot 0 of a task holds its name.
pub fn by_name_descending() -> SharedComparator {
    Arc::new(|a: &Value, b: &Value| -> Ordering {
        let name = |v: &Value| {
            v.as_object()
                .map(|o| o.get(0))
                .and_then(|n| n.as_str().map(String::from))
        };
        name(b).cmp(&name(a))
    })
}

/// Builds a solution with `task_count` tasks, each tagged with one of two
/// shared tags, and every container member populated from those tasks.
///
/// `read_only_index` holds a read-only concurrent view.
pub fn build_collections_solution(model: &DomainModel, task_count: usize) -> Result<ObjectRef> {
    let tags = ["urgent", "routine"]
        .iter()
        .map(|label| -> Result<ObjectRef> {
            let tag = model.new_instance(TAG)?;
            set_fields(model, &tag, [("label", Value::str(*label))])?;
            Ok(tag)
        })
        .collect::<Result<Vec<_>>>()?;

    let tasks = (0..task_count)
        .map(|i| -> Result<ObjectRef> {
            let task = model.new_instance(TASK)?;
            set_fields(
                model,
                &task,
                [
                    ("name", Value::str(format!("t{}", i))),
                    ("tag", Value::Object(tags[i % tags.len()].clone())),
                ],
            )?;
            Ok(task)
        })
        .collect::<Result<Vec<_>>>()?;

    let task_values = || tasks.iter().cloned().map(Value::Object);
    let task_by_name = DomainMap::from_entries(
        MapKind::Linked,
        tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (Value::str(format!("t{}", i)), Value::Object(t.clone()))),
    );
    let task_weights = DomainMap::from_entries(
        MapKind::Hash,
        task_values().enumerate().map(|(i, t)| (t, Value::Int(i as i64))),
    );
    let ordered_tasks = DomainCollection::from_values(
        CollectionKind::SortedSet(by_name_descending()),
        task_values(),
    );
    let task_array = DomainArray::from_values(TypeRef::class(TASK), task_values().collect());
    let read_only_index = DomainMap::from_entries(
        MapKind::ReadOnly { concurrent: true },
        tasks
            .iter()
            .take(1)
            .map(|t| (Value::str("first"), Value::Object(t.clone()))),
    );

    let solution = model.new_instance(SOLUTION)?;
    set_fields(
        model,
        &solution,
        [
            ("tasks", list_of(&tasks)),
            ("tags", list_of(&tags)),
            ("task_by_name", Value::Map(task_by_name)),
            ("task_weights", Value::Map(task_weights)),
            ("ordered_tasks", Value::Collection(ordered_tasks)),
            ("task_array", Value::Array(task_array)),
            ("read_only_index", Value::Map(read_only_index)),
        ],
    )?;
    Ok(solution)
}
