use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::{
    CollectionKind, DomainArray, DomainCollection, DomainMap, DomainObject, MapKind,
    SharedComparator, TypeRef, Value, ValueComparator,
};

fn by_int() -> SharedComparator {
    Arc::new(|a: &Value, b: &Value| a.as_int().cmp(&b.as_int()))
}

#[test]
fn test_ptr_eq_distinguishes_equal_strings() {
    let a = Value::str("x");
    let b = Value::str("x");
    assert!(a.ptr_eq(&a.clone()));
    assert!(!a.ptr_eq(&b));
    assert!(a.key_eq(&b));
}

#[test]
fn test_ptr_eq_on_objects_and_scalars() {
    let o1 = DomainObject::new("A".into(), 0);
    let o2 = DomainObject::new("A".into(), 0);
    assert!(Value::Object(o1.clone()).ptr_eq(&Value::Object(o1.clone())));
    assert!(!Value::Object(o1).ptr_eq(&Value::Object(o2)));
    assert!(Value::Int(3).ptr_eq(&Value::Int(3)));
    assert!(Value::Null.ptr_eq(&Value::Null));
    assert!(!Value::Int(3).ptr_eq(&Value::Bool(true)));
}

#[test]
fn test_identity_only_for_composites() {
    assert!(Value::str("s").identity().is_none());
    assert!(Value::Int(1).identity().is_none());
    let list = DomainCollection::new(CollectionKind::List);
    assert!(Value::Collection(list).identity().is_some());
}

#[test]
fn test_object_slots() {
    let o = DomainObject::new("A".into(), 2);
    assert!(o.get(0).is_null());
    assert!(o.set(1, Value::Int(5)));
    assert_eq!(o.get(1).as_int(), Some(5));
    assert!(!o.set(2, Value::Int(5)));
    assert!(o.get(7).is_null());
}

#[test]
fn test_list_allows_duplicates() {
    let list = DomainCollection::new(CollectionKind::List);
    assert!(list.add(Value::Int(1)));
    assert!(list.add(Value::Int(1)));
    assert_eq!(list.len(), 2);
}

#[test]
fn test_linked_set_rejects_duplicates_and_keeps_insertion_order() {
    let set = DomainCollection::from_values(
        CollectionKind::LinkedSet,
        vec![Value::Int(3), Value::Int(1), Value::Int(3), Value::Int(2)],
    );
    let items: Vec<i64> = set.snapshot().iter().filter_map(Value::as_int).collect();
    assert_eq!(items, vec![3, 1, 2]);
}

#[test]
fn test_sorted_set_orders_by_comparator() {
    let set = DomainCollection::from_values(
        CollectionKind::SortedSet(by_int()),
        vec![Value::Int(3), Value::Int(1), Value::Int(2), Value::Int(1)],
    );
    let items: Vec<i64> = set.snapshot().iter().filter_map(Value::as_int).collect();
    assert_eq!(items, vec![1, 2, 3]);
}

#[test]
fn test_collection_remove() {
    let set = DomainCollection::from_values(
        CollectionKind::HashSet,
        vec![Value::str("a"), Value::str("b")],
    );
    assert!(set.remove(&Value::str("a")));
    assert!(!set.remove(&Value::str("a")));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_map_insert_replaces_existing_key() {
    let map = DomainMap::new(MapKind::Linked);
    assert!(map.insert(Value::str("k"), Value::Int(1)).is_none());
    assert!(map.insert(Value::str("j"), Value::Int(2)).is_none());
    let previous = map.insert(Value::str("k"), Value::Int(3));
    assert_eq!(previous.and_then(|v| v.as_int()), Some(1));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Value::str("k")).and_then(|v| v.as_int()), Some(3));
    let keys: Vec<String> = map
        .entries()
        .iter()
        .filter_map(|(k, _)| k.as_str().map(String::from))
        .collect();
    assert_eq!(keys, vec!["k", "j"]);
}

#[test]
fn test_sorted_map_orders_keys() {
    let map = DomainMap::from_entries(
        MapKind::Sorted(by_int()),
        vec![
            (Value::Int(5), Value::str("five")),
            (Value::Int(1), Value::str("one")),
        ],
    );
    let keys: Vec<i64> = map.entries().iter().filter_map(|(k, _)| k.as_int()).collect();
    assert_eq!(keys, vec![1, 5]);
    assert_eq!(
        map.get(&Value::Int(5)).and_then(|v| v.as_str().map(String::from)),
        Some("five".to_string())
    );
}

#[test]
fn test_map_kind_constructibility() {
    assert!(MapKind::Hash.is_constructible());
    assert!(!MapKind::ReadOnly { concurrent: false }.is_constructible());
    assert!(MapKind::ReadOnly { concurrent: true }.is_concurrent());
    assert!(!MapKind::Linked.is_concurrent());
}

#[test]
fn test_array_is_fixed_length() {
    let array = DomainArray::new(TypeRef::class("Visit"), 3);
    assert_eq!(array.len(), 3);
    assert!(array.set(2, Value::Int(9)));
    assert!(!array.set(3, Value::Int(9)));
    assert_eq!(array.get(2).and_then(|v| v.as_int()), Some(9));
    assert_eq!(array.component(), &TypeRef::class("Visit"));
}

#[test]
fn test_comparator_ordering() {
    let c = by_int();
    assert_eq!(c.compare(&Value::Int(1), &Value::Int(2)), Ordering::Less);
}
