//! Runtime values of a domain object graph.
//!
//! Composite values (objects, collections, maps, arrays) are shared handles:
//! cloning a [`Value`] copies the handle, never the target. Two handles refer
//! to the same object exactly when their [`Identity`] matches.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::model::TypeRef;

pub type ObjectRef = Arc<DomainObject>;
pub type CollectionRef = Arc<DomainCollection>;
pub type MapRef = Arc<DomainMap>;
pub type ArrayRef = Arc<DomainArray>;

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Address-based identity of a shared value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(usize);

impl Identity {
    fn of<T: ?Sized>(handle: &Arc<T>) -> Self {
        Identity(Arc::as_ptr(handle) as *const () as usize)
    }
}

/// A value stored in a field, container slot or array cell.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// Any other immutable value, shared by reference.
    Opaque(Arc<dyn Any + Send + Sync>),
    Object(ObjectRef),
    Collection(CollectionRef),
    Map(MapRef),
    Array(ArrayRef),
}

impl Value {
    pub fn str(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionRef> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Identity of composite values; `None` for leaves.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Object(o) => Some(Identity::of(o)),
            Value::Collection(c) => Some(Identity::of(c)),
            Value::Map(m) => Some(Identity::of(m)),
            Value::Array(a) => Some(Identity::of(a)),
            _ => None,
        }
    }

    /// Reference equality: shared values compare by address, scalars by value.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            (a, b) if a.identity().is_some() => a.identity() == b.identity(),
            (a, b) => a.scalar_eq(b),
        }
    }

    /// Key equality for sets and maps: strings and scalars compare by
    /// content, everything else by identity.
    pub fn key_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => self.ptr_eq(other),
        }
    }

    fn scalar_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<CollectionRef> for Value {
    fn from(collection: CollectionRef) -> Self {
        Value::Collection(collection)
    }
}

impl From<MapRef> for Value {
    fn from(map: MapRef) -> Self {
        Value::Map(map)
    }
}

impl From<ArrayRef> for Value {
    fn from(array: ArrayRef) -> Self {
        Value::Array(array)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl fmt::Debug for Value {
    // Composites print their handle only; graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Opaque(_) => write!(f, "Opaque"),
            Value::Object(o) => write!(f, "Object({}@{:p})", o.class_name(), Arc::as_ptr(o)),
            Value::Collection(c) => write!(f, "Collection({:?}, len={})", c.kind(), c.len()),
            Value::Map(m) => write!(f, "Map({:?}, len={})", m.kind(), m.len()),
            Value::Array(a) => write!(f, "Array({}, len={})", a.component(), a.len()),
        }
    }
}

/// An instance of a domain class with slot-addressed fields.
pub struct DomainObject {
    class: Arc<str>,
    slots: RwLock<Vec<Value>>,
}

impl DomainObject {
    /// Creates an instance with every slot set to `Null`.
    pub fn new(class: Arc<str>, slot_count: usize) -> ObjectRef {
        Arc::new(Self {
            class,
            slots: RwLock::new(vec![Value::Null; slot_count]),
        })
    }

    pub fn class(&self) -> &Arc<str> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class
    }

    pub fn slot_count(&self) -> usize {
        read_lock(&self.slots).len()
    }

    /// Reads a slot; out-of-range slots read as `Null`.
    pub fn get(&self, slot: usize) -> Value {
        read_lock(&self.slots).get(slot).cloned().unwrap_or_default()
    }

    /// Writes a slot. Returns false if the slot does not exist.
    pub fn set(&self, slot: usize, value: Value) -> bool {
        match write_lock(&self.slots).get_mut(slot) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Copies the current slot values out in slot order.
    pub fn snapshot(&self) -> Vec<Value> {
        read_lock(&self.slots).clone()
    }
}

impl fmt::Debug for DomainObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainObject")
            .field("class", &self.class)
            .field("slots", &self.slot_count())
            .finish()
    }
}

/// Ordering used by sorted sets and sorted maps.
pub trait ValueComparator: Send + Sync {
    fn compare(&self, a: &Value, b: &Value) -> Ordering;
}

impl<F> ValueComparator for F
where
    F: Fn(&Value, &Value) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self(a, b)
    }
}

pub type SharedComparator = Arc<dyn ValueComparator>;

/// Category of a collection.
#[derive(Clone)]
pub enum CollectionKind {
    List,
    /// Set iterating in insertion order.
    LinkedSet,
    /// Set without a guaranteed iteration order.
    HashSet,
    /// Set kept in comparator order.
    SortedSet(SharedComparator),
    /// Double-ended queue.
    Deque,
}

impl CollectionKind {
    pub fn comparator(&self) -> Option<&SharedComparator> {
        match self {
            CollectionKind::SortedSet(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Debug for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::List => write!(f, "List"),
            CollectionKind::LinkedSet => write!(f, "LinkedSet"),
            CollectionKind::HashSet => write!(f, "HashSet"),
            CollectionKind::SortedSet(c) => write!(f, "SortedSet({:p})", Arc::as_ptr(c)),
            CollectionKind::Deque => write!(f, "Deque"),
        }
    }
}

/// A list, set or queue of values.
pub struct DomainCollection {
    kind: CollectionKind,
    items: RwLock<Vec<Value>>,
}

impl DomainCollection {
    pub fn new(kind: CollectionKind) -> CollectionRef {
        Self::with_capacity(kind, 0)
    }

    pub fn with_capacity(kind: CollectionKind, capacity: usize) -> CollectionRef {
        Arc::new(Self {
            kind,
            items: RwLock::new(Vec::with_capacity(capacity)),
        })
    }

    /// Creates a collection and adds every value with set semantics applied.
    pub fn from_values(kind: CollectionKind, values: impl IntoIterator<Item = Value>) -> CollectionRef {
        let collection = Self::new(kind);
        for value in values {
            collection.add(value);
        }
        collection
    }

    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    pub fn len(&self) -> usize {
        read_lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        read_lock(&self.items).get(index).cloned()
    }

    /// Copies the current elements out in iteration order.
    pub fn snapshot(&self) -> Vec<Value> {
        read_lock(&self.items).clone()
    }

    /// Adds a value. Sets reject duplicates and return false.
    pub fn add(&self, value: Value) -> bool {
        let mut items = write_lock(&self.items);
        match &self.kind {
            CollectionKind::List | CollectionKind::Deque => {
                items.push(value);
                true
            }
            CollectionKind::LinkedSet | CollectionKind::HashSet => {
                if items.iter().any(|v| v.key_eq(&value)) {
                    return false;
                }
                items.push(value);
                true
            }
            CollectionKind::SortedSet(comparator) => {
                match items.binary_search_by(|probe| comparator.compare(probe, &value)) {
                    Ok(_) => false,
                    Err(pos) => {
                        items.insert(pos, value);
                        true
                    }
                }
            }
        }
    }

    /// Appends values as given, without duplicate checks or reordering.
    ///
    /// The caller must supply values that already satisfy the collection's
    /// ordering and uniqueness, such as clones of another collection's
    /// elements taken in that collection's iteration order.
    pub fn extend_in_order(&self, values: impl IntoIterator<Item = Value>) {
        write_lock(&self.items).extend(values);
    }

    /// Removes the first element equal to `value` by key equality.
    pub fn remove(&self, value: &Value) -> bool {
        let mut items = write_lock(&self.items);
        match items.iter().position(|v| v.key_eq(value)) {
            Some(pos) => {
                items.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for DomainCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainCollection")
            .field("kind", &self.kind)
            .field("len", &self.len())
            .finish()
    }
}

/// Category of a map.
#[derive(Clone)]
pub enum MapKind {
    Hash,
    /// Map iterating in insertion order.
    Linked,
    /// Map safe for concurrent modification.
    Concurrent,
    /// Map kept in key comparator order.
    Sorted(SharedComparator),
    /// A read-only view; it has no constructor of its own.
    ReadOnly { concurrent: bool },
}

impl MapKind {
    /// Returns true if an empty map of this kind can be constructed.
    pub fn is_constructible(&self) -> bool {
        !matches!(self, MapKind::ReadOnly { .. })
    }

    pub fn is_concurrent(&self) -> bool {
        matches!(
            self,
            MapKind::Concurrent | MapKind::ReadOnly { concurrent: true }
        )
    }
}

impl fmt::Debug for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::Hash => write!(f, "Hash"),
            MapKind::Linked => write!(f, "Linked"),
            MapKind::Concurrent => write!(f, "Concurrent"),
            MapKind::Sorted(c) => write!(f, "Sorted({:p})", Arc::as_ptr(c)),
            MapKind::ReadOnly { concurrent } => {
                write!(f, "ReadOnly {{ concurrent: {} }}", concurrent)
            }
        }
    }
}

/// A key-value mapping.
pub struct DomainMap {
    kind: MapKind,
    entries: RwLock<Vec<(Value, Value)>>,
}

impl DomainMap {
    pub fn new(kind: MapKind) -> MapRef {
        Self::with_capacity(kind, 0)
    }

    pub fn with_capacity(kind: MapKind, capacity: usize) -> MapRef {
        Arc::new(Self {
            kind,
            entries: RwLock::new(Vec::with_capacity(capacity)),
        })
    }

    /// Creates a map from entries, later keys overwriting earlier ones.
    pub fn from_entries(
        kind: MapKind,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> MapRef {
        let map = Self::new(kind);
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    pub fn kind(&self) -> &MapKind {
        &self.kind
    }

    pub fn len(&self) -> usize {
        read_lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the current entries out in iteration order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        read_lock(&self.entries).clone()
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        let entries = read_lock(&self.entries);
        match &self.kind {
            MapKind::Sorted(comparator) => entries
                .binary_search_by(|(k, _)| comparator.compare(k, key))
                .ok()
                .map(|pos| entries[pos].1.clone()),
            _ => entries
                .iter()
                .find(|(k, _)| k.key_eq(key))
                .map(|(_, v)| v.clone()),
        }
    }

    /// Inserts an entry, returning the value previously stored under `key`.
    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        let mut entries = write_lock(&self.entries);
        let position = match &self.kind {
            MapKind::Sorted(comparator) => {
                entries.binary_search_by(|(k, _)| comparator.compare(k, &key))
            }
            _ => entries
                .iter()
                .position(|(k, _)| k.key_eq(&key))
                .ok_or(entries.len()),
        };
        match position {
            Ok(pos) => Some(std::mem::replace(&mut entries[pos].1, value)),
            Err(pos) => {
                entries.insert(pos, (key, value));
                None
            }
        }
    }

    /// Appends entries as given, without key checks or reordering.
    ///
    /// Same contract as [`DomainCollection::extend_in_order`].
    pub fn extend_in_order(&self, entries: impl IntoIterator<Item = (Value, Value)>) {
        write_lock(&self.entries).extend(entries);
    }
}

impl fmt::Debug for DomainMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainMap")
            .field("kind", &self.kind)
            .field("len", &self.len())
            .finish()
    }
}

/// A fixed-length array.
pub struct DomainArray {
    component: TypeRef,
    items: RwLock<Vec<Value>>,
}

impl DomainArray {
    /// Creates an array of `len` nulls.
    pub fn new(component: TypeRef, len: usize) -> ArrayRef {
        Arc::new(Self {
            component,
            items: RwLock::new(vec![Value::Null; len]),
        })
    }

    pub fn from_values(component: TypeRef, values: Vec<Value>) -> ArrayRef {
        Arc::new(Self {
            component,
            items: RwLock::new(values),
        })
    }

    pub fn component(&self) -> &TypeRef {
        &self.component
    }

    pub fn len(&self) -> usize {
        read_lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        read_lock(&self.items).get(index).cloned()
    }

    /// Writes a cell. Returns false if the index is out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match write_lock(&self.items).get_mut(index) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Vec<Value> {
        read_lock(&self.items).clone()
    }
}

impl fmt::Debug for DomainArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainArray")
            .field("component", &self.component)
            .field("len", &self.len())
            .finish()
    }
}
