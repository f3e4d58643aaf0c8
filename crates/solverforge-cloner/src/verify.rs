//! Post-clone integrity check for asserting environment modes.

use std::collections::HashSet;

use solverforge_core::domain::{ObjectRef, Value};
use solverforge_core::{Result, SolverForgeError};

use crate::session::CloneSession;

fn children(value: &Value) -> Vec<Value> {
    match value {
        Value::Object(object) => object.snapshot(),
        Value::Collection(collection) => collection.snapshot(),
        Value::Array(array) => array.snapshot(),
        Value::Map(map) => map
            .entries()
            .into_iter()
            .flat_map(|(k, v)| [k, v])
            .collect(),
        _ => Vec::new(),
    }
}

/// Returns true if `value` is an original object that this session cloned,
/// or an original container that reaches one through nested containers.
fn leaks_original(value: &Value, session: &CloneSession) -> bool {
    if !session.is_cloned_original(value) {
        return false;
    }
    if matches!(value, Value::Object(_)) {
        return true;
    }
    let mut visited = HashSet::new();
    let mut stack = vec![value.clone()];
    while let Some(container) = stack.pop() {
        let Some(identity) = container.identity() else {
            continue;
        };
        if !visited.insert(identity) {
            continue;
        }
        for child in children(&container) {
            match child {
                Value::Object(_) if session.is_cloned_original(&child) => return true,
                Value::Object(_) => {}
                _ => stack.push(child),
            }
        }
    }
    false
}

/// Walks every clone reachable from `root` and fails if one of them still
/// references an original object that this session cloned, directly or
/// through an original container.
///
/// An original container that only holds shared problem facts is not a
/// leak. Values that are not clones are not descended into.
pub(crate) fn verify_clone(root: &ObjectRef, session: &CloneSession) -> Result<usize> {
    let mut visited = HashSet::new();
    let mut stack = vec![Value::Object(root.clone())];
    while let Some(value) = stack.pop() {
        let Some(identity) = value.identity() else {
            continue;
        };
        if !visited.insert(identity) {
            continue;
        }
        for child in children(&value) {
            if leaks_original(&child, session) {
                return Err(SolverForgeError::CloneIntegrity(format!(
                    "The clone {:?} references the original {:?} instead of its clone.",
                    value, child
                )));
            }
            if session.is_clone(&child) {
                stack.push(child);
            }
        }
    }
    Ok(visited.len())
}
