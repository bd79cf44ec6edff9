//! Required-field validation over node sequences.
//!
//! # Responsibility
//! - Check that every node, descendants included, carries a set of keys.
//! - Apply an explicit policy to `children` values that are not sequences.
//!
//! # Invariants
//! - An absent or `null` sequence is vacuously valid.
//! - A key whose value is `null` counts as present; only a missing key fails.
//! - Absent `children` is a leaf and always passes.

use crate::model::node::FIELD_CHILDREN;
use serde_json::Value;

/// How the validator treats a `children` value that is present but not an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// When `true`, a malformed subtree (null, object, scalar) passes.
    /// When `false`, it fails validation.
    pub tolerate_malformed_children: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            tolerate_malformed_children: true,
        }
    }
}

/// Returns whether every node in raw JSON `nodes` has all `required` keys.
///
/// `nodes` is typically the freshly parsed content of an import file. A
/// top-level value that is not an array is judged like a malformed `children`
/// value; `null` passes under both policies.
pub fn all_fields_present<S: AsRef<str>>(
    nodes: &Value,
    required: &[S],
    policy: ValidationPolicy,
) -> bool {
    match nodes {
        Value::Null => true,
        Value::Array(items) => items
            .iter()
            .all(|item| node_value_has_fields(item, required, policy)),
        _ => policy.tolerate_malformed_children,
    }
}

fn node_value_has_fields<S: AsRef<str>>(
    node: &Value,
    required: &[S],
    policy: ValidationPolicy,
) -> bool {
    let Some(object) = node.as_object() else {
        return required.is_empty();
    };
    if !required
        .iter()
        .all(|field| object.contains_key(field.as_ref()))
    {
        return false;
    }

    match object.get(FIELD_CHILDREN) {
        None => true,
        Some(Value::Array(children)) => children
            .iter()
            .all(|child| node_value_has_fields(child, required, policy)),
        Some(_) => policy.tolerate_malformed_children,
    }
}
