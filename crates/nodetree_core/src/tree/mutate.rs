//! Add / get / set-field / soft-delete over cursor-addressed nodes.
//!
//! # Invariants
//! - New nodes are always appended, never inserted.
//! - A cursor that does not resolve leaves the tree unchanged.
//! - Soft delete never changes any sequence length and never cascades.

use super::resolve::{parse_cursor, resolve, resolve_mut};
use crate::model::cursor::Cursor;
use crate::model::node::{Node, FIELD_VISIBLE};
use serde_json::Value;

/// Appends `node` and returns its cursor.
///
/// With `cursor == None` the node goes to the end of the root sequence.
/// Otherwise it goes to the end of the addressed node's `children`, which is
/// created when absent. Returns `None` when `cursor` does not resolve.
pub fn add_node(nodes: &mut Vec<Node>, cursor: Option<&str>, node: Node) -> Option<Cursor> {
    let Some(text) = cursor else {
        nodes.push(node);
        return Some(Cursor::root(nodes.len() - 1));
    };

    let parent_cursor = parse_cursor(text)?;
    let children = resolve_mut(nodes, &parent_cursor)?.children_or_init();
    children.push(node);
    Some(parent_cursor.child(children.len() - 1))
}

/// Returns the node at `cursor`.
pub fn get_node<'a>(nodes: &'a [Node], cursor: &str) -> Option<&'a Node> {
    resolve(nodes, &parse_cursor(cursor)?)
}

/// Mutable counterpart of [`get_node`].
pub fn get_node_mut<'a>(nodes: &'a mut [Node], cursor: &str) -> Option<&'a mut Node> {
    resolve_mut(nodes, &parse_cursor(cursor)?)
}

/// Sets `field` to `value` on the node at `cursor`.
///
/// Returns `false` when the cursor does not resolve or a structural field is
/// given a value of the wrong JSON type.
pub fn change_node_field(nodes: &mut [Node], cursor: &str, field: &str, value: Value) -> bool {
    match get_node_mut(nodes, cursor) {
        Some(node) => node.set_field(field, value),
        None => false,
    }
}

/// Soft-deletes the node at `cursor` by setting `visible` to `0`.
///
/// Descendants keep their own `visible` value and stay reachable.
pub fn delete_node(nodes: &mut [Node], cursor: &str) -> bool {
    change_node_field(nodes, cursor, FIELD_VISIBLE, Value::from(0))
}

/// Clears the soft-delete flag of the node at `cursor`.
pub fn restore_node(nodes: &mut [Node], cursor: &str) -> bool {
    change_node_field(nodes, cursor, FIELD_VISIBLE, Value::from(1))
}

#[cfg(test)]
mod tests {
    use super::{add_node, change_node_field, delete_node, get_node, restore_node};
    use crate::model::node::Node;
    use serde_json::json;

    #[test]
    fn add_without_cursor_appends_to_root() {
        let mut nodes = vec![Node::new("note")];
        let cursor = add_node(&mut nodes, None, Node::folder()).expect("root add");
        assert_eq!(cursor.to_string(), "1");
        assert!(nodes[1].is_folder());
    }

    #[test]
    fn add_under_leaf_creates_children() {
        let mut nodes = vec![Node::new("note")];
        let child = Node::new("note").with_field("title", "child");

        let cursor = add_node(&mut nodes, Some("0"), child.clone()).expect("nested add");
        assert_eq!(cursor.to_string(), "0.0");
        assert_eq!(get_node(&nodes, "0.0"), Some(&child));

        let cursor = add_node(&mut nodes, Some("0"), Node::new("note")).expect("second add");
        assert_eq!(cursor.to_string(), "0.1");
    }

    #[test]
    fn add_under_unresolvable_cursor_is_noop() {
        let mut nodes = vec![Node::new("note")];
        let before = nodes.clone();
        assert!(add_node(&mut nodes, Some("3"), Node::new("note")).is_none());
        assert!(add_node(&mut nodes, Some("0.0"), Node::new("note")).is_none());
        assert!(add_node(&mut nodes, Some("zero"), Node::new("note")).is_none());
        assert_eq!(nodes, before);
    }

    #[test]
    fn change_field_reports_resolution() {
        let mut nodes = vec![Node::new("note")];
        assert!(change_node_field(&mut nodes, "0", "title", json!("renamed")));
        assert_eq!(nodes[0].fields.get("title"), Some(&json!("renamed")));
        assert!(!change_node_field(&mut nodes, "1", "title", json!("missing")));
    }

    #[test]
    fn delete_does_not_cascade_and_restore_revives() {
        let mut nodes = vec![Node::folder().with_child(Node::new("note"))];
        assert!(delete_node(&mut nodes, "0"));
        assert_eq!(nodes.len(), 1);
        assert!(!nodes[0].is_visible());
        assert!(get_node(&nodes, "0.0").expect("child reachable").is_visible());

        assert!(restore_node(&mut nodes, "0"));
        assert!(nodes[0].is_visible());
        assert!(!delete_node(&mut nodes, "4"));
    }
}
