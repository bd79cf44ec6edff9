//! Swap-based reordering.
//!
//! # Responsibility
//! - Move a node among its siblings (backward/forward).
//! - Move a node one nesting level out (upward) or into the next folder
//!   sibling (downward).
//!
//! # Invariants
//! - No move renumbers a slot it does not touch, so every uninvolved cursor
//!   keeps addressing the same logical slot.
//! - Invisible siblings are never partners or destinations.
//! - Searches never wrap around either end of the sibling sequence.
//! - Every failure is a no-op returning `false`.

use super::resolve::{parse_cursor, resolve_siblings_mut};
use super::swap::swap_slots;
use crate::model::node::Node;
use log::debug;

/// Swaps the node at `cursor` with the nearest visible sibling before it.
pub fn move_node_backward(nodes: &mut Vec<Node>, cursor: &str) -> bool {
    move_among_siblings(nodes, cursor, Direction::Backward)
}

/// Swaps the node at `cursor` with the nearest visible sibling after it.
pub fn move_node_forward(nodes: &mut Vec<Node>, cursor: &str) -> bool {
    move_among_siblings(nodes, cursor, Direction::Forward)
}

/// Moves the node at `cursor` to the end of its parent's sibling sequence.
///
/// At depth 2 the destination is the root sequence. The vacated slot keeps
/// `placeholder`. Fails at depth 1.
pub fn move_node_upward(nodes: &mut Vec<Node>, cursor: &str, placeholder: Node) -> bool {
    let Some(cursor) = parse_cursor(cursor) else {
        return false;
    };
    let Some(parent) = cursor.parent() else {
        debug!("event=node_move module=tree status=skip direction=upward cursor={cursor} reason=root_level");
        return false;
    };
    let Some((destination, parent_index)) = resolve_siblings_mut(nodes, &parent) else {
        return false;
    };
    let local = cursor.local_index();
    let Some(siblings) = destination[parent_index].children.as_mut() else {
        return false;
    };
    if local >= siblings.len() {
        return false;
    }

    let moved = std::mem::replace(&mut siblings[local], placeholder);
    destination.push(moved);
    debug!(
        "event=node_move module=tree status=ok direction=upward cursor={cursor} target={}",
        parent.sibling(destination.len() - 1)
    );
    true
}

/// Moves the node at `cursor` into the next visible folder sibling.
///
/// The node is appended to that folder's `children` (created when absent)
/// and the vacated slot keeps `placeholder`.
pub fn move_node_downward(nodes: &mut Vec<Node>, cursor: &str, placeholder: Node) -> bool {
    let Some(cursor) = parse_cursor(cursor) else {
        return false;
    };
    let Some((siblings, local)) = resolve_siblings_mut(nodes, &cursor) else {
        return false;
    };
    let Some(folder) = (local + 1..siblings.len())
        .find(|&index| siblings[index].is_visible() && siblings[index].is_folder())
    else {
        debug!("event=node_move module=tree status=skip direction=downward cursor={cursor} reason=no_folder");
        return false;
    };

    let moved = std::mem::replace(&mut siblings[local], placeholder);
    let children = siblings[folder].children_or_init();
    children.push(moved);
    debug!(
        "event=node_move module=tree status=ok direction=downward cursor={cursor} target={}",
        cursor.sibling(folder).child(children.len() - 1)
    );
    true
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Backward,
    Forward,
}

fn move_among_siblings(nodes: &mut Vec<Node>, cursor: &str, direction: Direction) -> bool {
    let Some(cursor) = parse_cursor(cursor) else {
        return false;
    };
    let Some((siblings, local)) = resolve_siblings_mut(nodes, &cursor) else {
        return false;
    };

    let partner = match direction {
        Direction::Backward => (0..local).rev().find(|&index| siblings[index].is_visible()),
        Direction::Forward => {
            (local + 1..siblings.len()).find(|&index| siblings[index].is_visible())
        }
    };
    let Some(partner) = partner else {
        debug!("event=node_move module=tree status=skip direction={direction:?} cursor={cursor} reason=no_partner");
        return false;
    };

    let swapped = swap_slots(siblings, local, partner);
    if swapped {
        debug!(
            "event=node_move module=tree status=ok direction={direction:?} cursor={cursor} target={}",
            cursor.sibling(partner)
        );
    }
    swapped
}

#[cfg(test)]
mod tests {
    use super::{move_node_backward, move_node_downward, move_node_forward, move_node_upward};
    use crate::model::node::Node;
    use crate::tree::mutate::get_node;

    fn titled(kind: &str, title: &str) -> Node {
        Node::new(kind).with_field("title", title)
    }

    fn titles(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .map(|node| {
                node.fields
                    .get("title")
                    .and_then(|value| value.as_str())
                    .unwrap_or("")
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn backward_skips_invisible_siblings() {
        let mut nodes = vec![titled("note", "a"), titled("note", "b"), titled("note", "c")];
        nodes[1].soft_delete();

        assert!(move_node_backward(&mut nodes, "2"));
        assert_eq!(titles(&nodes), ["c", "b", "a"]);
        assert!(!move_node_backward(&mut nodes, "0"));
    }

    #[test]
    fn forward_does_not_wrap() {
        let mut nodes = vec![titled("note", "a"), titled("note", "b")];
        assert!(!move_node_forward(&mut nodes, "1"));
        assert!(move_node_forward(&mut nodes, "0"));
        assert_eq!(titles(&nodes), ["b", "a"]);
    }

    #[test]
    fn forward_fails_when_only_invisible_siblings_follow() {
        let mut nodes = vec![titled("note", "a"), titled("note", "b")];
        nodes[1].soft_delete();
        let before = nodes.clone();
        assert!(!move_node_forward(&mut nodes, "0"));
        assert_eq!(nodes, before);
    }

    #[test]
    fn upward_from_depth_two_lands_in_root() {
        let mut nodes = vec![Node::folder().with_child(titled("note", "inner"))];
        assert!(move_node_upward(&mut nodes, "0.0", Node::placeholder()));

        assert_eq!(nodes.len(), 2);
        assert_eq!(titles(&nodes[1..]), ["inner"]);
        let vacated = get_node(&nodes, "0.0").expect("slot kept");
        assert_eq!(vacated, &Node::placeholder());
    }

    #[test]
    fn upward_from_depth_three_lands_in_grandparent_children() {
        let mut nodes = vec![Node::folder()
            .with_child(Node::folder().with_child(titled("note", "deep")))];
        assert!(move_node_upward(&mut nodes, "0.0.0", Node::placeholder()));

        let grandparent_children = nodes[0].children.as_deref().expect("children");
        assert_eq!(grandparent_children.len(), 2);
        assert_eq!(titles(&grandparent_children[1..]), ["deep"]);
    }

    #[test]
    fn upward_rejects_root_level_and_missing_nodes() {
        let mut nodes = vec![Node::folder().with_child(titled("note", "inner"))];
        let before = nodes.clone();
        assert!(!move_node_upward(&mut nodes, "0", Node::placeholder()));
        assert!(!move_node_upward(&mut nodes, "0.5", Node::placeholder()));
        assert!(!move_node_upward(&mut nodes, "3.0", Node::placeholder()));
        assert_eq!(nodes, before);
    }

    #[test]
    fn downward_targets_next_visible_folder() {
        let mut hidden = Node::folder().with_field("title", "hidden");
        hidden.soft_delete();
        let mut nodes = vec![
            titled("note", "mover"),
            hidden,
            titled("note", "leaf"),
            Node::folder().with_field("title", "target"),
        ];

        assert!(move_node_downward(&mut nodes, "0", Node::placeholder()));
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0], Node::placeholder());
        assert!(nodes[1].children.is_none());
        let moved = get_node(&nodes, "3.0").expect("moved into folder");
        assert_eq!(moved, &titled("note", "mover"));
    }

    #[test]
    fn downward_without_folder_is_noop() {
        let mut nodes = vec![Node::folder(), titled("note", "mover"), titled("note", "leaf")];
        let before = nodes.clone();
        assert!(!move_node_downward(&mut nodes, "1", Node::placeholder()));
        assert_eq!(nodes, before);
    }
}
