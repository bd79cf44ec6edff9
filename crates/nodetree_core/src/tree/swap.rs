//! Node content exchange.

use crate::model::node::Node;

/// Exchanges the complete contents of two nodes, children included.
///
/// A key present on only one side travels with its node and is absent on the
/// other side afterward. Applying the swap twice restores both nodes.
pub fn swap_nodes(a: &mut Node, b: &mut Node) {
    std::mem::swap(a, b);
}

/// Exchanges two slots of one sibling sequence.
///
/// Returns `false` without touching `siblings` when either index is out of
/// range.
pub fn swap_slots(siblings: &mut [Node], first: usize, second: usize) -> bool {
    if first >= siblings.len() || second >= siblings.len() {
        return false;
    }
    siblings.swap(first, second);
    true
}
