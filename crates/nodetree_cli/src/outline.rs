//! Plain-text outline of a node tree.

use nodetree_core::{Cursor, Node};
use serde_json::Value;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Renders one line per node: `<cursor> [<type>] <fields>`.
///
/// Soft-deleted nodes and their subtrees are skipped unless `include_deleted`
/// is set, in which case they carry a `(deleted)` marker. Cursors always
/// reflect real slots, so hidden siblings leave gaps in the numbering.
pub fn render(nodes: &[Node], include_deleted: bool) -> String {
    let mut out = String::new();
    for (index, node) in nodes.iter().enumerate() {
        render_node(&mut out, node, &Cursor::root(index), include_deleted);
    }
    out
}

fn render_node(out: &mut String, node: &Node, cursor: &Cursor, include_deleted: bool) {
    if !node.is_visible() && !include_deleted {
        return;
    }

    let indent = INDENT.repeat(cursor.depth() - 1);
    let kind = if node.kind.is_empty() { "-" } else { &node.kind };
    let _ = write!(out, "{indent}{cursor} [{kind}]");
    if !node.fields.is_empty() {
        let _ = write!(out, " {}", Value::Object(node.fields.clone()));
    }
    if !node.is_visible() {
        out.push_str(" (deleted)");
    }
    out.push('\n');

    for (index, child) in node.children.iter().flatten().enumerate() {
        render_node(out, child, &cursor.child(index), include_deleted);
    }
}
