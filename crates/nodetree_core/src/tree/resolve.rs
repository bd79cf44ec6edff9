//! Cursor resolution over nested children sequences.
//!
//! Resolution never panics: an out-of-range index or a missing `children`
//! sequence at any segment yields `None`.

use crate::model::cursor::Cursor;
use crate::model::node::Node;
use log::debug;

/// Parses cursor text, treating malformed input as "not found".
pub fn parse_cursor(value: &str) -> Option<Cursor> {
    match Cursor::parse(value) {
        Ok(cursor) => Some(cursor),
        Err(err) => {
            debug!("event=cursor_parse module=tree status=miss error={err}");
            None
        }
    }
}

/// Returns the node addressed by `cursor`.
pub fn resolve<'a>(nodes: &'a [Node], cursor: &Cursor) -> Option<&'a Node> {
    let (first, rest) = cursor.segments().split_first()?;
    let mut node = nodes.get(*first)?;
    for index in rest {
        node = node.children.as_ref()?.get(*index)?;
    }
    Some(node)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(nodes: &'a mut [Node], cursor: &Cursor) -> Option<&'a mut Node> {
    let (first, rest) = cursor.segments().split_first()?;
    let mut node = nodes.get_mut(*first)?;
    for index in rest {
        node = node.children.as_mut()?.get_mut(*index)?;
    }
    Some(node)
}

/// Returns the sequence that owns the addressed slot and the slot's index in it.
///
/// For a root-level cursor this is `nodes` itself; otherwise it is the
/// parent's `children`.
pub fn resolve_siblings_mut<'a>(
    nodes: &'a mut Vec<Node>,
    cursor: &Cursor,
) -> Option<(&'a mut Vec<Node>, usize)> {
    let (local, ancestors) = cursor.segments().split_last()?;
    let mut siblings = nodes;
    for index in ancestors {
        siblings = siblings.get_mut(*index)?.children.as_mut()?;
    }
    if *local < siblings.len() {
        Some((siblings, *local))
    } else {
        None
    }
}
