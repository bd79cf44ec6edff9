//! Root-sequence persistence through a key-value store.
//!
//! # Responsibility
//! - Serialize the visible root sequence under one key.
//! - Load it back as typed nodes.
//!
//! # Invariants
//! - Only root-level invisible nodes are dropped on save; nested invisible
//!   nodes are written as-is.
//! - Corrupt stored content is reported to the caller, never masked.
//! - Writes are not transactional across keys and are never rolled back.

use crate::model::node::Node;
use crate::store::{KeyValueStore, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from load/save.
#[derive(Debug)]
pub enum PersistError {
    /// Backend read/write failure.
    Store(StoreError),
    /// Stored text under `key` is not a valid node sequence.
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    /// Nodes could not be encoded.
    Encode(serde_json::Error),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Corrupt { key, source } => {
                write!(f, "stored nodes under `{key}` are corrupt: {source}")
            }
            Self::Encode(err) => write!(f, "failed to encode nodes: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Corrupt { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<StoreError> for PersistError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Returns the root-level nodes that are not soft-deleted.
pub fn visible_roots(nodes: &[Node]) -> Vec<&Node> {
    nodes.iter().filter(|node| node.is_visible()).collect()
}

/// Encodes the visible root sequence as compact JSON.
pub fn encode_visible_roots(nodes: &[Node]) -> serde_json::Result<String> {
    serde_json::to_string(&visible_roots(nodes))
}

/// Loads the node sequence stored under `key`.
///
/// Returns `Ok(None)` when the key is absent or holds an empty string.
pub fn load_nodes<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<Vec<Node>>, PersistError> {
    let Some(raw) = store.get(key)? else {
        info!("event=nodes_load module=persist status=miss key={key}");
        return Ok(None);
    };
    if raw.is_empty() {
        info!("event=nodes_load module=persist status=miss key={key} reason=empty");
        return Ok(None);
    }

    match serde_json::from_str::<Vec<Node>>(&raw) {
        Ok(nodes) => {
            info!(
                "event=nodes_load module=persist status=ok key={key} roots={}",
                nodes.len()
            );
            Ok(Some(nodes))
        }
        Err(source) => {
            error!("event=nodes_load module=persist status=error key={key} error_code=corrupt error={source}");
            Err(PersistError::Corrupt {
                key: key.to_string(),
                source,
            })
        }
    }
}

/// Saves the visible root sequence under `key`.
pub fn save_nodes<S: KeyValueStore + ?Sized>(
    store: &S,
    nodes: &[Node],
    key: &str,
) -> Result<(), PersistError> {
    let encoded = encode_visible_roots(nodes).map_err(PersistError::Encode)?;
    store.set(key, &encoded)?;
    info!(
        "event=nodes_save module=persist status=ok key={key} roots={} bytes={}",
        nodes.iter().filter(|node| node.is_visible()).count(),
        encoded.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_nodes, save_nodes, PersistError};
    use crate::model::node::Node;
    use crate::store::{KeyValueStore, MemoryStore};

    #[test]
    fn absent_or_empty_key_loads_as_none() {
        let store = MemoryStore::new();
        assert!(load_nodes(&store, "tree").expect("absent key").is_none());
        store.set("tree", "").expect("set");
        assert!(load_nodes(&store, "tree").expect("empty key").is_none());
    }

    #[test]
    fn corrupt_content_is_reported() {
        let store = MemoryStore::new();
        store.set("tree", "{not json").expect("set");
        let err = load_nodes(&store, "tree").expect_err("corrupt must fail");
        assert!(matches!(err, PersistError::Corrupt { ref key, .. } if key == "tree"));
    }

    #[test]
    fn save_prunes_root_level_only() {
        let store = MemoryStore::new();
        let mut hidden_child = Node::new("note");
        hidden_child.soft_delete();
        let mut hidden_root = Node::new("note");
        hidden_root.soft_delete();
        let nodes = vec![hidden_root, Node::folder().with_child(hidden_child.clone())];

        save_nodes(&store, &nodes, "tree").expect("save");
        let loaded = load_nodes(&store, "tree").expect("load").expect("present");
        assert_eq!(loaded, vec![Node::folder().with_child(hidden_child)]);
    }
}
