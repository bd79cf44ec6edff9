//! Tree session use-case service.
//!
//! # Responsibility
//! - Own one in-memory root sequence bound to a store key.
//! - Expose cursor-addressed edit, move, persistence and transfer operations
//!   as one facade.
//!
//! # Invariants
//! - The service is the single owner of its root sequence.
//! - Edits are in memory only until `save` is called.

use crate::model::cursor::Cursor;
use crate::model::node::Node;
use crate::persist::{load_nodes, save_nodes, PersistError};
use crate::store::KeyValueStore;
use crate::transfer::export::{export_nodes, DownloadSink, ExportError, ExportedFile};
use crate::transfer::import::{
    import_nodes, import_selection, ImportError, ImportOptions, ImportOutcome,
};
use crate::transfer::source::ImportSource;
use crate::tree::{mutate, reorder};
use serde_json::Value;

/// Direction of a cursor-addressed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Swap with the previous visible sibling.
    Backward,
    /// Swap with the next visible sibling.
    Forward,
    /// Leave the parent for the grandparent's children (or the root).
    Upward,
    /// Enter the next visible folder sibling.
    Downward,
}

impl MoveDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backward => "backward",
            Self::Forward => "forward",
            Self::Upward => "upward",
            Self::Downward => "downward",
        }
    }

    /// Parses a direction name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "backward" => Some(Self::Backward),
            "forward" => Some(Self::Forward),
            "upward" => Some(Self::Upward),
            "downward" => Some(Self::Downward),
            _ => None,
        }
    }
}

/// Tree session facade over a key-value store.
pub struct TreeService<S: KeyValueStore> {
    store: S,
    key: String,
    nodes: Vec<Node>,
}

impl<S: KeyValueStore> TreeService<S> {
    /// Creates an empty session bound to `key`; nothing is read yet.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            nodes: Vec::new(),
        }
    }

    /// Creates a session and loads whatever is stored under `key`.
    ///
    /// An absent or empty key yields an empty tree; corrupt content is an
    /// error.
    pub fn open(store: S, key: impl Into<String>) -> Result<Self, PersistError> {
        let mut service = Self::new(store, key);
        service.reload()?;
        Ok(service)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Direct access to the root sequence for engine-level operations.
    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    /// Replaces in-memory nodes with the stored sequence.
    pub fn reload(&mut self) -> Result<(), PersistError> {
        self.nodes = load_nodes(&self.store, &self.key)?.unwrap_or_default();
        Ok(())
    }

    /// Writes the visible roots under the session key.
    pub fn save(&self) -> Result<(), PersistError> {
        save_nodes(&self.store, &self.nodes, &self.key)
    }

    pub fn add(&mut self, parent: Option<&str>, node: Node) -> Option<Cursor> {
        mutate::add_node(&mut self.nodes, parent, node)
    }

    pub fn get(&self, cursor: &str) -> Option<&Node> {
        mutate::get_node(&self.nodes, cursor)
    }

    pub fn set_field(&mut self, cursor: &str, field: &str, value: Value) -> bool {
        mutate::change_node_field(&mut self.nodes, cursor, field, value)
    }

    pub fn delete(&mut self, cursor: &str) -> bool {
        mutate::delete_node(&mut self.nodes, cursor)
    }

    pub fn restore(&mut self, cursor: &str) -> bool {
        mutate::restore_node(&mut self.nodes, cursor)
    }

    /// Moves the node at `cursor`, leaving [`Node::placeholder`] in vacated
    /// slots for upward/downward moves.
    pub fn move_node(&mut self, cursor: &str, direction: MoveDirection) -> bool {
        match direction {
            MoveDirection::Backward => reorder::move_node_backward(&mut self.nodes, cursor),
            MoveDirection::Forward => reorder::move_node_forward(&mut self.nodes, cursor),
            MoveDirection::Upward => {
                reorder::move_node_upward(&mut self.nodes, cursor, Node::placeholder())
            }
            MoveDirection::Downward => {
                reorder::move_node_downward(&mut self.nodes, cursor, Node::placeholder())
            }
        }
    }

    pub fn export<D: DownloadSink + ?Sized>(
        &self,
        base_name: &str,
        sink: &D,
    ) -> Result<ExportedFile, ExportError> {
        export_nodes(&self.nodes, base_name, sink)
    }

    pub async fn import(
        &mut self,
        file: Option<&dyn ImportSource>,
        options: &ImportOptions,
    ) -> Result<ImportOutcome, ImportError> {
        import_nodes(&mut self.nodes, file, options).await
    }

    /// Imports the first file of a selection event; an empty selection is ignored.
    pub async fn import_selection(
        &mut self,
        files: &[&dyn ImportSource],
        options: &ImportOptions,
    ) -> Result<ImportOutcome, ImportError> {
        import_selection(&mut self.nodes, files, options).await
    }
}
