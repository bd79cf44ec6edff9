//! Core tree engine for nodetree.
//! Cursor-addressed nodes with soft delete, swap-based moves, key-value
//! persistence and JSON import/export.

pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;
pub mod transfer;
pub mod tree;

pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::cursor::{Cursor, CursorParseError};
pub use model::node::{Node, FIELD_CHILDREN, FIELD_TYPE, FIELD_VISIBLE, FOLDER_TYPE};
pub use persist::{load_nodes, save_nodes, PersistError};
pub use service::tree_service::{MoveDirection, TreeService};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};
pub use transfer::export::{
    export_file_name, export_nodes, export_nodes_at, DirectorySink, DownloadSink, ExportError,
    ExportedFile, EXPORT_MIME_TYPE,
};
pub use transfer::import::{
    import_nodes, import_selection, FormatError, ImportError, ImportOptions, ImportOutcome,
    LoadError,
};
pub use transfer::source::{FsSource, ImportSource, MemorySource};
pub use tree::mutate::{
    add_node, change_node_field, delete_node, get_node, get_node_mut, restore_node,
};
pub use tree::reorder::{
    move_node_backward, move_node_downward, move_node_forward, move_node_upward,
};
pub use tree::swap::swap_nodes;
pub use tree::validate::{all_fields_present, ValidationPolicy};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
