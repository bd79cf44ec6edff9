//! In-memory tree engine.
//!
//! # Responsibility
//! - Resolve cursors to nodes and sibling sequences.
//! - Validate required fields, add/edit/soft-delete nodes, reorder by swap.
//!
//! # Invariants
//! - Every operation here is synchronous and runs to completion.
//! - Resolution failures surface as `false`/`None`, never as panics.

pub mod mutate;
pub mod reorder;
pub mod resolve;
pub mod swap;
pub mod validate;
