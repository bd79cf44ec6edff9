//! Tree domain model.
//!
//! # Responsibility
//! - Define the node record and the cursor addressing type.
//! - Keep structural fields typed and domain fields open.
//!
//! # Invariants
//! - A node exclusively owns its children (no sharing, no cycles).
//! - Deletion is a soft flag, never removal from the parent sequence.

pub mod cursor;
pub mod node;
