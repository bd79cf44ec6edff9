//! File-based export and import.
//!
//! # Responsibility
//! - Hand serialized visible roots to a download sink.
//! - Read, validate and merge/replace nodes from a selected file.
//!
//! # Invariants
//! - Import is the only asynchronous operation in the crate.

pub mod export;
pub mod import;
pub mod source;
