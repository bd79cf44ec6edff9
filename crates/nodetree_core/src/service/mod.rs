//! Core use-case services.
//!
//! # Responsibility
//! - Bundle tree engine, persistence and transfer into session-level APIs.
//! - Keep CLI callers decoupled from storage details.

pub mod tree_service;
