//! SQLite bootstrap for the key-value backend.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No key-value reads/writes happen before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Errors from opening the key-value database.
#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened at all.
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// A migration script failed; the whole migration batch was rolled back.
    Migration { version: u32, source: rusqlite::Error },
    /// Any other SQLite failure during bootstrap or access.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer nodetree with a schema this build cannot read.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => {
                write!(f, "cannot open {mode} key-value database: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "key-value schema migration {version} failed: {source}")
            }
            Self::Sqlite(err) => write!(f, "key-value database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "key-value schema version {found} is newer than this build supports ({supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
