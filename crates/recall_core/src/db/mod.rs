//! Review database bootstrap.
//!
//! The caller owns the returned `Connection` and lends it to repositories.
//! Nothing in this crate keeps a global handle.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No item or review is touched before the schema is current.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure surfaced unmodified to callers.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Parent directory of the database file could not be created.
    CreateDir { path: PathBuf, message: String },
    /// A migration script failed; earlier migrations stay applied.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::CreateDir { path, message } => write!(
                f,
                "cannot create database directory `{}`: {message}",
                path.display()
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration {version:04} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "database schema v{found} was written by a newer recall (this build knows v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::CreateDir { .. } | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
