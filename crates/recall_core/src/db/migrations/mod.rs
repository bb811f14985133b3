//! Embedded schema migrations for the review database.
//!
//! Each step runs in its own transaction and stamps `user_version` on
//! success, so an interrupted upgrade resumes from the last good step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "items_reviews",
        sql: include_str!("0001_items_reviews.sql"),
    },
    Migration {
        version: 2,
        name: "review_indexes",
        sql: include_str!("0002_review_indexes.sql"),
    },
];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |step| step.version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Brings the schema up to [`latest_version`] and returns the versions applied.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<u32>> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    let mut applied = Vec::new();
    for step in MIGRATIONS.iter().skip_while(|step| step.version <= found) {
        run_step(conn, step).map_err(|source| DbError::Migration {
            version: step.version,
            name: step.name,
            source,
        })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
        applied.push(step.version);
    }
    Ok(applied)
}

fn run_step(conn: &mut Connection, step: &Migration) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    tx.commit()
}
