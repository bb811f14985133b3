//! Opening review databases.
//!
//! # Invariants
//! - `foreign_keys=ON`, so a review can never point at a missing item.
//! - Returned connections are at [`super::migrations::latest_version`].

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a database file, creating missing parent directories.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    logged("file", || {
        ensure_parent_dir(path)?;
        let mut conn = Connection::open(path)?;
        prepare(&mut conn)?;
        Ok(conn)
    })
}

/// Opens an isolated in-memory database with the full schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    logged("memory", || {
        let mut conn = Connection::open_in_memory()?;
        prepare(&mut conn)?;
        Ok(conn)
    })
}

fn logged(
    target: &'static str,
    open: impl FnOnce() -> DbResult<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = open();
    let elapsed_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok target={target} duration_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error target={target} duration_ms={elapsed_ms} error={err}"
        ),
    }
    result
}

fn prepare(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };
    std::fs::create_dir_all(parent).map_err(|err| DbError::CreateDir {
        path: parent.to_path_buf(),
        message: err.to_string(),
    })
}
