use recall_core::db::migrations::{apply_migrations, latest_version, schema_version};
use recall_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "items");
    assert_table_exists(&conn, "scheduled_reviews");
    assert_index_exists(&conn, "idx_scheduled_reviews_due_date");
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO scheduled_reviews (id, item_id, due_date) VALUES ('r1', 'nope', '2024-01-02');",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().to_lowercase().contains("foreign key"));
}

#[test]
fn schema_defaults_match_store_contract() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO items (id, title, created_at) VALUES ('i1', 'LC 1', '2024-01-01');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO scheduled_reviews (id, item_id, due_date) VALUES ('r1', 'i1', '2024-01-02');",
        [],
    )
    .unwrap();

    let notes: String = conn
        .query_row("SELECT notes FROM items WHERE id = 'i1';", [], |row| {
            row.get(0)
        })
        .unwrap();
    let completed: i64 = conn
        .query_row(
            "SELECT completed FROM scheduled_reviews WHERE id = 'r1';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(notes, "");
    assert_eq!(completed, 0);
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recall.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO items (id, title, created_at) VALUES ('i1', 'LC 1', '2024-01-01');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("recall.db");

    let conn = open_db(&path).unwrap();
    assert!(path.exists());
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn migrations_are_applied_once_and_resume_from_partial_upgrade() {
    let mut conn = Connection::open_in_memory().unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), vec![1, 2]);
    assert!(apply_migrations(&mut conn).unwrap().is_empty());

    let mut partial = Connection::open_in_memory().unwrap();
    partial
        .execute_batch(include_str!("../src/db/migrations/0001_items_reviews.sql"))
        .unwrap();
    partial.execute_batch("PRAGMA user_version = 1;").unwrap();
    assert_eq!(apply_migrations(&mut partial).unwrap(), vec![2]);
    assert_index_exists(&partial, "idx_scheduled_reviews_item_due");
}

#[test]
fn failing_migration_reports_its_version() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();

    match apply_migrations(&mut conn).unwrap_err() {
        DbError::Migration { version, name, .. } => {
            assert_eq!(version, 2);
            assert_eq!(name, "review_indexes");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(schema_version(&conn).unwrap(), 1);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
