//! Item/review repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own every read and write of `items` and `scheduled_reviews`.
//! - Create an item together with its generated review schedule as one
//!   transaction.
//!
//! # Invariants
//! - An item row never exists without its full review set.
//! - Review rows are never deleted or re-dated; only `completed` changes.
//! - Mutations report `NotFound` when no row was affected.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::date::{format_date, parse_date};
use crate::model::item::{Item, ItemId, ItemValidationError};
use crate::model::review::{DueReview, ItemWithReviews, ReviewId, ScheduledReview};
use crate::schedule::generator::schedule_for;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from item/review persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Creation input was rejected before any row was written.
    Validation(ItemValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Target review does not exist.
    ReviewNotFound(ReviewId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether this error reports a missing item or review.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound(_) | Self::ReviewNotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::ReviewNotFound(id) => write!(f, "review not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "review repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted review data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ItemNotFound(_) => None,
            Self::ReviewNotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the review store.
pub trait ReviewRepository {
    /// Persists `item` and its generated schedule in one transaction.
    fn create_item_with_schedule(&mut self, item: &Item) -> RepoResult<ItemWithReviews>;
    /// Loads one item by id.
    fn get_item(&self, item_id: ItemId) -> RepoResult<Option<Item>>;
    /// Returns whether an item with this id exists.
    fn item_exists(&self, item_id: ItemId) -> RepoResult<bool>;
    /// Lists all items newest-first, each with its reviews by due date.
    fn list_items(&self) -> RepoResult<Vec<ItemWithReviews>>;
    /// Lists one item's reviews by due date.
    fn list_reviews_for_item(&self, item_id: ItemId) -> RepoResult<Vec<ScheduledReview>>;
    /// Lists reviews due on `date` joined with their parent item.
    fn list_reviews_for_date(&self, date: NaiveDate) -> RepoResult<Vec<DueReview>>;
    /// Flips `completed` and returns the new value.
    fn toggle_review(&self, review_id: ReviewId) -> RepoResult<bool>;
    /// Overwrites the raw notes blob of one item.
    fn set_notes(&self, item_id: ItemId, raw: &str) -> RepoResult<()>;
    /// Reads the raw notes blob; missing items read as empty.
    fn get_notes(&self, item_id: ItemId) -> RepoResult<String>;
    /// Total number of item rows.
    fn item_count(&self) -> RepoResult<u64>;
    /// Total number of review rows.
    fn review_count(&self) -> RepoResult<u64>;
}

/// SQLite-backed review store.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_review_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Borrows the connection for read-only aggregations such as
    /// [`crate::calendar::counts::counts_by_date`].
    pub fn connection(&self) -> &Connection {
        self.conn
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create_item_with_schedule(&mut self, item: &Item) -> RepoResult<ItemWithReviews> {
        item.validate()?;
        let reviews = schedule_for(item.id, item.created_at);

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO items (id, title, created_at, notes)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id.to_string(),
                item.title.as_str(),
                format_date(item.created_at),
                item.notes.as_str(),
            ],
        )?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO scheduled_reviews (id, item_id, due_date, completed)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for review in &reviews {
                insert.execute(params![
                    review.id.to_string(),
                    review.item_id.to_string(),
                    format_date(review.due_date),
                    review.completed,
                ])?;
            }
        }

        tx.commit()?;
        Ok(ItemWithReviews {
            item: item.clone(),
            reviews,
        })
    }

    fn get_item(&self, item_id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, created_at, notes
             FROM items
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([item_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn item_exists(&self, item_id: ItemId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1);",
            [item_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_items(&self) -> RepoResult<Vec<ItemWithReviews>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, created_at, notes
             FROM items
             ORDER BY created_at DESC, title ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, item_id, due_date, completed
             FROM scheduled_reviews
             ORDER BY due_date ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut reviews_by_item: HashMap<ItemId, Vec<ScheduledReview>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let review = parse_review_row(row)?;
            reviews_by_item
                .entry(review.item_id)
                .or_default()
                .push(review);
        }

        Ok(items
            .into_iter()
            .map(|item| {
                let reviews = reviews_by_item.remove(&item.id).unwrap_or_default();
                ItemWithReviews { item, reviews }
            })
            .collect())
    }

    fn list_reviews_for_item(&self, item_id: ItemId) -> RepoResult<Vec<ScheduledReview>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, item_id, due_date, completed
             FROM scheduled_reviews
             WHERE item_id = ?1
             ORDER BY due_date ASC;",
        )?;
        let mut rows = stmt.query([item_id.to_string()])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(parse_review_row(row)?);
        }
        Ok(reviews)
    }

    fn list_reviews_for_date(&self, date: NaiveDate) -> RepoResult<Vec<DueReview>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                r.id AS id,
                r.item_id AS item_id,
                r.due_date AS due_date,
                r.completed AS completed,
                i.title AS title,
                i.notes AS notes
             FROM scheduled_reviews r
             INNER JOIN items i ON i.id = r.item_id
             WHERE r.due_date = ?1;",
        )?;
        let mut rows = stmt.query([format_date(date)])?;
        let mut due = Vec::new();
        while let Some(row) = rows.next()? {
            due.push(DueReview {
                review: parse_review_row(row)?,
                item_title: row.get("title")?,
                item_notes: row.get("notes")?,
            });
        }
        Ok(due)
    }

    fn toggle_review(&self, review_id: ReviewId) -> RepoResult<bool> {
        let completed = self
            .conn
            .query_row(
                "UPDATE scheduled_reviews
                 SET completed = 1 - completed
                 WHERE id = ?1
                 RETURNING completed;",
                [review_id.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        match completed {
            None => Err(RepoError::ReviewNotFound(review_id)),
            Some(value) => parse_completed(value),
        }
    }

    fn set_notes(&self, item_id: ItemId, raw: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE items SET notes = ?2 WHERE id = ?1;",
            params![item_id.to_string(), raw],
        )?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(item_id));
        }

        Ok(())
    }

    fn get_notes(&self, item_id: ItemId) -> RepoResult<String> {
        let notes = self
            .conn
            .query_row(
                "SELECT notes FROM items WHERE id = ?1;",
                [item_id.to_string()],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(notes.flatten().unwrap_or_default())
    }

    fn item_count(&self) -> RepoResult<u64> {
        count_rows(self.conn, "items")
    }

    fn review_count(&self) -> RepoResult<u64> {
        count_rows(self.conn, "scheduled_reviews")
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id_text: String = row.get("id")?;
    let created_text: String = row.get("created_at")?;
    let item = Item {
        id: parse_uuid(&id_text, "items.id")?,
        title: row.get("title")?,
        created_at: parse_date_column(&created_text, "items.created_at")?,
        notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
    };
    item.validate().map_err(|err| {
        RepoError::InvalidData(format!("invalid item `{}` in items: {err}", item.id))
    })?;
    Ok(item)
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<ScheduledReview> {
    let id_text: String = row.get("id")?;
    let item_id_text: String = row.get("item_id")?;
    let due_text: String = row.get("due_date")?;
    Ok(ScheduledReview {
        id: parse_uuid(&id_text, "scheduled_reviews.id")?,
        item_id: parse_uuid(&item_id_text, "scheduled_reviews.item_id")?,
        due_date: parse_date_column(&due_text, "scheduled_reviews.due_date")?,
        completed: parse_completed(row.get("completed")?)?,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn parse_date_column(value: &str, column: &'static str) -> RepoResult<NaiveDate> {
    parse_date(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

fn parse_completed(value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid completed value `{other}` in scheduled_reviews.completed"
        ))),
    }
}

fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count for {table}")))
}

fn ensure_review_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
