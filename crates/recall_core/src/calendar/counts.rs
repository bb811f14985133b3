//! Per-date outstanding review counts.

use crate::db::DbError;
use crate::model::date::{format_date, parse_date};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for calendar APIs.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Outstanding review count keyed by due date, in date order.
pub type DateCounts = BTreeMap<NaiveDate, u32>;

/// Calendar-layer error for DB interaction and row decoding.
#[derive(Debug)]
pub enum CalendarError {
    Db(DbError),
    InvalidData(String),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid calendar row: {message}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for CalendarError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CalendarError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Counts outstanding reviews for every due date in the store.
pub fn counts_by_date(conn: &Connection) -> CalendarResult<DateCounts> {
    query_counts(conn, None)
}

/// Counts outstanding reviews with `from <= due_date <= to`.
///
/// Returns an empty map when `from > to`.
pub fn counts_in_range(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> CalendarResult<DateCounts> {
    if from > to {
        return Ok(DateCounts::new());
    }
    query_counts(conn, Some((from, to)))
}

fn query_counts(
    conn: &Connection,
    range: Option<(NaiveDate, NaiveDate)>,
) -> CalendarResult<DateCounts> {
    let mut sql = String::from(
        "SELECT due_date, COUNT(*) AS outstanding
         FROM scheduled_reviews
         WHERE completed = 0",
    );
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some((from, to)) = range {
        sql.push_str(" AND due_date >= ? AND due_date <= ?");
        bind_values.push(Value::Text(format_date(from)));
        bind_values.push(Value::Text(format_date(to)));
    }

    sql.push_str(" GROUP BY due_date");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut counts = DateCounts::new();
    while let Some(row) = rows.next()? {
        let (date, outstanding) = parse_count_row(row)?;
        counts.insert(date, outstanding);
    }

    Ok(counts)
}

fn parse_count_row(row: &Row<'_>) -> CalendarResult<(NaiveDate, u32)> {
    let due_text: String = row.get("due_date")?;
    let date = parse_date(&due_text)
        .ok_or_else(|| CalendarError::InvalidData(format!("invalid due date `{due_text}`")))?;

    let outstanding: i64 = row.get("outstanding")?;
    let outstanding = u32::try_from(outstanding)
        .map_err(|_| CalendarError::InvalidData(format!("invalid count `{outstanding}`")))?;

    Ok((date, outstanding))
}
