//! Practice item domain model.
//!
//! # Responsibility
//! - Define the canonical item record tracked by the review store.
//! - Validate creation input before anything is persisted.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `title` is non-blank, stored trimmed, and immutable after creation.
//! - `created_at` is set once and anchors the whole review schedule.

use crate::model::date::is_storable;
use crate::schedule::generator::cumulative_offsets;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a practice item.
pub type ItemId = Uuid;

/// Validation failures for item creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Creation date or its last review falls outside years 0000 to 9999.
    CreatedAtOutOfRange(NaiveDate),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "item title must not be blank"),
            Self::CreatedAtOutOfRange(date) => {
                write!(f, "creation date {date} leaves no room for the review schedule")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// Canonical practice item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// User-facing label, e.g. `LC 43`.
    pub title: String,
    /// Calendar day the item was created on.
    pub created_at: NaiveDate,
    /// Raw stored notes blob. See [`crate::notes::codec`] for its structure.
    pub notes: String,
}

impl Item {
    /// Creates a new item with a generated id, trimmed title and empty notes.
    ///
    /// # Errors
    /// - [`ItemValidationError::EmptyTitle`] when `title` is blank.
    /// - [`ItemValidationError::CreatedAtOutOfRange`] when the schedule would
    ///   run outside four-digit years.
    pub fn new(
        title: impl Into<String>,
        created_at: NaiveDate,
    ) -> Result<Self, ItemValidationError> {
        let item = Self {
            id: Uuid::new_v4(),
            title: title.into().trim().to_string(),
            created_at,
            notes: String::new(),
        };
        item.validate()?;
        Ok(item)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.title.trim().is_empty() {
            return Err(ItemValidationError::EmptyTitle);
        }
        let horizon = cumulative_offsets().last().copied().unwrap_or(0);
        let last_due = self.created_at.checked_add_days(Days::new(horizon));
        match last_due {
            Some(last_due) if is_storable(self.created_at) && is_storable(last_due) => Ok(()),
            _ => Err(ItemValidationError::CreatedAtOutOfRange(self.created_at)),
        }
    }
}
