//! Scheduled review records and their read models.

use crate::model::item::{Item, ItemId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one scheduled review.
pub type ReviewId = Uuid;

/// One due-date instance generated for an item.
///
/// Only `completed` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledReview {
    pub id: ReviewId,
    pub item_id: ItemId,
    pub due_date: NaiveDate,
    pub completed: bool,
}

impl ScheduledReview {
    /// Creates an incomplete review for `item_id` due on `due_date`.
    pub fn new(item_id: ItemId, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            due_date,
            completed: false,
        }
    }
}

/// Review joined with the parent item fields needed by a daily review list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueReview {
    pub review: ScheduledReview,
    pub item_title: String,
    pub item_notes: String,
}

impl DueReview {
    pub fn item_id(&self) -> ItemId {
        self.review.item_id
    }
}

/// Item together with its full review schedule, ordered by due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWithReviews {
    pub item: Item,
    pub reviews: Vec<ScheduledReview>,
}

impl ItemWithReviews {
    /// Number of reviews still open for this item.
    pub fn outstanding(&self) -> usize {
        self.reviews.iter().filter(|review| !review.completed).count()
    }
}
