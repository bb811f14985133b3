//! Review use-case service.
//!
//! # Responsibility
//! - Provide the store operations used by front ends: create, daily list,
//!   toggle, notes.
//! - Apply the notes codec on top of raw notes storage.
//! - Emit metadata-only log events for mutations.
//!
//! # Invariants
//! - Item creation always goes through the repository's single
//!   transactional create.
//! - Titles are trimmed before validation; blank titles never reach storage.
//! - Log events never contain titles or note text.

use crate::model::item::{Item, ItemId, ItemValidationError};
use crate::model::review::{DueReview, ItemWithReviews, ReviewId, ScheduledReview};
use crate::notes::codec::{self, DecodedNotes, NotesPayload};
use crate::repo::review_repo::{RepoError, RepoResult, ReviewRepository};
use crate::service::clock::{Clock, SystemClock};
use chrono::NaiveDate;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for review use-cases.
#[derive(Debug)]
pub enum ReviewServiceError {
    /// Input rejected before any write.
    Validation(ItemValidationError),
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Target review does not exist.
    ReviewNotFound(ReviewId),
    /// Notes payload could not be serialized.
    Encode(serde_json::Error),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ReviewServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound(_) | Self::ReviewNotFound(_))
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::ItemNotFound(_) | Self::ReviewNotFound(_) => "not_found",
            Self::Encode(_) => "encode",
            Self::Repo(_) => "storage",
        }
    }
}

impl Display for ReviewServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::ReviewNotFound(id) => write!(f, "review not found: {id}"),
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReviewServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ReviewServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::ItemNotFound(id) => Self::ItemNotFound(id),
            RepoError::ReviewNotFound(id) => Self::ReviewNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ItemValidationError> for ReviewServiceError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, ReviewServiceError>;

/// Review service facade over repository implementations.
pub struct ReviewService<R: ReviewRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: ReviewRepository> ReviewService<R> {
    /// Creates a service that stamps new items with the local date.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: ReviewRepository, C: Clock> ReviewService<R, C> {
    /// Creates a service with an explicit source of "today".
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates an item dated today together with its full review schedule.
    ///
    /// # Errors
    /// - `Validation` when the trimmed title is empty; nothing is written.
    /// - `Repo` when storage fails; the transaction leaves no rows behind.
    pub fn create_item(&mut self, title: &str) -> ServiceResult<ItemWithReviews> {
        let created_at = self.clock.today();
        let item = Item::new(title, created_at)?;

        match self.repo.create_item_with_schedule(&item) {
            Ok(created) => {
                info!(
                    "event=item_create module=service status=ok item_id={} created_at={} reviews={}",
                    created.item.id,
                    created.item.created_at,
                    created.reviews.len()
                );
                Ok(created)
            }
            Err(err) => {
                let err = ReviewServiceError::from(err);
                error!(
                    "event=item_create module=service status=error item_id={} error_code={} error={}",
                    item.id,
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Lists reviews due on `date` with their parent item fields.
    ///
    /// Ordering is not part of the contract.
    pub fn list_reviews_for_date(&self, date: NaiveDate) -> RepoResult<Vec<DueReview>> {
        self.repo.list_reviews_for_date(date)
    }

    /// The service's notion of "today"; front ends should not read the
    /// system clock themselves.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Lists reviews due today according to the service clock.
    pub fn list_due_today(&self) -> RepoResult<Vec<DueReview>> {
        self.repo.list_reviews_for_date(self.today())
    }

    /// Flips a review between open and completed; returns the new state.
    ///
    /// Not safe to retry blindly: each call flips again.
    pub fn toggle_review(&self, review_id: ReviewId) -> ServiceResult<bool> {
        match self.repo.toggle_review(review_id) {
            Ok(completed) => {
                info!(
                    "event=review_toggle module=service status=ok review_id={} completed={}",
                    review_id, completed
                );
                Ok(completed)
            }
            Err(err) => {
                let err = ReviewServiceError::from(err);
                error!(
                    "event=review_toggle module=service status=error review_id={} error_code={}",
                    review_id,
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Overwrites an item's raw notes blob.
    pub fn set_notes(&self, item_id: ItemId, raw: &str) -> ServiceResult<()> {
        match self.repo.set_notes(item_id, raw) {
            Ok(()) => {
                info!(
                    "event=notes_set module=service status=ok item_id={} bytes={}",
                    item_id,
                    raw.len()
                );
                Ok(())
            }
            Err(err) => {
                let err = ReviewServiceError::from(err);
                error!(
                    "event=notes_set module=service status=error item_id={} error_code={}",
                    item_id,
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Reads an item's raw notes; unknown items read as empty.
    pub fn get_notes(&self, item_id: ItemId) -> RepoResult<String> {
        self.repo.get_notes(item_id)
    }

    /// Encodes `payload` and stores it as the item's notes.
    pub fn set_structured_notes(
        &self,
        item_id: ItemId,
        payload: &NotesPayload,
    ) -> ServiceResult<()> {
        let raw = codec::encode(payload).map_err(ReviewServiceError::Encode)?;
        self.set_notes(item_id, &raw)
    }

    /// Reads and decodes an item's notes.
    pub fn get_structured_notes(&self, item_id: ItemId) -> RepoResult<DecodedNotes> {
        let raw = self.repo.get_notes(item_id)?;
        Ok(codec::decode(&raw))
    }

    pub fn get_item(&self, item_id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.get_item(item_id)
    }

    pub fn item_exists(&self, item_id: ItemId) -> RepoResult<bool> {
        self.repo.item_exists(item_id)
    }

    /// Lists all items newest-first with their schedules.
    pub fn list_items(&self) -> RepoResult<Vec<ItemWithReviews>> {
        self.repo.list_items()
    }

    pub fn list_reviews_for_item(&self, item_id: ItemId) -> RepoResult<Vec<ScheduledReview>> {
        self.repo.list_reviews_for_item(item_id)
    }

    /// Borrows the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }
}
