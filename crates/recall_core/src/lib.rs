//! Core scheduling and storage logic for Recall.
//! This crate is the single source of truth for review invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notes;
pub mod repo;
pub mod schedule;
pub mod service;

pub use calendar::counts::{counts_by_date, counts_in_range, CalendarError, DateCounts};
pub use config::{default_log_level, ConfigError, RecallConfig};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemId, ItemValidationError};
pub use model::review::{DueReview, ItemWithReviews, ReviewId, ScheduledReview};
pub use notes::codec::{DecodedNotes, NotesPayload};
pub use repo::review_repo::{RepoError, RepoResult, ReviewRepository, SqliteReviewRepository};
pub use schedule::generator::{generate, INTERVALS, REVIEWS_PER_ITEM};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::review_service::{ReviewService, ReviewServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
