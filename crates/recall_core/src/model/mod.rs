//! Domain model for practice items and their scheduled reviews.
//!
//! # Responsibility
//! - Define the records owned by the review store.
//! - Keep calendar-date text handling in one place.
//!
//! # Invariants
//! - Items and reviews are identified by stable UUIDs.
//! - Dates are timezone-naive calendar days stored as `YYYY-MM-DD`.

pub mod date;
pub mod item;
pub mod review;
