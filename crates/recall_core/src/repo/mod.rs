//! Repository layer for the review store.
//!
//! # Responsibility
//! - Define the data access contract for items and scheduled reviews.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Item::validate()` before persistence.
//! - Repository APIs return semantic errors (`ItemNotFound`,
//!   `ReviewNotFound`) in addition to DB transport errors.

pub mod review_repo;
