//! Calendar aggregation over scheduled reviews.
//!
//! # Responsibility
//! - Count outstanding reviews per due date for density indicators.
//!
//! # Invariants
//! - Only `completed = 0` rows are counted.
//! - Dates without outstanding reviews are absent, never reported as zero.
//! - Every call reads live rows; nothing is cached.

pub mod counts;
