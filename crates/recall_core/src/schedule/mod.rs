//! Review schedule generation.
//!
//! # Responsibility
//! - Expand one item creation date into its fixed sequence of due dates.
//!
//! # Invariants
//! - The interval table is a compile-time constant, never configuration.
//! - Due dates are cumulative: each interval advances from the previous
//!   due date, not from the creation date.

pub mod generator;
