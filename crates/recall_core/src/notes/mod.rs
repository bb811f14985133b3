//! Structured notes attached to practice items.
//!
//! # Responsibility
//! - Convert between the stored notes blob and the two-field payload.
//!
//! # Invariants
//! - Decoding never fails; free-text notes written before the structured
//!   format existed are surfaced as the brute-force field.

pub mod codec;
