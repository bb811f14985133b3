//! Source of "today" for item creation.

use chrono::{Local, NaiveDate};

/// Supplies the current calendar day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day. Used by tests and imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
