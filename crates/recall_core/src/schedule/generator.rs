//! Fixed-interval schedule generator.

use crate::model::item::ItemId;
use crate::model::review::ScheduledReview;
use chrono::{Days, NaiveDate};

/// Day gaps between consecutive reviews, in order.
pub const INTERVALS: [u64; 6] = [1, 3, 6, 12, 24, 48];

/// Number of reviews every item owns.
pub const REVIEWS_PER_ITEM: usize = INTERVALS.len();

/// Returns the running day offsets from the creation date.
///
/// For the built-in table this is `[1, 4, 10, 22, 46, 94]`.
pub fn cumulative_offsets() -> [u64; REVIEWS_PER_ITEM] {
    let mut offsets = [0; REVIEWS_PER_ITEM];
    let mut total = 0;
    for (slot, interval) in offsets.iter_mut().zip(INTERVALS) {
        total += interval;
        *slot = total;
    }
    offsets
}

/// Expands a creation date into the ordered due dates of its reviews.
///
/// A cursor starts at `created_at` and is advanced by each interval in
/// table order; every intermediate cursor value is emitted.
///
/// Dates past `NaiveDate::MAX` are dropped. `Item::validate` rejects such
/// creation dates before anything is persisted.
pub fn generate(created_at: NaiveDate) -> Vec<NaiveDate> {
    let mut cursor = created_at;
    let mut due_dates = Vec::with_capacity(REVIEWS_PER_ITEM);
    for interval in INTERVALS {
        match cursor.checked_add_days(Days::new(interval)) {
            Some(next) => {
                cursor = next;
                due_dates.push(next);
            }
            None => break,
        }
    }
    due_dates
}

/// Materializes incomplete review records for one item.
pub fn schedule_for(item_id: ItemId, created_at: NaiveDate) -> Vec<ScheduledReview> {
    generate(created_at)
        .into_iter()
        .map(|due_date| ScheduledReview::new(item_id, due_date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{cumulative_offsets, generate, schedule_for, REVIEWS_PER_ITEM};
    use chrono::{Days, NaiveDate};
    use uuid::Uuid;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn offsets_are_running_sums() {
        assert_eq!(cumulative_offsets(), [1, 4, 10, 22, 46, 94]);
    }

    #[test]
    fn generate_uses_cumulative_offsets() {
        let due = generate(ymd(2024, 1, 1));
        assert_eq!(
            due,
            vec![
                ymd(2024, 1, 2),
                ymd(2024, 1, 5),
                ymd(2024, 1, 11),
                ymd(2024, 1, 23),
                ymd(2024, 2, 16),
                ymd(2024, 4, 4),
            ]
        );
    }

    #[test]
    fn generate_matches_offsets_for_many_start_dates() {
        let mut start = ymd(2023, 12, 1);
        for _ in 0..120 {
            let due = generate(start);
            assert_eq!(due.len(), REVIEWS_PER_ITEM);
            for (date, offset) in due.iter().zip(cumulative_offsets()) {
                assert_eq!(*date, start + Days::new(offset));
            }
            assert!(due.windows(2).all(|pair| pair[0] < pair[1]));
            start = start.succ_opt().unwrap();
        }
    }

    #[test]
    fn generate_crosses_leap_day_and_year_end() {
        let due = generate(ymd(2024, 2, 28));
        assert_eq!(due[0], ymd(2024, 2, 29));

        let due = generate(ymd(2023, 12, 31));
        assert_eq!(due[0], ymd(2024, 1, 1));
        assert_eq!(due[5], ymd(2024, 4, 3));
    }

    #[test]
    fn schedule_for_builds_incomplete_reviews_for_one_item() {
        let item_id = Uuid::new_v4();
        let reviews = schedule_for(item_id, ymd(2024, 1, 1));
        assert_eq!(reviews.len(), REVIEWS_PER_ITEM);
        assert!(reviews.iter().all(|review| review.item_id == item_id));
        assert!(reviews.iter().all(|review| !review.completed));
    }
}
