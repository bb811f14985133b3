use chrono::NaiveDate;
use recall_core::db::open_db_in_memory;
use recall_core::notes::codec;
use recall_core::{
    DecodedNotes, FixedClock, ItemValidationError, NotesPayload, ReviewRepository, ReviewService,
    ReviewServiceError, SqliteReviewRepository, REVIEWS_PER_ITEM,
};
use uuid::Uuid;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn create_item_uses_clock_and_trims_title() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));

    let created = service.create_item("  LC 43 ").unwrap();
    assert_eq!(created.item.title, "LC 43");
    assert_eq!(created.item.created_at, ymd(2024, 1, 1));
    assert_eq!(created.reviews.len(), REVIEWS_PER_ITEM);
    assert_eq!(created.reviews[0].due_date, ymd(2024, 1, 2));
    assert_eq!(created.reviews[5].due_date, ymd(2024, 4, 4));

    let due_today = service.list_due_today().unwrap();
    assert!(due_today.is_empty());
    let due_tomorrow = service.list_reviews_for_date(ymd(2024, 1, 2)).unwrap();
    assert_eq!(due_tomorrow.len(), 1);
    assert_eq!(due_tomorrow[0].item_title, "LC 43");
}

#[test]
fn blank_title_is_a_validation_error_with_no_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));

    for title in ["", "   "] {
        let err = service.create_item(title).unwrap_err();
        assert!(matches!(
            err,
            ReviewServiceError::Validation(ItemValidationError::EmptyTitle)
        ));
    }

    assert_eq!(service.repo().item_count().unwrap(), 0);
    assert_eq!(service.repo().review_count().unwrap(), 0);
}

#[test]
fn toggle_reports_new_state_and_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));
    let created = service.create_item("LC 43").unwrap();
    let review_id = created.reviews[0].id;

    assert!(service.toggle_review(review_id).unwrap());
    assert!(!service.toggle_review(review_id).unwrap());

    let err = service.toggle_review(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ReviewServiceError::ReviewNotFound(_)));
    assert!(err.is_not_found());
}

#[test]
fn structured_notes_round_trip_through_storage() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));
    let item_id = service.create_item("LC 43").unwrap().item.id;

    assert_eq!(
        service.get_structured_notes(item_id).unwrap(),
        DecodedNotes::Empty
    );

    let payload = NotesPayload::new("try every pair", "prefix sums\nO(n)");
    service.set_structured_notes(item_id, &payload).unwrap();

    assert_eq!(service.get_notes(item_id).unwrap(), codec::encode(&payload).unwrap());
    assert_eq!(
        service.get_structured_notes(item_id).unwrap(),
        DecodedNotes::Structured(payload)
    );
}

#[test]
fn legacy_free_text_notes_decode_into_brute_force() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));
    let item_id = service.create_item("LC 43").unwrap().item.id;

    service.set_notes(item_id, "plain text").unwrap();
    let decoded = service.get_structured_notes(item_id).unwrap();
    assert!(decoded.is_free_text());
    assert_eq!(decoded.into_payload(), NotesPayload::new("plain text", ""));
}

#[test]
fn notes_on_missing_item() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));
    let missing = Uuid::new_v4();

    let err = service
        .set_structured_notes(missing, &NotesPayload::default())
        .unwrap_err();
    assert!(matches!(err, ReviewServiceError::ItemNotFound(id) if id == missing));

    assert_eq!(service.get_notes(missing).unwrap(), "");
    assert!(!service.item_exists(missing).unwrap());
    assert!(service.get_item(missing).unwrap().is_none());
}

#[test]
fn list_items_exposes_completion_progress() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));
    let created = service.create_item("LC 43").unwrap();
    service.toggle_review(created.reviews[0].id).unwrap();
    service.toggle_review(created.reviews[1].id).unwrap();

    let listed = service.list_items().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].outstanding(), REVIEWS_PER_ITEM - 2);

    let reviews = service.list_reviews_for_item(created.item.id).unwrap();
    assert!(reviews[0].completed && reviews[1].completed);
    assert!(reviews[2..].iter().all(|review| !review.completed));
}

#[test]
fn due_today_follows_the_injected_clock() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut creator = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));
    creator.create_item("LC 43").unwrap();

    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 5)));
    assert_eq!(service.today(), ymd(2024, 1, 5));

    let due = service.list_due_today().unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].review.due_date, ymd(2024, 1, 5));
}

#[test]
fn notes_are_stored_as_compact_json_in_field_order() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, FixedClock(ymd(2024, 1, 1)));
    let item_id = service.create_item("LC 1").unwrap().item.id;

    service
        .set_structured_notes(item_id, &NotesPayload::new("scan", "hash"))
        .unwrap();
    assert_eq!(
        service.get_notes(item_id).unwrap(),
        r#"{"bruteForce":"scan","optimized":"hash"}"#
    );
}
