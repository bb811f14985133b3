//! Subcommand handlers and their text/JSON rendering.

use crate::OutputFormat;
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use recall_core::model::date::{format_date, parse_date};
use recall_core::{
    counts_by_date, counts_in_range, ItemId, ItemWithReviews, NotesPayload, ReviewService,
    SqliteReviewRepository,
};
use rusqlite::Connection;
use serde_json::json;
use uuid::Uuid;

type Service<'conn> = ReviewService<SqliteReviewRepository<'conn>>;

fn service(conn: &mut Connection) -> anyhow::Result<Service<'_>> {
    let repo = SqliteReviewRepository::try_new(conn)?;
    Ok(ReviewService::new(repo))
}

pub fn add(conn: &mut Connection, title: &str, format: OutputFormat) -> anyhow::Result<()> {
    let created = service(conn)?.create_item(title)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&created)?),
        OutputFormat::Plain => {
            println!("{}  {}", created.item.id, created.item.title);
            print_schedule(&created);
        }
    }
    Ok(())
}

pub fn due(
    conn: &mut Connection,
    date: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let service = service(conn)?;
    let (date, due) = match date {
        Some(raw) => {
            let date = parse_date_arg(raw)?;
            (date, service.list_reviews_for_date(date)?)
        }
        None => (service.today(), service.list_due_today()?),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&due)?),
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due on {}.", format_date(date));
            }
            for entry in &due {
                println!(
                    "[{}] {}  {}",
                    check_mark(entry.review.completed),
                    entry.review.id,
                    entry.item_title
                );
            }
        }
    }
    Ok(())
}

pub fn toggle(
    conn: &mut Connection,
    review_id: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let review_id = parse_id(review_id, "review")?;
    let completed = service(conn)?.toggle_review(review_id)?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "id": review_id, "completed": completed })),
        OutputFormat::Plain => {
            let state = if completed { "completed" } else { "open" };
            println!("Review {review_id} is now {state}.");
        }
    }
    Ok(())
}

pub fn notes_show(
    conn: &mut Connection,
    item_id: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let item_id = parse_id(item_id, "item")?;
    let service = service(conn)?;
    ensure_item(&service, item_id)?;

    let decoded = service.get_structured_notes(item_id)?;
    let legacy = decoded.is_free_text();
    let payload = decoded.into_payload();
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "bruteForce": payload.brute_force,
                "optimized": payload.optimized,
                "legacyFreeText": legacy,
            })
        ),
        OutputFormat::Plain => {
            if legacy {
                println!("(free-text notes, shown as brute force)");
            }
            println!("Brute force:\n{}\n", payload.brute_force);
            println!("Optimized:\n{}", payload.optimized);
        }
    }
    Ok(())
}

pub fn notes_set(
    conn: &mut Connection,
    item_id: &str,
    brute_force: Option<String>,
    optimized: Option<String>,
) -> anyhow::Result<()> {
    let item_id = parse_id(item_id, "item")?;
    let service = service(conn)?;

    let current = service.get_structured_notes(item_id)?.into_payload();
    let payload = NotesPayload {
        brute_force: brute_force.unwrap_or(current.brute_force),
        optimized: optimized.unwrap_or(current.optimized),
    };
    service.set_structured_notes(item_id, &payload)?;
    println!("Notes saved for {item_id}.");
    Ok(())
}

pub fn calendar(
    conn: &mut Connection,
    from: Option<&str>,
    to: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let counts = match (from, to) {
        (Some(from), Some(to)) => {
            counts_in_range(conn, parse_date_arg(from)?, parse_date_arg(to)?)?
        }
        _ => counts_by_date(conn)?,
    };

    match format {
        OutputFormat::Json => {
            let by_date = counts
                .iter()
                .map(|(date, count)| (format_date(*date), json!(count)))
                .collect::<serde_json::Map<_, _>>();
            println!("{}", serde_json::Value::Object(by_date));
        }
        OutputFormat::Plain => {
            if counts.is_empty() {
                println!("No outstanding reviews.");
            }
            for (date, count) in &counts {
                println!("{}  {}", format_date(*date), count);
            }
        }
    }
    Ok(())
}

pub fn list(conn: &mut Connection, format: OutputFormat) -> anyhow::Result<()> {
    let items = service(conn)?.list_items()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Plain => {
            for entry in &items {
                println!(
                    "{}  {}  (created {}, {} open)",
                    entry.item.id,
                    entry.item.title,
                    format_date(entry.item.created_at),
                    entry.outstanding()
                );
                print_schedule(entry);
            }
        }
    }
    Ok(())
}

fn print_schedule(entry: &ItemWithReviews) {
    for review in &entry.reviews {
        println!(
            "    [{}] {}  {}",
            check_mark(review.completed),
            format_date(review.due_date),
            review.id
        );
    }
}

fn ensure_item(service: &Service<'_>, item_id: ItemId) -> anyhow::Result<()> {
    if service.item_exists(item_id)? {
        Ok(())
    } else {
        Err(anyhow!("item not found: {item_id}"))
    }
}

fn check_mark(completed: bool) -> char {
    if completed {
        'x'
    } else {
        ' '
    }
}

fn parse_id(raw: &str, kind: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw.trim()).with_context(|| format!("invalid {kind} id `{raw}`"))
}

fn parse_date_arg(raw: &str) -> anyhow::Result<NaiveDate> {
    parse_date(raw.trim()).ok_or_else(|| anyhow!("invalid date `{raw}`; expected YYYY-MM-DD"))
}
