use crate::models::DbEvent;
use chrono::NaiveDate;
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use weekplan_core::models::event::ScheduleEvent;

fn parse_date(event: &ScheduleEvent) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(event.date_key(), "%Y-%m-%d")
        .map_err(|e| eyre!("Invalid event date '{}': {}", event.date, e))
}

pub async fn list_events(pool: &Pool<Postgres>) -> Result<Vec<DbEvent>> {
    tracing::debug!("Listing events");

    let events = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT id, title, date, start_time, end_time, location, participants, description, category, created_at
        FROM events
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Found {} events", events.len());
    Ok(events)
}

pub async fn create_event(pool: &Pool<Postgres>, event: &ScheduleEvent) -> Result<DbEvent> {
    let id = Uuid::new_v4();
    let date = parse_date(event)?;

    tracing::debug!("Creating event: id={}, date={}, title={}", id, date, event.title);

    let created = sqlx::query_as::<_, DbEvent>(
        r#"
        INSERT INTO events (id, title, date, start_time, end_time, location, participants, description, category)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, title, date, start_time, end_time, location, participants, description, category, created_at
        "#,
    )
    .bind(id)
    .bind(&event.title)
    .bind(date)
    .bind(&event.start_time)
    .bind(&event.end_time)
    .bind(&event.location)
    .bind(&event.participants)
    .bind(&event.description)
    .bind(event.category.label())
    .fetch_one(pool)
    .await?;

    Ok(created)
}

/// Overwrites every field of the event. `None` when no row has this id.
pub async fn update_event(
    pool: &Pool<Postgres>,
    id: Uuid,
    event: &ScheduleEvent,
) -> Result<Option<DbEvent>> {
    let date = parse_date(event)?;

    tracing::debug!("Updating event: id={}", id);

    let updated = sqlx::query_as::<_, DbEvent>(
        r#"
        UPDATE events
        SET title = $2, date = $3, start_time = $4, end_time = $5, location = $6,
            participants = $7, description = $8, category = $9
        WHERE id = $1
        RETURNING id, title, date, start_time, end_time, location, participants, description, category, created_at
        "#,
    )
    .bind(id)
    .bind(&event.title)
    .bind(date)
    .bind(&event.start_time)
    .bind(&event.end_time)
    .bind(&event.location)
    .bind(&event.participants)
    .bind(&event.description)
    .bind(event.category.label())
    .fetch_optional(pool)
    .await?;

    if updated.is_none() {
        tracing::debug!("Event not found: id={}", id);
    }
    Ok(updated)
}

pub async fn delete_event(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting event: id={}", id);

    let result = sqlx::query(
        r#"
        DELETE FROM events
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
