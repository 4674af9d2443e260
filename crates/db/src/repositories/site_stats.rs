use crate::models::DbSiteStats;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_site_stats(pool: &Pool<Postgres>) -> Result<Option<DbSiteStats>> {
    let stats = sqlx::query_as::<_, DbSiteStats>(
        r#"
        SELECT id, registration_enabled, theme_color, view_count
        FROM site_stats
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(stats)
}

pub async fn update_registration_enabled(pool: &Pool<Postgres>, enabled: bool) -> Result<u64> {
    tracing::debug!("Setting registration_enabled={}", enabled);

    let result = sqlx::query(
        r#"
        UPDATE site_stats
        SET registration_enabled = $1
        WHERE id = 1
        "#,
    )
    .bind(enabled)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn update_theme_color(pool: &Pool<Postgres>, color: &str) -> Result<u64> {
    tracing::debug!("Setting theme_color={}", color);

    let result = sqlx::query(
        r#"
        UPDATE site_stats
        SET theme_color = $1
        WHERE id = 1
        "#,
    )
    .bind(color)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_site_settings(
    pool: &Pool<Postgres>,
    registration_enabled: bool,
    theme_color: &str,
) -> Result<()> {
    tracing::debug!("Creating site_stats row");

    sqlx::query(
        r#"
        INSERT INTO site_stats (id, registration_enabled, theme_color)
        VALUES (1, $1, $2)
        ON CONFLICT (id) DO UPDATE
        SET registration_enabled = EXCLUDED.registration_enabled,
            theme_color = EXCLUDED.theme_color
        "#,
    )
    .bind(registration_enabled)
    .bind(theme_color)
    .execute(pool)
    .await?;

    Ok(())
}

/// Atomically bumps the page view counter and returns the new total.
pub async fn increment_view_count(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO site_stats (id, view_count)
        VALUES (1, 1)
        ON CONFLICT (id) DO UPDATE
        SET view_count = site_stats.view_count + 1
        RETURNING view_count
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

pub async fn get_view_count(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT view_count
        FROM site_stats
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(count.unwrap_or(0))
}
