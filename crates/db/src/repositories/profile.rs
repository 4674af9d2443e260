use crate::models::DbProfile;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use weekplan_core::models::profile::UserProfile;

pub async fn get_profile_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProfile>> {
    tracing::debug!("Getting profile by id: {}", id);

    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        SELECT p.id, p.email, p.full_name, p.role, p.created_at,
               COALESCE(a.email_confirmed, FALSE) AS email_confirmed
        FROM profiles p
        LEFT JOIN accounts a ON a.id = p.id
        WHERE p.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Inserting a profile that already exists is a no-op.
pub async fn create_profile(pool: &Pool<Postgres>, profile: &UserProfile) -> Result<()> {
    tracing::debug!(
        "Creating profile: id={}, email={}, role={}",
        profile.id,
        profile.email,
        profile.role.as_str()
    );

    sqlx::query(
        r#"
        INSERT INTO profiles (id, email, full_name, role, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(profile.id)
    .bind(&profile.email)
    .bind(&profile.full_name)
    .bind(profile.role.as_str())
    .bind(profile.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_profiles(pool: &Pool<Postgres>) -> Result<Vec<DbProfile>> {
    let profiles = sqlx::query_as::<_, DbProfile>(
        r#"
        SELECT p.id, p.email, p.full_name, p.role, p.created_at,
               COALESCE(a.email_confirmed, FALSE) AS email_confirmed
        FROM profiles p
        LEFT JOIN accounts a ON a.id = p.id
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Found {} profiles", profiles.len());
    Ok(profiles)
}
