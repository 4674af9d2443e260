use crate::models::{DbAccount, DbSession};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_account_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbAccount>> {
    tracing::debug!("Getting account by email: {}", email);

    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        SELECT id, email, password_hash, full_name, email_confirmed, created_at
        FROM accounts
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

/// `None` when the email is already taken.
pub async fn create_account(
    pool: &Pool<Postgres>,
    email: &str,
    password_hash: &str,
    full_name: &str,
) -> Result<Option<DbAccount>> {
    let id = Uuid::new_v4();
    tracing::debug!("Creating account: id={}, email={}", id, email);

    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        INSERT INTO accounts (id, email, password_hash, full_name)
        VALUES ($1, LOWER($2), $3, $4)
        ON CONFLICT DO NOTHING
        RETURNING id, email, password_hash, full_name, email_confirmed, created_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .fetch_optional(pool)
    .await?;

    if account.is_none() {
        tracing::debug!("Account already exists: email={}", email);
    }
    Ok(account)
}

pub async fn create_session(
    pool: &Pool<Postgres>,
    token_hash: &str,
    account_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<DbSession> {
    tracing::debug!("Creating session: account_id={}, expires_at={}", account_id, expires_at);

    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token_hash, account_id, expires_at)
        VALUES ($1, $2, $3)
        RETURNING token_hash, account_id, expires_at, created_at
        "#,
    )
    .bind(token_hash)
    .bind(account_id)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// The account owning an unexpired session.
pub async fn get_account_by_session(pool: &Pool<Postgres>, token_hash: &str) -> Result<Option<DbAccount>> {
    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        SELECT a.id, a.email, a.password_hash, a.full_name, a.email_confirmed, a.created_at
        FROM sessions s
        JOIN accounts a ON a.id = s.account_id
        WHERE s.token_hash = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

pub async fn delete_session(pool: &Pool<Postgres>, token_hash: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE token_hash = $1 OR expires_at <= NOW()
        "#,
    )
    .bind(token_hash)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_password_reset(
    pool: &Pool<Postgres>,
    token_hash: &str,
    account_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    tracing::debug!("Creating password reset: account_id={}, expires_at={}", account_id, expires_at);

    sqlx::query(
        r#"
        INSERT INTO password_resets (token_hash, account_id, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(token_hash)
    .bind(account_id)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Consumes an unexpired reset token, stores the new password hash and ends
/// every session of the account, all in one transaction. `None` when the
/// token is unknown, used or expired.
pub async fn redeem_password_reset(
    pool: &Pool<Postgres>,
    token_hash: &str,
    password_hash: &str,
) -> Result<Option<DbAccount>> {
    let mut tx = pool.begin().await?;

    let account_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        DELETE FROM password_resets
        WHERE token_hash = $1 AND expires_at > NOW()
        RETURNING account_id
        "#,
    )
    .bind(token_hash)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(account_id) = account_id else {
        tracing::debug!("Password reset token not found or expired");
        tx.rollback().await?;
        return Ok(None);
    };

    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        UPDATE accounts
        SET password_hash = $2
        WHERE id = $1
        RETURNING id, email, password_hash, full_name, email_confirmed, created_at
        "#,
    )
    .bind(account_id)
    .bind(password_hash)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM sessions WHERE account_id = $1")
        .bind(account_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM password_resets WHERE account_id = $1 OR expires_at <= NOW()")
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::debug!("Password reset redeemed: account_id={}", account_id);
    Ok(Some(account))
}
