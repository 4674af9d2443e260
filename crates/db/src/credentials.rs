//! Password hashing, session and reset token handling.
//!
//! Passwords are stored as Argon2 PHC strings. Session and password reset
//! tokens are random and only their hex SHA-256 digest is stored.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::Duration;
use eyre::{Result, eyre};
use rand::{Rng, distributions::Alphanumeric};
use sha2::{Digest, Sha256};

const SESSION_TOKEN_LEN: usize = 48;

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(stored_hash).map_err(|e| eyre!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Lookup key for an account email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reset links stay valid for one hour.
pub fn reset_ttl() -> Duration {
    Duration::hours(1)
}

/// 30 days for "remember me", otherwise 12 hours.
pub fn session_ttl(remember: bool) -> Duration {
    if remember {
        Duration::days(30)
    } else {
        Duration::hours(12)
    }
}
