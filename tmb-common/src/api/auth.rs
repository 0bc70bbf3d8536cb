//! Operator shared-secret gate
//!
//! The command surface is protected by a single shared secret stored in
//! the settings table. This is an internal-tool gate, not a security
//! boundary: the secret travels as a plain request header and a value of
//! 0 disables the check entirely.

use crate::Result;
use sqlx::SqlitePool;

/// Settings key holding the operator secret
pub const SHARED_SECRET_KEY: &str = "api_shared_secret";

/// Load the shared secret from the settings table
///
/// Missing secret: generate a random non-zero i64, store it, return it.
/// The special value 0 disables auth checking.
pub async fn load_shared_secret(pool: &SqlitePool) -> Result<i64> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(SHARED_SECRET_KEY)
            .fetch_optional(pool)
            .await?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| crate::Error::Internal(format!("Invalid shared secret: {}", e))),
        None => initialize_shared_secret(pool).await,
    }
}

/// Generate and store a fresh non-zero secret
pub async fn initialize_shared_secret(pool: &SqlitePool) -> Result<i64> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let secret: i64 = loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    };

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(SHARED_SECRET_KEY)
        .bind(secret.to_string())
        .execute(pool)
        .await?;

    Ok(secret)
}

/// Check a provided header value against the stored secret
///
/// Secret 0 accepts everything, including a missing header.
pub fn verify_secret(provided: Option<&str>, secret: i64) -> bool {
    if secret == 0 {
        return true;
    }
    match provided {
        Some(value) => value == secret.to_string(),
        None => false,
    }
}
