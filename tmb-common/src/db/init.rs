//! Database initialization
//!
//! Creates the schema idempotently on startup and seeds a fresh database
//! with the organizational root and the stock product catalog.

use crate::db::models::{Product, ProductKind};
use crate::db::store;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation is idempotent - safe to call on every startup
    create_settings_table(&pool).await?;
    create_persons_table(&pool).await?;
    create_products_table(&pool).await?;
    create_achievements_table(&pool).await?;
    create_targets_table(&pool).await?;
    create_allowed_table(&pool).await?;

    seed_defaults(&pool).await?;

    // Every current person gains a target/permission entry for every
    // current product they lack one for. Missing entries are backfilled,
    // never removed.
    store::ensure_product_grid(&pool).await?;

    Ok(pool)
}

/// Create the settings table
///
/// Stores application configuration key-value pairs (shared secret).
async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_persons_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS persons (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            unit TEXT NOT NULL CHECK (unit IN ('MBM', 'BOS', 'SOCIAL', 'SGK', 'LEAD')),
            category TEXT NOT NULL CHECK (category IN ('MIKRO', 'OPERASIONAL')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_persons_unit ON persons(unit)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_products_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            name TEXT PRIMARY KEY,
            kind TEXT NOT NULL CHECK (kind IN ('money', 'unit'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the achievements table
///
/// `person_id` and `product` are plain text references: product deletion
/// must leave historical rows intact, and person deletion cascades
/// explicitly inside a transaction (see store::delete_person).
async fn create_achievements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS achievements (
            id TEXT PRIMARY KEY,
            person_id TEXT NOT NULL,
            product TEXT NOT NULL,
            amount REAL NOT NULL DEFAULT 0,
            date TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (amount >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_achievements_person ON achievements(person_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_achievements_date ON achievements(date)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_targets_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS targets (
            person_id TEXT NOT NULL,
            product TEXT NOT NULL,
            value REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (person_id, product),
            CHECK (value >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_allowed_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS allowed (
            person_id TEXT NOT NULL,
            product TEXT NOT NULL,
            allowed INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (person_id, product)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the organizational root and the stock product catalog
///
/// The LEAD person is required for the portal to be usable at all; the
/// stock products match the branch's standing columns. Existing rows are
/// left untouched.
async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO persons (id, name, role, unit, category)
        VALUES ('lead-1', 'Branch Manager', 'BM', 'LEAD', 'MIKRO')
        "#,
    )
    .execute(pool)
    .await?;

    let stock_products = [
        Product { name: "KUR".to_string(), kind: ProductKind::Money },
        Product { name: "LIVIN".to_string(), kind: ProductKind::Unit },
        Product { name: "AXA".to_string(), kind: ProductKind::Unit },
    ];

    for product in &stock_products {
        sqlx::query("INSERT OR IGNORE INTO products (name, kind) VALUES (?, ?)")
            .bind(&product.name)
            .bind(product.kind.as_str())
            .execute(pool)
            .await?;
    }

    Ok(())
}
