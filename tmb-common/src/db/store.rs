//! Record store operations
//!
//! Thin CRUD layer over the five entity kinds. Every mutating operation
//! is atomic at the record level; the person cascade delete runs in a
//! single transaction so a partial failure leaves no orphans.

use crate::db::models::{
    Achievement, AllowedMap, Person, Product, TargetMap, Unit,
};
use crate::{Error, Result};
use sqlx::SqlitePool;
use std::str::FromStr;

// ========================================
// Persons
// ========================================

/// List all persons, LEAD included, in stable id order
pub async fn list_persons(pool: &SqlitePool) -> Result<Vec<Person>> {
    let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
        "SELECT id, name, role, unit, category FROM persons ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(person_from_row).collect()
}

/// Fetch a single person by id
pub async fn get_person(pool: &SqlitePool, id: &str) -> Result<Option<Person>> {
    let row: Option<(String, String, String, String, String)> = sqlx::query_as(
        "SELECT id, name, role, unit, category FROM persons WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(person_from_row).transpose()
}

/// Insert or update persons by id, idempotent
pub async fn upsert_persons(pool: &SqlitePool, persons: &[Person]) -> Result<()> {
    for p in persons {
        sqlx::query(
            r#"
            INSERT INTO persons (id, name, role, unit, category)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                role = excluded.role,
                unit = excluded.unit,
                category = excluded.category,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&p.id)
        .bind(&p.name)
        .bind(&p.role)
        .bind(p.unit.as_str())
        .bind(p.category.as_str())
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Delete a person and cascade to their achievements, targets and
/// permissions in a single transaction
///
/// The LEAD person cannot be deleted.
pub async fn delete_person(pool: &SqlitePool, id: &str) -> Result<()> {
    let person = get_person(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Person not found: {}", id)))?;

    if person.unit == Unit::Lead {
        return Err(Error::InvalidInput(
            "The LEAD person cannot be deleted".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM achievements WHERE person_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM targets WHERE person_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM allowed WHERE person_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM persons WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

fn person_from_row(row: (String, String, String, String, String)) -> Result<Person> {
    Ok(Person {
        id: row.0,
        name: row.1,
        role: row.2,
        unit: FromStr::from_str(&row.3)?,
        category: FromStr::from_str(&row.4)?,
    })
}

// ========================================
// Products
// ========================================

/// List the product catalog in name order
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT name, kind FROM products ORDER BY name")
            .fetch_all(pool)
            .await?;

    rows.into_iter()
        .map(|(name, kind)| {
            Ok(Product {
                name,
                kind: FromStr::from_str(&kind)?,
            })
        })
        .collect()
}

/// Fetch a single product by name
pub async fn get_product(pool: &SqlitePool, name: &str) -> Result<Option<Product>> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT name, kind FROM products WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;

    row.map(|(name, kind)| {
        Ok(Product {
            name,
            kind: FromStr::from_str(&kind)?,
        })
    })
    .transpose()
}

/// Insert or update a product by name, idempotent
pub async fn upsert_product(pool: &SqlitePool, product: &Product) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO products (name, kind)
        VALUES (?, ?)
        ON CONFLICT (name) DO UPDATE SET kind = excluded.kind
        "#,
    )
    .bind(&product.name)
    .bind(product.kind.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a product from the catalog
///
/// Historical achievements, targets and permissions keyed by the name
/// survive; only the catalog row goes away.
pub async fn delete_product(pool: &SqlitePool, name: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM products WHERE name = ?")
        .bind(name)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Product not found: {}", name)));
    }

    Ok(())
}

// ========================================
// Achievements
// ========================================

/// List achievements, newest first
///
/// With a range: `from` inclusive, `to` exclusive. Without one: the
/// latest 500 entries.
pub async fn list_achievements(
    pool: &SqlitePool,
    range: Option<(&str, &str)>,
) -> Result<Vec<Achievement>> {
    let rows: Vec<(String, String, String, f64, String)> = match range {
        Some((from, to)) => {
            sqlx::query_as(
                r#"
                SELECT id, person_id, product, amount, date
                FROM achievements
                WHERE date >= ? AND date < ?
                ORDER BY date DESC, id DESC
                "#,
            )
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT id, person_id, product, amount, date
                FROM achievements
                ORDER BY date DESC, id DESC
                LIMIT 500
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(achievement_from_row).collect())
}

/// All achievements, oldest first (snapshot loading)
pub async fn list_all_achievements(pool: &SqlitePool) -> Result<Vec<Achievement>> {
    let rows: Vec<(String, String, String, f64, String)> = sqlx::query_as(
        "SELECT id, person_id, product, amount, date FROM achievements ORDER BY date, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(achievement_from_row).collect())
}

/// Insert an achievement, no-op when the id already exists
///
/// A client-supplied id acts as an idempotency key: a duplicate submit
/// returns the already-stored row instead of inserting twice.
pub async fn insert_achievement(pool: &SqlitePool, ach: &Achievement) -> Result<Achievement> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO achievements (id, person_id, product, amount, date)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&ach.id)
    .bind(&ach.person_id)
    .bind(&ach.product)
    .bind(ach.amount)
    .bind(&ach.date)
    .execute(pool)
    .await?;

    let row: (String, String, String, f64, String) = sqlx::query_as(
        "SELECT id, person_id, product, amount, date FROM achievements WHERE id = ?",
    )
    .bind(&ach.id)
    .fetch_one(pool)
    .await?;

    Ok(achievement_from_row(row))
}

/// Delete a single achievement by id
pub async fn delete_achievement(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM achievements WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Achievement not found: {}", id)));
    }

    Ok(())
}

fn achievement_from_row(row: (String, String, String, f64, String)) -> Achievement {
    Achievement {
        id: row.0,
        person_id: row.1,
        product: row.2,
        amount: row.3,
        date: row.4,
    }
}

// ========================================
// Targets & Permissions (nested maps, read/written wholesale)
// ========================================

/// Load the full person -> product -> target map
pub async fn load_targets(pool: &SqlitePool) -> Result<TargetMap> {
    let rows: Vec<(String, String, f64)> =
        sqlx::query_as("SELECT person_id, product, value FROM targets")
            .fetch_all(pool)
            .await?;

    let mut map = TargetMap::new();
    for (person_id, product, value) in rows {
        map.entry(person_id).or_default().insert(product, value);
    }

    Ok(map)
}

/// Replace the full target map
pub async fn save_targets(pool: &SqlitePool, targets: &TargetMap) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM targets").execute(&mut *tx).await?;

    for (person_id, products) in targets {
        for (product, value) in products {
            sqlx::query("INSERT INTO targets (person_id, product, value) VALUES (?, ?, ?)")
                .bind(person_id)
                .bind(product)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    Ok(())
}

/// Load the full person -> product -> permission map
pub async fn load_allowed(pool: &SqlitePool) -> Result<AllowedMap> {
    let rows: Vec<(String, String, i64)> =
        sqlx::query_as("SELECT person_id, product, allowed FROM allowed")
            .fetch_all(pool)
            .await?;

    let mut map = AllowedMap::new();
    for (person_id, product, flag) in rows {
        map.entry(person_id).or_default().insert(product, flag != 0);
    }

    Ok(map)
}

/// Replace the full permission map
pub async fn save_allowed(pool: &SqlitePool, allowed: &AllowedMap) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM allowed").execute(&mut *tx).await?;

    for (person_id, products) in allowed {
        for (product, flag) in products {
            sqlx::query("INSERT INTO allowed (person_id, product, allowed) VALUES (?, ?, ?)")
                .bind(person_id)
                .bind(product)
                .bind(*flag as i64)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    Ok(())
}

/// Write-time permission check for one (person, product) pair
///
/// Absent pair reads as false. Only the command surface consults this;
/// aggregation tolerates historical rows for revoked pairs.
pub async fn is_allowed(pool: &SqlitePool, person_id: &str, product: &str) -> Result<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT allowed FROM allowed WHERE person_id = ? AND product = ?")
            .bind(person_id)
            .bind(product)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|(flag,)| flag != 0).unwrap_or(false))
}

// ========================================
// Grid backfill
// ========================================

/// Ensure a target (0) and permission (true) entry for every current
/// non-LEAD person x current product
///
/// Entries are only ever added, never removed, so historical keys
/// survive person/product churn. Running this twice in a row is a no-op.
pub async fn ensure_product_grid(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO targets (person_id, product, value)
        SELECT p.id, pr.name, 0
        FROM persons p CROSS JOIN products pr
        WHERE p.unit != 'LEAD'
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO allowed (person_id, product, allowed)
        SELECT p.id, pr.name, 1
        FROM persons p CROSS JOIN products pr
        WHERE p.unit != 'LEAD'
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
