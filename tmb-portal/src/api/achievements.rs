//! Achievement entry and listing
//!
//! Append-mostly: entries are created (operator or PIC) and individually
//! deletable, never updated in place. All validation happens before any
//! store mutation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tmb_common::api::types::ApiOk;
use tmb_common::db::models::{Achievement, Unit};
use tmb_common::db::store;
use tmb_common::Error;
use uuid::Uuid;

use crate::api::ApiError;
use crate::AppState;

/// Incoming achievement payload (operator and PIC entry)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAchievement {
    /// Optional client-generated idempotency key
    #[serde(default)]
    pub id: Option<String>,
    pub person_id: String,
    pub product: String,
    pub amount: f64,
    pub date: String,
}

/// Query parameters for listing
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Inclusive lower date bound
    pub from: Option<String>,
    /// Exclusive upper date bound
    pub to: Option<String>,
}

/// GET /api/achievements
///
/// With `from`/`to`: all entries in the half-open range. Without:
/// the latest 500, newest first.
pub async fn list_achievements(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiOk<Vec<Achievement>>>, ApiError> {
    let rows = match (query.from.as_deref(), query.to.as_deref()) {
        (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => {
            store::list_achievements(&state.db, Some((from, to))).await?
        }
        _ => store::list_achievements(&state.db, None).await?,
    };

    Ok(Json(ApiOk::new(rows)))
}

/// POST /api/achievements (operator entry)
pub async fn create_achievement(
    State(state): State<AppState>,
    Json(payload): Json<NewAchievement>,
) -> Result<(StatusCode, Json<ApiOk<Achievement>>), ApiError> {
    let stored = submit_achievement(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiOk::new(stored))))
}

/// DELETE /api/achievements/:id
pub async fn delete_achievement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiOk<()>>, ApiError> {
    store::delete_achievement(&state.db, &id).await?;
    Ok(Json(ApiOk::new(())))
}

/// Validate and store one achievement entry
///
/// Shared by the operator entry and the unauthenticated PIC entry: the
/// permission invariant is enforced here, at write time, never
/// retroactively against historical rows.
pub async fn submit_achievement(
    state: &AppState,
    payload: NewAchievement,
) -> Result<Achievement, ApiError> {
    let person_id = payload.person_id.trim().to_string();
    let product = payload.product.trim().to_string();
    let date = payload.date.trim().to_string();

    if person_id.is_empty() {
        return Err(Error::InvalidInput("personId is required".to_string()).into());
    }
    if product.is_empty() {
        return Err(Error::InvalidInput("product is required".to_string()).into());
    }
    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(Error::InvalidInput(format!(
            "amount must be a non-negative finite number, got {}",
            payload.amount
        ))
        .into());
    }
    if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        return Err(Error::InvalidInput(format!(
            "date must be YYYY-MM-DD, got {:?}",
            date
        ))
        .into());
    }

    let person = store::get_person(&state.db, &person_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Person not found: {}", person_id)))?;
    if person.unit == Unit::Lead {
        return Err(
            Error::InvalidInput("The LEAD person does not record achievements".to_string()).into(),
        );
    }

    if store::get_product(&state.db, &product).await?.is_none() {
        return Err(Error::NotFound(format!("Product not found: {}", product)).into());
    }

    if !store::is_allowed(&state.db, &person_id, &product).await? {
        return Err(Error::PermissionDenied(format!(
            "{} is not permitted for product {}",
            person.name, product
        ))
        .into());
    }

    let id = match payload.id.map(|s| s.trim().to_string()) {
        Some(id) if !id.is_empty() => id,
        _ => Uuid::new_v4().to_string(),
    };

    let stored = store::insert_achievement(
        &state.db,
        &Achievement {
            id,
            person_id,
            product,
            amount: payload.amount,
            date,
        },
    )
    .await?;

    Ok(stored)
}
