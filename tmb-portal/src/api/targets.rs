//! Target and permission maps
//!
//! Both are nested `personId -> productName -> value` maps, read and
//! written wholesale; there is no partial-key API.

use axum::extract::State;
use axum::Json;
use tmb_common::api::types::ApiOk;
use tmb_common::db::models::{AllowedMap, TargetMap};
use tmb_common::db::store;
use tmb_common::Error;

use crate::api::ApiError;
use crate::AppState;

/// GET /api/targets
pub async fn get_targets(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<TargetMap>>, ApiError> {
    let targets = store::load_targets(&state.db).await?;
    Ok(Json(ApiOk::new(targets)))
}

/// PUT /api/targets
///
/// Replaces the whole map. Every value must be a non-negative finite
/// number; nothing is written otherwise.
pub async fn put_targets(
    State(state): State<AppState>,
    Json(targets): Json<TargetMap>,
) -> Result<Json<ApiOk<()>>, ApiError> {
    for (person_id, products) in &targets {
        for (product, value) in products {
            if !value.is_finite() || *value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "Invalid target for {}/{}: {}",
                    person_id, product, value
                ))
                .into());
            }
        }
    }

    store::save_targets(&state.db, &targets).await?;
    Ok(Json(ApiOk::new(())))
}

/// GET /api/allowed
pub async fn get_allowed(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<AllowedMap>>, ApiError> {
    let allowed = store::load_allowed(&state.db).await?;
    Ok(Json(ApiOk::new(allowed)))
}

/// PUT /api/allowed
///
/// Replaces the whole map. Revoking a permission never touches
/// historical achievements; it only blocks future entries and hides the
/// product column for that person.
pub async fn put_allowed(
    State(state): State<AppState>,
    Json(allowed): Json<AllowedMap>,
) -> Result<Json<ApiOk<()>>, ApiError> {
    store::save_allowed(&state.db, &allowed).await?;
    Ok(Json(ApiOk::new(())))
}
