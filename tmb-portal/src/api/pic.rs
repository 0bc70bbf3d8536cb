//! PIC self-service entry (no login)
//!
//! Lets a person record their own achievements without the operator
//! secret. The same write-time validation applies, including the
//! permission check; only the authentication differs.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tmb_common::aggregate::category::operational_product;
use tmb_common::api::types::ApiOk;
use tmb_common::db::models::{Achievement, Category};
use tmb_common::db::store;

use crate::api::achievements::{submit_achievement, NewAchievement};
use crate::api::ApiError;
use crate::AppState;

/// Query parameters for the PIC product selector
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PicProductsQuery {
    pub category: Category,
    /// When set, only products the person is permitted for
    #[serde(default)]
    pub person_id: Option<String>,
}

/// GET /api/pic/products
///
/// Product names offered by the PIC entry form: the OPERASIONAL
/// selector carries the SGK/bansos/security products, MIKRO the
/// complement, optionally intersected with one person's permissions.
pub async fn pic_products(
    State(state): State<AppState>,
    Query(query): Query<PicProductsQuery>,
) -> Result<Json<ApiOk<Vec<String>>>, ApiError> {
    let products = store::list_products(&state.db).await?;

    let mut names: Vec<String> = products
        .into_iter()
        .map(|p| p.name)
        .filter(|name| match query.category {
            Category::Operasional => operational_product(name),
            Category::Mikro => !operational_product(name),
        })
        .collect();

    if let Some(person_id) = query.person_id.as_deref().filter(|s| !s.is_empty()) {
        let mut permitted = Vec::with_capacity(names.len());
        for name in names {
            if store::is_allowed(&state.db, person_id, &name).await? {
                permitted.push(name);
            }
        }
        names = permitted;
    }

    Ok(Json(ApiOk::new(names)))
}

/// POST /api/pic/achievements
pub async fn pic_create_achievement(
    State(state): State<AppState>,
    Json(payload): Json<NewAchievement>,
) -> Result<(StatusCode, Json<ApiOk<Achievement>>), ApiError> {
    let stored = submit_achievement(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiOk::new(stored))))
}
