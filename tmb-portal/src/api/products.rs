//! Product catalog management
//!
//! Removing a product drops only the catalog row: achievements, targets
//! and permissions keyed by the name stay behind, so re-adding the
//! product later restores the historical picture.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tmb_common::api::types::ApiOk;
use tmb_common::db::models::{Product, ProductKind};
use tmb_common::db::store;
use tmb_common::Error;

use crate::api::ApiError;
use crate::AppState;

/// Incoming product payload
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub kind: ProductKind,
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<Vec<Product>>>, ApiError> {
    let products = store::list_products(&state.db).await?;
    Ok(Json(ApiOk::new(products)))
}

/// POST /api/products
///
/// Upsert by name; triggers the target/permission grid backfill.
pub async fn upsert_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<ApiOk<Product>>), ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidInput("Product name is required".to_string()).into());
    }

    let product = Product {
        name,
        kind: payload.kind,
    };

    store::upsert_product(&state.db, &product).await?;
    store::ensure_product_grid(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ApiOk::new(product))))
}

/// DELETE /api/products/:name
pub async fn delete_product(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiOk<()>>, ApiError> {
    store::delete_product(&state.db, &name).await?;
    Ok(Json(ApiOk::new(())))
}
