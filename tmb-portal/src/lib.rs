//! tmb-portal library - TeamBoard portal HTTP service
//!
//! Stateless request handlers over the record store: the operator
//! command surface, the PIC self-service entry, dashboard view data and
//! the monthly export.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared secret for the operator command surface (0 disables auth)
    pub shared_secret: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, shared_secret: i64) -> Self {
        Self { db, shared_secret }
    }
}

/// Build application router
///
/// Mutating operator routes sit behind the shared-secret middleware;
/// reads, views, the export and the PIC entry are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, post, put};

    // Operator command surface (requires X-Api-Secret)
    let protected = Router::new()
        .route("/api/achievements", post(api::create_achievement))
        .route("/api/achievements/:id", delete(api::delete_achievement))
        .route("/api/persons", post(api::upsert_persons))
        .route("/api/persons/:id", delete(api::delete_person))
        .route("/api/products", post(api::upsert_product))
        .route("/api/products/:name", delete(api::delete_product))
        .route("/api/targets", put(api::put_targets))
        .route("/api/allowed", put(api::put_allowed))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/persons", get(api::list_persons))
        .route("/api/products", get(api::list_products))
        .route("/api/achievements", get(api::list_achievements))
        .route("/api/targets", get(api::get_targets))
        .route("/api/allowed", get(api::get_allowed))
        .route("/api/views/overview", get(api::overview))
        .route("/api/views/unit/:unit", get(api::unit_board))
        .route("/api/views/individuals", get(api::individuals))
        .route("/api/leaderboard/:month", get(api::leaderboard))
        .route("/api/export/:month", get(api::export_month))
        .route("/api/pic/products", get(api::pic_products))
        .route("/api/pic/achievements", post(api::pic_create_achievement))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
}
