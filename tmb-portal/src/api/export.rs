//! Monthly export and leaderboard endpoints

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tmb_common::aggregate::{leaderboards, LeaderboardEntry, MonthWindow, Snapshot};
use tmb_common::api::types::ApiOk;
use tmb_common::export::monthly_export;

use crate::api::ApiError;
use crate::AppState;

/// GET /api/leaderboard/:month response
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub month: String,
    pub mikro: Vec<LeaderboardEntry>,
    pub operasional: Vec<LeaderboardEntry>,
}

/// GET /api/leaderboard/:month
///
/// The two independent fair-ranking tables for one calendar month.
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<ApiOk<LeaderboardResponse>>, ApiError> {
    let window = MonthWindow::parse(&month)?;
    let snapshot = Snapshot::load(&state.db).await?;
    let boards = leaderboards(&snapshot, &window);

    Ok(Json(ApiOk::new(LeaderboardResponse {
        month: window.key(),
        mikro: boards.mikro,
        operasional: boards.operasional,
    })))
}

/// GET /api/export/:month
///
/// Monthly recap CSV: one row per achievement in the window plus the
/// two category leaderboard tables.
pub async fn export_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Response, ApiError> {
    let window = MonthWindow::parse(&month)?;
    let snapshot = Snapshot::load(&state.db).await?;
    let csv = monthly_export(&snapshot, &window);

    let disposition = format!("attachment; filename=\"recap_{}.csv\"", window.key());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
