//! Authentication middleware for the operator command surface
//!
//! Checks the `X-Api-Secret` header against the stored shared secret.
//! Secret 0 disables all checking. Public routes (reads, views, export,
//! PIC entry) never pass through this middleware.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tmb_common::api::auth::verify_secret;
use tmb_common::api::types::ApiErrorBody;
use tracing::warn;

use crate::AppState;

/// Request header carrying the operator secret
pub const SECRET_HEADER: &str = "x-api-secret";

/// Authentication middleware
///
/// Returns 401 Unauthorized when the header is missing or wrong.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let provided = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    if !verify_secret(provided, state.shared_secret) {
        warn!(
            "Rejected {} {}: bad or missing operator secret",
            request.method(),
            request.uri().path()
        );
        return Err(AuthError::BadSecret);
    }

    Ok(next.run(request).await)
}

/// Authentication failure for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    BadSecret,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::BadSecret => "Bad or missing operator secret",
        };
        (StatusCode::UNAUTHORIZED, Json(ApiErrorBody::new(message))).into_response()
    }
}
