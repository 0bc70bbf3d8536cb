//! HTTP error mapping
//!
//! Converts the common error taxonomy into status codes and the JSON
//! failure envelope. Validation problems reject before any store write;
//! storage failures surface as terminal 5xx for that one operation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tmb_common::api::types::ApiErrorBody;
use tmb_common::Error;
use tracing::error;

/// Handler error wrapper carrying the common taxonomy
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) | Error::Config(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Error::Database(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(ApiErrorBody::new(self.0.to_string()));
        (status, body).into_response()
    }
}
