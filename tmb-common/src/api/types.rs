//! Shared API response envelope
//!
//! Every JSON endpoint answers `{"ok": true, "data": ...}` on success
//! and `{"ok": false, "error": "..."}` on failure.

use serde::Serialize;

/// Success envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiOk<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

impl<T: Serialize> ApiOk<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Failure envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub ok: bool,
    pub error: String,
}

impl ApiErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
