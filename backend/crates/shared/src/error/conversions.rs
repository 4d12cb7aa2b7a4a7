//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from the foreign errors a card handler
//! runs into to [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// serde_json conversions
// ============================================================================

/// JSON errors only ever come from decoding upstream payloads, so a
/// malformed document is the upstream's fault, not the caller's.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_gateway(format!("Upstream returned an unexpected payload: {}", err))
                .with_action("Please try again later")
                .with_source(err)
        } else {
            AppError::new(ErrorKind::InternalServerError, "JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::bad_request(format!("Invalid query string: {}", err.body_text())).with_source(err)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.problem_details())).into_response()
    }
}
