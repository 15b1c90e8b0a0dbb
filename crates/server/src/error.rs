//! HTTP error mapping for the API.
//!
//! Core errors map onto status codes here; handlers just use `?`. Bodies
//! are always `{"detail": "..."}` with a human-readable message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use linkvault_core::Error;

/// Handler result with the unified error mapping applied.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper turning a core error into an HTTP response.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) | Error::InvalidUrl(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Enrichment failures are absorbed into degraded metadata well
            // before this layer; reaching here means a handler bug.
            Error::FetchTimeout(_) | Error::HttpStatus(_) | Error::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            Error::Database(_) | Error::MigrationFailed(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = if status.is_server_error() {
            tracing::error!(error = %self.0, "internal error while handling request");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
