//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lettings_domain::error::LettingsError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`LettingsError`] to an HTTP response with appropriate status code.
pub struct ApiError(LettingsError);

impl<E> From<E> for ApiError
where
    E: Into<LettingsError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LettingsError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            LettingsError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            LettingsError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            LettingsError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
            LettingsError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
