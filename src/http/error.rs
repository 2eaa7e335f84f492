//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::dto::Status;
use crate::db::StoreError;

/// Errors a handler can return; each maps to a status code and a
/// [`Status`] body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or invalid input
    #[error("{0}")]
    BadRequest(String),

    /// Absent record on a read
    #[error("Not found")]
    NotFound,

    /// Storage failure or failed mutation precondition
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Status code and client-facing message.
    ///
    /// Storage failures are reported opaquely; the detail is only logged.
    fn parts(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Store(err) if err.is_domain() => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Store(StoreError::Timeout(_)) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Request timed out".to_string(),
            ),
            Self::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(Status::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_domain_errors_are_client_errors() {
        let (status, message) = ApiError::from(StoreError::NotFoundOrDeleted).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "song not found or already deleted");
    }

    #[test]
    fn test_database_errors_are_opaque() {
        let (status, message) =
            ApiError::from(StoreError::Database(sqlx::Error::PoolClosed)).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal Server Error");
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let (status, _) = ApiError::from(StoreError::Timeout(Duration::from_secs(1))).parts();
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_not_found() {
        let (status, message) = ApiError::NotFound.parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Not found");
    }
}
