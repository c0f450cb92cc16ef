use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use fragmenta_core::FragmentError;
use fragmenta_store::StoreError;

/// Errors that can occur when running the Fragmenta server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The request is malformed (missing header, empty body, type
    /// mismatch on update).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request's content type is not supported for storage.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// A store-level failure surfaced through the API.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FragmentError> for ServerError {
    fn from(err: FragmentError) -> Self {
        Self::Store(StoreError::from(err))
    }
}

/// Map a store failure to its client-facing status and message.
///
/// Backend detail never reaches the client: internal failures are logged
/// server-side and reported with a generic message.
fn store_status(err: &StoreError) -> (StatusCode, String) {
    match err {
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "fragment not found".to_owned()),
        StoreError::Fragment(inner) => match inner {
            FragmentError::Validation(_) => (StatusCode::BAD_REQUEST, inner.to_string()),
            FragmentError::UnsupportedType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, inner.to_string())
            }
            FragmentError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, inner.to_string()),
        },
        StoreError::Serialization(_) | StoreError::Connection(_) | StoreError::Backend(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "unable to process request".to_owned(),
        ),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg.clone()),
            Self::Store(err) => store_status(err),
            Self::Config(_) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "unable to process request".to_owned(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "status": "error",
            "error": { "code": status.as_u16(), "message": message }
        });

        (status, axum::Json(body)).into_response()
    }
}
