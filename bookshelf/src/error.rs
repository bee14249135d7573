//! HTTP-facing error type.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bookshelf_core::error::DocumentStoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    /// A document store call failed or timed out.
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
    /// The request body is not valid JSON for a book.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    /// An update body without the `author` object.
    #[error("request body must include an author")]
    MissingAuthor,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MalformedBody(_) | ApiError::MissingAuthor => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "document store request failed");
        } else {
            warn!(error = %self, "rejected request body");
        }

        (status, Json(MessageResponse { message: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn store_errors_are_server_errors() {
        let err = ApiError::from(DocumentStoreError::Timeout(Duration::from_secs(10)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Operation timed out after 10s");
    }

    #[test]
    fn payload_errors_are_client_errors() {
        assert_eq!(ApiError::MissingAuthor.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MalformedBody("eof".into()).status(), StatusCode::BAD_REQUEST);
    }
}
