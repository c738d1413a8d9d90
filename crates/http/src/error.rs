//! Error handling for the bookshelf HTTP layer.
//!
//! Every error is rendered as `200 OK` with a plain-text body. Clients of the
//! books API tell outcomes apart by the literal text, never by status code.
//! That contract is inherited from the service this API replaces and is kept
//! on purpose; do not map these variants to 4xx/5xx without versioning the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

/// Status code used for every error response
pub const ERROR_STATUS: StatusCode = StatusCode::OK;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or empty required field
    #[error("{message}")]
    Validation { message: String },

    /// Unknown or malformed identifier
    #[error("{message}")]
    NotFound { message: String },

    /// Store failure; `message` is what the client sees, `source` is only logged
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal error whose cause stays out of the response body
    pub fn internal(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Text sent to the client
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message }
            | AppError::NotFound { message }
            | AppError::Internal { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Validation { message } => {
                tracing::debug!(reason = %message, "request rejected by validation");
                message
            }
            AppError::NotFound { message } => {
                tracing::debug!(reason = %message, "requested resource not found");
                message
            }
            AppError::Internal { message, source } => {
                let error_id = Uuid::new_v4();
                tracing::error!(
                    error_id = %error_id,
                    error = %format!("{:#}", source),
                    response = %message,
                    "request failed"
                );
                message
            }
        };

        (ERROR_STATUS, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_plain_text_ok() {
        let response = AppError::validation("missing required field title").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_text(response).await, "missing required field title");
    }

    #[tokio::test]
    async fn not_found_error_is_plain_text_ok() {
        let response = AppError::not_found("no book exists").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "no book exists");
    }

    #[tokio::test]
    async fn internal_error_hides_its_cause() {
        let cause = anyhow::anyhow!("connection refused by 10.0.0.7");
        let error = AppError::internal("error deleting books", cause);
        assert_eq!(error.message(), "error deleting books");
        assert!(std::error::Error::source(&error).is_some());

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert_eq!(body, "error deleting books");
        assert!(!body.contains("10.0.0.7"));
    }
}
