use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// A store operation failed. `message` is the only text the caller sees.
    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: BoxError,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(message.into())
    }

    pub fn persistence(message: &'static str, source: impl Into<BoxError>) -> Self {
        AppError::Persistence {
            message,
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Forbidden => "FORBIDDEN",
            AppError::Multipart(_) => "INVALID_FORM",
            AppError::Persistence { .. } => "PERSISTENCE_ERROR",
        }
    }

    /// Message returned to the client. Never carries internal error detail.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::Forbidden => "Forbidden".to_string(),
            AppError::Multipart(_) if self.status_code() == StatusCode::PAYLOAD_TOO_LARGE => {
                "Poster file too large".to_string()
            }
            AppError::Multipart(_) => "Invalid form data".to_string(),
            AppError::Persistence { message, .. } => (*message).to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) => {
                warn!(code = self.code(), message = %msg, "Rejected request");
            }
            AppError::Forbidden => {
                warn!(code = self.code(), "Forbidden request");
            }
            AppError::Multipart(e) => {
                warn!(code = self.code(), error = %e, "Unreadable multipart payload");
            }
            AppError::Persistence { message, source } => {
                error!(code = self.code(), error = %source, "{}", message);
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal details
        self.log();

        error_response(self.public_message(), status)
    }
}
