use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body shared by acknowledgments and error responses.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

pub fn message(message: impl Into<String>) -> impl IntoResponse {
    let body = MessageBody {
        message: message.into(),
    };
    (StatusCode::OK, Json(body))
}

pub fn error(message: impl Into<String>, status: StatusCode) -> Response {
    let body = MessageBody {
        message: message.into(),
    };

    (status, Json(body)).into_response()
}
