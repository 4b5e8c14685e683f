use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Stage-labelled request failures, serialized as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    InvalidFileType,
    BadRequest(String),
    Transcription(String),
    TopicSummarization(String),
    /// Empty message means the store acknowledged the insert without a
    /// representation; the detail then carries no provider text.
    DatabaseInsertion(String),
    DatabaseQuery(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::InvalidFileType => {
                (StatusCode::BAD_REQUEST, "Invalid file type".to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Transcription(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Transcription error: {}", msg),
            ),
            ApiError::TopicSummarization(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Topic summarization error: {}", msg),
            ),
            ApiError::DatabaseInsertion(msg) if msg.is_empty() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database insertion error".to_string(),
            ),
            ApiError::DatabaseInsertion(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database insertion error: {}", msg),
            ),
            ApiError::DatabaseQuery(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database query error: {}", msg),
            ),
        };

        let body = ErrorResponse { detail };
        (status, Json(body)).into_response()
    }
}
