use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Question is required")]
    QuestionRequired,

    /// The AI service refused the document and said why
    #[error("{0}")]
    UpstreamRejected(String),

    #[error("Failed to process document")]
    IngestFailed(#[source] anyhow::Error),

    #[error("Failed to get answer from AI")]
    AskFailed(#[source] anyhow::Error),

    #[error("Failed to fetch history")]
    HistoryFailed(#[from] smartfaq_persist::PersistError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NoFileUploaded
            | ApiError::QuestionRequired
            | ApiError::UpstreamRejected(_) => StatusCode::BAD_REQUEST,
            ApiError::IngestFailed(e) => {
                tracing::error!("Upload error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::AskFailed(e) => {
                tracing::error!("Chat error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::HistoryFailed(e) => {
                tracing::error!("History error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
