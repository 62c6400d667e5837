use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use smartfaq_persist::NewChat;
use crate::{error::{ApiError, ApiResult}, state::AppState};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    pub context_used: Vec<String>,
    pub history_id: String,
}

/// Ask a question about the uploaded documents
///
/// The answer is stored in the active chat store before it is returned.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer from the AI service", body = ChatResponse),
        (status = 400, description = "Question missing or empty"),
        (status = 500, description = "AI service or store failure")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let question = match payload {
        Ok(Json(req)) => req.question,
        Err(rejection) => {
            tracing::debug!("Rejected chat body: {}", rejection);
            None
        }
    }
    .filter(|q| !q.trim().is_empty())
    .ok_or(ApiError::QuestionRequired)?;

    let reply = state
        .ai
        .ask(&question)
        .await
        .map_err(|e| ApiError::AskFailed(anyhow::Error::new(e).context("AI service ask failed")))?;

    let record = state
        .store
        .save_chat(NewChat::new(question, reply.answer.clone()))
        .await
        .map_err(|e| ApiError::AskFailed(anyhow::Error::new(e).context("Failed to persist chat")))?;

    tracing::info!(history_id = %record.id, store = %state.store.kind(), "Chat stored");

    Ok(Json(ChatResponse {
        answer: reply.answer,
        context_used: reply.context_used,
        history_id: record.id,
    }))
}
