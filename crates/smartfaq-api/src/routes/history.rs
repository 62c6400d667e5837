use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use smartfaq_persist::ChatRecord;
use crate::{error::ApiResult, state::AppState};

/// Number of chats returned by the history endpoint
pub const HISTORY_LIMIT: usize = 10;

/// Wire shape of a `ChatRecord`, kept separate so it can carry the OpenAPI schema
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Most recent chats, newest first
#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "Up to 10 most recent chats", body = [HistoryEntry]),
        (status = 500, description = "Store unavailable")
    ),
    tag = "chat"
)]
pub async fn list_history(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let records = state.store.recent_chats(HISTORY_LIMIT).await?;

    Ok(Json(records.into_iter().map(record_to_entry).collect()))
}

fn record_to_entry(record: ChatRecord) -> HistoryEntry {
    HistoryEntry {
        id: record.id,
        question: record.question,
        answer: record.answer,
        timestamp: record.timestamp,
    }
}
