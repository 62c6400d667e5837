use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

pub const LIVENESS_MESSAGE: &str = "Smart FAQ Bot API is running";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Plain-text liveness probe
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is up", body = String, content_type = "text/plain")
    ),
    tag = "health"
)]
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check endpoint
///
/// Reports which chat store is active and whether the AI service answers.
/// Always 200; a dependency being down shows up in `services`.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    services.insert("storage".to_string(), state.store.kind().to_string());

    let ai_status = match state.ai.status().await {
        Ok(_) => "available",
        Err(e) => {
            tracing::debug!("AI service status check failed: {}", e);
            "unavailable"
        }
    };
    services.insert("ai_service".to_string(), ai_status.to_string());

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
