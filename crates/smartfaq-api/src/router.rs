use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    docs::ApiDoc,
    middleware::logging,
    routes::{chat, health, history, upload},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/", get(health::liveness))
        .route("/health", get(health::health_check))
        // Documents
        .route(
            "/api/upload",
            post(upload::upload_document)
                .layer(DefaultBodyLimit::max(state.config.uploads.max_bytes)),
        )
        // Chat
        .route("/api/chat", post(chat::chat))
        .route("/api/history", get(history::list_history));

    let mut app = Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(Duration::from_secs(state.config.server.request_timeout_secs)))
        .layer(CompressionLayer::new());

    if let Some(cors) = build_cors_layer(&state.config) {
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// `None` when CORS is disabled: no CORS headers are sent at all
fn build_cors_layer(config: &Config) -> Option<CorsLayer> {
    if !config.cors.enabled {
        return None;
    }

    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors.origins.iter().any(|o| o == "*") {
        Some(cors.allow_origin(Any))
    } else {
        let parsed_origins: Vec<axum::http::HeaderValue> = config.cors.origins
            .iter()
            .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
            .collect();

        Some(cors.allow_origin(parsed_origins))
    }
}
