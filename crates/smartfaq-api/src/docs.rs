use utoipa::OpenApi;

use crate::routes::{chat, health, history, upload};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartFAQ API",
        description = "Document Q&A backend: forwards uploads and questions to the AI service and keeps chat history"
    ),
    paths(
        health::liveness,
        health::health_check,
        upload::upload_document,
        chat::chat,
        history::list_history,
    ),
    components(schemas(
        health::HealthResponse,
        upload::UploadForm,
        chat::ChatRequest,
        chat::ChatResponse,
        history::HistoryEntry,
    )),
    tags(
        (name = "health", description = "Liveness and dependency status"),
        (name = "documents", description = "Document ingestion"),
        (name = "chat", description = "Questions and chat history")
    )
)]
pub struct ApiDoc;
