use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AskResponse, IngestUpload, ServiceStatus};

/// Operations the backend needs from the external AI service
///
/// Embedding, retrieval and generation all happen on the other side of
/// this trait.
#[async_trait]
pub trait AiService: Send + Sync {
    /// Forward a document for indexing; returns the service's JSON reply untouched
    async fn ingest(&self, upload: IngestUpload) -> Result<serde_json::Value>;

    /// Ask a question against the indexed documents
    async fn ask(&self, question: &str) -> Result<AskResponse>;

    /// Liveness and index size
    async fn status(&self) -> Result<ServiceStatus>;
}
