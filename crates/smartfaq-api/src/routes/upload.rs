use axum::{
    extract::{multipart::{Field, MultipartRejection}, Multipart, State},
    Json,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use utoipa::ToSchema;

use smartfaq_ai::IngestUpload;
use crate::{error::{ApiError, ApiResult}, state::AppState};

/// Multipart field the document must arrive under
pub const UPLOAD_FIELD: &str = "file";

/// OpenAPI shape of the upload form
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Upload a document for ingestion
///
/// The file is spooled to the upload directory, forwarded to the AI
/// service and then deleted whatever the outcome.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "AI service ingestion result, relayed verbatim"),
        (status = 400, description = "No file, or the AI service rejected the document"),
        (status = 500, description = "Document could not be processed")
    ),
    tag = "documents"
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("Rejected upload body: {}", rejection);
        ApiError::NoFileUploaded
    })?;

    let spooled = spool_upload(&mut multipart, &state.config.uploads.dir)
        .await?
        .ok_or(ApiError::NoFileUploaded)?;

    tracing::info!(
        file_name = %spooled.file_name,
        path = %spooled.path.display(),
        "Forwarding upload to AI service"
    );

    let result = state.ai.ingest(spooled.to_ingest()).await;
    drop(spooled);

    match result {
        Ok(reply) => Ok(Json(reply)),
        Err(e) => match e.upstream_message() {
            Some(message) => {
                tracing::warn!("AI service rejected upload: {}", message);
                Err(ApiError::UpstreamRejected(message.to_string()))
            }
            None => Err(ApiError::IngestFailed(
                anyhow::Error::new(e).context("AI service ingest failed"),
            )),
        },
    }
}

/// Uploaded file sitting in the upload directory
///
/// Removed from disk when dropped.
#[derive(Debug)]
struct SpooledUpload {
    path: PathBuf,
    file_name: String,
    content_type: Option<String>,
}

impl SpooledUpload {
    fn to_ingest(&self) -> IngestUpload {
        let upload = IngestUpload::new(&self.path, &self.file_name);
        match &self.content_type {
            Some(content_type) => upload.content_type(content_type),
            None => upload,
        }
    }
}

impl Drop for SpooledUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed spooled upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                "Failed to remove spooled upload: {}",
                e
            ),
        }
    }
}

/// Write the first file part named `file` to disk
///
/// Returns `None` when the form carries no such file part. Other fields
/// are skipped.
async fn spool_upload(
    multipart: &mut Multipart,
    upload_dir: &Path,
) -> ApiResult<Option<SpooledUpload>> {
    while let Some(field) = multipart.next_field().await.map_err(ingest_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            // A plain text field called "file", or a file input left empty
            continue;
        };

        tokio::fs::create_dir_all(upload_dir).await.map_err(ingest_error)?;

        let spooled = SpooledUpload {
            path: upload_dir.join(uuid::Uuid::new_v4().simple().to_string()),
            file_name,
            content_type: field.content_type().map(str::to_string),
        };

        // On error `spooled` is dropped here, taking the partial file with it
        write_field(field, &spooled.path).await?;

        return Ok(Some(spooled));
    }

    Ok(None)
}

async fn write_field(mut field: Field<'_>, path: &Path) -> ApiResult<()> {
    let mut file = tokio::fs::File::create(path).await.map_err(ingest_error)?;

    while let Some(chunk) = field.chunk().await.map_err(ingest_error)? {
        file.write_all(&chunk).await.map_err(ingest_error)?;
    }
    file.flush().await.map_err(ingest_error)?;

    Ok(())
}

fn ingest_error<E>(e: E) -> ApiError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ApiError::IngestFailed(anyhow::Error::new(e).context("Failed to spool upload"))
}
