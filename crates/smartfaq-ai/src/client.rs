// HTTP client for the external AI service

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{AiServiceError, Result};
use crate::traits::AiService;
use crate::types::{AskRequest, AskResponse, ErrorBody, IngestUpload, ServiceStatus};

/// Multipart field name the ingest endpoint reads the document from
const INGEST_FIELD: &str = "file";

/// AI service client (plain HTTP, no retries)
pub struct AiServiceClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AiServiceClient {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Decode a JSON body, turning non-2xx replies into `Rejected`
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty());

            tracing::debug!(
                status = status.as_u16(),
                message = ?message,
                "AI service returned an error"
            );

            return Err(AiServiceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl AiService for AiServiceClient {
    async fn ingest(&self, upload: IngestUpload) -> Result<serde_json::Value> {
        let file = tokio::fs::File::open(&upload.path).await?;
        let length = file.metadata().await?.len();

        let mut part = Part::stream_with_length(Body::from(file), length)
            .file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new().part(INGEST_FIELD, part);

        tracing::debug!(
            file_name = %upload.file_name,
            bytes = length,
            "Forwarding document to AI service"
        );

        let response = self
            .http_client
            .post(self.endpoint("ingest"))
            .multipart(form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn ask(&self, question: &str) -> Result<AskResponse> {
        let request = AskRequest {
            question: question.to_string(),
        };

        let response = self
            .http_client
            .post(self.endpoint("ask"))
            .json(&request)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn status(&self) -> Result<ServiceStatus> {
        let response = self
            .http_client
            .get(self.endpoint("status"))
            .send()
            .await?;

        Self::read_json(response).await
    }
}
