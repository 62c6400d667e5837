use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, UiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub context_used: Vec<String>,
    pub history_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// The three backend calls the chat view makes
#[async_trait]
pub trait Backend: Send + Sync {
    async fn upload_document(&self, path: &Path) -> Result<serde_json::Value>;

    async fn chat(&self, question: &str) -> Result<ChatReply>;

    async fn history(&self) -> Result<Vec<HistoryItem>>;
}

/// reqwest client for the SmartFAQ backend
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty());

            return Err(UiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn upload_document(&self, path: &Path) -> Result<serde_json::Value> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http_client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn chat(&self, question: &str) -> Result<ChatReply> {
        let response = self
            .http_client
            .post(self.endpoint("chat"))
            .json(&serde_json::json!({ "question": question }))
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn history(&self) -> Result<Vec<HistoryItem>> {
        let response = self
            .http_client
            .get(self.endpoint("history"))
            .send()
            .await?;

        Self::read_json(response).await
    }
}
