use std::fmt;
use std::path::Path;

use crate::backend::{Backend, HistoryItem};
use crate::error::Result;
use crate::message::ChatMessage;
use crate::view::View;

pub const WELCOME_MESSAGE: &str = "Hello! I am your Smart FAQ Bot. Upload a document to get started.";
pub const DOCUMENT_READY_MESSAGE: &str = "Document processed successfully! Ask me anything about it.";
const CHAT_FALLBACK_ERROR: &str = "Sorry, I encountered an error.";
const UPLOAD_FALLBACK_ERROR: &str = "Upload Failed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Ready,
    Failed(String),
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Idle => Ok(()),
            UploadStatus::Uploading => f.write_str("Uploading & Processing..."),
            UploadStatus::Ready => f.write_str("✅ Document Ready!"),
            UploadStatus::Failed(message) => write!(f, "❌ {}", message),
        }
    }
}

/// Everything the client screen keeps between renders
///
/// Switching between landing and chat only changes `view`; the transcript,
/// pending input and upload status survive the round trip.
#[derive(Debug, Clone)]
pub struct ChatSession {
    view: View,
    messages: Vec<ChatMessage>,
    input: String,
    is_loading: bool,
    upload_status: UploadStatus,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            view: View::default(),
            messages: vec![ChatMessage::bot(WELCOME_MESSAGE)],
            input: String::new(),
            is_loading: false,
            upload_status: UploadStatus::default(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn upload_status(&self) -> &UploadStatus {
        &self.upload_status
    }

    pub fn launch(&mut self) {
        self.view = self.view.launch();
    }

    pub fn back_to_home(&mut self) {
        self.view = self.view.back_to_home();
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Append the pending input as a user message and enter the loading state
    ///
    /// Returns the question to send, or `None` when the input is blank.
    pub fn begin_send(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }

        let question = std::mem::take(&mut self.input);
        self.messages.push(ChatMessage::user(question.clone()));
        self.is_loading = true;

        Some(question)
    }

    pub fn finish_send(&mut self, result: Result<String>) {
        let message = match result {
            Ok(answer) => ChatMessage::bot(answer),
            Err(e) => {
                tracing::debug!("Chat request failed: {}", e);
                let reason = e.backend_message().unwrap_or(CHAT_FALLBACK_ERROR);
                ChatMessage::bot_error(format!("⚠️ {}", reason))
            }
        };

        self.messages.push(message);
        self.is_loading = false;
    }

    /// Send the pending input and wait for the answer
    pub async fn send(&mut self, backend: &dyn Backend) {
        let Some(question) = self.begin_send() else {
            return;
        };

        let result = backend.chat(&question).await.map(|reply| reply.answer);
        self.finish_send(result);
    }

    pub fn begin_upload(&mut self) {
        self.upload_status = UploadStatus::Uploading;
    }

    pub fn finish_upload(&mut self, result: Result<()>) {
        match result {
            Ok(()) => {
                self.upload_status = UploadStatus::Ready;
                self.messages.push(ChatMessage::bot(DOCUMENT_READY_MESSAGE));
            }
            Err(e) => {
                tracing::debug!("Upload failed: {}", e);
                let reason = e.backend_message().unwrap_or(UPLOAD_FALLBACK_ERROR);
                self.upload_status = UploadStatus::Failed(reason.to_string());
            }
        }
    }

    /// Upload a document and report readiness in the transcript
    pub async fn upload(&mut self, backend: &dyn Backend, path: &Path) {
        self.begin_upload();

        let result = backend.upload_document(path).await.map(|_| ());
        self.finish_upload(result);
    }

    /// Past exchanges, newest first
    pub async fn history(&self, backend: &dyn Backend) -> Result<Vec<HistoryItem>> {
        backend.history().await
    }
}
