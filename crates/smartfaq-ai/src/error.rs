use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiServiceError {
    #[error("AI service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI service rejected the request with status {status}")]
    Rejected {
        status: u16,
        /// The service's own `error` field, when it sent one
        message: Option<String>,
    },

    #[error("Invalid AI service response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl AiServiceError {
    /// Error message reported by the AI service itself, if any
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            AiServiceError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AiServiceError>;
