use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {status}")]
    Backend {
        status: u16,
        /// `error` field from the backend's JSON body
        message: Option<String>,
    },

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl UiError {
    /// Message to show the user, if the backend supplied one
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            UiError::Backend { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, UiError>;
