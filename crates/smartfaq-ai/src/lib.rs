pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::AiServiceClient;
pub use error::{AiServiceError, Result};
pub use traits::AiService;
pub use types::{AskRequest, AskResponse, IngestUpload, ServiceStatus};
