pub mod backend;
pub mod error;
pub mod message;
pub mod session;
pub mod view;

pub use backend::{Backend, BackendClient, ChatReply, HistoryItem};
pub use error::{Result, UiError};
pub use message::{ChatMessage, Role};
pub use session::{ChatSession, UploadStatus};
pub use view::View;
