use async_trait::async_trait;
use std::fmt;
use crate::models::{ChatRecord, NewChat};
use crate::error::Result;

/// Which backing store is serving chat history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    MongoDb,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::MongoDb => "mongodb",
            StoreKind::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for chat history persistence
///
/// Picked once at startup (durable or fallback) and shared by every handler.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Persist a chat and return the stored record with its assigned id
    async fn save_chat(&self, chat: NewChat) -> Result<ChatRecord>;

    /// Most recent records, newest first, at most `limit`
    async fn recent_chats(&self, limit: usize) -> Result<Vec<ChatRecord>>;

    fn kind(&self) -> StoreKind;
}
