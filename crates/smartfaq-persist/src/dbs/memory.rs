use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use crate::models::{ChatRecord, NewChat};
use crate::trait_client::{ChatStore, StoreKind};
use crate::error::Result;

/// Number of chats the fallback store keeps
pub const FALLBACK_CAPACITY: usize = 50;

/// Bounded in-memory chat store used when MongoDB is unreachable
///
/// Records are kept most-recent-first. Inserting into a full store evicts
/// the oldest record before the new one goes in, so the buffer never grows
/// past its capacity. Ids are millisecond timestamps, bumped forward when
/// two inserts land in the same millisecond.
pub struct InMemoryChatStore {
    inner: RwLock<Ring>,
    capacity: usize,
}

struct Ring {
    records: VecDeque<ChatRecord>,
    last_id: i64,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::with_capacity(FALLBACK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: RwLock::new(Ring {
                records: VecDeque::with_capacity(capacity),
                last_id: 0,
            }),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

impl Default for InMemoryChatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Ring {
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last_id = if now > self.last_id { now } else { self.last_id + 1 };
        self.last_id.to_string()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn save_chat(&self, chat: NewChat) -> Result<ChatRecord> {
        let mut ring = self.inner.write().await;

        let record = chat.into_record(ring.next_id());

        while ring.records.len() >= self.capacity {
            if let Some(evicted) = ring.records.pop_back() {
                tracing::debug!(id = %evicted.id, "Evicted oldest chat from fallback store");
            }
        }
        ring.records.push_front(record.clone());

        Ok(record)
    }

    async fn recent_chats(&self, limit: usize) -> Result<Vec<ChatRecord>> {
        let ring = self.inner.read().await;

        let mut records: Vec<ChatRecord> = ring.records.iter().cloned().collect();
        // Stable sort keeps insertion order for equal timestamps
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);

        Ok(records)
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }
}
