use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Database-agnostic chat record
///
/// One question/answer round-trip. Records are never mutated after the
/// owning store hands them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

/// Insert payload; the store assigns the identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChat {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

impl NewChat {
    /// New chat stamped with the current time
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn into_record(self, id: String) -> ChatRecord {
        ChatRecord {
            id,
            question: self.question,
            answer: self.answer,
            timestamp: self.timestamp,
        }
    }
}
