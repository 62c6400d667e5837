use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::{ChatRecord, NewChat};

/// MongoDB-specific chat document (uses ObjectId and a native BSON date)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChat {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub question: String,
    pub answer: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

impl From<NewChat> for MongoChat {
    fn from(chat: NewChat) -> Self {
        Self {
            id: ObjectId::new(),
            question: chat.question,
            answer: chat.answer,
            timestamp: chat.timestamp,
        }
    }
}

impl From<MongoChat> for ChatRecord {
    fn from(chat: MongoChat) -> Self {
        Self {
            id: chat.id.to_hex(),
            question: chat.question,
            answer: chat.answer,
            timestamp: chat.timestamp,
        }
    }
}
