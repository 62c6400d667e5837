use mongodb::{Client, bson::doc, options::ClientOptions};
use async_trait::async_trait;
use std::time::Duration;

use crate::trait_client::{ChatStore, StoreKind};
use crate::models::{ChatRecord, NewChat};
use crate::dbs::mongo::models::MongoChat;
use crate::dbs::mongo::repositories::MongoChatRepository;
use crate::error::{Result, PersistError};

pub struct MongoChatStore {
    chat_repo: MongoChatRepository,
}

impl MongoChatStore {
    /// Connect to MongoDB and verify the server answers a ping
    ///
    /// The driver connects lazily, so without the ping an unreachable
    /// server would only surface on the first chat.
    pub async fn connect(
        mongodb_uri: &str,
        database: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);
        options.app_name = Some("smartfaq".to_string());
        
        let client = Client::with_options(options)
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        
        client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        
        tracing::info!(database, collection, "MongoDB connection verified");
        
        Ok(Self {
            chat_repo: MongoChatRepository::new(&client, database, collection),
        })
    }
}

#[async_trait]
impl ChatStore for MongoChatStore {
    async fn save_chat(&self, chat: NewChat) -> Result<ChatRecord> {
        let mongo_chat: MongoChat = chat.into();
        self.chat_repo.insert_chat(&mongo_chat).await?;
        Ok(mongo_chat.into())
    }
    
    async fn recent_chats(&self, limit: usize) -> Result<Vec<ChatRecord>> {
        let limit = i64::try_from(limit)
            .map_err(|_| PersistError::Internal(format!("history limit out of range: {}", limit)))?;
        
        let chats = self.chat_repo.recent_chats(limit).await?;
        Ok(chats.into_iter().map(|c| c.into()).collect())
    }
    
    fn kind(&self) -> StoreKind {
        StoreKind::MongoDb
    }
}
