use mongodb::{Client, Collection, bson::doc, bson::oid::ObjectId};
use futures::TryStreamExt;

use crate::dbs::mongo::models::MongoChat;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoChatRepository {
    collection: Collection<MongoChat>,
}

impl MongoChatRepository {
    pub fn new(client: &Client, db_name: &str, collection: &str) -> Self {
        let collection = client.database(db_name).collection(collection);
        Self { collection }
    }
    
    /// Insert a single chat
    pub async fn insert_chat(&self, chat: &MongoChat) -> Result<ObjectId> {
        self.collection.insert_one(chat).await?;
        Ok(chat.id)
    }
    
    /// Latest chats by timestamp, newest first
    pub async fn recent_chats(&self, limit: i64) -> Result<Vec<MongoChat>> {
        let chats = self.collection
            .find(doc! {})
            .sort(doc! { "timestamp": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(chats)
    }
}
