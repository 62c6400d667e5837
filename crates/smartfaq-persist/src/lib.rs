pub mod models;
pub mod dbs;
pub mod error;
pub mod trait_client;

pub use models::{ChatRecord, NewChat};
pub use error::{PersistError, Result};
pub use trait_client::{ChatStore, StoreKind};
pub use dbs::memory::{InMemoryChatStore, FALLBACK_CAPACITY};

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoChatStore;
