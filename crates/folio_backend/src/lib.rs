mod engine;
mod env;
mod folder_index;
mod kv;
mod memory_store;
mod settings;
mod sqlite_store;
mod store;
#[cfg(test)]
mod test_support;
mod time;

pub use engine::{Engine, EngineOptions};
pub use env::resolve_folio_root;
pub use folder_index::InMemoryFolderUnreadIndex;
pub use kv::{ChangeListener, KeyValueStore, OriginId, StorageChange, SubscriptionId};
pub use memory_store::MemoryKeyValueStore;
pub use settings::SettingsRepository;
pub use sqlite_store::{SqliteStore, SqliteStoreOptions};
pub use store::Store;
