pub mod memory;
pub mod snapshot;
pub mod sqlite;

use crate::app::Result;

pub use memory::MemoryStore;
pub use snapshot::SnapshotCodec;
pub use sqlite::SqliteStore;

/// String key-value persistence. Every `set` overwrites the whole value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
