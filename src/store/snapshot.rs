use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app::Result;
use crate::domain::{FeedSnapshot, SortKey, Story, StoryId};
use crate::store::KeyValueStore;

pub const POSTS_KEY: &str = "Posts";
pub const ORIGINAL_POST_IDS_KEY: &str = "OriginalPostIDs";
pub const TITLE_KEY: &str = "Title";
pub const SORT_KEY_KEY: &str = "SortKey";
pub const SHOW_HEADLINE_KEY: &str = "ShowHeadline";

/// Maps [`FeedSnapshot`] fields onto JSON values in a [`KeyValueStore`].
#[derive(Clone)]
pub struct SnapshotCodec {
    store: Arc<dyn KeyValueStore + Send + Sync>,
}

impl SnapshotCodec {
    pub fn new(store: Arc<dyn KeyValueStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Reads the persisted snapshot. Missing or undecodable values fall back
    /// to their defaults; only store failures are errors.
    pub fn load(&self) -> Result<FeedSnapshot> {
        let defaults = FeedSnapshot::default();

        Ok(FeedSnapshot {
            stories: self.read::<Vec<Story>>(POSTS_KEY)?.unwrap_or_default(),
            original_order: self
                .read::<Vec<StoryId>>(ORIGINAL_POST_IDS_KEY)?
                .unwrap_or_default(),
            sort_key: self.read::<SortKey>(SORT_KEY_KEY)?.unwrap_or_default(),
            show_headline: self
                .read::<bool>(SHOW_HEADLINE_KEY)?
                .unwrap_or(defaults.show_headline),
            menu_title: self.read::<Option<String>>(TITLE_KEY)?.flatten(),
        })
    }

    /// Writes the story batch, the rank baseline and the menu title. A missing
    /// title removes the key.
    pub fn save_feed(&self, snapshot: &FeedSnapshot) -> Result<()> {
        self.write(POSTS_KEY, &snapshot.stories)?;
        self.write(ORIGINAL_POST_IDS_KEY, &snapshot.original_order)?;
        match &snapshot.menu_title {
            Some(title) => self.write(TITLE_KEY, title),
            None => self.store.remove(TITLE_KEY),
        }
    }

    pub fn save_sort_key(&self, key: SortKey) -> Result<()> {
        self.write(SORT_KEY_KEY, &key)
    }

    pub fn save_show_headline(&self, show: bool) -> Result<()> {
        self.write(SHOW_HEADLINE_KEY, &show)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {} value: {}", key, e);
                Ok(None)
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.store.set(key, &encoded)
    }
}
