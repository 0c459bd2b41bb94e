use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{HnError, Result};
use crate::config::Config;
use crate::coordinator::{CoordinatorSettings, FeedCoordinator};
use crate::fetcher::{HttpStoryClient, StoryClient};
use crate::store::sqlite::SqliteStore;
use crate::store::KeyValueStore;

pub struct AppContext {
    pub config: Config,
    pub coordinator: Arc<FeedCoordinator>,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let workers = config.feed.max_concurrent_fetches;
        Self::with_workers(db_path, config, workers)
    }

    pub fn with_workers(db_path: Option<PathBuf>, config: Config, workers: usize) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::build(store, config, workers)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let workers = config.feed.max_concurrent_fetches;
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::build(store, config, workers)
    }

    fn build(store: Arc<SqliteStore>, config: Config, workers: usize) -> Result<Self> {
        let client: Arc<dyn StoryClient + Send + Sync> = Arc::new(HttpStoryClient::with_base_url(
            &config.feed.api_base_url,
            Duration::from_secs(config.feed.request_timeout_secs),
        )?);

        let settings = CoordinatorSettings {
            workers,
            ..config.coordinator_settings()
        };
        let store: Arc<dyn KeyValueStore + Send + Sync> = store;
        let coordinator = Arc::new(FeedCoordinator::load(client, store, settings)?);

        Ok(Self {
            config,
            coordinator,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| HnError::Config("Could not find data directory".into()))?;
        let hnfeed_dir = data_dir.join("hnfeed");
        std::fs::create_dir_all(&hnfeed_dir)?;
        Ok(hnfeed_dir.join("hnfeed.db"))
    }
}
