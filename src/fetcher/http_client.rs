use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::app::Result;
use crate::domain::{Story, StoryId};
use crate::fetcher::StoryClient;

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpStoryClient {
    client: Client,
    base_url: Url,
}

impl HttpStoryClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_base_url(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(request_timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("hnfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn top_stories_url(&self) -> Result<Url> {
        Ok(self.base_url.join("topstories.json")?)
    }

    pub fn item_url(&self, id: StoryId) -> Result<Url> {
        Ok(self.base_url.join(&format!("item/{}.json", id))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl StoryClient for HttpStoryClient {
    async fn fetch_top_ids(&self, limit: usize) -> Result<Vec<StoryId>> {
        let mut ids: Vec<StoryId> = self.get_json(self.top_stories_url()?).await?;
        ids.truncate(limit);
        Ok(ids)
    }

    async fn fetch_story(&self, id: StoryId) -> Result<Story> {
        self.get_json(self.item_url(id)?).await
    }
}
