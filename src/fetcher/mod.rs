pub mod fanout;
pub mod http_client;
pub mod timeout;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Story, StoryId};

pub use fanout::OrderedFanoutFetcher;
pub use http_client::HttpStoryClient;
pub use timeout::with_timeout;

/// Source of Hacker News data. No retries at this layer: a failed call means
/// "nothing this cycle" to the caller.
#[async_trait]
pub trait StoryClient {
    /// Ranked top-story ids, truncated to the first `limit`.
    async fn fetch_top_ids(&self, limit: usize) -> Result<Vec<StoryId>>;

    async fn fetch_story(&self, id: StoryId) -> Result<Story>;
}
