use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::app::{HnError, Result};
use crate::domain::{Story, StoryId};
use crate::fetcher::StoryClient;

/// `0` leaves the fan-out unbounded: one in-flight request per id.
pub const DEFAULT_WORKERS: usize = 0;

/// Fetches a ranked id list concurrently and hands the stories back in the
/// order the ids were given, whatever order the requests complete in.
pub struct OrderedFanoutFetcher {
    client: Arc<dyn StoryClient + Send + Sync>,
    semaphore: Option<Arc<Semaphore>>,
}

impl OrderedFanoutFetcher {
    pub fn new(client: Arc<dyn StoryClient + Send + Sync>) -> Self {
        Self::with_workers(client, DEFAULT_WORKERS)
    }

    pub fn with_workers(client: Arc<dyn StoryClient + Send + Sync>, workers: usize) -> Self {
        let semaphore = (workers > 0).then(|| Arc::new(Semaphore::new(workers)));
        Self { client, semaphore }
    }

    /// Stories for `ids`, in `ids` order, with failed fetches left out.
    ///
    /// Every id owns one slot allocated up front; a task only ever writes its
    /// own slot, and the slots are compacted in index order once all tasks
    /// finish. Returns [`HnError::Cancelled`] as soon as `cancel` fires, with
    /// the outstanding requests aborted.
    pub async fn fetch_all(
        &self,
        ids: &[StoryId],
        cancel: &CancellationToken,
    ) -> Result<Vec<Story>> {
        let mut slots: Vec<Option<Story>> = vec![None; ids.len()];
        let mut tasks = JoinSet::new();

        for (index, &id) in ids.iter().enumerate() {
            let client = self.client.clone();
            let semaphore = self.semaphore.clone();
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let story = fetch_slot(client, semaphore, &cancel, id).await;
                (index, story)
            });
        }

        loop {
            let joined = tokio::select! {
                _ = cancel.cancelled() => {
                    tasks.abort_all();
                    return Err(HnError::Cancelled);
                }
                joined = tasks.join_next() => joined,
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((index, story)) => slots[index] = story,
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(HnError::Cancelled);
        }

        let stories: Vec<Story> = slots.into_iter().flatten().collect();
        tracing::debug!("Fetched {} of {} stories", stories.len(), ids.len());
        Ok(stories)
    }
}

async fn fetch_slot(
    client: Arc<dyn StoryClient + Send + Sync>,
    semaphore: Option<Arc<Semaphore>>,
    cancel: &CancellationToken,
    id: StoryId,
) -> Option<Story> {
    let _permit = match semaphore {
        Some(semaphore) => Some(semaphore.acquire_owned().await.ok()?),
        None => None,
    };

    if cancel.is_cancelled() {
        return None;
    }

    let result = tokio::select! {
        _ = cancel.cancelled() => return None,
        result = client.fetch_story(id) => result,
    };

    match result {
        Ok(_) if cancel.is_cancelled() => None,
        Ok(story) => Some(story),
        Err(e) => {
            tracing::debug!("Dropping story {}: {}", id, e);
            None
        }
    }
}
