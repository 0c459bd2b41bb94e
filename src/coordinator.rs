//! Feed orchestration.
//!
//! [`FeedCoordinator`] owns the [`FeedSnapshot`] and is the only thing that
//! mutates or persists it. Network work runs outside the snapshot lock; every
//! mutation happens under it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::app::{HnError, Result};
use crate::domain::{FeedSnapshot, SortKey, Story, StoryId};
use crate::fetcher::fanout::DEFAULT_WORKERS;
use crate::fetcher::{with_timeout, OrderedFanoutFetcher, StoryClient};
use crate::filter::{LiveFilter, DEFAULT_DEBOUNCE};
use crate::sort;
use crate::store::{KeyValueStore, SnapshotCodec};

pub const DEFAULT_TOP_STORIES_LIMIT: usize = 500;
pub const DEFAULT_RELOAD_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_TITLE_MAX_CHARS: usize = 40;

#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    pub top_stories_limit: usize,
    pub reload_timeout: Duration,
    pub debounce: Duration,
    pub title_max_chars: usize,
    /// Cap on concurrent story fetches; `0` is unbounded.
    pub workers: usize,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            top_stories_limit: DEFAULT_TOP_STORIES_LIMIT,
            reload_timeout: DEFAULT_RELOAD_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            workers: DEFAULT_WORKERS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Another reload was already running.
    Skipped,
    /// New stories replaced the feed.
    Updated { stories: usize },
    /// The fetch produced nothing usable; the previous feed was kept.
    Unchanged,
    /// The reload deadline fired first; nothing was committed.
    TimedOut,
}

struct FetchedFeed {
    ids: Vec<StoryId>,
    stories: Vec<Story>,
}

/// Clears the fetching flag however the reload ends.
struct FetchingGuard<'a>(&'a AtomicBool);

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct FeedCoordinator {
    client: Arc<dyn StoryClient + Send + Sync>,
    fanout: OrderedFanoutFetcher,
    codec: SnapshotCodec,
    snapshot: Mutex<FeedSnapshot>,
    fetching: AtomicBool,
    live: LiveFilter,
    settings: CoordinatorSettings,
}

impl FeedCoordinator {
    /// Builds a coordinator seeded from whatever `store` holds.
    pub fn load(
        client: Arc<dyn StoryClient + Send + Sync>,
        store: Arc<dyn KeyValueStore + Send + Sync>,
        settings: CoordinatorSettings,
    ) -> Result<Self> {
        let codec = SnapshotCodec::new(store);
        let snapshot = codec.load()?;
        tracing::debug!(
            "Loaded {} stories (sort: {})",
            snapshot.stories.len(),
            snapshot.sort_key
        );

        let live = LiveFilter::new(snapshot.stories.clone(), settings.debounce);
        let fanout = OrderedFanoutFetcher::with_workers(client.clone(), settings.workers);

        Ok(Self {
            client,
            fanout,
            codec,
            snapshot: Mutex::new(snapshot),
            fetching: AtomicBool::new(false),
            live,
            settings,
        })
    }

    pub fn state(&self) -> FetchState {
        if self.fetching.load(Ordering::SeqCst) {
            FetchState::Fetching
        } else {
            FetchState::Idle
        }
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.snapshot.lock().await.clone()
    }

    /// Fetches the top stories and swaps them in.
    ///
    /// A no-op while another reload is running. Whatever the fetch does, the
    /// active sort is re-applied before returning to idle.
    pub async fn reload(&self) -> ReloadOutcome {
        if self
            .fetching
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Reload already in progress, skipping");
            return ReloadOutcome::Skipped;
        }
        let _guard = FetchingGuard(&self.fetching);

        let fetched = with_timeout(self.settings.reload_timeout, |cancel| async move {
            self.fetch_feed(&cancel).await
        })
        .await;

        let mut snapshot = self.snapshot.lock().await;
        let mut changed = false;

        let outcome = match fetched {
            Ok(Ok(feed)) => {
                if snapshot.original_order != feed.ids {
                    snapshot.original_order = feed.ids;
                    changed = true;
                }
                if feed.stories.is_empty() {
                    tracing::info!("No stories fetched, keeping previous feed");
                    ReloadOutcome::Unchanged
                } else {
                    let count = feed.stories.len();
                    snapshot.stories = feed.stories;
                    changed = true;
                    ReloadOutcome::Updated { stories: count }
                }
            }
            Ok(Err(e)) => {
                log_feed_error("Reload produced no update", &e);
                ReloadOutcome::Unchanged
            }
            Err(e) => {
                tracing::warn!("Reload abandoned: {}", e);
                ReloadOutcome::TimedOut
            }
        };

        let key = snapshot.sort_key;
        let sorted = sort::apply(&snapshot.stories, key, &snapshot.original_order, false);
        if sorted != snapshot.stories {
            snapshot.stories = sorted;
            changed = true;
        }

        if changed {
            self.publish_feed(&mut snapshot).await;
        }

        outcome
    }

    async fn fetch_feed(&self, cancel: &CancellationToken) -> Result<FetchedFeed> {
        let ids = tokio::select! {
            _ = cancel.cancelled() => return Err(HnError::Cancelled),
            ids = self.client.fetch_top_ids(self.settings.top_stories_limit) => ids?,
        };

        if ids.is_empty() {
            return Ok(FetchedFeed {
                ids,
                stories: Vec::new(),
            });
        }

        let stories = self.fanout.fetch_all(&ids, cancel).await?;
        tracing::info!("Fetched {} of {} top stories", stories.len(), ids.len());

        Ok(FetchedFeed { ids, stories })
    }

    /// Switches to `key`, or reverses the current order when `key` is already
    /// active (a no-op for [`SortKey::Original`]).
    pub async fn select_sort_key(&self, key: SortKey) {
        let mut snapshot = self.snapshot.lock().await;

        let reverse = key == snapshot.sort_key;
        if !reverse {
            snapshot.sort_key = key;
            if let Err(e) = self.codec.save_sort_key(key) {
                tracing::warn!("Failed to persist sort key: {}", e);
            }
        }

        let sorted = sort::apply(&snapshot.stories, key, &snapshot.original_order, reverse);
        if sorted != snapshot.stories {
            snapshot.stories = sorted;
            self.publish_feed(&mut snapshot).await;
        }
    }

    pub async fn set_show_headline(&self, show: bool) {
        let mut snapshot = self.snapshot.lock().await;
        self.store_show_headline(&mut snapshot, show);
    }

    /// Flips the headline setting and returns the new value.
    pub async fn toggle_headline(&self) -> bool {
        let mut snapshot = self.snapshot.lock().await;
        let show = !snapshot.show_headline;
        self.store_show_headline(&mut snapshot, show);
        show
    }

    fn store_show_headline(&self, snapshot: &mut FeedSnapshot, show: bool) {
        if snapshot.show_headline == show {
            return;
        }

        snapshot.show_headline = show;
        if let Err(e) = self.codec.save_show_headline(show) {
            tracing::warn!("Failed to persist headline setting: {}", e);
        }
    }

    pub async fn headline(&self) -> String {
        self.snapshot.lock().await.headline().to_string()
    }

    /// Debounced: see [`LiveFilter::set_query`].
    pub fn set_query(&self, query: impl Into<String>) {
        self.live.set_query(query);
    }

    pub fn clear_query(&self) {
        self.live.clear();
    }

    /// The filtered list as last published.
    pub fn visible(&self) -> Vec<Story> {
        self.live.visible()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Story>> {
        self.live.subscribe()
    }

    /// Recomputes the menu title, persists the feed and hands the new order to
    /// the live filter. Called with the snapshot lock held, so writes land in
    /// the order the mutations happened.
    async fn publish_feed(&self, snapshot: &mut FeedSnapshot) {
        if let Some(title) = snapshot.stories.first().and_then(|s| s.title.as_deref()) {
            snapshot.menu_title = Some(truncate_title(title, self.settings.title_max_chars));
        }

        // Encoding and writing the story batch blocks.
        let codec = self.codec.clone();
        let saved = snapshot.clone();
        match tokio::task::spawn_blocking(move || codec.save_feed(&saved)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Failed to persist feed: {}", e),
            Err(e) => tracing::error!("Feed persistence task failed: {}", e),
        }

        self.live.set_stories(snapshot.stories.clone());
    }
}

fn log_feed_error(context: &str, e: &HnError) {
    if e.is_feed_error() {
        tracing::warn!("{}: {}", context, e);
    } else {
        tracing::error!("{}: {}", context, e);
    }
}

/// Shortens `title` to at most `max_chars` characters, ending in an ellipsis
/// when cut.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }

    let kept: String = title.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::store::snapshot::{POSTS_KEY, SHOW_HEADLINE_KEY, SORT_KEY_KEY};
    use crate::store::MemoryStore;

    /// Client double: `top_ids = None` fails the top-stories call, ids missing
    /// from `stories` fail their item call.
    struct ScriptedClient {
        top_ids: StdMutex<Option<Vec<StoryId>>>,
        stories: StdMutex<HashMap<StoryId, Story>>,
        top_delay: Duration,
        story_delay: Duration,
        top_calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(top_ids: &[StoryId], stories: Vec<Story>) -> Self {
            Self {
                top_ids: StdMutex::new(Some(top_ids.to_vec())),
                stories: StdMutex::new(stories.into_iter().map(|s| (s.id, s)).collect()),
                top_delay: Duration::ZERO,
                story_delay: Duration::from_millis(5),
                top_calls: AtomicUsize::new(0),
            }
        }

        fn set_top_ids(&self, ids: Option<Vec<StoryId>>) {
            *self.top_ids.lock().unwrap() = ids;
        }

        fn set_stories(&self, stories: Vec<Story>) {
            *self.stories.lock().unwrap() = stories.into_iter().map(|s| (s.id, s)).collect();
        }
    }

    #[async_trait]
    impl StoryClient for ScriptedClient {
        async fn fetch_top_ids(&self, limit: usize) -> Result<Vec<StoryId>> {
            self.top_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.top_delay).await;
            let ids = self.top_ids.lock().unwrap().clone();
            match ids {
                Some(mut ids) => {
                    ids.truncate(limit);
                    Ok(ids)
                }
                None => Err(HnError::Other("topstories unavailable".into())),
            }
        }

        async fn fetch_story(&self, id: StoryId) -> Result<Story> {
            // Later ranks answer first.
            let delay = self.story_delay.saturating_sub(Duration::from_micros(id));
            tokio::time::sleep(delay).await;
            let story = self.stories.lock().unwrap().get(&id).cloned();
            story.ok_or_else(|| HnError::Other(format!("item {} unavailable", id)))
        }
    }

    fn story(id: StoryId, title: &str, score: i64) -> Story {
        let mut story = Story::new(id, "author", "story");
        story.title = Some(title.to_string());
        story.score = score;
        story
    }

    fn sample_stories() -> Vec<Story> {
        vec![
            story(1, "Rust kernel", 30),
            story(2, "Zig allocator tricks", 10),
            story(3, "Show HN: a tiny database", 20),
        ]
    }

    fn coordinator_with(
        client: Arc<ScriptedClient>,
        store: Arc<MemoryStore>,
        settings: CoordinatorSettings,
    ) -> FeedCoordinator {
        FeedCoordinator::load(client, store, settings).unwrap()
    }

    fn ids(stories: &[Story]) -> Vec<StoryId> {
        stories.iter().map(|s| s.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_keeps_rank_order() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let store = Arc::new(MemoryStore::new());
        let coordinator =
            coordinator_with(client, store.clone(), CoordinatorSettings::default());

        let outcome = coordinator.reload().await;

        assert_eq!(outcome, ReloadOutcome::Updated { stories: 3 });
        let snapshot = coordinator.snapshot().await;
        assert_eq!(ids(&snapshot.stories), vec![3, 1, 2]);
        assert_eq!(snapshot.original_order, vec![3, 1, 2]);
        assert_eq!(snapshot.menu_title.as_deref(), Some("Show HN: a tiny database"));
        assert!(store.get(POSTS_KEY).unwrap().is_some());
        assert_eq!(coordinator.state(), FetchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_applies_active_sort() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let coordinator = coordinator_with(
            client,
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        );

        coordinator.select_sort_key(SortKey::Score).await;
        coordinator.reload().await;

        let snapshot = coordinator.snapshot().await;
        assert_eq!(ids(&snapshot.stories), vec![1, 3, 2]);
        assert_eq!(snapshot.original_order, vec![3, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_respects_top_stories_limit() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let settings = CoordinatorSettings {
            top_stories_limit: 2,
            ..CoordinatorSettings::default()
        };
        let coordinator = coordinator_with(client, Arc::new(MemoryStore::new()), settings);

        coordinator.reload().await;

        assert_eq!(ids(&coordinator.snapshot().await.stories), vec![3, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_drops_only_failed_stories() {
        let client = Arc::new(ScriptedClient::new(&[3, 9, 1, 2], sample_stories()));
        let coordinator = coordinator_with(
            client,
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        );

        let outcome = coordinator.reload().await;

        assert_eq!(outcome, ReloadOutcome::Updated { stories: 3 });
        let snapshot = coordinator.snapshot().await;
        assert_eq!(ids(&snapshot.stories), vec![3, 1, 2]);
        assert_eq!(snapshot.original_order, vec![3, 9, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_fanout_keeps_previous_feed() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let coordinator = coordinator_with(
            client.clone(),
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        );
        coordinator.reload().await;
        let before = coordinator.snapshot().await.stories;

        client.set_top_ids(Some(vec![4, 5]));
        client.set_stories(Vec::new());
        let outcome = coordinator.reload().await;

        assert_eq!(outcome, ReloadOutcome::Unchanged);
        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.stories, before);
        assert_eq!(snapshot.original_order, vec![4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_top_ids_failure_keeps_feed_and_baseline() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let coordinator = coordinator_with(
            client.clone(),
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        );
        coordinator.reload().await;

        client.set_top_ids(None);
        let outcome = coordinator.reload().await;

        assert_eq!(outcome, ReloadOutcome::Unchanged);
        let snapshot = coordinator.snapshot().await;
        assert_eq!(ids(&snapshot.stories), vec![3, 1, 2]);
        assert_eq!(snapshot.original_order, vec![3, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_top_ids_keeps_stories() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let coordinator = coordinator_with(
            client.clone(),
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        );
        coordinator.reload().await;

        client.set_top_ids(Some(Vec::new()));
        let outcome = coordinator.reload().await;

        assert_eq!(outcome, ReloadOutcome::Unchanged);
        let snapshot = coordinator.snapshot().await;
        assert_eq!(ids(&snapshot.stories), vec![3, 1, 2]);
        assert!(snapshot.original_order.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_reload_is_skipped() {
        let mut scripted = ScriptedClient::new(&[3, 1, 2], sample_stories());
        scripted.top_delay = Duration::from_secs(10);
        let client = Arc::new(scripted);
        let coordinator = Arc::new(coordinator_with(
            client.clone(),
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        ));

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.reload().await }
        });
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(coordinator.state(), FetchState::Fetching);
        assert_eq!(coordinator.reload().await, ReloadOutcome::Skipped);

        assert_eq!(first.await.unwrap(), ReloadOutcome::Updated { stories: 3 });
        assert_eq!(client.top_calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.state(), FetchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_reload_times_out_without_mutation() {
        let mut scripted = ScriptedClient::new(&[3, 1, 2], sample_stories());
        scripted.story_delay = Duration::from_secs(600);
        let client = Arc::new(scripted);
        let store = Arc::new(MemoryStore::new());
        let settings = CoordinatorSettings {
            reload_timeout: Duration::from_secs(60),
            ..CoordinatorSettings::default()
        };
        let coordinator = coordinator_with(client, store.clone(), settings);

        let started = Instant::now();
        let outcome = coordinator.reload().await;

        assert_eq!(outcome, ReloadOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(61));
        let snapshot = coordinator.snapshot().await;
        assert!(snapshot.stories.is_empty());
        assert!(snapshot.original_order.is_empty());
        assert!(store.get(POSTS_KEY).unwrap().is_none());
        assert_eq!(coordinator.state(), FetchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselecting_key_reverses() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let store = Arc::new(MemoryStore::new());
        let coordinator =
            coordinator_with(client, store.clone(), CoordinatorSettings::default());
        coordinator.reload().await;

        coordinator.select_sort_key(SortKey::Score).await;
        assert_eq!(ids(&coordinator.snapshot().await.stories), vec![1, 3, 2]);
        assert_eq!(store.get(SORT_KEY_KEY).unwrap().as_deref(), Some("\"score\""));

        coordinator.select_sort_key(SortKey::Score).await;
        let snapshot = coordinator.snapshot().await;
        assert_eq!(ids(&snapshot.stories), vec![2, 3, 1]);
        assert_eq!(snapshot.sort_key, SortKey::Score);
        assert_eq!(snapshot.menu_title.as_deref(), Some("Zig allocator tricks"));

        coordinator.select_sort_key(SortKey::Score).await;
        assert_eq!(ids(&coordinator.snapshot().await.stories), vec![1, 3, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselecting_original_is_noop() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let coordinator = coordinator_with(
            client,
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        );
        coordinator.reload().await;

        coordinator.select_sort_key(SortKey::Original).await;

        assert_eq!(ids(&coordinator.snapshot().await.stories), vec![3, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returning_to_original_restores_rank() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let coordinator = coordinator_with(
            client,
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        );
        coordinator.reload().await;

        coordinator.select_sort_key(SortKey::Score).await;
        coordinator.select_sort_key(SortKey::Score).await;
        coordinator.select_sort_key(SortKey::Original).await;

        assert_eq!(ids(&coordinator.snapshot().await.stories), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_headline_toggle_is_persisted() {
        let client = Arc::new(ScriptedClient::new(&[], Vec::new()));
        let store = Arc::new(MemoryStore::new());
        let coordinator =
            coordinator_with(client, store.clone(), CoordinatorSettings::default());

        assert_eq!(coordinator.headline().await, "Reading HN…");
        assert!(!coordinator.toggle_headline().await);
        assert_eq!(coordinator.headline().await, "ℏ");
        assert_eq!(store.get(SHOW_HEADLINE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_concurrent_toggles_both_apply() {
        let client = Arc::new(ScriptedClient::new(&[], Vec::new()));
        let store = Arc::new(MemoryStore::new());
        let coordinator = Arc::new(coordinator_with(
            client,
            store.clone(),
            CoordinatorSettings::default(),
        ));

        // Queue both toggles behind the snapshot lock so they contend.
        let held = coordinator.snapshot.lock().await;
        let toggles: Vec<_> = (0..2)
            .map(|_| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.toggle_headline().await })
            })
            .collect();
        tokio::task::yield_now().await;
        drop(held);

        let mut results = Vec::new();
        for toggle in toggles {
            results.push(toggle.await.unwrap());
        }
        results.sort();

        assert_eq!(results, vec![false, true]);
        assert!(coordinator.snapshot().await.show_headline);
        assert_eq!(store.get(SHOW_HEADLINE_KEY).unwrap().as_deref(), Some("true"));
    }

    /// Records the thread each write of the story batch ran on.
    #[derive(Default)]
    struct ThreadRecordingStore {
        inner: MemoryStore,
        posts_writers: StdMutex<Vec<std::thread::ThreadId>>,
    }

    impl KeyValueStore for ThreadRecordingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == POSTS_KEY {
                self.posts_writers
                    .lock()
                    .unwrap()
                    .push(std::thread::current().id());
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_writes_run_off_the_runtime_thread() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let store = Arc::new(ThreadRecordingStore::default());
        let coordinator = FeedCoordinator::load(
            client,
            store.clone(),
            CoordinatorSettings::default(),
        )
        .unwrap();

        coordinator.reload().await;
        coordinator.select_sort_key(SortKey::Score).await;

        let writers = store.posts_writers.lock().unwrap().clone();
        assert_eq!(writers.len(), 2);
        assert!(writers.iter().all(|id| *id != std::thread::current().id()));
        assert!(store.get(POSTS_KEY).unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_survives_restart() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let store = Arc::new(MemoryStore::new());
        let coordinator =
            coordinator_with(client.clone(), store.clone(), CoordinatorSettings::default());
        coordinator.reload().await;
        coordinator.select_sort_key(SortKey::Score).await;
        coordinator.set_show_headline(false).await;
        let before = coordinator.snapshot().await;

        let restarted = coordinator_with(client, store, CoordinatorSettings::default());

        assert_eq!(restarted.snapshot().await, before);
        assert_eq!(ids(&restarted.visible()), vec![1, 3, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_follows_reload() {
        let client = Arc::new(ScriptedClient::new(&[3, 1, 2], sample_stories()));
        let coordinator = coordinator_with(
            client.clone(),
            Arc::new(MemoryStore::new()),
            CoordinatorSettings::default(),
        );
        coordinator.reload().await;

        coordinator.set_query("RUST");
        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(10)).await;
        assert_eq!(ids(&coordinator.visible()), vec![1]);

        let mut next = sample_stories();
        next.push(story(4, "Rust for the web", 5));
        client.set_stories(next);
        client.set_top_ids(Some(vec![4, 3, 1, 2]));
        coordinator.reload().await;
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(ids(&coordinator.visible()), vec![4, 1]);

        coordinator.clear_query();
        assert_eq!(ids(&coordinator.visible()), vec![4, 3, 1, 2]);
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Short", 10), "Short");
        assert_eq!(truncate_title("Exactly ten", 11), "Exactly ten");
        assert_eq!(truncate_title("Show HN: a tiny database", 10), "Show HN:…");
        assert_eq!(truncate_title("Ünïcödé títle", 5), "Ünïc…");
    }
}
