//! Local search over the loaded feed.
//!
//! [`filter`] is the pure matcher. [`LiveFilter`] wraps it for interactive
//! use: query edits are debounced, every request supersedes the previous one,
//! and results reach subscribers over a `watch` channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::domain::Story;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Stories whose type, title, url or text contain `query`, ignoring case.
///
/// An empty query returns every story. Whitespace in the query is matched
/// like any other character. Input order is kept.
pub fn filter(stories: &[Story], query: &str) -> Vec<Story> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return stories.to_vec();
    }

    stories
        .iter()
        .filter(|story| matches(story, &needle))
        .cloned()
        .collect()
}

fn matches(story: &Story, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(story.kind.as_str())
        || story.title.as_deref().is_some_and(contains)
        || story.url.as_deref().is_some_and(contains)
        || story.text.as_deref().is_some_and(contains)
}

struct FilterState {
    stories: Arc<Vec<Story>>,
    query: String,
    /// Sequence number of the most recently issued request.
    latest: u64,
    pending: Option<CancellationToken>,
}

struct Shared {
    state: Mutex<FilterState>,
    tx: watch::Sender<Vec<Story>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FilterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes `results` only if `seq` is still the latest request.
    fn publish(&self, seq: u64, results: Vec<Story>) -> bool {
        let mut state = self.lock();
        if state.latest != seq {
            tracing::trace!("Discarding superseded filter result {}", seq);
            return false;
        }
        state.pending = None;
        self.tx.send_replace(results);
        true
    }
}

/// Debounced, cancel-on-supersede filter over a changing story list.
///
/// Scheduling methods spawn onto the current Tokio runtime.
#[derive(Clone)]
pub struct LiveFilter {
    shared: Arc<Shared>,
    debounce: Duration,
}

impl LiveFilter {
    pub fn new(stories: Vec<Story>, debounce: Duration) -> Self {
        let (tx, _) = watch::channel(stories.clone());
        let state = FilterState {
            stories: Arc::new(stories),
            query: String::new(),
            latest: 0,
            pending: None,
        };

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                tx,
            }),
            debounce,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Story>> {
        self.shared.tx.subscribe()
    }

    /// The most recently published result.
    pub fn visible(&self) -> Vec<Story> {
        self.shared.tx.borrow().clone()
    }

    pub fn query(&self) -> String {
        self.shared.lock().query.clone()
    }

    /// Replaces the query; the result is published after the debounce window
    /// unless another request arrives first.
    pub fn set_query(&self, query: impl Into<String>) {
        self.shared.lock().query = query.into();
        self.schedule(self.debounce);
    }

    /// Replaces the underlying stories and re-filters straight away.
    pub fn set_stories(&self, stories: Vec<Story>) {
        self.shared.lock().stories = Arc::new(stories);
        self.schedule(Duration::ZERO);
    }

    /// Leaves filter mode: drops the query and any pending request and shows
    /// every story.
    pub fn clear(&self) {
        let (seq, stories) = {
            let mut state = self.shared.lock();
            state.query.clear();
            if let Some(pending) = state.pending.take() {
                pending.cancel();
            }
            state.latest += 1;
            (state.latest, state.stories.clone())
        };
        self.shared.publish(seq, stories.as_ref().clone());
    }

    fn schedule(&self, delay: Duration) {
        let (seq, token) = {
            let mut state = self.shared.lock();
            if let Some(previous) = state.pending.take() {
                previous.cancel();
            }
            state.latest += 1;
            let token = CancellationToken::new();
            state.pending = Some(token.clone());
            (state.latest, token)
        };

        let shared = self.shared.clone();
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let (stories, query) = {
                let state = shared.lock();
                (state.stories.clone(), state.query.clone())
            };
            if token.is_cancelled() {
                return;
            }

            let results = filter(&stories, &query);
            if !token.is_cancelled() {
                shared.publish(seq, results);
            }
        });
    }
}
