//! # hnfeed
//!
//! Keeps a local, sortable, searchable copy of the Hacker News top stories.
//!
//! ## Architecture
//!
//! ```text
//! StoryClient → OrderedFanoutFetcher → FeedCoordinator → sort / LiveFilter → CLI
//!                                            ↓
//!                                     SnapshotCodec → KeyValueStore
//! ```
//!
//! - [`fetcher`]: the Hacker News API client and the ordered fan-out over it
//! - [`coordinator`]: the single owner of feed state; reload, sort, headline
//! - [`sort`] / [`filter`]: pure orderings and the debounced search
//! - [`store`]: key-value persistence of the feed snapshot
//!
//! ## Quick Start
//!
//! ```bash
//! # Fetch the top stories
//! hnfeed reload
//!
//! # Show the ten best-scored
//! hnfeed sort score && hnfeed list -n 10
//!
//! # Keep the feed fresh
//! hnfeed run --interval 30m
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config, store,
/// client and coordinator.
pub mod app;

/// Command-line interface using clap.
///
/// - `run` - Reload periodically until interrupted
/// - `reload` - Reload once
/// - `list [--filter Q] [-n N]` - Print the feed
/// - `sort <key>` - Change or reverse the ordering
/// - `headline`, `title` - Menu-bar headline state
/// - `open <n>` - Open a story in the browser
pub mod cli;

/// Configuration loaded from `~/.config/hnfeed/config.toml`.
pub mod config;

/// Feed state owner: guarded reloads, sorting, headline and search.
pub mod coordinator;

/// Interval-driven background reloads with graceful shutdown.
pub mod daemon;

/// Core domain models.
///
/// - [`Story`](domain::Story): one Hacker News item
/// - [`SortKey`](domain::SortKey): feed orderings
/// - [`FeedSnapshot`](domain::FeedSnapshot): everything the coordinator persists
pub mod domain;

/// Hacker News API access.
///
/// - [`StoryClient`](fetcher::StoryClient): async trait over the two endpoints
/// - [`HttpStoryClient`](fetcher::HttpStoryClient): reqwest-based implementation
/// - [`OrderedFanoutFetcher`](fetcher::OrderedFanoutFetcher): concurrent, order-preserving item fetches
/// - [`with_timeout`](fetcher::with_timeout): deadline with cooperative cancellation
pub mod fetcher;

pub mod filter;

pub mod sort;

/// Key-value persistence.
///
/// - [`KeyValueStore`](store::KeyValueStore): get/set/remove of string values
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
/// - [`MemoryStore`](store::MemoryStore): in-process implementation
/// - [`SnapshotCodec`](store::SnapshotCodec): JSON encoding of the feed snapshot
pub mod store;
