use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HnError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Timed out after {0:?}")]
    TimeoutExceeded(Duration),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Story not found: {0}")]
    StoryNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl HnError {
    /// Feed errors are tolerated by the reload path: they mean "no update this
    /// cycle" rather than a failure worth surfacing.
    pub fn is_feed_error(&self) -> bool {
        matches!(
            self,
            HnError::Network(_)
                | HnError::Decode(_)
                | HnError::TimeoutExceeded(_)
                | HnError::Cancelled
        )
    }
}

pub type Result<T> = std::result::Result<T, HnError>;
