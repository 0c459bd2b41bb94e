use serde::{Deserialize, Serialize};

use super::{SortKey, Story, StoryId};

pub const PLACEHOLDER_HEADLINE: &str = "Reading HN…";
pub const COMPACT_HEADLINE: &str = "ℏ";

/// Coordinator-owned feed state, persisted key by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub stories: Vec<Story>,
    /// Rank baseline from the last successful top-stories fetch.
    pub original_order: Vec<StoryId>,
    pub sort_key: SortKey,
    pub show_headline: bool,
    pub menu_title: Option<String>,
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self {
            stories: Vec::new(),
            original_order: Vec::new(),
            sort_key: SortKey::Original,
            show_headline: true,
            menu_title: None,
        }
    }
}

impl FeedSnapshot {
    /// Label for the menu bar: the top story's title when headlines are on,
    /// a compact glyph otherwise.
    pub fn headline(&self) -> &str {
        if self.show_headline {
            self.menu_title.as_deref().unwrap_or(PLACEHOLDER_HEADLINE)
        } else {
            COMPACT_HEADLINE
        }
    }

    pub fn story_at(&self, position: usize) -> Option<&Story> {
        position
            .checked_sub(1)
            .and_then(|index| self.stories.get(index))
    }
}
