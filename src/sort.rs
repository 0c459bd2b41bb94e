//! Feed ordering.
//!
//! All orderings are stable sorts, so stories that compare equal keep their
//! relative position from the input.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::domain::{SortKey, Story, StoryId};

/// Orders `stories` by `key`, or flips the current order when `reverse` is set.
///
/// `reverse` is how re-selecting the active key behaves: the sequence is
/// reversed as-is rather than re-sorted, and reversing is suppressed for
/// [`SortKey::Original`] so the ranked order can't be flipped.
pub fn apply(
    stories: &[Story],
    key: SortKey,
    original_order: &[StoryId],
    reverse: bool,
) -> Vec<Story> {
    if reverse {
        return reversed(stories, key);
    }

    let mut sorted = stories.to_vec();
    sort_in_place(&mut sorted, key, original_order);
    sorted
}

pub fn sort_in_place(stories: &mut [Story], key: SortKey, original_order: &[StoryId]) {
    match key {
        SortKey::Original => {
            let ranks = rank_map(original_order);
            // Unranked ids go last.
            stories.sort_by_key(|s| ranks.get(&s.id).copied().unwrap_or(usize::MAX));
        }
        SortKey::Time => stories.sort_by_key(|s| Reverse(s.time)),
        SortKey::Score => stories.sort_by_key(|s| Reverse(s.score)),
        SortKey::Comments => stories.sort_by_key(|s| Reverse(s.comments())),
        SortKey::Type => stories.sort_by(|a, b| a.kind.cmp(&b.kind)),
    }
}

pub fn reversed(stories: &[Story], key: SortKey) -> Vec<Story> {
    if key == SortKey::Original {
        return stories.to_vec();
    }
    stories.iter().rev().cloned().collect()
}

/// Position of each id in the rank baseline. A duplicated id keeps its first rank.
fn rank_map(original_order: &[StoryId]) -> HashMap<StoryId, usize> {
    let mut ranks = HashMap::with_capacity(original_order.len());
    for (rank, &id) in original_order.iter().enumerate() {
        ranks.entry(id).or_insert(rank);
    }
    ranks
}
