pub mod snapshot;
pub mod sort_key;
pub mod story;

pub use snapshot::FeedSnapshot;
pub use sort_key::SortKey;
pub use story::{Story, StoryId};
