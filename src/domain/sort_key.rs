use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User-selectable ordering of the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Rank from the last successful top-stories fetch.
    #[default]
    Original,
    Time,
    Score,
    Comments,
    Type,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Original,
        SortKey::Time,
        SortKey::Score,
        SortKey::Comments,
        SortKey::Type,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Original => "Original",
            SortKey::Time => "Time",
            SortKey::Score => "Score",
            SortKey::Comments => "Comments",
            SortKey::Type => "Type",
        }
    }

    /// Single-key shortcut, `1` through `5`.
    pub fn shortcut(self) -> char {
        match self {
            SortKey::Original => '1',
            SortKey::Time => '2',
            SortKey::Score => '3',
            SortKey::Comments => '4',
            SortKey::Type => '5',
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortKey::ALL
            .into_iter()
            .find(|key| key.label().eq_ignore_ascii_case(s) || s == key.shortcut().to_string())
            .ok_or_else(|| {
                format!(
                    "Unknown sort key: {}. Use one of original, time, score, comments, type (or 1-5)",
                    s
                )
            })
    }
}
