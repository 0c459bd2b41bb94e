use chrono::{DateTime, Utc};
use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};

pub type StoryId = u64;

const UNTITLED: &str = "(Untitled)";

/// One Hacker News item as served by `/v0/item/{id}.json`.
///
/// Field names follow the API on the wire (`by`, `descendants`, `type`) so the
/// same encoding is used for the persisted `Posts` batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    #[serde(rename = "by")]
    pub author: String,
    pub score: i64,
    pub time: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "descendants", default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kids: Option<Vec<StoryId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Story {
    pub fn new(id: StoryId, author: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            author: author.into(),
            score: 0,
            time: 0,
            kind: kind.into(),
            comment_count: None,
            kids: None,
            title: None,
            text: None,
            url: None,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Comment count with "unknown" folded into zero.
    pub fn comments(&self) -> i64 {
        self.comment_count.unwrap_or(0)
    }

    pub fn discussion_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }

    /// Self-post body with HTML entities decoded.
    pub fn plain_text(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(|t| decode_html_entities(t).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM_JSON: &str = r#"{
        "by": "dhouston",
        "descendants": 71,
        "id": 8863,
        "kids": [8952, 9224],
        "score": 111,
        "time": 1175714200,
        "title": "My YC app: Dropbox - Throw away your USB drive",
        "type": "story",
        "url": "http://www.getdropbox.com/u/2/screencast.html"
    }"#;

    #[test]
    fn test_decode_maps_api_field_names() {
        let story: Story = serde_json::from_str(ITEM_JSON).unwrap();
        assert_eq!(story.id, 8863);
        assert_eq!(story.author, "dhouston");
        assert_eq!(story.comment_count, Some(71));
        assert_eq!(story.kind, "story");
        assert_eq!(story.kids, Some(vec![8952, 9224]));
        assert!(story.text.is_none());
    }

    #[test]
    fn test_decode_without_optional_fields() {
        let story: Story = serde_json::from_str(
            r#"{"by":"pg","id":1,"score":3,"time":1160418111,"type":"job"}"#,
        )
        .unwrap();
        assert_eq!(story.comment_count, None);
        assert_eq!(story.comments(), 0);
        assert_eq!(story.display_title(), "(Untitled)");
    }

    #[test]
    fn test_decode_rejects_null_item() {
        assert!(serde_json::from_str::<Story>("null").is_err());
    }

    #[test]
    fn test_encoding_keeps_wire_names() {
        let story: Story = serde_json::from_str(ITEM_JSON).unwrap();
        let value = serde_json::to_value(&story).unwrap();
        assert_eq!(value["by"], "dhouston");
        assert_eq!(value["descendants"], 71);
        assert_eq!(value["type"], "story");
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_discussion_url() {
        let story = Story::new(42, "pg", "story");
        assert_eq!(
            story.discussion_url(),
            "https://news.ycombinator.com/item?id=42"
        );
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        let mut story = Story::new(1, "pg", "story");
        story.text = Some("Rust &amp; Zig &#x27;fast&#x27;".into());
        assert_eq!(story.plain_text().as_deref(), Some("Rust & Zig 'fast'"));
    }

    #[test]
    fn test_published_at() {
        let mut story = Story::new(1, "pg", "story");
        story.time = 1_175_714_200;
        let at = story.published_at().unwrap();
        assert_eq!(at.format("%Y-%m-%d").to_string(), "2007-04-04");
    }
}
