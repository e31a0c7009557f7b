//! The core data types shared by every blog source.
//!
//! `BlogSummary` is the minimal record the feed needs to display a list row
//! and a detail pane.  Sources convert their wire format into it so the feed
//! loader and the UI stay source-agnostic.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of an authenticated user.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single blog entry as returned by a list endpoint.
///
/// Items are immutable once fetched and keep the order the server returned
/// them in.  There is deliberately no [`Ord`] impl: display order is arrival
/// order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    /// Unique identifier.  The blog API calls this `_id`.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Headline shown in the list.
    #[serde(default = "untitled")]
    pub title: String,

    /// Short teaser text.
    #[serde(default)]
    pub description: Option<String>,

    /// Cover image URL.
    #[serde(default)]
    pub image: Option<String>,

    /// Display name of the author.
    #[serde(default)]
    pub author: Option<String>,

    /// Category the blog was filed under.
    #[serde(default)]
    pub category: Option<String>,

    /// Creation timestamp.  `None` when the server omitted it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn untitled() -> String {
    "(untitled)".to_string()
}

impl BlogSummary {
    /// `YYYY-MM-DD`, or `"no date"` when the timestamp is missing.
    pub fn display_date(&self) -> String {
        self.created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "no date".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserializes_underscore_id_and_camel_case_fields() {
        let json = r#"{
            "_id": "65a1",
            "title": "Ownership in practice",
            "description": "Borrowing without tears",
            "author": "dana",
            "category": "tech",
            "createdAt": "2024-03-05T10:00:00Z"
        }"#;

        let blog: BlogSummary = serde_json::from_str(json).unwrap();

        assert_eq!(blog.id, "65a1");
        assert_eq!(blog.title, "Ownership in practice");
        assert_eq!(blog.author.as_deref(), Some("dana"));
        assert_eq!(blog.category.as_deref(), Some("tech"));
        assert_eq!(
            blog.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap())
        );
        assert!(blog.image.is_none());
    }

    #[test]
    fn accepts_plain_id_and_missing_title() {
        let blog: BlogSummary = serde_json::from_str(r#"{"id": "b2"}"#).unwrap();
        assert_eq!(blog.id, "b2");
        assert_eq!(blog.title, "(untitled)");
        assert_eq!(blog.display_date(), "no date");
    }

    #[test]
    fn display_date_formats_day_only() {
        let blog = BlogSummary {
            id: "x".into(),
            title: "t".into(),
            description: None,
            image: None,
            author: None,
            category: None,
            created_at: Some(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 0).unwrap()),
        };
        assert_eq!(blog.display_date(), "2025-12-31");
    }

    #[test]
    fn user_id_displays_raw_value() {
        assert_eq!(UserId::new("u-42").to_string(), "u-42");
    }
}
