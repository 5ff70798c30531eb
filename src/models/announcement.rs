//! Announcement board payloads: release notes, reading recommendations and
//! reader feedback.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One release note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339 publication time. Kept as text so one bad date does not
    /// reject the whole list.
    pub date: String,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub important: bool,
}

impl UpdateItem {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }
}

/// Publication time of the newest update with a readable date.
pub fn newest_update(updates: &[UpdateItem]) -> Option<DateTime<Utc>> {
    updates.iter().filter_map(UpdateItem::published_at).max()
}

/// Suggested reading: either a document in the library or an external link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    #[default]
    Suggestion,
    Bug,
    Content,
    Other,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 4] = [Self::Suggestion, Self::Bug, Self::Content, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Bug => "bug",
            Self::Content => "content",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Suggestion => "Suggestion",
            Self::Bug => "Bug report",
            Self::Content => "Content request",
            Self::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

/// Body of `POST /feedback`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub content: String,
    #[serde(default)]
    pub contact: String,
    /// RFC 3339 submission time.
    pub timestamp: String,
}

impl Feedback {
    /// Anonymous feedback stamped with `at`.
    pub fn new(kind: FeedbackKind, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            name: String::new(),
            kind,
            content: content.into(),
            contact: String::new(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn update(id: &str, date: &str) -> UpdateItem {
        serde_json::from_value(json!({ "id": id, "title": id, "date": date })).unwrap()
    }

    #[test]
    fn test_update_optional_fields_default() {
        let item = update("1", "2024-03-01T08:00:00Z");
        assert!(item.changes.is_empty());
        assert!(!item.important);
        assert_eq!(
            item.published_at(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_newest_update_skips_unreadable_dates() {
        let updates = [
            update("old", "2024-01-01T00:00:00+02:00"),
            update("bad", "last tuesday"),
            update("new", "2024-02-01T00:00:00Z"),
        ];
        assert_eq!(
            newest_update(&updates),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(newest_update(&[update("bad", "")]), None);
    }

    #[test]
    fn test_feedback_wire_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let feedback = Feedback::new(FeedbackKind::Bug, "Broken link", at).with_contact("a@b.c");

        assert_eq!(
            serde_json::to_value(&feedback).unwrap(),
            json!({
                "name": "",
                "type": "bug",
                "content": "Broken link",
                "contact": "a@b.c",
                "timestamp": "2024-05-06T07:08:09.000Z"
            })
        );
    }

    #[test]
    fn test_feedback_kind_parse() {
        assert_eq!(FeedbackKind::parse("content"), Some(FeedbackKind::Content));
        assert_eq!(FeedbackKind::parse("praise"), None);
    }
}
