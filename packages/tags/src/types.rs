// ABOUTME: Tag type definitions
// ABOUTME: Tags with hierarchy and usage stats, plus ordered tag groups

use bookmarker_core::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A label attached to bookmarks. Tags form a forest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i64,
    /// Bookmarks currently linked. Derived on read, never stored.
    #[serde(default)]
    pub count: i64,
    #[serde(with = "timestamp::rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp::rfc3339")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage_stats: TagStats,
}

impl Tag {
    /// New root tag with a generated id and zeroed stats
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = timestamp::now();
        Self {
            id: bookmarker_core::generate_tag_id(),
            name: name.into(),
            color: color.into(),
            description: String::new(),
            parent_id: None,
            order: 0,
            count: 0,
            created_at: now,
            updated_at: now,
            usage_stats: TagStats::default(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into()).filter(|id: &String| !id.is_empty());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Apply a usage event and bump `updated_at`
    pub fn update_stats(&mut self, operation: UsageOperation) {
        let now = timestamp::now();
        self.updated_at = now;
        self.usage_stats.record(operation, now);
    }

    /// Drop empty parent references
    pub(crate) fn normalize(&mut self) {
        if self.parent_id.as_deref() == Some("") {
            self.parent_id = None;
        }
        self.usage_stats = self.usage_stats.normalized();
    }
}

/// Usage counters kept alongside each tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagStats {
    #[serde(default, with = "timestamp::rfc3339_option")]
    pub last_used: Option<DateTime<Utc>>,
    /// Times the tag was ever applied
    #[serde(default)]
    pub usage_count: i64,
    /// Bookmarks currently carrying the tag
    #[serde(default)]
    pub bookmark_count: i64,
    /// Bookmarks that ever carried the tag
    #[serde(default)]
    pub historical_count: i64,
}

/// A usage event recorded against a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageOperation {
    Add,
    Remove,
}

impl TagStats {
    pub fn record(&mut self, operation: UsageOperation, at: DateTime<Utc>) {
        self.last_used = Some(at);
        match operation {
            UsageOperation::Add => {
                self.usage_count += 1;
                self.bookmark_count += 1;
                self.historical_count += 1;
            }
            UsageOperation::Remove => {
                self.bookmark_count = (self.bookmark_count - 1).max(0);
            }
        }
    }

    /// Copy with every counter clamped to zero
    pub fn normalized(&self) -> Self {
        Self {
            last_used: self.last_used,
            usage_count: self.usage_count.max(0),
            bookmark_count: self.bookmark_count.max(0),
            historical_count: self.historical_count.max(0),
        }
    }
}

/// Named, ordered collection of tag ids. A tag may belong to many groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagGroup {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub expanded: bool,
}

impl TagGroup {
    pub fn new(name: impl Into<String>, order: i64) -> Self {
        Self {
            id: bookmarker_core::generate_group_id(),
            name: name.into(),
            tag_ids: Vec::new(),
            order,
            expanded: true,
        }
    }

    /// Append a tag id unless already present
    pub fn add_tag(&mut self, tag_id: impl Into<String>) {
        let tag_id = tag_id.into();
        if !self.contains_tag(&tag_id) {
            self.tag_ids.push(tag_id);
        }
    }

    pub fn remove_tag(&mut self, tag_id: &str) {
        if let Some(pos) = self.tag_ids.iter().position(|id| id == tag_id) {
            self.tag_ids.remove(pos);
        }
    }

    pub fn contains_tag(&self, tag_id: &str) -> bool {
        self.tag_ids.iter().any(|id| id == tag_id)
    }

    /// Remove repeated ids, keeping first occurrences in order
    pub fn dedupe(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.tag_ids.retain(|id| seen.insert(id.clone()));
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Legacy files write `null` for empty arrays and objects
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stats_never_go_negative() {
        let mut stats = TagStats::default();
        let now = timestamp::now();

        stats.record(UsageOperation::Add, now);
        stats.record(UsageOperation::Remove, now);
        stats.record(UsageOperation::Remove, now);

        assert_eq!(stats.usage_count, 1);
        assert_eq!(stats.bookmark_count, 0);
        assert_eq!(stats.historical_count, 1);
        assert_eq!(stats.last_used, Some(now));
    }

    #[test]
    fn test_group_membership_is_duplicate_free() {
        let mut group = TagGroup::new("Languages", 0);
        group.add_tag("t1");
        group.add_tag("t2");
        group.add_tag("t1");
        assert_eq!(group.tag_ids, vec!["t1", "t2"]);

        group.remove_tag("t1");
        assert_eq!(group.tag_ids, vec!["t2"]);
        assert!(!group.contains_tag("t1"));

        group.tag_ids = vec!["a".into(), "b".into(), "a".into(), "c".into(), "b".into()];
        group.dedupe();
        assert_eq!(group.tag_ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tag_json_shape() {
        let tag = Tag::new("rust", "#ff0000");
        let json = serde_json::to_value(&tag).unwrap();

        assert!(json.get("parent_id").is_none());
        assert_eq!(json["usage_stats"]["bookmark_count"], 0);
        assert_eq!(
            json["created_at"].as_str().unwrap(),
            timestamp::format(&tag.created_at)
        );
    }

    #[test]
    fn test_legacy_tag_decodes() {
        let raw = r##"{
            "id": "t1",
            "name": "go",
            "color": "#00ADD8",
            "description": "",
            "parent_id": "",
            "order": 2,
            "count": 4,
            "created_at": "2024-05-01T12:30:00Z",
            "updated_at": "2024-05-01T12:30:00+02:00",
            "usage_stats": null
        }"##;
        let tag: Tag = serde_json::from_str(raw).unwrap();

        assert!(tag.is_root());
        assert_eq!(tag.order, 2);
        assert_eq!(tag.usage_stats, TagStats::default());
        assert_eq!(timestamp::format(&tag.updated_at), "2024-05-01T10:30:00Z");

        let group: TagGroup =
            serde_json::from_str(r#"{"id":"g1","name":"x","tag_ids":null,"order":0,"expanded":true}"#)
                .unwrap();
        assert!(group.tag_ids.is_empty());
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let raw = r#"{"id":"t1","name":"go","created_at":"yesterday","updated_at":"2024-05-01T12:30:00Z"}"#;
        assert!(serde_json::from_str::<Tag>(raw).is_err());
    }
}
