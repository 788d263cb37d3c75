// ABOUTME: Shared model definitions consumed by the tag layer and application state
// ABOUTME: Bookmark (tags referenced by name) and the signed-in user profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// A saved link. Tags are referenced by *name*; the association store
/// reconciles names with tag ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub favicon_url: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "timestamp::rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp::rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    /// Create a bookmark for a URL with a fresh id and timestamps
    pub fn new(url: impl Into<String>) -> Self {
        let now = timestamp::now();
        Self {
            id: crate::utils::generate_bookmark_id(),
            user_id: String::new(),
            url: url.into(),
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            favicon_url: String::new(),
            is_favorite: false,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Signed-in user and their UI preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default = "default_nav_position")]
    pub nav_position: String,
    #[serde(default)]
    pub nav_items: Vec<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub sync_enabled: bool,
    #[serde(default, with = "timestamp::rfc3339_option")]
    pub last_sync: Option<DateTime<Utc>>,
}

impl User {
    /// User with default UI preferences and sync disabled
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            nav_position: default_nav_position(),
            nav_items: Vec::new(),
            theme: default_theme(),
            sync_enabled: false,
            last_sync: None,
        }
    }
}

fn default_nav_position() -> String {
    "bottom".to_string()
}

fn default_theme() -> String {
    "system".to_string()
}
