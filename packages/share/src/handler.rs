// ABOUTME: Classifies content shared from other apps and builds bookmarks from it
// ABOUTME: Accepts http(s) links and images (data URIs or common image file suffixes)

use bookmarker_core::{timestamp, Bookmark};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{ShareError, ShareResult};

const IMAGE_SUFFIXES: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharedKind {
    Url,
    Image,
}

/// Content received from the share sheet after classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedItem {
    pub kind: SharedKind,
    /// The link, or the image reference (URL or data URI)
    pub content: String,
    pub title: String,
    pub description: String,
}

impl SharedItem {
    pub fn into_bookmark(self) -> Bookmark {
        let mut bookmark = Bookmark::new(self.content.clone());
        bookmark.title = self.title;
        bookmark.description = self.description;
        if self.kind == SharedKind::Image {
            bookmark.image_url = self.content;
        }
        bookmark
    }
}

/// True for absolute http and https URLs
pub fn is_url(content: &str) -> bool {
    Url::parse(content)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// True for image data URIs and paths ending in a common image suffix
pub fn is_image(content: &str) -> bool {
    if content.starts_with("data:image/") {
        return true;
    }
    let lower = content.to_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

#[derive(Debug, Clone, Default)]
pub struct ShareHandler;

impl ShareHandler {
    pub fn new() -> Self {
        Self
    }

    /// Classify shared content. Links win over images, so a URL to a .png is a link.
    ///
    /// `content_type` is the MIME type reported by the platform; an `image/*`
    /// type marks content as an image even without a recognised suffix.
    pub fn classify(&self, content_type: &str, content: &str) -> ShareResult<SharedItem> {
        self.classify_at(content_type, content, timestamp::now())
    }

    fn classify_at(
        &self,
        content_type: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> ShareResult<SharedItem> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ShareError::Empty);
        }

        if is_url(content) {
            return Ok(SharedItem {
                kind: SharedKind::Url,
                content: content.to_string(),
                title: link_title(content),
                description: String::new(),
            });
        }

        if is_image(content) || content_type.starts_with("image/") {
            return Ok(SharedItem {
                kind: SharedKind::Image,
                content: content.to_string(),
                title: "Shared Image".to_string(),
                description: format!("Image shared on {}", now.format("%b %-d, %Y")),
            });
        }

        debug!("Rejected shared content of type {:?}", content_type);
        Err(ShareError::Unsupported(content_type.to_string()))
    }

    /// Turn shared content into an unsaved bookmark
    pub fn handle_shared_content(&self, content_type: &str, content: &str) -> ShareResult<Bookmark> {
        let item = self.classify(content_type, content)?;
        info!("Received shared {:?}", item.kind);
        Ok(item.into_bookmark())
    }
}

/// Host name stands in for the page title until the user edits it
fn link_title(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| link.to_string())
}
