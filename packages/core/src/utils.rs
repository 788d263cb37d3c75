// ABOUTME: Shared utility functions for Bookmarker
// ABOUTME: Prefixed id generation for tags, tag groups, and bookmarks

/// Generate a unique tag ID (`tag-<nanoid>`)
pub fn generate_tag_id() -> String {
    format!("tag-{}", nanoid::nanoid!())
}

/// Generate a unique tag group ID (`group-<nanoid>`)
pub fn generate_group_id() -> String {
    format!("group-{}", nanoid::nanoid!())
}

/// Generate a unique bookmark ID (`bm-<nanoid>`)
pub fn generate_bookmark_id() -> String {
    format!("bm-{}", nanoid::nanoid!())
}
