// ABOUTME: Tests for turning shared content into bookmarks
// ABOUTME: Links, images, MIME hints, and rejected payloads

use bookmarker_share::{ShareError, ShareHandler, SharedKind};
use pretty_assertions::assert_eq;

#[test]
fn test_shared_link_becomes_bookmark() {
    let bookmark = ShareHandler::new()
        .handle_shared_content("text/plain", "  https://blog.rust-lang.org/2024/posts  ")
        .unwrap();

    assert!(bookmark.id.starts_with("bm-"));
    assert_eq!(bookmark.url, "https://blog.rust-lang.org/2024/posts");
    assert_eq!(bookmark.title, "blog.rust-lang.org");
    assert!(bookmark.image_url.is_empty());
    assert!(bookmark.tags.is_empty());
}

#[test]
fn test_link_to_image_is_still_a_link() {
    let item = ShareHandler::new()
        .classify("text/plain", "https://example.com/logo.png")
        .unwrap();
    assert_eq!(item.kind, SharedKind::Url);
}

#[test]
fn test_shared_image_becomes_bookmark() {
    let data = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";
    let bookmark = ShareHandler::new()
        .handle_shared_content("image/jpeg", data)
        .unwrap();

    assert_eq!(bookmark.url, data);
    assert_eq!(bookmark.image_url, data);
    assert_eq!(bookmark.title, "Shared Image");
    assert!(bookmark.description.starts_with("Image shared on "));
}

#[test]
fn test_mime_type_marks_image() {
    let item = ShareHandler::new()
        .classify("image/webp", "content://media/external/images/42")
        .unwrap();
    assert_eq!(item.kind, SharedKind::Image);
}

#[test]
fn test_rejects_plain_text_and_empty_content() {
    let handler = ShareHandler::new();

    assert_eq!(
        handler.handle_shared_content("text/plain", "remember the milk"),
        Err(ShareError::Unsupported("text/plain".to_string()))
    );
    assert_eq!(
        handler.handle_shared_content("text/plain", "   "),
        Err(ShareError::Empty)
    );
}
