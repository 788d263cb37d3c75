// ABOUTME: Integration tests for tag storage operations
// ABOUTME: Tests CRUD, hierarchy checks, group membership, bookmark links, and transactional import/export

use bookmarker_core::Bookmark;
use bookmarker_storage::{Database, StorageError};
use bookmarker_tags::{
    BookmarkStorage, Tag, TagExport, TagGroup, TagStorage, UsageOperation,
};
use pretty_assertions::assert_eq;

/// Helper to create an in-memory database with the full schema
async fn create_test_db() -> Database {
    Database::in_memory().await.unwrap()
}

async fn create_test_storage() -> TagStorage {
    TagStorage::new(create_test_db().await.pool().clone())
}

fn tag_with_id(id: &str, name: &str) -> Tag {
    let mut tag = Tag::new(name, "#ff0000");
    tag.id = id.to_string();
    tag
}

#[tokio::test]
async fn test_create_and_get_tag() {
    let storage = create_test_storage().await;

    let mut input = Tag::new("Feature", "#ff0000");
    input.description = "Feature work".to_string();

    let tag = storage.create_tag(&input).await.unwrap();
    assert_eq!(tag, input);
    assert!(tag.id.starts_with("tag-"));

    let retrieved = storage.get_tag(&tag.id).await.unwrap();
    assert_eq!(retrieved.name, "Feature");
    assert_eq!(retrieved.description, "Feature work");
    assert_eq!(retrieved.count, 0);
}

#[tokio::test]
async fn test_get_missing_tag_is_not_found() {
    let storage = create_test_storage().await;
    let err = storage.get_tag("nope").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn test_duplicate_id_or_name_is_constraint_violation() {
    let storage = create_test_storage().await;
    storage.create_tag(&tag_with_id("t1", "go")).await.unwrap();

    let same_id = storage.create_tag(&tag_with_id("t1", "rust")).await.unwrap_err();
    assert!(same_id.is_constraint_violation());

    let same_name = storage.create_tag(&tag_with_id("t2", "go")).await.unwrap_err();
    assert!(same_name.is_constraint_violation());
}

#[tokio::test]
async fn test_get_tag_by_name() {
    let storage = create_test_storage().await;
    storage.create_tag(&Tag::new("Refactor", "")).await.unwrap();

    let found = storage.get_tag_by_name("Refactor").await.unwrap();
    assert_eq!(found.unwrap().name, "Refactor");

    let not_found = storage.get_tag_by_name("NonExistent").await.unwrap();
    assert!(not_found.is_none());
}

#[tokio::test]
async fn test_update_tag_replaces_fields() {
    let storage = create_test_storage().await;
    let mut tag = storage.create_tag(&Tag::new("Docs", "#000000")).await.unwrap();

    tag.name = "Documentation".to_string();
    tag.color = "#00ff00".to_string();
    tag.order = 7;

    let updated = storage.update_tag(&tag).await.unwrap();
    assert_eq!(updated.name, "Documentation");
    assert_eq!(updated.color, "#00ff00");
    assert_eq!(updated.order, 7);
    assert_eq!(updated.created_at, tag.created_at);
    assert!(updated.updated_at >= tag.updated_at);
}

#[tokio::test]
async fn test_update_missing_tag_is_not_found() {
    let storage = create_test_storage().await;
    let err = storage.update_tag(&Tag::new("ghost", "")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_save_tag_upserts_and_keeps_created_at() {
    let storage = create_test_storage().await;
    let mut tag = Tag::new("go", "");
    tag.created_at = bookmarker_core::timestamp::parse("2024-01-01T00:00:00Z").unwrap();

    let inserted = storage.save_tag(&tag).await.unwrap();
    assert_eq!(inserted.created_at, tag.created_at);

    let mut changed = inserted.clone();
    changed.description = "gophers".to_string();
    changed.created_at = bookmarker_core::timestamp::now();

    let saved = storage.save_tag(&changed).await.unwrap();
    assert_eq!(saved.description, "gophers");
    assert_eq!(saved.created_at, tag.created_at);
    assert_eq!(storage.get_all_tags().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_parent_must_exist_and_not_cycle() {
    let storage = create_test_storage().await;
    let lang = storage.create_tag(&tag_with_id("lang", "Languages")).await.unwrap();
    let rust = storage
        .create_tag(&tag_with_id("rust", "Rust").with_parent("lang"))
        .await
        .unwrap();

    let dangling = storage
        .create_tag(&tag_with_id("x", "X").with_parent("missing"))
        .await
        .unwrap_err();
    assert!(dangling.is_validation());

    let mut looped = lang.clone();
    looped.parent_id = Some(rust.id.clone());
    let err = storage.update_tag(&looped).await.unwrap_err();
    assert!(err.is_validation());

    let mut own = rust.clone();
    own.parent_id = Some(rust.id.clone());
    assert!(storage.save_tag(&own).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_get_tags_by_parent() {
    let storage = create_test_storage().await;
    storage.create_tag(&tag_with_id("lang", "Languages")).await.unwrap();
    storage.create_tag(&tag_with_id("misc", "Misc")).await.unwrap();

    let mut go = tag_with_id("go", "Go").with_parent("lang");
    go.order = 2;
    let mut rust = tag_with_id("rust", "Rust").with_parent("lang");
    rust.order = 1;
    storage.create_tag(&go).await.unwrap();
    storage.create_tag(&rust).await.unwrap();
    storage
        .create_tag(&tag_with_id("tokio", "Tokio").with_parent("rust"))
        .await
        .unwrap();

    let children: Vec<String> = storage
        .get_tags_by_parent(Some("lang"))
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(children, vec!["rust", "go"]);

    let roots: Vec<String> = storage
        .get_tags_by_parent(None)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(roots, vec!["lang", "misc"]);
}

#[tokio::test]
async fn test_delete_tag_orphans_children_and_strips_groups() {
    let storage = create_test_storage().await;
    storage.create_tag(&tag_with_id("lang", "Languages")).await.unwrap();
    storage
        .create_tag(&tag_with_id("rust", "Rust").with_parent("lang"))
        .await
        .unwrap();

    let mut group = TagGroup::new("All", 0);
    group.add_tag("lang");
    group.add_tag("rust");
    let group = storage.create_tag_group(&group).await.unwrap();

    storage.delete_tag("lang").await.unwrap();

    let rust = storage.get_tag("rust").await.unwrap();
    assert!(rust.is_root());

    let group = storage.get_tag_group(&group.id).await.unwrap();
    assert_eq!(group.tag_ids, vec!["rust"]);

    assert!(storage.delete_tag("lang").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_tags_in_bulk() {
    let storage = create_test_storage().await;
    for (id, name) in [("a", "A"), ("b", "B"), ("c", "C")] {
        storage.create_tag(&tag_with_id(id, name)).await.unwrap();
    }

    let removed = storage
        .delete_tags(&["a".to_string(), "c".to_string(), "zzz".to_string()])
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let remaining: Vec<String> = storage
        .get_all_tags()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(remaining, vec!["b"]);
}

#[tokio::test]
async fn test_tag_group_crud() {
    let storage = create_test_storage().await;
    for (id, name) in [("t1", "go"), ("t2", "rust"), ("t3", "zig")] {
        storage.create_tag(&tag_with_id(id, name)).await.unwrap();
    }

    let mut group = TagGroup::new("Languages", 0);
    group.tag_ids = vec!["t2".into(), "t1".into(), "t2".into()];
    let created = storage.create_tag_group(&group).await.unwrap();
    assert_eq!(created.tag_ids, vec!["t2", "t1"]);

    let fetched = storage.get_tag_group(&group.id).await.unwrap();
    assert_eq!(fetched, created);

    let mut renamed = fetched.clone();
    renamed.name = "Systems".to_string();
    renamed.expanded = false;
    renamed.add_tag("t3");
    renamed.remove_tag("t2");
    storage.update_tag_group(&renamed).await.unwrap();

    let fetched = storage.get_tag_group(&group.id).await.unwrap();
    assert_eq!(fetched.name, "Systems");
    assert!(!fetched.expanded);
    assert_eq!(fetched.tag_ids, vec!["t1", "t3"]);

    let second = TagGroup::new("Second", 1);
    storage.save_tag_group(&second).await.unwrap();
    let names: Vec<String> = storage
        .get_all_tag_groups()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Systems", "Second"]);

    storage.delete_tag_group(&group.id).await.unwrap();
    assert!(storage.get_tag_group(&group.id).await.unwrap_err().is_not_found());
    // Deleting a group never deletes its tags
    assert_eq!(storage.get_all_tags().await.unwrap().len(), 3);

    let missing = TagGroup::new("Missing", 5);
    assert!(storage.update_tag_group(&missing).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_group_member_must_exist() {
    let storage = create_test_storage().await;
    let mut group = TagGroup::new("Broken", 0);
    group.add_tag("ghost");

    let err = storage.create_tag_group(&group).await.unwrap_err();
    assert!(err.is_constraint_violation());
    assert!(matches!(err, StorageError::TransactionFailed { .. }));
    assert!(storage.get_all_tag_groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_record_usage() {
    let storage = create_test_storage().await;
    let tag = storage.create_tag(&Tag::new("go", "")).await.unwrap();

    storage.record_usage(&tag.id, UsageOperation::Add).await.unwrap();
    storage.record_usage(&tag.id, UsageOperation::Remove).await.unwrap();
    let tag = storage
        .record_usage(&tag.id, UsageOperation::Remove)
        .await
        .unwrap();

    assert_eq!(tag.usage_stats.usage_count, 1);
    assert_eq!(tag.usage_stats.bookmark_count, 0);
    assert_eq!(tag.usage_stats.historical_count, 1);
    assert!(tag.usage_stats.last_used.is_some());

    assert!(storage
        .record_usage("missing", UsageOperation::Add)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_export_import_round_trip() {
    let source = create_test_storage().await;
    source.create_tag(&tag_with_id("lang", "Languages")).await.unwrap();
    let mut rust = tag_with_id("rust", "Rust").with_parent("lang");
    rust.description = "systems".to_string();
    rust.order = 3;
    rust.usage_stats.usage_count = 4;
    source.create_tag(&rust).await.unwrap();

    let mut group = TagGroup::new("Stack", 0);
    group.add_tag("rust");
    group.add_tag("lang");
    source.create_tag_group(&group).await.unwrap();

    let export = source.export_tags().await.unwrap();
    let json = export.to_json_pretty().unwrap();

    let target = create_test_storage().await;
    let summary = target
        .import_tags(&TagExport::from_json(&json).unwrap())
        .await
        .unwrap();
    assert_eq!(summary.tags_imported, 2);
    assert_eq!(summary.groups_imported, 1);
    assert_eq!(summary.memberships_dropped, 0);

    assert_eq!(target.get_all_tags().await.unwrap(), export.tags);
    assert_eq!(target.get_all_tag_groups().await.unwrap(), export.tag_groups);
}

#[tokio::test]
async fn test_import_replaces_existing_state() {
    let storage = create_test_storage().await;
    storage.create_tag(&tag_with_id("old", "Old")).await.unwrap();
    storage.save_tag_group(&TagGroup::new("Old group", 0)).await.unwrap();

    let export = TagExport::new(vec![tag_with_id("new", "New")], vec![]);
    storage.import_tags(&export).await.unwrap();

    let ids: Vec<String> = storage
        .get_all_tags()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["new"]);
    assert!(storage.get_all_tag_groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_import_leaves_state_intact() {
    let storage = create_test_storage().await;
    storage.create_tag(&tag_with_id("keep", "Keep")).await.unwrap();

    // Duplicate names fail on insert, after the wipe has already run
    let export = TagExport::new(
        vec![tag_with_id("a", "same"), tag_with_id("b", "same")],
        vec![],
    );
    let err = storage.import_tags(&export).await.unwrap_err();
    match &err {
        StorageError::TransactionFailed { operation, .. } => assert_eq!(*operation, "import_tags"),
        other => panic!("Expected TransactionFailed, got {:?}", other),
    }
    assert!(err.is_constraint_violation());

    let cyclic = TagExport::new(
        vec![
            tag_with_id("a", "A").with_parent("b"),
            tag_with_id("b", "B").with_parent("a"),
        ],
        vec![],
    );
    assert!(storage.import_tags(&cyclic).await.unwrap_err().is_validation());

    let ids: Vec<String> = storage
        .get_all_tags()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["keep"]);
}

#[tokio::test]
async fn test_import_drops_members_outside_export() {
    let storage = create_test_storage().await;

    let mut group = TagGroup::new("Partial", 0);
    group.tag_ids = vec!["t2".into(), "t3".into()];
    let export = TagExport::new(vec![tag_with_id("t2", "rust")], vec![group.clone()]);

    let summary = storage.import_tags(&export).await.unwrap();
    assert_eq!(summary.memberships_dropped, 1);

    let stored = storage.get_tag_group(&group.id).await.unwrap();
    assert_eq!(stored.tag_ids, vec!["t2"]);
}

#[tokio::test]
async fn test_import_restores_bookmark_links_for_surviving_tags() {
    let db = create_test_db().await;
    let tags = TagStorage::new(db.pool().clone());
    let bookmarks = BookmarkStorage::new(db.pool().clone());

    let mut bookmark = Bookmark::new("https://www.rust-lang.org");
    bookmark.tags = vec!["rust".to_string(), "web".to_string()];
    bookmarks.save_bookmark(&bookmark).await.unwrap();

    let mut export = tags.export_tags().await.unwrap();
    export.tags.retain(|t| t.name == "rust");

    let summary = tags.import_tags(&export).await.unwrap();
    assert_eq!(summary.associations_restored, 1);

    let reloaded = bookmarks.get_bookmark(&bookmark.id).await.unwrap();
    assert_eq!(reloaded.tags, vec!["rust"]);
}

#[tokio::test]
async fn test_import_from_other_install_relinks_bookmarks_by_name() {
    let db = create_test_db().await;
    let tags = TagStorage::new(db.pool().clone());
    let bookmarks = BookmarkStorage::new(db.pool().clone());

    let mut bookmark = Bookmark::new("https://www.rust-lang.org");
    bookmark.tags = vec!["rust".to_string(), "web".to_string()];
    bookmarks.save_bookmark(&bookmark).await.unwrap();

    // Same name, different id: the file was exported on another device
    let export = TagExport::new(
        vec![tag_with_id("tag-from-other-device", "rust")],
        vec![],
    );
    let summary = tags.import_tags(&export).await.unwrap();
    assert_eq!(summary.associations_restored, 1);

    let reloaded = bookmarks.get_bookmark(&bookmark.id).await.unwrap();
    assert_eq!(reloaded.tags, vec!["rust"]);

    let rust = tags.get_tag("tag-from-other-device").await.unwrap();
    assert_eq!(rust.count, 1);
}

#[tokio::test]
async fn test_bookmark_tags_reconcile_by_name() {
    let db = create_test_db().await;
    let tags = TagStorage::new(db.pool().clone());
    let bookmarks = BookmarkStorage::new(db.pool().clone());

    tags.create_tag(&tag_with_id("t-go", "go")).await.unwrap();

    let mut bookmark = Bookmark::new("https://go.dev");
    bookmark.title = "Go".to_string();
    bookmark.tags = vec!["go".into(), " lang ".into(), "go".into(), "".into()];
    let saved = bookmarks.save_bookmark(&bookmark).await.unwrap();
    assert_eq!(saved.tags, vec!["go", "lang"]);

    let go = tags.get_tag("t-go").await.unwrap();
    assert_eq!(go.count, 1);
    assert_eq!(go.usage_stats.bookmark_count, 1);

    let lang = tags.get_tag_by_name("lang").await.unwrap().unwrap();
    assert_eq!(lang.color, bookmarker_core::constants::DEFAULT_TAG_COLOR);

    let linked: Vec<String> = tags
        .get_tags_for_bookmark(&bookmark.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(linked, vec!["go", "lang"]);

    // Dropping a tag from the bookmark releases it
    bookmark.tags = vec!["lang".into()];
    bookmarks.save_bookmark(&bookmark).await.unwrap();
    let go = tags.get_tag("t-go").await.unwrap();
    assert_eq!(go.count, 0);
    assert_eq!(go.usage_stats.bookmark_count, 0);
    assert_eq!(go.usage_stats.historical_count, 1);

    bookmarks.delete_bookmark(&bookmark.id).await.unwrap();
    let lang = tags.get_tag(&lang.id).await.unwrap();
    assert_eq!(lang.count, 0);
    assert_eq!(lang.usage_stats.bookmark_count, 0);
    assert!(bookmarks
        .get_bookmark(&bookmark.id)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_bookmark_search_and_recent() {
    let db = create_test_db().await;
    let bookmarks = BookmarkStorage::new(db.pool().clone());

    let mut a = Bookmark::new("https://tokio.rs");
    a.title = "Tokio".to_string();
    a.tags = vec!["async".into()];
    bookmarks.save_bookmark(&a).await.unwrap();

    let mut b = Bookmark::new("https://serde.rs");
    b.title = "Serde".to_string();
    bookmarks.save_bookmark(&b).await.unwrap();

    let by_tag = bookmarks.search_bookmarks("async").await.unwrap();
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].id, a.id);
    assert_eq!(by_tag[0].tags, vec!["async"]);

    let by_url = bookmarks.search_bookmarks("serde.rs").await.unwrap();
    assert_eq!(by_url.len(), 1);
    assert_eq!(by_url[0].title, "Serde");

    assert_eq!(bookmarks.get_recent_bookmarks(10).await.unwrap().len(), 2);
    assert_eq!(bookmarks.get_recent_bookmarks(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_bookmark_search_treats_wildcards_literally() {
    let db = create_test_db().await;
    let bookmarks = BookmarkStorage::new(db.pool().clone());

    let mut discount = Bookmark::new("https://shop.example.com");
    discount.title = "50% off".to_string();
    bookmarks.save_bookmark(&discount).await.unwrap();

    let mut plain = Bookmark::new("https://example.org");
    plain.title = "500 offers".to_string();
    bookmarks.save_bookmark(&plain).await.unwrap();

    let mut snake = Bookmark::new("https://docs.rs");
    snake.title = "snake_case guide".to_string();
    bookmarks.save_bookmark(&snake).await.unwrap();

    let percent = bookmarks.search_bookmarks("50%").await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].id, discount.id);

    assert!(bookmarks.search_bookmarks("0_o").await.unwrap().is_empty());
    assert_eq!(bookmarks.search_bookmarks("e_case").await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_export_snapshot_is_consistent_under_concurrent_deletes() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = bookmarker_storage::DatabaseConfig {
        path: dir.path().join("tags.db"),
        ..Default::default()
    };
    let db = Database::connect(&config).await.unwrap();
    let storage = TagStorage::new(db.pool().clone());

    let mut ids = Vec::new();
    for i in 0..40 {
        let tag = storage
            .create_tag(&tag_with_id(&format!("t{}", i), &format!("tag {}", i)))
            .await
            .unwrap();
        ids.push(tag.id);
    }
    let mut group = TagGroup::new("all", 0);
    group.tag_ids = ids.clone();
    storage.create_tag_group(&group).await.unwrap();

    let writer = {
        let storage = storage.clone();
        tokio::spawn(async move {
            for id in ids {
                storage.delete_tags(&[id]).await.unwrap();
            }
        })
    };

    for _ in 0..40 {
        let export = storage.export_tags().await.unwrap();
        let present: std::collections::HashSet<&str> =
            export.tags.iter().map(|t| t.id.as_str()).collect();
        for group in &export.tag_groups {
            for member in &group.tag_ids {
                assert!(present.contains(member.as_str()), "dangling member {}", member);
            }
        }
    }

    writer.await.unwrap();
}
