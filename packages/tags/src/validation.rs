// ABOUTME: Hierarchy checks for tag sets
// ABOUTME: Rejects dangling parents, self-parenting, and parent cycles before anything is written

use std::collections::{HashMap, HashSet};

use bookmarker_storage::{StorageError, StorageResult};

use crate::types::Tag;

/// Validate that `tags` forms a forest on its own.
///
/// Every `parent_id` must name a tag in the same set, and following parents
/// from any tag must terminate at a root.
pub fn validate_hierarchy(tags: &[Tag]) -> StorageResult<()> {
    let mut parents: HashMap<&str, Option<&str>> = HashMap::with_capacity(tags.len());
    for tag in tags {
        if parents
            .insert(tag.id.as_str(), tag.parent_id.as_deref())
            .is_some()
        {
            return Err(StorageError::Validation(format!(
                "duplicate tag id '{}'",
                tag.id
            )));
        }
    }

    for tag in tags {
        let Some(parent) = tag.parent_id.as_deref() else {
            continue;
        };
        if parent == tag.id {
            return Err(StorageError::Validation(format!(
                "tag '{}' is its own parent",
                tag.id
            )));
        }
        if !parents.contains_key(parent) {
            return Err(StorageError::Validation(format!(
                "tag '{}' references missing parent '{}'",
                tag.id, parent
            )));
        }
    }

    // Tags already proven to reach a root
    let mut rooted: HashSet<&str> = HashSet::new();
    for tag in tags {
        let mut path: Vec<&str> = Vec::new();
        let mut current = Some(tag.id.as_str());

        while let Some(id) = current {
            if rooted.contains(id) {
                break;
            }
            if path.contains(&id) {
                return Err(StorageError::Validation(format!(
                    "parent cycle through tag '{}'",
                    id
                )));
            }
            path.push(id);
            current = parents.get(id).copied().flatten();
        }

        rooted.extend(path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str, parent: Option<&str>) -> Tag {
        let mut tag = Tag::new(id, "");
        tag.id = id.to_string();
        tag.parent_id = parent.map(str::to_string);
        tag
    }

    #[test]
    fn test_forest_is_valid() {
        let tags = vec![
            tag("lang", None),
            tag("rust", Some("lang")),
            tag("async", Some("rust")),
            tag("misc", None),
        ];
        assert!(validate_hierarchy(&tags).is_ok());
    }

    #[test]
    fn test_children_may_precede_parents() {
        let tags = vec![tag("async", Some("rust")), tag("rust", Some("lang")), tag("lang", None)];
        assert!(validate_hierarchy(&tags).is_ok());
    }

    #[test]
    fn test_rejects_dangling_parent() {
        let err = validate_hierarchy(&[tag("rust", Some("gone"))]).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("missing parent"));
    }

    #[test]
    fn test_rejects_self_parent() {
        let err = validate_hierarchy(&[tag("rust", Some("rust"))]).unwrap_err();
        assert!(err.to_string().contains("own parent"));
    }

    #[test]
    fn test_rejects_cycle() {
        let tags = vec![
            tag("a", Some("c")),
            tag("b", Some("a")),
            tag("c", Some("b")),
            tag("root", None),
        ];
        let err = validate_hierarchy(&tags).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = validate_hierarchy(&[tag("a", None), tag("a", None)]).unwrap_err();
        assert!(err.is_validation());
    }
}
