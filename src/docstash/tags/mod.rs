//! Tag support for docstash.
//!
//! Tags are user-defined labels used to organize and filter records. They live in
//! their own registry (the `custom_tags` collection), separate from the records
//! that reference them by name.
//!
//! ## Scoping
//!
//! A tag may be scoped to a [`Category`]: a "knowledge" tag is only offered when
//! registering knowledge notes. An unscoped tag (`scope: None`) is offered
//! everywhere.
//!
//! ## Names, Not Ids
//!
//! Records store tag *names*. Deleting a tag from the registry therefore leaves
//! the name behind on any record that used it (an orphaned tag) unless the
//! cascade policy is selected. See [`crate::store`].

pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Category;

pub use validation::{validate_tag_name, TagValidationError};

/// A tag entry in the tag registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    /// `None` means the tag applies to every category.
    #[serde(default, rename = "type")]
    pub scope: Option<Category>,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Creates a new tag entry with the given name.
    ///
    /// Note: This does not validate the tag name. Use [`validate_tag_name`]
    /// before creating a Tag to ensure the name is valid.
    pub fn new(name: impl Into<String>, scope: Option<Category>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            scope,
            created_at: Utc::now(),
        }
    }

    /// Whether this tag should be offered for records of `scope`.
    ///
    /// Unscoped tags apply everywhere, and asking with `None` matches every tag.
    pub fn applies_to(&self, scope: Option<Category>) -> bool {
        match (self.scope, scope) {
            (None, _) | (_, None) => true,
            (Some(own), Some(wanted)) => own == wanted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new() {
        let tag = Tag::new("infra", Some(Category::Document));
        assert_eq!(tag.name, "infra");
        assert_eq!(tag.scope, Some(Category::Document));
    }

    #[test]
    fn test_unscoped_tag_applies_everywhere() {
        let tag = Tag::new("misc", None);
        assert!(tag.applies_to(None));
        assert!(tag.applies_to(Some(Category::Document)));
        assert!(tag.applies_to(Some(Category::Knowledge)));
    }

    #[test]
    fn test_scoped_tag_applies_to_own_scope_only() {
        let tag = Tag::new("faq", Some(Category::Knowledge));
        assert!(tag.applies_to(None));
        assert!(tag.applies_to(Some(Category::Knowledge)));
        assert!(!tag.applies_to(Some(Category::Document)));
    }

    #[test]
    fn test_scope_serializes_as_type() {
        let tag = Tag::new("faq", Some(Category::Knowledge));
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["type"], "knowledge");

        let loaded: Tag = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, tag);
    }

    #[test]
    fn test_missing_type_means_unscoped() {
        let json = r#"{
            "id": "0d0c6f5e-8a5e-4c1e-9f3b-2b7d8c1d4e5f",
            "name": "legacy",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let tag: Tag = serde_json::from_str(json).unwrap();
        assert!(tag.scope.is_none());
    }
}
