//! # Tagged Record Store
//!
//! [`RecordStore`] is the session working set: the records and tags the user is
//! currently looking at. It is an owned object. Callers go through its methods and
//! never touch the backing vectors, and every read hands out clones.
//!
//! ## Ordering
//!
//! Records are kept most-recent-first. New records are inserted at the head;
//! [`RecordStore::replace_all`] re-sorts whatever the provider returned. Display
//! order is still decided by [`RecordQuery`], this order only matters for ties.
//!
//! ## Policies
//!
//! Two behaviours are configurable instead of hard-wired:
//!
//! - [`DuplicateTagPolicy`]: whether a tag name may be registered twice within the
//!   same scope. Selection lists ([`RecordStore::tag_options`]) are deduplicated
//!   either way.
//! - [`TagDeletePolicy`]: whether deleting a tag leaves its name on existing records
//!   (orphaned tags, the default) or strips it from them.
//!
//! ## Atomicity
//!
//! Each method either fully applies or leaves the store untouched. Validation runs
//! before any mutation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DocstashError, Result};
use crate::model::{Category, Record, RecordDraft};
use crate::query::{self, RecordQuery, SortKey};
use crate::tags::{validate_tag_name, Tag};

/// Shortest id prefix accepted when resolving a selector.
pub const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateTagPolicy {
    #[default]
    Allow,
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagDeletePolicy {
    /// Records keep the deleted tag's name.
    #[default]
    Orphan,
    /// The name is removed from every record, unless another tag still carries it.
    Cascade,
}

#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    tags: Vec<Tag>,
    duplicate_tags: DuplicateTagPolicy,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicateTagPolicy) -> Self {
        self.duplicate_tags = policy;
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_record(&self, id: &Uuid) -> Option<&Record> {
        self.records.iter().find(|r| r.id == *id)
    }

    /// Validates a new tag against the name rules and the duplicate policy without
    /// inserting it.
    pub fn prepare_tag(&self, name: &str, scope: Option<Category>) -> Result<Tag> {
        let name = validate_tag_name(name).map_err(|e| DocstashError::Validation(e.to_string()))?;

        if self.duplicate_tags == DuplicateTagPolicy::Reject
            && self.tags.iter().any(|t| t.name == name && t.scope == scope)
        {
            return Err(DocstashError::Validation(format!(
                "tag '{}' already exists",
                name
            )));
        }

        Ok(Tag::new(name, scope))
    }

    /// Local-only insert with no provider round-trip. Commands go through
    /// [`RecordStore::prepare_tag`] and a refetch instead.
    pub fn add_tag(&mut self, name: &str, scope: Option<Category>) -> Result<Tag> {
        let tag = self.prepare_tag(name, scope)?;
        self.tags.push(tag.clone());
        Ok(tag)
    }

    /// Removes a tag from the registry and applies `policy` to the records.
    ///
    /// Returns the removed tag together with the records whose tag list changed
    /// (always empty under [`TagDeletePolicy::Orphan`]).
    pub fn delete_tag(&mut self, id: &Uuid, policy: TagDeletePolicy) -> Result<(Tag, Vec<Record>)> {
        let pos = self
            .tags
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| DocstashError::NotFound(format!("tag {}", id)))?;
        let removed = self.tags.remove(pos);

        let stripped = self.cascade_targets(&removed, policy);
        for updated in &stripped {
            if let Some(record) = self.records.iter_mut().find(|r| r.id == updated.id) {
                record.tags = updated.tags.clone();
            }
        }

        Ok((removed, stripped))
    }

    /// Records that `policy` would rewrite after `removed` leaves the registry, with
    /// their new tag lists. Expects `removed` to be gone from `self.tags` already.
    pub fn cascade_targets(&self, removed: &Tag, policy: TagDeletePolicy) -> Vec<Record> {
        if policy == TagDeletePolicy::Orphan || self.tags.iter().any(|t| t.name == removed.name) {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.has_tag(&removed.name))
            .map(|r| {
                let mut updated = r.clone();
                updated.tags.retain(|t| t != &removed.name);
                updated
            })
            .collect()
    }

    /// Local-only insert with no provider round-trip. Commands build the record
    /// from the draft, write it through the provider and refetch instead.
    pub fn add_record(&mut self, draft: &RecordDraft) -> Result<Record> {
        let record = draft.build()?;
        self.records.insert(0, record.clone());
        Ok(record)
    }

    pub fn delete_record(&mut self, id: &Uuid) -> Result<Record> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == *id)
            .ok_or_else(|| DocstashError::NotFound(format!("record {}", id)))?;
        Ok(self.records.remove(pos))
    }

    pub fn query(&self, query: &RecordQuery) -> Vec<Record> {
        query::run(&self.records, query)
    }

    /// Tag names offered for selection when registering a record of `scope`,
    /// deduplicated in registry order. `None` lists every tag.
    pub fn tag_options(&self, scope: Option<Category>) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for tag in self.tags.iter().filter(|t| t.applies_to(scope)) {
            if !names.contains(&tag.name) {
                names.push(tag.name.clone());
            }
        }
        names
    }

    /// Replaces the whole working set, as after a fetch from the provider.
    pub fn replace_all(&mut self, mut records: Vec<Record>, tags: Vec<Tag>) {
        query::sort_records(&mut records, SortKey::Newest);
        self.records = records;
        self.tags = tags;
    }

    /// Resolves a full record id or a unique id prefix.
    pub fn resolve_record_id(&self, selector: &str) -> Result<Uuid> {
        let ids: Vec<Uuid> = self.records.iter().map(|r| r.id).collect();
        resolve_id(&ids, selector, "record")
    }

    /// Resolves a tag by full id, unique id prefix, or exact name.
    ///
    /// Names are looked up among tags that apply to `scope`. A name shared by
    /// several tags is ambiguous and must be given by id.
    pub fn resolve_tag(&self, selector: &str, scope: Option<Category>) -> Result<Uuid> {
        let selector = selector.trim();
        let by_name: Vec<Uuid> = self
            .tags
            .iter()
            .filter(|t| t.name == selector && t.applies_to(scope))
            .map(|t| t.id)
            .collect();

        match by_name.as_slice() {
            [id] => Ok(*id),
            [] => {
                let ids: Vec<Uuid> = self.tags.iter().map(|t| t.id).collect();
                resolve_id(&ids, selector, "tag")
            }
            _ => Err(DocstashError::Validation(format!(
                "tag name '{}' is ambiguous ({} tags), use the tag id",
                selector,
                by_name.len()
            ))),
        }
    }
}

fn resolve_id(ids: &[Uuid], selector: &str, kind: &str) -> Result<Uuid> {
    let selector = selector.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&selector) {
        return if ids.contains(&id) {
            Ok(id)
        } else {
            Err(DocstashError::NotFound(format!("{} {}", kind, id)))
        };
    }

    if selector.chars().count() < MIN_ID_PREFIX {
        return Err(DocstashError::Validation(format!(
            "{} id prefix '{}' is too short (need at least {} characters)",
            kind, selector, MIN_ID_PREFIX
        )));
    }

    let matches: Vec<&Uuid> = ids
        .iter()
        .filter(|id| id.to_string().starts_with(&selector))
        .collect();
    match matches.as_slice() {
        [id] => Ok(**id),
        [] => Err(DocstashError::NotFound(format!("{} {}", kind, selector))),
        _ => Err(DocstashError::Validation(format!(
            "{} id prefix '{}' is ambiguous ({} matches)",
            kind,
            selector,
            matches.len()
        ))),
    }
}
