//! Tag registry commands.
//!
//! Deleting a tag under [`TagDeletePolicy::Cascade`] also rewrites every record
//! that carries the name. The rewrite is staged on a copy of the working set
//! first, so nothing local changes unless every provider call succeeds. Records
//! are rewritten at the provider before the tag itself is deleted: a failed
//! rewrite leaves the tag registered and the delete can be retried.

use crate::commands::sync::{refresh, refresh_after_write, upstream};
use crate::commands::{plural, CmdMessage, CmdResult};
use crate::error::{DocstashError, Result};
use crate::model::Category;
use crate::providers::PersistenceProvider;
use crate::store::{RecordStore, TagDeletePolicy};
use crate::tags::validate_tag_name;
use tracing::info;

pub fn create<P: PersistenceProvider>(
    working: &mut RecordStore,
    provider: &P,
    name: &str,
    scope: Option<Category>,
) -> Result<CmdResult> {
    validate_tag_name(name).map_err(|e| DocstashError::Validation(e.to_string()))?;

    refresh(working, provider)?;
    let tag = working.prepare_tag(name, scope)?;

    provider.insert_tag(&tag).map_err(upstream)?;
    info!(id = %tag.id, name = %tag.name, "tag registered");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Tag added: {}", tag.name)));
    if let Some(warning) = refresh_after_write(working, provider) {
        result.add_message(warning);
    }
    Ok(result.with_listed_tags(vec![tag]))
}

/// Tags usable for `scope`; `None` lists the whole registry.
pub fn list<P: PersistenceProvider>(
    working: &mut RecordStore,
    provider: &P,
    scope: Option<Category>,
) -> Result<CmdResult> {
    refresh(working, provider)?;
    let tags = working
        .tags()
        .iter()
        .filter(|t| t.applies_to(scope))
        .cloned()
        .collect();
    Ok(CmdResult::default().with_listed_tags(tags))
}

/// Deduplicated tag names offered when registering a record of `scope`.
pub fn options<P: PersistenceProvider>(
    working: &mut RecordStore,
    provider: &P,
    scope: Option<Category>,
) -> Result<Vec<String>> {
    refresh(working, provider)?;
    Ok(working.tag_options(scope))
}

pub fn delete<P: PersistenceProvider>(
    working: &mut RecordStore,
    provider: &P,
    selector: &str,
    scope: Option<Category>,
    policy: TagDeletePolicy,
) -> Result<CmdResult> {
    refresh(working, provider)?;
    let id = working.resolve_tag(selector, scope)?;

    let mut staged = working.clone();
    let (removed, stripped) = staged.delete_tag(&id, policy)?;

    for record in &stripped {
        provider.replace_record(record).map_err(upstream)?;
    }
    provider.delete_tag(&id).map_err(upstream)?;
    info!(
        id = %removed.id,
        name = %removed.name,
        stripped = stripped.len(),
        "tag deleted"
    );

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Tag deleted: {}", removed.name)));
    if !stripped.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Removed '{}' from {}",
            removed.name,
            plural(stripped.len(), "record")
        )));
    }
    if let Some(warning) = refresh_after_write(working, provider) {
        result.add_message(warning);
    }
    Ok(result
        .with_listed_tags(vec![removed])
        .with_affected_records(stripped))
}
