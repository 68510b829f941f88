use crate::commands::CmdMessage;
use crate::error::{DocstashError, Result};
use crate::providers::PersistenceProvider;
use crate::store::RecordStore;
use tracing::{debug, warn};

/// Refetches records and tags and replaces the working set.
///
/// Both collections are fetched before anything is replaced, so a failed fetch
/// leaves the working set untouched.
pub fn refresh<P: PersistenceProvider>(working: &mut RecordStore, provider: &P) -> Result<()> {
    let records = provider.list_records().map_err(upstream)?;
    let tags = provider.list_tags().map_err(upstream)?;
    debug!(
        records = records.len(),
        tags = tags.len(),
        "refreshed working set"
    );
    working.replace_all(records, tags);
    Ok(())
}

/// Refresh after a write that already succeeded. A failed refetch doesn't undo the
/// write, so it is reported as a warning instead of an error.
pub fn refresh_after_write<P: PersistenceProvider>(
    working: &mut RecordStore,
    provider: &P,
) -> Option<CmdMessage> {
    match refresh(working, provider) {
        Ok(()) => None,
        Err(e) => {
            warn!(error = %e, "refetch after write failed");
            Some(CmdMessage::warning(format!(
                "Saved, but reloading failed: {}",
                e
            )))
        }
    }
}

/// Provider failures reach the caller as upstream errors with the message intact.
/// `NotFound` keeps its kind so a concurrent delete still reads as "not found".
pub(crate) fn upstream(err: DocstashError) -> DocstashError {
    let err = err.into_upstream();
    if let DocstashError::Upstream(msg) = &err {
        warn!(error = %msg, "provider call failed");
    }
    err
}
