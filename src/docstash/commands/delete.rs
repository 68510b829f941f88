use crate::commands::sync::{refresh, refresh_after_write, upstream};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DocstashError, Result};
use crate::providers::PersistenceProvider;
use crate::store::RecordStore;
use tracing::info;

/// Deletes the record `selector` points at (full id or unique prefix).
///
/// Callers are expected to have confirmed with the user already.
pub fn run<P: PersistenceProvider>(
    working: &mut RecordStore,
    provider: &P,
    selector: &str,
) -> Result<CmdResult> {
    refresh(working, provider)?;
    let id = working.resolve_record_id(selector)?;
    let record = working
        .get_record(&id)
        .cloned()
        .ok_or_else(|| DocstashError::NotFound(format!("record {}", id)))?;

    provider.delete_record(&id).map_err(upstream)?;
    info!(id = %id, title = %record.title, "record deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted: {}", record.title)));
    if let Some(warning) = refresh_after_write(working, provider) {
        result.add_message(warning);
    }
    Ok(result.with_affected_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::model::RecordDraft;
    use crate::providers::mem_backend::MemProvider;

    fn setup() -> (MemProvider, RecordStore, String) {
        let provider = MemProvider::new();
        let mut working = RecordStore::new();
        let created = create::run(
            &mut working,
            &provider,
            &RecordDraft::new("Doomed").with_tags(["t"]),
        )
        .unwrap();
        let id = created.affected_records[0].id.to_string();
        (provider, working, id)
    }

    #[test]
    fn deletes_by_full_id() {
        let (provider, mut working, id) = setup();
        let result = run(&mut working, &provider, &id).unwrap();
        assert_eq!(result.messages[0].content, "Deleted: Doomed");
        assert!(working.is_empty());
        assert!(provider.list_records().unwrap().is_empty());
    }

    #[test]
    fn deletes_by_prefix() {
        let (provider, mut working, id) = setup();
        run(&mut working, &provider, &id[..8]).unwrap();
        assert!(working.is_empty());
    }

    #[test]
    fn second_delete_is_not_found_without_provider_call() {
        let (provider, mut working, id) = setup();
        run(&mut working, &provider, &id).unwrap();
        let writes = provider.write_count();

        let err = run(&mut working, &provider, &id).unwrap_err();
        assert!(matches!(err, DocstashError::NotFound(_)));
        assert_eq!(provider.write_count(), writes);
    }

    #[test]
    fn provider_failure_keeps_record() {
        let (provider, mut working, id) = setup();
        provider.set_simulate_write_error(true);

        let err = run(&mut working, &provider, &id).unwrap_err();
        assert!(matches!(err, DocstashError::Upstream(_)));
        assert_eq!(working.len(), 1);
    }
}
