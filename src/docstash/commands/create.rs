use crate::commands::sync::{refresh_after_write, upstream};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::RecordDraft;
use crate::providers::PersistenceProvider;
use crate::store::RecordStore;
use tracing::info;

pub fn run<P: PersistenceProvider>(
    working: &mut RecordStore,
    provider: &P,
    draft: &RecordDraft,
) -> Result<CmdResult> {
    let record = draft.build()?;

    provider.insert_record(&record).map_err(upstream)?;
    info!(id = %record.id, title = %record.title, "record saved");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Saved: {}", record.title)));
    if let Some(warning) = refresh_after_write(working, provider) {
        result.add_message(warning);
    }
    Ok(result.with_affected_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocstashError;
    use crate::model::Category;
    use crate::providers::mem_backend::MemProvider;

    #[test]
    fn saves_and_refetches() {
        let provider = MemProvider::new();
        let mut working = RecordStore::new();
        let draft = RecordDraft::new("Contract")
            .with_tags(["legal"])
            .with_url("https://example.com/c.pdf")
            .with_category(Some(Category::Document));

        let result = run(&mut working, &provider, &draft).unwrap();
        assert_eq!(result.messages[0].content, "Saved: Contract");
        assert_eq!(result.affected_records.len(), 1);

        assert_eq!(provider.list_records().unwrap().len(), 1);
        assert_eq!(working.len(), 1);
        assert_eq!(working.records()[0].id, result.affected_records[0].id);
    }

    #[test]
    fn validation_fails_before_provider_call() {
        let provider = MemProvider::new();
        let mut working = RecordStore::new();

        let err = run(&mut working, &provider, &RecordDraft::new("No tag")).unwrap_err();
        assert!(matches!(err, DocstashError::Validation(_)));
        assert_eq!(provider.write_count(), 0);
        assert!(working.is_empty());
    }

    #[test]
    fn provider_failure_leaves_working_set_unchanged() {
        let provider = MemProvider::new();
        let mut working = RecordStore::new();
        run(
            &mut working,
            &provider,
            &RecordDraft::new("first").with_tags(["t"]),
        )
        .unwrap();

        provider.set_simulate_write_error(true);
        let err = run(
            &mut working,
            &provider,
            &RecordDraft::new("second").with_tags(["t"]),
        )
        .unwrap_err();

        assert!(err.to_string().contains("Simulated write error"));
        assert_eq!(working.len(), 1);
        assert_eq!(working.records()[0].title, "first");
    }

    #[test]
    fn picks_up_rows_written_by_other_sessions() {
        let provider = MemProvider::new();
        provider.seed_record(RecordDraft::new("theirs").with_tags(["t"]).build().unwrap());
        let mut working = RecordStore::new();

        run(
            &mut working,
            &provider,
            &RecordDraft::new("mine").with_tags(["t"]),
        )
        .unwrap();
        assert_eq!(working.len(), 2);
    }
}
