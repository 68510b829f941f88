use crate::commands::sync::refresh;
use crate::commands::CmdResult;
use crate::error::{DocstashError, Result};
use crate::providers::PersistenceProvider;
use crate::store::RecordStore;

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
    Ok(CmdResult::default().with_listed_records(vec![record]))
}
