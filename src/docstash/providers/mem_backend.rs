use super::{PersistenceProvider, RECORDS_COLLECTION, TAGS_COLLECTION};
use crate::error::{DocstashError, Result};
use crate::model::Record;
use crate::tags::Tag;
use std::cell::{Cell, RefCell};
use uuid::Uuid;

/// In-memory persistence provider for testing.
///
/// Uses `RefCell` for interior mutability since docstash is single-threaded.
/// This lets the `PersistenceProvider` trait use `&self` for all methods.
#[derive(Default)]
pub struct MemProvider {
    records: RefCell<Vec<Record>>,
    tags: RefCell<Vec<Tag>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
    simulate_replace_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Fail only `replace_record`, leaving every other write working.
    pub fn set_simulate_replace_error(&self, simulate: bool) {
        self.simulate_replace_error.set(simulate);
    }

    /// Number of write calls that reached the provider, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Test helper that places a row directly, as another session would.
    pub fn seed_record(&self, record: Record) {
        self.records.borrow_mut().push(record);
    }

    pub fn seed_tag(&self, tag: Tag) {
        self.tags.borrow_mut().push(tag);
    }

    fn check_read(&self, collection: &str) -> Result<()> {
        if self.simulate_read_error.get() {
            return Err(DocstashError::Upstream(format!(
                "Simulated read error on {}",
                collection
            )));
        }
        Ok(())
    }

    fn check_write(&self, collection: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        if self.simulate_write_error.get() {
            return Err(DocstashError::Upstream(format!(
                "Simulated write error on {}",
                collection
            )));
        }
        Ok(())
    }
}

impl PersistenceProvider for MemProvider {
    fn list_records(&self) -> Result<Vec<Record>> {
        self.check_read(RECORDS_COLLECTION)?;
        Ok(self.records.borrow().clone())
    }

    fn insert_record(&self, record: &Record) -> Result<()> {
        self.check_write(RECORDS_COLLECTION)?;
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }

    fn delete_record(&self, id: &Uuid) -> Result<()> {
        self.check_write(RECORDS_COLLECTION)?;
        let mut records = self.records.borrow_mut();
        let pos = records
            .iter()
            .position(|r| r.id == *id)
            .ok_or_else(|| DocstashError::NotFound(format!("record {}", id)))?;
        records.remove(pos);
        Ok(())
    }

    fn replace_record(&self, record: &Record) -> Result<()> {
        self.check_write(RECORDS_COLLECTION)?;
        if self.simulate_replace_error.get() {
            return Err(DocstashError::Upstream(format!(
                "Simulated replace error on {}",
                RECORDS_COLLECTION
            )));
        }
        let mut records = self.records.borrow_mut();
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| DocstashError::NotFound(format!("record {}", record.id)))?;
        *slot = record.clone();
        Ok(())
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        self.check_read(TAGS_COLLECTION)?;
        Ok(self.tags.borrow().clone())
    }

    fn insert_tag(&self, tag: &Tag) -> Result<()> {
        self.check_write(TAGS_COLLECTION)?;
        self.tags.borrow_mut().push(tag.clone());
        Ok(())
    }

    fn delete_tag(&self, id: &Uuid) -> Result<()> {
        self.check_write(TAGS_COLLECTION)?;
        let mut tags = self.tags.borrow_mut();
        let pos = tags
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| DocstashError::NotFound(format!("tag {}", id)))?;
        tags.remove(pos);
        Ok(())
    }
}
