use super::{PersistenceProvider, RECORDS_COLLECTION, TAGS_COLLECTION};
use crate::error::{DocstashError, Result};
use crate::model::Record;
use crate::tags::Tag;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Writes `value` as pretty JSON to `dir/filename`, creating `dir` if needed.
///
/// The content goes to a temp file in the same directory first and is renamed
/// over the target, so readers never see a half-written file.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(
    dir: &Path,
    filename: &str,
    value: &T,
) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(DocstashError::Io)?;
    }
    let content = serde_json::to_string_pretty(value).map_err(DocstashError::Serialization)?;

    let tmp_file = dir.join(format!(".{}-{}.tmp", filename, Uuid::new_v4()));
    fs::write(&tmp_file, content).map_err(DocstashError::Io)?;
    fs::rename(&tmp_file, dir.join(filename)).map_err(DocstashError::Io)?;
    Ok(())
}

/// File-backed persistence: one pretty-printed JSON array per collection.
pub struct FsProvider {
    root: PathBuf,
}

impl FsProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.json", collection))
    }

    fn load<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(DocstashError::Io)?;
        let rows: Vec<T> = serde_json::from_str(&content).map_err(DocstashError::Serialization)?;
        debug!(collection, rows = rows.len(), "loaded collection");
        Ok(rows)
    }

    fn save<T: Serialize>(&self, collection: &str, rows: &[T]) -> Result<()> {
        write_json_atomic(&self.root, &format!("{}.json", collection), rows)?;
        debug!(collection, rows = rows.len(), "saved collection");
        Ok(())
    }
}

impl PersistenceProvider for FsProvider {
    fn list_records(&self) -> Result<Vec<Record>> {
        self.load(RECORDS_COLLECTION)
    }

    fn insert_record(&self, record: &Record) -> Result<()> {
        let mut records: Vec<Record> = self.load(RECORDS_COLLECTION)?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(DocstashError::Upstream(format!(
                "duplicate key: record {} already exists",
                record.id
            )));
        }
        records.push(record.clone());
        self.save(RECORDS_COLLECTION, &records)
    }

    fn delete_record(&self, id: &Uuid) -> Result<()> {
        let mut records: Vec<Record> = self.load(RECORDS_COLLECTION)?;
        let original_len = records.len();
        records.retain(|r| r.id != *id);
        if records.len() == original_len {
            return Err(DocstashError::NotFound(format!("record {}", id)));
        }
        self.save(RECORDS_COLLECTION, &records)
    }

    fn replace_record(&self, record: &Record) -> Result<()> {
        let mut records: Vec<Record> = self.load(RECORDS_COLLECTION)?;
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| DocstashError::NotFound(format!("record {}", record.id)))?;
        *slot = record.clone();
        self.save(RECORDS_COLLECTION, &records)
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        self.load(TAGS_COLLECTION)
    }

    fn insert_tag(&self, tag: &Tag) -> Result<()> {
        let mut tags: Vec<Tag> = self.load(TAGS_COLLECTION)?;
        if tags.iter().any(|t| t.id == tag.id) {
            return Err(DocstashError::Upstream(format!(
                "duplicate key: tag {} already exists",
                tag.id
            )));
        }
        tags.push(tag.clone());
        self.save(TAGS_COLLECTION, &tags)
    }

    fn delete_tag(&self, id: &Uuid) -> Result<()> {
        let mut tags: Vec<Tag> = self.load(TAGS_COLLECTION)?;
        let original_len = tags.len();
        tags.retain(|t| t.id != *id);
        if tags.len() == original_len {
            return Err(DocstashError::NotFound(format!("tag {}", id)));
        }
        self.save(TAGS_COLLECTION, &tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordDraft;

    fn record(title: &str) -> Record {
        RecordDraft::new(title).with_tags(["t"]).build().unwrap()
    }

    #[test]
    fn empty_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FsProvider::new(dir.path().join("missing"));
        assert!(provider.list_records().unwrap().is_empty());
        assert!(provider.list_tags().unwrap().is_empty());
    }

    #[test]
    fn records_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let first = record("first");
        FsProvider::new(dir.path()).insert_record(&first).unwrap();

        let reopened = FsProvider::new(dir.path());
        let records = reopened.list_records().unwrap();
        assert_eq!(records, vec![first]);
        assert!(dir.path().join("documents.json").exists());
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FsProvider::new(dir.path());
        let r = record("once");
        provider.insert_record(&r).unwrap();
        let err = provider.insert_record(&r).unwrap_err();
        assert!(matches!(err, DocstashError::Upstream(_)));
    }

    #[test]
    fn delete_record_then_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FsProvider::new(dir.path());
        let r = record("doomed");
        provider.insert_record(&r).unwrap();

        provider.delete_record(&r.id).unwrap();
        assert!(provider.list_records().unwrap().is_empty());
        assert!(matches!(
            provider.delete_record(&r.id),
            Err(DocstashError::NotFound(_))
        ));
    }

    #[test]
    fn replace_record_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FsProvider::new(dir.path());
        let mut r = record("doc");
        provider.insert_record(&r).unwrap();

        r.tags = vec!["other".into()];
        provider.replace_record(&r).unwrap();
        assert_eq!(provider.list_records().unwrap()[0].tags, vec!["other"]);

        let stranger = record("stranger");
        assert!(matches!(
            provider.replace_record(&stranger),
            Err(DocstashError::NotFound(_))
        ));
    }

    #[test]
    fn tags_round_trip_through_custom_tags_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FsProvider::new(dir.path());
        let tag = Tag::new("infra", None);
        provider.insert_tag(&tag).unwrap();

        assert!(dir.path().join("custom_tags.json").exists());
        assert_eq!(provider.list_tags().unwrap(), vec![tag.clone()]);

        provider.delete_tag(&tag.id).unwrap();
        assert!(provider.list_tags().unwrap().is_empty());
        assert!(provider.delete_tag(&tag.id).is_err());
    }

    #[test]
    fn atomic_write_creates_dir_and_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");

        write_json_atomic(&nested, "rows.json", &vec![1, 2]).unwrap();
        write_json_atomic(&nested, "rows.json", &vec![3]).unwrap();

        let stored: Vec<i32> =
            serde_json::from_str(&fs::read_to_string(nested.join("rows.json")).unwrap()).unwrap();
        assert_eq!(stored, vec![3]);

        let leftovers: Vec<_> = fs::read_dir(&nested)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn corrupt_collection_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("documents.json"), "not json").unwrap();
        let provider = FsProvider::new(dir.path());
        assert!(matches!(
            provider.list_records(),
            Err(DocstashError::Serialization(_))
        ));
    }
}
