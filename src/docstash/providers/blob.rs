use super::{sanitize_object_name, BlobStorage};
use crate::error::{DocstashError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// Stores uploads under `<root>/storage/<bucket>/` and returns `file://` URLs.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf> {
        let bucket = sanitize_object_name(bucket);
        let dir = self.root.join("storage").join(bucket);
        fs::create_dir_all(&dir).map_err(DocstashError::Io)?;
        Ok(dir)
    }
}

impl BlobStorage for FsBlobStore {
    fn upload(&self, bucket: &str, bytes: &[u8], suggested_name: &str) -> Result<String> {
        let dir = self.bucket_dir(bucket)?;
        let key = format!("{}-{}", Uuid::new_v4(), sanitize_object_name(suggested_name));
        let path = dir.join(&key);
        fs::write(&path, bytes).map_err(DocstashError::Io)?;

        let absolute = path.canonicalize().unwrap_or(path);
        info!(bucket, key = %key, bytes = bytes.len(), "uploaded object");
        Ok(format!("file://{}", absolute.display()))
    }
}

/// In-memory blob storage for testing.
#[derive(Default)]
pub struct MemBlobStore {
    objects: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under a URL returned by [`BlobStorage::upload`].
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        self.objects.borrow().get(url).cloned()
    }
}

impl BlobStorage for MemBlobStore {
    fn upload(&self, bucket: &str, bytes: &[u8], suggested_name: &str) -> Result<String> {
        let url = format!(
            "memory://{}/{}-{}",
            bucket,
            Uuid::new_v4(),
            sanitize_object_name(suggested_name)
        );
        self.objects.borrow_mut().insert(url.clone(), bytes.to_vec());
        Ok(url)
    }
}
