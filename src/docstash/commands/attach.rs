use crate::commands::sync::upstream;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DocstashError, Result};
use crate::providers::BlobStorage;
use std::fs;
use std::path::Path;

/// Uploads the file at `path` into `bucket`. The returned URL is meant to be
/// used as a record's `url`.
pub fn run<B: BlobStorage>(blob: &B, bucket: &str, path: &Path) -> Result<CmdResult> {
    let bytes = fs::read(path).map_err(|e| {
        DocstashError::Validation(format!("cannot read {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let url = blob.upload(bucket, &bytes, &name).map_err(upstream)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("Uploaded {} to {}", name, bucket)));
    Ok(result.with_uploaded_url(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::blob::MemBlobStore;

    #[test]
    fn uploads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scan.pdf");
        fs::write(&file, b"%PDF").unwrap();
        let blob = MemBlobStore::new();

        let result = run(&blob, "documents", &file).unwrap();
        let url = result.uploaded_url.unwrap();
        assert!(url.starts_with("memory://documents/"));
        assert!(url.ends_with("-scan.pdf"));
        assert_eq!(blob.get(&url).unwrap(), b"%PDF");
    }

    #[test]
    fn missing_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let blob = MemBlobStore::new();
        let err = run(&blob, "documents", &dir.path().join("nope.pdf")).unwrap_err();
        assert!(matches!(err, DocstashError::Validation(_)));
    }
}
