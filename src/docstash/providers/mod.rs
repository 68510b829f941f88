//! # External Providers
//!
//! docstash talks to three collaborators it does not own. Each one is a trait so
//! the rest of the library never knows where data actually lives:
//!
//! - [`PersistenceProvider`]: the durable row store, keyed by collection name
//!   (`documents` for records, `custom_tags` for tags). Source of truth on reload.
//! - [`AuthProvider`]: answers "is somebody signed in?" and handles sign-in.
//! - [`BlobStorage`]: uploads a file and hands back a public URL for a record's
//!   `url` field.
//!
//! ## Implementations
//!
//! | Trait | Production | Testing |
//! |-------|------------|---------|
//! | `PersistenceProvider` | [`fs_backend::FsProvider`] | [`mem_backend::MemProvider`] |
//! | `AuthProvider` | [`auth::FsAuth`] | [`auth::MemAuth`] |
//! | `BlobStorage` | [`blob::FsBlobStore`] | [`blob::MemBlobStore`] |
//!
//! ## Storage Layout
//!
//! ```text
//! $DOCSTASH_HOME/
//! ├── config.json         # DocstashConfig
//! ├── documents.json      # records collection
//! ├── custom_tags.json    # tags collection
//! ├── accounts.json       # local accounts (identifier + SHA-256 of the secret)
//! ├── session.json        # the signed-in session, if any
//! └── storage/<bucket>/   # uploaded files
//! ```
//!
//! ## Consistency
//!
//! Calls are treated as remote round-trips: no version checks, last write wins.
//! The API layer re-fetches both collections after every successful write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::Record;
use crate::tags::Tag;

pub mod auth;
pub mod blob;
pub mod fs_backend;
pub mod mem_backend;

pub const RECORDS_COLLECTION: &str = "documents";
pub const TAGS_COLLECTION: &str = "custom_tags";

/// Abstract interface for the durable record and tag store.
pub trait PersistenceProvider {
    fn list_records(&self) -> Result<Vec<Record>>;

    fn insert_record(&self, record: &Record) -> Result<()>;

    /// Errors with `NotFound` if no record has this id.
    fn delete_record(&self, id: &Uuid) -> Result<()>;

    /// Overwrites the stored record with the same id. Only cascading tag
    /// deletion uses this; records are otherwise immutable.
    fn replace_record(&self, record: &Record) -> Result<()>;

    fn list_tags(&self) -> Result<Vec<Tag>>;

    fn insert_tag(&self, tag: &Tag) -> Result<()>;

    /// Errors with `NotFound` if no tag has this id.
    fn delete_tag(&self, id: &Uuid) -> Result<()>;
}

/// An authenticated session. The core only checks that one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identifier: String,
    pub signed_in_at: DateTime<Utc>,
}

pub trait AuthProvider {
    fn current_session(&self) -> Result<Option<Session>>;

    fn sign_in(&self, identifier: &str, secret: &str) -> Result<Session>;

    fn sign_out(&self) -> Result<()>;

    /// Creates an account. Does not sign in.
    fn sign_up(&self, identifier: &str, secret: &str) -> Result<()>;
}

pub trait BlobStorage {
    /// Stores `bytes` in `bucket` and returns a public URL for them.
    fn upload(&self, bucket: &str, bytes: &[u8], suggested_name: &str) -> Result<String>;
}

/// Reduces an arbitrary file name to something safe to use as an object key.
pub(crate) fn sanitize_object_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_simple_names() {
        assert_eq!(sanitize_object_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_object_name("契約書.pdf"), "契約書.pdf");
    }

    #[test]
    fn sanitize_strips_directories_and_odd_chars() {
        assert_eq!(sanitize_object_name("/tmp/a b/c d.txt"), "c_d.txt");
        assert_eq!(sanitize_object_name("..\\evil.sh"), "evil.sh");
        assert_eq!(sanitize_object_name(".."), "file");
        assert_eq!(sanitize_object_name(""), "file");
    }
}
