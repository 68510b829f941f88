//! # Configuration
//!
//! Stored as `config.json` in the data directory. Missing keys fall back to their
//! defaults, and a missing file means "all defaults".
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `duplicate_tags` | `allow` | `allow` or `reject` a tag name registered twice in one scope |
//! | `tag_delete` | `orphan` | `orphan` leaves deleted tag names on records, `cascade` strips them |
//! | `default_sort` | `newest` | Sort order for `list` when none is given |
//! | `storage_bucket` | `documents` | Bucket used for `add --attach` uploads |

use crate::error::{DocstashError, Result};
use crate::providers::fs_backend::write_json_atomic;
use crate::query::SortKey;
use crate::store::{DuplicateTagPolicy, TagDeletePolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BUCKET: &str = "documents";

pub const CONFIG_KEYS: &[&str] = &[
    "duplicate_tags",
    "tag_delete",
    "default_sort",
    "storage_bucket",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocstashConfig {
    #[serde(default)]
    pub duplicate_tags: DuplicateTagPolicy,

    #[serde(default)]
    pub tag_delete: TagDeletePolicy,

    #[serde(default)]
    pub default_sort: SortKey,

    #[serde(default = "default_bucket")]
    pub storage_bucket: String,
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

impl Default for DocstashConfig {
    fn default() -> Self {
        Self {
            duplicate_tags: DuplicateTagPolicy::default(),
            tag_delete: TagDeletePolicy::default(),
            default_sort: SortKey::default(),
            storage_bucket: default_bucket(),
        }
    }
}

impl DocstashConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DocstashError::Io)?;
        let config: DocstashConfig =
            serde_json::from_str(&content).map_err(DocstashError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        write_json_atomic(config_dir.as_ref(), CONFIG_FILENAME, self)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match normalize_key(key).as_str() {
            "duplicate_tags" => match self.duplicate_tags {
                DuplicateTagPolicy::Allow => "allow".to_string(),
                DuplicateTagPolicy::Reject => "reject".to_string(),
            },
            "tag_delete" => match self.tag_delete {
                TagDeletePolicy::Orphan => "orphan".to_string(),
                TagDeletePolicy::Cascade => "cascade".to_string(),
            },
            "default_sort" => self.default_sort.to_string(),
            "storage_bucket" => self.storage_bucket.clone(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match normalize_key(key).as_str() {
            "duplicate_tags" => {
                self.duplicate_tags = match value {
                    "allow" => DuplicateTagPolicy::Allow,
                    "reject" => DuplicateTagPolicy::Reject,
                    _ => return Err(invalid_value(key, value, "allow, reject")),
                }
            }
            "tag_delete" => {
                self.tag_delete = match value {
                    "orphan" => TagDeletePolicy::Orphan,
                    "cascade" => TagDeletePolicy::Cascade,
                    _ => return Err(invalid_value(key, value, "orphan, cascade")),
                }
            }
            "default_sort" => {
                self.default_sort = value.parse().map_err(DocstashError::Validation)?;
            }
            "storage_bucket" => {
                if value.is_empty() {
                    return Err(invalid_value(key, value, "a non-empty bucket name"));
                }
                self.storage_bucket = value.to_string();
            }
            _ => {
                return Err(DocstashError::Validation(format!(
                    "unknown config key '{}' (known keys: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().replace('-', "_")
}

fn invalid_value(key: &str, value: &str, expected: &str) -> DocstashError {
    DocstashError::Validation(format!(
        "invalid value '{}' for {} (expected {})",
        value, key, expected
    ))
}
