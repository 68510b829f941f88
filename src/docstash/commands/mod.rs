//! # Command Layer
//!
//! This module contains the **business logic** of docstash. Each command lives in
//! its own submodule and is a plain function over the working set
//! ([`RecordStore`](crate::store::RecordStore)) and a
//! [`PersistenceProvider`](crate::providers::PersistenceProvider).
//!
//! ## The Write Cycle
//!
//! Every write follows the same four steps:
//!
//! 1. **Validate locally**. A bad title, empty tag selection or blank tag name is
//!    rejected before the provider sees anything.
//! 2. **Call the provider** (insert / delete / replace).
//! 3. **Refetch** both collections and replace the working set wholesale
//!    ([`sync::refresh`]). There is no incremental merge; the last successful fetch
//!    wins.
//! 4. **Report** a [`CmdResult`].
//!
//! If step 2 fails the working set is left exactly as it was and the provider's
//! message is passed through as an upstream error. Nothing is retried.
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: no stdout, stderr or prompts. Confirmation before a
//!   delete is the caller's job.
//! - **Authentication**: the API facade checks the session before dispatching.
//!
//! ## Command Modules
//!
//! - [`create`]: Register a record
//! - [`delete`]: Delete a record
//! - [`get`]: Filtered, sorted listing
//! - [`view`]: Show one record
//! - [`tags`]: Tag registry (add, list, delete, selection options)
//! - [`attach`]: Upload a file and return its URL
//! - [`auth`]: Sign in, sign out, sign up, whoami
//! - [`config`]: Read and change configuration
//! - [`sync`]: Refetch the working set from the provider

use crate::config::DocstashConfig;
use crate::model::Record;
use crate::providers::Session;
use crate::tags::Tag;
use serde::Serialize;

pub mod attach;
pub mod auth;
pub mod config;
pub mod create;
pub mod delete;
pub mod get;
pub mod sync;
pub mod tags;
pub mod view;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<Record>,
    pub listed_records: Vec<Record>,
    pub listed_tags: Vec<Tag>,
    pub session: Option<Session>,
    pub uploaded_url: Option<String>,
    pub config: Option<DocstashConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<Record>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_listed_tags(mut self, tags: Vec<Tag>) -> Self {
        self.listed_tags = tags;
        self
    }

    pub fn with_session(mut self, session: Option<Session>) -> Self {
        self.session = session;
        self
    }

    pub fn with_uploaded_url(mut self, url: String) -> Self {
        self.uploaded_url = Some(url);
        self
    }

    pub fn with_config(mut self, config: DocstashConfig) -> Self {
        self.config = Some(config);
        self
    }
}

pub(crate) fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}
