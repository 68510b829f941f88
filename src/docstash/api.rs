//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for every docstash operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the session state**: the working set, the providers and the config
//! - **Gates** record and tag operations on a signed-in session
//! - **Applies configured policies** (duplicate tags, tag deletion, default bucket)
//! - **Dispatches** to the matching command function
//!
//! ## The Auth Gate
//!
//! Every record, tag and upload operation first asks the [`AuthProvider`] for the
//! current session. Without one the call fails with
//! [`DocstashError::Unauthenticated`] before the persistence provider is touched.
//! Account operations and configuration are not gated.
//!
//! ## Generic Over Providers
//!
//! `DocstashApi<P, A, B>` is generic over persistence, auth and blob storage:
//! - Production: `DocstashApi<FsProvider, FsAuth, FsBlobStore>`
//! - Testing: `DocstashApi<MemProvider, MemAuth, MemBlobStore>`
//!
//! API tests verify dispatch, gating and policy wiring. Command logic is tested in
//! the command modules.

use crate::commands::{self, CmdResult};
use crate::config::DocstashConfig;
use crate::error::{DocstashError, Result};
use crate::model::{Category, RecordDraft};
use crate::providers::{AuthProvider, BlobStorage, PersistenceProvider, Session};
use crate::query::RecordQuery;
use crate::store::{RecordStore, TagDeletePolicy};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct DocstashApi<P, A, B>
where
    P: PersistenceProvider,
    A: AuthProvider,
    B: BlobStorage,
{
    working: RecordStore,
    provider: P,
    auth: A,
    blob: B,
    config: DocstashConfig,
    data_dir: PathBuf,
}

impl<P, A, B> DocstashApi<P, A, B>
where
    P: PersistenceProvider,
    A: AuthProvider,
    B: BlobStorage,
{
    pub fn new(provider: P, auth: A, blob: B, config: DocstashConfig, data_dir: PathBuf) -> Self {
        let working = RecordStore::new().with_duplicate_policy(config.duplicate_tags);
        Self {
            working,
            provider,
            auth,
            blob,
            config,
            data_dir,
        }
    }

    fn require_session(&self) -> Result<Session> {
        match self.auth.current_session()? {
            Some(session) => Ok(session),
            None => {
                debug!("rejected call without a session");
                Err(DocstashError::Unauthenticated)
            }
        }
    }

    pub fn refresh(&mut self) -> Result<CmdResult> {
        self.require_session()?;
        commands::sync::refresh(&mut self.working, &self.provider)?;
        let mut result = CmdResult::default();
        result.add_message(commands::CmdMessage::info(format!(
            "{}, {}",
            commands::plural(self.working.len(), "record"),
            commands::plural(self.working.tags().len(), "tag")
        )));
        Ok(result)
    }

    pub fn add_record(&mut self, draft: &RecordDraft) -> Result<CmdResult> {
        self.require_session()?;
        commands::create::run(&mut self.working, &self.provider, draft)
    }

    /// Uploads `path` and registers `draft` with the upload's URL. The draft is
    /// validated before anything is uploaded.
    pub fn add_record_with_attachment(
        &mut self,
        draft: &RecordDraft,
        path: &Path,
    ) -> Result<CmdResult> {
        self.require_session()?;
        draft.build()?;

        let upload = commands::attach::run(&self.blob, &self.config.storage_bucket, path)?;
        let url = upload.uploaded_url.clone().unwrap_or_default();
        let mut result =
            commands::create::run(&mut self.working, &self.provider, &draft.clone().with_url(url))?;
        result.uploaded_url = upload.uploaded_url;
        Ok(result)
    }

    pub fn attach(&self, path: &Path) -> Result<CmdResult> {
        self.require_session()?;
        commands::attach::run(&self.blob, &self.config.storage_bucket, path)
    }

    pub fn list(&mut self, query: &RecordQuery) -> Result<CmdResult> {
        self.require_session()?;
        commands::get::run(&mut self.working, &self.provider, query)
    }

    pub fn view(&mut self, selector: &str) -> Result<CmdResult> {
        self.require_session()?;
        commands::view::run(&mut self.working, &self.provider, selector)
    }

    pub fn delete_record(&mut self, selector: &str) -> Result<CmdResult> {
        self.require_session()?;
        commands::delete::run(&mut self.working, &self.provider, selector)
    }

    pub fn add_tag(&mut self, name: &str, scope: Option<Category>) -> Result<CmdResult> {
        self.require_session()?;
        commands::tags::create(&mut self.working, &self.provider, name, scope)
    }

    pub fn list_tags(&mut self, scope: Option<Category>) -> Result<CmdResult> {
        self.require_session()?;
        commands::tags::list(&mut self.working, &self.provider, scope)
    }

    pub fn tag_options(&mut self, scope: Option<Category>) -> Result<Vec<String>> {
        self.require_session()?;
        commands::tags::options(&mut self.working, &self.provider, scope)
    }

    /// Deletes a tag. `policy` overrides the configured `tag_delete` for this call.
    pub fn delete_tag(
        &mut self,
        selector: &str,
        scope: Option<Category>,
        policy: Option<TagDeletePolicy>,
    ) -> Result<CmdResult> {
        self.require_session()?;
        let policy = policy.unwrap_or(self.config.tag_delete);
        commands::tags::delete(&mut self.working, &self.provider, selector, scope, policy)
    }

    pub fn sign_in(&self, identifier: &str, secret: &str) -> Result<CmdResult> {
        commands::auth::login(&self.auth, identifier, secret)
    }

    pub fn sign_out(&self) -> Result<CmdResult> {
        commands::auth::logout(&self.auth)
    }

    pub fn sign_up(&self, identifier: &str, secret: &str) -> Result<CmdResult> {
        commands::auth::register(&self.auth, identifier, secret)
    }

    pub fn whoami(&self) -> Result<CmdResult> {
        commands::auth::whoami(&self.auth)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    pub fn settings(&self) -> &DocstashConfig {
        &self.config
    }

    /// The working set as of the last successful fetch.
    pub fn store(&self) -> &RecordStore {
        &self.working
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, MessageLevel};
