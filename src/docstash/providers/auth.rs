//! Authentication providers.
//!
//! [`FsAuth`] keeps local accounts in `accounts.json`, storing only the SHA-256 of
//! each secret, and remembers the signed-in account in `session.json` so the
//! session survives between CLI invocations. [`MemAuth`] does the same in memory.

use super::fs_backend::write_json_atomic;
use super::{AuthProvider, Session};
use crate::error::{DocstashError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

const ACCOUNTS_FILENAME: &str = "accounts.json";
const SESSION_FILENAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Account {
    identifier: String,
    secret_sha256: String,
}

fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(64);
    for b in digest {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn normalize_identifier(identifier: &str) -> Result<String> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(DocstashError::Validation(
            "identifier is required".to_string(),
        ));
    }
    Ok(identifier.to_string())
}

fn invalid_credentials() -> DocstashError {
    DocstashError::Upstream("invalid login credentials".to_string())
}

fn check_credentials(accounts: &[Account], identifier: &str, secret: &str) -> Result<Session> {
    let expected = hash_secret(secret);
    accounts
        .iter()
        .find(|a| a.identifier == identifier && a.secret_sha256 == expected)
        .map(|a| Session {
            identifier: a.identifier.clone(),
            signed_in_at: Utc::now(),
        })
        .ok_or_else(invalid_credentials)
}

fn new_account(accounts: &[Account], identifier: &str, secret: &str) -> Result<Account> {
    if secret.is_empty() {
        return Err(DocstashError::Validation("secret is required".to_string()));
    }
    if accounts.iter().any(|a| a.identifier == identifier) {
        return Err(DocstashError::Upstream(format!(
            "account '{}' already registered",
            identifier
        )));
    }
    Ok(Account {
        identifier: identifier.to_string(),
        secret_sha256: hash_secret(secret),
    })
}

/// File-backed local accounts and session.
pub struct FsAuth {
    root: PathBuf,
}

impl FsAuth {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn load_accounts(&self) -> Result<Vec<Account>> {
        let path = self.root.join(ACCOUNTS_FILENAME);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).map_err(DocstashError::Io)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        write_json_atomic(&self.root, ACCOUNTS_FILENAME, accounts)
    }
}

impl AuthProvider for FsAuth {
    fn current_session(&self) -> Result<Option<Session>> {
        let path = self.root.join(SESSION_FILENAME);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let session: Session = serde_json::from_str(&content)?;

        // An account removed after sign-in invalidates the session.
        let accounts = self.load_accounts()?;
        if accounts.iter().any(|a| a.identifier == session.identifier) {
            Ok(Some(session))
        } else {
            debug!(identifier = %session.identifier, "stale session ignored");
            Ok(None)
        }
    }

    fn sign_in(&self, identifier: &str, secret: &str) -> Result<Session> {
        let identifier = normalize_identifier(identifier)?;
        let session = check_credentials(&self.load_accounts()?, &identifier, secret)?;

        write_json_atomic(&self.root, SESSION_FILENAME, &session)?;
        info!(identifier = %session.identifier, "signed in");
        Ok(session)
    }

    fn sign_out(&self) -> Result<()> {
        let path = self.root.join(SESSION_FILENAME);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn sign_up(&self, identifier: &str, secret: &str) -> Result<()> {
        let identifier = normalize_identifier(identifier)?;
        let mut accounts = self.load_accounts()?;
        let account = new_account(&accounts, &identifier, secret)?;
        accounts.push(account);
        self.save_accounts(&accounts)?;
        info!(identifier = %identifier, "account registered");
        Ok(())
    }
}

/// In-memory auth provider for testing.
#[derive(Default)]
pub struct MemAuth {
    accounts: RefCell<Vec<Account>>,
    session: RefCell<Option<Session>>,
}

impl MemAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// An auth provider with one account already signed in.
    pub fn signed_in(identifier: &str) -> Self {
        let auth = Self::new();
        auth.accounts.borrow_mut().push(Account {
            identifier: identifier.to_string(),
            secret_sha256: hash_secret(""),
        });
        *auth.session.borrow_mut() = Some(Session {
            identifier: identifier.to_string(),
            signed_in_at: Utc::now(),
        });
        auth
    }
}

impl AuthProvider for MemAuth {
    fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.session.borrow().clone())
    }

    fn sign_in(&self, identifier: &str, secret: &str) -> Result<Session> {
        let identifier = normalize_identifier(identifier)?;
        let session = check_credentials(&self.accounts.borrow(), &identifier, secret)?;
        *self.session.borrow_mut() = Some(session.clone());
        Ok(session)
    }

    fn sign_out(&self) -> Result<()> {
        *self.session.borrow_mut() = None;
        Ok(())
    }

    fn sign_up(&self, identifier: &str, secret: &str) -> Result<()> {
        let identifier = normalize_identifier(identifier)?;
        let account = new_account(&self.accounts.borrow(), &identifier, secret)?;
        self.accounts.borrow_mut().push(account);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn mem_sign_up_then_sign_in() {
        let auth = MemAuth::new();
        assert!(auth.current_session().unwrap().is_none());

        auth.sign_up("alice@example.com", "hunter2").unwrap();
        let session = auth.sign_in("alice@example.com", "hunter2").unwrap();
        assert_eq!(session.identifier, "alice@example.com");
        assert!(auth.current_session().unwrap().is_some());

        auth.sign_out().unwrap();
        assert!(auth.current_session().unwrap().is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let auth = MemAuth::new();
        auth.sign_up("alice", "right").unwrap();
        let err = auth.sign_in("alice", "wrong").unwrap_err();
        assert_eq!(err.to_string(), "Upstream error: invalid login credentials");
        assert!(auth.current_session().unwrap().is_none());
    }

    #[test]
    fn duplicate_sign_up_is_rejected() {
        let auth = MemAuth::new();
        auth.sign_up("alice", "one").unwrap();
        assert!(auth.sign_up("alice", "two").is_err());
    }

    #[test]
    fn blank_identifier_is_validation_error() {
        let auth = MemAuth::new();
        assert!(matches!(
            auth.sign_up("  ", "x"),
            Err(DocstashError::Validation(_))
        ));
    }

    #[test]
    fn fs_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let auth = FsAuth::new(dir.path());
        auth.sign_up("bob", "s3cret").unwrap();
        auth.sign_in("bob", "s3cret").unwrap();

        let reopened = FsAuth::new(dir.path());
        let session = reopened.current_session().unwrap().unwrap();
        assert_eq!(session.identifier, "bob");

        let stored = fs::read_to_string(dir.path().join(ACCOUNTS_FILENAME)).unwrap();
        assert!(!stored.contains("s3cret"));

        reopened.sign_out().unwrap();
        assert!(FsAuth::new(dir.path()).current_session().unwrap().is_none());
    }

    #[test]
    fn fs_writes_replace_files_without_temp_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("home");
        let auth = FsAuth::new(&root);
        auth.sign_up("bob", "pw").unwrap();
        auth.sign_up("carol", "pw").unwrap();
        auth.sign_in("carol", "pw").unwrap();

        let accounts: Vec<Account> =
            serde_json::from_str(&fs::read_to_string(root.join(ACCOUNTS_FILENAME)).unwrap())
                .unwrap();
        assert_eq!(accounts.len(), 2);
        let session: Session =
            serde_json::from_str(&fs::read_to_string(root.join(SESSION_FILENAME)).unwrap())
                .unwrap();
        assert_eq!(session.identifier, "carol");

        let mut names: Vec<String> = fs::read_dir(&root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![ACCOUNTS_FILENAME, SESSION_FILENAME]);
    }

    #[test]
    fn fs_session_for_removed_account_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let auth = FsAuth::new(dir.path());
        auth.sign_up("bob", "pw").unwrap();
        auth.sign_in("bob", "pw").unwrap();

        fs::write(dir.path().join(ACCOUNTS_FILENAME), "[]").unwrap();
        assert!(auth.current_session().unwrap().is_none());
    }
}
