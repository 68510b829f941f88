use crate::commands::sync::upstream;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DocstashError, Result};
use crate::providers::AuthProvider;

pub fn login<A: AuthProvider>(auth: &A, identifier: &str, secret: &str) -> Result<CmdResult> {
    let session = auth.sign_in(identifier, secret).map_err(auth_error)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Signed in as {}",
        session.identifier
    )));
    Ok(result.with_session(Some(session)))
}

pub fn logout<A: AuthProvider>(auth: &A) -> Result<CmdResult> {
    let previous = auth.current_session().map_err(upstream)?;
    auth.sign_out().map_err(upstream)?;

    let mut result = CmdResult::default();
    match previous {
        Some(session) => result.add_message(CmdMessage::success(format!(
            "Signed out {}",
            session.identifier
        ))),
        None => result.add_message(CmdMessage::info("Not signed in")),
    }
    Ok(result)
}

pub fn register<A: AuthProvider>(auth: &A, identifier: &str, secret: &str) -> Result<CmdResult> {
    auth.sign_up(identifier, secret).map_err(auth_error)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Registered {}",
        identifier.trim()
    )));
    Ok(result)
}

pub fn whoami<A: AuthProvider>(auth: &A) -> Result<CmdResult> {
    let session = auth.current_session().map_err(upstream)?;
    Ok(CmdResult::default().with_session(session))
}

// Rejected identifiers and secrets keep their validation kind.
fn auth_error(err: DocstashError) -> DocstashError {
    match err {
        DocstashError::Validation(_) => err,
        other => upstream(other),
    }
}
