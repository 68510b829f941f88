use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocstashError {
    /// A required field is missing or malformed. Raised before any provider call.
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// An external provider (persistence, auth, blob storage) failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Not signed in (run `docstash login <identifier>` first)")]
    Unauthenticated,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocstashError {
    /// Re-labels local I/O and serialization failures as upstream errors, keeping
    /// the message. Providers are remote from the core's point of view.
    pub fn into_upstream(self) -> Self {
        match self {
            DocstashError::Io(e) => DocstashError::Upstream(e.to_string()),
            DocstashError::Serialization(e) => DocstashError::Upstream(e.to_string()),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DocstashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_upstream() {
        let err = DocstashError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        match err.into_upstream() {
            DocstashError::Upstream(msg) => assert!(msg.contains("denied")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn validation_errors_pass_through() {
        let err = DocstashError::Validation("title and tag are required".into());
        assert_eq!(
            err.into_upstream().to_string(),
            "title and tag are required"
        );
    }
}
