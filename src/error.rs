//! Error types for the connector.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a `collect()` run.
///
/// Nothing in the connector retries; every variant reaches the caller.
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Target does not exist: {0}")]
    TargetNotFound(String),

    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Event consumer rejected '{event}'")]
    Emit {
        event: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Watcher failed: {0}")]
    Watcher(#[from] WatchError),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Invalid watch session state: {0}")]
    InvalidState(String),
}

impl ConnectorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Whether this is a read of a file that no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Error value reported by a watcher subscription.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error(transparent)]
    Notify(#[from] notify::Error),

    #[error("{0}")]
    Message(String),
}

impl From<&str> for WatchError {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = ConnectorError::io(
            "/tmp/gone.js",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());

        let err = ConnectorError::io(
            "/tmp/locked.js",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_watch_error_keeps_message() {
        let err = ConnectorError::from(WatchError::from("Error!"));
        match err {
            ConnectorError::Watcher(WatchError::Message(msg)) => assert_eq!(msg, "Error!"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
