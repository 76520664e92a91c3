//! Core data types shared across the connector

use serde::Deserialize;

pub use crate::utils::classify::ContentCategory;

/// One fetched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// `file://` URI of the file
    pub uri: String,
    pub category: ContentCategory,
    pub media_type: &'static str,
    /// Detected text encoding. `None` for binary categories.
    pub charset: Option<String>,
    /// Decoded text, the caller's override, or empty for binary categories.
    pub content: String,
}

/// Per-call options for `collect()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectOptions {
    /// Replaces the file's text. Honoured only when the target is a single file.
    pub content: Option<String>,
    /// Stay alive after the initial scan and report filesystem changes.
    pub watch: bool,
}

impl CollectOptions {
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }
}

/// Settings loaded from a config file, overridable from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorConfig {
    /// Keep watching after the initial scan
    pub watch: bool,
    /// Follow symbolic links while scanning directories
    pub follow_symlinks: bool,
    /// Poll interval for watcher backends that poll; native backends ignore it
    pub poll_interval_ms: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            watch: false,
            follow_symlinks: false,
            poll_interval_ms: crate::watch::notify_source::DEFAULT_POLL_INTERVAL_MS,
        }
    }
}
