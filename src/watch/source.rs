//! Watcher capability seam.
//!
//! The session only sees a [`WatcherFactory`] that hands out [`Subscription`]s.
//! [`crate::watch::notify_source`] backs it with the OS watcher; tests use a
//! channel-fed fake.

use crate::error::WatchError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Pattern passed to the factory: the whole root, relative to `cwd`.
pub const WATCH_ALL: &str = ".";

/// Options a watcher is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    /// Root the pattern and reported relative paths are resolved against
    pub cwd: PathBuf,
    /// Ignore patterns, in the order the ignore builder produced them
    pub ignored: Vec<String>,
}

/// Notification from a live watcher.
#[derive(Debug)]
pub enum WatchNotification {
    Add(PathBuf),
    Change(PathBuf),
    Unlink(PathBuf),
    /// Initial baseline of the watcher is complete
    Ready,
    Error(WatchError),
}

impl WatchNotification {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Change(_) => "change",
            Self::Unlink(_) => "unlink",
            Self::Ready => "ready",
            Self::Error(_) => "error",
        }
    }
}

/// A live watcher handle.
#[async_trait]
pub trait Subscription: Send {
    /// Next notification in arrival order. `None` once the source has stopped.
    async fn next(&mut self) -> Option<WatchNotification>;

    /// Release the underlying watcher.
    fn close(&mut self);
}

pub trait WatcherFactory: Send + Sync {
    fn watch(
        &self,
        pattern: &str,
        options: WatchOptions,
    ) -> Result<Box<dyn Subscription>, WatchError>;
}
