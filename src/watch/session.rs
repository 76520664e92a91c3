//! Watch session state machine.
//!
//! `Idle -> Active -> Closing -> Closed`. The session owns the subscription for
//! its whole life and closes it exactly once, whether it stops on the shutdown
//! signal, on a watcher error, on a failed emission, or by being dropped.

use crate::error::{ConnectorError, Result};
use crate::events::EventBridge;
use crate::fetch::load_resource;
use crate::scan::IgnoreSet;
use crate::utils::resolve_against;
use crate::watch::shutdown::ShutdownSignal;
use crate::watch::source::{
    Subscription, WatchNotification, WatchOptions, WatcherFactory, WATCH_ALL,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Closing,
    Closed,
}

pub struct WatchSession {
    state: SessionState,
    root: PathBuf,
    ignore: IgnoreSet,
    shutdown: ShutdownSignal,
    subscription: Option<Box<dyn Subscription>>,
}

impl WatchSession {
    pub fn new(ignore: IgnoreSet, shutdown: ShutdownSignal) -> Self {
        Self {
            state: SessionState::Idle,
            root: ignore.root().to_path_buf(),
            ignore,
            shutdown,
            subscription: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Create the watcher over the root. Only valid from `Idle`.
    pub fn start(&mut self, factory: &dyn WatcherFactory) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(ConnectorError::InvalidState(format!(
                "cannot start from {:?}",
                self.state
            )));
        }

        let options =
            WatchOptions { cwd: self.root.clone(), ignored: self.ignore.patterns().to_vec() };
        let subscription = factory.watch(WATCH_ALL, options)?;

        self.subscription = Some(subscription);
        self.state = SessionState::Active;
        info!(root = %self.root.display(), "Watching for changes");
        Ok(())
    }

    /// Process notifications until shutdown or failure, then close.
    ///
    /// Resolves `Ok` on shutdown. A watcher error, a failed read, or a rejected
    /// emission closes the watcher and is returned.
    pub async fn run(&mut self, bridge: &EventBridge) -> Result<()> {
        let result = self.drive(bridge).await;
        self.close();
        result
    }

    async fn drive(&mut self, bridge: &EventBridge) -> Result<()> {
        let mut shutdown = self.shutdown.clone();
        let root = self.root.clone();
        let Some(subscription) = self.subscription.as_mut() else {
            return Ok(());
        };
        let mut source_open = true;

        loop {
            let notification = tokio::select! {
                biased;
                _ = shutdown.triggered() => {
                    info!("Shutdown requested, closing watcher");
                    return Ok(());
                }
                next = next_or_pending(subscription.as_mut(), source_open) => next,
            };

            let Some(notification) = notification else {
                debug!("Watcher stream ended, waiting for shutdown");
                source_open = false;
                continue;
            };

            tokio::select! {
                biased;
                _ = shutdown.triggered() => {
                    info!("Shutdown requested during emission, closing watcher");
                    return Ok(());
                }
                handled = handle_notification(&root, bridge, notification) => handled?,
            }
        }
    }

    /// Release the watcher. Later calls are no-ops.
    pub fn close(&mut self) {
        if matches!(self.state, SessionState::Closing | SessionState::Closed) {
            return;
        }
        self.state = SessionState::Closing;
        if let Some(mut subscription) = self.subscription.take() {
            subscription.close();
        }
        self.state = SessionState::Closed;
        debug!("Watch session closed");
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.close();
    }
}

async fn next_or_pending(
    subscription: &mut dyn Subscription,
    open: bool,
) -> Option<WatchNotification> {
    if open {
        subscription.next().await
    } else {
        std::future::pending().await
    }
}

/// Each change is its own micro-scan: at most one `fetch::end` and one `scan::end`.
async fn handle_notification(
    root: &Path,
    bridge: &EventBridge,
    notification: WatchNotification,
) -> Result<()> {
    debug!(kind = notification.kind(), "Watcher notification");

    match notification {
        WatchNotification::Add(path) | WatchNotification::Change(path) => {
            let path = resolve_against(root, &path);
            match load_resource(&path, None).await {
                Ok(resource) => bridge.fetch_end(resource).await?,
                // Removed before we got to read it
                Err(e) if e.is_not_found() => {
                    debug!(path = %path.display(), "Changed file vanished before read");
                }
                Err(e) => return Err(e),
            }
            bridge.scan_end().await
        }
        WatchNotification::Unlink(_) | WatchNotification::Ready => bridge.scan_end().await,
        WatchNotification::Error(e) => Err(e.into()),
    }
}
