//! `collect()`: scan a file or directory and, optionally, keep watching it.

use crate::config::ConnectorConfig;
use crate::domain::CollectOptions;
use crate::error::Result;
use crate::events::{EventBridge, EventSink};
use crate::fetch::{load_resource, Target, TargetKind};
use crate::scan::{DirectoryScanner, IgnoreSet};
use crate::watch::{NotifyWatcherFactory, ShutdownSignal, WatchSession, WatcherFactory};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Local filesystem connector.
///
/// Every event goes through the sink and is awaited before the next step, so a
/// slow sink slows the scan and a failing sink stops it.
pub struct LocalConnector {
    sink: Arc<dyn EventSink>,
    watcher: Arc<dyn WatcherFactory>,
    shutdown: ShutdownSignal,
    follow_symlinks: bool,
    custom_watcher: bool,
}

impl LocalConnector {
    /// Connector with the OS watcher and a shutdown signal that never fires.
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            watcher: Arc::new(NotifyWatcherFactory::default()),
            shutdown: ShutdownSignal::never(),
            follow_symlinks: false,
            custom_watcher: false,
        }
    }

    /// Apply file-level settings.
    ///
    /// `poll_interval_ms` only reaches the built-in notify watcher, and only its
    /// polling backends use it. A factory set through [`Self::watcher_factory`]
    /// is kept whichever builder call comes first.
    pub fn with_config(mut self, config: &ConnectorConfig) -> Self {
        self.follow_symlinks = config.follow_symlinks;
        if !self.custom_watcher {
            self.watcher = Arc::new(NotifyWatcherFactory::new(Duration::from_millis(
                config.poll_interval_ms,
            )));
        }
        self
    }

    /// Replace the source of watch notifications.
    pub fn watcher_factory(mut self, factory: Arc<dyn WatcherFactory>) -> Self {
        self.watcher = factory;
        self.custom_watcher = true;
        self
    }

    /// Signal that ends watch mode.
    pub fn shutdown(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = signal;
        self
    }

    /// Set whether directory scans follow symbolic links
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Run one collection over `target`.
    ///
    /// - File: `scan::start`, `fetch::start::target`, `fetch::end::{category}`.
    ///   No `scan::end` follows.
    /// - Directory: `scan::start`, one `fetch::end::{category}` per file, then
    ///   `scan::end`, or the watch session when `options.watch` is set.
    ///   `options.content` is ignored here.
    ///
    /// In watch mode this resolves only once the shutdown signal fires, and
    /// fails with the watcher's error if the watcher reports one.
    pub async fn collect(&self, target: &Target, options: CollectOptions) -> Result<()> {
        let bridge = EventBridge::new(self.sink.clone(), target);

        match target.kind() {
            TargetKind::File => {
                self.collect_file(target, &bridge, options.content.as_deref()).await
            }
            TargetKind::Directory => self.collect_directory(target, &bridge, options.watch).await,
        }
    }

    async fn collect_file(
        &self,
        target: &Target,
        bridge: &EventBridge,
        content: Option<&str>,
    ) -> Result<()> {
        info!(uri = %target, "Scanning file");
        bridge.scan_start().await?;
        bridge.fetch_start_target().await?;
        let resource = load_resource(target.path(), content).await?;
        bridge.fetch_end(resource).await
    }

    async fn collect_directory(
        &self,
        target: &Target,
        bridge: &EventBridge,
        watch: bool,
    ) -> Result<()> {
        info!(uri = %target, watch, "Scanning directory");
        bridge.scan_start().await?;

        let ignore = IgnoreSet::for_root(target.root());
        let files = DirectoryScanner::from_ignore(ignore.clone())
            .follow_symlinks(self.follow_symlinks)
            .scan()?;

        for path in &files {
            // Content overrides only apply to single-file targets
            let resource = load_resource(path, None).await?;
            bridge.fetch_end(resource).await?;
        }
        info!(files = files.len(), "Initial scan complete");

        if !watch {
            return bridge.scan_end().await;
        }

        let mut session = WatchSession::new(ignore, self.shutdown.clone());
        session.start(self.watcher.as_ref())?;
        session.run(bridge).await
    }
}
