//! OS file watcher backed by `notify`.

use crate::error::WatchError;
use crate::scan::IgnoreSet;
use crate::watch::source::{Subscription, WatchNotification, WatchOptions, WatcherFactory};
use async_trait::async_trait;
use notify::event::{ModifyKind, RemoveKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Default poll interval for backends that poll (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Factory over notify's platform watcher.
///
/// The poll interval only matters when notify falls back to polling. Native
/// backends (inotify, FSEvents, ReadDirectoryChangesW) ignore it.
pub struct NotifyWatcherFactory {
    poll_interval: Duration,
}

impl NotifyWatcherFactory {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl Default for NotifyWatcherFactory {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }
}

impl WatcherFactory for NotifyWatcherFactory {
    fn watch(
        &self,
        pattern: &str,
        options: WatchOptions,
    ) -> Result<Box<dyn Subscription>, WatchError> {
        let watch_path = if pattern == "." { options.cwd.clone() } else { options.cwd.join(pattern) };
        let ignore = IgnoreSet::from_patterns(&options.cwd, options.ignored);
        let (tx, rx) = mpsc::unbounded_channel();

        let callback_tx = tx.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let notifications = match res {
                    Ok(event) => translate_event(event, &ignore),
                    Err(e) => vec![WatchNotification::Error(e.into())],
                };
                for notification in notifications {
                    let _ = callback_tx.send(notification);
                }
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(&watch_path, RecursiveMode::Recursive)?;
        info!(path = %watch_path.display(), "File watcher registered");

        // notify has no baseline phase; registration is the ready point
        let _ = tx.send(WatchNotification::Ready);

        Ok(Box::new(NotifySubscription { watcher: Some(watcher), rx }))
    }
}

struct NotifySubscription {
    watcher: Option<RecommendedWatcher>,
    rx: mpsc::UnboundedReceiver<WatchNotification>,
}

#[async_trait]
impl Subscription for NotifySubscription {
    async fn next(&mut self) -> Option<WatchNotification> {
        self.rx.recv().await
    }

    fn close(&mut self) {
        if self.watcher.take().is_some() {
            debug!("File watcher released");
        }
        self.rx.close();
    }
}

/// Map a raw notify event onto add/change/unlink, dropping ignored paths
/// and directory-level events.
fn translate_event(event: Event, ignore: &IgnoreSet) -> Vec<WatchNotification> {
    let mut out = Vec::new();
    let visible = |path: &Path| !ignore.is_ignored(path, path.is_dir());

    match event.kind {
        EventKind::Create(_) => {
            for path in event.paths.into_iter().filter(|p| !p.is_dir() && visible(p.as_path())) {
                out.push(WatchNotification::Add(path));
            }
        }
        EventKind::Modify(ModifyKind::Name(mode)) => {
            out.extend(translate_rename(mode, event.paths, &visible));
        }
        EventKind::Modify(_) => {
            for path in event.paths.into_iter().filter(|p| p.is_file() && visible(p.as_path())) {
                out.push(WatchNotification::Change(path));
            }
        }
        EventKind::Remove(RemoveKind::Folder) => {}
        EventKind::Remove(_) => {
            for path in event.paths.into_iter().filter(|p| visible(p.as_path())) {
                out.push(WatchNotification::Unlink(path));
            }
        }
        EventKind::Access(_) | EventKind::Any | EventKind::Other => {}
    }

    out
}

fn translate_rename(
    mode: RenameMode,
    paths: Vec<PathBuf>,
    visible: &dyn Fn(&Path) -> bool,
) -> Vec<WatchNotification> {
    let arrived = |path: PathBuf| {
        if path.exists() {
            WatchNotification::Add(path)
        } else {
            WatchNotification::Unlink(path)
        }
    };

    let notifications: Vec<WatchNotification> = match mode {
        RenameMode::From => paths.into_iter().map(WatchNotification::Unlink).collect(),
        RenameMode::To => paths.into_iter().map(WatchNotification::Add).collect(),
        RenameMode::Both => {
            let mut iter = paths.into_iter();
            let mut out = Vec::new();
            if let Some(from) = iter.next() {
                out.push(WatchNotification::Unlink(from));
            }
            out.extend(iter.map(WatchNotification::Add));
            out
        }
        RenameMode::Any | RenameMode::Other => paths.into_iter().map(arrived).collect(),
    };

    notifications
        .into_iter()
        .filter(|n| match n {
            WatchNotification::Add(p) => !p.is_dir() && visible(p.as_path()),
            WatchNotification::Unlink(p) => visible(p.as_path()),
            _ => true,
        })
        .collect()
}
