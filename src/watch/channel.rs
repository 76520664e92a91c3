//! Channel-fed watcher for hosts that already run their own file watcher.

use crate::error::WatchError;
use crate::watch::source::{Subscription, WatchNotification, WatchOptions, WatcherFactory};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

#[derive(Default)]
struct Shared {
    receiver: Option<mpsc::UnboundedReceiver<WatchNotification>>,
    calls: Vec<(String, WatchOptions)>,
    closes: usize,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Factory whose single subscription yields whatever the paired
/// [`ChannelWatcherHandle`] sends.
pub struct ChannelWatcherFactory {
    shared: Arc<Mutex<Shared>>,
}

/// Host side of a [`ChannelWatcherFactory`].
#[derive(Clone)]
pub struct ChannelWatcherHandle {
    tx: mpsc::UnboundedSender<WatchNotification>,
    shared: Arc<Mutex<Shared>>,
}

impl ChannelWatcherFactory {
    pub fn new() -> (Self, ChannelWatcherHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(Shared { receiver: Some(rx), ..Default::default() }));
        (Self { shared: shared.clone() }, ChannelWatcherHandle { tx, shared })
    }
}

impl WatcherFactory for ChannelWatcherFactory {
    fn watch(
        &self,
        pattern: &str,
        options: WatchOptions,
    ) -> Result<Box<dyn Subscription>, WatchError> {
        let mut shared = lock(&self.shared);
        shared.calls.push((pattern.to_string(), options));
        let rx = shared
            .receiver
            .take()
            .ok_or_else(|| WatchError::from("channel watcher already subscribed"))?;

        Ok(Box::new(ChannelSubscription { rx, shared: self.shared.clone(), closed: false }))
    }
}

impl ChannelWatcherHandle {
    /// Queue a notification. Returns `false` once the subscription is closed.
    pub fn send(&self, notification: WatchNotification) -> bool {
        self.tx.send(notification).is_ok()
    }

    /// Every `(pattern, options)` the factory was asked to watch.
    pub fn calls(&self) -> Vec<(String, WatchOptions)> {
        lock(&self.shared).calls.clone()
    }

    /// How many times a subscription was closed.
    pub fn close_count(&self) -> usize {
        lock(&self.shared).closes
    }
}

struct ChannelSubscription {
    rx: mpsc::UnboundedReceiver<WatchNotification>,
    shared: Arc<Mutex<Shared>>,
    closed: bool,
}

#[async_trait]
impl Subscription for ChannelSubscription {
    async fn next(&mut self) -> Option<WatchNotification> {
        if self.closed {
            return None;
        }
        self.rx.recv().await
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.rx.close();
        lock(&self.shared).closes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn options() -> WatchOptions {
        WatchOptions { cwd: PathBuf::from("/site"), ignored: vec![".git/".to_string()] }
    }

    #[tokio::test]
    async fn test_notifications_flow_in_order() {
        let (factory, handle) = ChannelWatcherFactory::new();
        let mut sub = factory.watch(".", options()).unwrap();

        assert!(handle.send(WatchNotification::Ready));
        assert!(handle.send(WatchNotification::Unlink(PathBuf::from("a.js"))));

        assert_eq!(sub.next().await.map(|n| n.kind()), Some("ready"));
        assert_eq!(sub.next().await.map(|n| n.kind()), Some("unlink"));
        assert_eq!(handle.calls(), vec![(".".to_string(), options())]);
    }

    #[tokio::test]
    async fn test_close_counts_once_and_stops_stream() {
        let (factory, handle) = ChannelWatcherFactory::new();
        let mut sub = factory.watch(".", options()).unwrap();

        sub.close();
        sub.close();

        assert_eq!(handle.close_count(), 1);
        assert!(!handle.send(WatchNotification::Ready));
        assert!(sub.next().await.is_none());
    }

    #[test]
    fn test_second_subscription_rejected() {
        let (factory, _handle) = ChannelWatcherFactory::new();
        let _first = factory.watch(".", options()).unwrap();
        assert!(factory.watch(".", options()).is_err());
    }
}
