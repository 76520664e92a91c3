//! The single path from the connector to the host engine.

use crate::domain::Resource;
use crate::error::{ConnectorError, Result};
use crate::events::types::{FetchStartPayload, LifecycleEvent, ScanPayload};
use crate::fetch::Target;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Host-side consumer of lifecycle events.
///
/// `emit` may do async work of its own. The connector does not move on until it
/// returns, and an `Err` aborts the run.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: LifecycleEvent) -> anyhow::Result<()>;
}

/// Builds events for one collect run and awaits each delivery in turn.
#[derive(Clone)]
pub struct EventBridge {
    sink: Arc<dyn EventSink>,
    target_uri: String,
}

impl EventBridge {
    pub fn new(sink: Arc<dyn EventSink>, target: &Target) -> Self {
        Self { sink, target_uri: target.uri().to_string() }
    }

    /// Deliver one event. Ownership passes to the sink.
    pub async fn emit(&self, event: LifecycleEvent) -> Result<()> {
        let name = event.name();
        debug!(event = %name, "Emitting event");
        self.sink.emit(event).await.map_err(|source| ConnectorError::Emit { event: name, source })
    }

    pub async fn scan_start(&self) -> Result<()> {
        self.emit(LifecycleEvent::ScanStart(self.scan_payload())).await
    }

    pub async fn fetch_start_target(&self) -> Result<()> {
        let payload = FetchStartPayload { resource: self.target_uri.clone() };
        self.emit(LifecycleEvent::FetchStartTarget(payload)).await
    }

    pub async fn fetch_end(&self, resource: Resource) -> Result<()> {
        self.emit(LifecycleEvent::FetchEnd(resource.into())).await
    }

    pub async fn scan_end(&self) -> Result<()> {
        self.emit(LifecycleEvent::ScanEnd(self.scan_payload())).await
    }

    fn scan_payload(&self) -> ScanPayload {
        ScanPayload { resource: self.target_uri.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        names: Mutex<Vec<String>>,
        reject: Option<&'static str>,
    }

    #[async_trait]
    impl EventSink for Recorder {
        async fn emit(&self, event: LifecycleEvent) -> anyhow::Result<()> {
            let name = event.name();
            if self.reject == Some(name.as_str()) {
                anyhow::bail!("engine refused {name}");
            }
            self.names.lock().unwrap().push(name);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_scan_events_carry_target_uri() {
        let tmp = TempDir::new().unwrap();
        let target = Target::from_path(tmp.path()).unwrap();
        let recorder = Arc::new(Recorder::default());
        let bridge = EventBridge::new(recorder.clone(), &target);

        bridge.scan_start().await.unwrap();
        bridge.scan_end().await.unwrap();

        assert_eq!(*recorder.names.lock().unwrap(), vec!["scan::start", "scan::end"]);
        assert_eq!(bridge.scan_payload().resource, target.uri().as_str());
    }

    #[tokio::test]
    async fn test_sink_rejection_names_event() {
        let tmp = TempDir::new().unwrap();
        let target = Target::from_path(tmp.path()).unwrap();
        let recorder = Arc::new(Recorder { reject: Some("scan::start"), ..Default::default() });
        let bridge = EventBridge::new(recorder.clone(), &target);

        let err = bridge.scan_start().await.unwrap_err();
        match err {
            ConnectorError::Emit { event, source } => {
                assert_eq!(event, "scan::start");
                assert!(source.to_string().contains("engine refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(recorder.names.lock().unwrap().is_empty());
    }
}
