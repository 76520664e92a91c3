//! JSON Lines event output

use crate::events::bridge::EventSink;
use crate::events::types::LifecycleEvent;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;

/// Render one event as a single JSON line (without the trailing newline).
pub fn render_event(event: &LifecycleEvent) -> serde_json::Result<String> {
    // BTreeMap keeps "event" before "payload"
    let mut entry: BTreeMap<&str, Value> = BTreeMap::new();
    entry.insert("event", Value::String(event.name()));
    entry.insert("payload", event.payload_json()?);
    serde_json::to_string(&entry)
}

/// Sink that writes every event as a JSON line and flushes immediately.
pub struct JsonlSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> EventSink for JsonlSink<W> {
    async fn emit(&self, event: LifecycleEvent) -> anyhow::Result<()> {
        let line = render_event(&event)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("event writer lock poisoned"))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}
