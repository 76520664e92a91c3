//! Lifecycle events and their delivery to the host engine

pub mod bridge;
pub mod jsonl;
pub mod types;

pub use bridge::{EventBridge, EventSink};
pub use jsonl::JsonlSink;
pub use types::{FetchEndPayload, LifecycleEvent, ScanPayload};
