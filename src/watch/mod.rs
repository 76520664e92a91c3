//! Watch mode: live filesystem notifications after the initial scan

pub mod channel;
pub mod notify_source;
pub mod session;
pub mod shutdown;
pub mod source;

pub use channel::{ChannelWatcherFactory, ChannelWatcherHandle};
pub use notify_source::NotifyWatcherFactory;
pub use session::{SessionState, WatchSession};
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
pub use source::{Subscription, WatchNotification, WatchOptions, WatcherFactory, WATCH_ALL};
