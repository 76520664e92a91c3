//! local-connector: a filesystem scan/watch connector
//!
//! Turns a file or directory into a stream of `scan::*` and `fetch::*`
//! lifecycle events for a rule engine, and in watch mode keeps reporting
//! changes until told to stop.

pub mod cli;
pub mod config;
pub mod connector;
pub mod domain;
pub mod error;
pub mod events;
pub mod fetch;
pub mod scan;
pub mod utils;
pub mod watch;

pub use connector::LocalConnector;
pub use domain::{CollectOptions, ConnectorConfig, ContentCategory, Resource};
pub use error::{ConnectorError, Result, WatchError};
pub use fetch::Target;
