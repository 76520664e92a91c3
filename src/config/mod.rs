//! Configuration loading
//!
//! Settings come from an explicit or auto-discovered config file; CLI flags
//! override them (CLI > File > Defaults).

pub mod loader;

pub use crate::domain::ConnectorConfig;
pub use loader::load_config;
