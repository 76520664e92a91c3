//! Directory scanning with root `.gitignore` support

pub mod ignore;
pub mod scanner;

pub use self::ignore::{build_ignore_patterns, IgnoreSet, DEFAULT_IGNORE};
pub use scanner::DirectoryScanner;
