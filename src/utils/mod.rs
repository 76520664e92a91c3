//! Shared helpers: classification, decoding, paths

pub mod classify;
pub mod encoding;
pub mod paths;

pub use classify::{classify_path, media_type_for, ContentCategory};
pub use encoding::decode_text;
pub use paths::{normalize_path, resolve_against, uri_string};
