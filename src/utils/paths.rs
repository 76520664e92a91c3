//! Path normalization and file URI conversion

use std::path::{Path, PathBuf};
use url::Url;

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// `file://` URI for an absolute path. Relative paths have no URI form.
pub fn file_uri(path: &Path) -> Option<Url> {
    Url::from_file_path(path).ok()
}

/// Same as [`file_uri`] but falls back to the plain path text.
pub fn uri_string(path: &Path) -> String {
    file_uri(path)
        .map(String::from)
        .unwrap_or_else(|| normalize_path(&path.to_string_lossy()))
}

/// Resolve a watcher-reported path against the watch root.
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
