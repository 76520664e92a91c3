//! Directory scanner filtered by the root ignore set

use crate::error::Result;
use crate::scan::ignore::IgnoreSet;
use crate::utils::normalize_path;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Walks a directory tree and yields the files that survive the ignore set.
///
/// Only the root `.gitignore` (through [`IgnoreSet`]) and the built-in `.git/`
/// exclusion apply. Hidden files are kept, global and nested git ignore files
/// are not consulted.
pub struct DirectoryScanner {
    root_path: PathBuf,
    ignore: IgnoreSet,
    follow_symlinks: bool,
}

impl DirectoryScanner {
    /// Create a scanner for `root_path` with ignore rules built from that root.
    pub fn new(root_path: PathBuf) -> Self {
        let ignore = IgnoreSet::for_root(&root_path);
        Self { root_path, ignore, follow_symlinks: false }
    }

    /// Create a scanner rooted where `ignore` is rooted.
    pub fn from_ignore(ignore: IgnoreSet) -> Self {
        Self { root_path: ignore.root().to_path_buf(), ignore, follow_symlinks: false }
    }

    /// Set whether to follow symbolic links
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Scan the tree and return absolute file paths.
    ///
    /// Files are returned in deterministic sorted order by relative path.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let ignore = self.ignore.clone();
        let mut builder = WalkBuilder::new(&self.root_path);
        builder
            .standard_filters(false)
            .follow_links(self.follow_symlinks)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !ignore.is_ignored(entry.path(), is_dir)
            });

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry_result in builder.build() {
            let entry = entry_result?;
            // Symlinked directories are not descended into; symlinked files are kept
            let is_file = entry
                .file_type()
                .is_some_and(|t| t.is_file() || (t.is_symlink() && entry.path().is_file()));
            if !is_file {
                continue;
            }

            let path = entry.into_path();
            let rel_path = relative_key(&self.root_path, &path);
            files.push((rel_path, path));
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(root = %self.root_path.display(), files = files.len(), "Directory scan complete");

        Ok(files.into_iter().map(|(_, path)| path).collect())
    }
}

fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_path(&rel.to_string_lossy())
}
