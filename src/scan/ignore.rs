//! Ignore rules: root `.gitignore` entries plus the built-in `.git/` exclusion.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Pattern that is always excluded, appended after any `.gitignore` entries.
pub const DEFAULT_IGNORE: &str = ".git/";

const GITIGNORE_FILE: &str = ".gitignore";

/// Build the ordered ignore patterns for a scan root.
///
/// Non-blank, non-comment lines of `<root>/.gitignore` come first in file order,
/// then [`DEFAULT_IGNORE`]. Subdirectory `.gitignore` files are not consulted.
/// An unreadable `.gitignore` degrades to the default pattern alone.
pub fn build_ignore_patterns(root: &Path) -> Vec<String> {
    let gitignore = root.join(GITIGNORE_FILE);
    let mut patterns = Vec::new();

    if gitignore.is_file() {
        match fs::read_to_string(&gitignore) {
            Ok(content) => patterns.extend(parse_gitignore(&content)),
            Err(e) => {
                warn!(path = %gitignore.display(), error = %e, "Ignoring unreadable .gitignore");
            }
        }
    }

    patterns.push(DEFAULT_IGNORE.to_string());
    patterns
}

fn parse_gitignore(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

/// Compiled ignore patterns, matched relative to a root.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    root: PathBuf,
    patterns: Vec<String>,
    matcher: Gitignore,
}

impl IgnoreSet {
    /// Build patterns for `root` and compile them.
    pub fn for_root(root: &Path) -> Self {
        Self::from_patterns(root, build_ignore_patterns(root))
    }

    /// Compile an explicit pattern list. Patterns that fail to parse are skipped.
    pub fn from_patterns(root: &Path, patterns: Vec<String>) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in &patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                warn!(pattern = %pattern, error = %e, "Skipping invalid ignore pattern");
            }
        }
        let matcher = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to compile ignore patterns");
            Gitignore::empty()
        });

        Self { root: root.to_path_buf(), patterns, matcher }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Patterns in the order they were built.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `path` (absolute under the root, or root-relative) is excluded,
    /// either directly or through an excluded parent directory.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if relative.as_os_str().is_empty() || relative.is_absolute() {
            return false;
        }
        self.matcher.matched_path_or_any_parents(relative, is_dir).is_ignore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_only_without_gitignore() {
        let tmp = TempDir::new().unwrap();
        let patterns = build_ignore_patterns(tmp.path());
        assert_eq!(patterns, vec![".git/".to_string()]);
    }

    #[test]
    fn test_gitignore_entries_precede_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "# build output\nignore.html\n\n  dist/  \n")
            .unwrap();

        let patterns = build_ignore_patterns(tmp.path());
        assert_eq!(patterns, vec!["ignore.html", "dist/", ".git/"]);
    }

    #[test]
    fn test_gitignore_directory_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".gitignore")).unwrap();

        let patterns = build_ignore_patterns(tmp.path());
        assert_eq!(patterns, vec![".git/".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_gitignore_degrades_to_default() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let gitignore = tmp.path().join(".gitignore");
        fs::write(&gitignore, "ignore.html\n").unwrap();
        fs::set_permissions(&gitignore, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root
        if fs::read_to_string(&gitignore).is_ok() {
            return;
        }

        let patterns = build_ignore_patterns(tmp.path());
        assert_eq!(patterns, vec![".git/".to_string()]);
    }

    #[test]
    fn test_nested_gitignore_is_not_consulted() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/.gitignore"), "*.js\n").unwrap();

        let set = IgnoreSet::for_root(tmp.path());
        assert_eq!(set.patterns().len(), 1);
        assert!(!set.is_ignored(&tmp.path().join("sub/app.js"), false));
    }

    #[test]
    fn test_git_dir_and_contents_ignored() {
        let tmp = TempDir::new().unwrap();
        let set = IgnoreSet::for_root(tmp.path());

        assert!(set.is_ignored(&tmp.path().join(".git"), true));
        assert!(set.is_ignored(&tmp.path().join(".git/config"), false));
        assert!(set.is_ignored(Path::new(".git/HEAD"), false));
        assert!(!set.is_ignored(&tmp.path().join("index.html"), false));
        assert!(!set.is_ignored(&tmp.path().join(".gitignore"), false));
    }

    #[test]
    fn test_gitignore_patterns_match() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "ignore.html\nbuild/\n*.log\n").unwrap();
        let set = IgnoreSet::for_root(tmp.path());

        assert!(set.is_ignored(&tmp.path().join("ignore.html"), false));
        assert!(set.is_ignored(&tmp.path().join("build/out.js"), false));
        assert!(set.is_ignored(&tmp.path().join("nested/debug.log"), false));
        assert!(!set.is_ignored(&tmp.path().join("keep.html"), false));
    }

    #[test]
    fn test_root_itself_never_ignored() {
        let tmp = TempDir::new().unwrap();
        let set = IgnoreSet::for_root(tmp.path());
        assert!(!set.is_ignored(tmp.path(), true));
    }
}
