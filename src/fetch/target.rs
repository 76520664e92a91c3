//! Target resolution

use crate::error::{ConnectorError, Result};
use crate::utils::paths::file_uri;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// The file or directory a `collect()` run works on. Resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    path: PathBuf,
    uri: Url,
    kind: TargetKind,
}

impl Target {
    /// Parse a `file://` URI or a filesystem path and probe it.
    ///
    /// Relative paths resolve against the working directory. The result is
    /// canonicalized, so the target must exist.
    pub fn parse(input: &str) -> Result<Self> {
        let path = if input.starts_with("file:") {
            let url = Url::parse(input).map_err(|e| invalid(input, e.to_string()))?;
            url.to_file_path().map_err(|_| invalid(input, "not a local file URI".to_string()))?
        } else if input.contains("://") {
            return Err(invalid(input, "only file:// URIs are supported".to_string()));
        } else {
            PathBuf::from(input)
        };
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let canonical = path.canonicalize().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConnectorError::TargetNotFound(path.display().to_string())
            } else {
                ConnectorError::io(path, e)
            }
        })?;

        let metadata = canonical.metadata().map_err(|e| ConnectorError::io(&canonical, e))?;
        let kind = if metadata.is_dir() {
            TargetKind::Directory
        } else if metadata.is_file() {
            TargetKind::File
        } else {
            return Err(invalid(
                &path.display().to_string(),
                "neither a file nor a directory".to_string(),
            ));
        };

        let uri = file_uri(&canonical)
            .ok_or_else(|| invalid(&canonical.display().to_string(), "no file URI form".into()))?;

        Ok(Self { path: canonical, uri, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == TargetKind::File
    }

    /// Directory that ignore rules and the watcher are rooted at.
    pub fn root(&self) -> &Path {
        match self.kind {
            TargetKind::Directory => &self.path,
            TargetKind::File => self.path.parent().unwrap_or(&self.path),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri.as_str())
    }
}

fn invalid(target: &str, reason: String) -> ConnectorError {
    ConnectorError::InvalidTarget { target: target.to_string(), reason }
}
