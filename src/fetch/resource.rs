//! Resource loading

use crate::domain::Resource;
use crate::error::{ConnectorError, Result};
use crate::utils::{classify_path, decode_text, media_type_for, uri_string};
use std::path::Path;

/// Load `path` into a [`Resource`].
///
/// `content_override` replaces the file text for text categories. Binary
/// categories always carry an empty `content`; their bytes are never read,
/// only their presence is checked.
pub async fn load_resource(path: &Path, content_override: Option<&str>) -> Result<Resource> {
    let category = classify_path(path);

    let (content, charset) = if category.is_binary() {
        let metadata =
            tokio::fs::metadata(path).await.map_err(|e| ConnectorError::io(path, e))?;
        if !metadata.is_file() {
            return Err(not_a_file(path));
        }
        (String::new(), None)
    } else if let Some(content) = content_override {
        (content.to_string(), Some("utf-8".to_string()))
    } else {
        let bytes = tokio::fs::read(path).await.map_err(|e| ConnectorError::io(path, e))?;
        let (content, charset) = decode_text(&bytes);
        (content, Some(charset))
    };

    Ok(Resource {
        uri: uri_string(path),
        category,
        media_type: media_type_for(path),
        charset,
        content,
    })
}

fn not_a_file(path: &Path) -> ConnectorError {
    ConnectorError::io(
        path,
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
    )
}
