//! Content classification by file extension.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Category a fetched file falls into. Drives the `fetch::end::{category}` event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Html,
    Script,
    Image,
    Json,
    Other,
}

impl ContentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Script => "script",
            Self::Image => "image",
            Self::Json => "json",
            Self::Other => "other",
        }
    }

    /// Binary categories never surface their bytes as `content`.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Image)
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension (lowercase, no dot) -> (category, media type)
static EXTENSION_TABLE: Lazy<HashMap<&'static str, (ContentCategory, &'static str)>> =
    Lazy::new(|| {
        use ContentCategory::*;
        HashMap::from([
            ("html", (Html, "text/html")),
            ("htm", (Html, "text/html")),
            ("xhtml", (Html, "application/xhtml+xml")),
            ("js", (Script, "text/javascript")),
            ("mjs", (Script, "text/javascript")),
            ("cjs", (Script, "text/javascript")),
            ("jsx", (Script, "text/javascript")),
            ("ts", (Script, "text/typescript")),
            ("tsx", (Script, "text/typescript")),
            ("png", (Image, "image/png")),
            ("jpg", (Image, "image/jpeg")),
            ("jpeg", (Image, "image/jpeg")),
            ("gif", (Image, "image/gif")),
            ("bmp", (Image, "image/bmp")),
            ("ico", (Image, "image/x-icon")),
            ("webp", (Image, "image/webp")),
            ("avif", (Image, "image/avif")),
            ("tif", (Image, "image/tiff")),
            ("tiff", (Image, "image/tiff")),
            ("svg", (Image, "image/svg+xml")),
            ("json", (Json, "application/json")),
            ("jsonc", (Json, "application/json")),
            ("map", (Json, "application/json")),
        ])
    });

fn lookup(path: &Path) -> Option<(ContentCategory, &'static str)> {
    let ext = path.extension().and_then(|e| e.to_str())?.to_ascii_lowercase();
    EXTENSION_TABLE.get(ext.as_str()).copied()
}

/// Classify a path by its extension. Unknown or missing extensions are `Other`.
pub fn classify_path(path: &Path) -> ContentCategory {
    lookup(path).map(|(category, _)| category).unwrap_or(ContentCategory::Other)
}

/// Representative media type for a path, used in the response envelope.
pub fn media_type_for(path: &Path) -> &'static str {
    lookup(path).map(|(_, media)| media).unwrap_or("text/plain")
}
