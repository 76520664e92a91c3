//! Lifecycle event vocabulary and payload shapes

use crate::domain::{ContentCategory, Resource};
use serde::Serialize;
use serde_json::Value;

pub const SCAN_START: &str = "scan::start";
pub const SCAN_END: &str = "scan::end";
pub const FETCH_START_TARGET: &str = "fetch::start::target";
pub const FETCH_END_PREFIX: &str = "fetch::end::";

/// Payload of `scan::start` and `scan::end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanPayload {
    /// URI of the collect target
    pub resource: String,
}

/// Payload of `fetch::start::target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchStartPayload {
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Body {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub body: Body,
    pub charset: Option<String>,
    pub media_type: String,
    pub status_code: u16,
    pub url: String,
}

/// Payload of `fetch::end::{category}`: the resource wrapped in a response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchEndPayload {
    pub resource: String,
    pub category: ContentCategory,
    pub request: Request,
    pub response: Response,
}

impl From<Resource> for FetchEndPayload {
    fn from(resource: Resource) -> Self {
        Self {
            resource: resource.uri.clone(),
            category: resource.category,
            request: Request { url: resource.uri.clone() },
            response: Response {
                body: Body { content: resource.content },
                charset: resource.charset,
                media_type: resource.media_type.to_string(),
                status_code: 200,
                url: resource.uri,
            },
        }
    }
}

/// A single notification delivered to the host engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    ScanStart(ScanPayload),
    FetchStartTarget(FetchStartPayload),
    FetchEnd(FetchEndPayload),
    ScanEnd(ScanPayload),
}

impl LifecycleEvent {
    /// Wire name, e.g. `fetch::end::html`.
    pub fn name(&self) -> String {
        match self {
            Self::ScanStart(_) => SCAN_START.to_string(),
            Self::FetchStartTarget(_) => FETCH_START_TARGET.to_string(),
            Self::FetchEnd(payload) => format!("{FETCH_END_PREFIX}{}", payload.category),
            Self::ScanEnd(_) => SCAN_END.to_string(),
        }
    }

    pub fn fetch_end(&self) -> Option<&FetchEndPayload> {
        match self {
            Self::FetchEnd(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn payload_json(&self) -> serde_json::Result<Value> {
        match self {
            Self::ScanStart(p) | Self::ScanEnd(p) => serde_json::to_value(p),
            Self::FetchStartTarget(p) => serde_json::to_value(p),
            Self::FetchEnd(p) => serde_json::to_value(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(category: ContentCategory, content: &str) -> Resource {
        Resource {
            uri: "file:///site/index.html".to_string(),
            category,
            media_type: "text/html",
            charset: Some("utf-8".to_string()),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_event_names() {
        let scan = ScanPayload { resource: "file:///site".to_string() };
        assert_eq!(LifecycleEvent::ScanStart(scan.clone()).name(), "scan::start");
        assert_eq!(LifecycleEvent::ScanEnd(scan).name(), "scan::end");
        assert_eq!(
            LifecycleEvent::FetchStartTarget(FetchStartPayload {
                resource: "file:///site/a.js".to_string()
            })
            .name(),
            "fetch::start::target"
        );

        for (category, name) in [
            (ContentCategory::Html, "fetch::end::html"),
            (ContentCategory::Script, "fetch::end::script"),
            (ContentCategory::Image, "fetch::end::image"),
            (ContentCategory::Json, "fetch::end::json"),
            (ContentCategory::Other, "fetch::end::other"),
        ] {
            let event = LifecycleEvent::FetchEnd(resource(category, "").into());
            assert_eq!(event.name(), name);
        }
    }

    #[test]
    fn test_fetch_end_payload_shape() {
        let event = LifecycleEvent::FetchEnd(resource(ContentCategory::Html, "<p>hi</p>").into());
        let value = event.payload_json().unwrap();

        similar_asserts::assert_eq!(
            value,
            json!({
                "resource": "file:///site/index.html",
                "category": "html",
                "request": { "url": "file:///site/index.html" },
                "response": {
                    "body": { "content": "<p>hi</p>" },
                    "charset": "utf-8",
                    "mediaType": "text/html",
                    "statusCode": 200,
                    "url": "file:///site/index.html"
                }
            })
        );
    }
}
