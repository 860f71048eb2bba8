//! Page Events
//!
//! Events flowing through the page: HTMX request lifecycle events, the
//! page-ready event, and anything else a caller dispatches. The JSON shape
//! mirrors what a browser listener sees on `event.type` / `event.detail`,
//! so events captured in a browser can be replayed here verbatim.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fired by HTMX before a request is sent
pub const BEFORE_REQUEST: &str = "htmx:beforeRequest";

/// Fired by HTMX after a request completes, successful or not
pub const AFTER_REQUEST: &str = "htmx:afterRequest";

/// Fired by HTMX when a request could not be sent
pub const SEND_ERROR: &str = "htmx:sendError";

/// Fired once when the page is ready
pub const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";

/// Classification of an event by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    BeforeRequest,
    AfterRequest,
    PageReady,
    Other,
}

/// A named event dispatched on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEvent {
    /// Event name, e.g. `htmx:afterRequest`
    #[serde(rename = "type")]
    pub name: String,

    /// Id of the element the event was dispatched on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Request details for HTMX request events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<RequestDetail>,
}

/// Request details carried by HTMX request events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetail {
    #[serde(default)]
    pub xhr: XhrInfo,

    /// Request path as written in the triggering attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Correlates the start and completion of one request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// The subset of the request object that listeners read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XhrInfo {
    #[serde(rename = "responseURL", default)]
    pub response_url: String,

    /// HTTP status, 0 while unsent or on transport failure
    #[serde(default)]
    pub status: u16,
}

impl PageEvent {
    /// An event with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            detail: None,
        }
    }

    pub fn dom_content_loaded() -> Self {
        Self::named(DOM_CONTENT_LOADED)
    }

    /// Start of a request to `url`, with a fresh request id
    pub fn before_request(target: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: BEFORE_REQUEST.to_string(),
            target: Some(target.into()),
            detail: Some(RequestDetail {
                xhr: XhrInfo::default(),
                path: Some(url),
                request_id: Some(Uuid::new_v4().to_string()),
            }),
        }
    }

    /// Completion of the request started by `started`
    pub fn after_request(started: &PageEvent, response_url: impl Into<String>, status: u16) -> Self {
        Self::follow_up(AFTER_REQUEST, started, response_url.into(), status)
    }

    /// Transport failure of the request started by `started`
    pub fn send_error(started: &PageEvent) -> Self {
        Self::follow_up(SEND_ERROR, started, String::new(), 0)
    }

    fn follow_up(name: &str, started: &PageEvent, response_url: String, status: u16) -> Self {
        let detail = started.detail.clone().unwrap_or_default();
        Self {
            name: name.to_string(),
            target: started.target.clone(),
            detail: Some(RequestDetail {
                xhr: XhrInfo {
                    response_url,
                    status,
                },
                ..detail
            }),
        }
    }

    /// Builder method: set the target element
    pub fn on(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Builder method: set the request detail
    pub fn with_detail(mut self, detail: RequestDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn kind(&self) -> EventKind {
        match self.name.as_str() {
            BEFORE_REQUEST => EventKind::BeforeRequest,
            AFTER_REQUEST => EventKind::AfterRequest,
            DOM_CONTENT_LOADED => EventKind::PageReady,
            _ => EventKind::Other,
        }
    }

    /// The request URL: the response URL when known, else the request path
    pub fn request_url(&self) -> &str {
        match &self.detail {
            Some(detail) if !detail.xhr.response_url.is_empty() => &detail.xhr.response_url,
            Some(detail) => detail.path.as_deref().unwrap_or(""),
            None => "",
        }
    }

    /// HTTP status of the request, 0 when absent
    pub fn status(&self) -> u16 {
        self.detail.as_ref().map(|d| d.xhr.status).unwrap_or(0)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.request_id.as_deref())
    }

    /// Parse an event from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browser_event() {
        let json = r#"{
            "type": "htmx:afterRequest",
            "target": "current-price",
            "detail": {
                "xhr": {"responseURL": "http://localhost:8080/api/current-price", "status": 200},
                "path": "/api/current-price"
            }
        }"#;

        let event = PageEvent::from_json(json).unwrap();
        assert_eq!(event.kind(), EventKind::AfterRequest);
        assert_eq!(event.target.as_deref(), Some("current-price"));
        assert_eq!(event.request_url(), "http://localhost:8080/api/current-price");
        assert_eq!(event.status(), 200);
    }

    #[test]
    fn test_parse_minimal_event() {
        let event = PageEvent::from_json(r#"{"type": "DOMContentLoaded"}"#).unwrap();
        assert_eq!(event.kind(), EventKind::PageReady);
        assert_eq!(event.request_url(), "");
        assert_eq!(event.status(), 0);

        assert!(PageEvent::from_json(r#"{"detail": {}}"#).is_err());
    }

    #[test]
    fn test_request_url_falls_back_to_path() {
        let event = PageEvent::before_request("summary", "/api/price-summary");
        assert_eq!(event.kind(), EventKind::BeforeRequest);
        assert_eq!(event.request_url(), "/api/price-summary");
        assert!(event.request_id().is_some());
    }

    #[test]
    fn test_follow_up_keeps_request_id() {
        let started = PageEvent::before_request("summary", "/api/price-summary");
        let done = PageEvent::after_request(&started, "http://host/api/price-summary", 503);

        assert_eq!(done.kind(), EventKind::AfterRequest);
        assert_eq!(done.request_id(), started.request_id());
        assert_eq!(done.target, started.target);
        assert_eq!(done.status(), 503);

        let failed = PageEvent::send_error(&started);
        assert_eq!(failed.kind(), EventKind::Other);
        assert_eq!(failed.status(), 0);
    }

    #[test]
    fn test_serialize_uses_browser_names() {
        let event = PageEvent::named("htmx:load").on("chart");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "htmx:load");
        assert_eq!(json["target"], "chart");
        assert!(json.get("detail").is_none());
    }
}
