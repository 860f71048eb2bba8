//! Request Lifecycle Logger
//!
//! Writes one diagnostic line when an HTMX request starts and one when it
//! completes. Observing never touches the request itself.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::events::{EventKind, PageEvent};

/// Label of the line logged before a request is sent
pub const REQUEST_STARTING: &str = "HTMX request starting";

/// Label of the line logged after a request completes
pub const REQUEST_COMPLETED: &str = "HTMX request completed";

/// A line written by the lifecycle logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleLine {
    Starting { url: String },
    Completed { status: u16 },
}

impl fmt::Display for LifecycleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleLine::Starting { url } => write!(f, "{}: {}", REQUEST_STARTING, url),
            LifecycleLine::Completed { status } => write!(f, "{}: {}", REQUEST_COMPLETED, status),
        }
    }
}

/// Logs HTMX request start and completion
#[derive(Debug, Default)]
pub struct LifecycleLogger {
    lines: AtomicU64,
}

impl LifecycleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the line for `event`, if it is a request lifecycle event
    ///
    /// Returns the line that was written; `None` for any other event.
    pub fn observe(&self, event: &PageEvent) -> Option<LifecycleLine> {
        let line = match event.kind() {
            EventKind::BeforeRequest => LifecycleLine::Starting {
                url: event.request_url().to_string(),
            },
            EventKind::AfterRequest => LifecycleLine::Completed {
                status: event.status(),
            },
            EventKind::PageReady | EventKind::Other => return None,
        };

        tracing::info!(
            target: "htmx",
            element = event.target.as_deref().unwrap_or(""),
            request_id = event.request_id().unwrap_or(""),
            "{}",
            line
        );
        self.lines.fetch_add(1, Ordering::Relaxed);

        Some(line)
    }

    /// Total lines written so far
    pub fn lines_logged(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::events::{RequestDetail, XhrInfo};

    #[test]
    fn test_start_and_completion_lines() {
        let logger = LifecycleLogger::new();
        let started = PageEvent::named("htmx:beforeRequest").with_detail(RequestDetail {
            xhr: XhrInfo {
                response_url: "http://localhost:8080/api/current-price".to_string(),
                status: 0,
            },
            ..RequestDetail::default()
        });
        let done = PageEvent::after_request(&started, "http://localhost:8080/api/current-price", 200);

        let line = logger.observe(&started).unwrap();
        assert_eq!(
            line.to_string(),
            "HTMX request starting: http://localhost:8080/api/current-price"
        );

        let line = logger.observe(&done).unwrap();
        assert_eq!(line, LifecycleLine::Completed { status: 200 });
        assert_eq!(line.to_string(), "HTMX request completed: 200");

        assert_eq!(logger.lines_logged(), 2);
    }

    #[test]
    fn test_one_line_per_event() {
        let logger = LifecycleLogger::new();
        let mut emitted = Vec::new();

        for i in 0..3 {
            let started = PageEvent::before_request("summary", format!("/api/page/{}", i));
            emitted.extend(logger.observe(&started));
            emitted.extend(logger.observe(&PageEvent::after_request(&started, "", 200)));
        }

        assert_eq!(emitted.len(), 6);
        assert_eq!(logger.lines_logged(), 6);
        assert_eq!(
            emitted.iter().filter(|l| matches!(l, LifecycleLine::Starting { .. })).count(),
            3
        );
    }

    #[test]
    fn test_unrelated_events_are_silent() {
        let logger = LifecycleLogger::new();
        let started = PageEvent::before_request("summary", "/api/price-summary");

        for event in [
            PageEvent::dom_content_loaded(),
            PageEvent::named("htmx:load"),
            PageEvent::named("htmx:beforeSwap"),
            PageEvent::named("refresh").on("summary"),
            PageEvent::send_error(&started),
        ] {
            assert!(logger.observe(&event).is_none());
        }
        assert_eq!(logger.lines_logged(), 0);
    }

    #[test]
    fn test_missing_detail_does_not_fail() {
        let logger = LifecycleLogger::new();
        let line = logger.observe(&PageEvent::named("htmx:afterRequest")).unwrap();
        assert_eq!(line.to_string(), "HTMX request completed: 0");

        let line = logger.observe(&PageEvent::named("htmx:beforeRequest")).unwrap();
        assert_eq!(line.to_string(), "HTMX request starting: ");
    }
}
