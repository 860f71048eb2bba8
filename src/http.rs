//! HTTP Refresh Trigger
//!
//! Performs the element's `hx-get` fetch when it is triggered, the way HTMX
//! would in a browser, and publishes the request lifecycle events for it.
//! The fetch runs in its own task: triggering returns as soon as the request
//! is dispatched, and fetch failures surface only as `htmx:sendError`.

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;

use crate::page::{EventBus, PageElement, PageEvent};
use crate::refresh::{RefreshTrigger, TriggerError, TriggerOutcome};

/// Re-issues `hx-get` requests against the dashboard server
#[derive(Clone)]
pub struct HttpTrigger {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    base_url: Url,
    events: EventBus,
}

impl HttpTrigger {
    /// Create a trigger resolving paths against `base_url`
    pub fn new(base_url: &str, timeout: Duration, events: EventBus) -> Result<Self, TriggerError> {
        let base_url = Url::parse(base_url).map_err(|e| TriggerError::InvalidUrl {
            url: base_url.to_string(),
            error: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("elpris-page/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TriggerError::Transport {
                url: base_url.to_string(),
                error: e.to_string(),
            })?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url,
                events,
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an `hx-get` path against the base URL
    pub fn resolve(&self, path: &str) -> Result<Url, TriggerError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| TriggerError::InvalidUrl {
                url: path.to_string(),
                error: e.to_string(),
            })
    }

    /// Fetch the element's `hx-get` URL, publishing lifecycle events
    ///
    /// Returns the HTTP status. Non-success statuses are not errors.
    pub async fn fetch(&self, element: &PageElement) -> Result<u16, TriggerError> {
        let path = element
            .fetch_path()
            .ok_or_else(|| TriggerError::MissingFetch(element.id.clone()))?;
        let url = self.resolve(path)?;
        self.fetch_url(element, url).await
    }

    async fn fetch_url(&self, element: &PageElement, url: Url) -> Result<u16, TriggerError> {
        let started = PageEvent::before_request(element.id.clone(), url.to_string());
        self.inner.events.publish(started.clone());

        match self.inner.client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let response_url = response.url().to_string();
                // Drain the body so the request is complete before reporting it.
                if let Err(e) = response.bytes().await {
                    tracing::debug!(element = %element.id, "Failed to read response body: {}", e);
                }
                self.inner
                    .events
                    .publish(PageEvent::after_request(&started, response_url, status));
                Ok(status)
            }
            Err(e) => {
                self.inner.events.publish(PageEvent::send_error(&started));
                Err(TriggerError::Transport {
                    url: url.to_string(),
                    error: e.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl RefreshTrigger for HttpTrigger {
    async fn trigger(
        &self,
        element: &PageElement,
        event: &str,
    ) -> Result<TriggerOutcome, TriggerError> {
        if !element.listens_for(event) {
            tracing::debug!(element = %element.id, event, "Element does not listen for event");
            return Ok(TriggerOutcome::Ignored);
        }

        let path = element
            .fetch_path()
            .ok_or_else(|| TriggerError::MissingFetch(element.id.clone()))?;
        let url = self.resolve(path)?;

        let this = self.clone();
        let element = element.clone();
        tokio::spawn(async move {
            if let Err(e) = this.fetch_url(&element, url).await {
                tracing::warn!(element = %element.id, "Refresh fetch failed: {}", e);
            }
        });

        Ok(TriggerOutcome::Dispatched)
    }
}
