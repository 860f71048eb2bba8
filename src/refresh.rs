//! Auto-Refresh Timer
//!
//! Every interval, fires the `refresh` trigger on each page element that is
//! marked `data-auto-refresh` and declares an `hx-get` fetch. What the
//! trigger does is up to the `RefreshTrigger` implementation; a failed
//! trigger is logged and the timer keeps going.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior};

use crate::page::{PageDocument, PageElement, REFRESH_EVENT};

/// Default refresh interval in seconds
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Dispatches a named trigger on a page element
#[async_trait]
pub trait RefreshTrigger: Send + Sync {
    async fn trigger(
        &self,
        element: &PageElement,
        event: &str,
    ) -> Result<TriggerOutcome, TriggerError>;
}

/// What happened to a trigger that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The element's request was dispatched
    Dispatched,
    /// The element does not listen for the event
    Ignored,
}

/// Errors a trigger can report
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("Element {0} has no hx-get attribute")]
    MissingFetch(String),

    #[error("Invalid URL {url}: {error}")]
    InvalidUrl { url: String, error: String },

    #[error("Request to {url} failed: {error}")]
    Transport { url: String, error: String },

    #[error("Trigger rejected: {0}")]
    Rejected(String),
}

/// Counters for the refresh timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    pub ticks: u64,
    pub triggered: u64,
    pub ignored: u64,
    pub failed: u64,
}

/// Periodically triggers refresh on eligible elements
pub struct AutoRefresher {
    document: Arc<RwLock<PageDocument>>,
    trigger: Arc<dyn RefreshTrigger>,
    interval: Duration,
    running: AtomicBool,
    ticks: AtomicU64,
    triggered: AtomicU64,
    ignored: AtomicU64,
    failed: AtomicU64,
}

impl AutoRefresher {
    /// Create a refresher; `interval` must be non-zero
    pub fn new(
        document: Arc<RwLock<PageDocument>>,
        trigger: Arc<dyn RefreshTrigger>,
        interval: Duration,
    ) -> Self {
        Self {
            document,
            trigger,
            interval,
            running: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            triggered: AtomicU64::new(0),
            ignored: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Scan the document once and trigger every eligible element
    ///
    /// Returns the number of elements whose request was dispatched.
    pub async fn refresh_once(&self) -> usize {
        self.ticks.fetch_add(1, Ordering::Relaxed);

        // Snapshot so the document lock is not held across trigger calls.
        let targets = self.document.read().await.refresh_targets();
        if targets.is_empty() {
            tracing::trace!("No auto-refresh elements on page");
            return 0;
        }

        let mut succeeded = 0;
        for element in &targets {
            match self.trigger.trigger(element, REFRESH_EVENT).await {
                Ok(TriggerOutcome::Dispatched) => {
                    succeeded += 1;
                    self.triggered.fetch_add(1, Ordering::Relaxed);
                }
                Ok(TriggerOutcome::Ignored) => {
                    self.ignored.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    self.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(element = %element.id, "Refresh trigger failed: {}", e);
                }
            }
        }

        tracing::debug!(
            triggered = succeeded,
            eligible = targets.len(),
            "Auto-refresh tick"
        );
        succeeded
    }

    /// Start the timer task
    ///
    /// The first tick happens one full interval after this call. The
    /// interval is armed before the task is spawned so the schedule does not
    /// depend on when the task is first polled.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Auto-refresh started"
        );

        tokio::spawn(async move {
            loop {
                ticker.tick().await;

                if !self.is_running() {
                    break;
                }

                self.refresh_once().await;
            }
        })
    }

    /// Stop the timer; takes effect at the next tick
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            tracing::info!("Auto-refresh stopped");
        }
    }

    pub fn stats(&self) -> RefreshStats {
        RefreshStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            triggered: self.triggered.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every trigger; fails for ids in `failing`, ignores ids in `deaf`
    #[derive(Default)]
    pub struct RecordingTrigger {
        pub calls: Mutex<Vec<(String, String)>>,
        pub failing: Vec<String>,
        pub deaf: Vec<String>,
    }

    impl RecordingTrigger {
        pub fn failing(ids: &[&str]) -> Self {
            Self {
                failing: ids.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn ignoring(ids: &[&str]) -> Self {
            Self {
                deaf: ids.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn ids(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
        }

        pub fn count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RefreshTrigger for RecordingTrigger {
        async fn trigger(
            &self,
            element: &PageElement,
            event: &str,
        ) -> Result<TriggerOutcome, TriggerError> {
            self.calls
                .lock()
                .unwrap()
                .push((element.id.clone(), event.to_string()));

            if self.failing.contains(&element.id) {
                Err(TriggerError::Rejected(element.id.clone()))
            } else if self.deaf.contains(&element.id) {
                Ok(TriggerOutcome::Ignored)
            } else {
                Ok(TriggerOutcome::Dispatched)
            }
        }
    }
}
