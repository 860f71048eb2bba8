//! Page Controller
//!
//! Owns everything that lives for the lifetime of the page: the event
//! listener feeding the lifecycle logger and the auto-refresh timer armed
//! on page-ready. Constructed once at startup; `shutdown` tears both down.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::error::{PageError, PageResult};
use crate::page::{EventBus, EventKind, LifecycleLogger, PageDocument, PageEvent};
use crate::refresh::{AutoRefresher, RefreshStats, RefreshTrigger};

/// Snapshot of controller activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    pub listening: bool,
    pub timer_armed: bool,
    pub lines_logged: u64,
    #[serde(flatten)]
    pub refresh: RefreshStats,
}

struct RefreshHandle {
    refresher: Arc<AutoRefresher>,
    task: JoinHandle<()>,
}

/// Process-wide page behavior
pub struct PageController {
    document: Arc<RwLock<PageDocument>>,
    trigger: Arc<dyn RefreshTrigger>,
    events: EventBus,
    logger: Arc<LifecycleLogger>,
    refresh_interval: Duration,
    refresh: Mutex<Option<RefreshHandle>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

impl PageController {
    /// Create a controller; nothing runs until `start` or page-ready
    pub fn new(
        document: PageDocument,
        trigger: Arc<dyn RefreshTrigger>,
        events: EventBus,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
            trigger,
            events,
            logger: Arc::new(LifecycleLogger::new()),
            refresh_interval,
            refresh: Mutex::new(None),
            listener: Mutex::new(None),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Shared handle to the page document
    pub fn document(&self) -> Arc<RwLock<PageDocument>> {
        Arc::clone(&self.document)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn logger(&self) -> &LifecycleLogger {
        &self.logger
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Start the listener that feeds page events to the lifecycle logger
    ///
    /// Calling it again while the listener runs has no effect.
    pub async fn start(&self) -> PageResult<()> {
        self.ensure_running()?;

        let mut listener = self.listener.lock().await;
        if listener.is_some() {
            return Ok(());
        }

        let mut rx = self.events.subscribe();
        let logger = Arc::clone(&self.logger);

        *listener = Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        logger.observe(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Page event listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));

        tracing::debug!("Page event listener started");
        Ok(())
    }

    /// Dispatch an event on the page
    ///
    /// Page-ready arms the auto-refresh timer (once); every event is then
    /// published to listeners.
    pub async fn dispatch(&self, event: PageEvent) -> PageResult<()> {
        self.ensure_running()?;

        if event.kind() == EventKind::PageReady {
            self.start_auto_refresh(self.refresh_interval).await?;
        }

        self.events.publish(event);
        Ok(())
    }

    /// Arm the auto-refresh timer
    ///
    /// Returns `false` if a timer was already armed; only one ever runs.
    pub async fn start_auto_refresh(&self, interval: Duration) -> PageResult<bool> {
        self.ensure_running()?;
        if interval.is_zero() {
            return Err(PageError::InvalidInterval);
        }

        let mut refresh = self.refresh.lock().await;
        if refresh.is_some() {
            tracing::debug!("Auto-refresh already armed");
            return Ok(false);
        }

        let refresher = Arc::new(AutoRefresher::new(
            Arc::clone(&self.document),
            Arc::clone(&self.trigger),
            interval,
        ));
        let task = Arc::clone(&refresher).start();
        *refresh = Some(RefreshHandle { refresher, task });

        Ok(true)
    }

    /// Run one refresh pass now, outside the timer schedule
    pub async fn refresh_now(&self) -> PageResult<usize> {
        self.ensure_running()?;

        let armed = self
            .refresh
            .lock()
            .await
            .as_ref()
            .map(|handle| Arc::clone(&handle.refresher));

        let refresher = armed.unwrap_or_else(|| {
            Arc::new(AutoRefresher::new(
                Arc::clone(&self.document),
                Arc::clone(&self.trigger),
                self.refresh_interval,
            ))
        });

        Ok(refresher.refresh_once().await)
    }

    /// Stop the refresh timer and the event listener
    ///
    /// Idempotent. Afterwards no further triggers fire and dispatch fails
    /// with `PageError::ShutDown`.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.refresh.lock().await.take() {
            handle.refresher.stop();
            handle.task.abort();
            let _ = handle.task.await;
        }

        if let Some(listener) = self.listener.lock().await.take() {
            listener.abort();
            let _ = listener.await;
        }

        tracing::info!(
            lines_logged = self.logger.lines_logged(),
            "Page controller shut down"
        );
    }

    pub async fn stats(&self) -> ControllerStats {
        let refresh = self.refresh.lock().await;
        let listening = self.listener.lock().await.is_some();

        ControllerStats {
            listening,
            timer_armed: refresh.is_some(),
            lines_logged: self.logger.lines_logged(),
            refresh: refresh
                .as_ref()
                .map(|handle| handle.refresher.stats())
                .unwrap_or_default(),
        }
    }

    fn ensure_running(&self) -> PageResult<()> {
        if self.is_shut_down() {
            Err(PageError::ShutDown)
        } else {
            Ok(())
        }
    }
}
