//! # elpris-page
//!
//! Page behavior for the Danish electricity price dashboard, a
//! server-rendered page driven by HTMX.
//!
//! ## Features
//!
//! - **Request lifecycle logging**: one line per HTMX request start and completion
//! - **Danish formatting**: krone amounts and date-times as the dashboard shows them
//! - **Auto-refresh**: periodic `refresh` trigger on marked elements
//! - **Page controller**: one owner for the listener and timer, with explicit shutdown
//!
//! ## Modules
//!
//! - [`format`]: `format_price` and `format_date_time`
//! - [`page`]: page elements, events, event bus, lifecycle logger
//! - [`refresh`]: the auto-refresh timer and trigger seam
//! - [`controller`]: the page controller
//! - [`http`]: trigger that re-issues `hx-get` fetches over HTTP
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use elpris_page::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     config.validate()?;
//!
//!     let events = EventBus::default();
//!     let trigger = HttpTrigger::new(
//!         &config.page.base_url,
//!         std::time::Duration::from_secs(config.http.request_timeout_secs),
//!         events.clone(),
//!     )?;
//!
//!     let controller = PageController::new(
//!         PageDocument::from_config(&config.page.elements),
//!         Arc::new(trigger),
//!         events,
//!         config.page.refresh_interval(),
//!     );
//!     controller.start().await?;
//!     controller.dispatch(PageEvent::dom_content_loaded()).await?;
//!
//!     println!("{}", format_price(1234.5)?);
//!
//!     controller.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod http;
pub mod page;
pub mod refresh;

pub use config::{
    generate_default_config, Config, ConfigError, ElementConfig, FormatConfig, HttpConfig,
    LoggingConfig, PageConfig,
};

pub use controller::{ControllerStats, PageController};

pub use error::{PageError, PageResult};

pub use format::{
    format_date_time, format_price, format_price_str, DateTimeFormatter, DateTimeInput,
    DisplayZone, FormatError,
};

pub use http::HttpTrigger;

pub use page::{
    EventBus, EventKind, LifecycleLine, LifecycleLogger, PageDocument, PageElement, PageEvent,
};

pub use refresh::{
    AutoRefresher, RefreshStats, RefreshTrigger, TriggerError, TriggerOutcome,
    DEFAULT_REFRESH_INTERVAL_SECS,
};
