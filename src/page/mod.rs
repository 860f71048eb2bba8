//! Page Model
//!
//! Typed stand-ins for the parts of the browser page this crate touches:
//!
//! - **PageDocument / PageElement**: the enumerated elements and their attributes
//! - **PageEvent**: HTMX lifecycle and page-ready events
//! - **EventBus**: broadcast channel events are dispatched on
//! - **LifecycleLogger**: request start/completion log lines

mod bus;
mod element;
mod events;
mod lifecycle;

pub use bus::{EventBus, DEFAULT_BUS_CAPACITY};
pub use element::{
    PageDocument, PageElement, AUTO_REFRESH_ATTR, HX_GET_ATTR, HX_TRIGGER_ATTR, REFRESH_EVENT,
};
pub use events::{
    EventKind, PageEvent, RequestDetail, XhrInfo, AFTER_REQUEST, BEFORE_REQUEST,
    DOM_CONTENT_LOADED, SEND_ERROR,
};
pub use lifecycle::{LifecycleLine, LifecycleLogger, REQUEST_COMPLETED, REQUEST_STARTING};
