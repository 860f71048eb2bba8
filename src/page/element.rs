//! Page elements and the page document
//!
//! Elements are enumerated up front (from configuration) instead of being
//! discovered by walking a DOM. Eligibility checks still go through
//! attribute presence so the HTMX attribute contract stays the source of
//! truth.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ElementConfig;

/// Marker attribute flagging an element for periodic re-fetch
pub const AUTO_REFRESH_ATTR: &str = "data-auto-refresh";

/// HTMX attribute declaring a GET fetch
pub const HX_GET_ATTR: &str = "hx-get";

/// HTMX attribute listing the events that fire the element's request
pub const HX_TRIGGER_ATTR: &str = "hx-trigger";

/// Synthetic event fired on auto-refresh elements
pub const REFRESH_EVENT: &str = "refresh";

/// A single element of the rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl PageElement {
    /// Create an element with no attributes
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder method: set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder method: mark for auto-refresh
    pub fn auto_refresh(self) -> Self {
        self.attr(AUTO_REFRESH_ATTR, "")
    }

    /// Builder method: declare a GET fetch
    pub fn hx_get(self, path: impl Into<String>) -> Self {
        self.attr(HX_GET_ATTR, path)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Path of the declared GET fetch, if any
    pub fn fetch_path(&self) -> Option<&str> {
        self.attribute(HX_GET_ATTR)
    }

    /// Marked for auto-refresh and declares a GET fetch
    pub fn is_refresh_eligible(&self) -> bool {
        self.has_attribute(AUTO_REFRESH_ATTR) && self.has_attribute(HX_GET_ATTR)
    }

    /// Whether the element's `hx-trigger` lists `event`
    ///
    /// Without `hx-trigger` an element only fires on its natural event
    /// (`click`, `change`, `submit`), never on a custom one like `refresh`.
    pub fn listens_for(&self, event: &str) -> bool {
        self.attribute(HX_TRIGGER_ATTR).is_some_and(|spec| {
            spec.split(',')
                .filter_map(|part| part.split_whitespace().next())
                .any(|name| name == event)
        })
    }
}

impl From<&ElementConfig> for PageElement {
    fn from(config: &ElementConfig) -> Self {
        let mut element = PageElement::new(config.id.clone());
        element.attributes.extend(config.attributes.clone());

        if let Some(path) = &config.hx_get {
            element = element.hx_get(path.clone());
        }
        if let Some(trigger) = &config.hx_trigger {
            element = element.attr(HX_TRIGGER_ATTR, trigger.clone());
        }
        if config.auto_refresh {
            element = element.auto_refresh();
        }
        element
    }
}

/// The set of elements on the page
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    elements: Vec<PageElement>,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from configured elements, keeping their order
    pub fn from_config(elements: &[ElementConfig]) -> Self {
        let mut document = Self::new();
        for config in elements {
            document.insert(PageElement::from(config));
        }
        document
    }

    /// Insert an element, replacing any element with the same id
    pub fn insert(&mut self, element: PageElement) {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<PageElement> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&PageElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// All elements carrying the given attribute, in document order
    pub fn select_by_attribute<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a PageElement> + 'a {
        self.elements.iter().filter(move |e| e.has_attribute(name))
    }

    /// Elements that receive the refresh trigger on each tick
    pub fn refresh_targets(&self) -> Vec<PageElement> {
        self.select_by_attribute(AUTO_REFRESH_ATTR)
            .filter(|e| e.has_attribute(HX_GET_ATTR))
            .cloned()
            .collect()
    }

    pub fn elements(&self) -> &[PageElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
