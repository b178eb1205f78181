//! Rendering Surface
//!
//! The handful of DOM operations the widgets need, behind traits so the
//! widget logic runs against the browser or an in-memory document.

pub mod web;
#[cfg(test)]
pub mod memory;

use std::rc::Rc;
use std::time::Duration;

use crate::error::UiResult;

/// A click delivered to a listener
#[derive(Debug, Clone)]
pub struct Click<E> {
    /// Element the listener is attached to
    pub current: E,
    /// Element the click originated on, possibly a descendant of `current`
    pub target: Option<E>,
}

impl<E: PartialEq> Click<E> {
    /// True when the click landed on the listening element itself
    pub fn is_direct(&self) -> bool {
        self.target.as_ref() == Some(&self.current)
    }
}

pub type ClickHandler<E> = Rc<dyn Fn(&Click<E>)>;
/// Called with the new viewport width
pub type ResizeHandler = Rc<dyn Fn(f64)>;
/// Called with the element and whether it is now intersecting
pub type IntersectionHandler<E> = Rc<dyn Fn(&E, bool)>;

/// Document the widgets read and mutate
pub trait Surface {
    type Element: Clone + PartialEq + 'static;

    // Lookup
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn root(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn select_all(&self, selector: &str) -> Vec<Self::Element>;

    // Classes
    fn add_class(&self, el: &Self::Element, class: &str);
    fn remove_class(&self, el: &Self::Element, class: &str);
    fn has_class(&self, el: &Self::Element, class: &str) -> bool;
    fn class_name(&self, el: &Self::Element) -> String;
    fn set_class_name(&self, el: &Self::Element, value: &str);

    // Attributes, inline style, text
    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&self, el: &Self::Element, name: &str);
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;
    /// An empty value clears the property
    fn set_style(&self, el: &Self::Element, property: &str, value: &str);
    fn style(&self, el: &Self::Element, property: &str) -> String;
    fn set_text(&self, el: &Self::Element, text: &str);
    fn text(&self, el: &Self::Element) -> String;

    fn viewport_width(&self) -> f64;

    // Listeners
    fn on_click(&self, el: &Self::Element, prevent_default: bool, handler: ClickHandler<Self::Element>);
    fn on_resize(&self, handler: ResizeHandler);
    fn observe_intersection(
        &self,
        elements: &[Self::Element],
        threshold: f64,
        handler: IntersectionHandler<Self::Element>,
    );
}

/// Key-value persistence for user preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> UiResult<()>;
}

/// One-shot deferred tasks
pub trait Scheduler {
    /// Dropping the handle cancels the task if it has not run yet
    type Handle: 'static;

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
}
