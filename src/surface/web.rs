//! Browser Surface
//!
//! `web_sys` implementation of the surface traits. Listeners registered
//! here are detached when the surface is dropped.

use std::cell::RefCell;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use leptos::ev;
use leptos::prelude::{document, window, window_event_listener, WindowListenerHandle};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use super::{Click, ClickHandler, IntersectionHandler, PreferenceStore, ResizeHandler, Scheduler, Surface};
use crate::error::{UiError, UiResult};

type IntersectionCallback = Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>;

struct ClickListener {
    target: web_sys::Element,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

struct IntersectionWatch {
    observer: web_sys::IntersectionObserver,
    _callback: IntersectionCallback,
}

/// The live document
#[derive(Default)]
pub struct WebSurface {
    clicks: RefCell<Vec<ClickListener>>,
    resizes: RefCell<Vec<WindowListenerHandle>>,
    observers: RefCell<Vec<IntersectionWatch>>,
}

impl WebSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Drop for WebSurface {
    fn drop(&mut self) {
        for listener in self.clicks.get_mut().drain(..) {
            let _ = listener
                .target
                .remove_event_listener_with_callback("click", listener.closure.as_ref().unchecked_ref());
        }
        for handle in self.resizes.get_mut().drain(..) {
            handle.remove();
        }
        for watch in self.observers.get_mut().drain(..) {
            watch.observer.disconnect();
        }
    }
}

fn inner_width() -> f64 {
    window()
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

fn html(el: &web_sys::Element) -> Option<&web_sys::HtmlElement> {
    el.dyn_ref::<web_sys::HtmlElement>()
}

impl Surface for WebSurface {
    type Element = web_sys::Element;

    fn element_by_id(&self, id: &str) -> Option<web_sys::Element> {
        document().get_element_by_id(id)
    }

    fn root(&self) -> Option<web_sys::Element> {
        document().document_element()
    }

    fn body(&self) -> Option<web_sys::Element> {
        document().body().map(Into::into)
    }

    fn select_all(&self, selector: &str) -> Vec<web_sys::Element> {
        let Ok(list) = document().query_selector_all(selector) else {
            log::warn!("[Surface] Invalid selector: {}", selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect()
    }

    fn add_class(&self, el: &web_sys::Element, class: &str) {
        let _ = el.class_list().add_1(class);
    }

    fn remove_class(&self, el: &web_sys::Element, class: &str) {
        let _ = el.class_list().remove_1(class);
    }

    fn has_class(&self, el: &web_sys::Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn class_name(&self, el: &web_sys::Element) -> String {
        el.class_name()
    }

    fn set_class_name(&self, el: &web_sys::Element, value: &str) {
        el.set_class_name(value);
    }

    fn set_attribute(&self, el: &web_sys::Element, name: &str, value: &str) {
        let _ = el.set_attribute(name, value);
    }

    fn remove_attribute(&self, el: &web_sys::Element, name: &str) {
        let _ = el.remove_attribute(name);
    }

    fn attribute(&self, el: &web_sys::Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_style(&self, el: &web_sys::Element, property: &str, value: &str) {
        let Some(el) = html(el) else { return };
        let style = el.style();
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn style(&self, el: &web_sys::Element, property: &str) -> String {
        html(el)
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_text(&self, el: &web_sys::Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn text(&self, el: &web_sys::Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn viewport_width(&self) -> f64 {
        inner_width()
    }

    fn on_click(
        &self,
        el: &web_sys::Element,
        prevent_default: bool,
        handler: ClickHandler<web_sys::Element>,
    ) {
        let current = el.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            if prevent_default {
                ev.prevent_default();
            }
            let target = ev
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok());
            handler(&Click {
                current: current.clone(),
                target,
            });
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        self.clicks.borrow_mut().push(ClickListener {
            target: el.clone(),
            closure,
        });
    }

    fn on_resize(&self, handler: ResizeHandler) {
        let handle = window_event_listener(ev::resize, move |_| handler(inner_width()));
        self.resizes.borrow_mut().push(handle);
    }

    fn observe_intersection(
        &self,
        elements: &[web_sys::Element],
        threshold: f64,
        handler: IntersectionHandler<web_sys::Element>,
    ) {
        let callback = IntersectionCallback::new(
            move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: web_sys::IntersectionObserverEntry = entry.unchecked_into();
                    handler(&entry.target(), entry.is_intersecting());
                }
            },
        );

        let init = web_sys::IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer = match web_sys::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        ) {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("[Surface] IntersectionObserver unavailable: {:?}", e);
                return;
            }
        };
        for el in elements {
            observer.observe(el);
        }
        self.observers.borrow_mut().push(IntersectionWatch {
            observer,
            _callback: callback,
        });
    }
}

/// `window.localStorage`
#[derive(Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        window().local_storage().ok().flatten()
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> UiResult<()> {
        let storage =
            Self::storage().ok_or_else(|| UiError::Storage("localStorage unavailable".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| UiError::Storage(format!("{:?}", e)))
    }
}

/// `setTimeout` backed scheduler
#[derive(Default)]
pub struct TimerScheduler;

impl Scheduler for TimerScheduler {
    type Handle = Timeout;

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }
}

/// Run `f` once the document has been parsed
pub fn on_ready(f: impl FnOnce() + 'static) {
    let doc = document();
    if doc.ready_state() != "loading" {
        f();
        return;
    }
    let callback = Closure::once_into_js(f);
    let _ = doc.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref());
}
