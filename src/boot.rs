//! Browser Bootstrap
//!
//! Mounts the page once the DOM is ready and exposes the entry points the
//! server templates call from inline handlers.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::window;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;

use crate::config::UiConfig;
use crate::page::Page;
use crate::surface::web::{self, LocalStorageStore, TimerScheduler, WebSurface};
use crate::surface::{PreferenceStore, Scheduler, Surface};

/// Argument-free entry points, by their exported name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    CloseModal,
    ToggleMenu,
    OpenMenu,
    CloseMenu,
    ToggleTheme,
}

impl PageAction {
    pub const ALL: [PageAction; 5] = [
        PageAction::CloseModal,
        PageAction::ToggleMenu,
        PageAction::OpenMenu,
        PageAction::CloseMenu,
        PageAction::ToggleTheme,
    ];

    pub fn export_name(&self) -> &'static str {
        match self {
            PageAction::CloseModal => "cerrarModal",
            PageAction::ToggleMenu => "toggleMobileMenu",
            PageAction::OpenMenu => "openMobileMenu",
            PageAction::CloseMenu => "closeMobileMenu",
            PageAction::ToggleTheme => "toggleTheme",
        }
    }

    fn run<S, P, T>(self, page: &Page<S, P, T>)
    where
        S: Surface + 'static,
        P: PreferenceStore + 'static,
        T: Scheduler + 'static,
    {
        match self {
            PageAction::CloseModal => page.delete_modal().dismiss(),
            PageAction::ToggleMenu => page.sidebar().toggle(),
            PageAction::OpenMenu => page.sidebar().open(),
            PageAction::CloseMenu => page.sidebar().close(),
            PageAction::ToggleTheme => {
                page.theme().toggle();
            }
        }
    }
}

/// Holds the mounted page, empty until the DOM is ready
pub struct PageSlot<S: Surface, P: PreferenceStore, T: Scheduler> {
    page: RefCell<Option<Page<S, P, T>>>,
}

impl<S, P, T> PageSlot<S, P, T>
where
    S: Surface + 'static,
    P: PreferenceStore + 'static,
    T: Scheduler + 'static,
{
    pub const fn new() -> Self {
        Self {
            page: RefCell::new(None),
        }
    }

    /// Replaces (and tears down) any page mounted earlier
    pub fn mount(&self, page: Page<S, P, T>) {
        *self.page.borrow_mut() = Some(page);
    }

    fn with_page(&self, f: impl FnOnce(&Page<S, P, T>)) -> bool {
        match self.page.borrow().as_ref() {
            Some(page) => {
                f(page);
                true
            }
            None => {
                log::warn!("[Boot] Page not mounted yet");
                false
            }
        }
    }

    /// Returns whether a page was there to act on
    pub fn dispatch(&self, action: PageAction) -> bool {
        self.with_page(|page| action.run(page))
    }

    pub fn confirm_deletion(&self, url: &str, label: &str) -> bool {
        self.with_page(|page| {
            let _ = page.delete_modal().request_deletion(url, label);
        })
    }
}

type WebSlot = PageSlot<WebSurface, LocalStorageStore, TimerScheduler>;

thread_local! {
    static PAGE: WebSlot = const { WebSlot::new() };
}

pub fn start() {
    install_globals();
    web::on_ready(|| {
        let surface = Rc::new(WebSurface::new());
        let config = UiConfig::load(surface.as_ref());
        let page = Page::mount(
            surface,
            Rc::new(LocalStorageStore),
            Rc::new(TimerScheduler),
            &config,
        );
        PAGE.with(|slot| slot.mount(page));
    });
}

fn export(name: &str, value: &JsValue) {
    if js_sys::Reflect::set(&window(), &JsValue::from_str(name), value).is_err() {
        log::error!("[Boot] Could not export {}", name);
    }
}

fn install_globals() {
    let confirm = Closure::<dyn Fn(String, String)>::new(|url: String, label: String| {
        PAGE.with(|slot| slot.confirm_deletion(&url, &label));
    });
    export("confirmarEliminacion", confirm.as_ref());
    confirm.forget();

    for action in PageAction::ALL {
        let closure = Closure::<dyn Fn()>::new(move || {
            PAGE.with(|slot| slot.dispatch(action));
        });
        export(action.export_name(), closure.as_ref());
        closure.forget();
    }

    let logs = Closure::<dyn Fn() -> String>::new(|| rolling_logger::recent().join("\n"));
    export("akunaRecentLogs", logs.as_ref());
    logs.forget();
}
