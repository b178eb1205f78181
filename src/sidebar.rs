//! Sidebar Controller
//!
//! Slide-in navigation panel for narrow viewports. Opening shows the overlay
//! and locks page scrolling; closing reverses both.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::config::UiConfig;
use crate::surface::{Click, Scheduler, Surface};

const HIDDEN: &str = "hidden";
const OFFSCREEN: &str = "-translate-x-full";
const ONSCREEN: &str = "translate-x-0";
const TRANSFORM_OPEN: &str = "translateX(0)";
const TRANSFORM_CLOSED: &str = "translateX(-100%)";

pub struct SidebarController<S: Surface, T: Scheduler> {
    surface: Rc<S>,
    scheduler: Rc<T>,
    sidebar: Option<S::Element>,
    overlay: Option<S::Element>,
    breakpoint: f64,
    close_delay: Duration,
    is_narrow: Cell<bool>,
    /// Close queued by a nav click, cancelled when replaced or dropped
    pending_close: RefCell<Option<T::Handle>>,
}

impl<S: Surface + 'static, T: Scheduler + 'static> SidebarController<S, T> {
    /// Look up the sidebar elements and bind every listener
    pub fn mount(surface: Rc<S>, scheduler: Rc<T>, config: &UiConfig) -> Rc<Self> {
        let ids = &config.ids;
        let sidebar = surface.element_by_id(&ids.sidebar);
        let overlay = surface.element_by_id(&ids.overlay);
        let menu_button = surface.element_by_id(&ids.menu_button);
        let close_button = surface.element_by_id(&ids.sidebar_close);
        let is_narrow = surface.viewport_width() < config.breakpoint_px;

        log::debug!(
            "[Sidebar] Initialized: sidebar={} menu_btn={} close={} overlay={} narrow={}",
            sidebar.is_some(),
            menu_button.is_some(),
            close_button.is_some(),
            overlay.is_some(),
            is_narrow
        );

        let this = Rc::new(Self {
            surface,
            scheduler,
            sidebar,
            overlay,
            breakpoint: config.breakpoint_px,
            close_delay: config.nav_close_delay(),
            is_narrow: Cell::new(is_narrow),
            pending_close: RefCell::new(None),
        });

        if let Some(button) = &menu_button {
            this.bind_click(button, true, |this| this.open());
        }
        if let Some(button) = &close_button {
            this.bind_click(button, true, |this| this.close());
        }
        if let Some(overlay) = this.overlay.clone() {
            this.bind_click(&overlay, false, |this| this.close());
        }
        for item in this.surface.select_all(&ids.nav_item_selector) {
            this.bind_click(&item, false, |this| this.on_nav_item_click());
        }

        let weak = Rc::downgrade(&this);
        this.surface.on_resize(Rc::new(move |width: f64| {
            if let Some(this) = weak.upgrade() {
                this.on_resize(width);
            }
        }));

        this
    }

    fn bind_click(self: &Rc<Self>, el: &S::Element, prevent_default: bool, action: fn(&Rc<Self>)) {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.surface.on_click(
            el,
            prevent_default,
            Rc::new(move |_: &Click<S::Element>| {
                if let Some(this) = weak.upgrade() {
                    action(&this);
                }
            }),
        );
    }

    pub fn open(&self) {
        log::debug!("[Sidebar] Opening");
        if let Some(sidebar) = &self.sidebar {
            self.surface.set_style(sidebar, "transform", TRANSFORM_OPEN);
            self.surface.remove_class(sidebar, OFFSCREEN);
            self.surface.add_class(sidebar, ONSCREEN);
        }
        if let Some(overlay) = &self.overlay {
            self.surface.remove_class(overlay, HIDDEN);
            self.surface.set_style(overlay, "display", "block");
        }
        if let Some(body) = self.surface.body() {
            self.surface.set_style(&body, "overflow", "hidden");
        }
    }

    pub fn close(&self) {
        log::debug!("[Sidebar] Closing");
        if let Some(sidebar) = &self.sidebar {
            self.surface.set_style(sidebar, "transform", TRANSFORM_CLOSED);
            self.surface.add_class(sidebar, OFFSCREEN);
            self.surface.remove_class(sidebar, ONSCREEN);
        }
        if let Some(overlay) = &self.overlay {
            self.surface.add_class(overlay, HIDDEN);
            self.surface.set_style(overlay, "display", "none");
        }
        if let Some(body) = self.surface.body() {
            self.surface.set_style(&body, "overflow", "");
        }
    }

    /// Needs both sidebar and overlay to decide
    pub fn toggle(&self) {
        if self.sidebar.is_none() || self.overlay.is_none() {
            return;
        }
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn is_open(&self) -> bool {
        let Some(sidebar) = &self.sidebar else {
            return false;
        };
        // Browsers normalise `translateX(0)` to `translateX(0px)`
        let transform = self.surface.style(sidebar, "transform");
        transform == "translateX(0px)"
            || transform == TRANSFORM_OPEN
            || self.surface.has_class(sidebar, ONSCREEN)
    }

    pub fn is_narrow(&self) -> bool {
        self.is_narrow.get()
    }

    /// A wide layout never keeps the mobile overlay open
    pub fn on_resize(&self, width: f64) {
        let was_narrow = self.is_narrow.replace(width < self.breakpoint);
        let now_narrow = self.is_narrow.get();
        if !now_narrow && (was_narrow || self.is_open()) {
            self.close();
        }
    }

    /// On narrow viewports, close after the navigation has had time to start
    pub fn on_nav_item_click(self: &Rc<Self>) {
        if !self.is_narrow.get() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = self.scheduler.defer(
            self.close_delay,
            Box::new(move || {
                if let Some(this) = weak.upgrade() {
                    this.close();
                }
            }),
        );
        // Replacing drops (and cancels) any earlier pending close
        *self.pending_close.borrow_mut() = Some(handle);
    }
}
