//! Theme Controller
//!
//! Light/dark preference persisted in local storage, or a fixed single
//! design where the toggle is decorative.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use crate::config::{ThemeMode, UiConfig};
use crate::surface::{Click, PreferenceStore, Surface};

/// Attribute on `<html>` carrying the active theme
pub const THEME_ATTRIBUTE: &str = "data-theme";
const DARK_CLASS: &str = "dark";
const MOON_ICON: &str = "fas fa-moon";
const SUN_ICON: &str = "fas fa-sun";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon offering the opposite theme
    pub fn icon_class(&self) -> &'static str {
        match self {
            Theme::Light => MOON_ICON,
            Theme::Dark => SUN_ICON,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Remove every `theme-*` token from a class list
pub fn strip_theme_classes(class_name: &str) -> String {
    class_name
        .split_whitespace()
        .filter(|token| !token.starts_with("theme-"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct ThemeController<S: Surface, P: PreferenceStore> {
    surface: Rc<S>,
    store: Rc<P>,
    storage_key: String,
    icon_id: String,
    toggle_id: String,
    mode: ThemeMode,
    current: Cell<Theme>,
}

impl<S: Surface + 'static, P: PreferenceStore + 'static> ThemeController<S, P> {
    /// Apply the initial theme and bind the toggle control
    pub fn mount(surface: Rc<S>, store: Rc<P>, config: &UiConfig) -> Rc<Self> {
        let this = Rc::new(Self {
            surface,
            store,
            storage_key: config.theme_storage_key.clone(),
            icon_id: config.ids.theme_icon.clone(),
            toggle_id: config.ids.theme_toggle.clone(),
            mode: config.theme_mode,
            current: Cell::new(Theme::Light),
        });
        match this.mode {
            ThemeMode::Switchable => this.init_switchable(),
            ThemeMode::Fixed => this.init_fixed(),
        }
        this
    }

    fn init_switchable(self: &Rc<Self>) {
        let theme = self.stored_theme();
        self.current.set(theme);
        self.apply(theme);

        if let Some(toggle) = self.surface.element_by_id(&self.toggle_id) {
            let weak: Weak<Self> = Rc::downgrade(self);
            self.surface.on_click(
                &toggle,
                true,
                Rc::new(move |_: &Click<S::Element>| {
                    if let Some(this) = weak.upgrade() {
                        this.toggle();
                    }
                }),
            );
        }
        log::debug!("[Theme] Initialized with {}", theme);
    }

    fn init_fixed(&self) {
        if let Some(root) = self.surface.root() {
            self.surface.remove_attribute(&root, THEME_ATTRIBUTE);
            self.surface.remove_class(&root, DARK_CLASS);
        }
        if let Some(body) = self.surface.body() {
            let class_name = strip_theme_classes(&self.surface.class_name(&body));
            self.surface.set_class_name(&body, &class_name);
            self.surface.remove_class(&body, DARK_CLASS);
        }

        let toggle = self.surface.element_by_id(&self.toggle_id);
        let icon = self.surface.element_by_id(&self.icon_id);
        if let (Some(toggle), Some(icon)) = (toggle, icon) {
            // Decorative only: swallow the navigation, change nothing
            self.surface.on_click(&toggle, true, Rc::new(|_: &Click<S::Element>| {}));
            self.surface.set_class_name(&icon, SUN_ICON);
        }
        log::debug!("[Theme] Fixed design, toggle disabled");
    }

    fn stored_theme(&self) -> Theme {
        match self.store.get(&self.storage_key) {
            None => Theme::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("[Theme] Ignoring stored value: {}", e);
                Theme::default()
            }),
        }
    }

    /// Reflect `theme` on the document and the toggle icon
    pub fn apply(&self, theme: Theme) {
        let is_dark = theme == Theme::Dark;
        let root = self.surface.root();
        let body = self.surface.body();

        if let Some(root) = &root {
            self.surface.set_attribute(root, THEME_ATTRIBUTE, theme.as_str());
        }
        for el in root.iter().chain(body.iter()) {
            if is_dark {
                self.surface.add_class(el, DARK_CLASS);
            } else {
                self.surface.remove_class(el, DARK_CLASS);
            }
        }
        if let Some(body) = &body {
            let class_name = strip_theme_classes(&self.surface.class_name(body));
            self.surface.set_class_name(body, &class_name);
            self.surface.add_class(body, &format!("theme-{}", theme));
        }
        if let Some(icon) = self.surface.element_by_id(&self.icon_id) {
            self.surface.set_class_name(&icon, theme.icon_class());
        }
    }

    /// Flip and persist the theme. The fixed design ignores this.
    pub fn toggle(&self) -> Theme {
        if self.mode == ThemeMode::Fixed {
            return self.current.get();
        }
        let next = self.current.get().toggled();
        self.current.set(next);
        if let Err(e) = self.store.set(&self.storage_key, next.as_str()) {
            log::warn!("[Theme] Could not persist {}: {}", next, e);
        }
        self.apply(next);
        next
    }

    pub fn current(&self) -> Theme {
        self.current.get()
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }
}
