//! UI Configuration
//!
//! Defaults match the server-rendered templates. A page can override any
//! field by embedding a JSON document:
//!
//! ```html
//! <script id="ui-config" type="application/json">{"theme_mode": "fixed"}</script>
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{UiError, UiResult};
use crate::surface::Surface;

/// Id of the element holding embedded JSON config
pub const CONFIG_ELEMENT_ID: &str = "ui-config";

/// Placeholder replaced by the item label in the delete message
pub const LABEL_PLACEHOLDER: &str = "{label}";

/// Which theme controller variant runs on the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light/dark toggle persisted in local storage
    #[default]
    Switchable,
    /// Single light design, toggle is decorative
    Fixed,
}

/// Element ids and selectors the widgets look up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub sidebar: String,
    pub menu_button: String,
    pub sidebar_close: String,
    pub overlay: String,
    pub nav_item_selector: String,
    pub theme_toggle: String,
    pub theme_icon: String,
    pub delete_modal: String,
    pub delete_form: String,
    pub delete_message: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            sidebar: "sidebar".into(),
            menu_button: "mobile-menu-btn".into(),
            sidebar_close: "sidebar-close".into(),
            overlay: "mobile-overlay".into(),
            nav_item_selector: ".nav-item".into(),
            theme_toggle: "theme-toggle".into(),
            theme_icon: "theme-toggle-icon".into(),
            delete_modal: "deleteModal".into(),
            delete_form: "deleteForm".into(),
            delete_message: "deleteMessage".into(),
        }
    }
}

/// Page-wide UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Viewports narrower than this are "mobile"
    pub breakpoint_px: f64,
    /// Delay before closing the sidebar after a nav click
    pub nav_close_delay_ms: u32,
    /// Fraction of an element that must be visible to reveal it
    pub reveal_threshold: f64,
    pub reveal_offset_px: f64,
    pub reveal_transition: String,
    pub reveal_selector: String,
    pub theme_storage_key: String,
    pub theme_mode: ThemeMode,
    /// Confirmation sentence, `{label}` is replaced with the item name
    pub delete_message: String,
    pub ids: ElementIds,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 1024.0,
            nav_close_delay_ms: 150,
            reveal_threshold: 0.1,
            reveal_offset_px: 20.0,
            reveal_transition: "all 0.6s ease-out".into(),
            reveal_selector: ".animate-fade-in, .card-hover".into(),
            theme_storage_key: "theme".into(),
            theme_mode: ThemeMode::default(),
            delete_message: "¿Está seguro que desea eliminar {label}?".into(),
            ids: ElementIds::default(),
        }
    }
}

impl UiConfig {
    /// Parse JSON overrides on top of the defaults
    pub fn from_json(json: &str) -> UiResult<Self> {
        let config: UiConfig =
            serde_json::from_str(json).map_err(|e| UiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read the embedded config element, falling back to defaults
    pub fn load<S: Surface>(surface: &S) -> Self {
        let Some(el) = surface.element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        let json = surface.text(&el);
        if json.trim().is_empty() {
            return Self::default();
        }
        match Self::from_json(&json) {
            Ok(config) => {
                log::debug!("[Config] Loaded overrides from #{}", CONFIG_ELEMENT_ID);
                config
            }
            Err(e) => {
                log::warn!("[Config] {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> UiResult<()> {
        if !(self.breakpoint_px > 0.0) {
            return Err(UiError::Config(format!(
                "breakpoint_px must be positive, got {}",
                self.breakpoint_px
            )));
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(UiError::Config(format!(
                "reveal_threshold must be within [0, 1], got {}",
                self.reveal_threshold
            )));
        }
        if !self.delete_message.contains(LABEL_PLACEHOLDER) {
            return Err(UiError::Config(format!(
                "delete_message must contain {}",
                LABEL_PLACEHOLDER
            )));
        }
        Ok(())
    }

    pub fn nav_close_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.nav_close_delay_ms))
    }
}
