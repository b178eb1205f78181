//! Akuna UI Entry Point
//!
//! Behaviour for the server-rendered pages: mobile sidebar, theme toggle,
//! delete confirmation modal and scroll reveal.

mod boot;
mod config;
mod delete_modal;
mod error;
mod page;
mod reveal;
mod sidebar;
mod surface;
mod theme;

use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = rolling_logger::init(level, rolling_logger::DEFAULT_CAPACITY) {
        web_sys::console::warn_1(&format!("[Boot] Logger not installed: {}", e).into());
    }
    boot::start();
}
