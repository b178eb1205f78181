//! Page
//!
//! The widgets mounted for one page load. Dropping the page tears them down:
//! pending timers are cancelled and surviving listeners become no-ops.

use std::rc::Rc;

use crate::config::UiConfig;
use crate::delete_modal::DeleteConfirmationModal;
use crate::reveal::ScrollRevealAnimator;
use crate::sidebar::SidebarController;
use crate::surface::{PreferenceStore, Scheduler, Surface};
use crate::theme::ThemeController;

pub struct Page<S: Surface, P: PreferenceStore, T: Scheduler> {
    sidebar: Rc<SidebarController<S, T>>,
    theme: Rc<ThemeController<S, P>>,
    delete_modal: Rc<DeleteConfirmationModal<S>>,
    reveal: Rc<ScrollRevealAnimator<S>>,
}

impl<S, P, T> Page<S, P, T>
where
    S: Surface + 'static,
    P: PreferenceStore + 'static,
    T: Scheduler + 'static,
{
    pub fn mount(surface: Rc<S>, store: Rc<P>, scheduler: Rc<T>, config: &UiConfig) -> Self {
        let theme = ThemeController::mount(surface.clone(), store, config);
        let sidebar = SidebarController::mount(surface.clone(), scheduler, config);
        let delete_modal = DeleteConfirmationModal::mount(surface.clone(), config);
        let reveal = ScrollRevealAnimator::mount(surface, config);
        log::info!("[Page] Mounted ({:?} theme)", theme.mode());
        Self {
            sidebar,
            theme,
            delete_modal,
            reveal,
        }
    }

    pub fn sidebar(&self) -> &SidebarController<S, T> {
        &self.sidebar
    }

    pub fn theme(&self) -> &ThemeController<S, P> {
        &self.theme
    }

    pub fn delete_modal(&self) -> &DeleteConfirmationModal<S> {
        &self.delete_modal
    }

    pub fn reveal(&self) -> &ScrollRevealAnimator<S> {
        &self.reveal
    }
}
