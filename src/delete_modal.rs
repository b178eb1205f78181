//! Delete Confirmation Modal
//!
//! Server-rendered dialog reused for every delete link on a page. Each
//! request re-targets the form and rewrites the message before showing it.

use std::rc::Rc;

use crate::config::{UiConfig, LABEL_PLACEHOLDER};
use crate::error::{UiError, UiResult};
use crate::surface::{Click, Surface};

const HIDDEN: &str = "hidden";

pub struct DeleteConfirmationModal<S: Surface> {
    surface: Rc<S>,
    modal_id: String,
    form_id: String,
    message_id: String,
    template: String,
}

impl<S: Surface + 'static> DeleteConfirmationModal<S> {
    /// Bind backdrop dismissal if the modal is on the page
    pub fn mount(surface: Rc<S>, config: &UiConfig) -> Rc<Self> {
        let this = Rc::new(Self {
            surface,
            modal_id: config.ids.delete_modal.clone(),
            form_id: config.ids.delete_form.clone(),
            message_id: config.ids.delete_message.clone(),
            template: config.delete_message.clone(),
        });

        if let Some(modal) = this.surface.element_by_id(&this.modal_id) {
            let weak = Rc::downgrade(&this);
            this.surface.on_click(
                &modal,
                false,
                Rc::new(move |click: &Click<S::Element>| {
                    // Only the backdrop itself, never the dialog content
                    if !click.is_direct() {
                        return;
                    }
                    if let Some(this) = weak.upgrade() {
                        this.dismiss();
                    }
                }),
            );
        }
        this
    }

    pub fn message_for(&self, label: &str) -> String {
        self.template.replace(LABEL_PLACEHOLDER, label)
    }

    /// Point the form at `url`, name `label` in the message and show the modal
    pub fn request_deletion(&self, url: &str, label: &str) -> UiResult<()> {
        let Some(modal) = self.surface.element_by_id(&self.modal_id) else {
            log::error!("[DeleteModal] #{} not found", self.modal_id);
            return Err(UiError::MissingElement(self.modal_id.clone()));
        };

        if let Some(form) = self.surface.element_by_id(&self.form_id) {
            self.surface.set_attribute(&form, "action", url);
        }
        if let Some(message) = self.surface.element_by_id(&self.message_id) {
            self.surface.set_text(&message, &self.message_for(label));
        }
        self.surface.remove_class(&modal, HIDDEN);
        log::debug!("[DeleteModal] Confirming {} -> {}", label, url);
        Ok(())
    }

    /// Hide the modal. The form action and message stay until the next request.
    pub fn dismiss(&self) {
        if let Some(modal) = self.surface.element_by_id(&self.modal_id) {
            self.surface.add_class(&modal, HIDDEN);
        }
    }

    pub fn is_open(&self) -> bool {
        self.surface
            .element_by_id(&self.modal_id)
            .map(|modal| !self.surface.has_class(&modal, HIDDEN))
            .unwrap_or(false)
    }
}
