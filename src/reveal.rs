//! Scroll Reveal
//!
//! Fades tagged elements in as they scroll into view. Each element is
//! revealed once and stays visible.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::UiConfig;
use crate::surface::Surface;

pub struct ScrollRevealAnimator<S: Surface> {
    surface: Rc<S>,
    elements: Vec<S::Element>,
    revealed: RefCell<Vec<S::Element>>,
}

impl<S: Surface + 'static> ScrollRevealAnimator<S> {
    /// Hide every tagged element and start observing them
    pub fn mount(surface: Rc<S>, config: &UiConfig) -> Rc<Self> {
        let elements = surface.select_all(&config.reveal_selector);
        let offset = format!("translateY({}px)", config.reveal_offset_px);
        for el in &elements {
            surface.set_style(el, "opacity", "0");
            surface.set_style(el, "transform", &offset);
            surface.set_style(el, "transition", &config.reveal_transition);
        }

        let this = Rc::new(Self {
            surface,
            elements,
            revealed: RefCell::new(Vec::new()),
        });

        if !this.elements.is_empty() {
            let weak = Rc::downgrade(&this);
            this.surface.observe_intersection(
                &this.elements,
                config.reveal_threshold,
                Rc::new(move |el: &S::Element, intersecting: bool| {
                    if !intersecting {
                        return;
                    }
                    if let Some(this) = weak.upgrade() {
                        this.reveal(el);
                    }
                }),
            );
        }
        log::debug!("[Reveal] Observing {} elements", this.elements.len());
        this
    }

    pub fn reveal(&self, el: &S::Element) {
        if self.revealed.borrow().contains(el) {
            return;
        }
        self.surface.set_style(el, "opacity", "1");
        self.surface.set_style(el, "transform", "translateY(0)");
        self.revealed.borrow_mut().push(el.clone());
    }

    pub fn observed_count(&self) -> usize {
        self.elements.len()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.borrow().len()
    }
}
