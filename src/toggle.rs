// On-page switch for the particle layer. Clicking it flips the engine, mirrors
// the state as an `active` class and reports the change to a notifier.

use crate::engine::ParticleEngine;
use crate::error::EngineError;
use crate::listener::EventListener;
use crate::surface::Surface;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::Element;

const ACTIVE_CLASS: &str = "active";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

// A page-level `(message, severity) => void` function
impl Notifier for js_sys::Function {
    fn notify(&self, message: &str, severity: Severity) {
        let called = self.call2(
            &JsValue::NULL,
            &JsValue::from_str(message),
            &JsValue::from_str(severity.as_str()),
        );
        if let Err(err) = called {
            log::error!("notifier threw: {:?}", err);
        }
    }
}

pub fn status_message(active: bool) -> (&'static str, Severity) {
    if active {
        ("Particle effect enabled", Severity::Success)
    } else {
        ("Particle effect disabled", Severity::Info)
    }
}

pub fn reflect_state(element: &Element, active: bool) -> Result<(), EngineError> {
    let classes = element.class_list();
    if active {
        classes.add_1(ACTIVE_CLASS).map_err(EngineError::dom)
    } else {
        classes.remove_1(ACTIVE_CLASS).map_err(EngineError::dom)
    }
}

pub struct ToggleControl {
    element: Element,
    _click: EventListener,
}

impl ToggleControl {
    pub fn bind<S>(
        element: Element,
        engine: Rc<RefCell<ParticleEngine<S>>>,
        notifier: Option<Rc<dyn Notifier>>,
    ) -> Result<Self, EngineError>
    where
        S: Surface + 'static,
    {
        reflect_state(&element, engine.borrow().is_active())?;

        let clicked = element.clone();
        let click = EventListener::new(&element, "click", move |_| {
            let active = engine.borrow_mut().toggle();
            if let Err(err) = reflect_state(&clicked, active) {
                log::warn!("{}", err);
            }
            let (message, severity) = status_message(active);
            log::info!("{}", message);
            if let Some(notifier) = &notifier {
                notifier.notify(message, severity);
            }
        })?;

        Ok(ToggleControl {
            element,
            _click: click,
        })
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}
