// DOM event listener that unregisters itself when dropped

use crate::error::EngineError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, EventTarget};

pub struct EventListener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event_type: &'static str, callback: F) -> Result<Self, EngineError>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(web_sys::Event)>);
        target
            .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
            .map_err(EngineError::dom)?;
        Ok(EventListener {
            target: target.clone(),
            event_type,
            callback,
        })
    }

    // Needed for listeners that call preventDefault() on scroll-affecting events
    pub fn new_non_passive<F>(
        target: &EventTarget,
        event_type: &'static str,
        callback: F,
    ) -> Result<Self, EngineError>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(web_sys::Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_type,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(EngineError::dom)?;
        Ok(EventListener {
            target: target.clone(),
            event_type,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let removed = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref());
        if let Err(err) = removed {
            log::warn!("could not remove '{}' listener: {:?}", self.event_type, err);
        }
    }
}
