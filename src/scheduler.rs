// Frame scheduling service. A single requestAnimationFrame loop invokes every
// registered callback once per frame until its scheduler is dropped.

use crate::error::EngineError;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u32);

type FrameCallback = Box<dyn FnMut(f64)>;

#[derive(Default)]
pub struct CallbackRegistry {
    next_id: u32,
    callbacks: Vec<(FrameHandle, FrameCallback)>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        CallbackRegistry::default()
    }

    pub fn register<F>(&mut self, callback: F) -> FrameHandle
    where
        F: FnMut(f64) + 'static,
    {
        let handle = FrameHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.callbacks.push((handle, Box::new(callback)));
        handle
    }

    /// Returns false if the handle was never registered or already cancelled.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(h, _)| *h != handle);
        self.callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    // Runs in registration order
    pub fn run(&mut self, timestamp: f64) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(timestamp);
        }
    }
}

/// Bookkeeping for one self-rescheduling animation-frame loop: the id of the
/// frame request in flight and whether the loop has been halted.
#[derive(Debug, Default)]
pub struct LoopControl {
    pending: Option<i32>,
    halted: bool,
}

impl LoopControl {
    pub fn new() -> Self {
        LoopControl::default()
    }

    pub fn arm(&mut self, request_id: i32) {
        if !self.halted {
            self.pending = Some(request_id);
        }
    }

    /// Called when a frame fires. Returns false once the loop is halted.
    pub fn fire(&mut self) -> bool {
        self.pending = None;
        !self.halted
    }

    /// Stops the loop, handing back the request that still needs cancelling.
    pub fn halt(&mut self) -> Option<i32> {
        self.halted = true;
        self.pending.take()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Drives a shared `CallbackRegistry` from the browser's animation frames.
/// Build one at start-up and hand out `Rc` clones; the loop stops when the
/// last clone is dropped.
///
/// Callbacks must not register, cancel or drop the scheduler from inside a
/// frame; the registry is borrowed for the whole run.
pub struct FrameScheduler {
    window: web_sys::Window,
    registry: Rc<RefCell<CallbackRegistry>>,
    control: Rc<RefCell<LoopControl>>,
    slot: FrameSlot,
}

impl FrameScheduler {
    pub fn start() -> Result<Self, EngineError> {
        let window = web_sys::window().ok_or(EngineError::WindowUnavailable)?;
        let registry = Rc::new(RefCell::new(CallbackRegistry::new()));
        let control = Rc::new(RefCell::new(LoopControl::new()));

        // The closure reschedules itself through `f`; Drop empties the slot
        let f: FrameSlot = Rc::new(RefCell::new(None));
        let g = f.clone();
        let frame_registry = registry.clone();
        let frame_control = control.clone();
        let frame_window = window.clone();

        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            if !frame_control.borrow_mut().fire() {
                return;
            }
            frame_registry.borrow_mut().run(timestamp);

            if let Some(next) = f.borrow().as_ref() {
                match frame_window.request_animation_frame(next.as_ref().unchecked_ref()) {
                    Ok(id) => frame_control.borrow_mut().arm(id),
                    Err(err) => log::error!("could not schedule next frame: {:?}", err),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(first) = g.borrow().as_ref() {
            let id = window
                .request_animation_frame(first.as_ref().unchecked_ref())
                .map_err(EngineError::dom)?;
            control.borrow_mut().arm(id);
        }

        Ok(FrameScheduler {
            window,
            registry,
            control,
            slot: g,
        })
    }

    pub fn register<F>(&self, callback: F) -> FrameHandle
    where
        F: FnMut(f64) + 'static,
    {
        self.registry.borrow_mut().register(callback)
    }

    pub fn cancel(&self, handle: FrameHandle) -> bool {
        self.registry.borrow_mut().cancel(handle)
    }

    pub fn is_running(&self) -> bool {
        !self.control.borrow().is_halted()
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        if let Some(id) = self.control.borrow_mut().halt() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("could not cancel frame {}: {:?}", id, err);
            }
        }
        // Breaks the closure's reference to itself
        self.slot.borrow_mut().take();
    }
}
