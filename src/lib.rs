mod utils;

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod listener;
pub mod particle;
pub mod pointer;
pub mod scheduler;
pub mod surface;
pub mod toggle;

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MouseEvent, TouchEvent, Window};

use crate::config::EngineConfig;
use crate::engine::ParticleEngine;
use crate::error::EngineError;
use crate::listener::EventListener;
use crate::pointer::InputEvent;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::CanvasSurface;
use crate::toggle::{reflect_state, Notifier, ToggleControl};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    utils::init_logging();
}

#[cfg(feature = "frame-timing")]
pub struct Timer<'a> {
    name: &'a str,
}

#[cfg(feature = "frame-timing")]
impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        web_sys::console::time_with_label(name);
        Timer { name }
    }
}

#[cfg(feature = "frame-timing")]
impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        web_sys::console::time_end_with_label(self.name);
    }
}

type SharedEngine = Rc<RefCell<ParticleEngine<CanvasSurface>>>;

/// Handle to the page's animation-frame loop. Create it once and attach every
/// layer to it; the loop stops once the handle and all its layers are freed.
#[wasm_bindgen]
pub struct FrameLoop {
    scheduler: Rc<FrameScheduler>,
}

#[wasm_bindgen]
impl FrameLoop {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<FrameLoop, JsValue> {
        let scheduler = FrameScheduler::start()?;
        Ok(FrameLoop {
            scheduler: Rc::new(scheduler),
        })
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }
}

impl FrameLoop {
    pub fn scheduler(&self) -> &Rc<FrameScheduler> {
        &self.scheduler
    }
}

/// The page's particle layer: one canvas-backed engine, its input listeners,
/// its frame callback and an optional on-page toggle. Dropping it (`free()`
/// from JS) removes the listeners and the frame callback, and stops the frame
/// loop if nothing else holds it.
#[wasm_bindgen]
pub struct ParticleLayer {
    engine: SharedEngine,
    scheduler: Rc<FrameScheduler>,
    frame: FrameHandle,
    toggle: Option<ToggleControl>,
    _listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl ParticleLayer {
    /// Binds the layer to `<canvas id=canvas_id>` with a frame loop of its
    /// own. When `toggle_id` names an element, clicks on it switch the effect
    /// and `notifier(message, severity)` hears about it.
    pub fn attach(
        canvas_id: &str,
        toggle_id: Option<String>,
        notifier: Option<js_sys::Function>,
    ) -> Result<ParticleLayer, JsValue> {
        let frames = FrameLoop::new()?;
        ParticleLayer::attach_to(&frames, canvas_id, toggle_id, notifier)
    }

    /// Like `attach`, but driven by a frame loop shared with other layers.
    pub fn attach_to(
        frames: &FrameLoop,
        canvas_id: &str,
        toggle_id: Option<String>,
        notifier: Option<js_sys::Function>,
    ) -> Result<ParticleLayer, JsValue> {
        let notifier = notifier.map(|f| Rc::new(f) as Rc<dyn Notifier>);
        let layer = ParticleLayer::build(
            frames.scheduler(),
            canvas_id,
            toggle_id.as_deref(),
            notifier,
            EngineConfig::default(),
        )?;
        Ok(layer)
    }

    pub fn start(&self) {
        self.engine.borrow_mut().start();
        self.reflect_toggle();
    }

    pub fn stop(&self) {
        self.engine.borrow_mut().stop();
        self.reflect_toggle();
    }

    pub fn toggle(&self) -> bool {
        let active = self.engine.borrow_mut().toggle();
        self.reflect_toggle();
        active
    }

    pub fn is_active(&self) -> bool {
        self.engine.borrow().is_active()
    }

    pub fn particle_count(&self) -> usize {
        self.engine.borrow().particles().len()
    }
}

impl ParticleLayer {
    pub fn build(
        scheduler: &Rc<FrameScheduler>,
        canvas_id: &str,
        toggle_id: Option<&str>,
        notifier: Option<Rc<dyn Notifier>>,
        config: EngineConfig,
    ) -> Result<ParticleLayer, EngineError> {
        let window = web_sys::window().ok_or(EngineError::WindowUnavailable)?;
        let document = window.document().ok_or(EngineError::WindowUnavailable)?;

        let surface = CanvasSurface::from_element_id(canvas_id)?;
        // Every fallible step runs before the frame callback is registered
        let toggle_element = match toggle_id {
            Some(id) => Some(
                document
                    .get_element_by_id(id)
                    .ok_or_else(|| EngineError::ToggleUnavailable(id.to_owned()))?,
            ),
            None => None,
        };
        let start_active = config.start_active;
        let mut engine = ParticleEngine::new(surface, config);
        let (width, height) = viewport_size(&window);
        engine.handle_input(&InputEvent::resize(width, height, 0.0));
        let engine: SharedEngine = Rc::new(RefCell::new(engine));

        let listeners = vec![
            resize_listener(&window, engine.clone())?,
            mouse_listener(&document, engine.clone())?,
            touch_listener(&document, engine.clone())?,
        ];

        if start_active {
            engine.borrow_mut().start();
        }

        let toggle = match toggle_element {
            Some(element) => Some(ToggleControl::bind(element, engine.clone(), notifier)?),
            None => None,
        };

        let scheduler = scheduler.clone();
        let frame = {
            let engine = engine.clone();
            scheduler.register(move |_timestamp| {
                #[cfg(feature = "frame-timing")]
                let _timer = Timer::new("ParticleEngine::tick");
                if let Err(err) = engine.borrow_mut().tick() {
                    log::error!("particle frame failed: {}", err);
                }
            })
        };

        log::info!("particle layer attached to #{} ({}x{})", canvas_id, width, height);
        Ok(ParticleLayer {
            engine,
            scheduler,
            frame,
            toggle,
            _listeners: listeners,
        })
    }

    fn reflect_toggle(&self) {
        if let Some(toggle) = &self.toggle {
            let active = self.engine.borrow().is_active();
            if let Err(err) = reflect_state(toggle.element(), active) {
                log::warn!("{}", err);
            }
        }
    }
}

impl Drop for ParticleLayer {
    fn drop(&mut self) {
        self.scheduler.cancel(self.frame);
    }
}

fn viewport_size(window: &Window) -> (f64, f64) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (dim(window.inner_width()), dim(window.inner_height()))
}

fn resize_listener(window: &Window, engine: SharedEngine) -> Result<EventListener, EngineError> {
    let resized = window.clone();
    EventListener::new(window, "resize", move |event| {
        let (width, height) = viewport_size(&resized);
        engine
            .borrow_mut()
            .handle_input(&InputEvent::resize(width, height, event.time_stamp()));
    })
}

fn mouse_listener(
    document: &web_sys::Document,
    engine: SharedEngine,
) -> Result<EventListener, EngineError> {
    EventListener::new(document, "mousemove", move |event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            engine.borrow_mut().handle_input(&InputEvent::pointer_move(
                mouse.client_x() as f64,
                mouse.client_y() as f64,
                event.time_stamp(),
            ));
        }
    })
}

// Touch drags draw particles instead of scrolling while the effect is on
fn touch_listener(
    document: &web_sys::Document,
    engine: SharedEngine,
) -> Result<EventListener, EngineError> {
    EventListener::new_non_passive(document, "touchmove", move |event| {
        let touch = event
            .dyn_ref::<TouchEvent>()
            .and_then(|touch_event| touch_event.touches().get(0));
        if let Some(touch) = touch {
            let mut engine = engine.borrow_mut();
            engine.handle_input(&InputEvent::touch_move(
                touch.client_x() as f64,
                touch.client_y() as f64,
                event.time_stamp(),
            ));
            if engine.is_active() {
                event.prevent_default();
            }
        }
    })
}
