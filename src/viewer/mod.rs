//! Browser bindings - the JavaScript-facing sequence player.
//!
//! This module provides the WASM-exported types:
//! - `CanvasSequence`: one image sequence on one `<canvas>`, with window
//!   resize handling and image preloading wired up automatically
//! - `SequenceSections`: the page-level section context (section → sequence
//!   lookup, background switching, scroll restoration)
//!
//! Player state lives in `Rc<RefCell<..>>`. Event closures hold `Weak`
//! references and never keep a borrow while user callbacks run.

mod events;
mod images;
mod sections;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;

use crate::config::PlayerOptions;
use crate::error::SequenceError;
use crate::player::SequencePlayer;
use crate::render::CanvasRenderer;
use crate::scrub::{ScrubBinding, ScrubDirection, SequenceControl};

pub use sections::SequenceSections;

pub(crate) type SharedPlayer = Rc<RefCell<SequencePlayer<CanvasRenderer>>>;

/// Panic hook and console logger; safe to call repeatedly.
pub(crate) fn install_hooks() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Pull the ready callback out of a JS options object (`onReady` or `onLoadComplete`).
fn ready_callback(options: &JsValue) -> Option<Function> {
    if !options.is_object() {
        return None;
    }
    ["onReady", "onLoadComplete"].iter().find_map(|key| {
        Reflect::get(options, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    })
}

/// Image sequence player bound to a canvas element.
#[wasm_bindgen]
#[derive(Clone)]
pub struct CanvasSequence {
    state: SharedPlayer,
}

#[wasm_bindgen]
impl CanvasSequence {
    /// Create a player from an options object:
    /// `{ surfaceId, sources, scaling?, alignment?, alpha?, onReady? }`.
    ///
    /// Never throws. A missing canvas or malformed options leave an inert
    /// player whose methods do nothing.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> CanvasSequence {
        install_hooks();
        let on_ready = ready_callback(&options);
        let parsed = if options.is_undefined() || options.is_null() {
            PlayerOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).unwrap_or_else(|e| {
                log::error!("Invalid sequence options: {e}");
                PlayerOptions::default()
            })
        };
        Self::from_options(parsed, on_ready)
    }

    /// Show the frame nearest to `frame` (clamped to the sequence).
    #[wasm_bindgen]
    pub fn render(&self, frame: f64) {
        self.with_player(|p| p.render(frame));
    }

    /// Re-measure the window and redraw the current frame.
    #[wasm_bindgen]
    pub fn resize(&self) {
        self.with_player(SequencePlayer::resize);
    }

    /// Render the frame for a scroll-trigger progress in `[0, 1]`.
    #[wasm_bindgen]
    pub fn scrub(&self, progress: f64, reverse: Option<bool>) {
        let direction = if reverse.unwrap_or(false) {
            ScrubDirection::Reverse
        } else {
            ScrubDirection::Forward
        };
        let mut handle = self.clone();
        ScrubBinding::new(direction).apply(&mut handle, progress);
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.state
            .try_borrow()
            .map(|p| p.progress())
            .unwrap_or(0.0)
    }

    #[wasm_bindgen(setter)]
    pub fn set_progress(&self, progress: f64) {
        self.with_player(|p| p.set_progress(progress));
    }

    #[wasm_bindgen(getter, js_name = frameCount)]
    pub fn frame_count(&self) -> usize {
        self.state.try_borrow().map(|p| p.frame_count()).unwrap_or(0)
    }

    #[wasm_bindgen(getter, js_name = currentFrame)]
    pub fn current_frame(&self) -> usize {
        self.state
            .try_borrow()
            .map(|p| p.current_frame())
            .unwrap_or(0)
    }

    #[wasm_bindgen(getter, js_name = loadedCount)]
    pub fn loaded_count(&self) -> usize {
        self.state
            .try_borrow()
            .map(|p| p.loaded_count())
            .unwrap_or(0)
    }

    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.state.try_borrow().map(|p| p.is_ready()).unwrap_or(false)
    }

    /// Detach listeners and free the canvas buffer and images.
    #[wasm_bindgen]
    pub fn destroy(&self) {
        self.with_player(SequencePlayer::destroy);
    }
}

impl CanvasSequence {
    pub(crate) fn from_options(options: PlayerOptions, on_ready: Option<Function>) -> Self {
        let surface = match CanvasRenderer::from_element_id(&options.surface_id, options.alpha) {
            Ok(surface) => Some(surface),
            Err(SequenceError::SurfaceNotFound(_)) => None,
            Err(e) => {
                log::error!("#{}: {e}", options.surface_id);
                None
            }
        };
        let mut player = SequencePlayer::new(surface, options);
        if let Some(callback) = on_ready {
            player.set_on_ready(Some(Box::new(move || {
                if let Err(e) = callback.call0(&JsValue::NULL) {
                    log::warn!("onReady callback threw: {e:?}");
                }
            })));
        }
        let inert = player.is_inert();
        let state = Rc::new(RefCell::new(player));
        if !inert {
            events::subscribe_resize(&state);
            images::preload(&state);
        }
        Self { state }
    }

    /// Run `f` on the player unless it is already borrowed further up the stack.
    fn with_player(&self, f: impl FnOnce(&mut SequencePlayer<CanvasRenderer>)) {
        match self.state.try_borrow_mut() {
            Ok(mut player) => f(&mut player),
            Err(_) => log::debug!("sequence busy; call skipped"),
        }
    }
}

impl SequenceControl for CanvasSequence {
    fn frame_count(&self) -> usize {
        CanvasSequence::frame_count(self)
    }

    fn render(&mut self, frame: f64) {
        CanvasSequence::render(self, frame);
    }

    fn resize(&mut self) {
        CanvasSequence::resize(self);
    }
}
