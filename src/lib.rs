//! scrollseq - scroll-scrubbed image sequences for the web
//!
//! Plays a numbered series of still frames on a `<canvas>` as a flip-book
//! driven by page scroll, via WebAssembly and Canvas 2D:
//! - Cover/contain fitting with CSS-like alignment
//! - High-DPI backing buffers that follow window resizes
//! - Parallel preloading with a single "ready" notification
//! - Section registry with background switching and scroll restoration
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { CanvasSequence } from 'scrollseq';
//! await init();
//! const seq = new CanvasSequence({
//!   surfaceId: 'canvas-limited',
//!   sources: frames.map((f) => `/sequence/limited/${f}`),
//!   onReady: () => console.log('all frames settled'),
//! });
//! trigger.onUpdate = (self) => seq.scrub(self.progress);
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod fit;
pub mod frame;
pub mod loader;
pub mod player;
pub mod registry;
pub mod scrub;
pub mod subscription;

// Rendering modules
pub mod layout;
pub mod render;
#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::{PageManifest, PlayerOptions, SequenceEntry};
pub use error::{Result, SequenceError};
pub use fit::{fit_rect, Alignment, FitRect, ScalingMode};
pub use player::SequencePlayer;
pub use registry::{SectionContext, SectionId, SectionProbe, SequenceRegistry};
pub use scrub::{ScrubBinding, ScrubDirection, SequenceControl};

#[cfg(target_arch = "wasm32")]
pub use viewer::{CanvasSequence, SequenceSections};

/// Validate a page manifest and return it normalized as JSON.
///
/// # Errors
/// Returns an error if the manifest is malformed or declares a section twice.
#[wasm_bindgen(js_name = parseManifest)]
pub fn parse_manifest(json: &str) -> std::result::Result<String, JsValue> {
    let manifest = PageManifest::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&manifest)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Compute where a frame of `image_w`×`image_h` lands in a viewport.
///
/// `mode` is `"cover"` or `"contain"`, `alignment` a CSS-like position such
/// as `"top"` or `"bottom right"`. Unknown values fall back to cover/center.
#[wasm_bindgen(js_name = fitRect)]
pub fn fit_rect_js(
    image_w: f64,
    image_h: f64,
    viewport_w: f64,
    viewport_h: f64,
    mode: Option<String>,
    alignment: Option<String>,
) -> std::result::Result<JsValue, JsValue> {
    let mode = mode.and_then(|m| m.parse().ok()).unwrap_or_default();
    let alignment = alignment.and_then(|a| a.parse().ok()).unwrap_or_default();
    let rect = fit_rect(image_w, image_h, viewport_w, viewport_h, mode, alignment);
    serde_wasm_bindgen::to_value(&rect)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Set the console log level (`"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => log::warn!("Unknown log level '{level}'"),
    }
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
