//! Browser tests for the canvas bindings.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use scrollseq::{CanvasSequence, SequenceSections};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

/// 1×1 transparent PNG.
const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";
/// Decodes to nothing, so the image fires `error`.
const BROKEN: &str = "data:image/png;base64,AAAA";

wasm_bindgen_test_configure!(run_in_browser);

fn add_canvas(id: &str) -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: web_sys::HtmlCanvasElement =
        document.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

fn options(surface_id: &str, sources: &[&str]) -> JsValue {
    let obj = js_sys::Object::new();
    let list: js_sys::Array = sources.iter().map(|s| JsValue::from_str(s)).collect();
    js_sys::Reflect::set(&obj, &"surfaceId".into(), &surface_id.into()).unwrap();
    js_sys::Reflect::set(&obj, &"sources".into(), &list).unwrap();
    obj.into()
}

#[wasm_bindgen_test]
fn missing_canvas_is_inert() {
    let seq = CanvasSequence::new(options("no-such-canvas", &["a.jpg", "b.jpg"]));
    seq.render(1.0);
    seq.resize();
    seq.set_progress(0.5);
    assert_eq!(seq.frame_count(), 2);
    assert_eq!(seq.current_frame(), 0);
    seq.destroy();
}

#[wasm_bindgen_test]
fn canvas_backing_buffer_tracks_window() {
    let canvas = add_canvas("seq-size");
    let seq = CanvasSequence::new(options("seq-size", &["missing-1.jpg"]));
    let window = web_sys::window().unwrap();
    let dpr = window.device_pixel_ratio();
    let css_w = window.inner_width().unwrap().as_f64().unwrap();
    assert_eq!(f64::from(canvas.width()), (css_w * dpr).floor());
    seq.destroy();
    assert_eq!(canvas.width(), 1);
}

#[wasm_bindgen_test]
fn garbage_options_do_not_throw() {
    let seq = CanvasSequence::new(JsValue::from_f64(42.0));
    assert_eq!(seq.frame_count(), 0);
    seq.render(f64::NAN);
    assert_eq!(seq.progress(), 0.0);
}

#[wasm_bindgen_test]
fn sections_from_manifest() {
    add_canvas("seq-section");
    let json = r#"{"sequences":[{"section":3,"surfaceId":"seq-section","frames":["x.jpg","y.jpg"]}]}"#;
    let mut sections = SequenceSections::from_manifest(json).unwrap();
    assert!(sections.has(3));
    assert!(!sections.has(4));
    assert!(sections.scrub(3, 1.0));
    assert_eq!(sections.get(3).unwrap().current_frame(), 1);
    sections.destroy();
    assert!(!sections.has(3));
}

#[wasm_bindgen_test]
fn duplicate_sections_are_rejected() {
    let json = r#"{"sequences":[{"section":1,"surfaceId":"a","frames":[]},{"section":1,"surfaceId":"b","frames":[]}]}"#;
    assert!(SequenceSections::from_manifest(json).is_err());
}

/// A promise plus the function that resolves it, for use as a JS callback.
fn ready_promise() -> (js_sys::Promise, js_sys::Function) {
    let mut resolve_fn = None;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| resolve_fn = Some(resolve));
    (promise, resolve_fn.unwrap())
}

#[wasm_bindgen_test]
async fn on_ready_fires_after_preload() {
    add_canvas("seq-ready");
    let (promise, resolve) = ready_promise();
    let opts = options("seq-ready", &[PIXEL, PIXEL]);
    js_sys::Reflect::set(&opts, &"onReady".into(), &resolve).unwrap();

    let seq = CanvasSequence::new(opts);
    JsFuture::from(promise).await.unwrap();
    assert!(seq.is_ready());
    assert_eq!(seq.loaded_count(), 2);
    seq.destroy();
}

#[wasm_bindgen_test]
async fn on_load_complete_fires_despite_failures() {
    add_canvas("seq-broken");
    let (promise, resolve) = ready_promise();
    let opts = options("seq-broken", &[BROKEN, PIXEL, BROKEN]);
    js_sys::Reflect::set(&opts, &"onLoadComplete".into(), &resolve).unwrap();

    let seq = CanvasSequence::new(opts);
    JsFuture::from(promise).await.unwrap();
    assert!(seq.is_ready());
    assert_eq!(seq.loaded_count(), 3);
    seq.render(1.0);
    assert_eq!(seq.current_frame(), 1);
    seq.destroy();
}
