//! Window resize listener for `CanvasSequence`.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::SharedPlayer;
use crate::subscription::Subscription;

/// Resize the player whenever the window resizes; detached on destroy.
pub(crate) fn subscribe_resize(state: &SharedPlayer) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let weak_state = Rc::downgrade(state);
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let Some(state) = weak_state.upgrade() else {
            return;
        };
        if let Ok(mut player) = state.try_borrow_mut() {
            player.resize();
        }
    }) as Box<dyn FnMut(web_sys::Event)>);

    if window
        .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("could not listen for window resize");
        return;
    }

    let subscription = Subscription::new("resize", move || {
        let _ = window.remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    });
    state.borrow_mut().subscribe(subscription);
}
