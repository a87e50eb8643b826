//! Frame preloading with `<img>` elements.
//!
//! Every source gets its own image element whose load/error handlers report
//! back to the player. Handlers are registered as subscriptions so destroy
//! detaches them; the loads themselves are never aborted.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use super::SharedPlayer;
use crate::subscription::Subscription;

/// Start loading every frame of the player's sequence.
pub(crate) fn preload(state: &SharedPlayer) {
    let sources: Vec<String> = state.borrow().sources().to_vec();
    for (index, source) in sources.iter().enumerate() {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("could not create image for {source}: {e:?}");
                settle(state, index, false);
                continue;
            }
        };

        let onload = completion_handler(state, index, true);
        let onerror = completion_handler(state, index, false);
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let handlers_on = image.clone();
        let subscription = Subscription::new("image", move || {
            handlers_on.set_onload(None);
            handlers_on.set_onerror(None);
            drop(onload);
            drop(onerror);
        });
        {
            let mut player = state.borrow_mut();
            player.attach_image(index, image.clone());
            player.subscribe(subscription);
        }
        image.set_src(source);
    }
}

fn completion_handler(
    state: &SharedPlayer,
    index: usize,
    loaded: bool,
) -> Closure<dyn FnMut(web_sys::Event)> {
    let weak_state = Rc::downgrade(state);
    Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some(state) = weak_state.upgrade() {
            settle(&state, index, loaded);
        }
    }) as Box<dyn FnMut(web_sys::Event)>)
}

/// Record a completion, then run the ready callback with the borrow released.
///
/// Completions arrive as event-loop tasks, so no other borrow of the player
/// is live here; every completion must be counted for `onReady` to fire.
fn settle(state: &SharedPlayer, index: usize, loaded: bool) {
    let notice = {
        let mut player = state.borrow_mut();
        if loaded {
            player.frame_loaded(index)
        } else {
            player.frame_failed(index)
        }
    };
    if let Some(notice) = notice {
        notice.notify();
    }
}
