//! Page-level section context exported to JavaScript.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::{install_hooks, CanvasSequence};
use crate::config::PageManifest;
use crate::registry::{BackgroundSwitch, Bounds, SectionContext, SectionId, SectionProbe};
use crate::scrub::ScrubBinding;

/// Section → sequence lookup with background switching.
///
/// Scroll handlers hold one of these and ask it for "the sequence of section
/// N"; sections without a sequence simply have nothing to scrub.
#[wasm_bindgen]
#[derive(Default)]
pub struct SequenceSections {
    context: SectionContext<CanvasSequence>,
    /// Manifest sequences not tied to a section (intro, overlays).
    standalone: Vec<CanvasSequence>,
}

#[wasm_bindgen]
impl SequenceSections {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SequenceSections {
        install_hooks();
        SequenceSections::default()
    }

    /// Build players for every sequence in a JSON page manifest.
    #[wasm_bindgen(js_name = fromManifest)]
    pub fn from_manifest(json: &str) -> Result<SequenceSections, JsValue> {
        install_hooks();
        let manifest = PageManifest::from_json(json)?;
        let mut sections = SequenceSections::default();
        for entry in &manifest.sequences {
            let sequence = CanvasSequence::from_options(entry.player_options(), None);
            match entry.section {
                Some(id) => {
                    if let Some(background) = &entry.background {
                        sections.context.set_background(id, background.clone());
                    }
                    sections.context.register(id, sequence, entry.scrub_binding());
                }
                None => sections.standalone.push(sequence),
            }
        }
        for background in &manifest.backgrounds {
            sections
                .context
                .set_background(background.section, background.element_id.clone());
        }
        log::info!(
            "Loaded manifest: {} sections, {} frames",
            sections.context.registry().len(),
            manifest.total_frames()
        );
        Ok(sections)
    }

    /// Register (or replace) the sequence for section `id`.
    #[wasm_bindgen]
    pub fn register(&mut self, id: SectionId, sequence: &CanvasSequence, reverse: Option<bool>) {
        let binding = if reverse.unwrap_or(false) {
            ScrubBinding::reversed()
        } else {
            ScrubBinding::default()
        };
        if let Some(previous) = self.context.register(id, sequence.clone(), binding) {
            if !Rc::ptr_eq(&previous.state, &sequence.state) {
                previous.destroy();
            }
        }
    }

    #[wasm_bindgen(js_name = setBackground)]
    pub fn set_background(&mut self, id: SectionId, element_id: String) {
        self.context.set_background(id, element_id);
    }

    /// The sequence for section `id`, if it has one.
    #[wasm_bindgen]
    pub fn get(&self, id: SectionId) -> Option<CanvasSequence> {
        self.context.player(id).cloned()
    }

    #[wasm_bindgen]
    pub fn has(&self, id: SectionId) -> bool {
        self.context.registry().contains(id)
    }

    /// A sequence declared without a section, looked up by canvas id.
    #[wasm_bindgen]
    pub fn standalone(&self, surface_id: &str) -> Option<CanvasSequence> {
        self.standalone
            .iter()
            .find(|s| s.state.try_borrow().is_ok_and(|p| p.surface_id() == surface_id))
            .cloned()
    }

    /// Drive section `id` from its trigger progress.
    #[wasm_bindgen]
    pub fn scrub(&mut self, id: SectionId, progress: f64) -> bool {
        self.context.scrub(id, progress)
    }

    /// Make `id` the active section and fade background layers accordingly.
    #[wasm_bindgen]
    pub fn activate(&mut self, id: SectionId) {
        let switch = self.context.activate(id);
        apply_background(&switch);
    }

    #[wasm_bindgen(getter, js_name = activeSection)]
    pub fn active_section(&self) -> Option<SectionId> {
        self.context.active_section()
    }

    /// Work out the active section from layout after a reload, show its
    /// background and repaint its sequence. Returns the section id.
    ///
    /// `tops`/`bottoms` are the section rects (section `i + 1`) relative to
    /// the viewport; `hero_bottom` is omitted when there is no hero.
    #[wasm_bindgen]
    pub fn restore(
        &mut self,
        hero_bottom: Option<f64>,
        tops: Vec<f64>,
        bottoms: Vec<f64>,
        viewport_height: f64,
    ) -> SectionId {
        let probe = SectionProbe {
            hero_bottom,
            sections: tops
                .iter()
                .zip(bottoms.iter())
                .map(|(top, bottom)| Bounds::new(*top, *bottom))
                .collect(),
            viewport_height,
        };
        let (id, switch) = self.context.restore(&probe);
        apply_background(&switch);
        id
    }

    #[wasm_bindgen(js_name = resizeAll)]
    pub fn resize_all(&mut self) {
        self.context.resize_all();
        for sequence in &self.standalone {
            sequence.resize();
        }
    }

    /// Destroy every sequence and forget all sections.
    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        for (_, sequence) in self.context.registry_mut().iter_mut() {
            sequence.destroy();
        }
        for sequence in self.standalone.drain(..) {
            sequence.destroy();
        }
        self.context.clear();
    }
}

/// Set layer opacity: the shown background goes to 1, the rest to 0.
fn apply_background(switch: &BackgroundSwitch) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let set_opacity = |id: &str, value: &str| {
        let Some(element) = document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            log::debug!("background layer #{id} not found");
            return;
        };
        if let Err(e) = element.style().set_property("opacity", value) {
            log::warn!("could not set opacity on #{id}: {e:?}");
        }
    };
    for id in &switch.hide {
        set_opacity(id, "0");
    }
    if let Some(id) = &switch.show {
        set_opacity(id, "1");
    }
}
