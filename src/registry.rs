//! Section → sequence lookup and background coordination.
//!
//! A page has numbered sections (0 is the hero). Some sections are backed by
//! a scroll-scrubbed sequence, some by a static background layer, some by
//! nothing. [`SectionContext`] is built once at page init and passed to
//! whichever scroll handler needs to find "the player for this section".

use std::collections::{BTreeMap, HashMap};

use crate::scrub::{ScrubBinding, SequenceControl};

/// Section number; 0 is the hero, company sections start at 1.
pub type SectionId = u32;

/// Hero is active while its bottom edge is below this fraction of the viewport.
const HERO_ACTIVE_FRACTION: f64 = 0.2;
/// A section is active when it straddles this fraction of the viewport.
const SECTION_FOCUS_FRACTION: f64 = 0.5;

/// Section id → player.
#[derive(Debug)]
pub struct SequenceRegistry<P> {
    players: HashMap<SectionId, P>,
}

impl<P> Default for SequenceRegistry<P> {
    fn default() -> Self {
        Self {
            players: HashMap::new(),
        }
    }
}

impl<P> SequenceRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `player` for `id`, returning any player it replaced.
    pub fn register(&mut self, id: SectionId, player: P) -> Option<P> {
        self.players.insert(id, player)
    }

    pub fn get(&self, id: SectionId) -> Option<&P> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: SectionId) -> Option<&mut P> {
        self.players.get_mut(&id)
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<SectionId> {
        let mut ids: Vec<SectionId> = self.players.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SectionId, &mut P)> {
        self.players.iter_mut().map(|(id, p)| (*id, p))
    }

    /// Drop every player (page teardown).
    pub fn clear(&mut self) {
        self.players.clear();
    }
}

/// Which background layers to show and hide after a section change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackgroundSwitch {
    pub show: Option<String>,
    pub hide: Vec<String>,
}

/// Vertical extent of an element relative to the viewport top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

/// Layout snapshot used to work out the active section after a reload.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProbe {
    /// Hero bottom edge, if the hero exists.
    pub hero_bottom: Option<f64>,
    /// Company sections in document order (section `i + 1`).
    pub sections: Vec<Bounds>,
    pub viewport_height: f64,
}

impl SectionProbe {
    /// The section that should be active for this layout.
    pub fn active_section(&self) -> SectionId {
        if let Some(bottom) = self.hero_bottom {
            if bottom > self.viewport_height * HERO_ACTIVE_FRACTION {
                return 0;
            }
        }
        let focus = self.viewport_height * SECTION_FOCUS_FRACTION;
        self.sections
            .iter()
            .enumerate()
            .rev()
            .find(|(_, b)| b.top <= focus && b.bottom > focus)
            .and_then(|(i, _)| SectionId::try_from(i + 1).ok())
            .unwrap_or(0)
    }
}

/// Registry plus background bookkeeping shared by the scroll handlers.
#[derive(Debug)]
pub struct SectionContext<P> {
    registry: SequenceRegistry<P>,
    bindings: HashMap<SectionId, ScrubBinding>,
    backgrounds: BTreeMap<SectionId, String>,
    active: Option<SectionId>,
}

impl<P> Default for SectionContext<P> {
    fn default() -> Self {
        Self {
            registry: SequenceRegistry::new(),
            bindings: HashMap::new(),
            backgrounds: BTreeMap::new(),
            active: None,
        }
    }
}

impl<P> SectionContext<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &SequenceRegistry<P> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SequenceRegistry<P> {
        &mut self.registry
    }

    /// Register a sequence-backed section with its scrub binding.
    pub fn register(&mut self, id: SectionId, player: P, binding: ScrubBinding) -> Option<P> {
        self.bindings.insert(id, binding);
        self.registry.register(id, player)
    }

    pub fn player(&self, id: SectionId) -> Option<&P> {
        self.registry.get(id)
    }

    pub fn player_mut(&mut self, id: SectionId) -> Option<&mut P> {
        self.registry.get_mut(id)
    }

    pub fn binding(&self, id: SectionId) -> ScrubBinding {
        self.bindings.get(&id).copied().unwrap_or_default()
    }

    /// Element id of the background layer for `id`.
    pub fn set_background(&mut self, id: SectionId, element_id: impl Into<String>) {
        self.backgrounds.insert(id, element_id.into());
    }

    pub fn background(&self, id: SectionId) -> Option<&str> {
        self.backgrounds.get(&id).map(String::as_str)
    }

    pub fn active_section(&self) -> Option<SectionId> {
        self.active
    }

    /// Make `id` the active section: its background shows, every other hides.
    pub fn activate(&mut self, id: SectionId) -> BackgroundSwitch {
        self.active = Some(id);
        let show = self.backgrounds.get(&id).cloned();
        let hide = self
            .backgrounds
            .iter()
            .filter(|(section, _)| **section != id)
            .map(|(_, element)| element.clone())
            .collect();
        BackgroundSwitch { show, hide }
    }

    /// Forget every player and background (page teardown).
    pub fn clear(&mut self) {
        self.registry.clear();
        self.bindings.clear();
        self.backgrounds.clear();
        self.active = None;
    }
}

impl<P: SequenceControl> SectionContext<P> {
    /// Drive section `id` from its trigger progress. Returns false for sections
    /// without a sequence.
    pub fn scrub(&mut self, id: SectionId, progress: f64) -> bool {
        let binding = self.binding(id);
        match self.registry.get_mut(id) {
            Some(player) => {
                binding.apply(player, progress);
                true
            }
            None => false,
        }
    }

    /// Re-derive the active section from layout, switch backgrounds and
    /// resize that section's player so it paints at the current size.
    pub fn restore(&mut self, probe: &SectionProbe) -> (SectionId, BackgroundSwitch) {
        let id = probe.active_section();
        log::debug!("restored active section {id}");
        let switch = self.activate(id);
        if id > 0 {
            if let Some(player) = self.registry.get_mut(id) {
                player.resize();
            }
        }
        (id, switch)
    }

    /// Resize every registered player.
    pub fn resize_all(&mut self) {
        for (_, player) in self.registry.iter_mut() {
            player.resize();
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_lookup_is_none() {
        let mut reg: SequenceRegistry<&str> = SequenceRegistry::new();
        assert!(reg.get(4).is_none());
        assert!(reg.register(1, "limited").is_none());
        assert_eq!(reg.register(1, "limited-2"), Some("limited"));
        assert_eq!(reg.get(1), Some(&"limited-2"));
        assert_eq!(reg.len(), 1);
        reg.clear();
        assert!(reg.is_empty());
    }

    #[test]
    fn ids_are_sorted() {
        let mut reg = SequenceRegistry::new();
        for id in [9, 2, 5] {
            reg.register(id, ());
        }
        assert_eq!(reg.ids(), vec![2, 5, 9]);
    }

    #[test]
    fn activate_shows_only_own_background() {
        let mut ctx: SectionContext<()> = SectionContext::new();
        ctx.set_background(1, "canvas-limited");
        ctx.set_background(10, "bg-asia");
        ctx.set_background(11, "bg-surya");
        let switch = ctx.activate(10);
        assert_eq!(switch.show.as_deref(), Some("bg-asia"));
        assert_eq!(switch.hide, vec!["canvas-limited", "bg-surya"]);
        assert_eq!(ctx.active_section(), Some(10));
    }

    #[test]
    fn hero_hides_everything() {
        let mut ctx: SectionContext<()> = SectionContext::new();
        ctx.set_background(1, "canvas-limited");
        let switch = ctx.activate(0);
        assert!(switch.show.is_none());
        assert_eq!(switch.hide, vec!["canvas-limited"]);
    }

    #[test]
    fn probe_prefers_visible_hero() {
        let probe = SectionProbe {
            hero_bottom: Some(300.0),
            sections: vec![Bounds::new(100.0, 900.0)],
            viewport_height: 1000.0,
        };
        assert_eq!(probe.active_section(), 0);
    }

    #[test]
    fn probe_picks_section_straddling_middle() {
        let probe = SectionProbe {
            hero_bottom: Some(-200.0),
            sections: vec![
                Bounds::new(-1200.0, -200.0),
                Bounds::new(-200.0, 800.0),
                Bounds::new(800.0, 1800.0),
            ],
            viewport_height: 1000.0,
        };
        assert_eq!(probe.active_section(), 2);
    }

    #[test]
    fn probe_without_match_falls_back_to_hero() {
        let probe = SectionProbe {
            hero_bottom: None,
            sections: vec![Bounds::new(600.0, 900.0)],
            viewport_height: 1000.0,
        };
        assert_eq!(probe.active_section(), 0);
    }
}
