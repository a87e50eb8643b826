//! Section context driving real players: scrubbing, restoration, teardown.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{frame_name, loaded_player, shown, TestPlayer};
use scrollseq::registry::Bounds;
use scrollseq::{ScrubBinding, SectionContext, SectionProbe};

fn page() -> SectionContext<TestPlayer> {
    let mut ctx = SectionContext::new();
    ctx.register(1, loaded_player(40), ScrubBinding::default());
    ctx.register(2, loaded_player(51), ScrubBinding::reversed());
    ctx.set_background(1, "canvas-limited");
    ctx.set_background(2, "canvas-precision");
    ctx.set_background(10, "bg-asia");
    ctx
}

#[test]
fn test_scrub_drives_registered_section() {
    let mut ctx = page();
    assert!(ctx.scrub(1, 0.5));
    let player = ctx.player(1).unwrap();
    assert_eq!(player.current_frame(), 20);
    assert_eq!(shown(player), Some(frame_name(20)));
}

#[test]
fn test_reverse_section_starts_at_last_frame() {
    let mut ctx = page();
    ctx.scrub(2, 0.0);
    assert_eq!(ctx.player(2).unwrap().current_frame(), 50);
    ctx.scrub(2, 1.0);
    assert_eq!(ctx.player(2).unwrap().current_frame(), 0);
}

#[test]
fn test_scrub_unknown_section_is_noop() {
    let mut ctx = page();
    assert!(!ctx.scrub(10, 0.5));
    assert!(!ctx.scrub(99, 0.5));
    assert!(ctx.player(99).is_none());
}

#[test]
fn test_restore_activates_section_under_middle() {
    let mut ctx = page();
    let probe = SectionProbe {
        hero_bottom: Some(-500.0),
        sections: vec![Bounds::new(-1400.0, -400.0), Bounds::new(-400.0, 700.0)],
        viewport_height: 900.0,
    };
    let (id, switch) = ctx.restore(&probe);
    assert_eq!(id, 2);
    assert_eq!(switch.show.as_deref(), Some("canvas-precision"));
    assert_eq!(switch.hide, vec!["canvas-limited", "bg-asia"]);
    assert_eq!(ctx.active_section(), Some(2));
}

#[test]
fn test_restore_at_top_shows_hero() {
    let mut ctx = page();
    let probe = SectionProbe {
        hero_bottom: Some(900.0),
        sections: vec![Bounds::new(900.0, 1900.0)],
        viewport_height: 900.0,
    };
    let (id, switch) = ctx.restore(&probe);
    assert_eq!(id, 0);
    assert!(switch.show.is_none());
    assert_eq!(switch.hide.len(), 3);
}

#[test]
fn test_resize_all_repaints_every_player() {
    let mut ctx = page();
    ctx.scrub(1, 1.0);
    for (_, player) in ctx.registry_mut().iter_mut() {
        player.surface_mut().unwrap().set_window(800.0, 1200.0, 2.0);
    }
    ctx.resize_all();
    let player = ctx.player(1).unwrap();
    assert_eq!(player.surface().unwrap().backing_size(), (1600, 2400));
    assert_eq!(shown(player), Some(frame_name(39)));
}

#[test]
fn test_clear_forgets_everything() {
    let mut ctx = page();
    ctx.activate(1);
    ctx.clear();
    assert!(ctx.registry().is_empty());
    assert!(ctx.background(1).is_none());
    assert_eq!(ctx.active_section(), None);
}
