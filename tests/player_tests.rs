//! Sequence player behaviour against a recording surface.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{desktop, fail, frame_name, load, loaded_player, pending_player, shown, sources};
use scrollseq::config::PlayerOptions;
use scrollseq::fit::{Alignment, ScalingMode};
use scrollseq::render::{BufferContent, MemoryImage, RecordingSurface, SurfaceOp};
use scrollseq::subscription::Subscription;
use scrollseq::SequencePlayer;
use test_case::test_case;

#[test_case(-5.0, 0 ; "negative clamps to first")]
#[test_case(999.0, 39 ; "past end clamps to last")]
#[test_case(3.6, 4 ; "fraction rounds up")]
#[test_case(3.4, 3 ; "fraction rounds down")]
#[test_case(f64::INFINITY, 39 ; "infinity clamps to last")]
#[test_case(f64::NEG_INFINITY, 0 ; "negative infinity clamps to first")]
fn test_render_clamps_and_rounds(value: f64, expected: usize) {
    let mut player = loaded_player(40);
    player.render(value);
    assert_eq!(player.current_frame(), expected);
    assert_eq!(shown(&player), Some(frame_name(expected)));
}

#[test]
fn test_render_nan_keeps_current_frame() {
    let mut player = loaded_player(10);
    player.render(6.0);
    player.render(f64::NAN);
    assert_eq!(player.current_frame(), 6);
    assert_eq!(shown(&player), Some(frame_name(6)));
}

#[test]
fn test_render_is_idempotent() {
    let mut player = loaded_player(40);
    player.render(12.0);
    let first = player.surface().unwrap().content().clone();
    player.render(12.0);
    let second = player.surface().unwrap().content().clone();
    assert_eq!(first, second);
}

#[test]
fn test_progress_round_trip() {
    let n = 40;
    let mut player = loaded_player(n);
    for step in 0..=20 {
        let p = f64::from(step) / 20.0;
        player.set_progress(p);
        let recovered = (player.progress() * (n - 1) as f64).round() as usize;
        assert_eq!(recovered, (p * (n - 1) as f64).round() as usize, "p = {p}");
    }
}

#[test]
fn test_progress_of_first_and_last() {
    let mut player = loaded_player(5);
    assert_eq!(player.progress(), 0.0);
    player.render(4.0);
    assert_eq!(player.progress(), 1.0);
}

#[test]
fn test_single_frame_progress_is_zero() {
    let mut player = loaded_player(1);
    assert_eq!(player.progress(), 0.0);
    player.set_progress(0.7);
    assert_eq!(player.current_frame(), 0);
    assert_eq!(player.progress(), 0.0);
    assert_eq!(shown(&player), Some(frame_name(0)));
}

#[test]
fn test_construction_sizes_buffer_for_dpr() {
    let player = pending_player(3, RecordingSurface::new(390.0, 844.0, 3.0));
    let surface = player.surface().unwrap();
    assert_eq!(surface.backing_size(), (1170, 2532));
    assert_eq!(surface.transform_scale(), 3.0);
    assert_eq!(player.viewport().css_width, 390.0);
}

#[test]
fn test_resize_before_any_load_leaves_buffer_blank() {
    let mut player = pending_player(10, desktop());
    player.resize();
    player.resize();
    let surface = player.surface().unwrap();
    assert_eq!(surface.content(), &BufferContent::Blank);
    assert_eq!(surface.draw_count(), 0);
}

#[test]
fn test_resize_redraws_current_frame_at_new_size() {
    let mut player = loaded_player(20);
    player.render(7.0);
    player
        .surface_mut()
        .unwrap()
        .set_window(768.0, 1024.0, 2.0);
    player.surface_mut().unwrap().take_ops();
    player.resize();

    let surface = player.surface().unwrap();
    assert_eq!(surface.backing_size(), (1536, 2048));
    let ops = surface.ops();
    assert!(matches!(ops[0], SurfaceOp::Resize { width: 1536, height: 2048, .. }));
    assert_eq!(shown(&player), Some(frame_name(7)));
    match player.surface().unwrap().content() {
        BufferContent::Image { rect, .. } => assert!(rect.covers(768.0, 1024.0)),
        BufferContent::Blank => panic!("expected frame 7 after resize"),
    }
}

#[test]
fn test_unloaded_frame_keeps_previous_picture() {
    let mut player = pending_player(10, desktop());
    load(&mut player, 0);
    assert_eq!(shown(&player), Some(frame_name(0)));

    player.render(5.0);
    assert_eq!(player.current_frame(), 5);
    assert_eq!(shown(&player), Some(frame_name(0)));
}

#[test]
fn test_late_current_frame_is_drawn_on_arrival() {
    let mut player = pending_player(10, desktop());
    player.render(5.0);
    assert_eq!(shown(&player), None);

    load(&mut player, 3);
    assert_eq!(shown(&player), None);

    load(&mut player, 5);
    assert_eq!(shown(&player), Some(frame_name(5)));
}

#[test]
fn test_failed_frame_never_draws() {
    let mut player = pending_player(3, desktop());
    load(&mut player, 0);
    fail(&mut player, 1);
    player.render(1.0);
    assert_eq!(shown(&player), Some(frame_name(0)));
    assert_eq!(player.loaded_count(), 2);
}

#[test]
fn test_cold_start_draws_first_frame() {
    let mut player = pending_player(5, desktop());
    load(&mut player, 0);
    assert_eq!(player.current_frame(), 0);
    assert_eq!(shown(&player), Some(frame_name(0)));
}

#[test]
fn test_draw_failure_is_swallowed() {
    let mut player = loaded_player(4);
    player.surface_mut().unwrap().set_fail_draws(true);
    player.render(2.0);
    player.resize();
    assert_eq!(player.current_frame(), 2);
}

#[test]
fn test_missing_surface_is_inert() {
    let mut player: SequencePlayer<RecordingSurface> =
        SequencePlayer::new(None, PlayerOptions::new("canvas-missing", sources(5)));
    assert!(player.is_inert());
    player.render(3.0);
    player.resize();
    player.set_progress(0.5);
    assert!(player.frame_loaded(0).is_none());
    assert!(player.frame_failed(1).is_none());
    assert_eq!(player.current_frame(), 0);
    assert_eq!(player.loaded_count(), 0);
    player.destroy();
}

#[test]
fn test_empty_sequence_is_a_no_op() {
    let mut player = SequencePlayer::new(Some(desktop()), PlayerOptions::new("canvas-empty", Vec::new()));
    assert_eq!(player.frame_count(), 0);
    player.render(0.0);
    player.render(12.0);
    player.set_progress(0.5);
    assert_eq!(player.progress(), 0.0);
    assert!(!player.is_ready());
    assert_eq!(player.surface().unwrap().draw_count(), 0);
}

#[test]
fn test_destroy_detaches_and_silences() {
    let mut player = loaded_player(6);
    let detached = Rc::new(Cell::new(0));
    for label in ["resize", "image"] {
        let seen = Rc::clone(&detached);
        player.subscribe(Subscription::new(label, move || seen.set(seen.get() + 1)));
    }
    assert_eq!(player.subscription_count(), 2);

    player.destroy();
    assert_eq!(detached.get(), 2);
    assert_eq!(player.subscription_count(), 0);
    assert!(player.is_destroyed());
    assert!(!player.is_inert());
    assert!(player.surface().is_none());

    player.render(3.0);
    player.resize();
    player.destroy();
    assert_eq!(detached.get(), 2);
}

#[test]
fn test_subscribe_after_destroy_detaches_immediately() {
    let mut player = loaded_player(2);
    player.destroy();
    let detached = Rc::new(Cell::new(false));
    let seen = Rc::clone(&detached);
    player.subscribe(Subscription::new("resize", move || seen.set(true)));
    assert!(detached.get());
    assert_eq!(player.subscription_count(), 0);
}

#[test]
fn test_options_choose_fit_and_alignment() {
    let options = PlayerOptions::new("canvas-fog", sources(2))
        .with_scaling(ScalingMode::Contain)
        .with_alignment(Alignment::Top)
        .with_alpha(true);
    assert!(options.alpha);

    let mut player = SequencePlayer::new(Some(RecordingSurface::new(800.0, 1200.0, 1.0)), options);
    assert_eq!(player.scaling(), ScalingMode::Contain);
    assert_eq!(player.alignment(), Alignment::Top);

    player.attach_image(0, MemoryImage::new("fog", 1920.0, 1080.0));
    load(&mut player, 0);
    match player.surface().unwrap().content() {
        BufferContent::Image { rect, .. } => {
            assert_eq!(rect.width, 800.0);
            assert_eq!(rect.height, 450.0);
            assert_eq!(rect.offset_y, 0.0);
        }
        BufferContent::Blank => panic!("expected the fog frame"),
    }
}
