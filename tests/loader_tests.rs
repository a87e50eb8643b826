//! Load completion bookkeeping: out-of-order arrivals, failures, ready signal.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{desktop, fail, frame_name, load, pending_player, ready_counter, shown};
use scrollseq::loader::{FrameStatus, LoadState};
use test_case::test_case;

/// A(success), B(fail), C(success) arriving C, A, B.
#[test]
fn test_ready_fires_once_after_out_of_order_arrivals() {
    let mut player = pending_player(3, desktop());
    let ready = ready_counter(&mut player);

    load(&mut player, 2);
    assert_eq!(ready.get(), 0);
    load(&mut player, 0);
    assert_eq!(ready.get(), 0);
    fail(&mut player, 1);
    assert_eq!(ready.get(), 1);
    assert!(player.is_ready());
    assert_eq!(player.loaded_count(), 3);

    // Stray duplicate callbacks change nothing.
    load(&mut player, 2);
    fail(&mut player, 1);
    assert_eq!(ready.get(), 1);
    assert_eq!(player.loaded_count(), 3);
}

#[test]
fn test_first_frame_arriving_late_still_draws() {
    let mut player = pending_player(3, desktop());
    load(&mut player, 2);
    assert_eq!(shown(&player), None);
    load(&mut player, 0);
    assert_eq!(shown(&player), Some(frame_name(0)));
}

#[test]
fn test_all_failures_still_complete() {
    let mut player = pending_player(4, desktop());
    let ready = ready_counter(&mut player);
    for index in [3, 1, 0, 2] {
        fail(&mut player, index);
    }
    assert_eq!(ready.get(), 1);
    assert_eq!(shown(&player), None);
}

#[test]
fn test_ready_callback_may_drive_the_player() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let player = Rc::new(RefCell::new(pending_player(2, desktop())));
    let weak = Rc::downgrade(&player);
    player.borrow_mut().set_on_ready(Some(Box::new(move || {
        if let Some(p) = weak.upgrade() {
            p.borrow_mut().render(1.0);
        }
    })));

    for index in 0..2 {
        let notice = player.borrow_mut().frame_loaded(index);
        if let Some(notice) = notice {
            notice.notify();
        }
    }
    assert_eq!(player.borrow().current_frame(), 1);
    assert_eq!(shown(&player.borrow()), Some(frame_name(1)));
}

#[test_case(&[0, 1, 2] ; "in order")]
#[test_case(&[2, 1, 0] ; "reversed")]
#[test_case(&[1, 2, 0] ; "rotated")]
fn test_ready_after_last_settles(order: &[usize]) {
    let mut state = LoadState::new(order.len());
    let mut became_ready = 0;
    for (step, &index) in order.iter().enumerate() {
        let transition = state.record_success(index);
        assert!(transition.counted);
        assert_eq!(transition.cold_start, index == 0 && step == 0);
        if transition.became_ready {
            became_ready += 1;
            assert_eq!(step, order.len() - 1);
        }
    }
    assert_eq!(became_ready, 1);
}

#[test]
fn test_out_of_range_index_is_ignored() {
    let mut state = LoadState::new(2);
    let transition = state.record_success(7);
    assert!(!transition.counted);
    assert_eq!(state.loaded_count(), 0);
    assert_eq!(state.status(7), None);
    assert_eq!(state.status(1), Some(FrameStatus::Pending));
}

#[test]
fn test_empty_sequence_never_ready() {
    let mut state = LoadState::new(0);
    assert!(!state.is_ready());
    assert!(!state.record_failure(0).became_ready);
}

#[test]
fn test_cold_start_keeps_requested_frame() {
    let mut player = pending_player(10, desktop());
    player.render(5.0);

    load(&mut player, 0);
    assert_eq!(player.current_frame(), 5);
    assert_eq!(shown(&player), None);
    assert!(player.progress() > 0.0);

    load(&mut player, 5);
    assert_eq!(player.current_frame(), 5);
    assert_eq!(shown(&player), Some(frame_name(5)));
}

#[test]
fn test_load_state_tracks_each_frame() {
    let mut player = pending_player(3, desktop());
    load(&mut player, 2);
    fail(&mut player, 0);
    let state = player.load_state();
    assert_eq!(state.status(0), Some(FrameStatus::Failed));
    assert_eq!(state.status(1), Some(FrameStatus::Pending));
    assert_eq!(state.status(2), Some(FrameStatus::Loaded));
    assert_eq!(state.failed_count(), 1);
    assert!(!state.is_ready());
}
