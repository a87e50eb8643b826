//! Shared helpers for the integration tests.
//!
//! Players run against `RecordingSurface`, so "the buffer" is whatever
//! `RecordingSurface::content` reports.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::Cell;
use std::rc::Rc;

use scrollseq::config::PlayerOptions;
use scrollseq::render::{BufferContent, MemoryImage, RecordingSurface};
use scrollseq::SequencePlayer;

pub type TestPlayer = SequencePlayer<RecordingSurface>;

/// `frame_0001.jpeg` .. `frame_{n}.jpeg`
pub fn sources(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("frame_{i:04}.jpeg")).collect()
}

/// Landscape desktop window, DPR 1.
pub fn desktop() -> RecordingSurface {
    RecordingSurface::new(1440.0, 900.0, 1.0)
}

/// Player with `n` frames whose images are attached but not yet loaded.
pub fn pending_player(n: usize, surface: RecordingSurface) -> TestPlayer {
    let mut player = SequencePlayer::new(Some(surface), PlayerOptions::new("canvas-test", sources(n)));
    for (index, source) in sources(n).into_iter().enumerate() {
        player.attach_image(index, MemoryImage::new(source, 1920.0, 1080.0));
    }
    player
}

/// Player with every frame loaded, in index order.
pub fn loaded_player(n: usize) -> TestPlayer {
    let mut player = pending_player(n, desktop());
    for index in 0..n {
        load(&mut player, index);
    }
    player
}

/// Counter shared with an `on_ready` callback.
pub fn ready_counter(player: &mut TestPlayer) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    player.set_on_ready(Some(Box::new(move || seen.set(seen.get() + 1))));
    count
}

/// Id of the image currently shown, if any.
pub fn shown(player: &TestPlayer) -> Option<String> {
    match player.surface()?.content() {
        BufferContent::Blank => None,
        BufferContent::Image { id, .. } => Some(id.clone()),
    }
}

/// Source name of frame `index` (as used for the image id).
pub fn frame_name(index: usize) -> String {
    format!("frame_{:04}.jpeg", index + 1)
}

/// Report frame `index` as loaded, running the ready callback if it fires.
pub fn load(player: &mut TestPlayer, index: usize) {
    if let Some(notice) = player.frame_loaded(index) {
        notice.notify();
    }
}

/// Report frame `index` as failed, running the ready callback if it fires.
pub fn fail(player: &mut TestPlayer, index: usize) {
    if let Some(notice) = player.frame_failed(index) {
        notice.notify();
    }
}
