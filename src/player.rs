//! Sequence player: one image sequence scrubbed onto one drawing surface.
//!
//! The player is backend-agnostic. The browser adapter in `viewer` wraps a
//! `SequencePlayer<CanvasRenderer>` in shared state and feeds it load
//! completions; tests drive a `SequencePlayer<RecordingSurface>` directly.
//!
//! Every public operation is safe to call at any time, in any order, with
//! any numeric input. Nothing here panics or returns an error to the caller.

use crate::config::PlayerOptions;
use crate::fit::{fit_rect, Alignment, ScalingMode};
use crate::frame;
use crate::layout::ViewportState;
use crate::loader::{LoadState, LoadTransition, ReadyNotice};
use crate::render::backend::{FrameImage, RenderSurface};
use crate::scrub::SequenceControl;
use crate::subscription::{Subscription, SubscriptionSet};

/// Plays one ordered list of frames onto a surface.
pub struct SequencePlayer<S: RenderSurface> {
    surface_id: String,
    surface: Option<S>,
    sources: Vec<String>,
    images: Vec<Option<S::Image>>,
    load: LoadState,
    current_frame: usize,
    viewport: ViewportState,
    scaling: ScalingMode,
    alignment: Alignment,
    on_ready: Option<Box<dyn FnOnce()>>,
    subscriptions: SubscriptionSet,
    destroyed: bool,
}

impl<S: RenderSurface> SequencePlayer<S> {
    /// Create a player on `surface`.
    ///
    /// `None` means the surface id did not resolve: the error is logged and the
    /// player stays inert.
    pub fn new(surface: Option<S>, options: PlayerOptions) -> Self {
        let PlayerOptions {
            surface_id,
            sources,
            scaling,
            alignment,
            alpha: _,
        } = options;
        if surface.is_none() {
            log::error!("Drawing surface #{surface_id} not found.");
        }
        let frame_count = sources.len();
        let mut player = Self {
            surface_id,
            surface,
            images: std::iter::repeat_with(|| None).take(frame_count).collect(),
            load: LoadState::new(frame_count),
            sources,
            current_frame: 0,
            viewport: ViewportState::new(),
            scaling,
            alignment,
            on_ready: None,
            subscriptions: SubscriptionSet::new(),
            destroyed: false,
        };
        player.resize();
        player
    }

    /// Callback run once when every frame has settled.
    pub fn set_on_ready(&mut self, callback: Option<Box<dyn FnOnce()>>) {
        self.on_ready = callback;
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn frame_count(&self) -> usize {
        self.sources.len()
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn scaling(&self) -> ScalingMode {
        self.scaling
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn loaded_count(&self) -> usize {
        self.load.loaded_count()
    }

    pub fn is_ready(&self) -> bool {
        self.load.is_ready()
    }

    /// No surface was found at construction.
    pub fn is_inert(&self) -> bool {
        self.surface.is_none() && !self.destroyed
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Number of listeners still attached.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Keep `subscription` until [`SequencePlayer::destroy`].
    ///
    /// After destroy (or on an inert player) the subscription is detached
    /// immediately.
    pub fn subscribe(&mut self, subscription: Subscription) {
        if self.surface.is_none() {
            drop(subscription);
            return;
        }
        self.subscriptions.push(subscription);
    }

    /// Hand the player the image object for `index` (load still in flight).
    pub fn attach_image(&mut self, index: usize, image: S::Image) {
        if self.surface.is_none() {
            return;
        }
        if let Some(slot) = self.images.get_mut(index) {
            *slot = Some(image);
        }
    }

    /// Record a successful load.
    ///
    /// Draws frame 0 on a cold start (unless a later frame was already
    /// requested), redraws the current frame if it was the one waiting, and
    /// returns the ready notice when this completed the set.
    pub fn frame_loaded(&mut self, index: usize) -> Option<ReadyNotice> {
        if self.surface.is_none() {
            return None;
        }
        let transition = self.load.record_success(index);
        if transition.cold_start && self.current_frame == 0 {
            self.render(0.0);
        } else if transition.counted && index == self.current_frame {
            self.draw_current();
        }
        self.finish_transition(transition)
    }

    /// Record a failed load. The frame still counts toward readiness.
    pub fn frame_failed(&mut self, index: usize) -> Option<ReadyNotice> {
        if self.surface.is_none() {
            return None;
        }
        let source = self.sources.get(index).map_or("<unknown>", String::as_str);
        log::warn!("Failed to load image: {source}");
        let transition = self.load.record_failure(index);
        self.finish_transition(transition)
    }

    fn finish_transition(&mut self, transition: LoadTransition) -> Option<ReadyNotice> {
        if !transition.became_ready {
            return None;
        }
        log::debug!(
            "#{}: {} frames settled ({} failed)",
            self.surface_id,
            self.load.loaded_count(),
            self.load.failed_count()
        );
        self.on_ready.take().map(ReadyNotice::new)
    }

    /// Re-measure the host, resize the backing buffer and redraw the current frame.
    pub fn resize(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.viewport = ViewportState::from_metrics(surface.measure());
        surface.resize(&self.viewport);
        self.draw_current();
    }

    /// Show the frame nearest to `frame_value`, clamped to the sequence.
    ///
    /// A frame that has not loaded (or failed) leaves the previous picture in place.
    pub fn render(&mut self, frame_value: f64) {
        if self.surface.is_none() {
            return;
        }
        let Some(index) = frame::resolve_frame(frame_value, self.frame_count()) else {
            return;
        };
        self.current_frame = index;
        self.draw_current();
    }

    fn draw_current(&mut self) {
        let index = self.current_frame;
        if !self.load.is_loaded(index) {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let Some(Some(image)) = self.images.get(index) else {
            return;
        };
        let Some((natural_w, natural_h)) = image.natural_size() else {
            return;
        };

        surface.clear();
        let rect = fit_rect(
            natural_w,
            natural_h,
            self.viewport.css_width,
            self.viewport.css_height,
            self.scaling,
            self.alignment,
        );
        if rect.is_empty() {
            return;
        }
        if let Err(e) = surface.draw_image(image, &rect) {
            log::warn!("#{}: frame {index}: {e}", self.surface_id);
        }
    }

    /// Position of the current frame in `[0, 1]`; 0 for sequences of one frame or fewer.
    pub fn progress(&self) -> f64 {
        frame::progress_of(self.current_frame, self.frame_count())
    }

    /// Render the frame at normalized `progress`.
    pub fn set_progress(&mut self, progress: f64) {
        if self.frame_count() <= 1 {
            if !progress.is_nan() {
                self.render(0.0);
            }
            return;
        }
        self.render(frame::frame_for_progress(progress, self.frame_count()));
    }

    /// Detach listeners, shrink the backing buffer and drop every image.
    ///
    /// In-flight loads are left to finish; their completions are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.subscriptions.unsubscribe_all();
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
        self.images.clear();
        self.on_ready = None;
        log::debug!("#{}: destroyed", self.surface_id);
    }
}

impl<S: RenderSurface> SequenceControl for SequencePlayer<S> {
    fn frame_count(&self) -> usize {
        SequencePlayer::frame_count(self)
    }

    fn render(&mut self, frame: f64) {
        SequencePlayer::render(self, frame);
    }

    fn resize(&mut self) {
        SequencePlayer::resize(self);
    }
}

impl<S: RenderSurface> std::fmt::Debug for SequencePlayer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencePlayer")
            .field("surface_id", &self.surface_id)
            .field("frame_count", &self.frame_count())
            .field("current_frame", &self.current_frame)
            .field("loaded", &self.load.loaded_count())
            .field("inert", &self.is_inert())
            .field("destroyed", &self.destroyed)
            .finish()
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
    use crate::render::recording::{BufferContent, MemoryImage, RecordingSurface, SurfaceOp};

    fn player(frames: usize) -> SequencePlayer<RecordingSurface> {
        let sources = (0..frames).map(|i| format!("f{i}.jpeg")).collect();
        SequencePlayer::new(
            Some(RecordingSurface::new(800.0, 600.0, 2.0)),
            PlayerOptions::new("seq", sources),
        )
    }

    fn load_all(p: &mut SequencePlayer<RecordingSurface>) {
        for i in 0..p.frame_count() {
            p.attach_image(i, MemoryImage::new(format!("f{i}"), 1920.0, 1080.0));
            let _ = p.frame_loaded(i);
        }
    }

    #[test]
    fn construction_sizes_backing_buffer() {
        let p = player(3);
        let s = p.surface().unwrap();
        assert_eq!(s.backing_size(), (1600, 1200));
        assert_eq!(s.transform_scale(), 2.0);
        assert_eq!(p.viewport().css_width, 800.0);
    }

    #[test]
    fn destroy_is_idempotent_and_silences_calls() {
        let mut p = player(2);
        load_all(&mut p);
        p.destroy();
        p.destroy();
        p.render(1.0);
        p.resize();
        assert!(p.is_destroyed());
        assert!(!p.is_inert());
        assert!(p.surface().is_none());
    }

    #[test]
    fn late_current_frame_is_drawn_on_arrival() {
        let mut p = player(5);
        for i in 0..5 {
            p.attach_image(i, MemoryImage::new(format!("f{i}"), 100.0, 100.0));
        }
        p.render(3.0);
        assert_eq!(p.surface().unwrap().draw_count(), 0);
        let _ = p.frame_loaded(3);
        assert!(matches!(
            p.surface().unwrap().content(),
            BufferContent::Image { id, .. } if id == "f3"
        ));
    }

    #[test]
    fn draw_failure_is_swallowed() {
        let mut p = player(1);
        p.surface_mut().unwrap().set_fail_draws(true);
        load_all(&mut p);
        let ops = p.surface_mut().unwrap().take_ops();
        assert!(ops.contains(&SurfaceOp::Clear));
        assert!(!ops.iter().any(|op| matches!(op, SurfaceOp::Draw { .. })));
    }
}
