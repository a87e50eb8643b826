//! Boundary with the scroll driver.
//!
//! The scroll/timeline engine reports a normalized progress for each trigger
//! region. A [`ScrubBinding`] turns that into the frame value handed to a
//! player, the same way a timeline tween of `frame` from the first to the
//! last index (or back) with frame snapping would.

use crate::frame;

/// Which end of the sequence a trigger starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrubDirection {
    #[default]
    Forward,
    /// Progress 0 shows the last frame, progress 1 the first.
    Reverse,
}

/// Anything a scroll trigger can drive.
pub trait SequenceControl {
    fn frame_count(&self) -> usize;
    fn render(&mut self, frame: f64);
    fn resize(&mut self);
}

/// Maps trigger progress to frame values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrubBinding {
    pub direction: ScrubDirection,
    /// Round to whole frames before rendering.
    pub snap: bool,
}

impl Default for ScrubBinding {
    fn default() -> Self {
        Self::new(ScrubDirection::Forward)
    }
}

impl ScrubBinding {
    pub fn new(direction: ScrubDirection) -> Self {
        Self {
            direction,
            snap: true,
        }
    }

    pub fn reversed() -> Self {
        Self::new(ScrubDirection::Reverse)
    }

    pub fn without_snap(mut self) -> Self {
        self.snap = false;
        self
    }

    /// Frame value for a trigger progress. Progress is clamped to `[0, 1]`;
    /// NaN passes through so the player ignores it.
    pub fn frame_value(&self, progress: f64, frame_count: usize) -> f64 {
        if progress.is_nan() {
            return f64::NAN;
        }
        let p = progress.clamp(0.0, 1.0);
        let p = match self.direction {
            ScrubDirection::Forward => p,
            ScrubDirection::Reverse => 1.0 - p,
        };
        let value = frame::frame_for_progress(p, frame_count);
        if self.snap {
            value.round()
        } else {
            value
        }
    }

    /// Render the frame for `progress` on `target`.
    pub fn apply<C: SequenceControl + ?Sized>(&self, target: &mut C, progress: f64) {
        let value = self.frame_value(progress, target.frame_count());
        target.render(value);
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

    #[derive(Default)]
    struct Probe {
        frames: usize,
        rendered: Vec<f64>,
    }

    impl SequenceControl for Probe {
        fn frame_count(&self) -> usize {
            self.frames
        }
        fn render(&mut self, frame: f64) {
            self.rendered.push(frame);
        }
        fn resize(&mut self) {}
    }

    #[test]
    fn forward_spans_first_to_last() {
        let b = ScrubBinding::default();
        assert_eq!(b.frame_value(0.0, 40), 0.0);
        assert_eq!(b.frame_value(1.0, 40), 39.0);
        assert_eq!(b.frame_value(0.5, 40), 20.0);
    }

    #[test]
    fn reverse_plays_backwards() {
        let b = ScrubBinding::reversed();
        assert_eq!(b.frame_value(0.0, 51), 50.0);
        assert_eq!(b.frame_value(1.0, 51), 0.0);
    }

    #[test]
    fn progress_outside_range_is_clamped() {
        let b = ScrubBinding::default();
        assert_eq!(b.frame_value(-0.3, 10), 0.0);
        assert_eq!(b.frame_value(4.0, 10), 9.0);
        assert!(b.frame_value(f64::NAN, 10).is_nan());
    }

    #[test]
    fn unsnapped_keeps_fraction() {
        let b = ScrubBinding::default().without_snap();
        assert_eq!(b.frame_value(0.25, 11), 2.5);
    }

    #[test]
    fn apply_renders_on_target() {
        let mut probe = Probe {
            frames: 5,
            ..Probe::default()
        };
        ScrubBinding::default().apply(&mut probe, 0.5);
        assert_eq!(probe.rendered, vec![2.0]);
    }
}
