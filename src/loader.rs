//! Frame load bookkeeping.
//!
//! Loads complete in whatever order the network or cache delivers them. The
//! [`LoadState`] here only counts: it decides when the first frame may be
//! drawn and when the whole sequence is ready. Failed frames count toward
//! completion so a single broken source never stalls the ready signal.

/// Per-frame load status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameStatus {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// What a single completion changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadTransition {
    /// This was the first successful load and it was frame 0.
    pub cold_start: bool,
    /// The sequence just became ready (reported once).
    pub became_ready: bool,
    /// The completion was new (not a repeat for an already-settled frame).
    pub counted: bool,
}

/// Load progress of one sequence.
#[derive(Debug, Clone, Default)]
pub struct LoadState {
    status: Vec<FrameStatus>,
    loaded_count: usize,
    succeeded: usize,
    ready_reported: bool,
}

impl LoadState {
    pub fn new(frame_count: usize) -> Self {
        Self {
            status: vec![FrameStatus::Pending; frame_count],
            loaded_count: 0,
            succeeded: 0,
            ready_reported: false,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.status.len()
    }

    /// Frames settled so far, successes and failures alike.
    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    pub fn failed_count(&self) -> usize {
        self.loaded_count - self.succeeded
    }

    pub fn status(&self, index: usize) -> Option<FrameStatus> {
        self.status.get(index).copied()
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.status(index) == Some(FrameStatus::Loaded)
    }

    /// Every frame has settled. An empty sequence is never ready.
    pub fn is_ready(&self) -> bool {
        !self.status.is_empty() && self.loaded_count == self.status.len()
    }

    pub fn record_success(&mut self, index: usize) -> LoadTransition {
        self.settle(index, FrameStatus::Loaded)
    }

    pub fn record_failure(&mut self, index: usize) -> LoadTransition {
        self.settle(index, FrameStatus::Failed)
    }

    fn settle(&mut self, index: usize, outcome: FrameStatus) -> LoadTransition {
        let Some(slot) = self.status.get_mut(index) else {
            return LoadTransition::default();
        };
        if *slot != FrameStatus::Pending {
            return LoadTransition::default();
        }
        *slot = outcome;
        self.loaded_count += 1;

        let mut transition = LoadTransition {
            counted: true,
            ..LoadTransition::default()
        };
        if outcome == FrameStatus::Loaded {
            self.succeeded += 1;
            transition.cold_start = self.succeeded == 1 && index == 0;
        }
        if self.is_ready() && !self.ready_reported {
            self.ready_reported = true;
            transition.became_ready = true;
        }
        transition
    }
}

/// Deferred `on_ready` invocation.
///
/// Returned out of the player so the caller can release any borrow of the
/// player before running user code that may call back into it.
#[must_use = "the ready callback only runs when `notify` is called"]
pub struct ReadyNotice {
    callback: Box<dyn FnOnce()>,
}

impl ReadyNotice {
    pub(crate) fn new(callback: Box<dyn FnOnce()>) -> Self {
        Self { callback }
    }

    pub fn notify(self) {
        (self.callback)();
    }
}

impl std::fmt::Debug for ReadyNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ReadyNotice")
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
    fn ready_after_all_settle_in_any_order() {
        let mut state = LoadState::new(3);
        let c = state.record_success(2);
        assert!(c.counted && !c.became_ready && !c.cold_start);
        let a = state.record_success(0);
        assert!(!a.became_ready);
        assert!(!a.cold_start, "frame 0 was not the first success");
        let b = state.record_failure(1);
        assert!(b.became_ready);
        assert!(state.is_ready());
        assert_eq!(state.loaded_count(), 3);
        assert_eq!(state.failed_count(), 1);
    }

    #[test]
    fn cold_start_only_when_frame_zero_is_first_success() {
        let mut state = LoadState::new(3);
        assert!(!state.record_failure(1).cold_start);
        assert!(state.record_success(0).cold_start);
        assert!(!state.record_success(2).cold_start);
    }

    #[test]
    fn repeated_completion_is_ignored() {
        let mut state = LoadState::new(2);
        assert!(state.record_success(0).counted);
        assert_eq!(state.record_success(0), LoadTransition::default());
        assert_eq!(state.record_failure(0), LoadTransition::default());
        assert_eq!(state.loaded_count(), 1);
        assert!(state.is_loaded(0));
    }

    #[test]
    fn ready_reported_once() {
        let mut state = LoadState::new(1);
        assert!(state.record_failure(0).became_ready);
        assert!(!state.record_success(0).became_ready);
        assert!(state.is_ready());
    }

    #[test]
    fn out_of_range_and_empty() {
        let mut state = LoadState::new(0);
        assert!(!state.is_ready());
        assert_eq!(state.record_success(5), LoadTransition::default());
        assert_eq!(state.status(0), None);
    }
}
