//! Frame index arithmetic: clamping scrub values and converting to/from progress.

/// Resolve a possibly fractional frame value to an index in `[0, frame_count - 1]`.
///
/// Returns `None` for an empty sequence or a NaN value.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resolve_frame(value: f64, frame_count: usize) -> Option<usize> {
    if frame_count == 0 || value.is_nan() {
        return None;
    }
    let last = frame_count - 1;
    let rounded = value.round();
    if rounded <= 0.0 {
        return Some(0);
    }
    let last_f = last as f64;
    if rounded >= last_f {
        return Some(last);
    }
    // In range (0, last): exact integer after rounding.
    Some(rounded as usize)
}

/// Normalized position of `frame` within the sequence.
///
/// Sequences with zero or one frame always report 0.
pub fn progress_of(frame: usize, frame_count: usize) -> f64 {
    if frame_count <= 1 {
        return 0.0;
    }
    let last = (frame_count - 1) as f64;
    (frame.min(frame_count - 1) as f64) / last
}

/// Frame value (unrounded) matching a normalized progress.
pub fn frame_for_progress(progress: f64, frame_count: usize) -> f64 {
    if frame_count <= 1 {
        return 0.0;
    }
    progress * (frame_count - 1) as f64
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(-5.0, 40 => Some(0); "negative clamps to first")]
    #[test_case(999.0, 40 => Some(39); "overflow clamps to last")]
    #[test_case(3.6, 40 => Some(4); "rounds up")]
    #[test_case(3.4, 40 => Some(3); "rounds down")]
    #[test_case(2.5, 40 => Some(3); "half rounds away from zero")]
    #[test_case(f64::INFINITY, 40 => Some(39); "positive infinity")]
    #[test_case(f64::NEG_INFINITY, 40 => Some(0); "negative infinity")]
    #[test_case(f64::NAN, 40 => None; "nan is ignored")]
    #[test_case(0.0, 0 => None; "empty sequence")]
    #[test_case(7.0, 1 => Some(0); "single frame")]
    fn resolves(value: f64, count: usize) -> Option<usize> {
        resolve_frame(value, count)
    }

    #[test]
    fn single_frame_progress_is_zero() {
        assert_eq!(progress_of(0, 1), 0.0);
        assert_eq!(progress_of(0, 0), 0.0);
        assert_eq!(frame_for_progress(0.75, 1), 0.0);
    }

    #[test]
    fn progress_round_trips_through_frames() {
        let n = 51;
        for step in 0..=100 {
            let p = f64::from(step) / 100.0;
            let frame = resolve_frame(frame_for_progress(p, n), n).unwrap();
            let back = progress_of(frame, n);
            let again = resolve_frame(frame_for_progress(back, n), n).unwrap();
            assert_eq!(frame, again);
            assert_eq!(frame, (p * 50.0).round() as usize);
        }
    }
}
