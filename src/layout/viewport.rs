//! Viewport state: CSS size, device pixel ratio and the derived backing-buffer size.

/// Raw measurements reported by a surface's host (window inner size and DPR).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    /// Viewport width in CSS pixels
    pub css_width: f64,
    /// Viewport height in CSS pixels
    pub css_height: f64,
    /// Device pixel ratio (physical pixels per CSS pixel)
    pub device_pixel_ratio: f64,
}

impl ViewportMetrics {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            device_pixel_ratio,
        }
    }
}

/// Sanitized viewport state owned by a player and changed only on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Width in CSS pixels
    pub css_width: f64,
    /// Height in CSS pixels
    pub css_height: f64,
    /// Device pixel ratio used for the backing buffer
    pub dpr: f64,
    /// Backing buffer width in physical pixels
    pub physical_width: u32,
    /// Backing buffer height in physical pixels
    pub physical_height: u32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    /// An empty viewport at DPR 1.
    pub fn new() -> Self {
        Self {
            css_width: 0.0,
            css_height: 0.0,
            dpr: 1.0,
            physical_width: 0,
            physical_height: 0,
        }
    }

    /// Build a viewport from host measurements.
    ///
    /// A missing or nonsensical DPR falls back to 1; negative or non-finite
    /// sizes collapse to 0.
    pub fn from_metrics(metrics: ViewportMetrics) -> Self {
        let dpr = if metrics.device_pixel_ratio.is_finite() && metrics.device_pixel_ratio > 0.0 {
            metrics.device_pixel_ratio
        } else {
            1.0
        };
        let css_width = sanitize_length(metrics.css_width);
        let css_height = sanitize_length(metrics.css_height);
        Self {
            css_width,
            css_height,
            dpr,
            physical_width: to_physical(css_width * dpr),
            physical_height: to_physical(css_height * dpr),
        }
    }

    /// True when the backing buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.physical_width == 0 || self.physical_height == 0
    }
}

fn sanitize_length(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Canvas `width`/`height` assignment truncates; mirror that and saturate at `u32::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_physical(v: f64) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        0
    } else if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v.floor() as u32
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
    fn scales_backing_buffer_by_dpr() {
        let v = ViewportState::from_metrics(ViewportMetrics::new(800.0, 600.0, 2.0));
        assert_eq!(v.physical_width, 1600);
        assert_eq!(v.physical_height, 1200);
        assert_eq!(v.dpr, 2.0);
    }

    #[test]
    fn fractional_dpr_truncates() {
        let v = ViewportState::from_metrics(ViewportMetrics::new(375.0, 667.0, 1.5));
        assert_eq!(v.physical_width, 562);
        assert_eq!(v.physical_height, 1000);
    }

    #[test]
    fn bad_dpr_falls_back_to_one() {
        for dpr in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let v = ViewportState::from_metrics(ViewportMetrics::new(100.0, 50.0, dpr));
            assert_eq!(v.dpr, 1.0);
            assert_eq!((v.physical_width, v.physical_height), (100, 50));
        }
    }

    #[test]
    fn negative_sizes_collapse() {
        let v = ViewportState::from_metrics(ViewportMetrics::new(-10.0, f64::NAN, 1.0));
        assert!(v.is_empty());
        assert_eq!(v.css_width, 0.0);
        assert_eq!(v.css_height, 0.0);
    }
}
