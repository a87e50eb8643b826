//! Draw-rectangle computation for scaling a frame into the viewport.
//!
//! `fit_rect` is pure: it takes the natural image size and the viewport size
//! (CSS pixels) and returns where the image should be drawn.

use std::fmt;
use std::str::FromStr;

use crate::error::SequenceError;

/// Overscale applied in cover mode so sub-pixel seams never show at the edges.
pub const COVER_OVERSCALE: f64 = 1.02;

/// How the image is scaled relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalingMode {
    /// Fill the viewport, cropping the longer axis.
    #[default]
    Cover,
    /// Fit inside the viewport, letterboxing the shorter axis.
    Contain,
}

impl FromStr for ScalingMode {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cover" => Ok(Self::Cover),
            "contain" => Ok(Self::Contain),
            _ => Err(SequenceError::InvalidOption {
                name: "scaling",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => f.write_str("cover"),
            Self::Contain => f.write_str("contain"),
        }
    }
}

/// Position of one axis inside the available slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn factor(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Middle => 0.5,
            Self::End => 1.0,
        }
    }
}

/// Where the scaled image sits along the axis that has slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Alignment {
    fn horizontal(self) -> Anchor {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Anchor::Start,
            Self::Right | Self::TopRight | Self::BottomRight => Anchor::End,
            Self::Center | Self::Top | Self::Bottom => Anchor::Middle,
        }
    }

    fn vertical(self) -> Anchor {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Anchor::Start,
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Anchor::End,
            Self::Center | Self::Left | Self::Right => Anchor::Middle,
        }
    }
}

impl FromStr for Alignment {
    type Err = SequenceError;

    /// Accepts CSS-like keywords: `"top"`, `"top-left"`, `"left top"`, `"center center"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SequenceError::InvalidOption {
            name: "alignment",
            value: s.to_string(),
        };
        let lowered = s.trim().to_ascii_lowercase();
        let mut vertical = Anchor::Middle;
        let mut horizontal = Anchor::Middle;
        let mut seen = 0;
        for word in lowered
            .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
            .filter(|w| !w.is_empty())
        {
            seen += 1;
            match word {
                "top" => vertical = Anchor::Start,
                "bottom" => vertical = Anchor::End,
                "left" => horizontal = Anchor::Start,
                "right" => horizontal = Anchor::End,
                "center" | "centre" | "middle" => {}
                _ => return Err(invalid()),
            }
        }
        if seen == 0 || seen > 2 {
            return Err(invalid());
        }
        Ok(match (vertical, horizontal) {
            (Anchor::Start, Anchor::Start) => Self::TopLeft,
            (Anchor::Start, Anchor::End) => Self::TopRight,
            (Anchor::Start, Anchor::Middle) => Self::Top,
            (Anchor::End, Anchor::Start) => Self::BottomLeft,
            (Anchor::End, Anchor::End) => Self::BottomRight,
            (Anchor::End, Anchor::Middle) => Self::Bottom,
            (Anchor::Middle, Anchor::Start) => Self::Left,
            (Anchor::Middle, Anchor::End) => Self::Right,
            (Anchor::Middle, Anchor::Middle) => Self::Center,
        })
    }
}

/// Destination rectangle for a draw call, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitRect {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl FitRect {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether this rectangle fully contains `[0, 0, width, height]`.
    pub fn covers(&self, width: f64, height: f64) -> bool {
        self.offset_x <= 0.0
            && self.offset_y <= 0.0
            && self.offset_x + self.width >= width
            && self.offset_y + self.height >= height
    }
}

fn usable(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Compute where an `image_w × image_h` image lands in a `viewport_w × viewport_h` viewport.
///
/// Non-positive or non-finite inputs produce an empty rectangle at the origin.
pub fn fit_rect(
    image_w: f64,
    image_h: f64,
    viewport_w: f64,
    viewport_h: f64,
    mode: ScalingMode,
    alignment: Alignment,
) -> FitRect {
    if !(usable(image_w) && usable(image_h) && usable(viewport_w) && usable(viewport_h)) {
        return FitRect::default();
    }

    let image_ratio = image_w / image_h;
    let viewport_ratio = viewport_w / viewport_h;

    // Wider viewport: cover pins width, contain pins height.
    let width_bound = match mode {
        ScalingMode::Cover => viewport_ratio > image_ratio,
        ScalingMode::Contain => viewport_ratio <= image_ratio,
    };
    let (width, height) = if width_bound {
        (viewport_w, viewport_w / image_ratio)
    } else {
        (viewport_h * image_ratio, viewport_h)
    };

    let mut rect = FitRect {
        width,
        height,
        offset_x: (viewport_w - width) * alignment.horizontal().factor(),
        offset_y: (viewport_h - height) * alignment.vertical().factor(),
    };

    if mode == ScalingMode::Cover {
        let cx = rect.offset_x + rect.width / 2.0;
        let cy = rect.offset_y + rect.height / 2.0;
        rect.width *= COVER_OVERSCALE;
        rect.height *= COVER_OVERSCALE;
        rect.offset_x = cx - rect.width / 2.0;
        rect.offset_y = cy - rect.height / 2.0;
    }

    if rect.width.is_finite() && rect.height.is_finite() {
        rect
    } else {
        FitRect::default()
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

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cover_portrait_viewport_crops_width() {
        let r = fit_rect(1920.0, 1080.0, 800.0, 1200.0, ScalingMode::Cover, Alignment::Center);
        assert!(close(r.height, 1200.0 * COVER_OVERSCALE));
        assert!(close(r.width, r.height * (1920.0 / 1080.0)));
        assert!(r.offset_x < 0.0);
        assert!(r.covers(800.0, 1200.0));
        // Horizontally centred.
        assert!(close(r.offset_x + r.width / 2.0, 400.0));
        assert!(close(r.offset_y + r.height / 2.0, 600.0));
    }

    #[test]
    fn cover_wide_viewport_crops_height() {
        let r = fit_rect(1000.0, 1000.0, 1600.0, 900.0, ScalingMode::Cover, Alignment::Center);
        assert!(close(r.width, 1600.0 * COVER_OVERSCALE));
        assert!(close(r.height, r.width));
        assert!(r.offset_y < 0.0);
        assert!(r.covers(1600.0, 900.0));
    }

    #[test]
    fn contain_letterboxes_without_overscale() {
        let r = fit_rect(1920.0, 1080.0, 800.0, 1200.0, ScalingMode::Contain, Alignment::Center);
        assert!(close(r.width, 800.0));
        assert!(close(r.height, 450.0));
        assert!(close(r.offset_x, 0.0));
        assert!(close(r.offset_y, 375.0));
    }

    #[test]
    fn contain_top_alignment_pins_to_top() {
        let r = fit_rect(1920.0, 1080.0, 800.0, 1200.0, ScalingMode::Contain, Alignment::Top);
        assert!(close(r.offset_y, 0.0));
        let r = fit_rect(1920.0, 1080.0, 800.0, 1200.0, ScalingMode::Contain, Alignment::Bottom);
        assert!(close(r.offset_y + r.height, 1200.0));
    }

    #[test]
    fn degenerate_inputs_yield_empty_rect() {
        for (iw, ih, vw, vh) in [
            (0.0, 1080.0, 800.0, 600.0),
            (1920.0, -1.0, 800.0, 600.0),
            (1920.0, 1080.0, 0.0, 600.0),
            (f64::NAN, 1080.0, 800.0, 600.0),
            (1920.0, 1080.0, 800.0, f64::INFINITY),
        ] {
            let r = fit_rect(iw, ih, vw, vh, ScalingMode::Cover, Alignment::Center);
            assert!(r.is_empty());
            assert_eq!(r, FitRect::default());
        }
    }

    #[test]
    fn alignment_parses_css_keywords() {
        assert_eq!("center".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!("Top".parse::<Alignment>().unwrap(), Alignment::Top);
        assert_eq!("top-left".parse::<Alignment>().unwrap(), Alignment::TopLeft);
        assert_eq!("right bottom".parse::<Alignment>().unwrap(), Alignment::BottomRight);
        assert_eq!("center left".parse::<Alignment>().unwrap(), Alignment::Left);
        assert!("".parse::<Alignment>().is_err());
        assert!("diagonal".parse::<Alignment>().is_err());
        assert!("top left right".parse::<Alignment>().is_err());
    }

    #[test]
    fn scaling_parses_and_displays() {
        assert_eq!(" Contain ".parse::<ScalingMode>().unwrap(), ScalingMode::Contain);
        assert_eq!(ScalingMode::Cover.to_string(), "cover");
        assert!("stretch".parse::<ScalingMode>().is_err());
    }
}
