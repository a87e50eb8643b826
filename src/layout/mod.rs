//! Viewport sizing for sequence surfaces.
//!
//! This module handles:
//! - Sanitizing host measurements (CSS size, device pixel ratio)
//! - Deriving the physical backing-buffer size

mod viewport;

pub use viewport::{ViewportMetrics, ViewportState};
