//! Structured error types for scrollseq.
//!
//! The public player API never returns these to animation code; they flow
//! through internal helpers and are logged at the boundary.

/// All errors that can occur while building and driving sequence players.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// No drawing surface with the given id exists in the document.
    #[error("Drawing surface #{0} not found")]
    SurfaceNotFound(String),

    /// The surface exists but a 2D context could not be obtained.
    #[error("Context unavailable: {0}")]
    Context(String),

    /// Drawing an image onto the surface failed.
    #[error("Draw failed: {0}")]
    Draw(String),

    /// Manifest JSON could not be parsed.
    #[error("Manifest parse: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Two manifest entries claim the same section.
    #[error("Duplicate section id {0}")]
    DuplicateSection(u32),

    /// An option value was not recognized.
    #[error("Invalid {name}: {value:?}")]
    InvalidOption { name: &'static str, value: String },

    /// Catch-all for string errors from platform calls.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SequenceError>;

impl From<String> for SequenceError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SequenceError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SequenceError> for wasm_bindgen::JsValue {
    fn from(e: SequenceError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
