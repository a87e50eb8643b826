//! Player options and the page manifest.
//!
//! Both deserialize from camelCase JSON (or a JS object via
//! `serde-wasm-bindgen`). Keys used by older page scripts (`canvasId`,
//! `framePaths`) are accepted as aliases.

use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SequenceError};
use crate::fit::{Alignment, ScalingMode};
use crate::registry::SectionId;
use crate::scrub::{ScrubBinding, ScrubDirection};

/// Parse an optional string option, falling back to the default with a warning.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(value) => value.parse().unwrap_or_else(|e| {
            log::warn!("{e}; using default");
            T::default()
        }),
        None => T::default(),
    })
}

/// Construction options for a sequence player.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerOptions {
    /// Element id of the drawing surface.
    #[serde(alias = "canvasId")]
    pub surface_id: String,
    /// Ordered frame sources.
    #[serde(alias = "framePaths")]
    pub sources: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub scaling: ScalingMode,
    #[serde(deserialize_with = "lenient")]
    pub alignment: Alignment,
    /// Whether the backing buffer keeps an alpha channel.
    pub alpha: bool,
}

impl PlayerOptions {
    pub fn new(surface_id: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            surface_id: surface_id.into(),
            sources,
            ..Self::default()
        }
    }

    pub fn with_scaling(mut self, scaling: ScalingMode) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }
}

/// One sequence declared in a page manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceEntry {
    /// Section this sequence backs; `None` for free-standing sequences (intro, fog).
    #[serde(default)]
    pub section: Option<SectionId>,
    #[serde(alias = "canvasId")]
    pub surface_id: String,
    /// Prefix joined verbatim in front of every frame name.
    #[serde(default)]
    pub base_path: String,
    pub frames: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub scaling: ScalingMode,
    #[serde(default, deserialize_with = "lenient")]
    pub alignment: Alignment,
    #[serde(default)]
    pub alpha: bool,
    /// Scrub from the last frame back to the first as the trigger progresses.
    #[serde(default)]
    pub reverse: bool,
    /// Element id of the background layer shown while this section is active.
    #[serde(default)]
    pub background: Option<String>,
}

impl SequenceEntry {
    /// Full source list: `base_path + frame` for every frame.
    pub fn sources(&self) -> Vec<String> {
        self.frames
            .iter()
            .map(|frame| format!("{}{}", self.base_path, frame))
            .collect()
    }

    pub fn player_options(&self) -> PlayerOptions {
        PlayerOptions {
            surface_id: self.surface_id.clone(),
            sources: self.sources(),
            scaling: self.scaling,
            alignment: self.alignment,
            alpha: self.alpha,
        }
    }

    pub fn scrub_binding(&self) -> ScrubBinding {
        let direction = if self.reverse {
            ScrubDirection::Reverse
        } else {
            ScrubDirection::Forward
        };
        ScrubBinding::new(direction)
    }
}

/// Background layer that is not backed by a sequence (static images).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundEntry {
    pub section: SectionId,
    pub element_id: String,
}

/// Every sequence on a page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageManifest {
    #[serde(default)]
    pub sequences: Vec<SequenceEntry>,
    #[serde(default)]
    pub backgrounds: Vec<BackgroundEntry>,
}

impl PageManifest {
    /// Parse and validate manifest JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Section ids must be unique across sequences and static backgrounds.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let sections = self
            .sequences
            .iter()
            .filter_map(|entry| entry.section)
            .chain(self.backgrounds.iter().map(|bg| bg.section));
        for section in sections {
            if !seen.insert(section) {
                return Err(SequenceError::DuplicateSection(section));
            }
        }
        Ok(())
    }

    /// Entries bound to a section, in declaration order.
    pub fn section_entries(&self) -> impl Iterator<Item = (SectionId, &SequenceEntry)> {
        self.sequences
            .iter()
            .filter_map(|entry| entry.section.map(|section| (section, entry)))
    }

    pub fn total_frames(&self) -> usize {
        self.sequences.iter().map(|entry| entry.frames.len()).sum()
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
    fn options_default_to_cover_center_opaque() {
        let opts: PlayerOptions =
            serde_json::from_str(r#"{"surfaceId":"intro-canvas","sources":["a.jpeg"]}"#).unwrap();
        assert_eq!(opts.surface_id, "intro-canvas");
        assert_eq!(opts.scaling, ScalingMode::Cover);
        assert_eq!(opts.alignment, Alignment::Center);
        assert!(!opts.alpha);
    }

    #[test]
    fn options_accept_legacy_keys() {
        let opts: PlayerOptions = serde_json::from_str(
            r#"{"canvasId":"fog","framePaths":["f0.jpeg","f1.jpeg"],"scaling":"contain","alignment":"top"}"#,
        )
        .unwrap();
        assert_eq!(opts.surface_id, "fog");
        assert_eq!(opts.sources.len(), 2);
        assert_eq!(opts.scaling, ScalingMode::Contain);
        assert_eq!(opts.alignment, Alignment::Top);
    }

    #[test]
    fn unknown_option_values_fall_back() {
        let opts: PlayerOptions =
            serde_json::from_str(r#"{"scaling":"stretch","alignment":"sideways"}"#).unwrap();
        assert_eq!(opts.scaling, ScalingMode::Cover);
        assert_eq!(opts.alignment, Alignment::Center);
        assert!(opts.surface_id.is_empty());
    }

    #[test]
    fn manifest_joins_base_path() {
        let manifest = PageManifest::from_json(
            r#"{"sequences":[{"section":2,"surfaceId":"canvas-precision","basePath":"images/Precision scroll/","frames":["001.jpg","002.jpg"]}]}"#,
        )
        .unwrap();
        let entry = &manifest.sequences[0];
        assert_eq!(
            entry.sources(),
            vec!["images/Precision scroll/001.jpg", "images/Precision scroll/002.jpg"]
        );
        assert_eq!(manifest.total_frames(), 2);
        assert_eq!(manifest.section_entries().count(), 1);
    }

    #[test]
    fn manifest_rejects_duplicate_sections() {
        let err = PageManifest::from_json(
            r#"{"sequences":[{"section":1,"surfaceId":"a","frames":[]}],"backgrounds":[{"section":1,"elementId":"bg-asia"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SequenceError::DuplicateSection(1)));
    }

    #[test]
    fn manifest_rejects_bad_json() {
        assert!(matches!(
            PageManifest::from_json("{not json"),
            Err(SequenceError::Manifest(_))
        ));
    }
}
