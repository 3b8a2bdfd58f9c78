//! Motion options with TOML preset support.
//!
//! Every tunable of the effect (card selector, smoothing factor, scroll
//! normalization distance, clamp ranges, resting light position) lives
//! here. All fields use `#[serde(default)]` so a partial TOML preset
//! (e.g. only overriding `smoothing`) works correctly. Defaults are the
//! production constants.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Inclusive clamp range for a published light coordinate.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema,
)]
pub struct ClampRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl ClampRange {
    /// Clamp a value into this range.
    #[inline]
    #[must_use]
    pub fn clamp(self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Configuration surface of the motion controller.
///
/// Serializes to/from TOML for presets; [`MotionOptions::json_schema`]
/// exposes the same shape to UI tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct MotionOptions {
    /// CSS selector identifying elements that receive local lighting.
    pub selector: String,
    /// Fraction of the remaining distance covered per frame.
    pub smoothing: f32,
    /// Scroll offset (px) at which scroll progress saturates at 1.
    pub scroll_distance: f32,
    /// Clamp range for the normalized global light position. Keeps the
    /// light off the exact viewport edge, avoiding degenerate
    /// gradients.
    pub global_clamp: ClampRange,
    /// Clamp range for per-card light coordinates. Wider than the
    /// global range so the local light can sit just outside a card for
    /// a soft falloff at its edges.
    pub local_clamp: ClampRange,
    /// Resting light position (normalized): slightly above center.
    /// Targets return here on pointer-leave.
    pub default_target: [f32; 2],
    /// Whether per-card local lighting runs at all. The global light
    /// is always on; this layers the card pass on top.
    pub card_lighting: bool,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            selector: ".glass-card".to_owned(),
            smoothing: 0.08,
            scroll_distance: 900.0,
            global_clamp: ClampRange {
                min: 0.05,
                max: 0.95,
            },
            local_clamp: ClampRange {
                min: -0.5,
                max: 1.5,
            },
            default_target: [0.5, 0.18],
            card_lighting: true,
        }
    }
}

impl MotionOptions {
    /// Generate JSON Schema describing the options shape.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(MotionOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, MotionError> {
        let content = std::fs::read_to_string(path).map_err(MotionError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MotionError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), MotionError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MotionError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MotionError::Io)?;
        }
        std::fs::write(path, content).map_err(MotionError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
