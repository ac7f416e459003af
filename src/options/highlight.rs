use serde::{Deserialize, Serialize};

/// Appearance of the material swapped onto selected meshes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HighlightOptions {
    /// Base color (linear RGB).
    pub color: [f32; 3],
    /// Emissive color (linear RGB).
    pub emissive: [f32; 3],
    /// Emissive strength.
    pub emissive_intensity: f32,
    /// Surface opacity; only applied when `transparent` is set.
    pub opacity: f32,
    /// Alpha-blend the highlight instead of drawing it opaque.
    pub transparent: bool,
    /// Whether the highlight writes depth.
    pub depth_write: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            color: [0.0, 1.0, 1.0],
            emissive: [0.0, 1.0, 1.0],
            emissive_intensity: 0.3,
            opacity: 0.8,
            transparent: true,
            depth_write: true,
        }
    }
}
