use serde::{Deserialize, Serialize};

/// Scene lights: one ambient term, a spot light and a point light.
///
/// Both positional lights have no distance falloff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingOptions {
    /// Ambient light intensity.
    pub ambient: f32,
    /// Spot light position; it points at the world origin.
    pub spot_position: [f32; 3],
    /// Spot cone half-angle in radians.
    pub spot_angle: f32,
    /// Fraction of the cone that fades out toward the edge (0..=1).
    pub spot_penumbra: f32,
    /// Spot light intensity.
    pub spot_intensity: f32,
    /// Point light position.
    pub point_position: [f32; 3],
    /// Point light intensity.
    pub point_intensity: f32,
    /// Clear color behind the model (linear RGB).
    pub background: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            spot_position: [10.0, 10.0, 10.0],
            spot_angle: 0.15,
            spot_penumbra: 1.0,
            spot_intensity: 1.0,
            point_position: [-10.0, -10.0, -10.0],
            point_intensity: 1.0,
            background: [0.02, 0.03, 0.06],
        }
    }
}
