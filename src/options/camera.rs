use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection, initial placement and orbit limits.
pub struct CameraOptions {
    /// Initial eye position in world space.
    pub position: [f32; 3],
    /// Orbit target the camera looks at and rotates around.
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Closest allowed eye-to-target distance.
    pub min_distance: f32,
    /// Farthest allowed eye-to-target distance.
    pub max_distance: f32,
    /// Allow shift+drag panning.
    pub enable_pan: bool,
    /// Allow wheel zoom.
    pub enable_zoom: bool,
    /// Radians of orbit per pixel of drag.
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    pub pan_speed: f32,
    /// Fractional distance change per wheel step.
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 8.0],
            target: [0.0, -0.5, 0.0],
            fovy: 60.0,
            znear: 0.1,
            zfar: 200.0,
            min_distance: 1.0,
            max_distance: 15.0,
            enable_pan: true,
            enable_zoom: true,
            rotate_speed: 0.005,
            pan_speed: 1.0,
            zoom_speed: 0.1,
        }
    }
}
