//! Camera system for viewing the anatomy model.
//!
//! Provides an orbit camera with rotation, panning, distance-clamped zoom,
//! screen-ray construction for picking, and world-to-screen projection for
//! the name tag.

/// Orbit camera controller: rotate, pan, zoom, reset, rays and projection.
pub mod controller;
/// Core camera struct and GPU uniform type.
pub mod core;

pub use controller::OrbitCamera;
