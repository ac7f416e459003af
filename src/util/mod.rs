//! Small shared helpers.

/// Redraw pacing and FPS tracking.
pub mod frame_timing;
