//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a pointer
//! gesture, a panel button or a programmatic call, is represented as a
//! `LensCommand`. Consumers construct commands and pass them to
//! [`LensEngine::execute`](super::LensEngine::execute).

use glam::{Vec2, Vec3};

/// A discrete or parameterized operation the engine can perform.
///
/// The engine never cares *how* a command was triggered:
///
/// ```ignore
/// engine.execute(LensCommand::ClearSelection);
/// engine.execute(LensCommand::Zoom { delta: 1.0 });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum LensCommand {
    // ── Selection ───────────────────────────────────────────────────
    /// A click at a viewport position. The engine casts a ray, resolves
    /// the hit mesh to a part and runs the selection transition.
    Click {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },

    /// Select a part directly, as if its mesh had been clicked. Selecting
    /// the active part again clears the selection; `None` clears it too.
    SelectPart {
        /// Logical part id.
        part_id: Option<String>,
        /// World-space anchor for the name tag.
        point: Option<Vec3>,
    },

    /// Clear the selection and close the info panel.
    ClearSelection,

    // ── Camera ──────────────────────────────────────────────────────
    /// Orbit the camera by `delta` pixels of pointer movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the orbit target by `delta` pixels of pointer movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom the camera (positive = zoom in, negative = zoom out).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },

    /// Return the camera to its configured start pose.
    ResetCamera,
}
