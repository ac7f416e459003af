use serde::{Deserialize, Serialize};

use crate::engine::command::LensCommand;

/// Actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// clear_selection = "Escape"
/// reset_camera = "KeyR"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Deselect everything and close the info panel.
    ClearSelection,
    /// Return the camera to its configured start pose.
    ResetCamera,
    /// Ask the host to pick another model file. Only hosts with a file
    /// dialog act on it.
    OpenModel,
}

impl KeyAction {
    /// The engine command for this action, or `None` for host-level
    /// actions.
    #[must_use]
    pub fn command(self) -> Option<LensCommand> {
        match self {
            Self::ClearSelection => Some(LensCommand::ClearSelection),
            Self::ResetCamera => Some(LensCommand::ResetCamera),
            Self::OpenModel => None,
        }
    }
}
