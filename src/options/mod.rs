//! Centralized viewer options with TOML preset support.
//!
//! Every tweakable setting (model placement, asset location, camera,
//! lighting, highlight look, shell text, catalog policy, input and
//! keybindings) lives here. Options serialize to/from TOML so a single
//! file can describe a deployment.

mod camera;
mod highlight;
mod keybindings;
mod lighting;
mod model;
mod shell;

use std::path::Path;

pub use camera::CameraOptions;
pub use highlight::HighlightOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
pub use model::{AssetOptions, ModelOptions};
use serde::{Deserialize, Serialize};
pub use shell::ShellOptions;

use crate::error::LensError;

/// Catalog source and integrity policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CatalogOptions {
    /// TOML file replacing the built-in tables.
    pub path: Option<String>,
    /// Refuse to start on duplicate ids, dangling references or part mesh
    /// names the loaded model does not contain.
    pub strict: bool,
}

/// Pointer gesture tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputOptions {
    /// Pointer travel in pixels beyond which a press becomes a drag and no
    /// longer selects.
    pub drag_threshold: f32,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            drag_threshold: 4.0,
        }
    }
}

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[highlight]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Model asset and placement.
    pub model: ModelOptions,
    /// Where assets are resolved from.
    pub assets: AssetOptions,
    /// Camera projection and orbit limits.
    pub camera: CameraOptions,
    /// Scene lights.
    pub lighting: LightingOptions,
    /// Look of a selected part.
    pub highlight: HighlightOptions,
    /// Header, name tag and panel text.
    pub shell: ShellOptions,
    /// Catalog source and strictness.
    pub catalog: CatalogOptions,
    /// Click/drag discrimination.
    pub input: InputOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, LensError> {
        let mut opts: Self = toml::from_str(content)
            .map_err(|e| LensError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, LensError> {
        let content = std::fs::read_to_string(path).map_err(LensError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), LensError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LensError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(LensError::Io)?;
        }
        std::fs::write(path, content).map_err(LensError::Io)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[highlight]
opacity = 0.5

[catalog]
strict = true
";
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.highlight.opacity, 0.5);
        assert!(opts.catalog.strict);
        // Everything else should be default
        assert_eq!(opts.highlight.emissive_intensity, 0.3);
        assert_eq!(opts.camera.position, [0.0, 0.0, 8.0]);
        assert_eq!(opts.model.position, [0.0, -1.0, 0.0]);
        assert_eq!(opts.shell.name_tag_distance_factor, 10.0);
        assert!(opts.catalog.path.is_none());
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("Escape"),
            Some(KeyAction::ClearSelection)
        );
        assert_eq!(opts.keybindings.lookup("KeyR"), Some(KeyAction::ResetCamera));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_are_looked_up() {
        let toml_str = r#"
[keybindings.bindings]
clear_selection = "Backspace"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("Backspace"),
            Some(KeyAction::ClearSelection)
        );
        assert_eq!(opts.keybindings.lookup("Escape"), None);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml_str("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, LensError::OptionsParse(_)));
    }

    #[test]
    fn presets_are_sorted_toml_stems() {
        let dir = std::env::temp_dir()
            .join(format!("anatomy-lens-options-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for file in ["teaching.toml", "clinic.toml", "readme.md"] {
            std::fs::write(dir.join(file), "").unwrap();
        }
        assert_eq!(Options::list_presets(&dir), ["clinic", "teaching"]);
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(Options::list_presets(&dir).is_empty());
    }
}
