use serde::{Deserialize, Serialize};

/// Text and sizing for the header, name tag and info panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellOptions {
    /// Application title in the header.
    pub title: String,
    /// Patient line under the title.
    pub patient_details: String,
    /// Logo image, relative to the asset base path.
    pub logo: String,
    /// Panel text shown while no disease is selected.
    pub placeholder: String,
    /// World distance at which the name tag renders at scale 1.
    pub name_tag_distance_factor: f32,
    /// Info panel width in logical pixels.
    pub panel_width: u32,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            title: "The Patient's Lens".into(),
            patient_details: "Chiron, Stark | 08/22/1990 | 34 | M".into(),
            logo: "guardian-logo color.png".into(),
            placeholder: "Click on a body part or select a disease from the \
                          list to learn more!"
                .into(),
            name_tag_distance_factor: 10.0,
            panel_width: 360,
        }
    }
}
