use serde::{Deserialize, Serialize};

/// Display size of an organ icon, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSize {
    /// Icon width.
    pub width: u32,
    /// Icon height.
    pub height: u32,
}

/// Icon and sizing metadata for a body part or organ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganInfo {
    /// Organ id, conventionally equal to a part id or a disease's related
    /// part id.
    pub id: String,
    /// Human-readable organ name, used as the icon's alt text.
    pub display_name: String,
    /// Icon path relative to the asset base path.
    #[serde(default)]
    pub icon: Option<String>,
    /// Icon display size.
    #[serde(default)]
    pub hover_size: Option<IconSize>,
}

impl OrganInfo {
    fn with_icon(
        id: &str,
        display_name: &str,
        icon: &str,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            icon: Some(icon.to_owned()),
            hover_size: Some(IconSize { width, height }),
        }
    }

    fn plain(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            icon: None,
            hover_size: None,
        }
    }
}

pub(super) fn builtin() -> Vec<OrganInfo> {
    vec![
        OrganInfo::with_icon("head", "Head", "organ_brain.svg", 40, 40),
        OrganInfo::with_icon("lungs", "Lungs", "organ_lungs.svg", 90, 80),
        OrganInfo::with_icon("heart_3d", "Heart", "organ_heart.svg", 70, 70),
        OrganInfo::with_icon(
            "stomach_3d",
            "Stomach",
            "organ_stomach.svg",
            80,
            70,
        ),
        OrganInfo::with_icon(
            "kidney_3d",
            "Kidney",
            "organ_kidney.svg",
            70,
            70,
        ),
        OrganInfo::plain("arm", "Arm"),
        OrganInfo::plain("leg", "Leg"),
        OrganInfo::plain("torso", "Torso"),
    ]
}
