use serde::{Deserialize, Serialize};

/// A region of the body model that responds to clicks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickablePart {
    /// Logical part id, unique within the catalog.
    pub id: String,
    /// Label shown in the floating name tag.
    pub display_name: String,
    /// Name of the mesh node in the loaded asset. A name that matches no
    /// mesh simply never highlights.
    pub mesh_name: String,
    /// Suggested label anchor relative to the model origin.
    #[serde(default)]
    pub position_offset: [f32; 3],
}

impl ClickablePart {
    fn new(
        id: &str,
        display_name: &str,
        mesh_name: &str,
        position_offset: [f32; 3],
    ) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            mesh_name: mesh_name.to_owned(),
            position_offset,
        }
    }
}

/// Built-in part table. Most mesh names are placeholders until the asset's
/// real node names are mapped (see the catalog TOML override).
pub(super) fn builtin() -> Vec<ClickablePart> {
    vec![
        ClickablePart::new(
            "head",
            "Head",
            "YourModel_Head_Mesh_Name",
            [0.0, 0.5, 0.0],
        ),
        ClickablePart::new(
            "torso",
            "Torso",
            "YourModel_Torso_Mesh_Name",
            [0.0, -0.5, 0.0],
        ),
        ClickablePart::new(
            "arm",
            "Arm",
            "YourModel_Arm_Mesh_Name",
            [0.5, 0.0, 0.0],
        ),
        ClickablePart::new(
            "leg",
            "Leg",
            "YourModel_Leg_Mesh_Name",
            [0.0, -1.5, 0.0],
        ),
        ClickablePart::new("brain", "Brain", "Allen_brain", [0.0, 0.5, 0.0]),
        ClickablePart::new("heart_3d", "Heart", "VH_M_heart", [0.1, -0.2, 0.0]),
        ClickablePart::new(
            "lungs_3d",
            "Lungs",
            "YourModel_Lungs_Mesh_Name",
            [-0.1, -0.2, 0.0],
        ),
        ClickablePart::new(
            "stomach_3d",
            "Stomach",
            "YourModel_Stomach_Mesh_Name",
            [0.2, -0.5, 0.0],
        ),
        ClickablePart::new(
            "kidney_3d",
            "Kidney",
            "YourModel_Kidney_Mesh_Name",
            [0.2, -0.6, 0.0],
        ),
    ]
}
