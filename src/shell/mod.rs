//! Presentation shell: a pure projection of the selection and catalog into
//! everything drawn on top of the 3D viewport.
//!
//! [`ShellView::project`] has no side effects. The browser host renders the
//! result through [`html`]; the native webview receives it as JSON.

pub mod html;

use glam::Vec3;
use serde::Serialize;

use crate::camera::OrbitCamera;
use crate::catalog::Catalog;
use crate::options::Options;
use crate::selection::SelectionState;

/// Header bar content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    /// Resolved logo URL.
    pub logo_url: String,
    /// Application title.
    pub title: String,
    /// Patient line under the title.
    pub patient_details: String,
}

/// Floating label anchored at the click point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameTagView {
    /// Part display name.
    pub label: String,
    /// World-space anchor.
    pub world: [f32; 3],
    /// Anchor in viewport pixels; `None` when it is behind the camera.
    pub screen: Option<[f32; 2]>,
    /// CSS scale so the tag shrinks with distance.
    pub scale: f32,
}

/// Organ icon shown in the disease panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconView {
    /// Resolved image URL.
    pub url: String,
    /// Alt text, `"<organ> Organ"`.
    pub alt: String,
    /// Display width in CSS pixels, if the organ specifies one.
    pub width: Option<u32>,
    /// Display height in CSS pixels, if the organ specifies one.
    pub height: Option<u32>,
}

/// A button at the bottom of the disease panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelAction {
    /// Stable action id sent back by the UI.
    pub id: String,
    /// Button label.
    pub label: String,
}

/// Disease details for the info panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseView {
    /// Disease id.
    pub disease_id: String,
    /// `"<disease name> Information"`.
    pub title: String,
    /// Organ icon, when the related organ has one.
    pub icon: Option<IconView>,
    /// Description, omitted when empty.
    pub description: Option<String>,
    /// Symptoms; an empty list hides the section.
    pub symptoms: Vec<String>,
    /// Treatments; an empty list hides the section.
    pub treatments: Vec<String>,
    /// When to consult, omitted when empty.
    pub consult: Option<String>,
    /// Action buttons.
    pub actions: Vec<PanelAction>,
}

/// Right-hand info panel body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfoPanel {
    /// Nothing selected, or the selected part has no disease.
    Placeholder {
        /// Prompt text.
        prompt: String,
    },
    /// A disease is active.
    Disease(DiseaseView),
}

/// Everything the overlay layer shows for the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellView {
    /// Header bar.
    pub header: HeaderView,
    /// Name tag, present while a known part is selected with a click point.
    pub name_tag: Option<NameTagView>,
    /// Info panel body.
    pub info_panel: InfoPanel,
}

fn non_empty(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_owned())
}

impl ShellView {
    /// Project the current state.
    #[must_use]
    pub fn project(
        state: &SelectionState,
        catalog: &Catalog,
        options: &Options,
        camera: &OrbitCamera,
        viewport: (u32, u32),
    ) -> Self {
        let header = HeaderView {
            logo_url: options.assets.resolve(&options.shell.logo),
            title: options.shell.title.clone(),
            patient_details: options.shell.patient_details.clone(),
        };

        let name_tag = match (&state.active_part_id, state.active_click_point) {
            (Some(part_id), Some(point)) => catalog.part(part_id).map(|part| {
                name_tag(&part.display_name, point, options, camera, viewport)
            }),
            _ => None,
        };

        let info_panel = state
            .active_disease_id
            .as_deref()
            .and_then(|id| disease_view(id, catalog, options))
            .map_or_else(
                || InfoPanel::Placeholder {
                    prompt: options.shell.placeholder.clone(),
                },
                InfoPanel::Disease,
            );

        Self {
            header,
            name_tag,
            info_panel,
        }
    }

    /// Serialize for the webview bridge.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("failed to serialize shell view: {e}");
            "null".into()
        })
    }
}

fn name_tag(
    label: &str,
    point: Vec3,
    options: &Options,
    camera: &OrbitCamera,
    viewport: (u32, u32),
) -> NameTagView {
    let distance = camera.distance_to(point).max(f32::EPSILON);
    let half_fov = (camera.camera.fovy.to_radians() * 0.5).tan();
    let scale = options.shell.name_tag_distance_factor / (2.0 * half_fov * distance);
    NameTagView {
        label: label.to_owned(),
        world: point.to_array(),
        screen: camera.project(point, viewport).map(|p| p.to_array()),
        scale,
    }
}

fn disease_view(
    disease_id: &str,
    catalog: &Catalog,
    options: &Options,
) -> Option<DiseaseView> {
    let disease = catalog.disease(disease_id)?;
    let icon = catalog.organ(&disease.related_part_id).and_then(|organ| {
        let path = organ.icon.as_deref().filter(|p| !p.is_empty())?;
        Some(IconView {
            url: options.assets.resolve(path),
            alt: format!("{} Organ", organ.display_name),
            width: organ.hover_size.map(|s| s.width),
            height: organ.hover_size.map(|s| s.height),
        })
    });
    Some(DiseaseView {
        disease_id: disease.id.clone(),
        title: format!("{} Information", disease.display_name),
        icon,
        description: non_empty(&disease.description),
        symptoms: disease.symptoms.clone(),
        treatments: disease.treatments.clone(),
        consult: non_empty(&disease.consult_guidance),
        actions: vec![
            PanelAction {
                id: "consult".into(),
                label: "Consultation".into(),
            },
            PanelAction {
                id: "more_info".into(),
                label: "More Info".into(),
            },
        ],
    })
}
