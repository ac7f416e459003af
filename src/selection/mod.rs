//! Selection state and its two transitions.
//!
//! The selection is the active part, where it was clicked, and the disease
//! shown for it. The disease is always derived from the part in the same
//! transition: it is the first disease in the catalog whose
//! `related_part_id` equals the part id.

use glam::Vec3;

use crate::catalog::Catalog;

/// Current selection. All three fields are `None` when nothing is selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    /// Logical part id of the selected region.
    pub active_part_id: Option<String>,
    /// World-space point where the part was clicked.
    pub active_click_point: Option<Vec3>,
    /// Disease shown in the info panel.
    pub active_disease_id: Option<String>,
}

impl SelectionState {
    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_part_id.is_none()
            && self.active_click_point.is_none()
            && self.active_disease_id.is_none()
    }
}

/// Owns the [`SelectionState`] and applies transitions to it.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Controller with an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection.
    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Select `part_id`, clicked at `point`.
    ///
    /// Selecting the id that is already active deselects it. Otherwise the
    /// part and point are stored and the disease is re-derived from the
    /// catalog; an id no disease refers to leaves the disease empty.
    /// Unknown part ids are accepted.
    ///
    /// `None` compares like any other id: from an empty selection it clears,
    /// from an active one it stores the point with no part or disease.
    /// Background clicks pass `(None, None)` and so always end cleared.
    pub fn select(
        &mut self,
        part_id: Option<String>,
        point: Option<Vec3>,
        catalog: &Catalog,
    ) {
        if self.state.active_part_id == part_id {
            log::debug!("selection: {part_id:?} toggled off");
            self.clear_all();
            return;
        }

        let disease = part_id
            .as_deref()
            .and_then(|id| catalog.first_disease_for_part(id))
            .map(|d| d.id.clone());
        log::debug!("selection: part {part_id:?}, disease {disease:?}");
        self.state = SelectionState {
            active_part_id: part_id,
            active_click_point: point,
            active_disease_id: disease,
        };
    }

    /// Clear all three fields.
    pub fn clear_all(&mut self) {
        self.state = SelectionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Option<Vec3> {
        Some(Vec3::new(0.1, 0.4, 0.2))
    }

    #[test]
    fn selecting_heart_sets_heart_attack() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionController::new();
        sel.select(Some("heart_3d".into()), point(), &catalog);
        let s = sel.state();
        assert_eq!(s.active_part_id.as_deref(), Some("heart_3d"));
        assert_eq!(s.active_click_point, point());
        assert_eq!(s.active_disease_id.as_deref(), Some("heart_attack"));
    }

    #[test]
    fn selecting_same_part_twice_clears() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionController::new();
        sel.select(Some("heart_3d".into()), point(), &catalog);
        sel.select(Some("heart_3d".into()), Some(Vec3::ZERO), &catalog);
        assert!(sel.state().is_empty());
    }

    #[test]
    fn selecting_another_part_replaces_everything() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionController::new();
        sel.select(Some("heart_3d".into()), point(), &catalog);
        sel.select(Some("arm".into()), Some(Vec3::X), &catalog);
        let s = sel.state();
        assert_eq!(s.active_part_id.as_deref(), Some("arm"));
        assert_eq!(s.active_click_point, Some(Vec3::X));
        assert_eq!(s.active_disease_id, None);
    }

    #[test]
    fn unknown_part_is_kept_without_disease() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionController::new();
        sel.select(Some("spleen".into()), point(), &catalog);
        let s = sel.state();
        assert_eq!(s.active_part_id.as_deref(), Some("spleen"));
        assert_eq!(s.active_disease_id, None);
    }

    #[test]
    fn background_click_always_clears() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionController::new();
        sel.select(None, None, &catalog);
        assert!(sel.state().is_empty());
        sel.select(Some("head".into()), point(), &catalog);
        sel.select(None, None, &catalog);
        assert!(sel.state().is_empty());
    }

    #[test]
    fn no_part_with_a_point_keeps_only_the_point() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionController::new();
        sel.select(Some("head".into()), point(), &catalog);
        sel.select(None, point(), &catalog);
        assert_eq!(
            sel.state(),
            &SelectionState {
                active_part_id: None,
                active_click_point: point(),
                active_disease_id: None,
            }
        );

        // From an empty selection the same call matches the active `None`
        let mut empty = SelectionController::new();
        empty.select(None, point(), &catalog);
        assert!(empty.state().is_empty());
    }

    #[test]
    fn clear_all_from_any_state() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionController::new();
        sel.clear_all();
        assert!(sel.state().is_empty());
        sel.select(Some("kidney_3d".into()), None, &catalog);
        assert_eq!(
            sel.state().active_disease_id.as_deref(),
            Some("kidney_stones")
        );
        sel.clear_all();
        assert_eq!(*sel.state(), SelectionState::default());
    }
}
