//! Static lookup tables: clickable parts, organ metadata and diseases.
//!
//! The tables are read-only after startup. Lookups are linear scans over a
//! handful of records and every miss degrades to `None`; nothing here is an
//! error path except loading an override file.

mod diseases;
mod organs;
mod parts;
mod validate;

use std::path::Path;

pub use diseases::DiseaseRecord;
pub use organs::{IconSize, OrganInfo};
pub use parts::ClickablePart;
use serde::{Deserialize, Serialize};
pub use validate::{enforce, CatalogError, CatalogIssue, Table};

use crate::error::LensError;

/// The three content tables that drive selection and the info panel.
///
/// Load the built-in content with [`Catalog::builtin`], or remap mesh names
/// and content with a TOML file of the same shape:
///
/// ```toml
/// [[parts]]
/// id = "heart_3d"
/// display_name = "Heart"
/// mesh_name = "VH_M_heart"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    parts: Vec<ClickablePart>,
    organs: Vec<OrganInfo>,
    diseases: Vec<DiseaseRecord>,
}

impl Catalog {
    /// The content shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            parts: parts::builtin(),
            organs: organs::builtin(),
            diseases: diseases::builtin(),
        }
    }

    /// Assemble a catalog from explicit tables.
    #[must_use]
    pub fn new(
        parts: Vec<ClickablePart>,
        organs: Vec<OrganInfo>,
        diseases: Vec<DiseaseRecord>,
    ) -> Self {
        Self {
            parts,
            organs,
            diseases,
        }
    }

    /// Parse a catalog from TOML text. Missing tables are empty.
    pub fn from_toml_str(content: &str) -> Result<Self, LensError> {
        toml::from_str(content)
            .map_err(|e| LensError::CatalogParse(e.to_string()))
    }

    /// Load a catalog override file.
    pub fn load(path: &Path) -> Result<Self, LensError> {
        let content = std::fs::read_to_string(path).map_err(LensError::Io)?;
        Self::from_toml_str(&content)
    }

    /// All clickable parts, in table order.
    #[must_use]
    pub fn parts(&self) -> &[ClickablePart] {
        &self.parts
    }

    /// All organ entries, in table order.
    #[must_use]
    pub fn organs(&self) -> &[OrganInfo] {
        &self.organs
    }

    /// All disease records, in table order.
    #[must_use]
    pub fn diseases(&self) -> &[DiseaseRecord] {
        &self.diseases
    }

    /// Part with the given logical id.
    #[must_use]
    pub fn part(&self, id: &str) -> Option<&ClickablePart> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// First part mapped to `mesh_name`.
    #[must_use]
    pub fn part_for_mesh(&self, mesh_name: &str) -> Option<&ClickablePart> {
        self.parts.iter().find(|p| p.mesh_name == mesh_name)
    }

    /// Whether any part entry pairs `part_id` with `mesh_name`.
    ///
    /// Several entries may share an id, so this is not the same as looking
    /// the part up by id and comparing its mesh name.
    #[must_use]
    pub fn part_owns_mesh(&self, part_id: &str, mesh_name: &str) -> bool {
        self.parts
            .iter()
            .any(|p| p.id == part_id && p.mesh_name == mesh_name)
    }

    /// Organ entry with the given id.
    #[must_use]
    pub fn organ(&self, id: &str) -> Option<&OrganInfo> {
        self.organs.iter().find(|o| o.id == id)
    }

    /// Disease with the given id.
    #[must_use]
    pub fn disease(&self, id: &str) -> Option<&DiseaseRecord> {
        self.diseases.iter().find(|d| d.id == id)
    }

    /// First disease related to `part_id`, in table order.
    #[must_use]
    pub fn first_disease_for_part(
        &self,
        part_id: &str,
    ) -> Option<&DiseaseRecord> {
        self.diseases.iter().find(|d| d.related_part_id == part_id)
    }

    /// Save the catalog as TOML, e.g. to start a mesh-name mapping from the
    /// built-in content.
    pub fn save(&self, path: &Path) -> Result<(), LensError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LensError::CatalogParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(LensError::Io)?;
        }
        std::fs::write(path, content).map_err(LensError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_have_expected_sizes() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.parts().len(), 9);
        assert_eq!(catalog.organs().len(), 8);
        assert_eq!(catalog.diseases().len(), 5);
    }

    #[test]
    fn malformed_toml_is_a_catalog_error() {
        let err = Catalog::from_toml_str("[[parts]\nid = ").unwrap_err();
        assert!(matches!(err, LensError::CatalogParse(_)));
        assert!(err.to_string().starts_with("catalog parse error"));
    }

    #[test]
    fn heart_mesh_resolves_to_heart_part() {
        let catalog = Catalog::builtin();
        let part = catalog.part_for_mesh("VH_M_heart").unwrap();
        assert_eq!(part.id, "heart_3d");
        assert_eq!(part.display_name, "Heart");
        assert!(catalog.part_for_mesh("Nope").is_none());
    }

    #[test]
    fn first_disease_for_part_follows_table_order() {
        let mut catalog = Catalog::builtin();
        catalog.diseases.push(DiseaseRecord {
            id: "arrhythmia".into(),
            display_name: "Arrhythmia".into(),
            related_part_id: "heart_3d".into(),
            description: String::new(),
            symptoms: Vec::new(),
            treatments: Vec::new(),
            consult_guidance: String::new(),
        });
        let disease = catalog.first_disease_for_part("heart_3d").unwrap();
        assert_eq!(disease.id, "heart_attack");
        assert!(catalog.first_disease_for_part("arm").is_none());
    }

    #[test]
    fn organ_lookup_yields_at_most_one_icon_per_disease() {
        let catalog = Catalog::builtin();
        for disease in catalog.diseases() {
            let matches = catalog
                .organs()
                .iter()
                .filter(|o| o.id == disease.related_part_id)
                .count();
            assert!(matches <= 1, "{} has {matches} organs", disease.id);
        }
        // lungs_3d has no organ entry; the organ is keyed "lungs".
        assert!(catalog.organ("lungs_3d").is_none());
        assert!(catalog.organ("heart_3d").unwrap().icon.is_some());
    }

    #[test]
    fn builtin_catalog_passes_strict_integrity() {
        let catalog = Catalog::builtin();
        assert!(catalog.integrity_issues().is_empty());
        assert!(enforce(catalog.integrity_issues(), true).is_ok());
    }

    #[test]
    fn dangling_reference_and_duplicates_are_reported() {
        let mut catalog = Catalog::builtin();
        catalog.diseases[0].related_part_id = "spleen".into();
        let dup = catalog.parts[0].clone();
        catalog.parts.push(dup.clone());
        catalog.parts.push(dup);

        let issues = catalog.integrity_issues();
        assert!(issues.contains(&CatalogIssue::DuplicateId {
            table: Table::Parts,
            id: "head".into(),
        }));
        assert!(issues.contains(&CatalogIssue::DanglingPartReference {
            disease_id: "migraine".into(),
            part_id: "spleen".into(),
        }));
        // A triple is reported once.
        assert_eq!(issues.len(), 2);

        let err = enforce(issues.clone(), true).unwrap_err();
        assert_eq!(err.issues().len(), 2);
        assert!(enforce(issues, false).is_ok());
    }

    #[test]
    fn mesh_issues_list_unmapped_parts() {
        let catalog = Catalog::builtin();
        let issues = catalog.mesh_issues(["VH_M_heart", "Allen_brain"]);
        assert_eq!(issues.len(), 7);
        assert!(!issues.iter().any(|i| matches!(
            i,
            CatalogIssue::MissingMesh { part_id, .. } if part_id == "heart_3d"
        )));
    }

    #[test]
    fn toml_override_parses_partial_tables() {
        let content = r#"
[[parts]]
id = "heart_3d"
display_name = "Heart"
mesh_name = "Heart_Mesh"

[[diseases]]
id = "heart_attack"
display_name = "Heart Attack"
related_part_id = "heart_3d"
symptoms = ["Chest pain"]
"#;
        let catalog = Catalog::from_toml_str(content).unwrap();
        assert_eq!(catalog.parts().len(), 1);
        assert_eq!(catalog.parts()[0].position_offset, [0.0; 3]);
        assert!(catalog.organs().is_empty());
        let disease = catalog.disease("heart_attack").unwrap();
        assert_eq!(disease.symptoms, vec!["Chest pain".to_owned()]);
        assert!(disease.treatments.is_empty());
    }

    #[test]
    fn builtin_round_trips_through_toml() {
        let catalog = Catalog::builtin();
        let text = toml::to_string_pretty(&catalog).unwrap();
        assert_eq!(Catalog::from_toml_str(&text).unwrap(), catalog);
    }
}
