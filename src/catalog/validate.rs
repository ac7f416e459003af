//! Referential-integrity checks across the three catalog tables.
//!
//! The tables are authored independently, so nothing stops a disease from
//! naming a part that does not exist or a part from naming a mesh the asset
//! never contains. These checks run once at startup; lenient mode logs the
//! findings, strict mode refuses to start.

use std::fmt;

use rustc_hash::FxHashSet;

use super::Catalog;

/// Which catalog table an issue was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// The clickable-part table.
    Parts,
    /// The organ-info table.
    Organs,
    /// The disease table.
    Diseases,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parts => write!(f, "parts"),
            Self::Organs => write!(f, "organs"),
            Self::Diseases => write!(f, "diseases"),
        }
    }
}

/// A single integrity finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// The same id appears more than once in one table.
    DuplicateId {
        /// Table containing the duplicate.
        table: Table,
        /// The repeated id.
        id: String,
    },
    /// A disease names a part id that no part or organ carries.
    DanglingPartReference {
        /// The disease holding the reference.
        disease_id: String,
        /// The unresolved part id.
        part_id: String,
    },
    /// A part names a mesh that the loaded scene does not contain.
    MissingMesh {
        /// The part holding the mesh name.
        part_id: String,
        /// The unresolved mesh name.
        mesh_name: String,
    },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { table, id } => {
                write!(f, "duplicate id '{id}' in {table}")
            }
            Self::DanglingPartReference {
                disease_id,
                part_id,
            } => write!(
                f,
                "disease '{disease_id}' references unknown part '{part_id}'"
            ),
            Self::MissingMesh { part_id, mesh_name } => write!(
                f,
                "part '{part_id}' maps to mesh '{mesh_name}' which is not in \
                 the scene"
            ),
        }
    }
}

/// Integrity failure reported in strict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogError {
    issues: Vec<CatalogIssue>,
}

impl CatalogError {
    /// The individual findings.
    #[must_use]
    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} catalog issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CatalogError {}

fn duplicates<'a>(
    table: Table,
    ids: impl Iterator<Item = &'a str>,
    out: &mut Vec<CatalogIssue>,
) {
    let mut seen = FxHashSet::default();
    let mut reported = FxHashSet::default();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            out.push(CatalogIssue::DuplicateId {
                table,
                id: id.to_owned(),
            });
        }
    }
}

impl Catalog {
    /// Cross-table checks that need no scene: unique ids per table and
    /// resolvable `related_part_id` references.
    #[must_use]
    pub fn integrity_issues(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        duplicates(
            Table::Parts,
            self.parts.iter().map(|p| p.id.as_str()),
            &mut issues,
        );
        duplicates(
            Table::Organs,
            self.organs.iter().map(|o| o.id.as_str()),
            &mut issues,
        );
        duplicates(
            Table::Diseases,
            self.diseases.iter().map(|d| d.id.as_str()),
            &mut issues,
        );

        for disease in &self.diseases {
            let known = self.part(&disease.related_part_id).is_some()
                || self.organ(&disease.related_part_id).is_some();
            if !known {
                issues.push(CatalogIssue::DanglingPartReference {
                    disease_id: disease.id.clone(),
                    part_id: disease.related_part_id.clone(),
                });
            }
        }
        issues
    }

    /// Parts whose mesh name does not occur among `mesh_names`.
    #[must_use]
    pub fn mesh_issues<'a>(
        &self,
        mesh_names: impl IntoIterator<Item = &'a str>,
    ) -> Vec<CatalogIssue> {
        let present: FxHashSet<&str> = mesh_names.into_iter().collect();
        self.parts
            .iter()
            .filter(|p| !present.contains(p.mesh_name.as_str()))
            .map(|p| CatalogIssue::MissingMesh {
                part_id: p.id.clone(),
                mesh_name: p.mesh_name.clone(),
            })
            .collect()
    }
}

/// Apply the configured policy to a set of findings.
///
/// Lenient mode logs each finding as a warning and succeeds; strict mode
/// fails with every finding attached.
///
/// # Errors
///
/// Returns [`CatalogError`] when `strict` is set and `issues` is not empty.
pub fn enforce(
    issues: Vec<CatalogIssue>,
    strict: bool,
) -> Result<(), CatalogError> {
    if issues.is_empty() {
        return Ok(());
    }
    if strict {
        return Err(CatalogError { issues });
    }
    for issue in &issues {
        log::warn!("catalog: {issue}");
    }
    Ok(())
}

impl Catalog {
    /// Run the scene-independent checks and apply the strictness policy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] in strict mode when any check fails.
    pub fn validate(&self, strict: bool) -> Result<(), CatalogError> {
        enforce(self.integrity_issues(), strict)
    }
}
