//! Model presenter: turns the selection into mesh materials and turns raw
//! click hits into part ids.
//!
//! Every mesh's original material is remembered the first time the
//! presenter sees it. A highlight material is created the first time a mesh
//! needs one and reused afterwards, so toggling a part on and off never
//! grows the material library past one highlight per mesh.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::catalog::{enforce, Catalog, CatalogError};
use crate::options::HighlightOptions;
use crate::picking::ClickHit;
use crate::scene::{Material, MaterialHandle, MaterialLibrary, MeshId, Scene};

/// A click resolved against the catalog.
///
/// Both fields are `None` for background clicks and for meshes no part
/// maps to; the point is only reported together with a part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartClick {
    /// Logical part id of the first part mapped to the hit mesh.
    pub part_id: Option<String>,
    /// World-space click point.
    pub point: Option<Vec3>,
}

/// Per-mesh material bookkeeping for one loaded scene.
pub struct ModelPresenter {
    highlight: HighlightOptions,
    originals: FxHashMap<MeshId, MaterialHandle>,
    highlights: FxHashMap<MeshId, MaterialHandle>,
}

impl ModelPresenter {
    /// Presenter that builds highlights from `highlight`.
    #[must_use]
    pub fn new(highlight: HighlightOptions) -> Self {
        Self {
            highlight,
            originals: FxHashMap::default(),
            highlights: FxHashMap::default(),
        }
    }

    /// One-time setup for a freshly loaded scene.
    ///
    /// Logs the node hierarchy at debug level and the mesh count at info
    /// level, records every mesh's original material, and checks the
    /// catalog's mesh names against the scene. Missing names are warnings
    /// unless `strict` is set.
    pub fn setup(
        &mut self,
        scene: &Scene,
        catalog: &Catalog,
        strict: bool,
    ) -> Result<(), CatalogError> {
        self.originals.clear();
        self.highlights.clear();

        log::debug!("model structure:");
        for node in scene.nodes() {
            log::debug!(
                "{:indent$}- {} (meshes: {})",
                "",
                node.name,
                node.mesh_count,
                indent = 2 + node.depth * 2
            );
        }
        log::info!("found {} meshes in the model", scene.mesh_count());

        for mesh in scene.meshes() {
            let _ = self.originals.insert(mesh.id, mesh.material);
        }

        enforce(catalog.mesh_issues(scene.mesh_names()), strict)
    }

    /// Re-derive every mesh's material from the active part.
    ///
    /// A mesh is highlighted when some catalog part has
    /// `id == active_part_id` and `mesh_name == mesh.name`; every other mesh
    /// gets its original material back. Returns the number of highlighted
    /// meshes.
    pub fn apply(
        &mut self,
        scene: &mut Scene,
        materials: &mut MaterialLibrary,
        catalog: &Catalog,
        active_part_id: Option<&str>,
    ) -> usize {
        let mut assignments = Vec::with_capacity(scene.mesh_count());
        for mesh in scene.meshes() {
            let original = *self.originals.entry(mesh.id).or_insert(mesh.material);
            let eligible = active_part_id
                .is_some_and(|part| catalog.part_owns_mesh(part, &mesh.name));
            let handle = if eligible {
                *self.highlights.entry(mesh.id).or_insert_with(|| {
                    materials.add(Material::highlight(&mesh.name, &self.highlight))
                })
            } else {
                original
            };
            assignments.push((mesh.id, handle, eligible));
        }

        let mut highlighted = 0;
        for (id, handle, eligible) in assignments {
            let _ = scene.set_material(id, handle);
            if eligible {
                highlighted += 1;
            }
        }
        highlighted
    }

    /// Map a click hit to the first part whose mesh name matches.
    #[must_use]
    pub fn resolve_click(catalog: &Catalog, hit: &ClickHit) -> PartClick {
        let Some(name) = hit.hit_mesh_name.as_deref() else {
            log::debug!("click on background");
            return PartClick::default();
        };
        if let Some(part) = catalog.part_for_mesh(name) {
            log::debug!("click on '{name}' → part '{}'", part.id);
            PartClick {
                part_id: Some(part.id.clone()),
                point: hit.world_point,
            }
        } else {
            log::debug!("click on '{name}' matches no part");
            PartClick::default()
        }
    }

    /// The remembered original material of a mesh.
    #[must_use]
    pub fn original(&self, id: MeshId) -> Option<MaterialHandle> {
        self.originals.get(&id).copied()
    }

    /// The highlight material of a mesh, if one has been created.
    #[must_use]
    pub fn highlight(&self, id: MeshId) -> Option<MaterialHandle> {
        self.highlights.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;
    use crate::scene::tests::quad;

    struct Fixture {
        scene: Scene,
        materials: MaterialLibrary,
        catalog: Catalog,
        presenter: ModelPresenter,
        heart: MeshId,
        skin: MeshId,
        skin_material: MaterialHandle,
    }

    fn fixture() -> Fixture {
        let mut materials = MaterialLibrary::new();
        let skin_material = materials.add(Material::default());
        let heart_material = materials.add(Material::default());
        let mut scene = Scene::new();
        let skin = scene.add_mesh("Body_Skin", Mat4::IDENTITY, quad(), skin_material);
        let heart = scene.add_mesh("VH_M_heart", Mat4::IDENTITY, quad(), heart_material);
        let catalog = Catalog::builtin();
        let mut presenter = ModelPresenter::new(HighlightOptions::default());
        presenter.setup(&scene, &catalog, false).unwrap();
        Fixture {
            scene,
            materials,
            catalog,
            presenter,
            heart,
            skin,
            skin_material,
        }
    }

    fn apply(f: &mut Fixture, part: Option<&str>) -> usize {
        f.presenter
            .apply(&mut f.scene, &mut f.materials, &f.catalog, part)
    }

    fn material_of(f: &Fixture, id: MeshId) -> MaterialHandle {
        f.scene.mesh(id).unwrap().material
    }

    #[test]
    fn active_part_highlights_only_its_mesh() {
        let mut f = fixture();
        assert_eq!(apply(&mut f, Some("heart_3d")), 1);
        let heart = material_of(&f, f.heart);
        assert_eq!(Some(heart), f.presenter.highlight(f.heart));
        assert_eq!(material_of(&f, f.skin), f.skin_material);
        let m = f.materials.get(heart).unwrap();
        assert_eq!(m.base_color, [0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn clearing_restores_originals() {
        let mut f = fixture();
        let original = material_of(&f, f.heart);
        let _ = apply(&mut f, Some("heart_3d"));
        assert_eq!(apply(&mut f, None), 0);
        assert_eq!(material_of(&f, f.heart), original);
        assert_eq!(f.presenter.original(f.heart), Some(original));
    }

    #[test]
    fn highlight_is_created_once_and_reused() {
        let mut f = fixture();
        let _ = apply(&mut f, Some("heart_3d"));
        let first = material_of(&f, f.heart);
        let count = f.materials.len();
        let _ = apply(&mut f, None);
        let _ = apply(&mut f, Some("heart_3d"));
        assert_eq!(material_of(&f, f.heart), first);
        assert_eq!(f.materials.len(), count);
    }

    #[test]
    fn meshes_sharing_a_name_keep_their_own_materials() {
        let mut materials = MaterialLibrary::new();
        let left_original = materials.add(Material::default());
        let right_original = materials.add(Material {
            base_color: [0.8, 0.1, 0.1, 1.0],
            ..Material::default()
        });
        let mut scene = Scene::new();
        let left = scene.add_mesh("VH_M_heart", Mat4::IDENTITY, quad(), left_original);
        let right = scene.add_mesh("VH_M_heart", Mat4::IDENTITY, quad(), right_original);
        let catalog = Catalog::builtin();
        let mut presenter = ModelPresenter::new(HighlightOptions::default());
        presenter.setup(&scene, &catalog, false).unwrap();

        let highlighted =
            presenter.apply(&mut scene, &mut materials, &catalog, Some("heart_3d"));
        assert_eq!(highlighted, 2);
        let left_highlight = scene.mesh(left).unwrap().material;
        let right_highlight = scene.mesh(right).unwrap().material;
        assert_ne!(left_highlight, right_highlight);
        assert_eq!(presenter.highlight(left), Some(left_highlight));
        assert_eq!(presenter.highlight(right), Some(right_highlight));

        assert_eq!(presenter.apply(&mut scene, &mut materials, &catalog, None), 0);
        assert_eq!(scene.mesh(left).unwrap().material, left_original);
        assert_eq!(scene.mesh(right).unwrap().material, right_original);
    }

    #[test]
    fn unknown_part_highlights_nothing() {
        let mut f = fixture();
        assert_eq!(apply(&mut f, Some("spleen")), 0);
        assert_eq!(apply(&mut f, Some("head")), 0);
        assert_eq!(f.presenter.highlight(f.heart), None);
    }

    #[test]
    fn resolve_click_maps_mesh_to_part() {
        let catalog = Catalog::builtin();
        let hit = ClickHit {
            hit_mesh_name: Some("VH_M_heart".into()),
            world_point: Some(Vec3::new(0.1, -0.2, 0.3)),
        };
        let click = ModelPresenter::resolve_click(&catalog, &hit);
        assert_eq!(click.part_id.as_deref(), Some("heart_3d"));
        assert_eq!(click.point, Some(Vec3::new(0.1, -0.2, 0.3)));
    }

    #[test]
    fn unmatched_and_background_clicks_resolve_to_nothing() {
        let catalog = Catalog::builtin();
        let skin = ClickHit {
            hit_mesh_name: Some("Body_Skin".into()),
            world_point: Some(Vec3::ONE),
        };
        assert_eq!(
            ModelPresenter::resolve_click(&catalog, &skin),
            PartClick::default()
        );
        assert_eq!(
            ModelPresenter::resolve_click(&catalog, &ClickHit::background()),
            PartClick::default()
        );
    }

    #[test]
    fn strict_setup_rejects_missing_meshes() {
        let f = fixture();
        let mut presenter = ModelPresenter::new(HighlightOptions::default());
        let err = presenter.setup(&f.scene, &f.catalog, true).unwrap_err();
        // Only heart_3d's mesh is present.
        assert_eq!(err.issues().len(), 8);
    }
}
