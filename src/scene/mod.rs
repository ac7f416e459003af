//! Authoritative scene: the loaded model's meshes, their names, transforms
//! and current materials.
//!
//! Meshes are stored flat in load order. Every mesh carries a [`MeshId`]
//! that is unique within the scene and independent of its name, since
//! several meshes may share one name (multi-primitive glTF meshes do).

pub mod loader;
/// Material arena and the per-mesh material description.
pub mod material;

use glam::{Mat4, Vec3};
pub use material::{Material, MaterialHandle, MaterialLibrary};

// ---------------------------------------------------------------------------
// Mesh data
// ---------------------------------------------------------------------------

/// Scene-unique mesh identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Axis-aligned bounds in a mesh's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Bounds {
    /// Bounds of a point set, or `None` if it is empty.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });
        Some(Self { min, max })
    }

    /// Bounds of these bounds after an affine transform.
    #[must_use]
    pub fn transformed(&self, m: Mat4) -> Self {
        let corners = (0..8).map(|i| {
            let pick = |bit: usize, lo: f32, hi: f32| {
                if (i & bit) == 0 {
                    lo
                } else {
                    hi
                }
            };
            m.transform_point3(Vec3::new(
                pick(1, self.min.x, self.max.x),
                pick(2, self.min.y, self.max.y),
                pick(4, self.min.z, self.max.z),
            ))
        });
        // Eight corners, never empty.
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Union of two bounds.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Indexed triangle geometry in local space.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
    bounds: Option<Bounds>,
}

impl MeshGeometry {
    /// Build geometry from raw attributes.
    ///
    /// Missing or mismatched normals are recomputed from faces. Triangles
    /// with an out-of-range index are dropped.
    #[must_use]
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        indices: Vec<u32>,
    ) -> Self {
        let vertex_count = positions.len();
        let indices: Vec<u32> = indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| (i as usize) < vertex_count))
            .flatten()
            .copied()
            .collect();
        let normals = match normals {
            Some(n) if n.len() == vertex_count => n,
            _ => face_normals(&positions, &indices),
        };
        let bounds =
            Bounds::from_points(positions.iter().map(|p| Vec3::from(*p)));
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    /// Vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Vertex normals, one per position.
    #[must_use]
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    /// Triangle list indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Local-space bounds, `None` for empty geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                Vec3::from(self.positions[tri[0] as usize]),
                Vec3::from(self.positions[tri[1] as usize]),
                Vec3::from(self.positions[tri[2] as usize]),
            ]
        })
    }
}

/// Area-weighted vertex normals.
fn face_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let n = (Vec3::from(positions[b]) - Vec3::from(positions[a]))
            .cross(Vec3::from(positions[c]) - Vec3::from(positions[a]));
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

/// One drawable, pickable mesh.
#[derive(Debug, Clone)]
pub struct SceneMesh {
    /// Scene-unique id.
    pub id: MeshId,
    /// Node name from the asset; what catalog parts match against.
    pub name: String,
    /// Local-to-model transform (node hierarchy already folded in).
    pub transform: Mat4,
    /// Triangle data.
    pub geometry: MeshGeometry,
    /// Currently assigned material.
    pub material: MaterialHandle,
}

/// A node of the asset hierarchy, kept for structure logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    /// Node name, or `"<unnamed>"`.
    pub name: String,
    /// Nesting depth (roots are 0).
    pub depth: usize,
    /// Number of primitives the node contributes as meshes.
    pub mesh_count: usize,
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The loaded model.
#[derive(Debug)]
pub struct Scene {
    meshes: Vec<SceneMesh>,
    nodes: Vec<SceneNode>,
    /// Model placement (scale and translation from options).
    model_transform: Mat4,
    /// Bumped whenever a mesh's material changes.
    generation: u64,
    /// Generation last consumed by the renderer.
    rendered_generation: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene with identity placement.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            nodes: Vec::new(),
            model_transform: Mat4::IDENTITY,
            generation: 1,
            rendered_generation: 0,
        }
    }

    /// Add a mesh and return its id.
    pub fn add_mesh(
        &mut self,
        name: impl Into<String>,
        transform: Mat4,
        geometry: MeshGeometry,
        material: MaterialHandle,
    ) -> MeshId {
        let id = MeshId(self.meshes.len() as u32);
        self.meshes.push(SceneMesh {
            id,
            name: name.into(),
            transform,
            geometry,
            material,
        });
        self.generation += 1;
        id
    }

    /// Record a hierarchy node for structure logging.
    pub fn push_node(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    /// All meshes in load order.
    #[must_use]
    pub fn meshes(&self) -> &[SceneMesh] {
        &self.meshes
    }

    /// Look up a mesh.
    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&SceneMesh> {
        self.meshes.get(id.0 as usize)
    }

    /// Number of meshes.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Hierarchy nodes in depth-first order.
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Distinct mesh names, in load order.
    #[must_use]
    pub fn mesh_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for mesh in &self.meshes {
            if !names.contains(&mesh.name.as_str()) {
                names.push(&mesh.name);
            }
        }
        names
    }

    /// Assign a material to a mesh. Returns `true` if it changed.
    pub fn set_material(&mut self, id: MeshId, material: MaterialHandle) -> bool {
        let Some(mesh) = self.meshes.get_mut(id.0 as usize) else {
            return false;
        };
        if mesh.material == material {
            return false;
        }
        mesh.material = material;
        self.generation += 1;
        true
    }

    /// Set the model placement.
    pub fn set_model_transform(&mut self, transform: Mat4) {
        self.model_transform = transform;
        self.generation += 1;
    }

    /// Model placement applied on top of every mesh transform.
    #[must_use]
    pub fn model_transform(&self) -> Mat4 {
        self.model_transform
    }

    /// Full local-to-world matrix of a mesh.
    #[must_use]
    pub fn world_matrix(&self, mesh: &SceneMesh) -> Mat4 {
        self.model_transform * mesh.transform
    }

    /// World-space bounds of the whole model.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Bounds> {
        self.meshes
            .iter()
            .filter_map(|m| {
                m.geometry.bounds().map(|b| b.transformed(self.world_matrix(m)))
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Whether materials or placement changed since `mark_rendered()`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Record that the renderer has consumed the current state.
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Unit quad in the XY plane facing +Z, centered on the origin.
    pub(crate) fn quad() -> MeshGeometry {
        MeshGeometry::new(
            vec![
                [-0.5, -0.5, 0.0],
                [0.5, -0.5, 0.0],
                [0.5, 0.5, 0.0],
                [-0.5, 0.5, 0.0],
            ],
            None,
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn computed_normals_face_outward() {
        let g = quad();
        assert_eq!(g.normals().len(), 4);
        for n in g.normals() {
            assert!((Vec3::from(*n) - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn out_of_range_triangles_are_dropped() {
        let g = MeshGeometry::new(
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            None,
            vec![0, 1, 2, 0, 1, 9],
        );
        assert_eq!(g.indices().len(), 3);
        assert_eq!(g.triangles().count(), 1);
    }

    #[test]
    fn mesh_ids_are_unique_even_for_shared_names() {
        let mut lib = MaterialLibrary::new();
        let mat = lib.add(Material::default());
        let mut scene = Scene::new();
        let a = scene.add_mesh("VH_M_heart", Mat4::IDENTITY, quad(), mat);
        let b = scene.add_mesh("VH_M_heart", Mat4::IDENTITY, quad(), mat);
        assert_ne!(a, b);
        assert_eq!(scene.mesh_names(), vec!["VH_M_heart"]);
    }

    #[test]
    fn material_changes_mark_scene_dirty() {
        let mut lib = MaterialLibrary::new();
        let base = lib.add(Material::default());
        let other = lib.add(Material::default());
        let mut scene = Scene::new();
        let id = scene.add_mesh("m", Mat4::IDENTITY, quad(), base);
        scene.mark_rendered();
        assert!(!scene.is_dirty());
        assert!(!scene.set_material(id, base));
        assert!(!scene.is_dirty());
        assert!(scene.set_material(id, other));
        assert!(scene.is_dirty());
    }

    #[test]
    fn world_bounds_include_model_transform() {
        let mut lib = MaterialLibrary::new();
        let mat = lib.add(Material::default());
        let mut scene = Scene::new();
        let _ = scene.add_mesh("m", Mat4::IDENTITY, quad(), mat);
        scene.set_model_transform(Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)));
        let b = scene.world_bounds().unwrap();
        assert!((b.center() - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
    }
}
