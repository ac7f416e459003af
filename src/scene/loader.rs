//! glTF / GLB import into a [`Scene`].
//!
//! Node transforms are folded down the hierarchy so every [`SceneMesh`]
//! carries its full local-to-model matrix. Each triangle primitive becomes
//! one scene mesh named after its node, so a multi-primitive node yields
//! several meshes sharing a name.
//!
//! [`SceneMesh`]: super::SceneMesh

use std::path::Path;

use glam::Mat4;
use gltf::{buffer, mesh::Mode, Document};
use rustc_hash::FxHashMap;

use super::{Material, MaterialHandle, MaterialLibrary, MeshGeometry, Scene, SceneNode};
use crate::error::LensError;

/// Import a `.glb` / `.gltf` file from disk.
pub fn load_file(
    path: &Path,
    materials: &mut MaterialLibrary,
) -> Result<Scene, LensError> {
    let (document, buffers, _images) = gltf::import(path)?;
    Ok(build_scene(&document, &buffers, materials))
}

/// Import a model from bytes already in memory (a fetched GLB, a download).
pub fn load_slice(
    bytes: &[u8],
    materials: &mut MaterialLibrary,
) -> Result<Scene, LensError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    Ok(build_scene(&document, &buffers, materials))
}

struct Builder<'a> {
    buffers: &'a [buffer::Data],
    materials: &'a mut MaterialLibrary,
    /// glTF material index → library handle.
    imported: FxHashMap<usize, MaterialHandle>,
    fallback: Option<MaterialHandle>,
    scene: Scene,
}

fn build_scene(
    document: &Document,
    buffers: &[buffer::Data],
    materials: &mut MaterialLibrary,
) -> Scene {
    let mut builder = Builder {
        buffers,
        materials,
        imported: FxHashMap::default(),
        fallback: None,
        scene: Scene::new(),
    };

    let Some(root) = document
        .default_scene()
        .or_else(|| document.scenes().next())
    else {
        log::warn!("model contains no scenes");
        return builder.scene;
    };

    for node in root.nodes() {
        builder.visit(&node, Mat4::IDENTITY, 0);
    }
    builder.scene
}

impl Builder<'_> {
    fn visit(&mut self, node: &gltf::Node<'_>, parent: Mat4, depth: usize) {
        let local = Mat4::from_cols_array_2d(&node.transform().matrix());
        let world = parent * local;
        let name = node
            .name()
            .or_else(|| node.mesh().and_then(|m| m.name()))
            .map_or_else(|| format!("node_{}", node.index()), str::to_owned);

        let mut mesh_count = 0;
        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if self.add_primitive(&name, world, &primitive) {
                    mesh_count += 1;
                }
            }
        }
        self.scene.push_node(SceneNode {
            name,
            depth,
            mesh_count,
        });

        for child in node.children() {
            self.visit(&child, world, depth + 1);
        }
    }

    fn add_primitive(
        &mut self,
        name: &str,
        world: Mat4,
        primitive: &gltf::Primitive<'_>,
    ) -> bool {
        if primitive.mode() != Mode::Triangles {
            log::debug!("skipping {:?} primitive on '{name}'", primitive.mode());
            return false;
        }
        let buffers = self.buffers;
        let reader = primitive
            .reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            log::debug!("primitive on '{name}' has no positions");
            return false;
        };
        let positions: Vec<[f32; 3]> = positions.collect();
        let normals = reader.read_normals().map(Iterator::collect);
        let indices = reader.read_indices().map_or_else(
            || (0..positions.len() as u32).collect(),
            |i| i.into_u32().collect(),
        );

        let material = self.material_for(&primitive.material());
        let geometry = MeshGeometry::new(positions, normals, indices);
        let _ = self.scene.add_mesh(name, world, geometry, material);
        true
    }

    fn material_for(&mut self, source: &gltf::Material<'_>) -> MaterialHandle {
        let Some(index) = source.index() else {
            return *self
                .fallback
                .get_or_insert_with(|| self.materials.add(Material::default()));
        };
        if let Some(&handle) = self.imported.get(&index) {
            return handle;
        }
        let handle = self.materials.add(convert_material(source));
        let _ = self.imported.insert(index, handle);
        handle
    }
}

fn convert_material(source: &gltf::Material<'_>) -> Material {
    let pbr = source.pbr_metallic_roughness();
    let base_color = pbr.base_color_factor();
    let transparent = source.alpha_mode() == gltf::material::AlphaMode::Blend;
    Material {
        label: source
            .name()
            .map_or_else(|| format!("material_{}", source.index().unwrap_or(0)), str::to_owned),
        base_color,
        emissive: source.emissive_factor(),
        emissive_intensity: 1.0,
        opacity: 1.0,
        transparent,
        depth_write: true,
        double_sided: source.double_sided(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal glTF with one named node holding a single triangle, the
    /// buffer embedded as a base64 data URI.
    fn triangle_gltf(node_name: &str) -> Vec<u8> {
        // Three f32 positions: (0,0,0) (1,0,0) (0,1,0)
        let buffer = "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA";
        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "name": "Body", "children": [1] }},
            {{ "name": "{node_name}", "mesh": 0, "translation": [0, 2, 0] }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
  "accessors": [{{ "bufferView": 0, "componentType": 5126, "count": 3,
                   "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0] }}],
  "bufferViews": [{{ "buffer": 0, "byteLength": 36 }}],
  "buffers": [{{ "byteLength": 36,
                 "uri": "data:application/octet-stream;base64,{buffer}" }}]
}}"#
        )
        .into_bytes()
    }

    #[test]
    fn loads_named_mesh_with_folded_transform() {
        let mut materials = MaterialLibrary::new();
        let scene =
            load_slice(&triangle_gltf("VH_M_heart"), &mut materials).unwrap();

        assert_eq!(scene.mesh_count(), 1);
        let mesh = &scene.meshes()[0];
        assert_eq!(mesh.name, "VH_M_heart");
        assert_eq!(mesh.geometry.indices(), &[0, 1, 2]);
        assert_eq!(mesh.transform.w_axis.y, 2.0);
        // Default material for primitives without one.
        assert_eq!(materials.len(), 1);

        let nodes = scene.nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "Body");
        assert_eq!(nodes[0].mesh_count, 0);
        assert_eq!(nodes[1].depth, 1);
        assert_eq!(nodes[1].mesh_count, 1);
    }

    #[test]
    fn garbage_bytes_are_an_asset_error() {
        let mut materials = MaterialLibrary::new();
        let err = load_slice(b"not a model", &mut materials).unwrap_err();
        assert!(matches!(err, LensError::AssetLoad(_)));
    }
}
