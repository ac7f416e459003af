//! CPU picking: screen position → world ray → nearest mesh triangle.
//!
//! The result crosses into the rest of the crate as a [`ClickHit`], which
//! carries only the hit mesh's name and the world-space hit point.

mod ray;

use glam::Vec3;
pub use ray::{ray_triangle_intersect, Ray};

use crate::scene::{MeshId, Scene};

/// What a click landed on.
///
/// Both fields are `None` for a background click.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClickHit {
    /// Name of the nearest mesh under the pointer.
    pub hit_mesh_name: Option<String>,
    /// World-space point where the ray met that mesh.
    pub world_point: Option<Vec3>,
}

impl ClickHit {
    /// A click that hit nothing.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }
}

/// Nearest intersection of a ray with the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePick {
    /// Mesh that was hit.
    pub mesh: MeshId,
    /// Ray parameter of the hit.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Cast `ray` (world space) against every mesh and return the nearest hit.
#[must_use]
pub fn pick_scene(scene: &Scene, ray: &Ray) -> Option<ScenePick> {
    let mut best: Option<ScenePick> = None;
    for mesh in scene.meshes() {
        let world = scene.world_matrix(mesh);
        if world.determinant().abs() < f32::EPSILON {
            continue;
        }
        let local = ray.transformed(world.inverse());

        let Some(bounds) = mesh.geometry.bounds() else {
            continue;
        };
        let Some(entry) = local.intersect_bounds(&bounds) else {
            continue;
        };
        if best.is_some_and(|b| entry > b.distance) {
            continue;
        }

        let nearest = mesh
            .geometry
            .triangles()
            .filter_map(|[a, b, c]| ray_triangle_intersect(&local, a, b, c))
            .min_by(f32::total_cmp);
        if let Some(t) = nearest {
            if best.is_none_or(|b| t < b.distance) {
                best = Some(ScenePick {
                    mesh: mesh.id,
                    distance: t,
                    point: ray.at(t),
                });
            }
        }
    }
    best
}

/// Cast a ray and package the result for click resolution.
#[must_use]
pub fn click_hit(scene: &Scene, ray: &Ray) -> ClickHit {
    pick_scene(scene, ray)
        .and_then(|pick| {
            scene.mesh(pick.mesh).map(|mesh| ClickHit {
                hit_mesh_name: Some(mesh.name.clone()),
                world_point: Some(pick.point),
            })
        })
        .unwrap_or_default()
}
