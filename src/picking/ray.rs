use glam::{Mat4, Vec3};

use crate::scene::Bounds;

/// A ray in world or mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Vec3,
    /// Direction; not necessarily unit length after a transform.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed through an affine transform.
    ///
    /// The direction is transformed but not renormalized, so a parameter
    /// `t` names the same point on both rays.
    #[must_use]
    pub fn transformed(&self, m: Mat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }

    /// Slab test against axis-aligned bounds. Returns the entry parameter
    /// (clamped to 0) if the ray hits the box in front of the origin.
    #[must_use]
    pub fn intersect_bounds(&self, bounds: &Bounds) -> Option<f32> {
        let inv = self.direction.recip();
        let t1 = (bounds.min - self.origin) * inv;
        let t2 = (bounds.max - self.origin) * inv;
        let t_min = t1.min(t2).max_element();
        let t_max = t1.max(t2).min_element();
        (t_max >= t_min && t_max >= 0.0).then(|| t_min.max(0.0))
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter of the hit, or `None` for a miss, a hit behind
/// the origin or a ray parallel to the triangle. Both faces count.
#[must_use]
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: [Vec3; 3] = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    #[test]
    fn hits_triangle_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = ray_triangle_intersect(&ray, TRI[0], TRI[1], TRI[2]).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
        assert!(ray.at(t).length() < 1e-5);
    }

    #[test]
    fn misses_behind_and_outside() {
        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray_triangle_intersect(&behind, TRI[0], TRI[1], TRI[2]).is_none());
        let outside = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(ray_triangle_intersect(&outside, TRI[0], TRI[1], TRI[2]).is_none());
        let parallel = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        assert!(ray_triangle_intersect(&parallel, TRI[0], TRI[1], TRI[2]).is_none());
    }

    #[test]
    fn bounds_slab_test() {
        let bounds = Bounds {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!((ray.intersect_bounds(&bounds).unwrap() - 4.0).abs() < 1e-5);
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(away.intersect_bounds(&bounds).is_none());
    }

    #[test]
    fn transformed_ray_keeps_parameterization() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let m = Mat4::from_scale(Vec3::splat(2.0));
        let local = ray.transformed(m);
        assert!((local.at(2.0) - m.transform_point3(ray.at(2.0))).length() < 1e-5);
    }
}
