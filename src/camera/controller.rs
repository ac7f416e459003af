use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use super::core::Camera;
use crate::options::CameraOptions;
use crate::picking::Ray;

/// Closest the view direction may come to straight up or down.
const POLE_LIMIT: f32 = 0.995;

/// Orbit camera around a movable target.
///
/// Horizontal drags spin around the world Y axis and vertical drags tilt
/// around the camera's right axis, so the model stays upright. The
/// eye-to-target distance is clamped to the configured range.
pub struct OrbitCamera {
    orientation: Quat,
    distance: f32,
    target: Vec3,

    /// Projection and pose derived from the orbit state.
    pub camera: Camera,

    options: CameraOptions,
}

impl OrbitCamera {
    /// Camera at the configured start pose.
    #[must_use]
    pub fn new(options: &CameraOptions, viewport: (u32, u32)) -> Self {
        let mut orbit = Self {
            orientation: Quat::IDENTITY,
            distance: 1.0,
            target: Vec3::ZERO,
            camera: Camera {
                eye: Vec3::from(options.position),
                target: Vec3::from(options.target),
                up: Vec3::Y,
                aspect: aspect(viewport),
                fovy: options.fovy,
                znear: options.znear,
                zfar: options.zfar,
            },
            options: options.clone(),
        };
        orbit.reset();
        orbit
    }

    /// Return to the configured start pose.
    pub fn reset(&mut self) {
        let target = Vec3::from(self.options.target);
        let offset = Vec3::from(self.options.position) - target;
        let dir = offset.try_normalize().unwrap_or(Vec3::Z);
        self.orientation = Quat::from_rotation_arc(Vec3::Z, dir);
        self.distance = offset
            .length()
            .clamp(self.options.min_distance, self.options.max_distance);
        self.target = target;
        self.update_camera_pos();
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;
        self.camera.eye = self.target + dir * self.distance;
        self.camera.target = self.target;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Track a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = aspect((width, height));
    }

    /// Current eye-to-target distance.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Orbit by `delta` pixels of drag.
    pub fn rotate(&mut self, delta: Vec2) {
        let speed = self.options.rotate_speed;
        let spin = Quat::from_rotation_y(-delta.x * speed);
        self.orientation = (spin * self.orientation).normalize();

        let right = self.orientation * Vec3::X;
        let tilted =
            (Quat::from_axis_angle(right, -delta.y * speed) * self.orientation)
                .normalize();
        if (tilted * Vec3::Z).y.abs() < POLE_LIMIT {
            self.orientation = tilted;
        }

        self.update_camera_pos();
    }

    /// Slide the target in the view plane by `delta` pixels, so the point
    /// under the cursor follows it in a viewport `viewport_height` pixels
    /// tall.
    pub fn pan(&mut self, delta: Vec2, viewport_height: u32) {
        if !self.options.enable_pan {
            return;
        }
        let world_per_px = 2.0
            * self.distance
            * (self.camera.fovy.to_radians() * 0.5).tan()
            / viewport_height.max(1) as f32;
        let scale = world_per_px * self.options.pan_speed;
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        self.target += right * (-delta.x * scale) + up * (delta.y * scale);
        self.update_camera_pos();
    }

    /// Zoom by `delta` wheel steps (positive = closer).
    pub fn zoom(&mut self, delta: f32) {
        if !self.options.enable_zoom {
            return;
        }
        let factor = (1.0 - delta * self.options.zoom_speed).max(0.05);
        self.distance = (self.distance * factor)
            .clamp(self.options.min_distance, self.options.max_distance);
        self.update_camera_pos();
    }

    /// World-space ray through a viewport pixel.
    #[must_use]
    pub fn screen_ray(&self, x: f32, y: f32, viewport: (u32, u32)) -> Ray {
        let (w, h) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
        // NDC, y flipped for screen coordinates
        let ndc_x = (x / w) * 2.0 - 1.0;
        let ndc_y = 1.0 - (y / h) * 2.0;

        let inv_view_proj = self.camera.build_matrix().inverse();
        let unproject = |z: f32| {
            let p = inv_view_proj * Vec4::new(ndc_x, ndc_y, z, 1.0);
            p.truncate() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        Ray::new(near, far - near)
    }

    /// Project a world point to viewport pixels. `None` when the point is
    /// behind the camera.
    #[must_use]
    pub fn project(&self, world: Vec3, viewport: (u32, u32)) -> Option<Vec2> {
        project_with(self.camera.build_matrix(), world, viewport)
    }

    /// Distance from the eye to a world point.
    #[must_use]
    pub fn distance_to(&self, world: Vec3) -> f32 {
        self.camera.eye.distance(world)
    }
}

fn aspect(viewport: (u32, u32)) -> f32 {
    viewport.0.max(1) as f32 / viewport.1.max(1) as f32
}

fn project_with(view_proj: Mat4, world: Vec3, viewport: (u32, u32)) -> Option<Vec2> {
    let clip = view_proj * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.0 as f32,
        (1.0 - ndc.y) * 0.5 * viewport.1 as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: (u32, u32) = (800, 600);

    fn orbit() -> OrbitCamera {
        OrbitCamera::new(&CameraOptions::default(), VIEWPORT)
    }

    #[test]
    fn starts_at_configured_pose() {
        let cam = orbit();
        assert!((cam.camera.eye - Vec3::new(0.0, 0.0, 8.0)).length() < 1e-4);
        assert_eq!(cam.target(), Vec3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut cam = orbit();
        for _ in 0..200 {
            cam.zoom(5.0);
        }
        assert!((cam.distance() - 1.0).abs() < 1e-5);
        for _ in 0..200 {
            cam.zoom(-5.0);
        }
        assert!((cam.distance() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_keeps_distance_and_never_flips() {
        let mut cam = orbit();
        let d = cam.distance();
        cam.rotate(Vec2::new(120.0, 0.0));
        assert!((cam.camera.eye.distance(cam.target()) - d).abs() < 1e-4);
        for _ in 0..100 {
            cam.rotate(Vec2::new(0.0, 50.0));
        }
        let dir = (cam.camera.eye - cam.target()).normalize();
        assert!(dir.y.abs() < POLE_LIMIT + 1e-3);
    }

    #[test]
    fn center_ray_hits_target() {
        let cam = orbit();
        let ray = cam.screen_ray(400.0, 300.0, VIEWPORT);
        let to_target = (cam.target() - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.9999);
    }

    #[test]
    fn projection_round_trips_with_screen_ray() {
        let cam = orbit();
        let world = Vec3::new(0.7, 0.3, 1.0);
        let screen = cam.project(world, VIEWPORT).unwrap();
        let ray = cam.screen_ray(screen.x, screen.y, VIEWPORT);
        let to_point = (world - ray.origin).normalize();
        assert!(ray.direction.dot(to_point) > 0.9999);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let cam = orbit();
        assert!(cam.project(Vec3::new(0.0, 0.0, 20.0), VIEWPORT).is_none());
    }

    #[test]
    fn pan_moves_target_sideways() {
        let mut cam = orbit();
        let before = cam.target();
        cam.pan(Vec2::new(-100.0, 0.0), VIEWPORT.1);
        let moved = cam.target() - before;
        assert!(moved.x > 0.0);
        assert!(moved.y.abs() < 1e-3);
    }
}
