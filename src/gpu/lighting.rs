use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::options::LightingOptions;

/// Scene lights shared by every mesh shader.
/// NOTE: Must match the WGSL `Lighting` struct in `modules/lighting.wgsl`
/// (64 bytes).
///
/// WGSL layout:
///   spot_position: vec3<f32>   (offset 0)
///   ambient: f32               (offset 12)
///   spot_direction: vec3<f32>  (offset 16)
///   spot_intensity: f32        (offset 28)
///   point_position: vec3<f32>  (offset 32)
///   point_intensity: f32       (offset 44)
///   spot_cos_outer: f32        (offset 48)
///   spot_cos_inner: f32        (offset 52)
///   _pad: vec2<f32>            (offset 56)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Spot light position.
    pub spot_position: [f32; 3],
    /// Flat ambient term.
    pub ambient: f32,
    /// Normalized spot direction, from the light toward the origin.
    pub spot_direction: [f32; 3],
    /// Spot light intensity.
    pub spot_intensity: f32,
    /// Point light position.
    pub point_position: [f32; 3],
    /// Point light intensity.
    pub point_intensity: f32,
    /// Cosine of the cone half-angle; no light outside it.
    pub spot_cos_outer: f32,
    /// Cosine where the penumbra starts; full light inside it.
    pub spot_cos_inner: f32,
    _pad: [f32; 2],
}

impl LightingUniform {
    /// Derive the uniform from options. The spot light aims at the world
    /// origin and the penumbra fraction eats into the cone from the edge.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        let spot = glam::Vec3::from(options.spot_position);
        let direction = (-spot).try_normalize().unwrap_or(glam::Vec3::NEG_Y);
        let outer = options.spot_angle.max(0.0);
        let inner = outer * (1.0 - options.spot_penumbra.clamp(0.0, 1.0));
        Self {
            spot_position: options.spot_position,
            ambient: options.ambient,
            spot_direction: direction.to_array(),
            spot_intensity: options.spot_intensity,
            point_position: options.point_position,
            point_intensity: options.point_intensity,
            spot_cos_outer: outer.cos(),
            spot_cos_inner: inner.cos(),
            _pad: [0.0; 2],
        }
    }
}

/// Lighting uniform buffer and its bind group (group 1).
pub struct Lighting {
    /// CPU copy of the uniform.
    pub uniform: LightingUniform,
    /// GPU buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout shared with the mesh pipelines.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for the buffer.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Upload lights built from `options`.
    #[must_use]
    pub fn new(context: &RenderContext, options: &LightingOptions) -> Self {
        let uniform = LightingUniform::from_options(options);
        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );
        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Lighting Bind Group"),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<LightingUniform>(), 64);
    }

    #[test]
    fn spot_aims_at_origin_with_full_penumbra() {
        let u = LightingUniform::from_options(&LightingOptions::default());
        let d = glam::Vec3::from(u.spot_direction);
        assert!((d - glam::Vec3::splat(-1.0).normalize()).length() < 1e-5);
        assert!((u.spot_cos_outer - 0.15_f32.cos()).abs() < 1e-6);
        // penumbra 1 fades all the way to the axis
        assert_eq!(u.spot_cos_inner, 1.0);
        assert_eq!(u.ambient, 0.5);
    }
}
