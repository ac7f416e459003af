//! Per-mesh GPU resources.

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::scene::{Material, MeshGeometry, MeshId};

/// Interleaved vertex as read by `anatomy.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-mesh uniform.
/// NOTE: Must match the WGSL `MeshUniform` struct (112 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshUniform {
    model: [[f32; 4]; 4],
    /// RGB plus the alpha the fragment shader writes.
    base_color: [f32; 4],
    emissive: [f32; 3],
    emissive_intensity: f32,
    double_sided: f32,
    _pad: [f32; 3],
}

impl MeshUniform {
    pub(crate) fn new(model: glam::Mat4, material: &Material) -> Self {
        let [r, g, b, _] = material.base_color;
        Self {
            model: model.to_cols_array_2d(),
            base_color: [r, g, b, material.effective_alpha()],
            emissive: material.emissive,
            emissive_intensity: material.emissive_intensity,
            double_sided: if material.double_sided { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }
}

/// Which pipeline a mesh is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PassKind {
    Opaque,
    Blend,
    BlendNoDepthWrite,
}

impl PassKind {
    pub(crate) fn of(material: &Material) -> Self {
        match (material.transparent, material.depth_write) {
            (false, _) => Self::Opaque,
            (true, true) => Self::Blend,
            (true, false) => Self::BlendNoDepthWrite,
        }
    }
}

/// Vertex, index and uniform buffers for one scene mesh.
pub(crate) struct GpuMesh {
    pub id: MeshId,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// World-space center, for back-to-front sorting.
    pub center: Vec3,
    pub pass: PassKind,
    uniform: MeshUniform,
}

impl GpuMesh {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        id: MeshId,
        geometry: &MeshGeometry,
        uniform: MeshUniform,
        pass: PassKind,
        center: Vec3,
    ) -> Self {
        let vertices: Vec<Vertex> = geometry
            .positions()
            .iter()
            .zip(geometry.normals())
            .map(|(&position, &normal)| Vertex { position, normal })
            .collect();
        let label = format!("Mesh {}", id.0);
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(geometry.indices()),
                usage: wgpu::BufferUsages::INDEX,
            });
        let uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Uniform")),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            id,
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices().len() as u32,
            uniform_buffer,
            bind_group,
            center,
            pass,
            uniform,
        }
    }

    /// Upload a new uniform if it differs from the current one.
    pub(crate) fn update(
        &mut self,
        queue: &wgpu::Queue,
        uniform: MeshUniform,
        pass: PassKind,
        center: Vec3,
    ) {
        self.pass = pass;
        self.center = center;
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(
                &self.uniform_buffer,
                0,
                bytemuck::cast_slice(&[uniform]),
            );
        }
    }

    /// Bind group 2 and draw. Caller sets the pipeline and groups 0-1.
    pub(crate) fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.index_count == 0 {
            return;
        }
        render_pass.set_bind_group(2, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass
            .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
