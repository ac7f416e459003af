//! Forward renderer for the anatomy model.
//!
//! One pipeline per [`PassKind`]: opaque meshes first, then blended meshes
//! sorted back to front. Bind groups are camera (0), lighting (1) and the
//! per-mesh uniform (2).

mod mesh;
pub(crate) mod pipeline_util;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use self::mesh::{GpuMesh, MeshUniform, PassKind, Vertex};
use crate::camera::core::{Camera, CameraUniform};
use crate::error::LensError;
use crate::gpu::lighting::Lighting;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, ANATOMY_SHADER};
use crate::gpu::texture::DepthTexture;
use crate::options::LightingOptions;
use crate::scene::{MaterialLibrary, MeshGeometry, Scene};

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

struct Pipelines {
    opaque: wgpu::RenderPipeline,
    blend: wgpu::RenderPipeline,
    blend_no_depth_write: wgpu::RenderPipeline,
}

impl Pipelines {
    fn new(
        context: &RenderContext,
        layouts: &[&wgpu::BindGroupLayout],
        composer: &mut ShaderComposer,
    ) -> Result<Self, LensError> {
        let shader = composer.compose(&context.device, "Anatomy Shader", ANATOMY_SHADER)?;
        let layout =
            context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Anatomy Pipeline Layout"),
                    bind_group_layouts: layouts,
                    push_constant_ranges: &[],
                });
        let build = |label: &str, blend: bool, depth_write: bool| {
            context
                .device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(label),
                    layout: Some(&layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[Vertex::layout()],
                        compilation_options: Default::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        targets: &pipeline_util::color_target(context.format(), blend),
                        compilation_options: Default::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        // Anatomy assets are often authored single-sided
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: Some(pipeline_util::depth_stencil_state(depth_write)),
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                    cache: None,
                })
        };
        Ok(Self {
            opaque: build("Anatomy Opaque", false, true),
            blend: build("Anatomy Blend", true, true),
            blend_no_depth_write: build("Anatomy Blend (no depth write)", true, false),
        })
    }

    fn get(&self, kind: PassKind) -> &wgpu::RenderPipeline {
        match kind {
            PassKind::Opaque => &self.opaque,
            PassKind::Blend => &self.blend,
            PassKind::BlendNoDepthWrite => &self.blend_no_depth_write,
        }
    }
}

/// Owns every GPU resource needed to draw a [`Scene`].
pub struct SceneRenderer {
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    lighting: Lighting,
    mesh_layout: wgpu::BindGroupLayout,
    pipelines: Pipelines,
    depth: DepthTexture,
    meshes: Vec<GpuMesh>,
    background: wgpu::Color,
}

impl SceneRenderer {
    /// Build pipelines and shared uniforms.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Gpu`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        lighting_options: &LightingOptions,
    ) -> Result<Self, LensError> {
        let device = &context.device;
        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout =
            uniform_layout(device, "Camera Layout", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });
        let lighting = Lighting::new(context, lighting_options);
        let mesh_layout =
            uniform_layout(device, "Mesh Layout", wgpu::ShaderStages::VERTEX_FRAGMENT);

        let mut composer = ShaderComposer::new()?;
        let pipelines = Pipelines::new(
            context,
            &[&camera_layout, &lighting.layout, &mesh_layout],
            &mut composer,
        )?;
        let (width, height) = context.size();

        Ok(Self {
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            mesh_layout,
            pipelines,
            depth: DepthTexture::new(device, width, height),
            meshes: Vec::new(),
            background: background_color(lighting_options.background),
            lighting,
        })
    }

    /// Replace GPU meshes with those of `scene`.
    pub fn upload_scene(
        &mut self,
        device: &wgpu::Device,
        scene: &mut Scene,
        materials: &MaterialLibrary,
    ) {
        self.meshes.clear();
        for mesh in scene.meshes() {
            let Some(material) = materials.get(mesh.material) else {
                log::warn!("mesh '{}' has no material, skipped", mesh.name);
                continue;
            };
            let world = scene.world_matrix(mesh);
            self.meshes.push(GpuMesh::new(
                device,
                &self.mesh_layout,
                mesh.id,
                &mesh.geometry,
                MeshUniform::new(world, material),
                PassKind::of(material),
                mesh_center(&mesh.geometry, world),
            ));
        }
        log::debug!("uploaded {} meshes", self.meshes.len());
        scene.mark_rendered();
    }

    /// Drop all GPU meshes.
    pub fn clear_scene(&mut self) {
        self.meshes.clear();
    }

    /// Push material and placement changes if the scene is dirty.
    pub fn sync(
        &mut self,
        queue: &wgpu::Queue,
        scene: &mut Scene,
        materials: &MaterialLibrary,
    ) {
        if !scene.is_dirty() {
            return;
        }
        for gpu in &mut self.meshes {
            let Some(mesh) = scene.mesh(gpu.id) else {
                continue;
            };
            let Some(material) = materials.get(mesh.material) else {
                continue;
            };
            let world = scene.world_matrix(mesh);
            gpu.update(
                queue,
                MeshUniform::new(world, material),
                PassKind::of(material),
                mesh_center(&mesh.geometry, world),
            );
        }
        scene.mark_rendered();
    }

    /// Recreate the depth texture for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.depth = DepthTexture::new(device, width, height);
        }
    }

    /// Draw one frame and present it.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when no frame could be acquired; the
    /// caller reconfigures on `Lost`/`Outdated`.
    pub fn render(
        &mut self,
        context: &RenderContext,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        self.camera_uniform.update_view_proj(camera);
        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        let frame = context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut order: Vec<&GpuMesh> = self.meshes.iter().collect();
        let eye = camera.eye;
        // Opaque first, then blended far to near.
        order.sort_by(|a, b| {
            let a_blend = a.pass != PassKind::Opaque;
            let b_blend = b.pass != PassKind::Opaque;
            a_blend.cmp(&b_blend).then_with(|| {
                if a_blend {
                    b.center
                        .distance_squared(eye)
                        .total_cmp(&a.center.distance_squared(eye))
                } else {
                    std::cmp::Ordering::Equal
                }
            })
        });

        let mut encoder = context.create_encoder();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Anatomy Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.lighting.bind_group, &[]);
            let mut current = None;
            for mesh in order {
                if current != Some(mesh.pass) {
                    pass.set_pipeline(self.pipelines.get(mesh.pass));
                    current = Some(mesh.pass);
                }
                mesh.draw(&mut pass);
            }
        }
        context.submit(encoder);
        frame.present();
        Ok(())
    }
}

fn mesh_center(geometry: &MeshGeometry, world: Mat4) -> Vec3 {
    geometry
        .bounds()
        .map_or_else(|| world.w_axis.truncate(), |b| b.transformed(world).center())
}

fn background_color([r, g, b]: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: 1.0,
    }
}
