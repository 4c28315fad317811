//! wgpu renderer for the cloth, springs and scene props

use common::{create_index_buffer, create_vertex_buffer, CameraUniform, FlyCamera, GraphicsContext, LineVertex};
use glam::Vec3;

use cloth_sim::mesh::{self, MeshVertex};
use cloth_sim::{CollisionObject, CollisionShape, SimMode, Simulation};

const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.1, g: 0.1, b: 0.15, a: 1.0 };
const SPRING_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
const CLOTH_COLOR: [f32; 4] = [0.75, 0.32, 0.28, 1.0];
const FLAG_COLOR: [f32; 4] = [0.2, 0.4, 0.85, 1.0];
const PROP_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

const POLE_RADIUS: f32 = 0.1;
const POLE_HEIGHT: f32 = 20.0;

/// Vertex of a shaded surface
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LitVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl LitVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LitVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    fn from_mesh(v: &MeshVertex, offset: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: (Vec3::from_array(v.position) + offset).to_array(),
            normal: v.normal,
            color,
        }
    }
}

/// Per-frame draw counts produced by [`Renderer::update_simulation`]
pub struct FrameDraw {
    mode: SimMode,
    line_vertices: u32,
}

pub struct Renderer {
    line_pipeline: wgpu::RenderPipeline,
    lit_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    line_buffer: wgpu::Buffer,
    cloth_buffer: wgpu::Buffer,
    cloth_index_buffer: wgpu::Buffer,
    cloth_index_count: u32,
    pole_buffer: wgpu::Buffer,
    pole_vertex_count: u32,
    object_buffer: wgpu::Buffer,
    object_vertex_count: u32,
    object_shape: CollisionShape,
}

impl Renderer {
    pub fn new(ctx: &GraphicsContext, sim: &Simulation) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cloth Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cloth.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_texture = Self::create_depth_texture(device, ctx.size.width, ctx.size.height);

        let depth_stencil_state = Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let color_target = [Some(wgpu::ColorTargetState {
            format: ctx.config.format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Spring Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_line",
                buffers: &[LineVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_line",
                targets: &color_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: depth_stencil_state.clone(),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let lit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Surface Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_lit",
                buffers: &[LitVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_lit",
                targets: &color_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_stencil_state,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let spring_capacity = sim.network().len().max(1) * 2;
        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Spring Buffer"),
            size: (std::mem::size_of::<LineVertex>() * spring_capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let cloth_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cloth Buffer"),
            size: (std::mem::size_of::<LitVertex>() * sim.particles().len()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let cloth_index_buffer = create_index_buffer(device, "Cloth Index Buffer", sim.indices());

        let pole: Vec<LitVertex> = mesh::cylinder(POLE_RADIUS, POLE_HEIGHT, 32)
            .iter()
            .map(|v| LitVertex::from_mesh(v, Vec3::new(0.0, -POLE_HEIGHT, 0.0), PROP_COLOR))
            .collect();
        let pole_buffer = create_vertex_buffer(device, "Pole Buffer", &pole);

        let object = Self::object_vertices(sim.collision());
        let object_buffer = create_vertex_buffer(device, "Collision Object Buffer", &object);

        Self {
            line_pipeline,
            lit_pipeline,
            camera_buffer,
            camera_bind_group,
            depth_texture,
            line_buffer,
            cloth_buffer,
            cloth_index_buffer,
            cloth_index_count: sim.indices().len() as u32,
            pole_buffer,
            pole_vertex_count: pole.len() as u32,
            object_buffer,
            object_vertex_count: object.len() as u32,
            object_shape: sim.collision().shape,
        }
    }

    fn object_vertices(object: &CollisionObject) -> Vec<LitVertex> {
        let vertices = match object.shape {
            CollisionShape::Cube => mesh::cube(object.size),
            CollisionShape::Sphere => mesh::sphere(object.radius(), 24, 32),
        };
        vertices
            .iter()
            .map(|v| LitVertex::from_mesh(v, object.center, PROP_COLOR))
            .collect()
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &FlyCamera) {
        let uniform = CameraUniform::from_camera(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload this frame's particle data for the current mode.
    pub fn update_simulation(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, sim: &Simulation) -> FrameDraw {
        if sim.collision().shape != self.object_shape {
            let object = Self::object_vertices(sim.collision());
            self.object_buffer = create_vertex_buffer(device, "Collision Object Buffer", &object);
            self.object_vertex_count = object.len() as u32;
            self.object_shape = sim.collision().shape;
        }

        let mode = sim.mode();
        let mut line_vertices = 0;

        match mode {
            SimMode::Tear => {
                let lines: Vec<LineVertex> = sim
                    .active_spring_segments()
                    .iter()
                    .flat_map(|[a, b]| [LineVertex::new(a.to_array(), SPRING_COLOR), LineVertex::new(b.to_array(), SPRING_COLOR)])
                    .collect();
                if !lines.is_empty() {
                    queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&lines));
                }
                line_vertices = lines.len() as u32;
            }
            SimMode::Collision | SimMode::Flag => {
                let color = if mode == SimMode::Flag { FLAG_COLOR } else { CLOTH_COLOR };
                let normals = sim.normals();
                let vertices: Vec<LitVertex> = sim
                    .particles()
                    .iter()
                    .zip(&normals)
                    .map(|(p, n)| LitVertex {
                        position: p.position.to_array(),
                        normal: n.to_array(),
                        color,
                    })
                    .collect();
                queue.write_buffer(&self.cloth_buffer, 0, bytemuck::cast_slice(&vertices));
            }
        }

        FrameDraw { mode, line_vertices }
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, draw: &FrameDraw) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        match draw.mode {
            SimMode::Tear => {
                if draw.line_vertices > 0 {
                    render_pass.set_pipeline(&self.line_pipeline);
                    render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                    render_pass.draw(0..draw.line_vertices, 0..1);
                }
            }
            SimMode::Collision | SimMode::Flag => {
                render_pass.set_pipeline(&self.lit_pipeline);
                render_pass.set_vertex_buffer(0, self.cloth_buffer.slice(..));
                render_pass.set_index_buffer(self.cloth_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.cloth_index_count, 0, 0..1);

                let (prop, count) = if draw.mode == SimMode::Flag {
                    (&self.pole_buffer, self.pole_vertex_count)
                } else {
                    (&self.object_buffer, self.object_vertex_count)
                };
                render_pass.set_vertex_buffer(0, prop.slice(..));
                render_pass.draw(0..count, 0..1);
            }
        }
    }
}
