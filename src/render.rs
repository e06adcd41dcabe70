use glam::{Mat4, Vec3};
use lumina_core::{Camera, LayerTransform, PointStyle, Rgb, Scene, Sprite, POINTS_WGSL};
use wgpu::util::DeviceExt;

use crate::constants::{CLEAR_COLOR, MIN_INSTANCE_BYTES};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    viewport: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LayerUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    size: [f32; 4],
}

impl LayerUniforms {
    fn new(model: Mat4, color: Rgb, style: PointStyle, sprite: Sprite) -> Self {
        let [r, g, b] = color.to_array();
        Self {
            model: model.to_cols_array_2d(),
            color: [r, g, b, style.opacity],
            size: [style.size, sprite.index() as f32, 0.0, 0.0],
        }
    }
}

/// GPU resources for one points draw: its instance positions and uniforms.
struct DrawSlot {
    instance_vb: wgpu::Buffer,
    capacity: u64,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// What one slot draws this frame.
struct DrawItem<'s> {
    positions: &'s [Vec3],
    uniforms: LayerUniforms,
}

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    layer_bind_group_layout: wgpu::BindGroupLayout,
    quad_vb: wgpu::Buffer,
    slots: Vec<DrawSlot>,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points"),
            source: wgpu::ShaderSource::Wgsl(POINTS_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Quad corners for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout = uniform_layout(&device, "globals_bgl");
        let layer_bind_group_layout = uniform_layout(&device, "layer_bgl");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout, &layer_bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: particle centers
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vec3>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                }],
            },
        ];
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("points_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            layer_bind_group_layout,
            quad_vb,
            slots: Vec::new(),
            width: size.width.max(1),
            height: size.height.max(1),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn camera(&self) -> Camera {
        Camera::framing_tree(self.width as f32 / self.height as f32)
    }

    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let camera = self.camera();
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_proj().to_cols_array_2d(),
                viewport: [1.0 / camera.aspect, 1.0, 0.0, 0.0],
            }),
        );

        let items = draw_items(scene);
        self.ensure_slots(&items);
        for (slot, item) in self.slots.iter().zip(&items) {
            if !item.positions.is_empty() {
                self.queue
                    .write_buffer(&slot.instance_vb, 0, bytemuck::cast_slice(item.positions));
            }
            self.queue
                .write_buffer(&slot.uniform_buffer, 0, bytemuck::bytes_of(&item.uniforms));
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEAR_COLOR[0],
                            g: CLEAR_COLOR[1],
                            b: CLEAR_COLOR[2],
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            for (slot, item) in self.slots.iter().zip(&items) {
                if item.positions.is_empty() {
                    continue;
                }
                rpass.set_bind_group(1, &slot.bind_group, &[]);
                rpass.set_vertex_buffer(1, slot.instance_vb.slice(..));
                rpass.draw(0..6, 0..item.positions.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Grow the slot list and any instance buffer too small for this frame.
    fn ensure_slots(&mut self, items: &[DrawItem<'_>]) {
        for (i, item) in items.iter().enumerate() {
            let needed = (std::mem::size_of_val(item.positions) as u64).max(MIN_INSTANCE_BYTES);
            if i < self.slots.len() {
                if self.slots[i].capacity < needed {
                    let instance_vb = self.instance_buffer(needed);
                    self.slots[i].instance_vb = instance_vb;
                    self.slots[i].capacity = needed;
                }
                continue;
            }
            let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("layer_uniforms"),
                size: std::mem::size_of::<LayerUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("layer_bg"),
                layout: &self.layer_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
            let instance_vb = self.instance_buffer(needed);
            self.slots.push(DrawSlot {
                instance_vb,
                capacity: needed,
                uniform_buffer,
                bind_group,
            });
        }
    }

    fn instance_buffer(&self, size: u64) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Flatten the scene into draws, back to front: stars, snow, tree layers,
/// then the beacon clusters.
fn draw_items(scene: &Scene) -> Vec<DrawItem<'_>> {
    let white = Rgb([1.0, 1.0, 1.0]);
    let group = scene.group.model_matrix();
    let mut items = Vec::with_capacity(scene.layers.len() + 5);
    items.push(DrawItem {
        positions: scene.starfield.positions(),
        uniforms: LayerUniforms::new(
            Mat4::IDENTITY,
            white,
            scene.starfield.style,
            Sprite::Disc,
        ),
    });
    items.push(DrawItem {
        positions: scene.snowfall.positions(),
        uniforms: LayerUniforms::new(
            Mat4::IDENTITY,
            white,
            scene.snowfall.style,
            Sprite::Snowflake,
        ),
    });
    for l in &scene.layers {
        let spin = LayerTransform {
            rotation: l.layer.rotation(),
            ..LayerTransform::default()
        };
        items.push(DrawItem {
            positions: l.layer.positions(),
            uniforms: LayerUniforms::new(
                spin.within(&scene.group),
                scene.palette.color(l.kind),
                l.layer.style(),
                l.kind.sprite(),
            ),
        });
    }
    for (i, cluster) in scene.beacon.clusters.iter().enumerate() {
        let model = scene
            .beacon
            .cluster_transform(i)
            .map(|t| t.within(&scene.group))
            .unwrap_or(group);
        let (color, style) = scene
            .beacon
            .lit_cluster(i)
            .unwrap_or((cluster.color, cluster.style));
        items.push(DrawItem {
            positions: &cluster.points,
            uniforms: LayerUniforms::new(model, color, style, Sprite::Orb),
        });
    }
    items
}
