//! wgpu renderer: fractal and trail sprites into an offscreen target, then
//! the melt pass onto the swapchain.

mod post;
mod targets;

use dissolve_core::{collect_sprites, view_projection, MeltValues, Sprite, FOV_Y_DEGREES};
use wgpu::util::DeviceExt;
use winit::window::Window;

use post::{MeltPassUniforms, PostResources};
use targets::{SceneTarget, SCENE_FORMAT};

const INITIAL_INSTANCE_CAPACITY: usize = 4096;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    pos: [f32; 3],
    size: f32,
    color: [f32; 4],
}

/// What the renderer needs from the frame: the scene and the melt uniforms.
pub struct FrameView<'a> {
    pub fractals: &'a dissolve_core::FractalField,
    pub trails: &'a [dissolve_core::TrailParticle],
    pub melt: MeltValues,
}

pub struct GpuState<'w> {
    pub window: &'w Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene_pipeline: wgpu::RenderPipeline,
    scene_uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    target: SceneTarget,
    post: PostResources,
    post_bind_group: wgpu::BindGroup,
    sprites: Vec<Sprite>,
    instances: Vec<InstanceData>,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| dissolve_core::SetupError::Graphics("no GPU adapter".into()))?;
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
        log::info!("[gpu] adapter: {}", adapter.get_info().name);

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| dissolve_core::SetupError::Graphics("surface has no formats".into()))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(dissolve_core::SCENE_WGSL.into()),
        });
        let melt_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("melt_shader"),
            source: wgpu::ShaderSource::Wgsl(dissolve_core::MELT_WGSL.into()),
        });

        let scene_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
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
        let instance_vb = create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);

        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
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
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform_buffer.as_entire_binding(),
            }],
        });
        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_scene"),
            bind_group_layouts: &[&scene_bgl],
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
            // slot 1: per-sprite data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 3,
                    },
                ],
            },
        ];
        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&scene_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: SCENE_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let target = SceneTarget::new(&device, width, height);
        let post = post::create_post_resources(&device, &melt_shader, format);
        let post_bind_group = post.bind_group(&device, &target.view);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            scene_pipeline,
            scene_uniform_buffer,
            scene_bind_group,
            quad_vb,
            instance_vb,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            target,
            post,
            post_bind_group,
            sprites: Vec::new(),
            instances: Vec::new(),
            width,
            height,
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
        self.target.recreate(&self.device, self.width, self.height);
        self.post_bind_group = self.post.bind_group(&self.device, &self.target.view);
    }

    fn upload_instances(&mut self, view: &FrameView<'_>) {
        collect_sprites(view.fractals, view.trails, &mut self.sprites);
        // Clip-space size of a unit radius at unit depth.
        let focal = 1.0 / (FOV_Y_DEGREES.to_radians() * 0.5).tan();
        self.instances.clear();
        self.instances.extend(self.sprites.iter().map(|s| InstanceData {
            pos: s.position.to_array(),
            size: s.radius * 2.0 * focal,
            color: s.color,
        }));
        if self.instances.len() > self.instance_capacity {
            self.instance_capacity = self.instances.len().next_power_of_two();
            self.instance_vb = create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("[gpu] instance buffer grown to {}", self.instance_capacity);
        }
        if !self.instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&self.instances));
        }
    }

    pub fn render(&mut self, view: &FrameView<'_>) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.width as f32 / self.height as f32;
        self.queue.write_buffer(
            &self.scene_uniform_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms {
                view_proj: view_projection(aspect).to_cols_array_2d(),
                params: [aspect, 0.0, 0.0, 0.0],
            }),
        );
        let m = view.melt;
        self.queue.write_buffer(
            &self.post.uniform_buffer,
            0,
            bytemuck::bytes_of(&MeltPassUniforms {
                melt: [m.time, m.intensity, m.distortion, m.spread],
                resolution: [self.width as f32, self.height as f32, 0.0, 0.0],
            }),
        );
        self.upload_instances(view);

        let frame = self.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if !self.instances.is_empty() {
                rpass.set_pipeline(&self.scene_pipeline);
                rpass.set_bind_group(0, &self.scene_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
                rpass.draw(0..6, 0..self.instances.len() as u32);
            }
        }
        post::blit(
            &mut encoder,
            "melt_pass",
            &swap_view,
            &self.post.melt_pipeline,
            &self.post_bind_group,
        );
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_vb"),
        size: (std::mem::size_of::<InstanceData>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
