use crate::config::SimConfig;
use crate::constants::{BACKGROUND_COLOR, STRIP_RADIUS, STRIP_STEPS, STRIP_THICKNESS};
use crate::field::DisplayField;
use crate::gpu::GpuLife;
use crate::simulation::Topology;
use crate::utils::{MeshVertex, flat_quad_vertices, mobius_strip_vertices};
use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, window::Window};

// --- GPU Data Structures ---

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct GlobalUniforms {
    transform: [f32; 16],
}

// Tilt of the strip view; the flat board is drawn untransformed.
const STRIP_TILT_Y: f32 = PI * 2.0 / 3.0;
const CAMERA_DISTANCE: f32 = 2.2;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// --- Renderer ---
pub struct Renderer<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    topology: Topology,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    global_uniform_buffer: wgpu::Buffer,
    bind_group_globals: wgpu::BindGroup,
    bind_group_field: wgpu::BindGroup,
    field_texture: wgpu::Texture,
    field_view: wgpu::TextureView,
    field_size: (u32, u32),
    depth_view: wgpu::TextureView,
}

impl<'a> Renderer<'a> {
    pub async fn new(window: Arc<Window>, sim_config: &SimConfig) -> Self {
        let size = window.inner_size();
        let size = PhysicalSize::new(size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find an appropriate adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Display Shader Module"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // --- Display mesh ---
        let vertices: Vec<MeshVertex> = match sim_config.topology {
            Topology::Mobius => {
                mobius_strip_vertices(STRIP_STEPS, STRIP_RADIUS, STRIP_THICKNESS)
            }
            Topology::Flat | Topology::Toroidal => flat_quad_vertices(),
        };
        let vertex_count = vertices.len() as u32;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Display Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // --- Global uniforms ---
        let transform = view_transform(sim_config.topology, size.width as f32 / size.height as f32);
        let global_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global Uniform Buffer"),
            contents: bytemuck::bytes_of(&GlobalUniforms {
                transform: transform.to_cols_array(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // --- Field texture ---
        // Written by `upload_field` on the CPU path or by the field compute
        // pass on the GPU path, sampled by the fragment shader either way.
        let field_size = (
            (sim_config.width * sim_config.supersample) as u32,
            (sim_config.height * sim_config.supersample) as u32,
        );
        let field_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Field Texture"),
            size: wgpu::Extent3d {
                width: field_size.0,
                height: field_size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::STORAGE_BINDING,
            view_formats: &[],
        });
        let field_view = field_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let field_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Field Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // --- Bind Group Layouts ---
        let bind_group_layout_globals =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globals Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<GlobalUniforms>() as _,
                        ),
                    },
                    count: None,
                }],
            });

        let bind_group_layout_field =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Field Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let bind_group_globals = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &bind_group_layout_globals,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_uniform_buffer.as_entire_binding(),
            }],
        });

        let bind_group_field = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Field Bind Group"),
            layout: &bind_group_layout_field,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&field_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&field_sampler),
                },
            ],
        });

        // --- Render Pipeline ---
        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Display Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout_globals, &bind_group_layout_field],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Display Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The strip is one-sided in the mathematical sense; both
                // faces of the mesh must draw.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = create_depth_view(&device, size);

        log::info!(
            "renderer ready: {}x{} surface, {}x{} field texture",
            size.width,
            size.height,
            field_size.0,
            field_size.1
        );

        Self {
            surface,
            device,
            queue,
            config,
            size,
            topology: sim_config.topology,
            render_pipeline,
            vertex_buffer,
            vertex_count,
            global_uniform_buffer,
            bind_group_globals,
            bind_group_field,
            field_texture,
            field_view,
            field_size,
            depth_view,
        }
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[inline]
    pub fn field_view(&self) -> &wgpu::TextureView {
        &self.field_view
    }

    /// Re-apply the current surface configuration. Used when the surface is
    /// lost: the size has not changed, so `resize` would early-out.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        log::warn!("surface lost, reconfigured");
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let new_size = PhysicalSize::new(new_size.width.max(1), new_size.height.max(1));
        if new_size != self.size {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, new_size);

            let transform =
                view_transform(self.topology, new_size.width as f32 / new_size.height as f32);
            self.queue.write_buffer(
                &self.global_uniform_buffer,
                0,
                bytemuck::bytes_of(&GlobalUniforms {
                    transform: transform.to_cols_array(),
                }),
            );
            log::info!("renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// CPU path: quantize the display field to 8-bit grey and upload it.
    /// Called once per completed generation, not per frame.
    pub fn upload_field(&self, field: &DisplayField) {
        debug_assert_eq!(field.width() as u32, self.field_size.0);
        debug_assert_eq!(field.height() as u32, self.field_size.1);

        let mut texels = Vec::with_capacity(field.samples().len() * 4);
        for &v in field.samples() {
            let g = (v.clamp(0.0, 1.0) * 255.0) as u8;
            texels.extend_from_slice(&[g, g, g, 255]);
        }
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.field_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.field_size.0),
                rows_per_image: Some(self.field_size.1),
            },
            wgpu::Extent3d {
                width: self.field_size.0,
                height: self.field_size.1,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Render one frame. On the GPU path, `gpu_work` carries the stepper
    /// and the number of generations due: their compute passes are encoded
    /// before the render pass on the same encoder, so the frame always
    /// samples the last-completed generation.
    pub fn render(
        &mut self,
        gpu_work: Option<(&mut GpuLife, u32)>,
    ) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        if let Some((gpu, steps)) = gpu_work {
            for _ in 0..steps {
                gpu.encode_step(&mut encoder);
            }
            gpu.encode_field(&mut encoder);
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Display Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group_globals, &[]);
            render_pass.set_bind_group(1, &self.bind_group_field, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();

        Ok(())
    }
}

fn view_transform(topology: Topology, aspect: f32) -> Mat4 {
    match topology {
        Topology::Mobius => {
            Mat4::perspective_rh(PI / 4.0, aspect, 0.1, 10.0)
                * Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
                * Mat4::from_euler(EulerRot::XYZ, 0.0, STRIP_TILT_Y, 0.0)
        }
        Topology::Flat | Topology::Toroidal => Mat4::IDENTITY,
    }
}

fn create_depth_view(device: &wgpu::Device, size: PhysicalSize<u32>) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
