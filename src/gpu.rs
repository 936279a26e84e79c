use crate::config::SimConfig;
use crate::simulation::{Board, RuleVariant, Topology};
use wgpu::util::DeviceExt;

// This struct MUST match the Params layout in life.wgsl.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuParams {
    width: u32,
    height: u32,
    topology: u32,
    rule: u32,
    fade_const: f32,
    scale: u32,
    grid_lines: u32,
    _pad: u32,
}

impl GpuParams {
    fn from_config(config: &SimConfig) -> Self {
        Self {
            width: config.width as u32,
            height: config.height as u32,
            topology: match config.topology {
                Topology::Flat => 0,
                Topology::Toroidal => 1,
                Topology::Mobius => 2,
            },
            rule: match config.rule {
                RuleVariant::Strict => 0,
                RuleVariant::Fade => 1,
            },
            fade_const: config.fade_const,
            scale: config.supersample as u32,
            grid_lines: config.grid_lines as u32,
            _pad: 0,
        }
    }
}

/// Device-resident step engine: two ping-pong board storage buffers under
/// the same role-tag discipline as the CPU `BoardPair`, plus the
/// field-expansion pass writing the display texture. The host is the only
/// mutator of the tag; dispatch ordering within an encoder supplies the
/// write-visibility barrier between a step and the passes that read it.
pub struct GpuLife {
    boards: [wgpu::Buffer; 2],
    step_pipeline: wgpu::ComputePipeline,
    field_pipeline: wgpu::ComputePipeline,
    // bind_groups[i] binds boards[i] as the readable source and
    // boards[i ^ 1] as the write destination.
    bind_groups: [wgpu::BindGroup; 2],
    current: usize,
    width: u32,
    height: u32,
    scale: u32,
}

impl GpuLife {
    pub fn new(
        device: &wgpu::Device,
        config: &SimConfig,
        seed_board: &Board,
        field_view: &wgpu::TextureView,
    ) -> Self {
        let cell_count = config.width * config.height;
        let board_size = (cell_count * std::mem::size_of::<f32>()) as wgpu::BufferAddress;

        let boards = [
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Board Buffer A"),
                contents: bytemuck::cast_slice(&interior_data(seed_board)),
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            }),
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Board Buffer B"),
                size: board_size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        ];

        // The parameter block is immutable after validation; the bind groups
        // keep the buffer alive.
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Life Params Buffer"),
            contents: bytemuck::bytes_of(&GpuParams::from_config(config)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Life Compute Module"),
            source: wgpu::ShaderSource::Wgsl(include_str!("life.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Life Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(board_size),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(board_size),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<GpuParams>() as _,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: wgpu::TextureFormat::Rgba8Unorm,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let bind_groups = [0usize, 1].map(|i| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Life Bind Group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: boards[i].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: boards[i ^ 1].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(field_view),
                    },
                ],
            })
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Life Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let step_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Life Step Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("step_main"),
            compilation_options: Default::default(),
            cache: None,
        });
        let field_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Field Expand Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("field_main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            boards,
            step_pipeline,
            field_pipeline,
            bind_groups,
            current: 0,
            width: config.width as u32,
            height: config.height as u32,
            scale: config.supersample as u32,
        }
    }

    /// Encode one generation step. The role-tag flip happens only after the
    /// pass is fully encoded; the next pass encoded on this encoder reads
    /// the freshly written board through wgpu's pass-ordering guarantee.
    pub fn encode_step(&mut self, encoder: &mut wgpu::CommandEncoder) {
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Life Step Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.step_pipeline);
            pass.set_bind_group(0, &self.bind_groups[self.current], &[]);
            pass.dispatch_workgroups(self.width.div_ceil(8), self.height.div_ceil(8), 1);
        }
        self.current ^= 1;
    }

    /// Encode the field expansion from the last-completed board. Must be
    /// encoded after any step passes in the same submission.
    pub fn encode_field(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Field Expand Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.field_pipeline);
        pass.set_bind_group(0, &self.bind_groups[self.current], &[]);
        pass.dispatch_workgroups(
            (self.width * self.scale).div_ceil(8),
            (self.height * self.scale).div_ceil(8),
            1,
        );
    }

    /// Overwrite the current board with a freshly seeded CPU board.
    pub fn reseed(&self, queue: &wgpu::Queue, board: &Board) {
        queue.write_buffer(
            &self.boards[self.current],
            0,
            bytemuck::cast_slice(&interior_data(board)),
        );
    }
}

/// Interior cells row-major, ghost border stripped; the GPU boards resolve
/// the topology per lookup instead of carrying ghosts.
fn interior_data(board: &Board) -> Vec<f32> {
    let mut data = Vec::with_capacity(board.width() * board.height());
    for y in 0..board.height() {
        for x in 0..board.width() {
            data.push(board.get(x, y));
        }
    }
    data
}
