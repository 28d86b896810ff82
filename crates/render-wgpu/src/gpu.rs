use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use pyramid_render::{
    MeshData, MeshHandle, RenderBackend, TextureData, TextureHandle, Vertex, uniforms,
};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Errors from setting up the GPU or uploading resources.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("texture {name}: expected {expected} bytes of RGBA8, got {actual}")]
    TextureSize {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("mesh {0} has an index outside its vertex buffer")]
    MeshIndices(String),
}

/// CPU mirror of the shader's uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub brightness: [f32; 4],
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            brightness: Vec4::ONE.to_array(),
        }
    }
}

impl Uniforms {
    /// Store a matrix by shader name. Returns false for names the shader
    /// does not declare.
    pub fn set_mat4(&mut self, name: &str, value: Mat4) -> bool {
        let slot = match name {
            uniforms::MODEL => &mut self.model,
            uniforms::VIEW => &mut self.view,
            uniforms::PROJ => &mut self.proj,
            _ => return false,
        };
        *slot = value.to_cols_array_2d();
        true
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) -> bool {
        if name != uniforms::BRIGHTNESS {
            return false;
        }
        self.brightness = value.to_array();
        true
    }
}

/// wgpu vertex attributes for the interleaved `Vertex` layout.
fn vertex_attributes() -> Vec<wgpu::VertexAttribute> {
    Vertex::ATTRIBUTES
        .iter()
        .map(|a| wgpu::VertexAttribute {
            format: match a.components {
                1 => wgpu::VertexFormat::Float32,
                2 => wgpu::VertexFormat::Float32x2,
                3 => wgpu::VertexFormat::Float32x3,
                _ => wgpu::VertexFormat::Float32x4,
            },
            offset: a.offset,
            shader_location: a.location,
        })
        .collect()
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// wgpu-based implementation of `RenderBackend` drawing into a window surface.
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniforms: Uniforms,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    meshes: Vec<GpuMesh>,
    textures: Vec<wgpu::BindGroup>,
    bound_texture: Option<TextureHandle>,
    depth_texture: wgpu::TextureView,
    clear_color: wgpu::Color,
    frame: Option<wgpu::SurfaceTexture>,
}

impl WgpuBackend {
    /// Create a surface for `target`, pick an adapter and device, and build
    /// the pyramid pipeline.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        clear_color: Vec4,
    ) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = info.backend.to_str(),
            driver = %info.driver,
            driver_info = %info.driver_info,
            "GPU adapter selected"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("pyramid_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniforms = Uniforms::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pyramid_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pyramid_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::PYRAMID_SHADER.into()),
        });

        let attributes = vertex_attributes();
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pyramid_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: Vertex::STRIDE,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let depth_texture = Self::create_depth_texture(&device, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniforms,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            sampler,
            meshes: Vec::new(),
            textures: Vec::new(),
            bound_texture: None,
            depth_texture,
            clear_color: wgpu::Color {
                r: f64::from(clear_color.x),
                g: f64::from(clear_color.y),
                b: f64::from(clear_color.z),
                a: f64::from(clear_color.w),
            },
            frame: None,
        })
    }

    /// Reconfigure the surface and depth buffer for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            Self::create_depth_texture(&self.device, self.config.width, self.config.height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Acquire the surface texture for this frame, recovering from a lost or
    /// outdated surface by reconfiguring. `None` means the frame is skipped.
    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(t) => Some(t),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("timed out acquiring surface texture");
                None
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                None
            }
        }
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl RenderBackend for WgpuBackend {
    type Error = GpuError;

    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle, GpuError> {
        if !mesh.indices_in_bounds() {
            return Err(GpuError::MeshIndices(mesh.name.clone()));
        }

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let handle = MeshHandle {
            id: self.meshes.len() as u32,
            index_count: mesh.index_count(),
        };
        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: handle.index_count,
        });
        tracing::info!(
            mesh = %mesh.name,
            vertices = mesh.vertices.len(),
            indices = handle.index_count,
            "uploaded mesh"
        );
        Ok(handle)
    }

    fn upload_texture(&mut self, data: &TextureData) -> Result<TextureHandle, GpuError> {
        let expected = data.width as usize * data.height as usize * 4;
        if data.data.len() != expected || expected == 0 {
            return Err(GpuError::TextureSize {
                name: data.name.clone(),
                expected,
                actual: data.data.len(),
            });
        }

        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(data.name.as_str()),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.bytes_per_row()),
                rows_per_image: Some(data.height),
            },
            size,
        );

        let view = texture.create_view(&Default::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(bind_group);
        tracing::info!(
            texture = %data.name,
            width = data.width,
            height = data.height,
            "uploaded texture"
        );
        Ok(handle)
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        if (texture.0 as usize) < self.textures.len() {
            self.bound_texture = Some(texture);
        } else {
            tracing::warn!(texture = texture.0, "bind of unknown texture ignored");
        }
    }

    fn set_uniform_mat4(&mut self, name: &str, value: Mat4) {
        if !self.uniforms.set_mat4(name, value) {
            tracing::warn!(name, "unknown mat4 uniform");
        }
    }

    fn set_uniform_vec4(&mut self, name: &str, value: Vec4) {
        if !self.uniforms.set_vec4(name, value) {
            tracing::warn!(name, "unknown vec4 uniform");
        }
    }

    fn set_uniform_int(&mut self, name: &str, value: i32) {
        // The pipeline has a single texture slot; the sampler unit is fixed.
        if name != uniforms::TEXTURE_UNIT || value != 0 {
            tracing::warn!(name, value, "unsupported int uniform");
        }
    }

    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32) {
        let mesh_index = mesh.id as usize;
        if mesh_index >= self.meshes.len() {
            tracing::warn!(mesh = mesh.id, "draw of unknown mesh ignored");
            return;
        }
        let Some(texture) = self.bound_texture else {
            tracing::warn!("draw without a bound texture ignored");
            return;
        };

        // The first draw of a frame acquires the surface texture and clears it.
        let (frame, load) = match self.frame.take() {
            Some(frame) => (frame, None),
            None => match self.acquire_frame() {
                Some(frame) => (frame, Some(self.clear_color)),
                None => return,
            },
        };

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: load.map_or(wgpu::LoadOp::Load, wgpu::LoadOp::Clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: if load.is_some() {
                            wgpu::LoadOp::Clear(1.0)
                        } else {
                            wgpu::LoadOp::Load
                        },
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let gpu_mesh = &self.meshes[mesh_index];
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_bind_group(1, &self.textures[texture.0 as usize], &[]);
            pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..index_count.min(gpu_mesh.index_count), 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.frame = Some(frame);
    }

    fn swap_buffers(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.present();
        }
    }
}
