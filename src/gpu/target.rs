use std::sync::Arc;

use wgpu::{BindGroupLayout, Buffer, Device, RenderPipeline, Sampler, SurfaceConfiguration, Texture};
use winit::window::Window;

use super::context::GpuContext;
use crate::core::fit::Rect;
use crate::core::pixels::{AlphaMode, PixelBuffer};
use crate::error::ViewerError;
use crate::traits::{PresentOutcome, RenderTarget, Viewport};

/// Where the bitmap lands, in NDC
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadUniform {
    /// left, top, right, bottom
    rect: [f32; 4],
}

/// Texture uploaded from a [`PixelBuffer`], bound for drawing
pub struct GpuBitmap {
    _texture: Texture,
    bind_group: wgpu::BindGroup,
    alpha_mode: AlphaMode,
}

/// Window surface plus the pipelines that draw bitmaps onto it
pub struct GpuTarget {
    gpu: GpuContext,
    surface_config: SurfaceConfiguration,
    bind_group_layout: BindGroupLayout,
    /// None when the surface format cannot blend
    premultiplied_pipeline: Option<RenderPipeline>,
    opaque_pipeline: RenderPipeline,
    sampler: Sampler,
    quad_buffer: Buffer,
    viewport: Viewport,
}

impl GpuTarget {
    pub fn new(window: Arc<Window>, viewport: Viewport) -> Result<Self, ViewerError> {
        let gpu = GpuContext::new(window)?;

        let surface_caps = gpu.surface.get_capabilities(&gpu.adapter);
        // Bytes go to the screen untouched, as with an 8-bit BGRA swap chain.
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(ViewerError::NoSurfaceFormat)?;
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::Opaque)
        {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            wgpu::CompositeAlphaMode::Auto
        };

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: viewport.width,
            height: viewport.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if !viewport.is_empty() {
            gpu.surface.configure(&gpu.device, &surface_config);
        }

        let blendable = gpu
            .adapter
            .get_texture_format_features(format)
            .flags
            .contains(wgpu::TextureFormatFeatureFlags::BLENDABLE);

        let bind_group_layout = Self::create_bind_group_layout(&gpu.device);
        let premultiplied_pipeline = blendable.then(|| {
            Self::create_render_pipeline(
                &gpu.device,
                &bind_group_layout,
                format,
                wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            )
        });
        let opaque_pipeline = Self::create_render_pipeline(
            &gpu.device,
            &bind_group_layout,
            format,
            wgpu::BlendState::REPLACE,
        );

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bitmap Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let quad_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Quad Uniform"),
            size: std::mem::size_of::<QuadUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!(
            "surface {:?}, premultiplied blending {}",
            format,
            if blendable { "available" } else { "unavailable" }
        );

        Ok(Self {
            gpu,
            surface_config,
            bind_group_layout,
            premultiplied_pipeline,
            opaque_pipeline,
            sampler,
            quad_buffer,
            viewport,
        })
    }

    fn configure(&mut self) {
        self.surface_config.width = self.viewport.width;
        self.surface_config.height = self.viewport.height;
        self.gpu
            .surface
            .configure(&self.gpu.device, &self.surface_config);
    }

    fn create_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bitmap Bind Group Layout"),
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
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        })
    }

    fn create_render_pipeline(
        device: &Device,
        bind_group_layout: &BindGroupLayout,
        format: wgpu::TextureFormat,
        blend: wgpu::BlendState,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bitmap Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/bitmap.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Bitmap Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Bitmap Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

impl RenderTarget for GpuTarget {
    type Bitmap = GpuBitmap;

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !viewport.is_empty() {
            self.configure();
        }
    }

    fn create_bitmap(&mut self, pixels: &PixelBuffer) -> Result<GpuBitmap, ViewerError> {
        if pixels.alpha_mode == AlphaMode::Premultiplied && self.premultiplied_pipeline.is_none() {
            return Err(ViewerError::Bitmap(format!(
                "{:?} surface cannot blend premultiplied alpha",
                self.surface_config.format
            )));
        }

        let max = self.gpu.device.limits().max_texture_dimension_2d;
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 || width > max || height > max {
            return Err(ViewerError::Bitmap(format!(
                "{}x{} is outside the 1..={} texture range",
                width, height, max
            )));
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Bitmap Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.gpu.queue.write_texture(
            texture.as_image_copy(),
            &pixels.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(pixels.bytes_per_row()),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bitmap Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.quad_buffer.as_entire_binding(),
                },
            ],
        });

        Ok(GpuBitmap {
            _texture: texture,
            bind_group,
            alpha_mode: pixels.alpha_mode,
        })
    }

    fn present(
        &mut self,
        frame: Option<(&GpuBitmap, Rect)>,
    ) -> Result<PresentOutcome, ViewerError> {
        if self.gpu.is_lost() {
            return Ok(PresentOutcome::TargetLost);
        }
        if self.viewport.is_empty() {
            return Ok(PresentOutcome::Skipped);
        }

        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost) => return Ok(PresentOutcome::TargetLost),
            Err(wgpu::SurfaceError::Outdated) => {
                self.configure();
                return Ok(PresentOutcome::Retry);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out waiting for the next surface texture");
                return Ok(PresentOutcome::Retry);
            }
            Err(e) => return Err(e.into()),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let drawable = frame.filter(|(_, dst)| dst.area() > 0);
        if let Some((_, dst)) = drawable {
            let quad = QuadUniform {
                rect: dst.to_ndc(self.viewport).to_array(),
            };
            self.gpu
                .queue
                .write_buffer(&self.quad_buffer, 0, bytemuck::bytes_of(&quad));
        }

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewer Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Viewer Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some((bitmap, _)) = drawable {
                let pipeline = match (bitmap.alpha_mode, &self.premultiplied_pipeline) {
                    (AlphaMode::Premultiplied, Some(pipeline)) => pipeline,
                    _ => &self.opaque_pipeline,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &bitmap.bind_group, &[]);
                render_pass.draw(0..6, 0..1);
            }
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        surface_texture.present();

        Ok(PresentOutcome::Presented)
    }
}
