//! Upload of rendered face images as sampled, mipmapped GPU textures.
//!
//! [`TextureUploader`] turns an [`image::RgbaImage`] into an [`UploadedTexture`]
//! with a full mip chain and a bind group that samples it trilinearly.

use image::RgbaImage;

/// A sampled GPU texture with its view and bind group.
pub struct UploadedTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    /// Texture at binding 0, sampler at binding 1.
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
    /// 1 when mipmaps were not generated.
    pub mip_level_count: u32,
}

/// Errors that can occur during texture upload.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("{width}x{height} exceeds the device texture limit of {limit}")]
    TooLarge { width: u32, height: u32, limit: u32 },
}

/// Number of mip levels in a full chain for the given dimensions.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Format for uploaded face textures. Generated pixels are stored as-is, so
/// they are treated as linear on both ends.
pub const UPLOAD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const MIP_BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(src_texture, src_sampler, in.uv);
}
"#;

/// Shared layout, sampler and mip pipeline for face uploads.
pub struct TextureUploader {
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    mip_pipeline: wgpu::RenderPipeline,
    mip_sampler: wgpu::Sampler,
}

fn texture_sampler_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
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
    })
}

fn texture_sampler_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

impl TextureUploader {
    pub fn new(device: &wgpu::Device) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("face-sampler-trilinear"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });
        let bind_group_layout = texture_sampler_layout(device, "face-texture-layout");

        let mip_layout = texture_sampler_layout(device, "mip-blit-layout");
        let mip_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mip-blit-shader"),
            source: wgpu::ShaderSource::Wgsl(MIP_BLIT_SHADER_SOURCE.into()),
        });
        let mip_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mip-blit-pipeline-layout"),
            bind_group_layouts: &[&mip_layout],
            immediate_size: 0,
        });
        let mip_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mip-blit-pipeline"),
            layout: Some(&mip_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mip_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &mip_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: UPLOAD_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
        let mip_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mip-blit-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            bind_group_layout,
            sampler,
            mip_pipeline,
            mip_sampler,
        }
    }

    /// Layout of the bind group carried by every [`UploadedTexture`].
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Upload `image` and, when `mipmaps` is set, fill its mip chain.
    pub fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &RgbaImage,
        mipmaps: bool,
    ) -> Result<UploadedTexture, TextureError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimensions { width, height });
        }
        let limit = device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(TextureError::TooLarge {
                width,
                height,
                limit,
            });
        }

        let mip_levels = if mipmaps {
            mip_level_count(width, height)
        } else {
            1
        };
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: UPLOAD_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: None,
            },
            size,
        );

        if mip_levels > 1 {
            self.fill_mip_chain(device, queue, &texture, mip_levels);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = texture_sampler_bind_group(
            device,
            &self.bind_group_layout,
            &view,
            &self.sampler,
            label,
        );

        log::debug!("Uploaded texture '{label}' ({width}x{height}, {mip_levels} mips)");
        Ok(UploadedTexture {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
            mip_level_count: mip_levels,
        })
    }

    /// Downsample each level from the one above it.
    fn fill_mip_chain(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        mip_levels: u32,
    ) {
        let layout = self.mip_pipeline.get_bind_group_layout(0);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mip-chain-encoder"),
        });

        for level in 1..mip_levels {
            let level_view = |mip: u32| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    base_mip_level: mip,
                    mip_level_count: Some(1),
                    ..Default::default()
                })
            };
            let src_view = level_view(level - 1);
            let dst_view = level_view(level);
            let bind_group = texture_sampler_bind_group(
                device,
                &layout,
                &src_view,
                &self.mip_sampler,
                "mip-blit-bind-group",
            );

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mip-blit-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });
            pass.set_pipeline(&self.mip_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::init_headless_blocking;

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(4, 4), 3);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(512, 256), 10);
        assert_eq!(mip_level_count(1024, 1024), 11);
        assert_eq!(mip_level_count(4096, 4096), 13);
    }

    #[test]
    fn test_upload_builds_full_mip_chain() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let uploader = TextureUploader::new(&ctx.device);
        let image = RgbaImage::from_pixel(64, 64, image::Rgba([10, 20, 30, 255]));
        let texture = uploader
            .upload(&ctx.device, &ctx.queue, "mipmapped", &image, true)
            .unwrap();
        assert_eq!(texture.dimensions, (64, 64));
        assert_eq!(texture.mip_level_count, 7);
    }

    #[test]
    fn test_upload_without_mipmaps_has_single_level() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let uploader = TextureUploader::new(&ctx.device);
        let image = RgbaImage::new(16, 16);
        let texture = uploader
            .upload(&ctx.device, &ctx.queue, "flat", &image, false)
            .unwrap();
        assert_eq!(texture.mip_level_count, 1);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let uploader = TextureUploader::new(&ctx.device);
        let result = uploader.upload(&ctx.device, &ctx.queue, "empty", &RgbaImage::new(0, 0), true);
        assert!(matches!(result, Err(TextureError::ZeroDimensions { .. })));
    }
}
