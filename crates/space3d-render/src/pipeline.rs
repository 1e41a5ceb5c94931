//! Shared pipeline state for offscreen face rendering.
//!
//! All sky layers draw into the same [`FACE_FORMAT`] target with
//! [`ACCUMULATE_BLEND`]: colour is blended source-alpha over destination while
//! the destination alpha is left as cleared.

use std::num::NonZeroU64;

use crate::shader::{ShaderError, validated};

/// Colour format of every offscreen face target.
pub const FACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Colour: `src * src.a + dst * (1 - src.a)`. Alpha: `dst`.
pub const ACCUMULATE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Bind group layout with a single uniform buffer at binding 0.
pub fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

/// Everything that differs between the sky layer pipelines.
pub struct LayerPipelineDesc<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub format: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
    /// `None` draws both sides, which boxes around the camera need.
    pub cull_mode: Option<wgpu::Face>,
}

/// Build a depthless triangle-list pipeline from `desc`.
///
/// A mismatch between `desc` and the shader interface is returned as
/// [`ShaderError::PipelineFailed`].
pub fn create_layer_pipeline(
    device: &wgpu::Device,
    desc: &LayerPipelineDesc<'_>,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    validated(device, desc.label, || {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: desc.bind_group_layouts,
            immediate_size: 0,
        });
        build_pipeline(device, desc, &layout)
    })
}

fn build_pipeline(
    device: &wgpu::Device,
    desc: &LayerPipelineDesc<'_>,
    layout: &wgpu::PipelineLayout,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some(desc.vertex_entry),
            buffers: desc.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VertexPosition;
    use crate::gpu::init_headless_blocking;
    use crate::shader::compile_shader;

    const FLAT_SHADER: &str = r#"
        struct Uniforms { tint: vec4<f32> };
        @group(0) @binding(0) var<uniform> u: Uniforms;

        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return u.tint;
        }
    "#;

    #[test]
    fn test_accumulate_blend_keeps_destination_alpha() {
        assert_eq!(ACCUMULATE_BLEND.alpha.src_factor, wgpu::BlendFactor::Zero);
        assert_eq!(ACCUMULATE_BLEND.alpha.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(ACCUMULATE_BLEND.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(
            ACCUMULATE_BLEND.color.dst_factor,
            wgpu::BlendFactor::OneMinusSrcAlpha
        );
    }

    #[test]
    fn test_face_format_is_linear_rgba8() {
        assert_eq!(FACE_FORMAT, wgpu::TextureFormat::Rgba8Unorm);
        assert!(!FACE_FORMAT.is_srgb());
    }

    fn flat_desc<'a>(
        shader: &'a wgpu::ShaderModule,
        layouts: &'a [&'a wgpu::BindGroupLayout],
        buffers: &'a [wgpu::VertexBufferLayout<'a>],
        fragment_entry: &'a str,
    ) -> LayerPipelineDesc<'a> {
        LayerPipelineDesc {
            label: "flat",
            shader,
            vertex_entry: "vs_main",
            fragment_entry,
            buffers,
            bind_group_layouts: layouts,
            format: FACE_FORMAT,
            blend: Some(ACCUMULATE_BLEND),
            cull_mode: None,
        }
    }

    #[test]
    fn test_layer_pipeline_creation_succeeds() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let shader = compile_shader(&ctx.device, "flat", FLAT_SHADER).unwrap();
        let layout = uniform_layout(&ctx.device, "flat-uniforms", wgpu::ShaderStages::FRAGMENT, 16);
        let buffers = [VertexPosition::layout()];
        let pipeline = create_layer_pipeline(
            &ctx.device,
            &flat_desc(&shader, &[&layout], &buffers, "fs_main"),
        );
        assert!(pipeline.is_ok());
    }

    #[test]
    fn test_missing_entry_point_is_pipeline_error() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let shader = compile_shader(&ctx.device, "flat", FLAT_SHADER).unwrap();
        let layout = uniform_layout(&ctx.device, "flat-uniforms", wgpu::ShaderStages::FRAGMENT, 16);
        let buffers = [VertexPosition::layout()];
        let pipeline = create_layer_pipeline(
            &ctx.device,
            &flat_desc(&shader, &[&layout], &buffers, "fs_missing"),
        );
        assert!(matches!(
            pipeline,
            Err(ShaderError::PipelineFailed { ref label, .. }) if label == "flat"
        ));
    }
}
