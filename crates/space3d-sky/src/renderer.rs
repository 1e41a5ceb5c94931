//! Offscreen rendering of one cube face.
//!
//! Layers are drawn in a fixed order into a black target: point-star passes,
//! bright stars, nebulae, then the sun. Each layer is one instanced draw, and
//! blending follows instance order, so the result matches drawing every
//! instance separately in list order.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use image::RgbaImage;
use space3d_render::{
    ACCUMULATE_BLEND, BufferAllocator, FACE_FORMAT, LayerPipelineDesc, ReadbackError,
    RenderContext, ShaderError, TextureReadback, VertexPosition, VertexPositionColor,
    compile_shader, create_layer_pipeline, uniform_layout,
};

use crate::face::{CubeFace, face_projection};
use crate::geometry::{BillboardCorner, SkyGeometry};
use crate::params::SkyParameters;
use crate::shaders::{GLOW_SHADER_SOURCE, NEBULA_SHADER_SOURCE, POINT_STARS_SHADER_SOURCE};

/// Camera block shared by every layer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FaceUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// `x`: angular size of one texel at the face centre.
    pub params: [f32; 4],
}

impl FaceUniforms {
    pub fn new(face: CubeFace, resolution: u32) -> Self {
        Self {
            view_proj: (face_projection() * face.view()).to_cols_array_2d(),
            params: [2.0 / resolution.max(1) as f32, 0.0, 0.0, 0.0],
        }
    }
}

/// Model matrix of one point-star pass.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelInstance {
    pub columns: [[f32; 4]; 4],
}

impl ModelInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ModelInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4
        ],
    };
}

/// Parameters of one bright star or sun.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlowInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub falloff: f32,
}

impl GlowInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GlowInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &wgpu::vertex_attr_array![
            1 => Float32x3,
            2 => Float32,
            3 => Float32x3,
            4 => Float32
        ],
    };
}

/// Parameters of one nebula cloud.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct NebulaInstance {
    pub color: [f32; 3],
    pub scale: f32,
    pub offset: [f32; 3],
    pub intensity: f32,
    pub falloff: f32,
    pub _padding: [f32; 3],
}

impl NebulaInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<NebulaInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &wgpu::vertex_attr_array![
            1 => Float32x3,
            2 => Float32,
            3 => Float32x3,
            4 => Float32,
            5 => Float32
        ],
    };
}

struct InstanceBatch {
    buffer: wgpu::Buffer,
    count: u32,
}

impl InstanceBatch {
    fn upload<T: Pod>(allocator: &BufferAllocator<'_>, label: &str, data: &[T]) -> Option<Self> {
        allocator
            .create_instance_buffer(label, data)
            .map(|buffer| Self {
                buffer,
                count: data.len() as u32,
            })
    }
}

/// Per-request instance buffers, uploaded once and reused for all six faces.
pub struct SkyInstances {
    point_stars: Option<InstanceBatch>,
    stars: Option<InstanceBatch>,
    nebulae: Option<InstanceBatch>,
    sun: Option<InstanceBatch>,
}

impl SkyInstances {
    /// Stars and the sun are uploaded in world space rather than under the
    /// accumulated point-star model; their directions are already uniform.
    pub fn upload(device: &wgpu::Device, params: &SkyParameters) -> Self {
        let allocator = BufferAllocator::new(device);

        let models: Vec<ModelInstance> = params
            .point_star_models()
            .into_iter()
            .map(|m: Mat4| ModelInstance {
                columns: m.to_cols_array_2d(),
            })
            .collect();

        let stars: Vec<GlowInstance> = params
            .stars
            .iter()
            .map(|s| GlowInstance {
                position: s.position.to_array(),
                size: s.size,
                color: s.color.to_array(),
                falloff: s.falloff,
            })
            .collect();

        let nebulae: Vec<NebulaInstance> = params
            .nebulae
            .iter()
            .map(|n| NebulaInstance {
                color: n.color.to_array(),
                scale: n.scale,
                offset: n.offset.to_array(),
                intensity: n.intensity,
                falloff: n.falloff,
                _padding: [0.0; 3],
            })
            .collect();

        let sun: Vec<GlowInstance> = params
            .sun
            .iter()
            .map(|s| GlowInstance {
                position: s.position.to_array(),
                size: s.size,
                color: s.color.to_array(),
                falloff: s.falloff,
            })
            .collect();

        Self {
            point_stars: InstanceBatch::upload(&allocator, "point-star-models", &models),
            stars: InstanceBatch::upload(&allocator, "star-instances", &stars),
            nebulae: InstanceBatch::upload(&allocator, "nebula-instances", &nebulae),
            sun: InstanceBatch::upload(&allocator, "sun-instances", &sun),
        }
    }
}

/// The offscreen target and its readback buffer for one resolution.
struct FaceTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: TextureReadback,
    resolution: u32,
}

impl FaceTarget {
    fn new(device: &wgpu::Device, resolution: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("face-target"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FACE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("Allocated {resolution}x{resolution} face target");
        Self {
            texture,
            view,
            readback: TextureReadback::new(device, resolution, resolution),
            resolution,
        }
    }
}

/// Pipelines and targets for rendering cube faces.
pub struct FaceRenderer {
    point_stars: wgpu::RenderPipeline,
    stars: wgpu::RenderPipeline,
    sun: wgpu::RenderPipeline,
    nebulae: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    target: Option<FaceTarget>,
}

impl FaceRenderer {
    /// Compile the layer shaders and build their pipelines.
    pub fn new(device: &wgpu::Device) -> Result<Self, ShaderError> {
        let point_star_shader = compile_shader(device, "point-stars", POINT_STARS_SHADER_SOURCE)?;
        let glow_shader = compile_shader(device, "glow", GLOW_SHADER_SOURCE)?;
        let nebula_shader = compile_shader(device, "nebula", NEBULA_SHADER_SOURCE)?;

        let uniform_bgl = uniform_layout(
            device,
            "face-uniforms-bgl",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            std::mem::size_of::<FaceUniforms>() as u64,
        );
        let uniforms = BufferAllocator::new(device).create_uniform_buffer(
            "face-uniforms",
            &FaceUniforms::new(CubeFace::Front, 1),
        );
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("face-uniforms-bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let point_stars = layer_pipeline(
            device,
            &uniform_bgl,
            "point-stars-pipeline",
            &point_star_shader,
            ("vs_point_stars", "fs_point_stars"),
            &[VertexPositionColor::layout(), ModelInstance::LAYOUT],
        )?;
        let stars = layer_pipeline(
            device,
            &uniform_bgl,
            "star-pipeline",
            &glow_shader,
            ("vs_star", "fs_glow"),
            &[BillboardCorner::LAYOUT, GlowInstance::LAYOUT],
        )?;
        let sun = layer_pipeline(
            device,
            &uniform_bgl,
            "sun-pipeline",
            &glow_shader,
            ("vs_sun", "fs_glow"),
            &[VertexPosition::layout(), GlowInstance::LAYOUT],
        )?;
        let nebulae = layer_pipeline(
            device,
            &uniform_bgl,
            "nebula-pipeline",
            &nebula_shader,
            ("vs_nebula", "fs_nebula"),
            &[VertexPosition::layout(), NebulaInstance::LAYOUT],
        )?;

        Ok(Self {
            point_stars,
            stars,
            sun,
            nebulae,
            uniforms,
            uniform_bind_group,
            target: None,
        })
    }

    /// Render `face` at `resolution` and read it back into a new image.
    pub fn render_face(
        &mut self,
        ctx: &RenderContext,
        geometry: &SkyGeometry,
        instances: &SkyInstances,
        face: CubeFace,
        resolution: u32,
    ) -> Result<RgbaImage, ReadbackError> {
        ctx.queue.write_buffer(
            &self.uniforms,
            0,
            bytemuck::bytes_of(&FaceUniforms::new(face, resolution)),
        );

        if self
            .target
            .as_ref()
            .is_some_and(|t| t.resolution != resolution)
        {
            self.target = None;
        }
        let target = self
            .target
            .get_or_insert_with(|| FaceTarget::new(&ctx.device, resolution));

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(face.name()),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("face-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if let Some(batch) = &instances.point_stars {
                pass.set_pipeline(&self.point_stars);
                pass.set_vertex_buffer(0, geometry.point_stars.slice(..));
                pass.set_vertex_buffer(1, batch.buffer.slice(..));
                pass.draw(0..geometry.point_star_vertices, 0..batch.count);
            }
            if let Some(batch) = &instances.stars {
                pass.set_pipeline(&self.stars);
                pass.set_vertex_buffer(0, geometry.billboard.slice(..));
                pass.set_vertex_buffer(1, batch.buffer.slice(..));
                pass.draw(0..6, 0..batch.count);
            }
            if let Some(batch) = &instances.nebulae {
                pass.set_pipeline(&self.nebulae);
                pass.set_vertex_buffer(0, geometry.unit_box.slice(..));
                pass.set_vertex_buffer(1, batch.buffer.slice(..));
                pass.draw(0..geometry.box_vertices, 0..batch.count);
            }
            if let Some(batch) = &instances.sun {
                pass.set_pipeline(&self.sun);
                pass.set_vertex_buffer(0, geometry.unit_box.slice(..));
                pass.set_vertex_buffer(1, batch.buffer.slice(..));
                pass.draw(0..geometry.box_vertices, 0..batch.count);
            }
        }
        target.readback.encode_copy(&mut encoder, &target.texture);
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let image = target.readback.read(&ctx.device)?;
        log::debug!("Rendered {} face ({resolution}x{resolution})", face.name());
        Ok(image)
    }
}

/// Every layer blends into the face target, culling nothing: the boxes
/// enclose the camera.
fn layer_pipeline(
    device: &wgpu::Device,
    uniforms: &wgpu::BindGroupLayout,
    label: &str,
    shader: &wgpu::ShaderModule,
    (vertex_entry, fragment_entry): (&str, &str),
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> Result<wgpu::RenderPipeline, ShaderError> {
    create_layer_pipeline(
        device,
        &LayerPipelineDesc {
            label,
            shader,
            vertex_entry,
            fragment_entry,
            buffers,
            bind_group_layouts: &[uniforms],
            format: FACE_FORMAT,
            blend: Some(ACCUMULATE_BLEND),
            cull_mode: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_strides_match_layouts() {
        assert_eq!(std::mem::size_of::<FaceUniforms>(), 80);
        assert_eq!(ModelInstance::LAYOUT.array_stride, 64);
        assert_eq!(GlowInstance::LAYOUT.array_stride, 32);
        assert_eq!(NebulaInstance::LAYOUT.array_stride, 48);
    }

    #[test]
    fn test_glow_attribute_offsets() {
        let offsets: Vec<_> = GlowInstance::LAYOUT
            .attributes
            .iter()
            .map(|a| a.offset)
            .collect();
        assert_eq!(offsets, [0, 12, 16, 28]);
    }

    #[test]
    fn test_nebula_attribute_offsets() {
        let offsets: Vec<_> = NebulaInstance::LAYOUT
            .attributes
            .iter()
            .map(|a| a.offset)
            .collect();
        assert_eq!(offsets, [0, 12, 16, 28, 32]);
    }

    #[test]
    fn test_face_uniforms_texel_size() {
        let u = FaceUniforms::new(CubeFace::Top, 1024);
        assert_eq!(u.params[0], 2.0 / 1024.0);
        let expected = face_projection() * CubeFace::Top.view();
        assert_eq!(u.view_proj, expected.to_cols_array_2d());
    }
}
