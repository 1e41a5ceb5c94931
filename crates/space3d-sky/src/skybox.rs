//! Skybox viewer: draws a generated cubemap as six textured quads around the camera.
//!
//! Each face texture is bound separately so the composite export and the
//! viewer consume the same six images. The quad sits at `z = -1` and is
//! rotated onto each face by a per-face model matrix passed as an instance.

use glam::{Mat4, Vec3};
use space3d_render::{
    BufferAllocator, LayerPipelineDesc, ShaderError, TextureUploader, UploadedTexture,
    VertexPositionUv, compile_shader, create_layer_pipeline, uniform_layout,
};

use crate::cubemap::RenderedCubemap;
use crate::error::SkyError;
use crate::face::CubeFace;
use crate::renderer::ModelInstance;

const VIEWER_SHADER_SOURCE: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var face_texture: texture_2d<f32>;
@group(1) @binding(1)
var face_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_viewer(in: VertexInput) -> VertexOutput {
    let model = mat4x4<f32>(in.model_0, in.model_1, in.model_2, in.model_3);
    var out: VertexOutput;
    out.clip_position = camera.view_proj * model * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_viewer(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(face_texture, face_sampler, in.uv);
}
"#;

/// Rotation carrying the `z = -1` quad onto `face`.
pub fn face_model(face: CubeFace) -> Mat4 {
    use std::f32::consts::{FRAC_PI_2, PI};
    match face {
        CubeFace::Front => Mat4::IDENTITY,
        CubeFace::Back => Mat4::from_rotation_y(PI),
        CubeFace::Left => Mat4::from_rotation_y(FRAC_PI_2),
        CubeFace::Right => Mat4::from_rotation_y(-FRAC_PI_2),
        CubeFace::Top => Mat4::from_rotation_x(FRAC_PI_2),
        CubeFace::Bottom => Mat4::from_rotation_x(-FRAC_PI_2),
    }
}

/// Two triangles at `z = -1`, with `v` flipped so image row 0 is at the top.
fn face_quad() -> [VertexPositionUv; 6] {
    let vertex = |x: f32, y: f32| VertexPositionUv {
        position: [x, y, -1.0],
        uv: [x * 0.5 + 0.5, 1.0 - (y * 0.5 + 0.5)],
    };
    [
        vertex(-1.0, -1.0),
        vertex(1.0, -1.0),
        vertex(1.0, 1.0),
        vertex(-1.0, -1.0),
        vertex(1.0, 1.0),
        vertex(-1.0, 1.0),
    ]
}

pub struct SkyboxViewer {
    pipeline: wgpu::RenderPipeline,
    quad: wgpu::Buffer,
    models: wgpu::Buffer,
    camera: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    uploader: TextureUploader,
    textures: Option<[UploadedTexture; 6]>,
}

impl SkyboxViewer {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let shader = compile_shader(device, "skybox-viewer", VIEWER_SHADER_SOURCE)?;
        let uploader = TextureUploader::new(device);
        let camera_layout = uniform_layout(
            device,
            "viewer-camera-layout",
            wgpu::ShaderStages::VERTEX,
            std::mem::size_of::<[[f32; 4]; 4]>() as u64,
        );

        let pipeline = create_layer_pipeline(
            device,
            &LayerPipelineDesc {
                label: "skybox-viewer",
                shader: &shader,
                vertex_entry: "vs_viewer",
                fragment_entry: "fs_viewer",
                buffers: &[VertexPositionUv::layout(), ModelInstance::LAYOUT],
                bind_group_layouts: &[&camera_layout, uploader.bind_group_layout()],
                format: target_format,
                blend: None,
                cull_mode: None,
            },
        )?;

        let allocator = BufferAllocator::new(device);
        let quad = allocator.create_vertex_buffer("viewer-quad", &face_quad());
        let models: Vec<ModelInstance> = CubeFace::ALL
            .iter()
            .map(|&face| ModelInstance {
                columns: face_model(face).to_cols_array_2d(),
            })
            .collect();
        let models = allocator.create_vertex_buffer("viewer-face-models", &models);
        let camera = allocator.create_uniform_buffer(
            "viewer-camera",
            &Mat4::IDENTITY.to_cols_array_2d(),
        );
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("viewer-camera-bg"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera.as_entire_binding(),
            }],
        });

        Ok(Self {
            pipeline,
            quad,
            models,
            camera,
            camera_bind_group,
            uploader,
            textures: None,
        })
    }

    /// Upload all six faces with full mip chains, then swap them in.
    ///
    /// If any upload fails the previously bound textures stay in place.
    pub fn set_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cubemap: &RenderedCubemap,
    ) -> Result<(), SkyError> {
        let mut uploaded = Vec::with_capacity(CubeFace::ALL.len());
        for (face, image) in cubemap.iter() {
            uploaded.push(self.uploader.upload(device, queue, face.name(), image, true)?);
        }
        let textures: [UploadedTexture; 6] = uploaded
            .try_into()
            .map_err(|_| SkyError::FaceSize {
                expected: cubemap.resolution(),
            })?;
        self.textures = Some(textures);
        log::info!(
            "Skybox textures set ({0}x{0} per face)",
            cubemap.resolution()
        );
        Ok(())
    }

    pub fn has_textures(&self) -> bool {
        self.textures.is_some()
    }

    /// Draw the six faces into `pass` under the given camera.
    ///
    /// Does nothing until [`set_textures`](Self::set_textures) has succeeded.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'_>,
        view: Mat4,
        projection: Mat4,
    ) {
        let Some(textures) = &self.textures else {
            log::debug!("Skybox render skipped: no textures set");
            return;
        };

        let view_proj = projection * view;
        queue.write_buffer(
            &self.camera,
            0,
            bytemuck::cast_slice(&view_proj.to_cols_array()),
        );

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad.slice(..));
        pass.set_vertex_buffer(1, self.models.slice(..));
        for (i, texture) in (0u32..).zip(textures.iter()) {
            pass.set_bind_group(1, &texture.bind_group, &[]);
            pass.draw(0..6, i..i + 1);
        }
    }
}

/// Slowly drifting camera at the cube centre.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub tick: f32,
    pub fov_degrees: f32,
    pub animation_speed: f32,
}

impl OrbitCamera {
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 8.0;

    pub fn new(fov_degrees: f32, animation_speed: f32) -> Self {
        Self {
            tick: 0.0,
            fov_degrees,
            animation_speed,
        }
    }

    /// Step one frame.
    pub fn advance(&mut self) {
        self.tick += 0.0025 * self.animation_speed;
    }

    pub fn target(&self) -> Vec3 {
        let t = self.tick;
        Vec3::new(t.cos(), (0.555 * t).sin(), t.sin())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::ZERO, self.target(), Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, Self::NEAR, Self::FAR)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(80.0, 1.0)
    }
}
