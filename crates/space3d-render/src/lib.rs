//! Headless wgpu plumbing for the space3d generator: device setup, shader
//! loading, buffers, offscreen pipelines, texture upload and readback.

pub mod buffer;
pub mod gpu;
pub mod pipeline;
pub mod readback;
pub mod shader;
pub mod texture;

pub use buffer::{BufferAllocator, VertexPosition, VertexPositionColor, VertexPositionUv};
pub use gpu::{RenderContext, RenderContextError, init_headless_blocking};
pub use pipeline::{
    ACCUMULATE_BLEND, FACE_FORMAT, LayerPipelineDesc, create_layer_pipeline, uniform_layout,
};
pub use readback::{ReadbackError, TextureReadback, padded_bytes_per_row};
pub use shader::{ShaderError, compile_shader, validated};
pub use texture::{TextureError, TextureUploader, UploadedTexture, mip_level_count};
