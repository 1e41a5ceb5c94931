use std::path::PathBuf;

use space3d_render::{ReadbackError, RenderContextError, ShaderError, TextureError};

/// Errors from generating, exporting or displaying a sky.
#[derive(Debug, thiserror::Error)]
pub enum SkyError {
    /// No usable GPU device.
    #[error("failed to create rendering context: {0}")]
    Construction(#[from] RenderContextError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// A rendered face could not be copied back to the host.
    #[error("face readback failed: {0}")]
    Readback(#[from] ReadbackError),

    /// A face came back at the wrong size.
    #[error("rendered faces are not all {expected}x{expected}")]
    FaceSize { expected: u32 },

    #[error("failed to upload face texture: {0}")]
    Texture(#[from] TextureError),

    #[error("failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
