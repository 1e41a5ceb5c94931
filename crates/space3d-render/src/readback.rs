//! GPU-to-CPU readback of square RGBA8 render targets.
//!
//! wgpu requires texture-to-buffer copies to use rows padded to
//! [`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`]; [`TextureReadback`] owns a buffer
//! with that layout and strips the padding when producing an image.

use image::RgbaImage;

/// Errors raised while copying a texture back to host memory.
#[derive(Debug, thiserror::Error)]
pub enum ReadbackError {
    /// The buffer could not be mapped for reading.
    #[error("failed to map readback buffer: {0}")]
    MapFailed(#[from] wgpu::BufferAsyncError),

    /// The map callback was dropped without reporting.
    #[error("readback map callback was dropped")]
    ChannelClosed,

    /// Waiting on the device failed.
    #[error("device poll failed: {0}")]
    Poll(String),

    /// The mapped buffer is too small for the requested image.
    #[error("readback holds {actual} bytes, {expected} needed for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Row stride for a copy of `width` RGBA8 texels, rounded up to the copy alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// A reusable readback buffer sized for one `width x height` RGBA8 texture.
pub struct TextureReadback {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_row: u32,
}

impl TextureReadback {
    /// Allocate a mappable buffer for a `width x height` RGBA8 texture.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let padded_row = padded_bytes_per_row(width);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("face-readback"),
            size: u64::from(padded_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            width,
            height,
            padded_row,
        }
    }

    /// Record a copy of mip 0 of `texture` into the readback buffer.
    pub fn encode_copy(&self, encoder: &mut wgpu::CommandEncoder, texture: &wgpu::Texture) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Map the buffer after the copy was submitted and copy it into a new image.
    ///
    /// Blocks until the GPU has finished the submitted work.
    pub fn read(&self, device: &wgpu::Device) -> Result<RgbaImage, ReadbackError> {
        let slice = self.buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| ReadbackError::Poll(e.to_string()))?;
        rx.recv().map_err(|_| ReadbackError::ChannelClosed)??;

        let image = {
            let mapped = slice.get_mapped_range();
            unpack_rows(&mapped, self.width, self.height, self.padded_row)
        };
        self.buffer.unmap();
        image
    }
}

/// Drop the per-row padding of a texture copy and wrap the packed RGBA8 rows.
fn unpack_rows(
    padded: &[u8],
    width: u32,
    height: u32,
    padded_row: u32,
) -> Result<RgbaImage, ReadbackError> {
    let row_bytes = (width * 4) as usize;
    let expected = match height {
        0 => 0,
        h => padded_row as usize * (h as usize - 1) + row_bytes,
    };
    if padded.len() < expected || (padded_row as usize) < row_bytes {
        return Err(ReadbackError::SizeMismatch {
            width,
            height,
            expected,
            actual: padded.len(),
        });
    }

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * padded_row as usize;
        pixels.extend_from_slice(&padded[start..start + row_bytes]);
    }
    RgbaImage::from_raw(width, height, pixels).ok_or(ReadbackError::SizeMismatch {
        width,
        height,
        expected,
        actual: padded.len(),
    })
}
