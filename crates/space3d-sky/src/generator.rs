//! The generation entry point.

use std::time::Instant;

use image::RgbaImage;
use space3d_render::{RenderContext, init_headless_blocking};

use crate::cubemap::RenderedCubemap;
use crate::error::SkyError;
use crate::face::CubeFace;
use crate::geometry::{POINT_STAR_COUNT, SkyGeometry};
use crate::params::SkyParameters;
use crate::renderer::{FaceRenderer, SkyInstances};
use crate::request::{GenerationRequest, Resolution};

/// Owns the GPU context, compiled pipelines and static geometry, reused
/// across every [`generate`](Self::generate) call.
pub struct SpaceGenerator {
    ctx: RenderContext,
    geometry: SkyGeometry,
    renderer: FaceRenderer,
}

impl SpaceGenerator {
    /// Create a generator on a new headless device.
    pub fn new() -> Result<Self, SkyError> {
        Self::with_context(init_headless_blocking()?)
    }

    /// Create a generator on an existing device. Fails if any shader does not compile.
    pub fn with_context(ctx: RenderContext) -> Result<Self, SkyError> {
        let renderer = FaceRenderer::new(&ctx.device)?;
        let geometry = SkyGeometry::new(&ctx.device);

        log::info!(
            "Space generator ready on {} ({POINT_STAR_COUNT} point stars, faces up to {}px)",
            ctx.adapter.get_info().name,
            ctx.max_texture_size()
        );

        Ok(Self {
            ctx,
            geometry,
            renderer,
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Render all six faces for `request`.
    ///
    /// Faces are rendered into fresh images and returned together; a failure
    /// on any face discards the others. A resolution above the device limit
    /// is lowered to the largest size that fits.
    pub fn generate(&mut self, request: &GenerationRequest) -> Result<RenderedCubemap, SkyError> {
        let started = Instant::now();
        let params = SkyParameters::synthesize(request);
        let instances = SkyInstances::upload(&self.ctx.device, &params);
        let resolution = self.resolution_for(request.resolution).pixels();

        let mut faces: [RgbaImage; 6] = Default::default();
        for face in CubeFace::ALL {
            faces[face.index()] = self.renderer.render_face(
                &self.ctx,
                &self.geometry,
                &instances,
                face,
                resolution,
            )?;
        }

        log::info!(
            "Generated sky '{}' at {resolution}px: {} point-star passes, {} stars, {} nebulae, sun: {} ({:.0?})",
            request.seed,
            params.point_stars.len(),
            params.stars.len(),
            params.nebulae.len(),
            params.sun.is_some(),
            started.elapsed()
        );

        RenderedCubemap::from_faces(faces).ok_or(SkyError::FaceSize { expected: resolution })
    }

    fn resolution_for(&self, requested: Resolution) -> Resolution {
        let limit = self.ctx.max_texture_size();
        let resolution = requested.clamp_to(limit);
        if resolution != requested {
            log::warn!(
                "Resolution {} exceeds device limit {limit}, using {}",
                requested.pixels(),
                resolution.pixels()
            );
        }
        resolution
    }
}
