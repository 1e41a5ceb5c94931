//! The six rendered faces and their composed layouts.

use std::path::{Path, PathBuf};

use image::{RgbaImage, imageops};

use crate::error::SkyError;
use crate::face::CubeFace;

/// Six square face images of equal size, one per [`CubeFace`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedCubemap {
    resolution: u32,
    faces: [RgbaImage; 6],
}

/// Single-image arrangements of the six faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CubemapLayout {
    /// `4R x 3R` cross. Top above front, bottom below it, and left, front,
    /// right, back across the middle row. Cells outside the cross are transparent.
    #[default]
    Cross,
    /// `6R x R` strip in cube-texture layer order: right, left, top, bottom, back, front.
    Row,
}

impl CubemapLayout {
    /// Width and height of the composed image in face units.
    pub const fn cells(self) -> (u32, u32) {
        match self {
            CubemapLayout::Cross => (4, 3),
            CubemapLayout::Row => (6, 1),
        }
    }

    /// Grid cell (column, row) of each face.
    pub const fn placements(self) -> [(CubeFace, u32, u32); 6] {
        match self {
            CubemapLayout::Cross => [
                (CubeFace::Top, 1, 0),
                (CubeFace::Left, 0, 1),
                (CubeFace::Front, 1, 1),
                (CubeFace::Right, 2, 1),
                (CubeFace::Back, 3, 1),
                (CubeFace::Bottom, 1, 2),
            ],
            CubemapLayout::Row => [
                (CubeFace::Right, 0, 0),
                (CubeFace::Left, 1, 0),
                (CubeFace::Top, 2, 0),
                (CubeFace::Bottom, 3, 0),
                (CubeFace::Back, 4, 0),
                (CubeFace::Front, 5, 0),
            ],
        }
    }
}

impl RenderedCubemap {
    /// Assemble from images in [`CubeFace::ALL`] order.
    ///
    /// Returns `None` unless every image is square and all share one size.
    pub fn from_faces(faces: [RgbaImage; 6]) -> Option<Self> {
        let (resolution, height) = faces[0].dimensions();
        let uniform = faces
            .iter()
            .all(|f| f.dimensions() == (resolution, resolution));
        (resolution == height && uniform).then_some(Self { resolution, faces })
    }

    /// Side length of every face in pixels.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn face(&self, face: CubeFace) -> &RgbaImage {
        &self.faces[face.index()]
    }

    /// Faces in render order, keyed by face.
    pub fn iter(&self) -> impl Iterator<Item = (CubeFace, &RgbaImage)> {
        CubeFace::ALL.into_iter().zip(self.faces.iter())
    }

    /// Compose all faces into one image.
    pub fn compose(&self, layout: CubemapLayout) -> RgbaImage {
        let (cols, rows) = layout.cells();
        let r = self.resolution;
        let mut canvas = RgbaImage::new(cols * r, rows * r);
        for (face, col, row) in layout.placements() {
            imageops::replace(
                &mut canvas,
                self.face(face),
                i64::from(col * r),
                i64::from(row * r),
            );
        }
        canvas
    }

    /// Write `<face>.png` for every face into `dir`, creating it if needed.
    pub fn save_faces(&self, dir: &Path) -> Result<Vec<PathBuf>, SkyError> {
        std::fs::create_dir_all(dir).map_err(|source| SkyError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(6);
        for (face, image) in self.iter() {
            let path = dir.join(format!("{}.png", face.name()));
            save_png(image, &path)?;
            written.push(path);
        }
        log::info!("Wrote {} faces to {}", written.len(), dir.display());
        Ok(written)
    }

    /// Write the composed `layout` image to `path`.
    pub fn save_layout(&self, path: &Path, layout: CubemapLayout) -> Result<(), SkyError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| SkyError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        save_png(&self.compose(layout), path)?;
        log::info!("Wrote {layout:?} layout to {}", path.display());
        Ok(())
    }
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<(), SkyError> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| SkyError::Export {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Each face filled with a colour that encodes its index.
    fn labelled_cubemap(r: u32) -> RenderedCubemap {
        let faces =
            std::array::from_fn(|i| RgbaImage::from_pixel(r, r, Rgba([i as u8 * 40, 0, 0, 255])));
        RenderedCubemap::from_faces(faces).unwrap()
    }

    fn face_at(image: &RgbaImage, r: u32, col: u32, row: u32) -> Rgba<u8> {
        *image.get_pixel(col * r + r / 2, row * r + r / 2)
    }

    #[test]
    fn test_from_faces_rejects_mismatched_sizes() {
        let mut faces: [RgbaImage; 6] = std::array::from_fn(|_| RgbaImage::new(4, 4));
        faces[3] = RgbaImage::new(8, 8);
        assert!(RenderedCubemap::from_faces(faces).is_none());

        let rect: [RgbaImage; 6] = std::array::from_fn(|_| RgbaImage::new(4, 2));
        assert!(RenderedCubemap::from_faces(rect).is_none());
    }

    #[test]
    fn test_iter_yields_six_named_faces() {
        let cubemap = labelled_cubemap(4);
        let names: Vec<_> = cubemap.iter().map(|(f, _)| f.name()).collect();
        assert_eq!(names, ["front", "back", "left", "right", "top", "bottom"]);
        assert_eq!(cubemap.face(CubeFace::Left).get_pixel(0, 0).0[0], 80);
    }

    #[test]
    fn test_cross_layout_offsets() {
        let r = 8;
        let cross = labelled_cubemap(r).compose(CubemapLayout::Cross);
        assert_eq!(cross.dimensions(), (4 * r, 3 * r));

        let expect = |face: CubeFace| Rgba([face.index() as u8 * 40, 0, 0, 255]);
        assert_eq!(face_at(&cross, r, 1, 0), expect(CubeFace::Top));
        assert_eq!(face_at(&cross, r, 0, 1), expect(CubeFace::Left));
        assert_eq!(face_at(&cross, r, 1, 1), expect(CubeFace::Front));
        assert_eq!(face_at(&cross, r, 2, 1), expect(CubeFace::Right));
        assert_eq!(face_at(&cross, r, 3, 1), expect(CubeFace::Back));
        assert_eq!(face_at(&cross, r, 1, 2), expect(CubeFace::Bottom));
        // Corners of the cross stay transparent.
        assert_eq!(face_at(&cross, r, 0, 0).0[3], 0);
        assert_eq!(face_at(&cross, r, 3, 2).0[3], 0);
    }

    #[test]
    fn test_row_layout_order() {
        let r = 4;
        let row = labelled_cubemap(r).compose(CubemapLayout::Row);
        assert_eq!(row.dimensions(), (6 * r, r));
        let order: Vec<u8> = (0..6).map(|c| face_at(&row, r, c, 0).0[0] / 40).collect();
        let expected: Vec<u8> = [
            CubeFace::Right,
            CubeFace::Left,
            CubeFace::Top,
            CubeFace::Bottom,
            CubeFace::Back,
            CubeFace::Front,
        ]
        .iter()
        .map(|f| f.index() as u8)
        .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_every_layout_places_each_face_once() {
        for layout in [CubemapLayout::Cross, CubemapLayout::Row] {
            let mut seen: Vec<_> = layout.placements().iter().map(|p| p.0.index()).collect();
            seen.sort_unstable();
            assert_eq!(seen, [0, 1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn test_save_faces_writes_six_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sky");
        let written = labelled_cubemap(4).save_faces(&out).unwrap();
        assert_eq!(written.len(), 6);
        for face in CubeFace::ALL {
            let path = out.join(format!("{}.png", face.name()));
            let loaded = image::open(&path).unwrap().to_rgba8();
            assert_eq!(loaded.dimensions(), (4, 4));
        }
    }

    #[test]
    fn test_save_layout_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cross.png");
        let cubemap = labelled_cubemap(4);
        cubemap.save_layout(&path, CubemapLayout::Cross).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, cubemap.compose(CubemapLayout::Cross));
    }
}
