//! Writing a generated cubemap to disk in the configured layout.

use std::path::PathBuf;

use space3d_config::{ExportConfig, ExportLayout};
use space3d_sky::{CubemapLayout, RenderedCubemap, SkyError};

/// File name of the composed image inside the output directory.
pub const UNIFIED_FILE_NAME: &str = "skybox.png";

/// Write `cubemap` according to `export`, returning every file written.
///
/// With [`ExportLayout::Faces`], `unified` also writes the cross composite
/// next to the six face images.
pub fn export_cubemap(
    cubemap: &RenderedCubemap,
    export: &ExportConfig,
    unified: bool,
) -> Result<Vec<PathBuf>, SkyError> {
    let dir = &export.output_dir;
    match export.layout {
        ExportLayout::Faces => {
            let mut written = cubemap.save_faces(dir)?;
            if unified {
                let path = dir.join(UNIFIED_FILE_NAME);
                cubemap.save_layout(&path, CubemapLayout::Cross)?;
                written.push(path);
            }
            Ok(written)
        }
        ExportLayout::Cross => {
            let path = dir.join(UNIFIED_FILE_NAME);
            cubemap.save_layout(&path, CubemapLayout::Cross)?;
            Ok(vec![path])
        }
        ExportLayout::Row => {
            let path = dir.join(UNIFIED_FILE_NAME);
            cubemap.save_layout(&path, CubemapLayout::Row)?;
            Ok(vec![path])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn cubemap() -> RenderedCubemap {
        let faces =
            std::array::from_fn(|i| RgbaImage::from_pixel(4, 4, Rgba([i as u8, 0, 0, 255])));
        RenderedCubemap::from_faces(faces).unwrap()
    }

    fn export_to(dir: &std::path::Path, layout: ExportLayout) -> ExportConfig {
        ExportConfig {
            output_dir: dir.to_path_buf(),
            layout,
        }
    }

    #[test]
    fn test_faces_layout_with_unified_texture() {
        let dir = tempfile::tempdir().unwrap();
        let written =
            export_cubemap(&cubemap(), &export_to(dir.path(), ExportLayout::Faces), true).unwrap();
        assert_eq!(written.len(), 7);
        assert!(dir.path().join("front.png").exists());
        assert!(dir.path().join(UNIFIED_FILE_NAME).exists());
    }

    #[test]
    fn test_faces_layout_without_unified_texture() {
        let dir = tempfile::tempdir().unwrap();
        let written =
            export_cubemap(&cubemap(), &export_to(dir.path(), ExportLayout::Faces), false)
                .unwrap();
        assert_eq!(written.len(), 6);
        assert!(!dir.path().join(UNIFIED_FILE_NAME).exists());
    }

    #[test]
    fn test_row_layout_writes_strip() {
        let dir = tempfile::tempdir().unwrap();
        let written =
            export_cubemap(&cubemap(), &export_to(dir.path(), ExportLayout::Row), true).unwrap();
        assert_eq!(written.len(), 1);
        let strip = image::open(&written[0]).unwrap();
        assert_eq!((strip.width(), strip.height()), (24, 4));
    }

    #[test]
    fn test_cross_layout_writes_cross() {
        let dir = tempfile::tempdir().unwrap();
        let written =
            export_cubemap(&cubemap(), &export_to(dir.path(), ExportLayout::Cross), false)
                .unwrap();
        let cross = image::open(&written[0]).unwrap();
        assert_eq!((cross.width(), cross.height()), (16, 12));
    }
}
