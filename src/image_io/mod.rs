//! Image loading, JPEG output and output file naming

use crate::types::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Decode any supported raster format
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let mut reader = ImageReader::open(path)?
        .with_guessed_format()
        .map_err(Error::Io)?;
    reader.no_limits();
    reader.decode().map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode an image and normalise it to 8-bit RGB
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    Ok(load_image(path)?.to_rgb8())
}

/// Encode `image` as JPEG at `quality` (clamped to 1..=100) and write it
///
/// The file is only touched once encoding has succeeded.
pub fn save_jpeg(path: &Path, image: &RgbImage, quality: u8) -> Result<()> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    image.write_with_encoder(encoder)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn file_stem(input: &Path) -> Result<&str> {
    input.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Invalid input filename",
        ))
    })
}

/// `{stem}_enhanced.jpg` next to the input
pub fn enhanced_output_path(input: &Path) -> Result<PathBuf> {
    let stem = file_stem(input)?;
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(format!("{}_enhanced.jpg", stem)))
}

/// `{stem}_restored_{profile}.jpg` next to the input
pub fn restored_output_path(input: &Path, profile: &str) -> Result<PathBuf> {
    let stem = file_stem(input)?;
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(format!("{}_restored_{}.jpg", stem, profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_enhanced_output_path() {
        let output = enhanced_output_path(Path::new("/tmp/slide_042.tif")).unwrap();
        assert_eq!(output, Path::new("/tmp/slide_042_enhanced.jpg"));
    }

    #[test]
    fn test_restored_output_path() {
        let output = restored_output_path(Path::new("/scans/a.png"), "red_cast").unwrap();
        assert_eq!(output, Path::new("/scans/a_restored_red_cast.jpg"));
    }

    #[test]
    fn test_save_and_load_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.jpg");
        let image = RgbImage::from_pixel(16, 16, Rgb([120, 80, 40]));

        save_jpeg(&path, &image, 95).unwrap();
        let loaded = load_rgb(&path).unwrap();
        assert_eq!(loaded.dimensions(), (16, 16));
        let p = loaded.get_pixel(8, 8);
        assert!((p[0] as i32 - 120).abs() <= 4);
        assert!((p[2] as i32 - 40).abs() <= 4);
    }

    #[test]
    fn test_load_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not an image").unwrap();
        assert!(matches!(load_image(&path), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            load_image(Path::new("/nonexistent/picture.jpg")),
            Err(Error::Io(_))
        ));
    }
}
