//! Utility functions for loading images as bitmaps.
//!
//! The detector works on [`Bitmap`]s. These helpers decode files with the
//! `image` crate and convert them, alone or in batches.

use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::{DetectError, DetectResult};
use crate::processors::Bitmap;

/// Converts a DynamicImage to an RgbaImage.
pub fn dynamic_to_rgba(img: DynamicImage) -> RgbaImage {
    img.to_rgba8()
}

/// Loads an image file as RGBA.
///
/// # Errors
///
/// Returns [`DetectError::ImageLoad`] if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> DetectResult<RgbaImage> {
    let img = image::open(path).map_err(DetectError::ImageLoad)?;
    Ok(dynamic_to_rgba(img))
}

/// Loads an image file as a [`Bitmap`].
pub fn load_bitmap(path: &Path) -> DetectResult<Bitmap> {
    let img = image::open(path).map_err(DetectError::ImageLoad)?;
    Ok(Bitmap::from_dynamic_image(&img))
}

/// Decodes an in-memory encoded image (PNG, JPEG, ...) as a [`Bitmap`].
pub fn decode_bitmap(bytes: &[u8]) -> DetectResult<Bitmap> {
    let img = image::load_from_memory(bytes).map_err(DetectError::ImageLoad)?;
    Ok(Bitmap::from_dynamic_image(&img))
}

/// Loads a batch of bitmaps, in parallel above the default threshold.
pub fn load_bitmaps<P: AsRef<Path> + Send + Sync>(paths: &[P]) -> DetectResult<Vec<Bitmap>> {
    load_bitmaps_with_threshold(paths, None)
}

/// Loads a batch of bitmaps with a custom parallel threshold.
///
/// Batches with more than `parallel_threshold` paths (default
/// [`DEFAULT_PARALLEL_THRESHOLD`]) are decoded on rayon. The first failure is
/// returned.
pub fn load_bitmaps_with_threshold<P: AsRef<Path> + Send + Sync>(
    paths: &[P],
    parallel_threshold: Option<usize>,
) -> DetectResult<Vec<Bitmap>> {
    let threshold = parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD);

    if paths.len() > threshold {
        use rayon::prelude::*;
        paths.par_iter().map(|p| load_bitmap(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_bitmap(p.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_png(dir: &Path, name: &str, pixel: Rgba<u8>) -> std::path::PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(3, 2, pixel).save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_bitmap_converts_to_argb() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "red.png", Rgba([255, 0, 0, 255]));
        let bitmap = load_bitmap(&path).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert_eq!(bitmap.view().get(2, 1), Some(0xFFFF_0000));
    }

    #[test]
    fn test_missing_file_is_image_load_error() {
        let result = load_bitmap(Path::new("/nonexistent/textzone.png"));
        assert!(matches!(result, Err(DetectError::ImageLoad(_))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_bitmap(b"not an image").is_err());
    }

    #[test]
    fn test_batch_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = (0..6u8)
            .map(|i| write_png(dir.path(), &format!("{i}.png"), Rgba([i, i, i, 255])))
            .collect();

        for threshold in [Some(0), Some(100)] {
            let bitmaps = load_bitmaps_with_threshold(&paths, threshold).unwrap();
            let blues: Vec<Option<u32>> = bitmaps
                .iter()
                .map(|bitmap| bitmap.view().get(0, 0).map(|argb| argb & 0xFF))
                .collect();
            assert_eq!(blues, (0..6u32).map(Some).collect::<Vec<_>>());
        }
    }
}
