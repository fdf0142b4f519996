//! Preprocessing variants fed to the OCR engine.
//!
//! Each variant is a differently rendered copy of the same bitmap. Text that
//! is light on dark, or that only contrasts on one color channel, is often
//! missed on the original but recovered on one of the other copies.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::core::errors::{DetectError, DetectResult};
use crate::processors::raster::{RasterView, alpha, luminance};

/// One rendering of the input handed to the OCR engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreprocessVariant {
    /// The bitmap as RGB.
    Original,
    /// Inverted grayscale luminance.
    Inverted,
    /// The red channel as grayscale.
    Red,
    /// The green channel as grayscale.
    Green,
    /// The blue channel as grayscale.
    Blue,
}

impl PreprocessVariant {
    /// Every variant, in the order they are tried.
    pub const ALL: [PreprocessVariant; 5] = [
        PreprocessVariant::Original,
        PreprocessVariant::Inverted,
        PreprocessVariant::Red,
        PreprocessVariant::Green,
        PreprocessVariant::Blue,
    ];

    /// Renders the variant. Transparent pixels are composited over white.
    pub fn render(&self, view: RasterView<'_>) -> DynamicImage {
        let (width, height) = (view.width(), view.height());
        let opaque = |x: u32, y: u32| over_white(view.get(x as i32, y as i32).unwrap_or(0));

        match self {
            PreprocessVariant::Original => {
                DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
                    let argb = opaque(x, y);
                    Rgb([(argb >> 16) as u8, (argb >> 8) as u8, argb as u8])
                }))
            }
            PreprocessVariant::Inverted => {
                gray(width, height, |x, y| 255 - luminance(opaque(x, y)))
            }
            PreprocessVariant::Red => gray(width, height, |x, y| (opaque(x, y) >> 16) as u8),
            PreprocessVariant::Green => gray(width, height, |x, y| (opaque(x, y) >> 8) as u8),
            PreprocessVariant::Blue => gray(width, height, |x, y| opaque(x, y) as u8),
        }
    }

    /// Renders the variant and encodes it as PNG.
    pub fn encode_png(&self, view: RasterView<'_>) -> DetectResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.render(view)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| DetectError::encode(&format!("{self:?} variant"), e))?;
        Ok(buffer)
    }
}

impl std::fmt::Display for PreprocessVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PreprocessVariant::Original => "original",
            PreprocessVariant::Inverted => "inverted",
            PreprocessVariant::Red => "red",
            PreprocessVariant::Green => "green",
            PreprocessVariant::Blue => "blue",
        };
        f.write_str(name)
    }
}

fn gray(width: u32, height: u32, level: impl Fn(u32, u32) -> u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| Luma([level(x, y)])))
}

/// Blends a pixel over an opaque white background.
fn over_white(argb: u32) -> u32 {
    let a = alpha(argb) as u32;
    let blend = |channel: u32| (channel * a + 255 * (255 - a) + 127) / 255;
    let r = blend((argb >> 16) & 0xFF);
    let g = blend((argb >> 8) & 0xFF);
    let b = blend(argb & 0xFF);
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::raster::{Bitmap, pack_argb};

    #[test]
    fn test_transparent_pixels_become_white() {
        assert_eq!(over_white(0x0000_0000), 0xFFFF_FFFF);
        assert_eq!(over_white(pack_argb(255, 10, 20, 30)), pack_argb(255, 10, 20, 30));
    }

    #[test]
    fn test_channel_variants() {
        let bitmap = Bitmap::solid(2, 2, pack_argb(255, 200, 100, 50));
        let view = bitmap.view();

        let red = PreprocessVariant::Red.render(view).to_luma8();
        assert_eq!(red.get_pixel(0, 0), &Luma([200]));
        let blue = PreprocessVariant::Blue.render(view).to_luma8();
        assert_eq!(blue.get_pixel(1, 1), &Luma([50]));

        let inverted = PreprocessVariant::Inverted.render(view).to_luma8();
        let expected = 255 - luminance(pack_argb(255, 200, 100, 50));
        assert_eq!(inverted.get_pixel(0, 1), &Luma([expected]));

        let original = PreprocessVariant::Original.render(view).to_rgb8();
        assert_eq!(original.get_pixel(1, 0), &Rgb([200, 100, 50]));
    }

    #[test]
    fn test_encode_png_round_trips() {
        let bitmap = Bitmap::solid(8, 4, pack_argb(255, 0, 0, 0));
        let png = PreprocessVariant::Green.encode_png(bitmap.view()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }
}
