//! Raster access layer.
//!
//! [`Bitmap`] owns a packed 32-bit ARGB buffer with an arbitrary row stride,
//! [`RasterView`] borrows one for read access, and [`PixelGrid`] is the
//! per-pixel scratch grid (edge masks, visited maps) used by the heuristic
//! path. All three go through a single `y * stride + x` computation so call
//! sites never index flat buffers directly.

use image::{DynamicImage, Rgba, RgbaImage};

use crate::core::errors::{DetectError, DetectResult};
use crate::processors::TextRect;

/// Broadcast luma with integer weights: `(299 R + 587 G + 114 B) / 1000`.
#[inline]
pub fn luminance(argb: u32) -> u8 {
    let r = (argb >> 16) & 0xFF;
    let g = (argb >> 8) & 0xFF;
    let b = argb & 0xFF;
    ((299 * r + 587 * g + 114 * b) / 1000) as u8
}

/// Alpha channel of a packed ARGB pixel.
#[inline]
pub fn alpha(argb: u32) -> u8 {
    (argb >> 24) as u8
}

/// Packs channels into one ARGB word.
#[inline]
pub const fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// An owned ARGB bitmap, row-major, with `stride >= width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    stride: usize,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// Wraps an existing ARGB buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::InvalidInput`] if `stride < width` and
    /// [`DetectError::BufferTooSmall`] if the buffer cannot hold the last row.
    pub fn from_argb(
        width: u32,
        height: u32,
        stride: usize,
        pixels: Vec<u32>,
    ) -> DetectResult<Self> {
        if stride < width as usize {
            return Err(DetectError::invalid_input(format!(
                "stride {stride} is smaller than width {width}"
            )));
        }
        let expected = required_len(width, height, stride);
        if pixels.len() < expected {
            return Err(DetectError::BufferTooSmall {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            pixels,
        })
    }

    /// A bitmap filled with a single color.
    pub fn solid(width: u32, height: u32, argb: u32) -> Self {
        Self {
            width,
            height,
            stride: width as usize,
            pixels: vec![argb; width as usize * height as usize],
        }
    }

    /// Converts an RGBA image.
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let pixels = image
            .pixels()
            .map(|Rgba([r, g, b, a])| pack_argb(*a, *r, *g, *b))
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            stride: image.width() as usize,
            pixels,
        }
    }

    /// Converts any decoded image.
    pub fn from_dynamic_image(image: &DynamicImage) -> Self {
        Self::from_rgba_image(&image.to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Borrowed read-only view.
    pub fn view(&self) -> RasterView<'_> {
        RasterView {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Writes one pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, argb: u32) {
        if let Some(index) = index_of(x, y, self.width, self.height, self.stride) {
            self.pixels[index] = argb;
        }
    }

    /// Fills the part of `rect` that lies inside the bitmap.
    pub fn fill_rect(&mut self, rect: TextRect, argb: u32) {
        let rect = rect.clamp_to(self.width, self.height);
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                self.set_pixel(x, y, argb);
            }
        }
    }
}

/// Read-only view over an ARGB buffer.
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    pixels: &'a [u32],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> RasterView<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed ARGB value, or `None` outside the image.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        index_of(x, y, self.width, self.height, self.stride).map(|index| self.pixels[index])
    }

    /// Luminance of an opaque-enough pixel.
    ///
    /// Returns `None` outside the image and for pixels whose alpha is below
    /// `min_alpha`, which count as background.
    #[inline]
    pub fn luminance(&self, x: i32, y: i32, min_alpha: u8) -> Option<u8> {
        self.get(x, y)
            .filter(|&argb| alpha(argb) >= min_alpha)
            .map(luminance)
    }

    /// Copies the view into an RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let argb = self.get(x as i32, y as i32).unwrap_or(0);
            Rgba([
                (argb >> 16) as u8,
                (argb >> 8) as u8,
                argb as u8,
                alpha(argb),
            ])
        })
    }
}

/// A dense per-pixel grid with bounds-checked access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Copy> PixelGrid<T> {
    /// Creates a grid with every cell set to `fill`.
    pub fn new(width: u32, height: u32, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell value, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        index_of(x, y, self.width, self.height, self.width as usize).map(|index| self.cells[index])
    }

    /// Sets a cell; returns false if the coordinate is outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match index_of(x, y, self.width, self.height, self.width as usize) {
            Some(index) => {
                self.cells[index] = value;
                true
            }
            None => false,
        }
    }
}

/// Edge mask: `true` marks pixels of kept connected components.
pub type EdgeMask = PixelGrid<bool>;

impl PixelGrid<bool> {
    /// Marked pixels of row `y` within `x0..x1`.
    pub fn count_row(&self, y: i32, x0: i32, x1: i32) -> usize {
        (x0..x1).filter(|&x| self.get(x, y) == Some(true)).count()
    }

    /// Marked pixels of column `x` within `y0..y1`.
    pub fn count_column(&self, x: i32, y0: i32, y1: i32) -> usize {
        (y0..y1).filter(|&y| self.get(x, y) == Some(true)).count()
    }

    /// Marked pixels inside `rect`.
    pub fn count_in(&self, rect: &TextRect) -> usize {
        (rect.top()..rect.bottom())
            .map(|y| self.count_row(y, rect.left(), rect.right()))
            .sum()
    }

    /// Columns of `rect` holding at least one marked pixel.
    pub fn filled_columns(&self, rect: &TextRect) -> usize {
        (rect.left()..rect.right())
            .filter(|&x| (rect.top()..rect.bottom()).any(|y| self.get(x, y) == Some(true)))
            .count()
    }
}

#[inline]
fn index_of(x: i32, y: i32, width: u32, height: u32, stride: usize) -> Option<usize> {
    if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
        return None;
    }
    Some(y as usize * stride + x as usize)
}

fn required_len(width: u32, height: u32, stride: usize) -> usize {
    if width == 0 || height == 0 {
        0
    } else {
        (height as usize - 1) * stride + width as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: u32 = 0xFFFF_FFFF;

    #[test]
    fn test_luminance_weights() {
        assert_eq!(luminance(0xFF00_0000), 0);
        assert_eq!(luminance(WHITE), 255);
        assert_eq!(luminance(0xFFFF_0000), 76);
        assert_eq!(luminance(0xFF00_FF00), 149);
        assert_eq!(luminance(0xFF00_00FF), 29);
    }

    #[test]
    fn test_from_argb_respects_stride() {
        // 2x2 image stored with a stride of 3; the padding column is never read.
        let pixels = vec![1, 2, 99, 3, 4];
        let bitmap = Bitmap::from_argb(2, 2, 3, pixels).unwrap();
        let view = bitmap.view();
        assert_eq!(view.get(1, 0), Some(2));
        assert_eq!(view.get(0, 1), Some(3));
        assert_eq!(view.get(1, 1), Some(4));
        assert_eq!(view.get(2, 1), None);
    }

    #[test]
    fn test_from_argb_rejects_bad_geometry() {
        assert!(matches!(
            Bitmap::from_argb(4, 1, 3, vec![0; 4]),
            Err(DetectError::InvalidInput { .. })
        ));
        assert!(matches!(
            Bitmap::from_argb(4, 2, 4, vec![0; 7]),
            Err(DetectError::BufferTooSmall {
                expected: 8,
                actual: 7
            })
        ));
        assert!(Bitmap::from_argb(0, 0, 0, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_transparent_pixels_have_no_luminance() {
        let mut bitmap = Bitmap::solid(3, 3, WHITE);
        bitmap.set_pixel(1, 1, 0x0A00_0000);
        let view = bitmap.view();
        assert_eq!(view.luminance(0, 0, 16), Some(255));
        assert_eq!(view.luminance(1, 1, 16), None);
        assert_eq!(view.luminance(-1, 0, 16), None);
    }

    #[test]
    fn test_rgba_round_trip_preserves_channels() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(1, 0, Rgba([10, 20, 30, 40]));
        let bitmap = Bitmap::from_rgba_image(&image);
        assert_eq!(bitmap.view().get(1, 0), Some(pack_argb(40, 10, 20, 30)));
        assert_eq!(bitmap.view().to_rgba_image(), image);
    }

    #[test]
    fn test_edge_mask_counts() {
        let mut mask = EdgeMask::new(5, 4, false);
        assert!(mask.set(1, 1, true));
        assert!(mask.set(3, 1, true));
        assert!(mask.set(3, 2, true));
        assert!(!mask.set(5, 0, true));
        assert_eq!(mask.count_row(1, 0, 5), 2);
        assert_eq!(mask.count_column(3, 0, 4), 2);
        assert_eq!(mask.count_in(&TextRect::new(0, 0, 5, 4)), 3);
        assert_eq!(mask.filled_columns(&TextRect::new(0, 0, 5, 4)), 2);
    }
}
