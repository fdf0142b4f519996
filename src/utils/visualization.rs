//! Visualization of detected regions.
//!
//! Draws each region as a hollow rectangle over a copy of the input. Heuristic
//! regions and OCR regions use different colors so the winning strategy is
//! visible at a glance.
//!
//! # Examples
//!
//! ```rust
//! use image::RgbaImage;
//! use textzone::domain::DetectedTextRegion;
//! use textzone::processors::TextRect;
//! use textzone::utils::visualization::{VisualizationConfig, draw_regions};
//!
//! let mut canvas = RgbaImage::new(64, 32);
//! let regions = [DetectedTextRegion::heuristic(TextRect::new(4, 4, 40, 12))];
//! draw_regions(&mut canvas, &regions, &VisualizationConfig::default());
//! ```

use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

use crate::core::errors::DetectResult;
use crate::domain::DetectedTextRegion;
use crate::processors::{Bitmap, TextRect};

const HEURISTIC_COLOR: Rgba<u8> = Rgba([255, 64, 0, 255]);

const OCR_COLOR: Rgba<u8> = Rgba([0, 200, 0, 255]);

/// Configuration for region overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationConfig {
    /// Thickness of the rectangle outline. Defaults to 2.
    pub thickness: i32,
    /// Color of regions without confidence (heuristic path).
    pub heuristic_color: Rgba<u8>,
    /// Color of regions with confidence (OCR path).
    pub ocr_color: Rgba<u8>,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            thickness: 2,
            heuristic_color: HEURISTIC_COLOR,
            ocr_color: OCR_COLOR,
        }
    }
}

/// Draws region outlines onto `image`, growing outwards by the configured
/// thickness. Outlines leaving the image are clipped.
pub fn draw_regions(
    image: &mut RgbaImage,
    regions: &[DetectedTextRegion],
    config: &VisualizationConfig,
) {
    for region in regions {
        let color = if region.confidence() > 0.0 {
            config.ocr_color
        } else {
            config.heuristic_color
        };
        for step in 0..config.thickness.max(1) {
            if let Some(rect) = to_rect(&region.bounds().inflate(step)) {
                draw_hollow_rect_mut(image, rect, color);
            }
        }
    }
}

/// Renders `bitmap` with region overlays and saves it to `path`.
pub fn save_visualization(
    bitmap: &Bitmap,
    regions: &[DetectedTextRegion],
    config: &VisualizationConfig,
    path: &Path,
) -> DetectResult<()> {
    let mut canvas = bitmap.view().to_rgba_image();
    draw_regions(&mut canvas, regions, config);
    canvas.save(path)?;
    debug!(path = %path.display(), regions = regions.len(), "visualization saved");
    Ok(())
}

fn to_rect(bounds: &TextRect) -> Option<Rect> {
    if bounds.is_empty() {
        return None;
    }
    Some(Rect::at(bounds.left(), bounds.top()).of_size(bounds.width as u32, bounds.height as u32))
}
