//! Per-pixel edge candidate test.
//!
//! A pixel is an edge candidate when the luminance contrast to its horizontal
//! or vertical neighbours is strong on at least one axis. Glyph strokes give a
//! strong single-axis response; requiring some signal on an axis once the
//! strong one is borderline keeps isolated dithering out.

use crate::core::config::HeuristicParams;
use crate::processors::raster::{PixelGrid, RasterView};

/// Classifies pixels of one raster as edge candidates.
#[derive(Debug, Clone, Copy)]
pub struct EdgeClassifier<'a> {
    raster: RasterView<'a>,
    threshold: u8,
    secondary_threshold: u8,
    min_alpha: u8,
}

impl<'a> EdgeClassifier<'a> {
    /// Creates a classifier using the thresholds of `params`.
    pub fn new(raster: RasterView<'a>, params: &HeuristicParams) -> Self {
        Self {
            raster,
            threshold: params.edge_threshold,
            secondary_threshold: params.edge_secondary_threshold,
            min_alpha: params.min_alpha,
        }
    }

    /// Returns true if the pixel at `x, y` is an edge candidate.
    ///
    /// Transparent pixels and coordinates outside the raster never are.
    pub fn is_edge_candidate(&self, x: i32, y: i32) -> bool {
        let Some(center) = self.raster.luminance(x, y, self.min_alpha) else {
            return false;
        };

        let horizontal = self.axis_contrast(center, (x - 1, y), (x + 1, y));
        let vertical = self.axis_contrast(center, (x, y - 1), (x, y + 1));

        horizontal.max(vertical) >= self.threshold
            && !(horizontal < self.secondary_threshold && vertical < self.secondary_threshold)
    }

    /// Evaluates every pixel once.
    pub fn candidate_grid(&self) -> PixelGrid<bool> {
        let (width, height) = (self.raster.width(), self.raster.height());
        let mut grid = PixelGrid::new(width, height, false);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if self.is_edge_candidate(x, y) {
                    grid.set(x, y, true);
                }
            }
        }
        grid
    }

    /// Largest absolute difference to the two neighbours of one axis.
    /// Missing or transparent neighbours contribute nothing.
    fn axis_contrast(&self, center: u8, before: (i32, i32), after: (i32, i32)) -> u8 {
        [before, after]
            .into_iter()
            .filter_map(|(nx, ny)| self.raster.luminance(nx, ny, self.min_alpha))
            .map(|neighbour| center.abs_diff(neighbour))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::raster::{Bitmap, pack_argb};
    use crate::processors::TextRect;

    fn gray(level: u8) -> u32 {
        pack_argb(255, level, level, level)
    }

    #[test]
    fn test_uniform_image_has_no_candidates() {
        let bitmap = Bitmap::solid(20, 10, gray(128));
        let classifier = EdgeClassifier::new(bitmap.view(), &HeuristicParams::default());
        let grid = classifier.candidate_grid();
        assert_eq!(grid.count_in(&TextRect::new(0, 0, 20, 10)), 0);
    }

    #[test]
    fn test_step_edge_marks_both_sides() {
        let mut bitmap = Bitmap::solid(10, 5, gray(255));
        bitmap.fill_rect(TextRect::new(5, 0, 5, 5), gray(0));
        let classifier = EdgeClassifier::new(bitmap.view(), &HeuristicParams::default());
        assert!(classifier.is_edge_candidate(4, 2));
        assert!(classifier.is_edge_candidate(5, 2));
        assert!(!classifier.is_edge_candidate(3, 2));
        assert!(!classifier.is_edge_candidate(6, 2));
    }

    #[test]
    fn test_weak_contrast_is_ignored() {
        let mut bitmap = Bitmap::solid(10, 5, gray(120));
        bitmap.fill_rect(TextRect::new(5, 0, 5, 5), gray(160));
        let classifier = EdgeClassifier::new(bitmap.view(), &HeuristicParams::default());
        assert!(!classifier.is_edge_candidate(4, 2));
        assert!(!classifier.is_edge_candidate(5, 2));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut bitmap = Bitmap::solid(3, 1, gray(100));
        bitmap.set_pixel(1, 0, gray(152));
        let classifier = EdgeClassifier::new(bitmap.view(), &HeuristicParams::default());
        assert!(classifier.is_edge_candidate(1, 0));
    }

    #[test]
    fn test_transparent_pixels_are_background() {
        let mut bitmap = Bitmap::solid(3, 3, gray(255));
        bitmap.set_pixel(1, 1, pack_argb(0, 0, 0, 0));
        let classifier = EdgeClassifier::new(bitmap.view(), &HeuristicParams::default());
        assert!(!classifier.is_edge_candidate(1, 1));
        // A transparent neighbour does not create contrast either.
        assert!(!classifier.is_edge_candidate(0, 1));
    }

    #[test]
    fn test_secondary_threshold_can_veto() {
        let params = HeuristicParams {
            edge_threshold: 20,
            edge_secondary_threshold: 30,
            ..HeuristicParams::default()
        };
        let mut bitmap = Bitmap::solid(3, 1, gray(100));
        bitmap.set_pixel(1, 0, gray(125));
        let classifier = EdgeClassifier::new(bitmap.view(), &params);
        assert!(!classifier.is_edge_candidate(1, 0));
    }
}
