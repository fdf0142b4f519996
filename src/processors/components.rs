//! Connected-component extraction over edge candidates.
//!
//! Components are grown with an explicit stack over 4-neighbours. Only kept
//! components leave a trace in the resulting [`EdgeMask`]; noise and run-away
//! components are rejected without marking anything.

use tracing::debug;

use crate::core::config::HeuristicParams;
use crate::processors::TextRect;
use crate::processors::raster::{EdgeMask, PixelGrid};

/// Why a flood fill did not produce a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The seed is not an unvisited edge candidate.
    NotASeed,
    /// Fewer pixels than the noise floor.
    TooSmall,
    /// More pixels than the run-away cap; almost always background texture.
    RunAway,
    /// The bounds vanished after clamping.
    Degenerate,
}

/// Result of growing one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodOutcome {
    /// Inflated and clamped bounds of a kept component.
    Accepted(TextRect),
    /// The component was discarded.
    Rejected(RejectReason),
}

/// Grows connected components over a candidate grid.
#[derive(Debug)]
pub struct ComponentExtractor<'a> {
    candidates: &'a PixelGrid<bool>,
    visited: PixelGrid<bool>,
    edge_mask: EdgeMask,
    min_pixels: usize,
    max_pixels: usize,
    inflate: i32,
}

impl<'a> ComponentExtractor<'a> {
    /// Creates an extractor for a candidate grid.
    pub fn new(candidates: &'a PixelGrid<bool>, params: &HeuristicParams) -> Self {
        let (width, height) = (candidates.width(), candidates.height());
        Self {
            candidates,
            visited: PixelGrid::new(width, height, false),
            edge_mask: EdgeMask::new(width, height, false),
            min_pixels: params.min_component_pixels,
            max_pixels: params.max_component_pixels(width, height),
            inflate: params.component_inflate,
        }
    }

    /// Grows the component containing `seed_x, seed_y`.
    ///
    /// Every pixel reached is marked visited, even for rejected components,
    /// so a later scan never re-seeds into the same component.
    pub fn extract_from(&mut self, seed_x: i32, seed_y: i32) -> FloodOutcome {
        if !self.is_open(seed_x, seed_y) {
            return FloodOutcome::Rejected(RejectReason::NotASeed);
        }

        let mut stack = vec![(seed_x, seed_y)];
        self.visited.set(seed_x, seed_y, true);
        let mut collected: Vec<(i32, i32)> = Vec::new();
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (seed_x, seed_y, seed_x, seed_y);

        while let Some((x, y)) = stack.pop() {
            collected.push((x, y));
            if collected.len() > self.max_pixels {
                self.drain(stack);
                return FloodOutcome::Rejected(RejectReason::RunAway);
            }

            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            for (nx, ny) in neighbours(x, y) {
                if self.is_open(nx, ny) {
                    self.visited.set(nx, ny, true);
                    stack.push((nx, ny));
                }
            }
        }

        if collected.len() < self.min_pixels {
            return FloodOutcome::Rejected(RejectReason::TooSmall);
        }

        let bounds = TextRect::from_inclusive(min_x, min_y, max_x, max_y)
            .inflate(self.inflate)
            .clamp_to(self.candidates.width(), self.candidates.height());
        if bounds.is_empty() {
            return FloodOutcome::Rejected(RejectReason::Degenerate);
        }

        for (x, y) in collected {
            self.edge_mask.set(x, y, true);
        }
        FloodOutcome::Accepted(bounds)
    }

    /// Scans the grid row by row and returns all kept component bounds
    /// together with the edge mask of the kept pixels.
    pub fn extract_all(mut self) -> (Vec<TextRect>, EdgeMask) {
        let (width, height) = (self.candidates.width() as i32, self.candidates.height() as i32);
        let mut components = Vec::new();
        let (mut too_small, mut run_away) = (0usize, 0usize);

        for y in 0..height {
            for x in 0..width {
                match self.extract_from(x, y) {
                    FloodOutcome::Accepted(bounds) => components.push(bounds),
                    FloodOutcome::Rejected(RejectReason::TooSmall) => too_small += 1,
                    FloodOutcome::Rejected(RejectReason::RunAway) => run_away += 1,
                    FloodOutcome::Rejected(_) => {}
                }
            }
        }

        debug!(
            kept = components.len(),
            too_small, run_away, "connected components extracted"
        );
        (components, self.edge_mask)
    }

    /// Edge mask of the components kept so far.
    pub fn edge_mask(&self) -> &EdgeMask {
        &self.edge_mask
    }

    fn is_open(&self, x: i32, y: i32) -> bool {
        self.candidates.get(x, y) == Some(true) && self.visited.get(x, y) == Some(false)
    }

    /// Marks the rest of an aborted component visited without recording it.
    fn drain(&mut self, mut stack: Vec<(i32, i32)>) {
        while let Some((x, y)) = stack.pop() {
            for (nx, ny) in neighbours(x, y) {
                if self.is_open(nx, ny) {
                    self.visited.set(nx, ny, true);
                    stack.push((nx, ny));
                }
            }
        }
    }
}

#[inline]
fn neighbours(x: i32, y: i32) -> [(i32, i32); 4] {
    [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(width: u32, height: u32, rects: &[TextRect]) -> PixelGrid<bool> {
        let mut grid = PixelGrid::new(width, height, false);
        for rect in rects {
            for y in rect.top()..rect.bottom() {
                for x in rect.left()..rect.right() {
                    grid.set(x, y, true);
                }
            }
        }
        grid
    }

    #[test]
    fn test_component_is_inflated_and_marked() {
        let grid = grid_with(100, 100, &[TextRect::new(20, 30, 10, 4)]);
        let mut extractor = ComponentExtractor::new(&grid, &HeuristicParams::default());
        let outcome = extractor.extract_from(20, 30);
        assert_eq!(
            outcome,
            FloodOutcome::Accepted(TextRect::new(18, 28, 14, 8))
        );
        assert_eq!(
            extractor.edge_mask().count_in(&TextRect::new(0, 0, 100, 100)),
            40
        );
        // Already visited.
        assert_eq!(
            extractor.extract_from(21, 31),
            FloodOutcome::Rejected(RejectReason::NotASeed)
        );
    }

    #[test]
    fn test_small_component_is_noise() {
        let grid = grid_with(50, 50, &[TextRect::new(10, 10, 5, 5)]);
        let mut extractor = ComponentExtractor::new(&grid, &HeuristicParams::default());
        assert_eq!(
            extractor.extract_from(10, 10),
            FloodOutcome::Rejected(RejectReason::TooSmall)
        );
        assert_eq!(extractor.edge_mask().count_in(&TextRect::new(0, 0, 50, 50)), 0);
    }

    #[test]
    fn test_run_away_component_is_rejected_once() {
        // 40 x 40 = 1600 pixels against a cap of max(32, 100*100/12) = 833.
        let grid = grid_with(100, 100, &[TextRect::new(0, 0, 40, 40)]);
        let extractor = ComponentExtractor::new(&grid, &HeuristicParams::default());
        let (components, mask) = extractor.extract_all();
        assert!(components.is_empty());
        assert_eq!(mask.count_in(&TextRect::new(0, 0, 100, 100)), 0);
    }

    #[test]
    fn test_bounds_are_clamped_at_border() {
        let grid = grid_with(40, 40, &[TextRect::new(0, 0, 8, 5)]);
        let extractor = ComponentExtractor::new(&grid, &HeuristicParams::default());
        let (components, _) = extractor.extract_all();
        assert_eq!(components, vec![TextRect::new(0, 0, 10, 7)]);
    }

    #[test]
    fn test_diagonal_pixels_are_separate_components() {
        let mut grid = PixelGrid::new(10, 10, false);
        grid.set(2, 2, true);
        grid.set(3, 3, true);
        let params = HeuristicParams {
            min_component_pixels: 1,
            ..HeuristicParams::default()
        };
        let (components, _) = ComponentExtractor::new(&grid, &params).extract_all();
        assert_eq!(components.len(), 2);
    }
}
