//! Pixel-heuristic detection path.
//!
//! Edge candidates are grown into connected components, whose bounds are
//! merged, refined and filtered into text-line rectangles. The path needs no
//! external collaborator and is fully deterministic.

use tracing::debug;

use crate::core::config::HeuristicParams;
use crate::domain::DetectedTextRegion;
use crate::processors::{ComponentExtractor, EdgeClassifier, RasterView, RectangleRefiner};

/// Runs the heuristic path against one raster.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicDetector<'a> {
    params: &'a HeuristicParams,
}

impl<'a> HeuristicDetector<'a> {
    pub fn new(params: &'a HeuristicParams) -> Self {
        Self { params }
    }

    /// Returns the text-line regions of `raster`, each with confidence `0.0`.
    ///
    /// An empty raster yields an empty list.
    pub fn detect(&self, raster: RasterView<'_>) -> Vec<DetectedTextRegion> {
        if raster.width() == 0 || raster.height() == 0 {
            return Vec::new();
        }

        let candidates = EdgeClassifier::new(raster, self.params).candidate_grid();
        let (components, edge_mask) =
            ComponentExtractor::new(&candidates, self.params).extract_all();
        let rects = RectangleRefiner::new(&edge_mask, self.params).run(components);

        debug!(regions = rects.len(), "heuristic path finished");
        rects.into_iter().map(DetectedTextRegion::heuristic).collect()
    }
}
