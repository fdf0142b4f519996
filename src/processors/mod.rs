//! Processing stages of both detection strategies.
//!
//! # Modules
//!
//! * `geometry` - The [`TextRect`] primitive shared by every stage
//! * `raster` - Bounds-checked bitmap access and per-pixel grids
//! * `edge` - Per-pixel edge candidate classifier
//! * `components` - Connected-component extraction over edge candidates
//! * `rect_merge` - Merge, refine, keep and consolidate passes over rectangles
//! * `line_grouping` - Word/line clustering for the OCR-assisted path

pub mod components;
pub mod edge;
mod geometry;
pub mod line_grouping;
pub mod raster;
pub mod rect_merge;

pub use components::{ComponentExtractor, FloodOutcome, RejectReason};
pub use edge::EdgeClassifier;
pub use geometry::*;
pub use line_grouping::{LineClusterer, WordGroup};
pub use raster::{Bitmap, EdgeMask, PixelGrid, RasterView};
pub use rect_merge::{AxisRange, ColumnRange, RectangleRefiner, RowRange, merge_overlapping};
