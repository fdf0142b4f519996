//! Default tuning constants for both detection strategies.
//!
//! These values were tuned empirically on desktop screenshots. They are the
//! defaults of [`HeuristicParams`](crate::core::config::HeuristicParams) and
//! [`OcrPathParams`](crate::core::config::OcrPathParams); override them
//! through configuration rather than editing them here.

// Edge classifier

/// Minimum single-axis luminance contrast for an edge candidate.
pub const DEFAULT_EDGE_THRESHOLD: u8 = 52;

/// Contrast below which an axis counts as carrying no signal.
pub const DEFAULT_EDGE_SECONDARY_THRESHOLD: u8 = 26;

/// Pixels with an alpha below this value are treated as background.
pub const DEFAULT_MIN_ALPHA: u8 = 16;

// Connected components

/// Components with fewer pixels are discarded as noise.
pub const DEFAULT_MIN_COMPONENT_PIXELS: usize = 32;

/// The run-away cap is `width * height / DEFAULT_MAX_COMPONENT_DIVISOR`.
pub const DEFAULT_MAX_COMPONENT_DIVISOR: usize = 12;

/// Inflation applied to accepted component bounds.
pub const DEFAULT_COMPONENT_INFLATE: i32 = 2;

// Merge / refine

/// Padding applied to both rectangles when testing for a merge.
pub const DEFAULT_MERGE_PADDING: i32 = 4;

/// Minimum side length of a merged rectangle worth refining.
pub const DEFAULT_REFINE_MIN_SIDE: i32 = 6;

/// Height-to-width factor above which a narrow shape is rejected.
pub const DEFAULT_TALL_NARROW_FACTOR: i32 = 6;

/// Narrow shapes are only rejected below this width.
pub const DEFAULT_TALL_NARROW_MAX_WIDTH: i32 = 120;

/// Minimum height of a scrollbar-like strip.
pub const DEFAULT_STRIP_MIN_HEIGHT: i32 = 300;

/// Maximum width of a scrollbar-like strip.
pub const DEFAULT_STRIP_MAX_WIDTH: i32 = 160;

/// Rectangles larger than this area are split along whitespace.
pub const DEFAULT_SPLIT_MIN_AREA: i32 = 1500;

/// Floor of the per-row activity that still counts as whitespace.
pub const DEFAULT_ROW_ACTIVITY_FLOOR: i32 = 6;

/// The row whitespace threshold is `max(floor, width / divisor)`.
pub const DEFAULT_ROW_ACTIVITY_DIVISOR: i32 = 30;

/// Floor of the whitespace run that closes a text row.
pub const DEFAULT_ROW_GAP_FLOOR: i32 = 2;

/// The row gap is `max(floor, height / divisor)`.
pub const DEFAULT_ROW_GAP_DIVISOR: i32 = 40;

/// Floor of the per-column activity that still counts as whitespace.
pub const DEFAULT_COLUMN_ACTIVITY_FLOOR: i32 = 1;

/// The column whitespace threshold is `max(floor, row_height / divisor)`.
pub const DEFAULT_COLUMN_ACTIVITY_DIVISOR: i32 = 7;

/// Cap of the whitespace run that closes a column span.
pub const DEFAULT_COLUMN_GAP_CAP: i32 = 12;

/// Inflation applied to each split sub-rectangle.
pub const DEFAULT_SPAN_INFLATE: i32 = 1;

/// Minimum span width accepted by the global fallback test.
pub const DEFAULT_FALLBACK_MIN_WIDTH: i32 = 12;

/// Minimum edge density accepted by the global fallback test.
pub const DEFAULT_FALLBACK_MIN_DENSITY: f32 = 0.02;

// Keep filter

/// Minimum width of a kept rectangle.
pub const DEFAULT_KEEP_MIN_WIDTH: i32 = 18;

/// Minimum height of a kept rectangle.
pub const DEFAULT_KEEP_MIN_HEIGHT: i32 = 8;

/// Maximum height of a kept rectangle.
pub const DEFAULT_KEEP_MAX_HEIGHT: i32 = 160;

/// Minimum width/height ratio of a kept rectangle.
pub const DEFAULT_KEEP_MIN_ASPECT: f32 = 1.6;

/// Minimum edge density of a kept rectangle.
pub const DEFAULT_KEEP_MIN_DENSITY: f32 = 0.02;

/// Edge density at which a rectangle may count as solid texture.
pub const DEFAULT_SOLID_DENSITY: f32 = 0.18;

/// Column fill at which a rectangle may count as solid texture.
pub const DEFAULT_SOLID_COLUMN_FILL: f32 = 0.92;

// Consolidation

/// Minimum vertical overlap, relative to the smaller height.
pub const DEFAULT_CONSOLIDATE_OVERLAP: f32 = 0.6;

/// Upper bound of the horizontal gap bridged during consolidation.
pub const DEFAULT_CONSOLIDATE_MAX_GAP: i32 = 28;

// OCR-assisted path

/// Minimum width of an OCR word.
pub const DEFAULT_MIN_WORD_WIDTH: i32 = 12;

/// Minimum height of an OCR word.
pub const DEFAULT_MIN_WORD_HEIGHT: i32 = 8;

/// Minimum OCR confidence, in percent.
pub const DEFAULT_MIN_WORD_CONFIDENCE: f32 = 45.0;

/// Minimum vertical overlap between a word and its line group.
pub const DEFAULT_GROUP_OVERLAP: f32 = 0.55;

/// Floor of the word gap that splits a line.
pub const DEFAULT_SPLIT_GAP_FLOOR: f32 = 28.0;

/// Cap of the word gap that splits a line.
pub const DEFAULT_SPLIT_GAP_CAP: f32 = 160.0;

/// Multiple of the mean word height used for the split gap.
pub const DEFAULT_SPLIT_GAP_FACTOR: f32 = 1.6;

/// Minimum vertical overlap between lines merged into one region.
pub const DEFAULT_LINE_MERGE_OVERLAP: f32 = 0.4;

/// Cap of the horizontal gap bridged between lines.
pub const DEFAULT_LINE_MERGE_MAX_GAP: f32 = 18.0;

/// Multiple of the wider line's width bridged between lines.
pub const DEFAULT_LINE_MERGE_GAP_FACTOR: f32 = 0.08;

/// Padding added around each OCR region.
pub const DEFAULT_REGION_PADDING: i32 = 6;

/// Minimum width of an OCR region.
pub const DEFAULT_MIN_REGION_WIDTH: i32 = 12;

/// Minimum height of an OCR region.
pub const DEFAULT_MIN_REGION_HEIGHT: i32 = 8;

/// The default threshold for parallel batch detection.
///
/// Batches with at most this many bitmaps run sequentially.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;
