//! Domain types produced by the detection pipeline.
//!
//! * [`DetectedTextRegion`] - the unified output of both strategies
//! * [`DetectedWord`] / [`DetectedLine`] - intermediate values of the OCR-assisted path

pub mod text_region;

pub use text_region::{DetectedLine, DetectedTextRegion, DetectedWord, DetectionStrategy};
