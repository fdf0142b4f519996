//! The detection pipeline.
//!
//! [`TextRegionDetector`] is the entry point. It runs the OCR-assisted path
//! ([`OcrRegionDetector`]) when an engine is supplied and falls back to the
//! pixel heuristics ([`HeuristicDetector`]) otherwise.

pub mod heuristic;
pub mod ocr_assisted;
pub mod orchestrator;
pub mod stats;

pub use heuristic::HeuristicDetector;
pub use ocr_assisted::{OcrPathOutcome, OcrRegionDetector};
pub use orchestrator::TextRegionDetector;
pub use stats::DetectionReport;
