//! # textzone
//!
//! Locates rectangular regions of rendered text in screen captures.
//!
//! Two strategies share one output type, [`DetectedTextRegion`](domain::DetectedTextRegion):
//!
//! - **OCR-assisted**: word boxes from an external OCR engine, gathered over
//!   several preprocessing variants of the image, are clustered into lines and
//!   merged into regions. Regions carry the engine's confidence.
//! - **Pixel heuristics**: luminance edges are grown into connected components
//!   whose bounds are merged, split along whitespace and filtered by shape and
//!   edge density. Regions carry a confidence of `0.0`.
//!
//! The OCR path runs first when an engine is supplied; the heuristics take
//! over when the engine is unavailable or finds nothing. Detection never
//! fails: an image without text gives an empty list.
//!
//! ## Modules
//!
//! * [`core`] - Configuration, the default constant table, and error handling
//! * [`domain`] - Result types such as regions, words and lines
//! * [`ocr`] - The OCR engine seam and the Tesseract command-line engine
//! * [`pipeline`] - The heuristic and OCR-assisted paths and the orchestrator
//! * [`processors`] - Raster access, edge classification, components, rectangle passes and
//!   line clustering
//! * [`utils`] - Image loading, logging setup, optional visualization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use textzone::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bitmap = load_bitmap(Path::new("screenshot.png"))?;
//! let detector = TextRegionDetector::new(DetectionConfig::default())?;
//!
//! // With an OCR engine, falling back to the heuristics if it cannot run.
//! let engine = TesseractCli::new().with_language("eng");
//! let report = detector.detect_with_report(&bitmap, Some(&engine));
//! println!("{report}");
//!
//! // Pixel heuristics only.
//! for region in detector.detect(&bitmap, None) {
//!     println!("{:?}", region.bounds());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Configuration
//!
//! ```rust
//! use textzone::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DetectionConfig::from_json_str(r#"
//! {
//!   "heuristic": { "keep_min_aspect": 2.0 },
//!   "ocr": { "variants": ["Original", "Inverted"], "segmentation_mode": "SingleBlock" },
//!   "parallel": { "batch_threshold": 8 }
//! }
//! "#)?;
//! let detector = TextRegionDetector::new(config)?;
//! assert_eq!(detector.config().ocr.variants.len(), 2);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod ocr;

pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use textzone::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - The detector and its configuration (`TextRegionDetector`, `DetectionConfig`)
/// - Input and output types (`Bitmap`, `TextRect`, `DetectedTextRegion`, `DetectionReport`)
/// - OCR engines (`OcrEngine`, `TesseractCli`)
/// - Essential error and result types (`DetectError`, `DetectResult`)
/// - Basic image loading (`load_bitmap`)
pub mod prelude {
    // Detection (essential)
    pub use crate::core::config::{ConfigValidator, DetectionConfig};
    pub use crate::domain::{DetectedTextRegion, DetectionStrategy};
    pub use crate::pipeline::{DetectionReport, TextRegionDetector};
    pub use crate::processors::{Bitmap, TextRect};

    // OCR engines
    pub use crate::ocr::{OcrEngine, TesseractCli};

    // Error Handling (essential)
    pub use crate::core::{DetectError, DetectResult};

    // Image Utility (minimal)
    pub use crate::utils::{load_bitmap, load_bitmaps};
}
