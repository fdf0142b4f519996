//! OCR-assisted detection path.
//!
//! The raster is rendered once per configured [`PreprocessVariant`], each
//! rendering is recognized independently, and the pooled words are clustered
//! into regions.
//!
//! [`PreprocessVariant`]: crate::ocr::PreprocessVariant

use tracing::{debug, warn};

use crate::core::config::OcrPathParams;
use crate::domain::DetectedTextRegion;
use crate::ocr::{OcrEngine, RecognizedWord};
use crate::processors::{LineClusterer, RasterView};

/// Result of the OCR-assisted path.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrPathOutcome {
    /// The engine ran; the list may be empty.
    Regions(Vec<DetectedTextRegion>),
    /// The engine cannot run at all.
    Unavailable(String),
}

/// Runs the OCR-assisted path with a caller-owned engine.
#[derive(Clone, Copy)]
pub struct OcrRegionDetector<'a> {
    engine: &'a dyn OcrEngine,
    params: &'a OcrPathParams,
}

impl std::fmt::Debug for OcrRegionDetector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrRegionDetector")
            .field("engine", &self.engine.name())
            .field("params", self.params)
            .finish()
    }
}

impl<'a> OcrRegionDetector<'a> {
    pub fn new(engine: &'a dyn OcrEngine, params: &'a OcrPathParams) -> Self {
        Self { engine, params }
    }

    /// Recognizes every variant and clusters the pooled words.
    ///
    /// An unavailable engine stops the path immediately. Other per-variant
    /// failures only drop that variant; if every variant fails the path is
    /// reported unavailable.
    pub fn detect(&self, raster: RasterView<'_>) -> OcrPathOutcome {
        if raster.width() == 0 || raster.height() == 0 {
            return OcrPathOutcome::Regions(Vec::new());
        }

        let mut pooled: Vec<RecognizedWord> = Vec::new();
        let mut failures: Vec<String> = Vec::new();

        for variant in &self.params.variants {
            let png = match variant.encode_png(raster) {
                Ok(png) => png,
                Err(e) => {
                    warn!(%variant, error = %e, "failed to encode OCR variant");
                    failures.push(format!("{variant}: {e}"));
                    continue;
                }
            };

            match self.engine.recognize(&png, self.params.segmentation_mode) {
                Ok(words) => {
                    debug!(%variant, words = words.len(), "variant recognized");
                    pooled.extend(words);
                }
                Err(e) if e.is_unavailable() => {
                    warn!(engine = self.engine.name(), error = %e, "OCR engine unavailable");
                    return OcrPathOutcome::Unavailable(e.to_string());
                }
                Err(e) => {
                    warn!(%variant, engine = self.engine.name(), error = %e, "OCR variant failed");
                    failures.push(format!("{variant}: {e}"));
                }
            }
        }

        if !self.params.variants.is_empty() && failures.len() == self.params.variants.len() {
            return OcrPathOutcome::Unavailable(format!(
                "all {} OCR variants failed: {}",
                failures.len(),
                failures.join("; ")
            ));
        }

        OcrPathOutcome::Regions(LineClusterer::new(self.params).cluster(
            pooled,
            raster.width(),
            raster.height(),
        ))
    }
}
