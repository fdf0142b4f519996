//! Detection orchestrator.
//!
//! A detection call tries the OCR-assisted path first and falls back to the
//! pixel heuristics when the engine is missing, unavailable, or finds nothing.
//! The detector holds only configuration, so one instance can serve calls from
//! many threads at once.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use super::heuristic::HeuristicDetector;
use super::ocr_assisted::{OcrPathOutcome, OcrRegionDetector};
use super::stats::DetectionReport;
use crate::core::config::{ConfigValidator, DetectionConfig};
use crate::core::errors::DetectResult;
use crate::domain::{DetectedTextRegion, DetectionStrategy};
use crate::ocr::OcrEngine;
use crate::processors::Bitmap;

/// States of one detection call.
enum DetectionState<'e> {
    TryOcr(&'e dyn OcrEngine),
    UseHeuristic { reason: String },
}

/// Finds text regions in bitmaps.
///
/// # Examples
///
/// ```rust
/// use textzone::pipeline::TextRegionDetector;
/// use textzone::processors::Bitmap;
///
/// let detector = TextRegionDetector::default();
/// let blank = Bitmap::solid(100, 100, 0xFF80_8080);
/// assert!(detector.detect(&blank, None).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextRegionDetector {
    config: DetectionConfig,
}

impl TextRegionDetector {
    /// Creates a detector after validating `config`.
    pub fn new(config: DetectionConfig) -> DetectResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detects text regions, returning only the regions.
    pub fn detect(
        &self,
        bitmap: &Bitmap,
        engine: Option<&dyn OcrEngine>,
    ) -> Vec<DetectedTextRegion> {
        self.detect_with_report(bitmap, engine).regions
    }

    /// Detects text regions and reports which strategy produced them.
    ///
    /// Never fails: missing text, an empty bitmap and an unusable engine all
    /// end in a (possibly empty) region list.
    pub fn detect_with_report(
        &self,
        bitmap: &Bitmap,
        engine: Option<&dyn OcrEngine>,
    ) -> DetectionReport {
        let span = info_span!(
            "detect_text_regions",
            width = bitmap.width(),
            height = bitmap.height()
        );
        let _enter = span.enter();
        let started = Instant::now();
        let raster = bitmap.view();

        if bitmap.is_empty() {
            debug!("empty bitmap");
            return DetectionReport {
                regions: Vec::new(),
                strategy: DetectionStrategy::Heuristic,
                fallback_reason: Some("empty bitmap".to_string()),
                elapsed: started.elapsed(),
            };
        }

        let mut state = match engine {
            Some(engine) => DetectionState::TryOcr(engine),
            None => DetectionState::UseHeuristic {
                reason: "no OCR engine supplied".to_string(),
            },
        };

        loop {
            state = match state {
                DetectionState::TryOcr(engine) => {
                    match OcrRegionDetector::new(engine, &self.config.ocr).detect(raster) {
                        OcrPathOutcome::Regions(regions) if !regions.is_empty() => {
                            info!(
                                regions = regions.len(),
                                strategy = %DetectionStrategy::Ocr,
                                "text regions detected"
                            );
                            return DetectionReport {
                                regions,
                                strategy: DetectionStrategy::Ocr,
                                fallback_reason: None,
                                elapsed: started.elapsed(),
                            };
                        }
                        OcrPathOutcome::Regions(_) => DetectionState::UseHeuristic {
                            reason: "OCR path found no regions".to_string(),
                        },
                        OcrPathOutcome::Unavailable(reason) => {
                            warn!(%reason, "falling back to heuristic detection");
                            DetectionState::UseHeuristic { reason }
                        }
                    }
                }
                DetectionState::UseHeuristic { reason } => {
                    let regions = HeuristicDetector::new(&self.config.heuristic).detect(raster);
                    info!(
                        regions = regions.len(),
                        strategy = %DetectionStrategy::Heuristic,
                        %reason,
                        "text regions detected"
                    );
                    return DetectionReport {
                        regions,
                        strategy: DetectionStrategy::Heuristic,
                        fallback_reason: Some(reason),
                        elapsed: started.elapsed(),
                    };
                }
            };
        }
    }

    /// Runs only the pixel-heuristic path.
    pub fn detect_heuristic(&self, bitmap: &Bitmap) -> Vec<DetectedTextRegion> {
        HeuristicDetector::new(&self.config.heuristic).detect(bitmap.view())
    }

    /// Detects each bitmap independently; results keep the input order.
    ///
    /// Batches larger than the policy threshold run on rayon, in a dedicated
    /// pool when `max_threads` is set.
    pub fn detect_batch(
        &self,
        bitmaps: &[Bitmap],
        engine: Option<&dyn OcrEngine>,
    ) -> Vec<Vec<DetectedTextRegion>> {
        let policy = &self.config.parallel;
        if bitmaps.len() <= policy.batch_threshold {
            debug!(count = bitmaps.len(), "detecting batch sequentially");
            return bitmaps
                .iter()
                .map(|bitmap| self.detect(bitmap, engine))
                .collect();
        }

        debug!(count = bitmaps.len(), "detecting batch in parallel");
        let run = || -> Vec<Vec<DetectedTextRegion>> {
            bitmaps
                .par_iter()
                .map(|bitmap| self.detect(bitmap, engine))
                .collect()
        };

        match policy.max_threads {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    warn!(error = %e, "failed to build thread pool, using the global pool");
                    run()
                }
            },
            None => run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::core::config::ParallelPolicy;
    use crate::ocr::{OcrEngineError, RecognizedWord, SegmentationMode};
    use crate::processors::TextRect;
    use crate::processors::raster::pack_argb;

    const WHITE: u32 = pack_argb(255, 255, 255, 255);
    const BLACK: u32 = pack_argb(255, 0, 0, 0);

    struct WordsEngine {
        words: Vec<RecognizedWord>,
        calls: AtomicUsize,
    }

    impl WordsEngine {
        fn new(words: Vec<RecognizedWord>) -> Self {
            Self {
                words,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl OcrEngine for WordsEngine {
        fn recognize(
            &self,
            _png: &[u8],
            _mode: SegmentationMode,
        ) -> Result<Vec<RecognizedWord>, OcrEngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.words.clone())
        }

        fn name(&self) -> &str {
            "words"
        }
    }

    struct MissingDataEngine;

    impl OcrEngine for MissingDataEngine {
        fn recognize(
            &self,
            _png: &[u8],
            _mode: SegmentationMode,
        ) -> Result<Vec<RecognizedWord>, OcrEngineError> {
            Err(OcrEngineError::unavailable("eng.traineddata not found"))
        }

        fn name(&self) -> &str {
            "missing-data"
        }
    }

    fn word_image() -> Bitmap {
        let mut bitmap = Bitmap::solid(200, 50, WHITE);
        for i in 0..6 {
            let left = 40 + i * 20;
            bitmap.fill_rect(TextRect::new(left, 15, 12, 2), BLACK);
            bitmap.fill_rect(TextRect::new(left, 33, 12, 2), BLACK);
            bitmap.fill_rect(TextRect::new(left, 15, 2, 20), BLACK);
            bitmap.fill_rect(TextRect::new(left + 10, 15, 2, 20), BLACK);
        }
        bitmap
    }

    #[test]
    fn test_ocr_regions_win() {
        let engine = WordsEngine::new(vec![RecognizedWord::new(
            TextRect::new(40, 15, 112, 20),
            "OPENED",
            93.0,
        )]);
        let detector = TextRegionDetector::default();
        let report = detector.detect_with_report(&word_image(), Some(&engine));
        assert_eq!(report.strategy, DetectionStrategy::Ocr);
        assert_eq!(report.fallback_reason, None);
        assert_eq!(report.regions.len(), 1);
        assert!(report.regions[0].confidence() > 0.0);
    }

    #[test]
    fn test_low_confidence_words_fall_back_to_heuristic() {
        let engine = WordsEngine::new(vec![RecognizedWord::new(
            TextRect::new(40, 15, 112, 20),
            "OPENED",
            30.0,
        )]);
        let detector = TextRegionDetector::default();
        let report = detector.detect_with_report(&word_image(), Some(&engine));
        assert_eq!(report.strategy, DetectionStrategy::Heuristic);
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].confidence(), 0.0);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_unavailable_engine_falls_back() {
        let detector = TextRegionDetector::default();
        let report = detector.detect_with_report(&word_image(), Some(&MissingDataEngine));
        assert_eq!(report.strategy, DetectionStrategy::Heuristic);
        assert!(
            report
                .fallback_reason
                .as_deref()
                .is_some_and(|reason| reason.contains("eng.traineddata"))
        );
        assert_eq!(report.regions.len(), 1);
    }

    #[test]
    fn test_without_engine_uses_heuristic() {
        let detector = TextRegionDetector::default();
        let image = word_image();
        assert_eq!(detector.detect(&image, None), detector.detect_heuristic(&image));
    }

    #[test]
    fn test_empty_bitmap_is_not_an_error() {
        let detector = TextRegionDetector::default();
        let empty = Bitmap::solid(0, 0, WHITE);
        assert!(detector.detect(&empty, Some(&MissingDataEngine)).is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = DetectionConfig::default();
        config.ocr.variants.clear();
        assert!(TextRegionDetector::new(config).is_err());
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let mut config = DetectionConfig::default();
        config.parallel = ParallelPolicy::new()
            .with_batch_threshold(1)
            .with_max_threads(Some(2));
        let detector = TextRegionDetector::new(config).unwrap();

        let blank = Bitmap::solid(60, 60, WHITE);
        let bitmaps = vec![word_image(), blank.clone(), word_image(), blank];
        let results = detector.detect_batch(&bitmaps, None);
        let counts: Vec<usize> = results.iter().map(Vec::len).collect();
        assert_eq!(counts, vec![1, 0, 1, 0]);

        let sequential: Vec<_> = bitmaps
            .iter()
            .map(|bitmap| detector.detect(bitmap, None))
            .collect();
        assert_eq!(results, sequential);
    }
}
