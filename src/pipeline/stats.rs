//! Per-call detection report.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::domain::{DetectedTextRegion, DetectionStrategy};

/// Regions of one detection call together with how they were obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    /// The detected regions.
    pub regions: Vec<DetectedTextRegion>,
    /// The strategy that produced `regions`.
    pub strategy: DetectionStrategy,
    /// Why the OCR path was skipped, when the heuristic path ran.
    pub fallback_reason: Option<String>,
    /// Wall-clock time of the call.
    pub elapsed: Duration,
}

impl DetectionReport {
    /// Returns true if no region was found.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Highest region confidence, or `0.0` without regions.
    pub fn max_confidence(&self) -> f32 {
        self.regions
            .iter()
            .map(DetectedTextRegion::confidence)
            .fold(0.0, f32::max)
    }
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} region(s) via {} in {:.2} ms",
            self.regions.len(),
            self.strategy,
            self.elapsed.as_secs_f64() * 1000.0
        )?;
        if let Some(reason) = &self.fallback_reason {
            write!(f, " (fallback: {reason})")?;
        }
        Ok(())
    }
}
