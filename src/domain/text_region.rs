//! Result types shared by both detection strategies.

use serde::{Deserialize, Serialize};

use crate::processors::TextRect;

/// Which strategy produced a set of regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionStrategy {
    /// Regions were built from OCR word boxes.
    Ocr,
    /// Regions were built from pixel edge statistics.
    Heuristic,
}

impl std::fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionStrategy::Ocr => write!(f, "ocr"),
            DetectionStrategy::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// A rectangle that likely contains rendered text.
///
/// Regions are immutable values: each detection call creates them once and
/// hands them to the caller. Heuristic regions carry a confidence of `0.0`
/// because the pixel path has no semantic signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegionRecord")]
pub struct DetectedTextRegion {
    bounds: TextRect,
    confidence: f32,
}

/// Wire form of a region; deserialization goes through [`DetectedTextRegion::new`].
#[derive(Deserialize)]
struct RegionRecord {
    bounds: TextRect,
    confidence: f32,
}

impl From<RegionRecord> for DetectedTextRegion {
    fn from(record: RegionRecord) -> Self {
        Self::new(record.bounds, record.confidence)
    }
}

impl DetectedTextRegion {
    /// Creates a region; the confidence is clamped to `[0, 1]`.
    pub fn new(bounds: TextRect, confidence: f32) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { bounds, confidence }
    }

    /// Creates a region reported by the pixel heuristics.
    pub fn heuristic(bounds: TextRect) -> Self {
        Self::new(bounds, 0.0)
    }

    /// Region bounds in source-image pixels.
    pub fn bounds(&self) -> TextRect {
        self.bounds
    }

    /// Confidence in `[0, 1]`.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

/// A word reported by the OCR engine, after size and confidence filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedWord {
    /// Word bounds in source-image pixels.
    pub bounds: TextRect,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Recognized text, trimmed.
    pub text: String,
}

impl DetectedWord {
    /// Creates a new word.
    pub fn new(bounds: TextRect, confidence: f32, text: impl Into<String>) -> Self {
        Self {
            bounds,
            confidence,
            text: text.into(),
        }
    }
}

/// A run of words on one visual row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLine {
    /// Union of the word bounds.
    pub bounds: TextRect,
    /// Mean of the word confidences.
    pub confidence: f32,
    /// Word texts joined by single spaces, left to right.
    pub text: String,
    /// Number of words in the line.
    pub word_count: usize,
}

impl DetectedLine {
    /// Builds a line from words already sorted left to right.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_words(words: &[DetectedWord]) -> Option<Self> {
        let first = words.first()?;
        let bounds = words
            .iter()
            .skip(1)
            .fold(first.bounds, |acc, word| acc.union(&word.bounds));
        let confidence =
            words.iter().map(|word| word.confidence).sum::<f32>() / words.len() as f32;
        let text = words
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Some(Self {
            bounds,
            confidence,
            text,
            word_count: words.len(),
        })
    }
}
