//! OCR capability used by the OCR-assisted detection path.
//!
//! The pipeline only needs word boxes: it hands an encoded image and a page
//! segmentation mode to an [`OcrEngine`] and receives [`RecognizedWord`]s.
//! Engines are owned by the caller and passed into each detection call, so
//! tests can substitute fakes and several engines (languages, data
//! directories) can coexist in one process.

pub mod tesseract;
pub mod variants;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::processors::TextRect;

pub use tesseract::{TesseractCli, parse_tsv};
pub use variants::PreprocessVariant;

/// Page segmentation mode requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SegmentationMode {
    /// Fully automatic page segmentation.
    Auto,
    /// Treat the image as a single uniform block of text.
    SingleBlock,
    /// Find as much text as possible in no particular order.
    #[default]
    SparseText,
}

impl SegmentationMode {
    /// Tesseract `--psm` value of this mode.
    pub fn psm(&self) -> u32 {
        match self {
            SegmentationMode::Auto => 3,
            SegmentationMode::SingleBlock => 6,
            SegmentationMode::SparseText => 11,
        }
    }
}

/// One word box as reported by an engine, before any filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedWord {
    /// Bounds in pixels of the image given to the engine.
    pub bounds: TextRect,
    /// Raw recognized text.
    pub text: String,
    /// Engine confidence in percent (0-100).
    pub confidence_percent: f32,
}

impl RecognizedWord {
    pub fn new(bounds: TextRect, text: impl Into<String>, confidence_percent: f32) -> Self {
        Self {
            bounds,
            text: text.into(),
            confidence_percent,
        }
    }
}

/// Errors reported by an [`OcrEngine`].
#[derive(Error, Debug)]
pub enum OcrEngineError {
    /// The engine cannot run at all (missing executable or language data).
    #[error("OCR engine unavailable: {reason}")]
    Unavailable { reason: String },

    /// The engine ran but failed on this input.
    #[error("OCR engine failed: {message}")]
    Failed { message: String },

    /// I/O error while handing the image to the engine.
    #[error("OCR engine I/O error")]
    Io(#[from] std::io::Error),
}

impl OcrEngineError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns true if retrying with other input cannot help.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// A word-level OCR capability.
///
/// Implementations that wrap a non-reentrant engine must serialize calls
/// internally; the detector may be shared across threads.
pub trait OcrEngine: Send + Sync {
    /// Recognizes the words of a PNG-encoded image.
    fn recognize(
        &self,
        png: &[u8],
        mode: SegmentationMode,
    ) -> Result<Vec<RecognizedWord>, OcrEngineError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
