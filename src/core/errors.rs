//! Error types for the text region detection pipeline.
//!
//! Detection itself never fails: an image without text, an unavailable OCR
//! engine, or a degenerate component all end up as an empty or reduced region
//! list. The errors defined here surface only at the boundaries of the crate,
//! i.e. when building a [`Bitmap`](crate::processors::Bitmap) from a raw buffer,
//! loading an image file, encoding an OCR variant, or reading a configuration.
//!
//! # Usage
//!
//! ```rust
//! use textzone::core::errors::DetectError;
//!
//! let error = DetectError::invalid_input("stride 10 is smaller than width 20");
//! assert!(error.to_string().contains("stride"));
//! ```

use thiserror::Error;

use crate::core::config::ConfigError;

/// Enum representing the stage in which a processing error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Encoding a preprocessing variant for the OCR engine.
    VariantEncoding,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::VariantEncoding => write!(f, "variant encoding"),
        }
    }
}

/// Errors raised at the boundaries of the detection pipeline.
#[derive(Error, Debug)]
pub enum DetectError {
    /// Error occurred while loading or decoding an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a buffer is too small for the declared geometry.
    #[error("buffer too small: expected at least {expected} pixels, got {actual} pixels")]
    BufferTooSmall {
        /// The expected minimum buffer length.
        expected: usize,
        /// The actual buffer length.
        actual: usize,
    },

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error while (de)serializing a configuration document.
    #[error("configuration parse")]
    ConfigParse(#[from] serde_json::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl DetectError {
    /// Creates an invalid input error from a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for a failed variant encoding.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn encode(context: &str, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Processing {
            kind: ProcessingStage::VariantEncoding,
            context: context.to_string(),
            source: Box::new(error),
        }
    }
}

impl From<image::ImageError> for DetectError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

/// Convenient result alias for fallible operations in this crate.
pub type DetectResult<T> = Result<T, DetectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_error_display_names_stage() {
        let err = DetectError::encode(
            "png encode of inverted variant",
            std::io::Error::other("disk full"),
        );
        let text = err.to_string();
        assert!(text.starts_with("variant encoding failed"));
        assert!(text.contains("inverted"));
    }

    #[test]
    fn test_buffer_too_small_display() {
        let err = DetectError::BufferTooSmall {
            expected: 100,
            actual: 10,
        };
        assert_eq!(
            err.to_string(),
            "buffer too small: expected at least 100 pixels, got 10 pixels"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: DetectError = ConfigError::InvalidConfig {
            message: "edge threshold must be positive".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: edge threshold must be positive"
        );
    }
}
