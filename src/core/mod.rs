//! The core module of the detection pipeline.
//!
//! This module contains the pieces shared by every stage:
//! - Configuration management and validation
//! - The default constant table
//! - Error handling
//!
//! It also re-exports the commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;

pub use config::{
    ConfigError, ConfigValidator, DetectionConfig, HeuristicParams, OcrPathParams, ParallelPolicy,
};
pub use constants::*;
pub use errors::{DetectError, DetectResult, ProcessingStage};
