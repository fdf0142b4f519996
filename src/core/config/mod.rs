//! Configuration management for the detection pipeline.
//!
//! This module provides the parameter tables of both detection strategies,
//! the validation traits, and the batch parallelism policy.

pub mod detection;
pub mod errors;
pub mod parallel;

pub use detection::{DetectionConfig, HeuristicParams, OcrPathParams};
pub use errors::{ConfigError, ConfigValidator};
pub use parallel::ParallelPolicy;
