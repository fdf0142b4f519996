//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that validation failed.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },
}

/// A trait for validating configuration parameters.
///
/// Implementors check their own fields in [`validate`](ConfigValidator::validate);
/// the provided helpers cover the range checks shared by the detection configs.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a ratio lies within `[0, 1]`.
    fn validate_ratio(&self, name: &str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::InvalidConfig {
                message: format!("{name} must be within [0, 1], got {value}"),
            });
        }
        Ok(())
    }

    /// Validates that a floating point value is finite and strictly positive.
    fn validate_positive_f32(&self, name: &str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("{name} must be positive, got {value}"),
            });
        }
        Ok(())
    }

    /// Validates that an integer dimension is strictly positive.
    fn validate_positive_i32(&self, name: &str, value: i32) -> Result<(), ConfigError> {
        if value <= 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("{name} must be positive, got {value}"),
            });
        }
        Ok(())
    }

    /// Validates that an integer value is not negative.
    fn validate_non_negative_i32(&self, name: &str, value: i32) -> Result<(), ConfigError> {
        if value < 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("{name} must not be negative, got {value}"),
            });
        }
        Ok(())
    }
}
