//! Utility functions for the detection pipeline.
//!
//! This module provides image loading helpers, the optional region
//! visualization and logging setup.

pub mod image;
#[cfg(feature = "visualization")]
pub mod visualization;

pub use image::{
    decode_bitmap, dynamic_to_rgba, load_bitmap, load_bitmaps, load_bitmaps_with_threshold,
    load_image,
};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
