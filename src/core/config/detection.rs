//! Tunable parameters of the two detection strategies.
//!
//! Every numeric heuristic used by the pipeline lives in one of the tables
//! below. The defaults come from [`crate::core::constants`]; any subset of
//! fields can be overridden from JSON since all tables use `#[serde(default)]`.
//!
//! ```rust
//! use textzone::core::config::{ConfigValidator, DetectionConfig};
//!
//! let config = DetectionConfig::from_json_str(
//!     r#"{ "heuristic": { "edge_threshold": 40 }, "ocr": { "variants": ["Original"] } }"#,
//! ).unwrap();
//! assert_eq!(config.heuristic.edge_threshold, 40);
//! assert_eq!(config.heuristic.min_component_pixels, 32);
//! assert!(config.validate().is_ok());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};
use super::parallel::ParallelPolicy;
use crate::core::constants::*;
use crate::core::errors::DetectResult;
use crate::ocr::{PreprocessVariant, SegmentationMode};

/// Parameters of the pixel-heuristic path (edge classifier, component
/// extraction, merge/refine and the keep filter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicParams {
    /// Minimum single-axis luminance contrast for an edge candidate.
    pub edge_threshold: u8,
    /// An axis below this contrast carries no signal.
    pub edge_secondary_threshold: u8,
    /// Pixels with a lower alpha never become edges.
    pub min_alpha: u8,
    /// Components with fewer pixels are noise.
    pub min_component_pixels: usize,
    /// Run-away cap divisor: `max(min_component_pixels, w*h / divisor)`.
    pub max_component_divisor: usize,
    /// Inflation applied to accepted component bounds.
    pub component_inflate: i32,
    /// Padding applied to both rectangles when testing for a merge.
    pub merge_padding: i32,
    /// Merged rectangles below this side length are dropped.
    pub refine_min_side: i32,
    pub tall_narrow_factor: i32,
    pub tall_narrow_max_width: i32,
    pub strip_min_height: i32,
    pub strip_max_width: i32,
    /// Rectangles above this area are split along whitespace runs.
    pub split_min_area: i32,
    pub row_activity_floor: i32,
    pub row_activity_divisor: i32,
    pub row_gap_floor: i32,
    pub row_gap_divisor: i32,
    pub column_activity_floor: i32,
    pub column_activity_divisor: i32,
    pub column_gap_cap: i32,
    pub span_inflate: i32,
    pub fallback_min_width: i32,
    pub fallback_min_density: f32,
    pub keep_min_width: i32,
    pub keep_min_height: i32,
    pub keep_max_height: i32,
    /// Minimum `width / height`; the main suppressor of icons and buttons.
    pub keep_min_aspect: f32,
    pub keep_min_density: f32,
    pub solid_density: f32,
    pub solid_column_fill: f32,
    pub consolidate_overlap: f32,
    pub consolidate_max_gap: i32,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            edge_secondary_threshold: DEFAULT_EDGE_SECONDARY_THRESHOLD,
            min_alpha: DEFAULT_MIN_ALPHA,
            min_component_pixels: DEFAULT_MIN_COMPONENT_PIXELS,
            max_component_divisor: DEFAULT_MAX_COMPONENT_DIVISOR,
            component_inflate: DEFAULT_COMPONENT_INFLATE,
            merge_padding: DEFAULT_MERGE_PADDING,
            refine_min_side: DEFAULT_REFINE_MIN_SIDE,
            tall_narrow_factor: DEFAULT_TALL_NARROW_FACTOR,
            tall_narrow_max_width: DEFAULT_TALL_NARROW_MAX_WIDTH,
            strip_min_height: DEFAULT_STRIP_MIN_HEIGHT,
            strip_max_width: DEFAULT_STRIP_MAX_WIDTH,
            split_min_area: DEFAULT_SPLIT_MIN_AREA,
            row_activity_floor: DEFAULT_ROW_ACTIVITY_FLOOR,
            row_activity_divisor: DEFAULT_ROW_ACTIVITY_DIVISOR,
            row_gap_floor: DEFAULT_ROW_GAP_FLOOR,
            row_gap_divisor: DEFAULT_ROW_GAP_DIVISOR,
            column_activity_floor: DEFAULT_COLUMN_ACTIVITY_FLOOR,
            column_activity_divisor: DEFAULT_COLUMN_ACTIVITY_DIVISOR,
            column_gap_cap: DEFAULT_COLUMN_GAP_CAP,
            span_inflate: DEFAULT_SPAN_INFLATE,
            fallback_min_width: DEFAULT_FALLBACK_MIN_WIDTH,
            fallback_min_density: DEFAULT_FALLBACK_MIN_DENSITY,
            keep_min_width: DEFAULT_KEEP_MIN_WIDTH,
            keep_min_height: DEFAULT_KEEP_MIN_HEIGHT,
            keep_max_height: DEFAULT_KEEP_MAX_HEIGHT,
            keep_min_aspect: DEFAULT_KEEP_MIN_ASPECT,
            keep_min_density: DEFAULT_KEEP_MIN_DENSITY,
            solid_density: DEFAULT_SOLID_DENSITY,
            solid_column_fill: DEFAULT_SOLID_COLUMN_FILL,
            consolidate_overlap: DEFAULT_CONSOLIDATE_OVERLAP,
            consolidate_max_gap: DEFAULT_CONSOLIDATE_MAX_GAP,
        }
    }
}

impl HeuristicParams {
    /// Pixel cap above which a component counts as run-away background.
    pub fn max_component_pixels(&self, width: u32, height: u32) -> usize {
        let area = width as usize * height as usize;
        (area / self.max_component_divisor.max(1)).max(self.min_component_pixels)
    }
}

impl ConfigValidator for HeuristicParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.edge_threshold == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "edge_threshold must be positive".to_string(),
            });
        }
        if self.min_component_pixels == 0 || self.max_component_divisor == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "component pixel limits must be positive".to_string(),
            });
        }
        self.validate_non_negative_i32("component_inflate", self.component_inflate)?;
        self.validate_non_negative_i32("merge_padding", self.merge_padding)?;
        self.validate_non_negative_i32("span_inflate", self.span_inflate)?;
        self.validate_non_negative_i32("row_activity_floor", self.row_activity_floor)?;
        self.validate_non_negative_i32("column_activity_floor", self.column_activity_floor)?;
        for (name, value) in [
            ("refine_min_side", self.refine_min_side),
            ("tall_narrow_factor", self.tall_narrow_factor),
            ("split_min_area", self.split_min_area),
            ("row_gap_floor", self.row_gap_floor),
            ("row_activity_divisor", self.row_activity_divisor),
            ("row_gap_divisor", self.row_gap_divisor),
            ("column_activity_divisor", self.column_activity_divisor),
            ("column_gap_cap", self.column_gap_cap),
            ("fallback_min_width", self.fallback_min_width),
            ("keep_min_width", self.keep_min_width),
            ("keep_min_height", self.keep_min_height),
            ("keep_max_height", self.keep_max_height),
        ] {
            self.validate_positive_i32(name, value)?;
        }
        if self.keep_max_height < self.keep_min_height {
            return Err(ConfigError::ValidationFailed {
                message: format!(
                    "keep_max_height {} is below keep_min_height {}",
                    self.keep_max_height, self.keep_min_height
                ),
            });
        }
        self.validate_positive_f32("keep_min_aspect", self.keep_min_aspect)?;
        self.validate_ratio("keep_min_density", self.keep_min_density)?;
        self.validate_ratio("fallback_min_density", self.fallback_min_density)?;
        self.validate_ratio("solid_density", self.solid_density)?;
        self.validate_ratio("solid_column_fill", self.solid_column_fill)?;
        self.validate_ratio("consolidate_overlap", self.consolidate_overlap)?;
        self.validate_non_negative_i32("consolidate_max_gap", self.consolidate_max_gap)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Parameters of the OCR-assisted path (word filter, line clustering and
/// region merge) plus the preprocessing variant policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrPathParams {
    /// Variants fed to the OCR engine; all recognized words are pooled.
    pub variants: Vec<PreprocessVariant>,
    /// Page segmentation mode requested from the engine.
    pub segmentation_mode: SegmentationMode,
    pub min_word_width: i32,
    pub min_word_height: i32,
    /// Minimum word confidence in percent (0-100).
    pub min_word_confidence: f32,
    pub group_overlap: f32,
    pub split_gap_floor: f32,
    pub split_gap_cap: f32,
    pub split_gap_factor: f32,
    pub line_merge_overlap: f32,
    pub line_merge_max_gap: f32,
    pub line_merge_gap_factor: f32,
    pub region_padding: i32,
    pub min_region_width: i32,
    pub min_region_height: i32,
}

impl Default for OcrPathParams {
    fn default() -> Self {
        Self {
            variants: PreprocessVariant::ALL.to_vec(),
            segmentation_mode: SegmentationMode::default(),
            min_word_width: DEFAULT_MIN_WORD_WIDTH,
            min_word_height: DEFAULT_MIN_WORD_HEIGHT,
            min_word_confidence: DEFAULT_MIN_WORD_CONFIDENCE,
            group_overlap: DEFAULT_GROUP_OVERLAP,
            split_gap_floor: DEFAULT_SPLIT_GAP_FLOOR,
            split_gap_cap: DEFAULT_SPLIT_GAP_CAP,
            split_gap_factor: DEFAULT_SPLIT_GAP_FACTOR,
            line_merge_overlap: DEFAULT_LINE_MERGE_OVERLAP,
            line_merge_max_gap: DEFAULT_LINE_MERGE_MAX_GAP,
            line_merge_gap_factor: DEFAULT_LINE_MERGE_GAP_FACTOR,
            region_padding: DEFAULT_REGION_PADDING,
            min_region_width: DEFAULT_MIN_REGION_WIDTH,
            min_region_height: DEFAULT_MIN_REGION_HEIGHT,
        }
    }
}

impl OcrPathParams {
    /// Gap above which a line is split, given the mean height of its words.
    pub fn split_threshold(&self, mean_word_height: f32) -> f32 {
        (self.split_gap_factor * mean_word_height)
            .min(self.split_gap_cap)
            .max(self.split_gap_floor)
    }
}

impl ConfigValidator for OcrPathParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.variants.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "at least one preprocessing variant is required".to_string(),
            });
        }
        self.validate_positive_i32("min_word_width", self.min_word_width)?;
        self.validate_positive_i32("min_word_height", self.min_word_height)?;
        if !(0.0..=100.0).contains(&self.min_word_confidence) {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "min_word_confidence must be a percentage, got {}",
                    self.min_word_confidence
                ),
            });
        }
        self.validate_ratio("group_overlap", self.group_overlap)?;
        self.validate_ratio("line_merge_overlap", self.line_merge_overlap)?;
        self.validate_positive_f32("split_gap_floor", self.split_gap_floor)?;
        self.validate_positive_f32("split_gap_factor", self.split_gap_factor)?;
        if self.split_gap_cap < self.split_gap_floor {
            return Err(ConfigError::ValidationFailed {
                message: format!(
                    "split_gap_cap {} is below split_gap_floor {}",
                    self.split_gap_cap, self.split_gap_floor
                ),
            });
        }
        if self.line_merge_max_gap < 0.0 || self.line_merge_gap_factor < 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: "line merge gaps must not be negative".to_string(),
            });
        }
        self.validate_non_negative_i32("region_padding", self.region_padding)?;
        self.validate_positive_i32("min_region_width", self.min_region_width)?;
        self.validate_positive_i32("min_region_height", self.min_region_height)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Complete configuration of a [`TextRegionDetector`](crate::pipeline::TextRegionDetector).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Pixel-heuristic path parameters.
    pub heuristic: HeuristicParams,
    /// OCR-assisted path parameters.
    pub ocr: OcrPathParams,
    /// Batch parallelism.
    pub parallel: ParallelPolicy,
}

impl DetectionConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> DetectResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: &Path) -> DetectResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl ConfigValidator for DetectionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.heuristic.validate()?;
        self.ocr.validate()?;
        if self.parallel.max_threads == Some(0) {
            return Err(ConfigError::InvalidConfig {
                message: "max_threads must be positive when set".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
