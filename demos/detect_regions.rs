//! Text Region Detection Example
//!
//! This example detects text regions in screenshots. It tries the Tesseract
//! engine first and falls back to the pixel heuristics when Tesseract or its
//! language data is missing.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example detect_regions -- [OPTIONS] <IMAGES>...
//! ```
//!
//! # Arguments
//!
//! * `-c, --config` - JSON configuration file
//! * `-l, --language` - Tesseract language code(s)
//! * `--tessdata-dir` - Tesseract data directory
//! * `--heuristic-only` - Skip the OCR path
//! * `--dump-json` - Print reports as JSON
//! * `-o, --output-dir` - Directory for visualizations (needs the `visualization` feature)
//! * `<IMAGES>...` - Paths to input images
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=textzone=debug cargo run --features visualization --example detect_regions -- \
//!     -o output/ screenshot1.png screenshot2.png
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::json;
use textzone::ocr::OcrEngine;
use textzone::prelude::*;
use tracing::{error, info, warn};

/// Command-line arguments for the text region detection example
#[derive(Parser)]
#[command(name = "detect_regions")]
#[command(about = "Text Region Detection Example - finds rendered text in screenshots")]
struct Args {
    /// Paths to input images
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// JSON configuration file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tesseract language code(s), e.g. "eng+deu"
    #[arg(short, long, default_value = "eng")]
    language: String,

    /// Tesseract data directory
    #[arg(long)]
    tessdata_dir: Option<PathBuf>,

    /// Skip the OCR path and use the pixel heuristics only
    #[arg(long)]
    heuristic_only: bool,

    /// Print one JSON report per image to stdout
    #[arg(long)]
    dump_json: bool,

    /// Directory to save visualizations
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    textzone::utils::init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DetectionConfig::from_json_file(path)?,
        None => DetectionConfig::default(),
    };
    let detector = TextRegionDetector::new(config)?;

    let mut engine = TesseractCli::new().with_language(&args.language);
    if let Some(dir) = &args.tessdata_dir {
        engine = engine.with_tessdata_dir(dir);
    }
    let engine: Option<&dyn OcrEngine> = if args.heuristic_only {
        None
    } else {
        Some(&engine)
    };

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
        if !cfg!(feature = "visualization") {
            warn!("--output-dir needs the `visualization` feature, no images will be written");
        }
    }

    for path in &args.images {
        let bitmap = match load_bitmap(path) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                continue;
            }
        };

        let report = detector.detect_with_report(&bitmap, engine);
        info!("{}: {}", path.display(), report);

        if args.dump_json {
            let entry = json!({
                "image": path.display().to_string(),
                "strategy": report.strategy,
                "fallback_reason": report.fallback_reason,
                "elapsed_ms": report.elapsed.as_secs_f64() * 1000.0,
                "regions": report.regions,
            });
            println!("{}", serde_json::to_string_pretty(&entry)?);
        } else {
            for (index, region) in report.regions.iter().enumerate() {
                let bounds = region.bounds();
                println!(
                    "{}\t#{}\tx={} y={} w={} h={}\tconfidence={:.2}",
                    path.display(),
                    index,
                    bounds.x,
                    bounds.y,
                    bounds.width,
                    bounds.height,
                    region.confidence()
                );
            }
        }

        if let Some(dir) = &args.output_dir {
            save_overlay(&bitmap, &report, path, dir);
        }
    }

    Ok(())
}

#[cfg(feature = "visualization")]
fn save_overlay(bitmap: &Bitmap, report: &DetectionReport, input: &Path, dir: &Path) {
    use textzone::utils::visualization::{VisualizationConfig, save_visualization};

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let output = dir.join(format!("{stem}_regions.png"));
    match save_visualization(bitmap, &report.regions, &VisualizationConfig::default(), &output) {
        Ok(()) => info!("Saved visualization to {}", output.display()),
        Err(e) => error!("Failed to save {}: {}", output.display(), e),
    }
}

#[cfg(not(feature = "visualization"))]
fn save_overlay(_bitmap: &Bitmap, _report: &DetectionReport, _input: &Path, _dir: &Path) {}
