//! [`OcrEngine`] backed by the `tesseract` command-line program.
//!
//! Each call writes the PNG to a temporary file, runs `tesseract <file> stdout
//! --psm <mode> -l <lang> tsv` and parses word rows from the TSV output.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, trace};

use super::{OcrEngine, OcrEngineError, RecognizedWord, SegmentationMode};
use crate::processors::TextRect;

/// Stderr fragments Tesseract prints when language data is missing.
const MISSING_DATA_MARKERS: [&str; 3] = [
    "Failed loading language",
    "Error opening data file",
    "Could not initialize tesseract",
];

/// TSV `level` of word rows.
const WORD_LEVEL: &str = "5";

/// Drives the `tesseract` executable.
///
/// Invocations are serialized through an internal lock.
#[derive(Debug)]
pub struct TesseractCli {
    binary: PathBuf,
    language: String,
    tessdata_dir: Option<PathBuf>,
    lock: Mutex<()>,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TesseractCli {
    /// Uses `tesseract` from `PATH` with English language data.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            tessdata_dir: None,
            lock: Mutex::new(()),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Language code(s) passed to `-l`, e.g. `"eng+deu"`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn command(&self, image: &Path, mode: SegmentationMode) -> Command {
        let mut command = Command::new(&self.binary);
        command.arg(image).arg("stdout");
        if let Some(dir) = &self.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        command
            .arg("--psm")
            .arg(mode.psm().to_string())
            .arg("-l")
            .arg(&self.language)
            .arg("tsv");
        command
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(
        &self,
        png: &[u8],
        mode: SegmentationMode,
    ) -> Result<Vec<RecognizedWord>, OcrEngineError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut file = tempfile::Builder::new()
            .prefix("textzone-")
            .suffix(".png")
            .tempfile()?;
        file.write_all(png)?;
        file.flush()?;

        let output = match self.command(file.path(), mode).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(OcrEngineError::unavailable(format!(
                    "{} not found",
                    self.binary.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        let words = parse_tsv(&String::from_utf8_lossy(&output.stdout));
        debug!(
            engine = "tesseract",
            psm = mode.psm(),
            words = words.len(),
            "recognition finished"
        );
        Ok(words)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Maps a failed run to an error, recognizing missing language data.
fn classify_failure(stderr: &str) -> OcrEngineError {
    let stderr = stderr.trim();
    if MISSING_DATA_MARKERS.iter().any(|marker| stderr.contains(marker)) {
        OcrEngineError::unavailable(stderr)
    } else {
        OcrEngineError::failed(stderr)
    }
}

/// Parses word rows from Tesseract TSV output.
///
/// The header row, non-word levels, malformed rows, blank text and negative
/// confidences are skipped.
pub fn parse_tsv(tsv: &str) -> Vec<RecognizedWord> {
    tsv.lines()
        .filter_map(|row| {
            let cols: Vec<&str> = row.split('\t').collect();
            if cols.len() < 12 || cols[0] != WORD_LEVEL {
                return None;
            }
            let left: i32 = cols[6].parse().ok()?;
            let top: i32 = cols[7].parse().ok()?;
            let width: i32 = cols[8].parse().ok()?;
            let height: i32 = cols[9].parse().ok()?;
            let confidence: f32 = cols[10].parse().ok()?;
            let text = cols[11].trim();
            if text.is_empty() || confidence < 0.0 {
                trace!(row, "skipping TSV row");
                return None;
            }
            Some(RecognizedWord::new(
                TextRect::new(left, top, width, height),
                text,
                confidence,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t200\t50\t-1\t
4\t1\t1\t1\t1\t0\t38\t12\t120\t26\t-1\t
5\t1\t1\t1\t1\t1\t38\t12\t58\t26\t91.417\tHello
5\t1\t1\t1\t1\t2\t104\t12\t54\t26\t88.25\tworld
5\t1\t1\t1\t1\t3\t170\t12\t4\t26\t-1\t
5\t1\t1\t1\t1\t4\tbroken\t12\t4\t26\t50\tx
";

    #[test]
    fn test_parse_tsv_keeps_word_rows() {
        let words = parse_tsv(SAMPLE);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].bounds, TextRect::new(38, 12, 58, 26));
        assert_eq!(words[0].text, "Hello");
        assert!((words[0].confidence_percent - 91.417).abs() < 1e-4);
        assert_eq!(words[1].text, "world");
    }

    #[test]
    fn test_parse_tsv_empty_output() {
        assert!(parse_tsv("").is_empty());
        assert!(parse_tsv("level\tpage_num\n").is_empty());
    }

    #[test]
    fn test_missing_language_data_is_unavailable() {
        let error = classify_failure(
            "Error opening data file /usr/share/tessdata/xyz.traineddata\nFailed loading language 'xyz'\n",
        );
        assert!(error.is_unavailable());
        assert!(!classify_failure("Image too small to scale!!").is_unavailable());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let engine = TesseractCli::new().with_binary("/nonexistent/textzone-tesseract");
        let result = engine.recognize(&[], SegmentationMode::default());
        assert!(matches!(result, Err(OcrEngineError::Unavailable { .. })));
    }

    #[test]
    fn test_command_arguments() {
        let engine = TesseractCli::new()
            .with_language("eng+deu")
            .with_tessdata_dir("/data");
        let command = engine.command(Path::new("in.png"), SegmentationMode::SingleBlock);
        let args: Vec<_> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            ["in.png", "stdout", "--tessdata-dir", "/data", "--psm", "6", "-l", "eng+deu", "tsv"]
        );
    }
}
