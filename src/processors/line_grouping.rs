//! Word/line clustering of the OCR-assisted path.
//!
//! Recognized words are filtered, grouped into visual rows by vertical overlap,
//! split into lines at large horizontal gaps and finally merged into padded
//! regions. The clustering never looks at pixels.

use itertools::Itertools;
use tracing::debug;

use crate::core::config::OcrPathParams;
use crate::domain::{DetectedLine, DetectedTextRegion, DetectedWord};
use crate::ocr::RecognizedWord;
use crate::processors::TextRect;

/// Words sharing one visual row, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct WordGroup {
    bounds: TextRect,
    words: Vec<DetectedWord>,
}

impl WordGroup {
    fn new(word: DetectedWord) -> Self {
        Self {
            bounds: word.bounds,
            words: vec![word],
        }
    }

    fn push(&mut self, word: DetectedWord) {
        self.bounds = self.bounds.union(&word.bounds);
        self.words.push(word);
    }

    /// Union of the word bounds.
    pub fn bounds(&self) -> TextRect {
        self.bounds
    }

    pub fn words(&self) -> &[DetectedWord] {
        &self.words
    }

    pub fn into_words(self) -> Vec<DetectedWord> {
        self.words
    }
}

/// Builds regions from OCR word boxes.
#[derive(Debug, Clone, Copy)]
pub struct LineClusterer<'a> {
    params: &'a OcrPathParams,
}

impl<'a> LineClusterer<'a> {
    pub fn new(params: &'a OcrPathParams) -> Self {
        Self { params }
    }

    /// Runs the whole clustering for an image of `width x height` pixels.
    pub fn cluster(
        &self,
        words: impl IntoIterator<Item = RecognizedWord>,
        width: u32,
        height: u32,
    ) -> Vec<DetectedTextRegion> {
        let accepted: Vec<DetectedWord> =
            words.into_iter().filter_map(|word| self.accept(word)).collect();
        let word_count = accepted.len();
        let lines: Vec<DetectedLine> = self
            .group_rows(accepted)
            .into_iter()
            .flat_map(|group| self.split_lines(group.into_words()))
            .collect();
        let line_count = lines.len();
        let regions = self.finalize_regions(self.merge_lines(lines), width, height);
        debug!(
            words = word_count,
            lines = line_count,
            regions = regions.len(),
            "words clustered"
        );
        regions
    }

    /// Applies the word filter and converts the confidence to `[0, 1]`.
    pub fn accept(&self, word: RecognizedWord) -> Option<DetectedWord> {
        let p = self.params;
        let text = word.text.trim();
        if word.bounds.width < p.min_word_width
            || word.bounds.height < p.min_word_height
            || text.is_empty()
            || word.confidence_percent.is_nan()
            || word.confidence_percent < p.min_word_confidence
        {
            return None;
        }
        Some(DetectedWord::new(
            word.bounds,
            word.confidence_percent / 100.0,
            text,
        ))
    }

    /// Assigns each word, in (top, left) order, to the vertically closest
    /// group it overlaps enough; otherwise it starts a new group.
    pub fn group_rows(&self, words: Vec<DetectedWord>) -> Vec<WordGroup> {
        let mut groups: Vec<WordGroup> = Vec::new();
        for word in words
            .into_iter()
            .sorted_by_key(|word| (word.bounds.top(), word.bounds.left()))
        {
            let target = groups
                .iter()
                .enumerate()
                .filter(|(_, group)| {
                    group.bounds.vertical_overlap_ratio(&word.bounds) >= self.params.group_overlap
                })
                .map(|(index, group)| {
                    (index, (group.bounds.center_y() - word.bounds.center_y()).abs())
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(index, _)| index);
            match target {
                Some(index) => groups[index].push(word),
                None => groups.push(WordGroup::new(word)),
            }
        }
        groups
    }

    /// Sorts a row left to right and splits it into lines.
    pub fn split_lines(&self, mut words: Vec<DetectedWord>) -> Vec<DetectedLine> {
        words.sort_by_key(|word| (word.bounds.left(), word.bounds.top()));
        let mut segments = Vec::new();
        self.split_recursive(&words, &mut segments);
        segments
            .into_iter()
            .filter_map(DetectedLine::from_words)
            .collect()
    }

    /// Splits at the single largest gap while it exceeds the threshold of the
    /// current segment.
    fn split_recursive<'w>(&self, words: &'w [DetectedWord], out: &mut Vec<&'w [DetectedWord]>) {
        if words.len() < 2 {
            if !words.is_empty() {
                out.push(words);
            }
            return;
        }

        let mean_height =
            words.iter().map(|word| word.bounds.height as f32).sum::<f32>() / words.len() as f32;
        let threshold = self.params.split_threshold(mean_height);

        let largest = gaps(words).into_iter().enumerate().max_by_key(|&(_, gap)| gap);
        match largest {
            Some((index, gap)) if gap as f32 > threshold => {
                let (left, right) = words.split_at(index + 1);
                self.split_recursive(left, out);
                self.split_recursive(right, out);
            }
            _ => out.push(words),
        }
    }

    /// Unions nearly aligned lines until no pair qualifies.
    ///
    /// Returns region bounds with the highest confidence among their lines.
    pub fn merge_lines(&self, lines: Vec<DetectedLine>) -> Vec<(TextRect, f32)> {
        let mut merged: Vec<(TextRect, f32)> = lines
            .into_iter()
            .sorted_by_key(|line| (line.bounds.top(), line.bounds.left()))
            .map(|line| (line.bounds, line.confidence))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            let mut i = 0;
            while i < merged.len() {
                let mut j = i + 1;
                while j < merged.len() {
                    if self.lines_touch(&merged[i].0, &merged[j].0) {
                        let (bounds, confidence) = merged.remove(j);
                        merged[i].0 = merged[i].0.union(&bounds);
                        merged[i].1 = merged[i].1.max(confidence);
                        changed = true;
                        j = i + 1;
                    } else {
                        j += 1;
                    }
                }
                i += 1;
            }
        }
        merged
    }

    fn lines_touch(&self, a: &TextRect, b: &TextRect) -> bool {
        let max_width = a.width.max(b.width) as f32;
        let max_gap = self
            .params
            .line_merge_max_gap
            .min(self.params.line_merge_gap_factor * max_width);
        a.vertical_overlap_ratio(b) >= self.params.line_merge_overlap
            && a.horizontal_gap(b) as f32 <= max_gap
    }

    /// Pads, clamps and size-filters merged line bounds.
    pub fn finalize_regions(
        &self,
        merged: Vec<(TextRect, f32)>,
        width: u32,
        height: u32,
    ) -> Vec<DetectedTextRegion> {
        let p = self.params;
        merged
            .into_iter()
            .map(|(bounds, confidence)| {
                (
                    bounds.inflate(p.region_padding).clamp_to(width, height),
                    confidence,
                )
            })
            .filter(|(bounds, _)| {
                bounds.width >= p.min_region_width && bounds.height >= p.min_region_height
            })
            .map(|(bounds, confidence)| DetectedTextRegion::new(bounds, confidence))
            .collect()
    }
}

/// Gap between each word and everything to its left, measured from the
/// right-most edge seen so far.
fn gaps(words: &[DetectedWord]) -> Vec<i32> {
    let mut max_right = i32::MIN;
    words
        .iter()
        .tuple_windows()
        .map(|(current, next)| {
            max_right = max_right.max(current.bounds.right());
            next.bounds.left() - max_right
        })
        .collect()
}
