//! Rectangle merge / refine engine of the heuristic path.
//!
//! Component bounds go through four deterministic passes:
//!
//! 1. **Merge** - union rectangles whose padded forms intersect, until no such
//!    pair is left.
//! 2. **Refine** - drop degenerate shapes and split large rectangles along
//!    whitespace rows, then along whitespace columns inside each row.
//! 3. **Keep filter** - geometric and edge-density tests that separate text
//!    lines from icons, buttons and photographic texture.
//! 4. **Consolidate** - greedily join nearly aligned survivors, re-validating
//!    every union with the keep filter.
//!
//! Activity is always measured on the [`EdgeMask`] of kept components.

use tracing::debug;

use crate::core::config::HeuristicParams;
use crate::processors::TextRect;
use crate::processors::raster::EdgeMask;

/// Half-open interval `start..end` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub start: i32,
    pub end: i32,
}

impl AxisRange {
    pub fn len(&self) -> i32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A band of rows inside a rectangle.
pub type RowRange = AxisRange;
/// A band of columns inside a row.
pub type ColumnRange = AxisRange;

/// Unions rectangles whose `padding`-inflated forms intersect until no such
/// pair remains.
///
/// The result is independent of thread scheduling and only depends on the
/// input order; afterwards no two rectangles' inflated forms intersect.
pub fn merge_overlapping(mut rects: Vec<TextRect>, padding: i32) -> Vec<TextRect> {
    let mut changed = true;
    while changed {
        changed = false;
        let mut i = 0;
        while i < rects.len() {
            let mut j = i + 1;
            while j < rects.len() {
                if rects[i].inflate(padding).intersects(&rects[j].inflate(padding)) {
                    let other = rects.remove(j);
                    rects[i] = rects[i].union(&other);
                    changed = true;
                    j = i + 1;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }
    rects
}

/// Splits an activity profile into active spans.
///
/// A position is whitespace when its activity is at most `threshold`; a run of
/// `min_gap` whitespace positions closes the current span. Leading and trailing
/// whitespace never belongs to a span.
pub fn segment_runs(
    activity: impl IntoIterator<Item = usize>,
    origin: i32,
    threshold: usize,
    min_gap: i32,
) -> Vec<AxisRange> {
    let mut spans = Vec::new();
    let mut start: Option<i32> = None;
    let mut gap = 0;
    let mut position = origin;

    for value in activity {
        if value > threshold {
            start.get_or_insert(position);
            gap = 0;
        } else if let Some(span_start) = start {
            gap += 1;
            if gap >= min_gap {
                spans.push(AxisRange {
                    start: span_start,
                    end: position - gap + 1,
                });
                start = None;
                gap = 0;
            }
        }
        position += 1;
    }

    if let Some(span_start) = start {
        spans.push(AxisRange {
            start: span_start,
            end: position - gap,
        });
    }
    spans
}

/// Applies the refine, keep and consolidate passes against one edge mask.
#[derive(Debug, Clone, Copy)]
pub struct RectangleRefiner<'a> {
    mask: &'a EdgeMask,
    params: &'a HeuristicParams,
}

impl<'a> RectangleRefiner<'a> {
    pub fn new(mask: &'a EdgeMask, params: &'a HeuristicParams) -> Self {
        Self { mask, params }
    }

    /// Runs all four passes over raw component bounds.
    pub fn run(&self, components: Vec<TextRect>) -> Vec<TextRect> {
        let component_count = components.len();
        let merged = merge_overlapping(components, self.params.merge_padding);
        let refined: Vec<TextRect> = merged.iter().flat_map(|rect| self.refine(rect)).collect();
        let kept: Vec<TextRect> = refined
            .iter()
            .copied()
            .filter(|rect| self.should_keep(rect))
            .collect();
        debug!(
            components = component_count,
            merged = merged.len(),
            refined = refined.len(),
            kept = kept.len(),
            "rectangle passes"
        );
        self.consolidate(kept)
    }

    /// Rejects degenerate shapes and splits large rectangles along whitespace.
    pub fn refine(&self, rect: &TextRect) -> Vec<TextRect> {
        let p = self.params;
        if rect.width < p.refine_min_side || rect.height < p.refine_min_side {
            return Vec::new();
        }
        if rect.height > p.tall_narrow_factor * rect.width && rect.width < p.tall_narrow_max_width
        {
            return Vec::new();
        }
        if rect.height >= p.strip_min_height && rect.width <= p.strip_max_width {
            return Vec::new();
        }

        let splittable = rect.area() > p.split_min_area as i64
            && rect.width > p.refine_min_side
            && rect.height > p.refine_min_side;
        if !splittable {
            return vec![*rect];
        }

        let pieces = self.split(rect);
        if !pieces.is_empty() {
            return pieces;
        }
        self.global_span(rect).into_iter().collect()
    }

    /// Keep filter for candidate text lines.
    pub fn should_keep(&self, rect: &TextRect) -> bool {
        let p = self.params;
        if rect.width < p.keep_min_width
            || rect.height < p.keep_min_height
            || rect.height > p.keep_max_height
            || rect.aspect_ratio() < p.keep_min_aspect
        {
            return false;
        }

        let area = rect.area() as f32;
        let density = self.mask.count_in(rect) as f32 / area;
        if density < p.keep_min_density {
            return false;
        }
        let column_fill = self.mask.filled_columns(rect) as f32 / rect.width as f32;
        !(density >= p.solid_density && column_fill >= p.solid_column_fill)
    }

    /// Greedily joins nearly aligned rectangles in (top, left) order.
    pub fn consolidate(&self, mut sorted: Vec<TextRect>) -> Vec<TextRect> {
        sorted.sort_by_key(|rect| (rect.top(), rect.left()));

        let mut result: Vec<TextRect> = Vec::with_capacity(sorted.len());
        for rect in sorted {
            let target = result.iter().position(|existing| {
                self.nearly_aligned(existing, &rect) && self.should_keep(&existing.union(&rect))
            });
            match target {
                Some(index) => result[index] = result[index].union(&rect),
                None => result.push(rect),
            }
        }
        result
    }

    fn nearly_aligned(&self, a: &TextRect, b: &TextRect) -> bool {
        let min_height = a.height.min(b.height);
        if min_height <= 0 {
            return false;
        }
        let overlap = a.vertical_overlap(b) as f32;
        let max_gap = (2 * min_height).min(self.params.consolidate_max_gap);
        overlap >= self.params.consolidate_overlap * min_height as f32
            && a.horizontal_gap(b) <= max_gap
    }

    /// Row scan followed by a column scan inside each surviving row.
    fn split(&self, rect: &TextRect) -> Vec<TextRect> {
        let p = self.params;
        let (width, height) = (self.mask.width(), self.mask.height());

        let row_threshold = p.row_activity_floor.max(rect.width / p.row_activity_divisor);
        let row_gap = p.row_gap_floor.max(rect.height / p.row_gap_divisor);
        let rows = segment_runs(
            (rect.top()..rect.bottom())
                .map(|y| self.mask.count_row(y, rect.left(), rect.right())),
            rect.top(),
            row_threshold.max(0) as usize,
            row_gap,
        );

        let mut pieces = Vec::new();
        for row in rows {
            for column in self.column_spans(rect, &row) {
                let piece = TextRect::from_edges(column.start, row.start, column.end, row.end)
                    .inflate(p.span_inflate)
                    .clamp_to(width, height);
                if !piece.is_empty() {
                    pieces.push(piece);
                }
            }
        }
        pieces
    }

    fn column_spans(&self, rect: &TextRect, row: &RowRange) -> Vec<ColumnRange> {
        let p = self.params;
        let row_height = row.len();
        let threshold = p
            .column_activity_floor
            .max(row_height / p.column_activity_divisor);
        let min_gap = 1.max(p.column_gap_cap.min(row_height / 2));
        segment_runs(
            (rect.left()..rect.right()).map(|x| self.mask.count_column(x, row.start, row.end)),
            rect.left(),
            threshold.max(0) as usize,
            min_gap,
        )
    }

    /// Fallback for rectangles whose activity never crossed the thresholds.
    ///
    /// Keeps the span between the first and last active columns when it is
    /// wide and dense enough.
    fn global_span(&self, rect: &TextRect) -> Option<TextRect> {
        let p = self.params;
        let active = |x: &i32| self.mask.count_column(*x, rect.top(), rect.bottom()) > 0;
        let first = (rect.left()..rect.right()).find(active)?;
        let last = (rect.left()..rect.right()).rev().find(active)?;

        let span = TextRect::from_edges(first, rect.top(), last + 1, rect.bottom());
        if span.width < p.fallback_min_width {
            return None;
        }
        let density = self.mask.count_in(&span) as f32 / span.area() as f32;
        if density < p.fallback_min_density {
            return None;
        }
        let span = span
            .inflate(p.span_inflate)
            .clamp_to(self.mask.width(), self.mask.height());
        (!span.is_empty()).then_some(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mask with every even column of `rect` set.
    fn striped(mask: &mut EdgeMask, rect: TextRect) {
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                if x % 2 == 0 {
                    mask.set(x, y, true);
                }
            }
        }
    }

    fn filled(mask: &mut EdgeMask, rect: TextRect) {
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                mask.set(x, y, true);
            }
        }
    }

    #[test]
    fn test_merge_respects_padding_boundary() {
        let near = merge_overlapping(
            vec![TextRect::new(0, 0, 10, 10), TextRect::new(17, 0, 10, 10)],
            4,
        );
        assert_eq!(near, vec![TextRect::new(0, 0, 27, 10)]);

        let apart = merge_overlapping(
            vec![TextRect::new(0, 0, 10, 10), TextRect::new(18, 0, 10, 10)],
            4,
        );
        assert_eq!(apart.len(), 2);
    }

    #[test]
    fn test_merge_reaches_fixed_point() {
        // The third rectangle only touches the union of the first two.
        let rects = vec![
            TextRect::new(0, 0, 10, 10),
            TextRect::new(40, 0, 10, 10),
            TextRect::new(12, 0, 26, 10),
            TextRect::new(200, 200, 10, 10),
        ];
        let merged = merge_overlapping(rects, 4);
        assert_eq!(merged.len(), 2);
        for (i, a) in merged.iter().enumerate() {
            for b in merged.iter().skip(i + 1) {
                assert!(!a.inflate(4).intersects(&b.inflate(4)));
            }
        }
    }

    #[test]
    fn test_segment_runs_closes_on_gap() {
        let activity = [0, 9, 9, 0, 9, 0, 0, 9, 0];
        let spans = segment_runs(activity, 10, 0, 2);
        assert_eq!(
            spans,
            vec![
                AxisRange { start: 11, end: 15 },
                AxisRange { start: 17, end: 18 },
            ]
        );
    }

    #[test]
    fn test_segment_runs_all_whitespace() {
        assert!(segment_runs([1, 0, 2], 0, 2, 1).is_empty());
    }

    #[test]
    fn test_refine_rejects_degenerate_shapes() {
        let mask = EdgeMask::new(400, 400, true);
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);
        assert!(refiner.refine(&TextRect::new(0, 0, 5, 40)).is_empty());
        assert!(refiner.refine(&TextRect::new(0, 0, 10, 70)).is_empty());
        assert!(refiner.refine(&TextRect::new(0, 0, 150, 320)).is_empty());
    }

    #[test]
    fn test_refine_keeps_small_rect_whole() {
        let mask = EdgeMask::new(100, 100, false);
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);
        let rect = TextRect::new(10, 10, 40, 20);
        assert_eq!(refiner.refine(&rect), vec![rect]);
    }

    #[test]
    fn test_refine_splits_rows() {
        let mut mask = EdgeMask::new(200, 100, false);
        striped(&mut mask, TextRect::new(10, 10, 100, 10));
        striped(&mut mask, TextRect::new(10, 40, 100, 10));
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);

        let pieces = refiner.refine(&TextRect::new(8, 8, 104, 44));
        assert_eq!(
            pieces,
            vec![TextRect::new(9, 9, 101, 12), TextRect::new(9, 39, 101, 12)]
        );
    }

    #[test]
    fn test_refine_splits_columns_on_wide_gap() {
        let mut mask = EdgeMask::new(300, 60, false);
        striped(&mut mask, TextRect::new(10, 10, 60, 24));
        striped(&mut mask, TextRect::new(120, 10, 60, 24));
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);

        let pieces = refiner.refine(&TextRect::new(8, 8, 174, 28));
        assert_eq!(pieces.len(), 2);
        assert!(pieces[0].right() < pieces[1].left());
    }

    #[test]
    fn test_refine_sparse_rect_uses_global_span() {
        // Three marks per row never cross the row threshold but still give a
        // density of 0.03.
        let mut mask = EdgeMask::new(200, 100, false);
        for y in 10..30 {
            let step = y - 10;
            for x in [10 + step, 40 + 2 * step, 80 + step] {
                mask.set(x, y, true);
            }
        }
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);
        let rect = TextRect::new(10, 10, 100, 20);
        assert_eq!(refiner.refine(&rect), vec![TextRect::new(9, 9, 92, 22)]);

        let empty = EdgeMask::new(200, 100, false);
        let refiner = RectangleRefiner::new(&empty, &params);
        assert!(refiner.refine(&rect).is_empty());
    }

    #[test]
    fn test_global_span_trims_to_active_columns() {
        // Five marks per row confined to columns 10..25 of a 200 px wide rect.
        let mut mask = EdgeMask::new(300, 100, false);
        for y in 10..30 {
            for k in 0..5 {
                mask.set(10 + (y + 3 * k) % 15, y, true);
            }
        }
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);
        let rect = TextRect::new(10, 10, 200, 20);
        assert_eq!(refiner.refine(&rect), vec![TextRect::new(9, 9, 17, 22)]);
    }

    #[test]
    fn test_global_span_rejects_narrow_activity() {
        let mut mask = EdgeMask::new(300, 100, false);
        for y in 10..30 {
            for k in 0..5 {
                mask.set(10 + (y + 2 * k) % 10, y, true);
            }
        }
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);
        assert!(refiner.refine(&TextRect::new(10, 10, 200, 20)).is_empty());
    }

    #[test]
    fn test_should_keep() {
        let mut mask = EdgeMask::new(300, 300, false);
        striped(&mut mask, TextRect::new(0, 0, 100, 20));
        filled(&mut mask, TextRect::new(0, 100, 100, 20));
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);

        assert!(refiner.should_keep(&TextRect::new(0, 0, 100, 20)));
        // Solid texture.
        assert!(!refiner.should_keep(&TextRect::new(0, 100, 100, 20)));
        // Square.
        assert!(!refiner.should_keep(&TextRect::new(0, 0, 20, 20)));
        // Too sparse.
        assert!(!refiner.should_keep(&TextRect::new(0, 200, 100, 20)));
        // Too thin.
        assert!(!refiner.should_keep(&TextRect::new(0, 0, 100, 7)));
    }

    #[test]
    fn test_consolidate_joins_aligned_neighbours() {
        let mut mask = EdgeMask::new(300, 300, false);
        striped(&mut mask, TextRect::new(0, 0, 300, 300));
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);

        let result = refiner.consolidate(vec![
            TextRect::new(10, 60, 40, 20),
            TextRect::new(60, 12, 40, 20),
            TextRect::new(10, 10, 40, 20),
        ]);
        assert_eq!(
            result,
            vec![TextRect::new(10, 10, 90, 22), TextRect::new(10, 60, 40, 20)]
        );
    }

    #[test]
    fn test_consolidate_revalidates_union() {
        let mut mask = EdgeMask::new(400, 400, false);
        striped(&mut mask, TextRect::new(0, 0, 400, 400));
        let params = HeuristicParams::default();
        let refiner = RectangleRefiner::new(&mask, &params);

        // Aligned, but the union would exceed the maximum height.
        let result = refiner.consolidate(vec![
            TextRect::new(0, 0, 300, 150),
            TextRect::new(0, 60, 300, 150),
        ]);
        assert_eq!(result.len(), 2);
    }
}
