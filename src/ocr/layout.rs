//! Reading-order reconstruction for unordered text regions.

use std::cmp::Ordering;

use super::types::{OcrOutcome, RecognizedRegion};

/// Top-to-bottom by vertical center, then left-to-right by horizontal center.
pub fn reading_order(a: &RecognizedRegion, b: &RecognizedRegion) -> Ordering {
    a.center_y
        .total_cmp(&b.center_y)
        .then_with(|| a.center_x.total_cmp(&b.center_x))
}

/// Join sorted regions into lines, inserting an empty line wherever the vertical
/// gap to the previous kept line exceeds `paragraph_gap`.
///
/// Blank regions are skipped and do not count as the previous line.
pub fn join_paragraphs(sorted: &[RecognizedRegion], paragraph_gap: f32) -> String {
    let mut lines: Vec<&str> = Vec::with_capacity(sorted.len());
    let mut last_y: Option<f32> = None;

    for region in sorted {
        let text = region.text.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(prev) = last_y
            && region.center_y - prev > paragraph_gap
        {
            lines.push("");
        }

        lines.push(text);
        last_y = Some(region.center_y);
    }

    lines.join("\n")
}

/// Sort `regions` and build the outcome. Empty or all-blank input yields `NoText`.
pub fn compose(mut regions: Vec<RecognizedRegion>, paragraph_gap: f32) -> OcrOutcome {
    if regions.iter().all(RecognizedRegion::is_blank) {
        return OcrOutcome::NoText;
    }

    regions.sort_by(reading_order);
    let text = join_paragraphs(&regions, paragraph_gap);
    OcrOutcome::Text { regions, text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PARAGRAPH_GAP_THRESHOLD;

    fn region(text: &str, x: f32, y: f32) -> RecognizedRegion {
        RecognizedRegion {
            text: text.to_string(),
            center_x: x,
            center_y: y,
            width: 40.0,
            height: 12.0,
            angle: 0.0,
            score: 0.9,
        }
    }

    #[test]
    fn large_vertical_gap_starts_a_paragraph() {
        let out = compose(
            vec![region("second", 10.0, 120.0), region("first", 10.0, 50.0)],
            PARAGRAPH_GAP_THRESHOLD,
        );
        assert_eq!(out.text(), "first\n\nsecond");
    }

    #[test]
    fn small_vertical_gap_stays_in_paragraph() {
        let out = compose(
            vec![region("a", 10.0, 50.0), region("b", 10.0, 45.0)],
            PARAGRAPH_GAP_THRESHOLD,
        );
        assert_eq!(out.text(), "b\na");
    }

    #[test]
    fn gap_equal_to_threshold_does_not_break() {
        let out = compose(
            vec![region("a", 0.0, 0.0), region("b", 0.0, 30.0)],
            PARAGRAPH_GAP_THRESHOLD,
        );
        assert_eq!(out.text(), "a\nb");
    }

    #[test]
    fn same_row_is_ordered_left_to_right() {
        let out = compose(
            vec![
                region("right", 200.0, 20.0),
                region("left", 10.0, 20.0),
                region("mid", 100.0, 20.0),
            ],
            PARAGRAPH_GAP_THRESHOLD,
        );
        let texts: Vec<_> = out.regions().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["left", "mid", "right"]);
    }

    #[test]
    fn blank_regions_are_skipped_and_trimmed() {
        let out = compose(
            vec![
                region("  hello ", 0.0, 10.0),
                region("   ", 0.0, 100.0),
                region("world", 0.0, 20.0),
            ],
            PARAGRAPH_GAP_THRESHOLD,
        );
        assert_eq!(out.text(), "hello\nworld");
    }

    #[test]
    fn empty_or_blank_input_is_no_text() {
        assert_eq!(compose(Vec::new(), PARAGRAPH_GAP_THRESHOLD), OcrOutcome::NoText);
        assert_eq!(
            compose(vec![region(" ", 0.0, 0.0), region("\t", 0.0, 9.0)], PARAGRAPH_GAP_THRESHOLD),
            OcrOutcome::NoText
        );
    }
}
