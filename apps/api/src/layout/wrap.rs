//! Greedy word wrap against a static metric table.

use crate::layout::font_metrics::FontMetricTable;

/// Wraps `text` into lines no wider than `max_width_mm` at `size_pt`.
///
/// Explicit `\n` always starts a new line (an empty paragraph yields an empty
/// line). Runs of whitespace collapse to one space. A single word wider than the
/// column is split between characters. Empty input returns no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_mm: f32,
) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    let space_w = metrics.space_width_mm(size_pt);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_w = metrics.measure_mm(word, size_pt);

            if current.is_empty() {
                if word_w <= max_width_mm {
                    current.push_str(word);
                    current_width = word_w;
                } else {
                    current_width = push_split_word(
                        word,
                        metrics,
                        size_pt,
                        max_width_mm,
                        &mut lines,
                        &mut current,
                    );
                }
            } else if current_width + space_w + word_w <= max_width_mm {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
            } else {
                // Current line is full; flush it and start the word on a new line.
                lines.push(std::mem::take(&mut current));
                if word_w <= max_width_mm {
                    current.push_str(word);
                    current_width = word_w;
                } else {
                    current_width = push_split_word(
                        word,
                        metrics,
                        size_pt,
                        max_width_mm,
                        &mut lines,
                        &mut current,
                    );
                }
            }
        }
        lines.push(current);
    }

    lines
}

/// Splits an over-wide word across lines. Full chunks go to `lines`; the
/// trailing chunk is left in `current` and its width returned.
fn push_split_word(
    word: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_mm: f32,
    lines: &mut Vec<String>,
    current: &mut String,
) -> f32 {
    let mut width = 0.0_f32;
    for c in word.chars() {
        let mut buf = [0u8; 4];
        let char_w = metrics.measure_mm(c.encode_utf8(&mut buf), size_pt);
        if !current.is_empty() && width + char_w > max_width_mm {
            lines.push(std::mem::take(current));
            width = 0.0;
        }
        current.push(c);
        width += char_w;
    }
    width
}
