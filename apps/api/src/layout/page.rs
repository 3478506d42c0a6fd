//! Cursor-based page writer producing positioned draw operations.
//!
//! Coordinates are millimetres from the top-left corner of the page. Every
//! string reaches a page through `emit_text`, which applies the document's
//! `TextMode` sanitizer, so no region can bypass the fallback.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{get_metrics, FontFace, FontMetricTable, PageConfig, PT_TO_MM};
use crate::layout::text::TextMode;
use crate::layout::wrap::wrap_text;

/// Ascent of the text baseline below the top of a line box, as a fraction of font size.
const BASELINE_RATIO: f32 = 0.35;

pub type Rgb = (u8, u8, u8);

pub const BLACK: Rgb = (0, 0, 0);

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Text {
        /// Left edge of the run.
        x_mm: f32,
        /// Baseline, measured from the top of the page.
        baseline_mm: f32,
        text: String,
        face: FontFace,
        size_pt: f32,
        color: Rgb,
    },
    Rule {
        x1_mm: f32,
        x2_mm: f32,
        y_mm: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaidOutPage {
    pub ops: Vec<DrawOp>,
}

impl LaidOutPage {
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Writer
// ────────────────────────────────────────────────────────────────────────────

pub struct PageWriter {
    config: PageConfig,
    mode: TextMode,
    pages: Vec<LaidOutPage>,
    x: f32,
    y: f32,
    face: FontFace,
    size_pt: f32,
    text_color: Rgb,
    draw_color: Rgb,
}

impl PageWriter {
    /// Starts a document with one empty page and the cursor at the top-left margin.
    pub fn new(config: PageConfig, mode: TextMode) -> Self {
        let (x, y) = (config.margin_left_mm, config.margin_top_mm);
        PageWriter {
            config,
            mode,
            pages: vec![LaidOutPage::default()],
            x,
            y,
            face: FontFace::Regular,
            size_pt: 10.0,
            text_color: BLACK,
            draw_color: BLACK,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_font(&mut self, face: FontFace, size_pt: f32) {
        self.face = face;
        self.size_pt = size_pt;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    /// Moves to the left margin, `h` millimetres down.
    pub fn ln(&mut self, h: f32) {
        self.x = self.config.margin_left_mm;
        self.y += h;
    }

    /// One unwrapped line of height `h`. `w = 0` extends to the right margin.
    /// With `newline`, the cursor moves to the left margin of the next line;
    /// otherwise it moves right by the cell width.
    pub fn cell(&mut self, w: f32, h: f32, text: &str, newline: bool) {
        self.break_page_if_needed(h);
        let w = self.resolve_width(w);
        let text_x = self.x + self.config.cell_padding_mm;
        self.emit_text(text_x, h, text);
        if newline {
            self.ln(h);
        } else {
            self.x += w;
        }
    }

    /// Word-wrapped block of lines of height `h` inside a box of width `w`
    /// (`w = 0` extends to the right margin). The cursor ends below the block at
    /// the block's starting x, so consecutive calls stack.
    pub fn multi_cell(&mut self, w: f32, h: f32, text: &str) {
        let w = self.resolve_width(w);
        let start_x = self.x;
        let inner = (w - 2.0 * self.config.cell_padding_mm).max(0.0);

        let sanitized = self.mode.sanitize(text).into_owned();
        let lines = wrap_text(&sanitized, self.metrics(), self.size_pt, inner);

        for line in lines {
            self.break_page_if_needed(h);
            self.x = start_x;
            let text_x = start_x + self.config.cell_padding_mm;
            self.emit_text(text_x, h, &line);
            self.y += h;
        }
        self.x = start_x;
    }

    /// Horizontal rule at the current y between two x positions.
    pub fn line(&mut self, x1: f32, x2: f32) {
        let color = self.draw_color;
        let y_mm = self.y;
        self.current_page().ops.push(DrawOp::Rule {
            x1_mm: x1,
            x2_mm: x2,
            y_mm,
            color,
        });
    }

    pub fn finish(self) -> Vec<LaidOutPage> {
        self.pages
    }

    fn metrics(&self) -> &'static FontMetricTable {
        get_metrics(self.mode, self.face)
    }

    fn resolve_width(&self, w: f32) -> f32 {
        if w > 0.0 {
            w
        } else {
            self.config.content_right_mm() - self.x
        }
    }

    fn break_page_if_needed(&mut self, h: f32) {
        if self.y + h > self.config.break_threshold_mm() {
            self.pages.push(LaidOutPage::default());
            self.y = self.config.margin_top_mm;
        }
    }

    /// The single place text is written. Empty strings produce no op.
    fn emit_text(&mut self, x_mm: f32, line_h: f32, text: &str) {
        let text = self.mode.sanitize(text).into_owned();
        if text.trim().is_empty() {
            return;
        }
        let size_mm = self.size_pt * PT_TO_MM;
        let baseline_mm = self.y + line_h / 2.0 + size_mm * BASELINE_RATIO;
        let op = DrawOp::Text {
            x_mm,
            baseline_mm,
            text,
            face: self.face,
            size_pt: self.size_pt,
            color: self.text_color,
        };
        self.current_page().ops.push(op);
    }

    fn current_page(&mut self) -> &mut LaidOutPage {
        // `pages` starts with one entry and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;

    fn writer(mode: TextMode) -> PageWriter {
        PageWriter::new(default_page_config(), mode)
    }

    #[test]
    fn test_cell_with_newline_advances_cursor() {
        let mut w = writer(TextMode::Unicode);
        w.set_xy(60.0, 10.0);
        w.cell(0.0, 8.0, "QUOTE PROPOSAL", true);
        assert_eq!(w.y(), 18.0);
        w.cell(0.0, 6.0, "Date: 18/10/2026", true);
        let pages = w.finish();
        let xs: Vec<f32> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x_mm, .. } => Some(*x_mm),
                DrawOp::Rule { .. } => None,
            })
            .collect();
        // The second cell starts back at the left margin.
        assert_eq!(xs, vec![61.0, 11.0]);
    }

    #[test]
    fn test_multi_cell_stacks_at_start_x() {
        let mut w = writer(TextMode::Unicode);
        w.set_xy(115.0, 10.0);
        w.multi_cell(85.0, 5.0, "ACME Clearing Ltd");
        w.multi_cell(85.0, 5.0, "Tax ID: 123");
        assert_eq!(w.y(), 20.0);
        let pages = w.finish();
        for op in &pages[0].ops {
            if let DrawOp::Text { x_mm, .. } = op {
                assert_eq!(*x_mm, 116.0);
            }
        }
    }

    #[test]
    fn test_blank_text_emits_nothing() {
        let mut w = writer(TextMode::AsciiSafe);
        w.cell(0.0, 6.0, "   ", true);
        w.multi_cell(0.0, 5.0, "");
        assert!(w.finish()[0].ops.is_empty());
    }

    #[test]
    fn test_ascii_safe_mode_sanitizes_every_call_site() {
        let mut w = writer(TextMode::AsciiSafe);
        w.cell(0.0, 6.0, "Cell 1 €", true);
        w.multi_cell(0.0, 5.0, "Block 2 €\nLine 3 €");
        let pages = w.finish();
        let texts: Vec<&str> = pages[0].texts().collect();
        assert_eq!(texts, vec!["Cell 1 EUR", "Block 2 EUR", "Line 3 EUR"]);
    }

    #[test]
    fn test_auto_page_break_at_bottom_margin() {
        let mut w = writer(TextMode::Unicode);
        w.set_xy(10.0, 270.0);
        let body = vec!["line"; 6].join("\n");
        w.multi_cell(0.0, 5.0, &body);
        let pages = w.finish();
        assert_eq!(pages.len(), 2);
        // 270 and 275 fit under the 282 mm threshold; 280 would not.
        assert_eq!(pages[0].texts().count(), 2);
        assert_eq!(pages[1].texts().count(), 4);
        match &pages[1].ops[0] {
            DrawOp::Text { baseline_mm, .. } => assert!(*baseline_mm < 20.0),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_line_records_rule_with_draw_color() {
        let mut w = writer(TextMode::Unicode);
        w.set_draw_color((200, 200, 200));
        w.set_xy(10.0, 55.0);
        w.line(10.0, 200.0);
        assert_eq!(
            w.finish()[0].ops,
            vec![DrawOp::Rule {
                x1_mm: 10.0,
                x2_mm: 200.0,
                y_mm: 55.0,
                color: (200, 200, 200)
            }]
        );
    }
}
