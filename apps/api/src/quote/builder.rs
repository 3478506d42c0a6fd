//! Quote Document Builder: lays out and renders the two-party quote PDF.
//!
//! # Regions, top to bottom
//! - title + date line
//! - vendor block, anchored top-right
//! - client block, anchored top-left under the title
//! - optional site location
//! - separator at max(flow position, `SEPARATOR_MIN_Y_MM`)
//! - narrative sections, optional validity and notes
//! - disclaimer footer in small muted text
//!
//! Optional fields that are blank produce no output at all, not even a label.

use bytes::Bytes;
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, warn};

use crate::layout::font_metrics::{FontFace, PageConfig};
use crate::layout::fonts::FontSet;
use crate::layout::page::{LaidOutPage, PageWriter, Rgb, BLACK};
use crate::layout::render::{render_pdf, RenderError};
use crate::layout::text::TextMode;
use crate::quote::models::{non_blank, QuoteRequest};
use crate::quote::sections::{
    narrative_sections, validity_line, CLIENT_HEADING, DISCLAIMER, NOTES_HEADING, SITE_HEADING,
    TITLE,
};

const VENDOR_BOX_W_MM: f32 = 85.0;
const VENDOR_BOX_Y_MM: f32 = 10.0;
const CLIENT_BOX_W_MM: f32 = 120.0;
const CLIENT_BOX_Y_MM: f32 = 32.0;
const SEPARATOR_MIN_Y_MM: f32 = 55.0;
const BLOCK_GAP_MM: f32 = 2.0;

const SEPARATOR_COLOR: Rgb = (200, 200, 200);
const FOOTER_COLOR: Rgb = (120, 120, 120);

const DOCUMENT_TITLE: &str = "Quote proposal";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("estimate cannot be rendered: {0}")]
    InvalidEstimate(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Pages ready for serialization, with the mode they were laid out in.
#[derive(Debug, Clone)]
pub struct QuoteLayout {
    pub mode: TextMode,
    pub pages: Vec<LaidOutPage>,
}

impl QuoteLayout {
    /// Every text run on every page, in emission order.
    #[cfg(test)]
    pub fn texts(&self) -> Vec<&str> {
        self.pages.iter().flat_map(|p| p.texts()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct RenderedQuote {
    pub bytes: Bytes,
    pub mode: TextMode,
    pub page_count: usize,
}

/// `quote_<YYYYMMDD_HHMMSS>.pdf`
pub fn quote_file_name(at: NaiveDateTime) -> String {
    format!("quote_{}.pdf", at.format("%Y%m%d_%H%M%S"))
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Lays out and renders a quote.
///
/// The text mode follows `fonts`. If the Unicode fonts cannot be embedded the
/// whole document is laid out again with the core fonts, so output is never mixed.
pub fn build_quote(
    request: &QuoteRequest,
    fonts: &FontSet,
    config: &PageConfig,
) -> Result<RenderedQuote, QuoteError> {
    match build_with(request, fonts, config) {
        Err(QuoteError::Render(RenderError::Font(reason)))
            if matches!(fonts, FontSet::Unicode { .. }) =>
        {
            warn!("Unicode fonts could not be embedded ({reason}); falling back to core fonts");
            build_with(request, &FontSet::Core, config)
        }
        other => other,
    }
}

fn build_with(
    request: &QuoteRequest,
    fonts: &FontSet,
    config: &PageConfig,
) -> Result<RenderedQuote, QuoteError> {
    let layout = layout_quote(request, fonts.mode(), config)?;
    let bytes = render_pdf(DOCUMENT_TITLE, &layout.pages, fonts, config)?;
    debug!(
        "Rendered quote: {} page(s), {} bytes, mode {:?}",
        layout.pages.len(),
        bytes.len(),
        layout.mode
    );

    Ok(RenderedQuote {
        bytes: Bytes::from(bytes),
        mode: layout.mode,
        page_count: layout.pages.len(),
    })
}

/// Positions every region of the quote. Pure; no I/O.
pub fn layout_quote(
    request: &QuoteRequest,
    mode: TextMode,
    config: &PageConfig,
) -> Result<QuoteLayout, QuoteError> {
    validate_renderable(request)?;

    let mut pdf = PageWriter::new(config.clone(), mode);
    let left = config.margin_left_mm;
    let right = config.content_right_mm();

    // Title + date
    pdf.set_font(FontFace::Bold, 16.0);
    pdf.cell(0.0, 8.0, TITLE, true);
    pdf.set_font(FontFace::Regular, 10.0);
    pdf.cell(
        0.0,
        6.0,
        &format!("Date: {}", request.issued_on.format("%d/%m/%Y")),
        true,
    );

    // Vendor, top-right
    let vendor_lines = request.vendor.lines();
    let vendor_bottom = draw_block(
        &mut pdf,
        right - VENDOR_BOX_W_MM,
        VENDOR_BOX_Y_MM,
        VENDOR_BOX_W_MM,
        &vendor_lines,
    );

    // Client, top-left
    let mut client_lines = request.client.lines();
    if !client_lines.is_empty() {
        client_lines.insert(0, CLIENT_HEADING.to_string());
    }
    let client_bottom = draw_block(
        &mut pdf,
        left,
        CLIENT_BOX_Y_MM,
        CLIENT_BOX_W_MM,
        &client_lines,
    );
    let mut flow_y = match client_bottom {
        Some(bottom) => bottom + BLOCK_GAP_MM,
        None => CLIENT_BOX_Y_MM,
    };

    if let Some(site) = non_blank(&request.metadata.site_location) {
        pdf.set_xy(left, flow_y);
        pdf.set_font(FontFace::Bold, 11.0);
        pdf.cell(0.0, 6.0, SITE_HEADING, true);
        pdf.set_font(FontFace::Regular, 10.0);
        pdf.multi_cell(0.0, 5.0, site);
        flow_y = pdf.y() + BLOCK_GAP_MM;
    }

    // Separator below whichever block reaches lowest
    if let Some(bottom) = vendor_bottom {
        flow_y = flow_y.max(bottom + BLOCK_GAP_MM);
    }
    pdf.set_xy(left, flow_y.max(SEPARATOR_MIN_Y_MM));
    pdf.set_draw_color(SEPARATOR_COLOR);
    pdf.line(left, right);
    pdf.ln(5.0);

    for section in narrative_sections(&request.input, &request.estimate) {
        write_section(&mut pdf, section.heading, &section.body);
    }

    if let Some(days) = non_blank(&request.metadata.validity_days) {
        pdf.set_font(FontFace::Regular, 10.0);
        pdf.multi_cell(0.0, 5.0, &validity_line(days));
        pdf.ln(2.0);
    }

    if let Some(notes) = non_blank(&request.metadata.notes) {
        pdf.set_font(FontFace::Bold, 10.0);
        pdf.cell(0.0, 6.0, NOTES_HEADING, true);
        pdf.set_font(FontFace::Regular, 10.0);
        pdf.multi_cell(0.0, 5.0, notes);
        pdf.ln(2.0);
    }

    // Footer
    pdf.set_font(FontFace::Regular, 8.0);
    pdf.set_text_color(FOOTER_COLOR);
    pdf.multi_cell(0.0, 4.0, DISCLAIMER);
    pdf.set_text_color(BLACK);

    Ok(QuoteLayout {
        mode,
        pages: pdf.finish(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Stacks `lines` in a box at (x, y). Returns the cursor y below the block,
/// or `None` when there was nothing to draw.
fn draw_block(pdf: &mut PageWriter, x: f32, y: f32, w: f32, lines: &[String]) -> Option<f32> {
    if lines.is_empty() {
        return None;
    }
    pdf.set_xy(x, y);
    pdf.set_font(FontFace::Regular, 10.0);
    for line in lines {
        pdf.multi_cell(w, 5.0, line);
        pdf.set_x(x);
    }
    Some(pdf.y())
}

fn write_section(pdf: &mut PageWriter, heading: &str, body: &str) {
    pdf.set_font(FontFace::Bold, 11.0);
    pdf.multi_cell(0.0, 6.0, heading);
    pdf.ln(1.0);
    pdf.set_font(FontFace::Regular, 10.0);
    pdf.multi_cell(0.0, 5.0, body);
    pdf.ln(2.0);
}

fn validate_renderable(request: &QuoteRequest) -> Result<(), QuoteError> {
    let estimate = &request.estimate;
    let figures = [
        ("estimated hours", estimate.estimated_hours),
        ("unit price", estimate.unit_price_ex_tax),
        ("total ex tax", estimate.total_price_ex_tax),
        ("total inc tax", estimate.total_price_inc_tax),
        ("area", request.input.area_m2),
        ("vegetation height", request.input.vegetation_height_cm),
    ];
    for (name, value) in figures {
        if !value.is_finite() || value < 0.0 {
            return Err(QuoteError::InvalidEstimate(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    use crate::layout::font_metrics::{default_page_config, get_metrics, PT_TO_MM};
    use crate::layout::page::DrawOp;
    use crate::pricing::engine::{estimate, EstimateInput};
    use crate::pricing::profiles::{PricingConfig, TerrainType};
    use crate::quote::models::{PartyInfo, QuoteMetadata};

    fn make_request(vendor: PartyInfo, client: PartyInfo, metadata: QuoteMetadata) -> QuoteRequest {
        let input = EstimateInput {
            terrain: TerrainType::Field,
            area_m2: 1000.0,
            vegetation_height_cm: 55.0,
            crew_size: 2,
            margin_percent: 25.0,
        };
        QuoteRequest {
            input,
            estimate: estimate(&input, &PricingConfig::reference()).unwrap(),
            vendor,
            client,
            metadata,
            issued_on: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        }
    }

    fn blank_request() -> QuoteRequest {
        make_request(PartyInfo::default(), PartyInfo::default(), QuoteMetadata::default())
    }

    fn full_request() -> QuoteRequest {
        make_request(
            PartyInfo {
                name: Some("Verde Limpo, Lda.".to_string()),
                tax_id: Some("500 123 456".to_string()),
                address: Some("Rua das Flores 12, Braga".to_string()),
                phone: Some("+351 253 000 000".to_string()),
                email: Some("geral@verdelimpo.pt".to_string()),
            },
            PartyInfo {
                name: Some("João Ferreira".to_string()),
                tax_id: None,
                address: Some("Quinta do Souto, Guimarães".to_string()),
                phone: Some("   ".to_string()),
                email: None,
            },
            QuoteMetadata {
                site_location: Some("Lote 7, Souto — next to the chapel".to_string()),
                validity_days: Some(" 30 ".to_string()),
                notes: Some("Green waste removal quoted separately at 25 € per trip.".to_string()),
            },
        )
    }

    fn lay_out(request: &QuoteRequest, mode: TextMode) -> QuoteLayout {
        layout_quote(request, mode, &default_page_config()).unwrap()
    }

    fn bundled_fonts() -> FontSet {
        FontSet::discover(&Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts"))
    }

    fn rule_y(layout: &QuoteLayout) -> f32 {
        layout.pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Rule { y_mm, .. } => Some(*y_mm),
                DrawOp::Text { .. } => None,
            })
            .expect("separator rule")
    }

    // ── Scenario D: nothing optional supplied ───────────────────────────────

    #[test]
    fn test_blank_optional_fields_render_core_regions_only() {
        let layout = lay_out(&blank_request(), TextMode::Unicode);
        let texts = layout.texts();

        assert_eq!(texts[0], TITLE);
        assert_eq!(texts[1], "Date: 18/10/2026");
        assert_eq!(texts[2], "Introduction");
        let absent = [
            CLIENT_HEADING,
            SITE_HEADING,
            NOTES_HEADING,
            "Tax ID:",
            "Phone:",
            "Email:",
            "valid for",
        ];
        for label in absent {
            assert!(
                !texts.iter().any(|t| t.contains(label)),
                "unexpected '{label}' in blank quote"
            );
        }
        assert!(texts.iter().any(|t| t.starts_with("Note: Values are estimated")));
        assert!(texts.iter().all(|t| !t.trim().is_empty()));
        assert_eq!(rule_y(&layout), SEPARATOR_MIN_Y_MM);
    }

    // ── Scenario E: ASCII-safe mode everywhere ───────────────────────────────

    #[test]
    fn test_ascii_safe_mode_has_no_euro_anywhere() {
        let layout = lay_out(&full_request(), TextMode::AsciiSafe);
        let texts = layout.texts();

        assert!(texts.iter().all(|t| !t.contains('€')));
        assert!(texts.iter().all(|t| !t.contains('—')));
        assert!(texts.iter().any(|t| t.contains("0.2001 EUR")));
        assert!(texts.iter().any(|t| t.contains("212.11 EUR")));
        // Notes body is user text, sanitized the same way.
        assert!(texts.iter().any(|t| t.contains("25 EUR")));
        // Latin-1 is representable and stays.
        assert!(texts.iter().any(|t| t.contains("João Ferreira")));
    }

    #[test]
    fn test_unicode_mode_keeps_euro() {
        let layout = lay_out(&full_request(), TextMode::Unicode);
        let texts = layout.texts();
        assert!(texts.iter().any(|t| t.contains("212.11 €")));
        assert!(texts.iter().all(|t| !t.contains("EUR")));
    }

    // ── Party blocks and optional metadata ───────────────────────────────────

    #[test]
    fn test_full_request_renders_party_blocks_and_metadata() {
        let layout = lay_out(&full_request(), TextMode::Unicode);
        let texts = layout.texts();

        assert!(texts.contains(&"Verde Limpo, Lda."));
        assert!(texts.contains(&"Tax ID: 500 123 456"));
        assert!(texts.contains(&"Email: geral@verdelimpo.pt"));
        assert!(texts.contains(&CLIENT_HEADING));
        assert!(texts.contains(&"João Ferreira"));
        // Whitespace-only phone is omitted; only the vendor has a phone line.
        assert_eq!(texts.iter().filter(|t| t.starts_with("Phone:")).count(), 1);
        assert!(texts.contains(&SITE_HEADING));
        assert!(texts.contains(&"Quote valid for 30 days."));
        assert!(texts.contains(&NOTES_HEADING));
    }

    #[test]
    fn test_vendor_block_is_anchored_top_right() {
        let config = default_page_config();
        let layout = layout_quote(&full_request(), TextMode::Unicode, &config).unwrap();
        let vendor_x = layout.pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x_mm, text, .. } if text == "Verde Limpo, Lda." => Some(*x_mm),
                _ => None,
            })
            .unwrap();
        let expected = config.content_right_mm() - VENDOR_BOX_W_MM + config.cell_padding_mm;
        assert!((vendor_x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_separator_drops_below_tall_blocks() {
        let mut request = full_request();
        request.metadata.site_location = Some(
            [
                "A long description of the site that keeps going.",
                "Second line.",
                "Third line.",
                "Fourth line.",
            ]
            .join("\n"),
        );
        let layout = lay_out(&request, TextMode::Unicode);
        let y = rule_y(&layout);
        assert!(y > SEPARATOR_MIN_Y_MM, "separator at {y}");

        // Every text op before the rule sits above it.
        for op in &layout.pages[0].ops {
            match op {
                DrawOp::Rule { .. } => break,
                DrawOp::Text { baseline_mm, .. } => assert!(*baseline_mm < y),
            }
        }
    }

    #[test]
    fn test_long_notes_spill_onto_second_page() {
        let mut request = full_request();
        let condition = "Extra condition for the works on site.";
        request.metadata.notes = Some(vec![condition; 80].join("\n"));
        let layout = lay_out(&request, TextMode::AsciiSafe);
        assert!(layout.pages.len() >= 2);
        // The footer closes the last page.
        let last = layout.pages.last().unwrap().texts().last().unwrap();
        assert!(DISCLAIMER.contains(last), "last text was '{last}'");
    }

    #[test]
    fn test_unicode_lines_stay_inside_the_column() {
        let config = default_page_config();
        let mut request = full_request();
        request.metadata.notes = Some(
            "Access to the lower terraces is by a narrow track, so the brush cutters and the \
             trimmer will be carried in by hand. Stumps, stones and irrigation pipes hidden in \
             the undergrowth will be marked before cutting. Quantities are confirmed on the \
             day with the owner, and any extra surface is charged at the same unit rate. \
             mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm \
             mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm mmmmmmmm"
                .to_string(),
        );
        let layout = lay_out(&request, TextMode::Unicode);
        let right_limit = config.content_right_mm() - config.cell_padding_mm + 1e-3;

        for page in &layout.pages {
            for op in &page.ops {
                if let DrawOp::Text {
                    x_mm,
                    text,
                    face,
                    size_pt,
                    ..
                } = op
                {
                    let width = get_metrics(TextMode::Unicode, *face).measure_mm(text, *size_pt);
                    assert!(x_mm + width <= right_limit, "'{text}' ends at {}", x_mm + width);
                }
            }
        }

        // Lines of 'm' checked against the DejaVu Sans advances directly:
        // 'm' = 1995 and space = 651 font units of 2048.
        let advance_mm = |units: f32| units / 2048.0 * 10.0 * PT_TO_MM;
        let m_lines: Vec<(f32, &str)> = layout
            .pages
            .iter()
            .flat_map(|p| &p.ops)
            .filter_map(|op| match op {
                DrawOp::Text { x_mm, text, .. } if text.starts_with("mmmmmmmm") => {
                    Some((*x_mm, text.as_str()))
                }
                _ => None,
            })
            .collect();
        assert!(m_lines.len() >= 2);
        for (x_mm, text) in m_lines {
            let m_count = text.chars().filter(|c| *c == 'm').count() as f32;
            let space_count = text.chars().filter(|c| *c == ' ').count() as f32;
            let width = m_count * advance_mm(1995.0) + space_count * advance_mm(651.0);
            assert!(x_mm + width <= right_limit, "'{text}' ends at {}", x_mm + width);
        }
    }

    #[test]
    fn test_negative_estimate_is_rejected() {
        let mut request = blank_request();
        request.estimate.total_price_inc_tax = -1.0;
        let err = layout_quote(&request, TextMode::Unicode, &default_page_config()).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidEstimate(_)));
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    #[test]
    fn test_build_quote_with_core_fonts() {
        let rendered =
            build_quote(&full_request(), &FontSet::Core, &default_page_config()).unwrap();
        assert_eq!(rendered.mode, TextMode::AsciiSafe);
        assert!(rendered.bytes.starts_with(b"%PDF"));
        assert_eq!(rendered.page_count, 1);
    }

    #[test]
    fn test_build_quote_with_bundled_dejavu_fonts() {
        let fonts = bundled_fonts();
        let font_bytes = match &fonts {
            FontSet::Unicode { regular, .. } => regular.len(),
            FontSet::Core => panic!("bundled fonts not found"),
        };

        let rendered = build_quote(&full_request(), &fonts, &default_page_config()).unwrap();
        assert_eq!(rendered.mode, TextMode::Unicode);
        assert!(rendered.bytes.starts_with(b"%PDF"));
        // Fonts are embedded whole, not subset.
        assert!(rendered.bytes.len() > font_bytes);
    }

    #[test]
    fn test_unembeddable_fonts_fall_back_to_core_layout() {
        let fonts = FontSet::Unicode {
            regular: b"nope".to_vec(),
            bold: b"nope".to_vec(),
        };
        let rendered = build_quote(&full_request(), &fonts, &default_page_config()).unwrap();
        assert_eq!(rendered.mode, TextMode::AsciiSafe);
        assert!(rendered.bytes.starts_with(b"%PDF"));
        assert_eq!(rendered.page_count, 1);
    }

    #[test]
    fn test_quote_file_name_format() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(quote_file_name(at), "quote_20261018_090507.pdf");
    }
}
