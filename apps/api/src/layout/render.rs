//! Serializes laid-out pages to PDF bytes with `printpdf`.
//!
//! Layout coordinates run top-down; PDF user space runs bottom-up, so every y
//! is flipped against the page height here and nowhere else.

use std::io::Cursor;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
    Rgb as PdfRgb,
};
use thiserror::Error;

use crate::layout::font_metrics::{FontFace, PageConfig};
use crate::layout::fonts::FontSet;
use crate::layout::page::{DrawOp, LaidOutPage, Rgb};

const RULE_THICKNESS_PT: f32 = 0.6;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot embed font: {0}")]
    Font(String),

    #[error("PDF serialization failed: {0}")]
    Pdf(String),
}

struct FontRefs {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl FontRefs {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }
}

/// Writes `pages` into a new PDF and returns its bytes.
///
/// `fonts` must be the set whose `TextMode` the pages were laid out in.
/// Unicode TTFs are embedded whole (printpdf 0.7 does not subset), so with the
/// bundled DejaVu pair every quote carries about 1.5 MB of font data. Core fonts
/// are referenced by name and add nothing.
pub fn render_pdf(
    title: &str,
    pages: &[LaidOutPage],
    fonts: &FontSet,
    config: &PageConfig,
) -> Result<Vec<u8>, RenderError> {
    let width = Mm(config.width_mm);
    let height = Mm(config.height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Page 1");

    let refs = match fonts {
        FontSet::Unicode { regular, bold } => FontRefs {
            regular: doc
                .add_external_font(Cursor::new(regular.as_slice()))
                .map_err(|e| RenderError::Font(e.to_string()))?,
            bold: doc
                .add_external_font(Cursor::new(bold.as_slice()))
                .map_err(|e| RenderError::Font(e.to_string()))?,
        },
        FontSet::Core => FontRefs {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| RenderError::Font(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| RenderError::Font(e.to_string()))?,
        },
    };

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, format!("Page {}", index + 1));
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, page, &refs, config);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn draw_page(layer: &PdfLayerReference, page: &LaidOutPage, refs: &FontRefs, config: &PageConfig) {
    layer.set_outline_thickness(RULE_THICKNESS_PT);

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x_mm,
                baseline_mm,
                text,
                face,
                size_pt,
                color,
            } => {
                layer.set_fill_color(pdf_color(*color));
                layer.use_text(
                    text.clone(),
                    *size_pt,
                    Mm(*x_mm),
                    Mm(config.height_mm - baseline_mm),
                    refs.get(*face),
                );
            }
            DrawOp::Rule {
                x1_mm,
                x2_mm,
                y_mm,
                color,
            } => {
                let y = Mm(config.height_mm - y_mm);
                layer.set_outline_color(pdf_color(*color));
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(*x1_mm), y), false),
                        (Point::new(Mm(*x2_mm), y), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }
}

fn pdf_color((r, g, b): Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}
