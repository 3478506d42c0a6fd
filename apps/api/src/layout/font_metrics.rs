//! Static font-metric tables for the two quote font families.
//!
//! Character widths are in em units (relative to font size). Helvetica widths
//! are the standard core-font AFM values. DejaVu Sans widths are the advance
//! widths of the bundled TTFs (`hmtx` / unitsPerEm), rounded up to 3 decimals
//! so a measured line is never shorter than the rendered one. printpdf applies
//! no kerning, so summing advances gives the exact run width.
//!
//! Every table covers ASCII 0x20..=0x7E (index = `c as usize - 32`) plus a
//! sorted supplement for Latin-1 and the typographic symbols the quote uses.
//! Anything else is measured at the widest glyph in the table.

use serde::{Deserialize, Serialize};

use crate::layout::text::TextMode;

/// Points to millimetres.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Font face
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Regular,
    Bold,
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Page geometry in millimetres.
///
/// `break_margin_mm` is the bottom margin: a line whose bottom would cross
/// `height_mm - break_margin_mm` starts a new page instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_top_mm: f32,
    pub margin_right_mm: f32,
    pub break_margin_mm: f32,
    /// Horizontal inset of text inside a cell, on each side.
    pub cell_padding_mm: f32,
}

impl PageConfig {
    pub fn content_right_mm(&self) -> f32 {
        self.width_mm - self.margin_right_mm
    }

    pub fn break_threshold_mm(&self) -> f32 {
        self.height_mm - self.break_margin_mm
    }
}

/// A4 portrait, 10 mm side/top margins, page break 15 mm above the bottom edge.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_left_mm: 10.0,
        margin_top_mm: 10.0,
        margin_right_mm: 10.0,
        break_margin_mm: 15.0,
        cell_padding_mm: 1.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face of a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Non-ASCII widths, sorted by char for binary search.
    supplement: &'static [(char, f32)],
    /// Width for characters in neither list. Never narrower than any known glyph.
    pub fallback_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Advance width of one character in em units.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match self.supplement.binary_search_by(|(k, _)| k.cmp(&c)) {
            Ok(i) => self.supplement[i].1,
            Err(_) => self.fallback_width,
        }
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Width of a string in millimetres at the given font size.
    pub fn measure_mm(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt * PT_TO_MM
    }

    pub fn space_width_mm(&self, size_pt: f32) -> f32 {
        self.space_width * size_pt * PT_TO_MM
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters + supplement each)
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica: PDF core font used in ASCII-safe mode. Standard AFM widths.
static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191,
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        0.334, 0.260, 0.334, 0.584,
    ],
    supplement: HELVETICA_SUPPLEMENT,
    fallback_width: 1.015,
    space_width: 0.278,
};

#[rustfmt::skip]
const HELVETICA_SUPPLEMENT: &[(char, f32)] = &[
    ('\u{00A0}', 0.278), ('¡', 0.333), ('¢', 0.556), ('£', 0.556), ('¤', 0.556), ('¥', 0.556),
    ('¦', 0.260), ('§', 0.556), ('¨', 0.333), ('©', 0.737), ('ª', 0.370), ('«', 0.556),
    ('¬', 0.584), ('\u{00AD}', 0.333), ('®', 0.737), ('¯', 0.333), ('°', 0.400), ('±', 0.584),
    ('²', 0.333), ('³', 0.333), ('´', 0.333), ('µ', 0.556), ('¶', 0.537), ('·', 0.278),
    ('¸', 0.333), ('¹', 0.333), ('º', 0.365), ('»', 0.556), ('¼', 0.834), ('½', 0.834),
    ('¾', 0.834), ('¿', 0.611), ('À', 0.667), ('Á', 0.667), ('Â', 0.667), ('Ã', 0.667),
    ('Ä', 0.667), ('Å', 0.667), ('Æ', 1.000), ('Ç', 0.722), ('È', 0.667), ('É', 0.667),
    ('Ê', 0.667), ('Ë', 0.667), ('Ì', 0.278), ('Í', 0.278), ('Î', 0.278), ('Ï', 0.278),
    ('Ð', 0.722), ('Ñ', 0.722), ('Ò', 0.778), ('Ó', 0.778), ('Ô', 0.778), ('Õ', 0.778),
    ('Ö', 0.778), ('×', 0.584), ('Ø', 0.778), ('Ù', 0.722), ('Ú', 0.722), ('Û', 0.722),
    ('Ü', 0.722), ('Ý', 0.667), ('Þ', 0.667), ('ß', 0.611), ('à', 0.556), ('á', 0.556),
    ('â', 0.556), ('ã', 0.556), ('ä', 0.556), ('å', 0.556), ('æ', 0.889), ('ç', 0.500),
    ('è', 0.556), ('é', 0.556), ('ê', 0.556), ('ë', 0.556), ('ì', 0.222), ('í', 0.222),
    ('î', 0.222), ('ï', 0.222), ('ð', 0.556), ('ñ', 0.556), ('ò', 0.556), ('ó', 0.556),
    ('ô', 0.556), ('õ', 0.556), ('ö', 0.556), ('÷', 0.584), ('ø', 0.611), ('ù', 0.556),
    ('ú', 0.556), ('û', 0.556), ('ü', 0.556), ('ý', 0.500), ('þ', 0.556), ('ÿ', 0.500),
];

/// Helvetica-Bold: PDF core font used in ASCII-safe mode. Standard AFM widths.
static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238,
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        0.389, 0.280, 0.389, 0.584,
    ],
    supplement: HELVETICA_BOLD_SUPPLEMENT,
    fallback_width: 1.000,
    space_width: 0.278,
};

#[rustfmt::skip]
const HELVETICA_BOLD_SUPPLEMENT: &[(char, f32)] = &[
    ('\u{00A0}', 0.278), ('¡', 0.333), ('¢', 0.556), ('£', 0.556), ('¤', 0.556), ('¥', 0.556),
    ('¦', 0.280), ('§', 0.556), ('¨', 0.333), ('©', 0.737), ('ª', 0.370), ('«', 0.556),
    ('¬', 0.584), ('\u{00AD}', 0.333), ('®', 0.737), ('¯', 0.333), ('°', 0.400), ('±', 0.584),
    ('²', 0.333), ('³', 0.333), ('´', 0.333), ('µ', 0.611), ('¶', 0.556), ('·', 0.278),
    ('¸', 0.333), ('¹', 0.333), ('º', 0.365), ('»', 0.556), ('¼', 0.834), ('½', 0.834),
    ('¾', 0.834), ('¿', 0.611), ('À', 0.722), ('Á', 0.722), ('Â', 0.722), ('Ã', 0.722),
    ('Ä', 0.722), ('Å', 0.722), ('Æ', 1.000), ('Ç', 0.722), ('È', 0.667), ('É', 0.667),
    ('Ê', 0.667), ('Ë', 0.667), ('Ì', 0.278), ('Í', 0.278), ('Î', 0.278), ('Ï', 0.278),
    ('Ð', 0.722), ('Ñ', 0.722), ('Ò', 0.778), ('Ó', 0.778), ('Ô', 0.778), ('Õ', 0.778),
    ('Ö', 0.778), ('×', 0.584), ('Ø', 0.778), ('Ù', 0.722), ('Ú', 0.722), ('Û', 0.722),
    ('Ü', 0.722), ('Ý', 0.667), ('Þ', 0.667), ('ß', 0.611), ('à', 0.556), ('á', 0.556),
    ('â', 0.556), ('ã', 0.556), ('ä', 0.556), ('å', 0.556), ('æ', 0.889), ('ç', 0.556),
    ('è', 0.556), ('é', 0.556), ('ê', 0.556), ('ë', 0.556), ('ì', 0.278), ('í', 0.278),
    ('î', 0.278), ('ï', 0.278), ('ð', 0.611), ('ñ', 0.611), ('ò', 0.611), ('ó', 0.611),
    ('ô', 0.611), ('õ', 0.611), ('ö', 0.611), ('÷', 0.584), ('ø', 0.611), ('ù', 0.611),
    ('ú', 0.611), ('û', 0.611), ('ü', 0.611), ('ý', 0.556), ('þ', 0.611), ('ÿ', 0.556),
];

/// DejaVu Sans: embedded TTF used in Unicode mode. Advance widths from `hmtx`, rounded up.
static DEJAVU_SANS_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        0.318, 0.401, 0.460, 0.838, 0.637, 0.951, 0.780, 0.275,
        0.391, 0.391, 0.500, 0.838, 0.318, 0.361, 0.318, 0.337,
        0.637, 0.637, 0.637, 0.637, 0.637, 0.637, 0.637, 0.637, 0.637, 0.637,
        0.337, 0.337, 0.838, 0.838, 0.838, 0.531, 1.000,
        0.685, 0.687, 0.699, 0.771, 0.632, 0.576, 0.775, 0.752, 0.295, 0.295, 0.656, 0.558, 0.863,
        0.749, 0.788, 0.604, 0.788, 0.695, 0.635, 0.611, 0.732, 0.685, 0.989, 0.686, 0.611, 0.686,
        0.391, 0.337, 0.391, 0.838, 0.500, 0.500,
        0.613, 0.635, 0.550, 0.635, 0.616, 0.353, 0.635, 0.634, 0.278, 0.278, 0.580, 0.278, 0.975,
        0.634, 0.612, 0.635, 0.635, 0.412, 0.521, 0.393, 0.634, 0.592, 0.818, 0.592, 0.592, 0.525,
        0.637, 0.337, 0.637, 0.838,
    ],
    supplement: DEJAVU_SANS_SUPPLEMENT,
    fallback_width: 1.000,
    space_width: 0.318,
};

#[rustfmt::skip]
const DEJAVU_SANS_SUPPLEMENT: &[(char, f32)] = &[
    ('\u{00A0}', 0.318), ('¡', 0.401), ('¢', 0.637), ('£', 0.637), ('¤', 0.637), ('¥', 0.637),
    ('¦', 0.337), ('§', 0.500), ('¨', 0.500), ('©', 1.000), ('ª', 0.472), ('«', 0.612),
    ('¬', 0.838), ('\u{00AD}', 0.361), ('®', 1.000), ('¯', 0.500), ('°', 0.500), ('±', 0.838),
    ('²', 0.401), ('³', 0.401), ('´', 0.500), ('µ', 0.637), ('¶', 0.637), ('·', 0.318),
    ('¸', 0.500), ('¹', 0.401), ('º', 0.472), ('»', 0.612), ('¼', 0.970), ('½', 0.970),
    ('¾', 0.970), ('¿', 0.531), ('À', 0.685), ('Á', 0.685), ('Â', 0.685), ('Ã', 0.685),
    ('Ä', 0.685), ('Å', 0.685), ('Æ', 0.975), ('Ç', 0.699), ('È', 0.632), ('É', 0.632),
    ('Ê', 0.632), ('Ë', 0.632), ('Ì', 0.295), ('Í', 0.295), ('Î', 0.295), ('Ï', 0.295),
    ('Ð', 0.775), ('Ñ', 0.749), ('Ò', 0.788), ('Ó', 0.788), ('Ô', 0.788), ('Õ', 0.788),
    ('Ö', 0.788), ('×', 0.838), ('Ø', 0.788), ('Ù', 0.732), ('Ú', 0.732), ('Û', 0.732),
    ('Ü', 0.732), ('Ý', 0.611), ('Þ', 0.605), ('ß', 0.630), ('à', 0.613), ('á', 0.613),
    ('â', 0.613), ('ã', 0.613), ('ä', 0.613), ('å', 0.613), ('æ', 0.982), ('ç', 0.550),
    ('è', 0.616), ('é', 0.616), ('ê', 0.616), ('ë', 0.616), ('ì', 0.278), ('í', 0.278),
    ('î', 0.278), ('ï', 0.278), ('ð', 0.612), ('ñ', 0.634), ('ò', 0.612), ('ó', 0.612),
    ('ô', 0.612), ('õ', 0.612), ('ö', 0.612), ('÷', 0.838), ('ø', 0.612), ('ù', 0.634),
    ('ú', 0.634), ('û', 0.634), ('ü', 0.634), ('ý', 0.592), ('þ', 0.635), ('ÿ', 0.592),
    ('\u{2010}', 0.361), ('\u{2011}', 0.361), ('\u{2012}', 0.637), ('\u{2013}', 0.500),
    ('\u{2014}', 1.000), ('\u{2015}', 1.000), ('\u{2018}', 0.318), ('\u{2019}', 0.318),
    ('\u{201A}', 0.318), ('\u{201C}', 0.519), ('\u{201D}', 0.519), ('\u{201E}', 0.519),
    ('\u{2020}', 0.500), ('\u{2021}', 0.500), ('\u{2022}', 0.590), ('\u{2026}', 1.000),
    ('\u{2032}', 0.228), ('\u{2033}', 0.374), ('\u{20AC}', 0.637), ('\u{2122}', 1.000),
    ('\u{2212}', 0.838),
];

/// DejaVu Sans Bold: embedded TTF used in Unicode mode. Advance widths from `hmtx`, rounded up.
static DEJAVU_SANS_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        0.349, 0.457, 0.521, 0.838, 0.696, 1.002, 0.873, 0.307,
        0.458, 0.458, 0.523, 0.838, 0.380, 0.416, 0.380, 0.366,
        0.696, 0.696, 0.696, 0.696, 0.696, 0.696, 0.696, 0.696, 0.696, 0.696,
        0.400, 0.400, 0.838, 0.838, 0.838, 0.581, 1.000,
        0.774, 0.763, 0.734, 0.831, 0.684, 0.684, 0.821, 0.837, 0.373, 0.373, 0.775, 0.638, 0.996,
        0.837, 0.851, 0.733, 0.851, 0.771, 0.721, 0.683, 0.813, 0.774, 1.104, 0.771, 0.725, 0.726,
        0.458, 0.366, 0.458, 0.838, 0.500, 0.500,
        0.675, 0.716, 0.593, 0.716, 0.679, 0.436, 0.716, 0.712, 0.343, 0.343, 0.666, 0.343, 1.042,
        0.712, 0.688, 0.716, 0.716, 0.494, 0.596, 0.479, 0.712, 0.652, 0.924, 0.646, 0.652, 0.583,
        0.712, 0.366, 0.712, 0.838,
    ],
    supplement: DEJAVU_SANS_BOLD_SUPPLEMENT,
    fallback_width: 1.104,
    space_width: 0.349,
};

#[rustfmt::skip]
const DEJAVU_SANS_BOLD_SUPPLEMENT: &[(char, f32)] = &[
    ('\u{00A0}', 0.349), ('¡', 0.457), ('¢', 0.696), ('£', 0.696), ('¤', 0.637), ('¥', 0.696),
    ('¦', 0.366), ('§', 0.500), ('¨', 0.500), ('©', 1.000), ('ª', 0.564), ('«', 0.646),
    ('¬', 0.838), ('\u{00AD}', 0.416), ('®', 1.000), ('¯', 0.500), ('°', 0.500), ('±', 0.838),
    ('²', 0.438), ('³', 0.438), ('´', 0.500), ('µ', 0.736), ('¶', 0.637), ('·', 0.380),
    ('¸', 0.500), ('¹', 0.438), ('º', 0.564), ('»', 0.646), ('¼', 1.036), ('½', 1.036),
    ('¾', 1.036), ('¿', 0.581), ('À', 0.774), ('Á', 0.774), ('Â', 0.774), ('Ã', 0.774),
    ('Ä', 0.774), ('Å', 0.774), ('Æ', 1.085), ('Ç', 0.734), ('È', 0.684), ('É', 0.684),
    ('Ê', 0.684), ('Ë', 0.684), ('Ì', 0.373), ('Í', 0.373), ('Î', 0.373), ('Ï', 0.373),
    ('Ð', 0.838), ('Ñ', 0.837), ('Ò', 0.851), ('Ó', 0.851), ('Ô', 0.851), ('Õ', 0.851),
    ('Ö', 0.851), ('×', 0.838), ('Ø', 0.851), ('Ù', 0.813), ('Ú', 0.813), ('Û', 0.813),
    ('Ü', 0.813), ('Ý', 0.725), ('Þ', 0.738), ('ß', 0.720), ('à', 0.675), ('á', 0.675),
    ('â', 0.675), ('ã', 0.675), ('ä', 0.675), ('å', 0.675), ('æ', 1.048), ('ç', 0.593),
    ('è', 0.679), ('é', 0.679), ('ê', 0.679), ('ë', 0.679), ('ì', 0.343), ('í', 0.343),
    ('î', 0.343), ('ï', 0.343), ('ð', 0.688), ('ñ', 0.712), ('ò', 0.688), ('ó', 0.688),
    ('ô', 0.688), ('õ', 0.688), ('ö', 0.688), ('÷', 0.838), ('ø', 0.688), ('ù', 0.712),
    ('ú', 0.712), ('û', 0.712), ('ü', 0.712), ('ý', 0.652), ('þ', 0.716), ('ÿ', 0.652),
    ('\u{2010}', 0.416), ('\u{2011}', 0.416), ('\u{2012}', 0.696), ('\u{2013}', 0.500),
    ('\u{2014}', 1.000), ('\u{2015}', 1.000), ('\u{2018}', 0.380), ('\u{2019}', 0.380),
    ('\u{201A}', 0.380), ('\u{201C}', 0.658), ('\u{201D}', 0.658), ('\u{201E}', 0.658),
    ('\u{2020}', 0.500), ('\u{2021}', 0.500), ('\u{2022}', 0.640), ('\u{2026}', 1.000),
    ('\u{2032}', 0.264), ('\u{2033}', 0.447), ('\u{20AC}', 0.696), ('\u{2122}', 1.000),
    ('\u{2212}', 0.838),
];

/// Returns the static metric table for a rendering mode and face.
pub fn get_metrics(mode: TextMode, face: FontFace) -> &'static FontMetricTable {
    match (mode, face) {
        (TextMode::Unicode, FontFace::Regular) => &DEJAVU_SANS_TABLE,
        (TextMode::Unicode, FontFace::Bold) => &DEJAVU_SANS_BOLD_TABLE,
        (TextMode::AsciiSafe, FontFace::Regular) => &HELVETICA_TABLE,
        (TextMode::AsciiSafe, FontFace::Bold) => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(TextMode::AsciiSafe, FontFace::Regular);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_single_space() {
        let metrics = get_metrics(TextMode::AsciiSafe, FontFace::Regular);
        let width = metrics.measure_str(" ");
        assert!(
            (width - 0.278).abs() < 1e-4,
            "space width should be 0.278, got {width}"
        );
    }

    #[test]
    fn test_dejavu_widths_match_font_advances() {
        // hmtx advance / 2048, rounded up.
        let regular = get_metrics(TextMode::Unicode, FontFace::Regular);
        let advances = [('m', 1995), ('t', 803), ('r', 842), ('n', 1298), ('u', 1298), ('0', 1303)];
        for (c, advance) in advances {
            let expected = advance as f32 / 2048.0;
            let width = regular.char_width(c);
            assert!(width >= expected && width - expected < 1e-3, "'{c}': {width} vs {expected}");
        }
        let bold = get_metrics(TextMode::Unicode, FontFace::Bold);
        assert!((bold.char_width('m') - 1.042).abs() < 1e-3);
    }

    #[test]
    fn test_latin1_and_euro_are_measured_from_supplement() {
        let regular = get_metrics(TextMode::Unicode, FontFace::Regular);
        assert!((regular.char_width('€') - 0.637).abs() < 1e-3);
        assert!((regular.char_width('ã') - regular.char_width('a')).abs() < 1e-3);
        assert!((regular.char_width('—') - 1.0).abs() < 1e-3);

        let helvetica = get_metrics(TextMode::AsciiSafe, FontFace::Regular);
        assert_eq!(helvetica.char_width('é'), helvetica.char_width('e'));
        assert_eq!(helvetica.char_width('Ç'), helvetica.char_width('C'));
    }

    #[test]
    fn test_unknown_char_uses_widest_width() {
        for mode in [TextMode::Unicode, TextMode::AsciiSafe] {
            for face in [FontFace::Regular, FontFace::Bold] {
                let metrics = get_metrics(mode, face);
                let widest = metrics
                    .widths
                    .iter()
                    .chain(metrics.supplement.iter().map(|(_, w)| w))
                    .fold(0.0_f32, |acc, w| acc.max(*w));
                assert_eq!(metrics.char_width('中'), metrics.fallback_width);
                assert!(metrics.fallback_width >= widest);
            }
        }
    }

    #[test]
    fn test_supplements_are_sorted_and_skip_ascii() {
        for mode in [TextMode::Unicode, TextMode::AsciiSafe] {
            for face in [FontFace::Regular, FontFace::Bold] {
                let supplement = get_metrics(mode, face).supplement;
                assert!(supplement.windows(2).all(|p| p[0].0 < p[1].0));
                assert!(supplement.iter().all(|(c, _)| *c as u32 > 0x7E));
            }
        }
    }

    #[test]
    fn test_bold_is_not_narrower_than_regular() {
        for mode in [TextMode::Unicode, TextMode::AsciiSafe] {
            let regular = get_metrics(mode, FontFace::Regular);
            let bold = get_metrics(mode, FontFace::Bold);
            let sample = "Technical summary of the intervention 0123456789";
            assert!(bold.measure_str(sample) >= regular.measure_str(sample));
        }
    }

    #[test]
    fn test_dejavu_wider_than_helvetica() {
        let sample = "Preparation of the site and checking of access";
        let dejavu = get_metrics(TextMode::Unicode, FontFace::Regular);
        let helvetica = get_metrics(TextMode::AsciiSafe, FontFace::Regular);
        assert!(dejavu.measure_str(sample) > helvetica.measure_str(sample));
    }

    #[test]
    fn test_measure_mm_scales_with_size() {
        let metrics = get_metrics(TextMode::AsciiSafe, FontFace::Regular);
        let at_10 = metrics.measure_mm("Quote", 10.0);
        let at_20 = metrics.measure_mm("Quote", 20.0);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-4);
        // "0" at 10pt = 0.556em × 10pt × 0.3528 mm/pt ≈ 1.96 mm
        assert!((metrics.measure_mm("0", 10.0) - 1.9614).abs() < 1e-3);
    }

    #[test]
    fn test_default_page_config_is_a4() {
        let config = default_page_config();
        assert_eq!(config.width_mm, 210.0);
        assert_eq!(config.height_mm, 297.0);
        assert_eq!(config.content_right_mm(), 200.0);
        assert_eq!(config.break_threshold_mm(), 282.0);
    }
}
