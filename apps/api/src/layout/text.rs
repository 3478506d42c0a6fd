//! Text rendering mode and the sanitizer every emitted string passes through.
//!
//! The mode is picked once per document. `Unicode` text goes out untouched with
//! the embedded TTFs; `AsciiSafe` text is restricted to what the core fonts can
//! encode (Latin-1), with known symbols transliterated.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Embedded Unicode TTF fonts; any character renders.
    Unicode,
    /// Built-in core fonts; text is sanitized to Latin-1.
    AsciiSafe,
}

impl TextMode {
    pub fn sanitize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            TextMode::Unicode => Cow::Borrowed(text),
            TextMode::AsciiSafe => {
                if text.chars().all(is_core_font_safe) {
                    Cow::Borrowed(text)
                } else {
                    Cow::Owned(text.chars().fold(String::with_capacity(text.len()), |mut out, c| {
                        push_safe(&mut out, c);
                        out
                    }))
                }
            }
        }
    }
}

/// Printable Latin-1 plus newline.
fn is_core_font_safe(c: char) -> bool {
    c == '\n' || (' '..='~').contains(&c) || ('\u{A0}'..='\u{FF}').contains(&c)
}

fn push_safe(out: &mut String, c: char) {
    if is_core_font_safe(c) {
        out.push(c);
        return;
    }
    let replacement = match c {
        '€' => "EUR",
        '\t' | '\u{2002}'..='\u{200A}' | '\u{202F}' => " ",
        '\u{2010}'..='\u{2015}' | '\u{2212}' => "-",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => "\"",
        '\u{2026}' => "...",
        '\u{2022}' | '\u{2023}' | '\u{2043}' => "-",
        '\u{2122}' => "TM",
        '\r' | '\u{200B}' | '\u{FEFF}' => "",
        _ => "?",
    };
    out.push_str(replacement);
}
