//! Base font metrics and encoding.
//!
//! Reports use the standard Type 1 Helvetica font with WinAnsi encoding, so
//! nothing has to be embedded. Widths are the Adobe AFM advance widths in
//! 1/1000 em; kerning is not applied.

use std::fmt;

use crate::config::UnencodablePolicy;
use crate::error::{ReportError, ReportResult};

/// A character the base font cannot encode, and therefore cannot measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnencodableChar(pub char);

impl UnencodableChar {
    /// Attaches the field the character came from.
    pub fn in_field(self, field: &str) -> ReportError {
        ReportError::UnencodableCharacter {
            ch: self.0,
            field: field.to_string(),
        }
    }
}

impl fmt::Display for UnencodableChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unencodable character {:?}", self.0)
    }
}

impl std::error::Error for UnencodableChar {}

/// Measures text rendered in a font.
pub trait FontMetrics {
    /// Advance width of `ch` in 1/1000 em, or `None` when it cannot be encoded.
    fn glyph_width(&self, ch: char) -> Option<u16>;

    /// Rendered width of `text` at `size` points.
    fn text_width(&self, text: &str, size: f32) -> Result<f32, UnencodableChar> {
        let mut units: u32 = 0;
        for ch in text.chars() {
            units += u32::from(self.glyph_width(ch).ok_or(UnencodableChar(ch))?);
        }
        Ok(units as f32 * size / 1000.0)
    }
}

/// The standard Helvetica font.
#[derive(Debug, Clone, Copy, Default)]
pub struct Helvetica;

/// PDF resource name of the base font.
pub const BASE_FONT: &[u8] = b"Helvetica";

#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const LATIN1_WIDTHS: [u16; 96] = [
    // U+00A0..U+00AF
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // U+00B0..U+00BF
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // U+00C0..U+00CF
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // U+00D0..U+00DF
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // U+00E0..U+00EF
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // U+00F0..U+00FF
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1, with widths.
fn winansi_special(ch: char) -> Option<(u8, u16)> {
    Some(match ch {
        '€' => (0x80, 556),
        '‚' => (0x82, 222),
        'ƒ' => (0x83, 556),
        '„' => (0x84, 333),
        '…' => (0x85, 1000),
        '†' => (0x86, 556),
        '‡' => (0x87, 556),
        'ˆ' => (0x88, 333),
        '‰' => (0x89, 1000),
        'Š' => (0x8A, 667),
        '‹' => (0x8B, 333),
        'Œ' => (0x8C, 1000),
        'Ž' => (0x8E, 611),
        '‘' => (0x91, 222),
        '’' => (0x92, 222),
        '“' => (0x93, 333),
        '”' => (0x94, 333),
        '•' => (0x95, 350),
        '–' => (0x96, 556),
        '—' => (0x97, 1000),
        '˜' => (0x98, 333),
        '™' => (0x99, 1000),
        'š' => (0x9A, 500),
        '›' => (0x9B, 333),
        'œ' => (0x9C, 944),
        'ž' => (0x9E, 500),
        'Ÿ' => (0x9F, 667),
        _ => return None,
    })
}

/// The WinAnsi byte and the Helvetica width of `ch`.
fn lookup(ch: char) -> Option<(u8, u16)> {
    let code = ch as u32;
    match code {
        0x20..=0x7E => Some((code as u8, ASCII_WIDTHS[(code - 0x20) as usize])),
        0xA0..=0xFF => Some((code as u8, LATIN1_WIDTHS[(code - 0xA0) as usize])),
        _ => winansi_special(ch),
    }
}

impl FontMetrics for Helvetica {
    fn glyph_width(&self, ch: char) -> Option<u16> {
        lookup(ch).map(|(_, width)| width)
    }
}

/// Encodes `text` as WinAnsi bytes for a content stream.
pub fn encode_winansi(text: &str) -> Result<Vec<u8>, UnencodableChar> {
    text.chars()
        .map(|ch| lookup(ch).map(|(byte, _)| byte).ok_or(UnencodableChar(ch)))
        .collect()
}

/// Makes `text` safe to draw on a single line.
///
/// Runs of whitespace collapse to one space. Characters the font cannot
/// encode either fail the call or become `?`, depending on `policy`.
pub fn prepare_text(text: &str, field: &str, policy: UnencodablePolicy) -> ReportResult<String> {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for ch in word.chars() {
            if lookup(ch).is_some() {
                out.push(ch);
            } else {
                match policy {
                    UnencodablePolicy::Fail => return Err(UnencodableChar(ch).in_field(field)),
                    UnencodablePolicy::Replace => out.push('?'),
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_width_at_ten_points() {
        let width = Helvetica.text_width(" ", 10.0).unwrap();
        assert!((width - 2.78).abs() < 1e-4);
    }

    #[test]
    fn test_word_width_sums_glyphs() {
        // H 722 + e 556 + l 222 + l 222 + o 556 = 2278
        let width = Helvetica.text_width("Hello", 10.0).unwrap();
        assert!((width - 22.78).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text_has_zero_width() {
        assert_eq!(Helvetica.text_width("", 12.0).unwrap(), 0.0);
    }

    #[test]
    fn test_bangla_cannot_be_measured() {
        assert_eq!(
            Helvetica.text_width("খরচ", 10.0),
            Err(UnencodableChar('খ'))
        );
    }

    #[test]
    fn test_encode_latin1_and_specials() {
        assert_eq!(encode_winansi("Café").unwrap(), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(encode_winansi("€5").unwrap(), vec![0x80, b'5']);
        assert_eq!(encode_winansi("a—b").unwrap(), vec![b'a', 0x97, b'b']);
    }

    #[test]
    fn test_encode_rejects_control_characters() {
        assert_eq!(encode_winansi("a\nb"), Err(UnencodableChar('\n')));
    }

    #[test]
    fn test_prepare_collapses_whitespace() {
        let text = prepare_text("  two\n\tlines  ", "details", UnencodablePolicy::Fail).unwrap();
        assert_eq!(text, "two lines");
    }

    #[test]
    fn test_prepare_fail_policy_names_field() {
        match prepare_text("ভাড়া", "description_bangla", UnencodablePolicy::Fail) {
            Err(ReportError::UnencodableCharacter { ch, field }) => {
                assert_eq!(ch, 'ভ');
                assert_eq!(field, "description_bangla");
            }
            other => panic!("Expected UnencodableCharacter, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_replace_policy_substitutes() {
        let text = prepare_text("VPS খরচ", "x", UnencodablePolicy::Replace).unwrap();
        assert_eq!(text, "VPS ???");
    }
}
