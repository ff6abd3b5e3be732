//! Deciding which codepoints get glyphs, and how each one is drawn.

use std::ops::RangeInclusive;

use crate::consts::*;

/// The layout used to draw a given codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphClass {
    /// U+FFFD, drawn as a cross.
    Replacement,
    /// U+0000..=U+00FF, the last two hex digits drawn large.
    AsciiPair,
    /// The rest of the BMP, four digits in a 2x2 grid.
    BmpGrid,
    /// Planes 1 through 15: the plane digit on the left, then a 2x2 grid.
    SupplementarySplit,
    /// Plane 16: the low four digits in a 2x2 grid, split by a divider.
    Plane16Grid,
    /// Anything we don't know how to draw.
    Invalid,
}

/// Returns `true` if `cp` is a scalar value we generate a glyph for.
///
/// This excludes surrogates and all noncharacters.
pub fn is_valid(cp: u32) -> bool {
    if !(UNICODE_MIN..=UNICODE_MAX).contains(&cp) {
        return false;
    }
    if (SURROGATE_START..=SURROGATE_END).contains(&cp) {
        return false;
    }
    // U+nFFFE and U+nFFFF in every plane
    if cp & 0xFFFF >= 0xFFFE {
        return false;
    }
    !(NONCHARACTER_BLOCK_START..=NONCHARACTER_BLOCK_END).contains(&cp)
}

/// Iterate, in ascending order, the valid codepoints in `range`.
pub fn valid_codepoints(range: RangeInclusive<u32>) -> impl Iterator<Item = u32> {
    range.filter(|cp| is_valid(*cp))
}

/// All valid codepoints, in ascending order.
pub fn all_valid_codepoints() -> Vec<u32> {
    valid_codepoints(UNICODE_MIN..=UNICODE_MAX).collect()
}

impl GlyphClass {
    /// Determine the layout for `cp`.
    ///
    /// This is only meaningful for codepoints where [`is_valid`] is `true`.
    pub fn classify(cp: u32) -> GlyphClass {
        match cp {
            REPLACEMENT_CHARACTER => GlyphClass::Replacement,
            PLANE16_START..=PLANE16_END => GlyphClass::Plane16Grid,
            SUPPLEMENTARY_START..=SUPPLEMENTARY_END => GlyphClass::SupplementarySplit,
            0..=ASCII_END => GlyphClass::AsciiPair,
            0..=BMP_END => GlyphClass::BmpGrid,
            _ => GlyphClass::Invalid,
        }
    }

    /// The number of hex digits in this layout's representation of a codepoint.
    ///
    /// Not every digit is necessarily drawn; see [`GlyphClass::drawn_digits`].
    pub fn hex_width(self) -> usize {
        match self {
            GlyphClass::AsciiPair => 2,
            GlyphClass::BmpGrid => 4,
            GlyphClass::SupplementarySplit => 5,
            GlyphClass::Plane16Grid => 6,
            GlyphClass::Replacement | GlyphClass::Invalid => 0,
        }
    }

    /// The hex digits that appear in the glyph for `cp`, in drawing order.
    pub fn drawn_digits(self, cp: u32) -> Vec<char> {
        let digits = hex_digits(cp, self.hex_width());
        let skip = match self {
            // the plane is implied by the divider
            GlyphClass::Plane16Grid => 2,
            _ => 0,
        };
        digits.chars().skip(skip).collect()
    }
}

/// Format `cp` as uppercase hex, zero padded to `width`.
///
/// If `cp` needs more than `width` digits, only the lowest `width` digits
/// are returned.
pub fn hex_digits(cp: u32, width: usize) -> String {
    let full = format!("{:0width$X}", cp, width = width);
    full[full.len() - width..].to_string()
}
