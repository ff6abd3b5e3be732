//! Codepoints for the sample font.
//!
//! Every layout is covered, every plane has a glyph, and the 2x2 grid sees
//! each hex digit in each of its slots.

pub const SAMPLE_CODEPOINTS: &[u32] = &[
    // two-digit layout
    0x0000, 0x0001, 0x0009, 0x000A, 0x000D, 0x001B, 0x001F, 0x0020, 0x0030, 0x0039, 0x0041,
    0x005A, 0x0061, 0x007A, 0x007E, 0x007F, 0x0080, 0x0090, 0x009F, 0x00A0, 0x00A9, 0x00B0,
    0x00C0, 0x00D0, 0x00E0, 0x00F0, 0x00FF,
    // 2x2 grid
    0x0100, 0x0123, 0x1234, 0x2345, 0x3456, 0x4567, 0x5678, 0x6789, 0x789A, 0x89AB, 0x9ABC,
    0xABCD, 0xBCDE, 0xCDEF, 0xDEF0, 0xEF01, 0xF012,
    // replacement character
    0xFFFD,
    // plane digit over a 2x2 grid
    0x10000, 0x23456, 0x3789A, 0x4BCDE, 0x5F012, 0x6ABCD, 0x71234, 0x89ABC, 0x9DEF0, 0xA5678,
    0xBBDD8, 0xCDEF0, 0xD1234, 0xE12AB, 0xFFFFD,
    // plane 16
    0x100000, 0x101234, 0x10ABCD, 0x10BDD8, 0x10F012,
];

#[cfg(test)]
mod tests {
    use super::*;
    use hexmono_lib::{hex_digits, is_valid, GlyphClass};
    use std::collections::HashSet;

    #[test]
    fn all_valid() {
        assert!(SAMPLE_CODEPOINTS.iter().all(|cp| is_valid(*cp)));
    }

    #[test]
    fn every_digit_in_every_grid_slot() {
        for slot in 0..4 {
            let seen = SAMPLE_CODEPOINTS
                .iter()
                .filter(|cp| GlyphClass::classify(**cp) == GlyphClass::BmpGrid)
                .filter_map(|cp| hex_digits(*cp, 4).chars().nth(slot))
                .collect::<HashSet<_>>();
            assert_eq!(seen.len(), 16, "slot {}", slot);
        }
    }

    #[test]
    fn every_plane() {
        let planes = SAMPLE_CODEPOINTS
            .iter()
            .map(|cp| cp >> 16)
            .collect::<HashSet<_>>();
        assert_eq!(planes.len(), 17);
    }
}
