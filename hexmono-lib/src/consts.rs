//! shared constants

/// The lowest codepoint we generate a glyph for.
pub const UNICODE_MIN: u32 = 0x0000;
/// The highest codepoint we generate a glyph for.
///
/// This is one below U+10FFFE, the first of the plane 16 noncharacters.
pub const UNICODE_MAX: u32 = 0x10FFFD;

pub const SURROGATE_START: u32 = 0xD800;
pub const SURROGATE_END: u32 = 0xDFFF;

/// The contiguous noncharacter block in Arabic Presentation Forms-A.
pub const NONCHARACTER_BLOCK_START: u32 = 0xFDD0;
pub const NONCHARACTER_BLOCK_END: u32 = 0xFDEF;

pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;
/// The last codepoint drawn with the large two digit layout.
pub const ASCII_END: u32 = 0x00FF;
pub const BMP_END: u32 = 0xFFFF;
pub const SUPPLEMENTARY_START: u32 = 0x1_0000;
pub const SUPPLEMENTARY_END: u32 = 0xF_FFFF;
pub const PLANE16_START: u32 = 0x10_0000;
pub const PLANE16_END: u32 = 0x10_FFFF;

/// The hard limit on glyphs in a single OpenType file.
pub const MAX_GLYPHS_PER_FILE: usize = 65_535;
/// How many codepoints we put in each file by default.
///
/// This leaves room for `.notdef` and anything the compiler adds.
pub const GLYPHS_PER_FILE: usize = 60_000;

/// Control point offset, as a fraction of the radius, for a cubic
/// approximation of a quarter circle.
pub const ARC_HANDLE_RATIO: f64 = 0.448;

/// The width of a rendered digit, as a fraction of its height.
pub const DIGIT_ASPECT: f64 = 0.6;

pub const NOTDEF_GLYPH_NAME: &str = ".notdef";

/// Font naming
pub mod names {
    pub const FONT_NAME: &str = "UnicodeHexMono";
    pub const FAMILY_NAME: &str = "UnicodeHexMono";
    pub const STYLE_NAME: &str = "Regular";
    pub const FULL_NAME: &str = "UnicodeHexMono Regular";
    pub const VERSION: &str = "1.0";
    pub const COPYRIGHT: &str = "Copyright (c) UnicodeHexMono contributors";
    pub const VENDOR_ID: &str = "PFNT";
    /// Sans serif, monospaced.
    pub const PANOSE: [u32; 10] = [2, 11, 6, 9, 3, 0, 0, 2, 0, 4];

    pub const TEST_FONT_NAME: &str = "UnicodeHexMono_Test";
    pub const TEST_FAMILY_NAME: &str = "UnicodeHexMono Test";
    pub const TEST_FULL_NAME: &str = "UnicodeHexMono Test";

    /// The stem shared by every generated font file.
    pub const FILE_PREFIX: &str = "UnicodeHexMono";
    /// The stem of the sample font, which is never listed in stylesheets.
    pub const TEST_FILE_STEM: &str = "UnicodeHexMono_TEST";
    pub const STYLESHEET_NAME: &str = "font.css";
}
