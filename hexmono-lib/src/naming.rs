//! Names of output files and glyphs.

use std::fmt;
use std::str::FromStr;

use crate::consts::{names::FILE_PREFIX, BMP_END, NOTDEF_GLYPH_NAME};
use crate::Error;

/// The formats we write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontFormat {
    Otf,
    Woff2,
}

impl FontFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FontFormat::Otf => "otf",
            FontFormat::Woff2 => "woff2",
        }
    }

    /// The name of this format in a CSS `format()` hint.
    pub fn css_format(self) -> &'static str {
        match self {
            FontFormat::Otf => "opentype",
            FontFormat::Woff2 => "woff2",
        }
    }

    fn from_extension(ext: &str) -> Option<FontFormat> {
        if ext.eq_ignore_ascii_case("otf") {
            Some(FontFormat::Otf)
        } else if ext.eq_ignore_ascii_case("woff2") {
            Some(FontFormat::Woff2)
        } else {
            None
        }
    }
}

/// The name of one output file: `UnicodeHexMono_{start}_{end}.{ext}`.
///
/// Codepoints are uppercase hex, zero padded to five digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontFileName {
    pub start: u32,
    pub end: u32,
    pub format: FontFormat,
}

impl FontFileName {
    pub fn new(start: u32, end: u32, format: FontFormat) -> Self {
        FontFileName { start, end, format }
    }

    /// The same range, in a different format.
    pub fn with_format(self, format: FontFormat) -> Self {
        FontFileName { format, ..self }
    }
}

impl fmt::Display for FontFileName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}_{:05X}_{:05X}.{}",
            FILE_PREFIX,
            self.start,
            self.end,
            self.format.extension()
        )
    }
}

impl FromStr for FontFileName {
    type Err = Error;

    /// Parse a file name, ignoring case. Each codepoint may be five or six
    /// hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::BadFileName(s.to_string());

        let prefix = s.get(..FILE_PREFIX.len()).ok_or_else(bad)?;
        if !prefix.eq_ignore_ascii_case(FILE_PREFIX) {
            return Err(bad());
        }
        let rest = s[FILE_PREFIX.len()..].strip_prefix('_').ok_or_else(bad)?;
        let (stem, ext) = match rest.rfind('.') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => return Err(bad()),
        };
        let format = FontFormat::from_extension(ext).ok_or_else(bad)?;

        let mut parts = stem.split('_');
        let (start, end) = match (parts.next(), parts.next(), parts.next()) {
            (Some(start), Some(end), None) => (start, end),
            _ => return Err(bad()),
        };
        let start = parse_hex(start).ok_or_else(bad)?;
        let end = parse_hex(end).ok_or_else(bad)?;
        Ok(FontFileName { start, end, format })
    }
}

fn parse_hex(s: &str) -> Option<u32> {
    if !(5..=6).contains(&s.len()) || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

/// The name of the glyph for `cp`.
///
/// This is `uniXXXX` in the BMP and `uXXXXX` or `uXXXXXX` above it.
pub fn glyph_name(cp: u32) -> String {
    if cp <= BMP_END {
        format!("uni{:04X}", cp)
    } else {
        format!("u{:05X}", cp)
    }
}

/// `true` if `name` is the name of the `.notdef` glyph.
pub fn is_notdef(name: &str) -> bool {
    name == NOTDEF_GLYPH_NAME
}
