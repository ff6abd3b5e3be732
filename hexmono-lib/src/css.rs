//! Writing the stylesheet that maps unicode ranges to font files.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::names::{STYLESHEET_NAME, TEST_FILE_STEM};
use crate::font::FontMetadata;
use crate::naming::{FontFileName, FontFormat};
use crate::util::thousands;
use crate::Error;

/// One range of codepoints, and the files that cover it.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRange {
    pub start: u32,
    pub end: u32,
    /// File names, by format.
    pub files: BTreeMap<FontFormat, String>,
}

impl FontRange {
    pub fn new(start: u32, end: u32) -> Self {
        FontRange {
            start,
            end,
            files: BTreeMap::new(),
        }
    }

    /// Add a file for this range, named according to the usual convention.
    pub fn with_format(mut self, format: FontFormat) -> Self {
        let name = FontFileName::new(self.start, self.end, format);
        self.files.insert(format, name.to_string());
        self
    }

    /// The number of codepoints spanned by this range.
    pub fn span(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Format entries for the `src` descriptor, most compact format first.
    fn sources(&self) -> Vec<String> {
        [FontFormat::Woff2, FontFormat::Otf]
            .iter()
            .filter_map(|format| {
                self.files
                    .get(format)
                    .map(|file| format!("url('./{}') format('{}')", file, format.css_format()))
            })
            .collect()
    }
}

/// Group a list of file names into ranges, ignoring anything that isn't a
/// font file we wrote.
pub fn collect_ranges<'a>(file_names: impl IntoIterator<Item = &'a str>) -> Vec<FontRange> {
    let mut ranges: BTreeMap<(u32, u32), FontRange> = BTreeMap::new();
    for file_name in file_names {
        if !(file_name.ends_with(".otf") || file_name.ends_with(".woff2")) {
            continue;
        }
        if Path::new(file_name).file_stem().and_then(|s| s.to_str()) == Some(TEST_FILE_STEM) {
            log::debug!("skipping test font {}", file_name);
            continue;
        }
        match file_name.parse::<FontFileName>() {
            Ok(name) => {
                log::info!(
                    "found {} (U+{:05X} - U+{:05X}) [{}]",
                    file_name,
                    name.start,
                    name.end,
                    name.format.extension().to_uppercase()
                );
                ranges
                    .entry((name.start, name.end))
                    .or_insert_with(|| FontRange::new(name.start, name.end))
                    .files
                    .insert(name.format, file_name.to_string());
            }
            Err(_) => log::info!("skipping {} (not a font file name)", file_name),
        }
    }
    ranges.into_iter().map(|(_, range)| range).collect()
}

/// Find the font files in `dir` and group them into ranges.
pub fn scan_dir(dir: &Path) -> Result<Vec<FontRange>, Error> {
    log::info!("scanning {:?} for font files", dir);
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => log::debug!("skipping non-utf8 file name {:?}", name),
        }
    }
    Ok(collect_ranges(names.iter().map(String::as_str)))
}

/// Generate the stylesheet for the given ranges.
pub fn generate_css(ranges: &[FontRange], metadata: &FontMetadata) -> String {
    let mut ranges = ranges.iter().collect::<Vec<_>>();
    ranges.sort_by_key(|r| r.start);

    let mut css = String::new();
    let _ = write_header(&mut css, ranges.len(), metadata);
    for (idx, range) in ranges.iter().enumerate() {
        if idx > 0 {
            css.push('\n');
        }
        let _ = write_font_face(&mut css, range, metadata);
    }
    css
}

fn write_header(css: &mut String, count: usize, metadata: &FontMetadata) -> std::fmt::Result {
    writeln!(css, "/**")?;
    writeln!(css, " * {} Font Family", metadata.postscript_name)?;
    writeln!(css, " * Version: {}", metadata.version)?;
    writeln!(css, " *")?;
    writeln!(
        css,
        " * A monospaced font covering all Unicode characters (U+0000 to U+10FFFD)"
    )?;
    writeln!(
        css,
        " * Each glyph displays its hexadecimal codepoint in a rounded square"
    )?;
    writeln!(css, " *")?;
    writeln!(css, " * Usage:")?;
    writeln!(css, " *   @import 'unicode-hex-mono/dist/font.css';")?;
    writeln!(css, " *   font-family: '{}', monospace;", metadata.family_name)?;
    writeln!(css, " *")?;
    writeln!(css, " * Total font ranges: {}", count)?;
    writeln!(css, " * Formats: WOFF2 (web optimized) + OTF (OpenType fallback)")?;
    writeln!(
        css,
        " * Browser optimization: Only needed files are loaded via unicode-range"
    )?;
    writeln!(css, " */")?;
    writeln!(css)
}

fn write_font_face(css: &mut String, range: &FontRange, metadata: &FontMetadata) -> std::fmt::Result {
    let start = format!("{:05X}", range.start);
    let end = format!("{:05X}", range.end);
    writeln!(
        css,
        "/* Unicode Range: U+{} - U+{} ({} codepoints) */",
        start,
        end,
        thousands(range.span())
    )?;
    writeln!(css, "@font-face {{")?;
    writeln!(css, "  font-family: '{}';", metadata.family_name)?;
    let sources = range.sources();
    for (i, source) in sources.iter().enumerate() {
        let lead = if i == 0 { "  src: " } else { "       " };
        let sep = if i + 1 == sources.len() { ";" } else { "," };
        writeln!(css, "{}{}{}", lead, source, sep)?;
    }
    writeln!(css, "  unicode-range: U+{}-{};", start, end)?;
    writeln!(css, "  font-weight: normal;")?;
    writeln!(css, "  font-style: normal;")?;
    writeln!(css, "  font-display: swap;")?;
    writeln!(css, "}}")
}

/// Write the stylesheet for `ranges` into `dir`, returning its path.
pub fn write_css(dir: &Path, ranges: &[FontRange], metadata: &FontMetadata) -> Result<PathBuf, Error> {
    if ranges.is_empty() {
        return Err(Error::NoFonts(dir.to_owned()));
    }
    let path = dir.join(STYLESHEET_NAME);
    let css = generate_css(ranges, metadata);
    fs::write(&path, &css)?;
    let file_count: usize = ranges.iter().map(|r| r.files.len()).sum();
    log::info!(
        "wrote {:?}: {} ranges, {} font files, {} bytes",
        path,
        ranges.len(),
        file_count,
        thousands(css.len())
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = "\
/**
 * UnicodeHexMono Font Family
 * Version: 1.0
 *
 * A monospaced font covering all Unicode characters (U+0000 to U+10FFFD)
 * Each glyph displays its hexadecimal codepoint in a rounded square
 *
 * Usage:
 *   @import 'unicode-hex-mono/dist/font.css';
 *   font-family: 'UnicodeHexMono', monospace;
 *
 * Total font ranges: 2
 * Formats: WOFF2 (web optimized) + OTF (OpenType fallback)
 * Browser optimization: Only needed files are loaded via unicode-range
 */

/* Unicode Range: U+00000 - U+000FF (256 codepoints) */
@font-face {
  font-family: 'UnicodeHexMono';
  src: url('./UnicodeHexMono_00000_000FF.woff2') format('woff2'),
       url('./UnicodeHexMono_00000_000FF.otf') format('opentype');
  unicode-range: U+00000-000FF;
  font-weight: normal;
  font-style: normal;
  font-display: swap;
}

/* Unicode Range: U+00100 - U+0F25F (61,792 codepoints) */
@font-face {
  font-family: 'UnicodeHexMono';
  src: url('./UnicodeHexMono_00100_0F25F.otf') format('opentype');
  unicode-range: U+00100-0F25F;
  font-weight: normal;
  font-style: normal;
  font-display: swap;
}
";

    #[test]
    fn stylesheet() {
        let ranges = vec![
            FontRange::new(0x100, 0xF25F).with_format(FontFormat::Otf),
            FontRange::new(0, 0xFF)
                .with_format(FontFormat::Otf)
                .with_format(FontFormat::Woff2),
        ];
        assert_eq!(generate_css(&ranges, &FontMetadata::default()), EXPECTED);
    }

    #[test]
    fn grouping() {
        let ranges = collect_ranges(vec![
            "UnicodeHexMono_00100_0F25F.otf",
            "UnicodeHexMono_00000_000FF.woff2",
            "UnicodeHexMono_TEST.otf",
            "UnicodeHexMono_TEST.woff2",
            "font.css",
            "UnicodeHexMono_00000_000FF.otf",
            "UnicodeHexMono_00100_0F25F.woff2",
            "UnicodeHexMono_oops.otf",
        ]);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges[0].files.len(), 2);
        assert_eq!(ranges[1].end, 0xF25F);
        assert_eq!(
            ranges[1].files.get(&FontFormat::Woff2).map(String::as_str),
            Some("UnicodeHexMono_00100_0F25F.woff2")
        );
    }

    #[test]
    fn scan_and_write() {
        let dir = std::env::temp_dir().join(format!("hexmono-css-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for name in &[
            "UnicodeHexMono_00000_000FF.otf",
            "UnicodeHexMono_00000_000FF.woff2",
            "UnicodeHexMono_00100_0F25F.otf",
            "UnicodeHexMono_00100_0F25F.woff2",
            "UnicodeHexMono_TEST.otf",
        ] {
            fs::write(dir.join(name), b"").unwrap();
        }

        let ranges = scan_dir(&dir).unwrap();
        assert_eq!(ranges.len(), 2);
        let path = write_css(&dir, &ranges, &FontMetadata::default()).unwrap();
        let css = fs::read_to_string(&path).unwrap();
        assert_eq!(css.matches("@font-face").count(), 2);
        assert!(!css.contains("TEST"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn nothing_to_write() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            write_css(&dir, &[], &FontMetadata::default()),
            Err(Error::NoFonts(_))
        ));
    }
}
