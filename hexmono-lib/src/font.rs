//! The font object that glyphs are written into.
//!
//! Rendering only ever talks to a [`FontBuilder`]; what happens on export is
//! up to the implementation. [`UfoFont`] writes a UFO source with `norad` and
//! hands it to a [`Compiler`]; [`MemoryFont`] keeps everything in memory and
//! records what it was asked to export.

use std::collections::HashMap;
use std::convert::TryFrom;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::consts::{names, NOTDEF_GLYPH_NAME};
use crate::contour::Contour;
use crate::export::Compiler;
use crate::metrics::Metrics;
use crate::naming::glyph_name;
use crate::Error;

/// Flags passed along when writing a binary font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Leave out TrueType hinting instructions.
    pub omit_instructions: bool,
    /// Include a placeholder digital signature table.
    pub dummy_signature: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            omit_instructions: true,
            dummy_signature: true,
        }
    }
}

/// Naming information written into every font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetadata {
    pub family_name: String,
    pub style_name: String,
    pub postscript_name: String,
    pub full_name: String,
    pub version: String,
    pub copyright: String,
    /// The four letter OS/2 vendor tag.
    pub vendor_id: String,
    /// The OS/2 PANOSE classification.
    pub panose: [u32; 10],
}

impl Default for FontMetadata {
    fn default() -> Self {
        FontMetadata {
            family_name: names::FAMILY_NAME.into(),
            style_name: names::STYLE_NAME.into(),
            postscript_name: names::FONT_NAME.into(),
            full_name: names::FULL_NAME.into(),
            version: names::VERSION.into(),
            copyright: names::COPYRIGHT.into(),
            vendor_id: names::VENDOR_ID.into(),
            panose: names::PANOSE,
        }
    }
}

impl FontMetadata {
    /// The names used for the sample font.
    pub fn sample() -> Self {
        FontMetadata {
            family_name: names::TEST_FAMILY_NAME.into(),
            postscript_name: names::TEST_FONT_NAME.into(),
            full_name: names::TEST_FULL_NAME.into(),
            ..FontMetadata::default()
        }
    }
}

fn os2_panose(values: &[u32; 10]) -> Option<norad::fontinfo::OS2Panose> {
    let array = plist::Value::Array(values.iter().map(|v| plist::Value::from(*v)).collect());
    match plist::from_value(&array) {
        Ok(panose) => Some(panose),
        Err(e) => {
            log::warn!("leaving out PANOSE {:?}: {}", values, e);
            None
        }
    }
}

/// A brief description of one glyph in a font.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSummary {
    pub name: String,
    pub codepoint: Option<u32>,
    pub contours: usize,
}

/// Something glyphs can be added to, and that can be written to disk.
pub trait FontBuilder {
    /// Create the glyph for `cp`, replacing any glyph of the same name.
    ///
    /// Returns the name of the new glyph.
    fn create_glyph(&mut self, cp: u32, advance: f64) -> String;

    /// Create the empty `.notdef` glyph, replacing any existing one.
    fn create_notdef(&mut self, advance: f64);

    /// Add a contour to the named glyph. Does nothing if there is no such glyph.
    fn append_contour(&mut self, name: &str, contour: Contour);

    /// Remove the named glyph, returning `true` if it existed.
    fn remove_glyph(&mut self, name: &str) -> bool;

    /// Every glyph, in the order they were created.
    fn glyphs(&self) -> Vec<GlyphSummary>;

    fn glyph_count(&self) -> usize;

    /// Write the font as an OpenType file at `path`.
    fn export(&mut self, path: &Path, options: &ExportOptions) -> Result<(), Error>;
}

#[derive(Debug, Clone, PartialEq)]
struct GlyphEntry {
    name: String,
    codepoint: Option<u32>,
    advance: f64,
    contours: Vec<Contour>,
}

/// Glyphs in creation order, addressable by name.
#[derive(Debug, Clone, Default)]
struct GlyphSet {
    glyphs: Vec<GlyphEntry>,
    index: HashMap<String, usize>,
}

impl GlyphSet {
    fn insert(&mut self, entry: GlyphEntry) {
        match self.index.get(&entry.name) {
            Some(idx) => self.glyphs[*idx] = entry,
            None => {
                self.index.insert(entry.name.clone(), self.glyphs.len());
                self.glyphs.push(entry);
            }
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut GlyphEntry> {
        let idx = *self.index.get(name)?;
        self.glyphs.get_mut(idx)
    }

    fn remove(&mut self, name: &str) -> bool {
        let idx = match self.index.remove(name) {
            Some(idx) => idx,
            None => return false,
        };
        self.glyphs.remove(idx);
        for (i, glyph) in self.glyphs.iter().enumerate().skip(idx) {
            self.index.insert(glyph.name.clone(), i);
        }
        true
    }

    fn summaries(&self) -> Vec<GlyphSummary> {
        self.glyphs
            .iter()
            .map(|g| GlyphSummary {
                name: g.name.clone(),
                codepoint: g.codepoint,
                contours: g.contours.len(),
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.glyphs.len()
    }

    fn create_glyph(&mut self, cp: u32, advance: f64) -> String {
        let name = glyph_name(cp);
        self.insert(GlyphEntry {
            name: name.clone(),
            codepoint: Some(cp),
            advance,
            contours: Vec::new(),
        });
        name
    }

    fn create_notdef(&mut self, advance: f64) {
        self.insert(GlyphEntry {
            name: NOTDEF_GLYPH_NAME.into(),
            codepoint: None,
            advance,
            contours: Vec::new(),
        });
    }

    fn append_contour(&mut self, name: &str, contour: Contour) {
        match self.get_mut(name) {
            Some(glyph) => glyph.contours.push(contour),
            None => log::warn!("no glyph '{}' to add a contour to", name),
        }
    }
}

/// A font that lives entirely in memory.
///
/// Exporting writes nothing; the requested paths are recorded instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryFont {
    glyphs: GlyphSet,
    exports: Vec<(PathBuf, ExportOptions)>,
}

impl MemoryFont {
    pub fn new() -> Self {
        MemoryFont::default()
    }

    /// Every export so far, in order.
    pub fn exports(&self) -> &[(PathBuf, ExportOptions)] {
        &self.exports
    }

    pub fn contours(&self, name: &str) -> Option<&[Contour]> {
        let idx = *self.glyphs.index.get(name)?;
        Some(&self.glyphs.glyphs[idx].contours)
    }

    pub fn advance(&self, name: &str) -> Option<f64> {
        let idx = *self.glyphs.index.get(name)?;
        Some(self.glyphs.glyphs[idx].advance)
    }
}

impl FontBuilder for MemoryFont {
    fn create_glyph(&mut self, cp: u32, advance: f64) -> String {
        self.glyphs.create_glyph(cp, advance)
    }

    fn create_notdef(&mut self, advance: f64) {
        self.glyphs.create_notdef(advance)
    }

    fn append_contour(&mut self, name: &str, contour: Contour) {
        self.glyphs.append_contour(name, contour)
    }

    fn remove_glyph(&mut self, name: &str) -> bool {
        self.glyphs.remove(name)
    }

    fn glyphs(&self) -> Vec<GlyphSummary> {
        self.glyphs.summaries()
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn export(&mut self, path: &Path, options: &ExportOptions) -> Result<(), Error> {
        self.exports.push((path.to_owned(), *options));
        Ok(())
    }
}

/// A font that is saved as a UFO source and compiled by a [`Compiler`].
pub struct UfoFont {
    glyphs: GlyphSet,
    metrics: Metrics,
    metadata: FontMetadata,
    compiler: Arc<dyn Compiler + Send + Sync>,
    keep_source: bool,
}

impl UfoFont {
    pub fn new(
        metrics: Metrics,
        metadata: FontMetadata,
        compiler: Arc<dyn Compiler + Send + Sync>,
    ) -> Self {
        UfoFont {
            glyphs: GlyphSet::default(),
            metrics,
            metadata,
            compiler,
            keep_source: false,
        }
    }

    /// Leave the `.ufo` source next to the compiled font.
    pub fn keep_source(mut self, keep: bool) -> Self {
        self.keep_source = keep;
        self
    }

    /// Build the `norad` representation of this font.
    pub fn to_ufo(&self) -> norad::Ufo {
        let mut ufo = norad::Ufo::new();
        let m = &self.metrics;
        let meta = &self.metadata;
        let ascent = m.ascent.round() as i32;
        let descent = m.descent.round() as i32;
        ufo.font_info = norad::FontInfo {
            family_name: Some(meta.family_name.clone()),
            style_name: Some(meta.style_name.clone()),
            copyright: Some(meta.copyright.clone()),
            postscript_font_name: Some(meta.postscript_name.clone()),
            postscript_full_name: Some(meta.full_name.clone()),
            postscript_is_fixed_pitch: Some(true),
            open_type_name_version: Some(format!("Version {}", meta.version)),
            open_type_name_preferred_family_name: Some(meta.family_name.clone()),
            open_type_name_compatible_full_name: Some(meta.full_name.clone()),
            open_type_os2_vendor_id: Some(meta.vendor_id.clone()),
            open_type_os2_panose: os2_panose(&meta.panose),
            open_type_os2_win_ascent: Some(m.ascent.round() as u32),
            open_type_os2_win_descent: Some(m.descent.round() as u32),
            open_type_os2_typo_ascender: Some(ascent),
            open_type_os2_typo_descender: Some(-descent),
            open_type_os2_typo_line_gap: Some(0),
            open_type_hhea_ascender: Some(ascent),
            open_type_hhea_descender: Some(-descent),
            open_type_hhea_line_gap: Some(0),
            units_per_em: TryFrom::try_from(m.units_per_em).ok(),
            ascender: Some(m.ascent.into()),
            descender: Some((-m.descent).into()),
            ..Default::default()
        }
        .into();

        if let Some(layer) = ufo.get_default_layer_mut() {
            for entry in &self.glyphs.glyphs {
                layer.insert_glyph(entry.to_norad());
            }
        }
        ufo
    }

    /// Save the UFO source for this font at `path`.
    ///
    /// The source is written to a temporary sibling first and moved into
    /// place once complete.
    pub fn save_source(&self, path: &Path) -> Result<(), Error> {
        log::debug!("saving source to {:?}", path);
        let tmp_file_name = format!(
            "{}.savefile",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
        );
        let tmp_path = path.with_file_name(tmp_file_name);
        if tmp_path.exists() {
            fs::remove_dir_all(&tmp_path)?;
        }
        self.to_ufo().save(&tmp_path).map_err(|e| Error::Ufo {
            path: path.to_owned(),
            message: e.to_string(),
        })?;
        if path.exists() {
            fs::remove_dir_all(path)?;
        }
        // see docs for fs::rename; the target directory must exist on unix.
        if cfg!(unix) {
            fs::create_dir(path)?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl GlyphEntry {
    fn to_norad(&self) -> norad::Glyph {
        use norad::glyph::{Advance, Outline};
        let mut glyph = norad::Glyph::new_named(self.name.as_str());
        glyph.codepoints = self
            .codepoint
            .and_then(std::char::from_u32)
            .map(|chr| vec![chr]);
        glyph.advance = Some(Advance {
            width: self.advance as f32,
            height: 0.0,
        });
        if !self.contours.is_empty() {
            glyph.outline = Some(Outline {
                components: Vec::new(),
                contours: self.contours.iter().map(Contour::to_norad).collect(),
            });
        }
        glyph
    }
}

impl FontBuilder for UfoFont {
    fn create_glyph(&mut self, cp: u32, advance: f64) -> String {
        self.glyphs.create_glyph(cp, advance)
    }

    fn create_notdef(&mut self, advance: f64) {
        self.glyphs.create_notdef(advance)
    }

    fn append_contour(&mut self, name: &str, contour: Contour) {
        self.glyphs.append_contour(name, contour)
    }

    fn remove_glyph(&mut self, name: &str) -> bool {
        self.glyphs.remove(name)
    }

    fn glyphs(&self) -> Vec<GlyphSummary> {
        self.glyphs.summaries()
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn export(&mut self, path: &Path, options: &ExportOptions) -> Result<(), Error> {
        let source = path.with_extension("ufo");
        self.save_source(&source)?;
        let result = self.compiler.compile_otf(&source, path, options);
        if !self.keep_source {
            if let Err(e) = fs::remove_dir_all(&source) {
                log::warn!("failed to remove {:?}: {}", source, e);
            }
        }
        result
    }
}
