//! Driving a complete run: partition, render, validate, export.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::codepoint::{is_valid, valid_codepoints};
use crate::consts::{names, ASCII_END, GLYPHS_PER_FILE, NOTDEF_GLYPH_NAME, UNICODE_MAX, UNICODE_MIN};
use crate::contour::Contour;
use crate::css::FontRange;
use crate::export::{CommandCompiler, Compiler, WebFont, DEFAULT_OTF_COMMAND, DEFAULT_WOFF2_COMMAND};
use crate::font::{ExportOptions, FontBuilder, FontMetadata, UfoFont};
use crate::layout;
use crate::metrics::Metrics;
use crate::naming::{is_notdef, FontFileName, FontFormat};
use crate::partition::{check_budget, partition, PartitionStrategy};
use crate::util::thousands;
use crate::Error;

/// How often progress is logged, in glyphs.
const PROGRESS_INTERVAL: usize = 1000;
const ASCII_PROGRESS_INTERVAL: usize = 50;

/// Settings for a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub out_dir: PathBuf,
    /// The most codepoints written to one file.
    pub glyphs_per_file: usize,
    pub strategy: PartitionStrategy,
    /// The codepoints to cover; invalid ones are skipped.
    pub range: RangeInclusive<u32>,
    pub write_woff2: bool,
    pub export_options: ExportOptions,
    /// Command used to compile sources, with `{input}` and `{output}`.
    pub otf_command: String,
    /// Command used to compress to WOFF2, with `{input}` and `{output}`.
    pub woff2_command: String,
    /// Keep the intermediate `.ufo` sources.
    pub keep_sources: bool,
    pub metadata: FontMetadata,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            out_dir: PathBuf::from("dist"),
            glyphs_per_file: GLYPHS_PER_FILE,
            strategy: PartitionStrategy::default(),
            range: UNICODE_MIN..=UNICODE_MAX,
            write_woff2: true,
            export_options: ExportOptions::default(),
            otf_command: DEFAULT_OTF_COMMAND.into(),
            woff2_command: DEFAULT_WOFF2_COMMAND.into(),
            keep_sources: false,
            metadata: FontMetadata::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn compiler(&self) -> Result<CommandCompiler, Error> {
        CommandCompiler::from_templates(&self.otf_command, &self.woff2_command)
    }
}

/// The outcome of writing one font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontReport {
    pub start: u32,
    pub end: u32,
    pub otf: PathBuf,
    /// `None` if WOFF2 output was disabled or the converter is missing.
    pub woff2: Option<PathBuf>,
    /// Codepoints requested for this file.
    pub codepoints: usize,
    /// Glyphs in the exported font, including `.notdef`.
    pub glyphs: usize,
    /// Glyphs removed because they had no outline.
    pub dropped: Vec<String>,
}

impl FontReport {
    /// The files written for this font, as a stylesheet range.
    pub fn range(&self) -> FontRange {
        let mut range = FontRange::new(self.start, self.end);
        for path in std::iter::once(&self.otf).chain(self.woff2.as_ref()) {
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                let format = match path.extension().and_then(|s| s.to_str()) {
                    Some("woff2") => FontFormat::Woff2,
                    _ => FontFormat::Otf,
                };
                range.files.insert(format, name.to_string());
            }
        }
        range
    }
}

/// The outcome of a complete run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub fonts: Vec<FontReport>,
}

impl RunReport {
    pub fn total_codepoints(&self) -> usize {
        self.fonts.iter().map(|f| f.codepoints).sum()
    }

    /// Every file written, in order.
    pub fn files(&self) -> Vec<&Path> {
        self.fonts
            .iter()
            .flat_map(|f| std::iter::once(f.otf.as_path()).chain(f.woff2.as_deref()))
            .collect()
    }

    pub fn ranges(&self) -> Vec<FontRange> {
        self.fonts.iter().map(FontReport::range).collect()
    }
}

/// Render `codepoints` into `font`, followed by `.notdef`.
///
/// Glyphs are rendered in parallel a batch at a time, and added to the font
/// in the order given.
pub fn build_font<B: FontBuilder>(font: &mut B, codepoints: &[u32], metrics: &Metrics) {
    let interval = if codepoints.last().map(|cp| *cp <= ASCII_END).unwrap_or(true) {
        ASCII_PROGRESS_INTERVAL
    } else {
        PROGRESS_INTERVAL
    };

    let total = codepoints.len();
    let mut done = 0;
    for batch in codepoints.chunks(interval) {
        let rendered: Vec<(u32, Vec<Contour>)> = batch
            .par_iter()
            .map(|cp| (*cp, layout::render_codepoint(*cp, metrics)))
            .collect();
        for (cp, contours) in rendered {
            let name = font.create_glyph(cp, metrics.glyph_width);
            log::trace!("{}: {} contours", name, contours.len());
            for contour in contours {
                font.append_contour(&name, contour);
            }
        }
        done += batch.len();
        if done % interval == 0 {
            log::info!("  {} / {} glyphs generated", thousands(done), thousands(total));
        }
    }

    log::debug!("adding {}", NOTDEF_GLYPH_NAME);
    font.create_notdef(metrics.glyph_width);
    for contour in layout::render_notdef(metrics) {
        font.append_contour(NOTDEF_GLYPH_NAME, contour);
    }
}

/// Remove every glyph without an outline, except `.notdef`.
///
/// Returns the names of the removed glyphs.
pub fn validate_glyphs<B: FontBuilder>(font: &mut B) -> Vec<String> {
    let empty = font
        .glyphs()
        .into_iter()
        .filter(|g| g.contours == 0 && !is_notdef(&g.name))
        .map(|g| g.name)
        .collect::<Vec<_>>();
    for name in &empty {
        log::warn!("removing empty glyph {}", name);
        font.remove_glyph(name);
    }
    empty
}

/// Fill `font` with `codepoints` and write it to `otf`, plus a WOFF2 file
/// beside it if requested.
pub fn write_font<B: FontBuilder>(
    mut font: B,
    codepoints: &[u32],
    otf: &Path,
    metrics: &Metrics,
    config: &GeneratorConfig,
    compiler: &dyn Compiler,
) -> Result<FontReport, Error> {
    let (start, end) = match (codepoints.first(), codepoints.last()) {
        (Some(start), Some(end)) => (*start, *end),
        _ => (0, 0),
    };
    let file_name = otf
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::info!("generating glyphs");
    build_font(&mut font, codepoints, metrics);
    log::info!("validating glyphs");
    let dropped = validate_glyphs(&mut font);

    log::info!("writing {:?}", otf);
    if let Err(e) = font.export(otf, &config.export_options) {
        log::error!("failed to write {}: {}", file_name, e);
        return Err(e.exporting(file_name));
    }
    log::info!("  total glyphs in file: {}", thousands(font.glyph_count()));

    let woff2 = if config.write_woff2 {
        let path = otf.with_extension(FontFormat::Woff2.extension());
        match compiler.compress_woff2(otf, &path) {
            Ok(WebFont::Written) => {
                log::info!("writing {:?}", path);
                Some(path)
            }
            Ok(WebFont::Unavailable) => {
                log::warn!("no WOFF2 converter available, skipping {:?}", path);
                None
            }
            Err(e) => {
                let name = path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                log::error!("failed to write {}: {}", name, e);
                return Err(e.exporting(name));
            }
        }
    } else {
        None
    };

    Ok(FontReport {
        start,
        end,
        otf: otf.to_owned(),
        woff2,
        codepoints: codepoints.len(),
        glyphs: font.glyph_count(),
        dropped,
    })
}

/// Write one font per chunk of the configured range.
///
/// `make_font` is called once per chunk; each font is filled, exported and
/// dropped before the next is created.
pub fn generate<B, F>(
    config: &GeneratorConfig,
    metrics: &Metrics,
    compiler: &dyn Compiler,
    mut make_font: F,
) -> Result<RunReport, Error>
where
    B: FontBuilder,
    F: FnMut() -> B,
{
    check_budget(config.glyphs_per_file)?;
    fs::create_dir_all(&config.out_dir)?;

    log::info!(
        "collecting valid codepoints in U+{:05X} - U+{:05X}",
        config.range.start(),
        config.range.end()
    );
    let valid = valid_codepoints(config.range.clone()).collect::<Vec<_>>();
    log::info!("total valid codepoints: {}", thousands(valid.len()));

    let chunks = partition(&valid, config.glyphs_per_file, config.strategy)?;
    log::info!(
        "will generate {} font files ({} glyphs per file, {})",
        chunks.len(),
        thousands(config.glyphs_per_file),
        config.strategy
    );

    let mut report = RunReport::default();
    for (idx, chunk) in chunks.iter().enumerate() {
        log::info!(
            "file {}/{}: {} ({} glyphs)",
            idx + 1,
            chunks.len(),
            chunk,
            thousands(chunk.len())
        );
        let name = FontFileName::new(chunk.start(), chunk.end(), FontFormat::Otf);
        let otf = config.out_dir.join(name.to_string());
        let font = write_font(make_font(), chunk.codepoints(), &otf, metrics, config, compiler)?;
        report.fonts.push(font);
    }

    log::info!(
        "generated {} files covering {} codepoints",
        report.files().len(),
        thousands(report.total_codepoints())
    );
    Ok(report)
}

/// Write a single font of hand-picked codepoints, named as a test font.
///
/// Invalid codepoints are skipped, and the rest are sorted and deduplicated.
pub fn generate_sample<B: FontBuilder>(
    config: &GeneratorConfig,
    metrics: &Metrics,
    compiler: &dyn Compiler,
    font: B,
    codepoints: &[u32],
) -> Result<FontReport, Error> {
    let mut codepoints = codepoints
        .iter()
        .copied()
        .filter(|cp| is_valid(*cp))
        .collect::<Vec<_>>();
    codepoints.sort_unstable();
    codepoints.dedup();

    fs::create_dir_all(&config.out_dir)?;
    let otf = config
        .out_dir
        .join(format!("{}.{}", names::TEST_FILE_STEM, FontFormat::Otf.extension()));
    log::info!("writing {} sample glyphs", codepoints.len());
    write_font(font, &codepoints, &otf, metrics, config, compiler)
}

/// Run with the external compilers and `norad` sources.
pub fn run(config: &GeneratorConfig, metrics: &Metrics) -> Result<RunReport, Error> {
    let compiler = Arc::new(config.compiler()?);
    let make_font = || ufo_font(config, metrics, compiler.clone());
    generate(config, metrics, compiler.as_ref(), make_font)
}

/// Write the sample font with the external compilers and `norad` sources.
pub fn run_sample(
    config: &GeneratorConfig,
    metrics: &Metrics,
    codepoints: &[u32],
) -> Result<FontReport, Error> {
    let compiler = Arc::new(config.compiler()?);
    let font = sample_ufo_font(config, metrics, compiler.clone());
    generate_sample(config, metrics, compiler.as_ref(), font, codepoints)
}

fn ufo_font(config: &GeneratorConfig, metrics: &Metrics, compiler: Arc<CommandCompiler>) -> UfoFont {
    UfoFont::new(metrics.clone(), config.metadata.clone(), compiler).keep_source(config.keep_sources)
}

/// The sample font carries its own family name so it can be installed
/// alongside the real one.
fn sample_ufo_font(
    config: &GeneratorConfig,
    metrics: &Metrics,
    compiler: Arc<CommandCompiler>,
) -> UfoFont {
    UfoFont::new(metrics.clone(), FontMetadata::sample(), compiler)
        .keep_source(config.keep_sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{GlyphSummary, MemoryFont};
    use std::cell::RefCell;

    /// Records conversions; optionally pretends the converter is missing.
    #[derive(Default)]
    struct FakeCompiler {
        converted: RefCell<Vec<PathBuf>>,
        missing: bool,
        broken: bool,
    }

    impl Compiler for FakeCompiler {
        fn compile_otf(&self, _: &Path, _: &Path, _: &ExportOptions) -> Result<(), Error> {
            Ok(())
        }

        fn compress_woff2(&self, _: &Path, output: &Path) -> Result<WebFont, Error> {
            if self.broken {
                return Err(Error::EmptyCommand(String::new()));
            }
            if self.missing {
                return Ok(WebFont::Unavailable);
            }
            self.converted.borrow_mut().push(output.to_owned());
            Ok(WebFont::Written)
        }
    }

    /// A font whose export always fails.
    #[derive(Default)]
    struct BrokenFont(MemoryFont);

    impl FontBuilder for BrokenFont {
        fn create_glyph(&mut self, cp: u32, advance: f64) -> String {
            self.0.create_glyph(cp, advance)
        }
        fn create_notdef(&mut self, advance: f64) {
            self.0.create_notdef(advance)
        }
        fn append_contour(&mut self, name: &str, contour: Contour) {
            self.0.append_contour(name, contour)
        }
        fn remove_glyph(&mut self, name: &str) -> bool {
            self.0.remove_glyph(name)
        }
        fn glyphs(&self) -> Vec<GlyphSummary> {
            self.0.glyphs()
        }
        fn glyph_count(&self) -> usize {
            self.0.glyph_count()
        }
        fn export(&mut self, _: &Path, _: &ExportOptions) -> Result<(), Error> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    fn config(name: &str, range: RangeInclusive<u32>, budget: usize) -> GeneratorConfig {
        let out_dir =
            std::env::temp_dir().join(format!("hexmono-gen-{}-{}", name, std::process::id()));
        GeneratorConfig {
            out_dir,
            glyphs_per_file: budget,
            range,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn small_run() {
        let config = config("small", 0x00F0..=0x0120, 20);
        let compiler = FakeCompiler::default();
        let report = generate(&config, &Metrics::default(), &compiler, MemoryFont::new).unwrap();

        let ranges = report
            .fonts
            .iter()
            .map(|f| (f.start, f.end, f.glyphs))
            .collect::<Vec<_>>();
        assert_eq!(
            ranges,
            vec![
                (0xF0, 0xFF, 17),
                (0x100, 0x113, 21),
                (0x114, 0x120, 14),
            ]
        );
        assert_eq!(report.total_codepoints(), 0x31);
        assert_eq!(
            report.fonts[0].otf,
            config.out_dir.join("UnicodeHexMono_000F0_000FF.otf")
        );
        assert_eq!(
            report.fonts[0].woff2,
            Some(config.out_dir.join("UnicodeHexMono_000F0_000FF.woff2"))
        );
        assert_eq!(compiler.converted.borrow().len(), 3);
        assert_eq!(report.files().len(), 6);
        assert!(report.fonts.iter().all(|f| f.dropped.is_empty()));
        let _ = fs::remove_dir_all(&config.out_dir);
    }

    #[test]
    fn invalid_codepoints_are_skipped() {
        let config = config("skip", 0xFDC0..=0xFE00, 1000);
        let report = generate(
            &config,
            &Metrics::default(),
            &FakeCompiler::default(),
            MemoryFont::new,
        )
        .unwrap();
        assert_eq!(report.fonts.len(), 1);
        assert_eq!(report.fonts[0].codepoints, 0x41 - 32);
        let _ = fs::remove_dir_all(&config.out_dir);
    }

    #[test]
    fn missing_converter_keeps_otf() {
        let config = config("nowoff", 0x41..=0x42, 100);
        let compiler = FakeCompiler {
            missing: true,
            ..FakeCompiler::default()
        };
        let report = generate(&config, &Metrics::default(), &compiler, MemoryFont::new).unwrap();
        assert_eq!(report.fonts[0].woff2, None);
        assert_eq!(report.files().len(), 1);
        let _ = fs::remove_dir_all(&config.out_dir);
    }

    #[test]
    fn woff2_can_be_disabled() {
        let mut config = config("nowoff2", 0x41..=0x42, 100);
        config.write_woff2 = false;
        let compiler = FakeCompiler::default();
        let report = generate(&config, &Metrics::default(), &compiler, MemoryFont::new).unwrap();
        assert_eq!(report.fonts[0].woff2, None);
        assert!(compiler.converted.borrow().is_empty());
        let _ = fs::remove_dir_all(&config.out_dir);
    }

    #[test]
    fn converter_failure_is_fatal() {
        let config = config("badwoff", 0x41..=0x42, 100);
        let compiler = FakeCompiler {
            broken: true,
            ..FakeCompiler::default()
        };
        let err = generate(&config, &Metrics::default(), &compiler, MemoryFont::new).unwrap_err();
        assert!(
            matches!(err, Error::Export { ref file, .. } if file == "UnicodeHexMono_00041_00042.woff2")
        );
        let _ = fs::remove_dir_all(&config.out_dir);
    }

    #[test]
    fn export_failure_is_fatal() {
        let config = config("badotf", 0x41..=0x200, 1000);
        let mut created = 0;
        let err = generate(&config, &Metrics::default(), &FakeCompiler::default(), || {
            created += 1;
            BrokenFont::default()
        })
        .unwrap_err();
        assert!(
            matches!(err, Error::Export { ref file, .. } if file == "UnicodeHexMono_00041_000FF.otf")
        );
        // the run stops at the first failure
        assert_eq!(created, 1);
        let _ = fs::remove_dir_all(&config.out_dir);
    }

    #[test]
    fn bad_budget() {
        let config = config("budget", 0x41..=0x42, 0);
        let result = generate(
            &config,
            &Metrics::default(),
            &FakeCompiler::default(),
            MemoryFont::new,
        );
        assert!(matches!(result, Err(Error::InvalidBudget { .. })));
    }

    #[test]
    fn build_adds_notdef_in_order() {
        let mut font = MemoryFont::new();
        build_font(&mut font, &[0x41, 0x1234, 0xFFFD], &Metrics::default());
        let names = font.glyphs().into_iter().map(|g| g.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["uni0041", "uni1234", "uniFFFD", ".notdef"]);
        assert_eq!(font.contours(".notdef").map(<[_]>::len), Some(2));
    }

    #[test]
    fn validation_drops_empty_glyphs() {
        let mut font = MemoryFont::new();
        build_font(&mut font, &[0x41], &Metrics::default());
        font.create_glyph(0x42, 1000.0);
        font.create_notdef(1000.0);
        let dropped = validate_glyphs(&mut font);
        assert_eq!(dropped, vec!["uni0042"]);
        // .notdef is never dropped, even when empty
        let names = font.glyphs().into_iter().map(|g| g.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["uni0041", ".notdef"]);
    }

    #[test]
    fn sample_font() {
        let config = config("sample", 0..=0, 100);
        let compiler = FakeCompiler::default();
        let report = generate_sample(
            &config,
            &Metrics::default(),
            &compiler,
            MemoryFont::new(),
            &[0x1234, 0x41, 0xD800, 0x41, 0x10FFFE, 0x10ABCD],
        )
        .unwrap();
        assert_eq!(report.codepoints, 3);
        assert_eq!(report.glyphs, 4);
        assert_eq!((report.start, report.end), (0x41, 0x10ABCD));
        assert_eq!(report.otf, config.out_dir.join("UnicodeHexMono_TEST.otf"));
        assert_eq!(
            report.woff2,
            Some(config.out_dir.join("UnicodeHexMono_TEST.woff2"))
        );
        let _ = fs::remove_dir_all(&config.out_dir);
    }

    #[test]
    fn sample_font_names() {
        let config = GeneratorConfig::default();
        let font = sample_ufo_font(
            &config,
            &Metrics::default(),
            Arc::new(CommandCompiler::default()),
        );
        let ufo = font.to_ufo();
        let info = ufo.font_info.as_ref().unwrap();
        assert_eq!(info.family_name.as_deref(), Some("UnicodeHexMono Test"));
        assert_eq!(info.postscript_font_name.as_deref(), Some("UnicodeHexMono_Test"));
        assert_eq!(info.postscript_full_name.as_deref(), Some("UnicodeHexMono Test"));
        assert_eq!(
            info.open_type_name_preferred_family_name.as_deref(),
            Some("UnicodeHexMono Test")
        );
        assert_eq!(info.postscript_is_fixed_pitch, Some(true));
    }

    #[test]
    fn report_ranges() {
        let config = config("ranges", 0x41..=0x42, 100);
        let report = generate(
            &config,
            &Metrics::default(),
            &FakeCompiler::default(),
            MemoryFont::new,
        )
        .unwrap();
        let ranges = report.ranges();
        assert_eq!(ranges, vec![FontRange::new(0x41, 0x42)
            .with_format(FontFormat::Otf)
            .with_format(FontFormat::Woff2)]);
        let _ = fs::remove_dir_all(&config.out_dir);
    }
}
