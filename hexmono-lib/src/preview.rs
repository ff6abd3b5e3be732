//! SVG previews of rendered glyphs.

use std::fs;
use std::path::{Path, PathBuf};

use kurbo::PathEl;
use svg::node::element::path::Data;
use svg::Document;

use crate::codepoint::is_valid;
use crate::contour::Contour;
use crate::layout;
use crate::metrics::Metrics;
use crate::naming::glyph_name;
use crate::Error;

/// Build an SVG document showing `contours` in a glyph-sized frame.
///
/// Font coordinates are y-up; the document flips them so the glyph reads
/// upright, and the view box spans the advance and the full ascent and descent.
pub fn glyph_svg(contours: &[Contour], metrics: &Metrics) -> Document {
    use svg::node::element::Path;

    let mut data = Data::new();
    for contour in contours {
        for element in contour.bezier().elements() {
            data = match *element {
                PathEl::MoveTo(p) => data.move_to((p.x, -p.y)),
                PathEl::LineTo(p) => data.line_to((p.x, -p.y)),
                PathEl::QuadTo(p1, p2) => data.quadratic_curve_to((p1.x, -p1.y, p2.x, -p2.y)),
                PathEl::CurveTo(p1, p2, p3) => {
                    data.cubic_curve_to((p1.x, -p1.y, p2.x, -p2.y, p3.x, -p3.y))
                }
                PathEl::ClosePath => data.close(),
            };
        }
    }

    let path = Path::new()
        .set("fill", "black")
        .set("fill-rule", "nonzero")
        .set("d", data);

    Document::new()
        .set(
            "viewBox",
            (
                0.0,
                -metrics.ascent,
                metrics.glyph_width,
                metrics.ascent + metrics.descent,
            ),
        )
        .add(path)
}

/// Render `cp` and return its SVG text.
pub fn codepoint_svg(cp: u32, metrics: &Metrics) -> String {
    glyph_svg(&layout::render_codepoint(cp, metrics), metrics).to_string()
}

/// Write a preview of `cp` into `dir`, named after its glyph.
///
/// Codepoints that never get a glyph are previewed as the `.notdef` frame.
pub fn write_preview(dir: &Path, cp: u32, metrics: &Metrics) -> Result<PathBuf, Error> {
    if !is_valid(cp) {
        log::warn!("U+{:04X} is not a valid codepoint, drawing the frame", cp);
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.svg", glyph_name(cp)));
    let document = glyph_svg(&layout::render_codepoint(cp, metrics), metrics);
    svg::save(&path, &document)?;
    log::info!("wrote preview {:?}", path);
    Ok(path)
}
