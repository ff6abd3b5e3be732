//! Glyph geometry settings.

use std::path::Path;

use kurbo::Point;
use metrics_loader::loadable_metrics;

use crate::codepoint::GlyphClass;
use crate::Error;

/// Every measurement used to lay out a glyph, in font units.
///
/// The box is a square of `box_size` whose bottom left corner sits at
/// (`box_margin`, `glyph_y_offset`). Everything else is drawn inside the
/// inner box, which is the box inset by `box_stroke_width` on every side.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub units_per_em: f64,
    pub ascent: f64,
    pub descent: f64,
    /// The advance of every glyph.
    pub glyph_width: f64,
    pub box_margin: f64,
    pub box_size: f64,
    pub glyph_y_offset: f64,
    pub corner_radius: f64,
    pub corner_radius_plane16: f64,
    pub box_stroke_width: f64,
    /// Height of each digit in the four digit grids.
    pub digit_size: f64,
    /// Height of the digits in the large two digit layout.
    pub two_digit_size: f64,
    /// Height of the plane digit in the split layout.
    pub plane_digit_size: f64,
    pub grid_spacing: f64,
    pub supplementary_grid_spacing: f64,
    /// Gap between the plane digit and the grid in the split layout.
    pub plane_section_spacing: f64,
    /// Inset of the cross from the inner box, for U+FFFD.
    pub replacement_char_padding: f64,
    // Width over height used when spacing digits, per layout. The digits
    // themselves are always drawn at `consts::DIGIT_ASPECT`.
    pub pair_digit_aspect: f64,
    pub grid_digit_aspect: f64,
    pub split_digit_aspect: f64,
    pub plane16_digit_aspect: f64,
}

loadable_metrics!(Metrics {
    units_per_em,
    ascent,
    descent,
    glyph_width,
    box_margin,
    box_size,
    glyph_y_offset,
    corner_radius,
    corner_radius_plane16,
    box_stroke_width,
    digit_size,
    two_digit_size,
    plane_digit_size,
    grid_spacing,
    supplementary_grid_spacing,
    plane_section_spacing,
    replacement_char_padding,
    pair_digit_aspect,
    grid_digit_aspect,
    split_digit_aspect,
    plane16_digit_aspect,
});

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            units_per_em: 1000.0,
            ascent: 800.0,
            descent: 200.0,
            glyph_width: 1000.0,
            box_margin: 100.0,
            box_size: 800.0,
            glyph_y_offset: -100.0,
            corner_radius: 100.0,
            corner_radius_plane16: 60.0,
            box_stroke_width: 40.0,
            digit_size: 190.0,
            two_digit_size: 400.0,
            plane_digit_size: 290.0,
            grid_spacing: 40.0,
            supplementary_grid_spacing: 40.0,
            plane_section_spacing: 30.0,
            replacement_char_padding: 80.0,
            pair_digit_aspect: 0.6,
            grid_digit_aspect: 0.65,
            split_digit_aspect: 0.65,
            plane16_digit_aspect: 0.6,
        }
    }
}

impl Metrics {
    /// Load overrides from the file at `path`, on top of the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Metrics, Error> {
        metrics_loader::load_file(path, &Metrics::default()).map_err(Into::into)
    }

    /// The bottom left corner of the box.
    pub fn box_origin(&self) -> Point {
        Point::new(self.box_margin, self.glyph_y_offset)
    }

    pub fn inner_size(&self) -> f64 {
        self.box_size - 2.0 * self.box_stroke_width
    }

    /// The bottom left corner of the inner box.
    pub fn inner_origin(&self) -> Point {
        Point::new(
            self.box_margin + self.box_stroke_width,
            self.glyph_y_offset + self.box_stroke_width,
        )
    }

    /// The corner radius of the box for a given layout.
    pub fn radius_for(&self, class: GlyphClass) -> f64 {
        match class {
            GlyphClass::Plane16Grid => self.corner_radius_plane16,
            _ => self.corner_radius,
        }
    }

    /// The digit aspect used for spacing in a given layout.
    pub fn aspect_for(&self, class: GlyphClass) -> f64 {
        match class {
            GlyphClass::AsciiPair => self.pair_digit_aspect,
            GlyphClass::BmpGrid => self.grid_digit_aspect,
            GlyphClass::SupplementarySplit => self.split_digit_aspect,
            GlyphClass::Plane16Grid => self.plane16_digit_aspect,
            GlyphClass::Replacement | GlyphClass::Invalid => crate::consts::DIGIT_ASPECT,
        }
    }
}
