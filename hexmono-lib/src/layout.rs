//! Turning a codepoint into outlines.
//!
//! Every layout draws the box first, as a clockwise contour, followed by the
//! counter-clockwise shapes that sit inside it.

use kurbo::Point;

use crate::codepoint::{is_valid, GlyphClass};
use crate::contour::{Contour, Pen, Winding};
use crate::draw;
use crate::metrics::Metrics;

/// Render the glyph for `cp`.
///
/// Codepoints that never get a glyph (surrogates, noncharacters) are drawn
/// as the `.notdef` frame.
pub fn render_codepoint(cp: u32, metrics: &Metrics) -> Vec<Contour> {
    let class = if is_valid(cp) {
        GlyphClass::classify(cp)
    } else {
        GlyphClass::Invalid
    };
    render(cp, class, metrics)
}

/// Render the glyph for `cp` using the layout for `class`.
///
/// The result is never empty; a class we can't draw gets the `.notdef` frame.
pub fn render(cp: u32, class: GlyphClass, metrics: &Metrics) -> Vec<Contour> {
    let mut pen = Pen::new();
    match class {
        GlyphClass::Replacement => draw_replacement(&mut pen, metrics),
        GlyphClass::AsciiPair => draw_pair(&mut pen, cp, metrics),
        GlyphClass::BmpGrid => draw_grid(&mut pen, cp, class, metrics),
        GlyphClass::SupplementarySplit => draw_split(&mut pen, cp, metrics),
        GlyphClass::Plane16Grid => {
            draw_grid(&mut pen, cp, class, metrics);
            draw_divider(&mut pen, metrics);
        }
        GlyphClass::Invalid => {
            log::debug!("no layout for U+{:04X}, drawing frame", cp);
            draw_frame(&mut pen, metrics);
        }
    }
    pen.finish()
}

/// Render the `.notdef` glyph: a hollow frame.
pub fn render_notdef(metrics: &Metrics) -> Vec<Contour> {
    let mut pen = Pen::new();
    draw_frame(&mut pen, metrics);
    pen.finish()
}

fn draw_border(pen: &mut Pen, class: GlyphClass, metrics: &Metrics) {
    draw::rounded_square(
        pen,
        metrics.box_origin(),
        metrics.box_size,
        metrics.radius_for(class),
        Winding::Clockwise,
    );
}

fn draw_frame(pen: &mut Pen, metrics: &Metrics) {
    let outer = Winding::Clockwise;
    draw::rounded_square(
        pen,
        metrics.box_origin(),
        metrics.box_size,
        metrics.corner_radius,
        outer,
    );
    let inner_radius = (metrics.corner_radius - metrics.box_stroke_width).max(0.0);
    draw::rounded_square(
        pen,
        metrics.inner_origin(),
        metrics.inner_size(),
        inner_radius,
        outer.reverse(),
    );
}

fn draw_replacement(pen: &mut Pen, metrics: &Metrics) {
    draw_border(pen, GlyphClass::Replacement, metrics);
    let inner = metrics.inner_origin();
    let pad = metrics.replacement_char_padding;
    let x1 = inner.x + pad;
    let y1 = inner.y + pad;
    let x2 = inner.x + metrics.inner_size() - pad;
    let y2 = inner.y + metrics.inner_size() - pad;
    let width = metrics.box_stroke_width;
    draw::thick_line(pen, Point::new(x1, y2), Point::new(x2, y1), width);
    draw::thick_line(pen, Point::new(x1, y1), Point::new(x2, y2), width);
}

fn draw_pair(pen: &mut Pen, cp: u32, metrics: &Metrics) {
    let class = GlyphClass::AsciiPair;
    draw_border(pen, class, metrics);
    let digits = class.drawn_digits(cp);
    let inner = metrics.inner_origin();
    let size = metrics.two_digit_size;
    let digit_w = size * metrics.aspect_for(class);
    let total_w = 2.0 * digit_w + metrics.grid_spacing;
    let offset_x = (metrics.inner_size() - total_w) / 2.0;
    let offset_y = (metrics.inner_size() - size) / 2.0;
    for (i, digit) in digits.iter().enumerate() {
        let x = inner.x + offset_x + i as f64 * (digit_w + metrics.grid_spacing);
        draw::hex_digit(pen, *digit, Point::new(x, inner.y + offset_y), size);
    }
}

/// Where the four digits of a 2x2 grid go.
struct Grid {
    /// The bottom left of the bottom left cell.
    origin: Point,
    cell_width: f64,
    cell_height: f64,
    spacing: f64,
    /// The position of each digit within its cell.
    offset_x: f64,
    offset_y: f64,
}

impl Grid {
    /// Draw up to four digits: top left, top right, bottom left, bottom right.
    fn draw(&self, pen: &mut Pen, digits: &[char], size: f64) {
        let left = self.origin.x + self.offset_x;
        let right = left + self.cell_width + self.spacing;
        let bottom = self.origin.y + self.offset_y;
        let top = bottom + self.cell_height + self.spacing;
        let slots = [(left, top), (right, top), (left, bottom), (right, bottom)];
        for (digit, (x, y)) in digits.iter().zip(slots.iter()) {
            draw::hex_digit(pen, *digit, Point::new(*x, *y), size);
        }
    }
}

fn draw_grid(pen: &mut Pen, cp: u32, class: GlyphClass, metrics: &Metrics) {
    draw_border(pen, class, metrics);
    let cell = (metrics.inner_size() - metrics.grid_spacing) / 2.0;
    let digit_w = metrics.digit_size * metrics.aspect_for(class);
    let grid = Grid {
        origin: metrics.inner_origin(),
        cell_width: cell,
        cell_height: cell,
        spacing: metrics.grid_spacing,
        offset_x: (cell - digit_w) / 2.0,
        offset_y: (cell - metrics.digit_size) / 2.0,
    };
    grid.draw(pen, &class.drawn_digits(cp), metrics.digit_size);
}

fn draw_split(pen: &mut Pen, cp: u32, metrics: &Metrics) {
    let class = GlyphClass::SupplementarySplit;
    draw_border(pen, class, metrics);
    let digits = class.drawn_digits(cp);
    let (plane, rest) = match digits.split_first() {
        Some(split) => split,
        None => return,
    };

    let inner = metrics.inner_origin();
    let inner_size = metrics.inner_size();
    let aspect = metrics.aspect_for(class);
    let spacing = metrics.supplementary_grid_spacing;
    let cell_height = (inner_size - spacing) / 2.0;
    // the plane digit sits as far from the left as the grid digits sit
    // from the top and bottom
    let padding = (cell_height - metrics.digit_size) / 2.0;

    let plane_x = inner.x + padding;
    let plane_y = inner.y + (inner_size - metrics.plane_digit_size) / 2.0;
    draw::hex_digit(pen, *plane, Point::new(plane_x, plane_y), metrics.plane_digit_size);

    let grid_x = plane_x + metrics.plane_digit_size * aspect + metrics.plane_section_spacing;
    let available = inner_size - (grid_x - inner.x) - padding;
    let cell_width = (available - spacing) / 2.0;
    let grid = Grid {
        origin: Point::new(grid_x, inner.y),
        cell_width,
        cell_height,
        spacing,
        offset_x: (cell_width - metrics.digit_size * aspect) / 2.0,
        offset_y: padding,
    };
    grid.draw(pen, rest, metrics.digit_size);
}

fn draw_divider(pen: &mut Pen, metrics: &Metrics) {
    let middle_x = metrics.box_margin + metrics.box_size / 2.0;
    let inner = metrics.inner_origin();
    draw::thick_line(
        pen,
        Point::new(middle_x, inner.y),
        Point::new(middle_x, inner.y + metrics.inner_size()),
        metrics.box_stroke_width,
    );
}
