//! Drawing primitives shared by the glyph layouts.
//!
//! Everything here is in font units with y pointing up. Filled shapes that
//! sit on top of the box (digit cells, lines) are drawn counter-clockwise, so
//! that they knock out of a clockwise box under the nonzero rule.

use kurbo::{Point, Vec2};

use crate::consts::{ARC_HANDLE_RATIO, DIGIT_ASPECT};
use crate::contour::{Pen, Winding};
use crate::digits::{DigitPattern, COLUMNS, ROWS};

/// Draw a square with rounded corners, `origin` being its bottom left.
///
/// The radius is clamped to half the size.
pub fn rounded_square(pen: &mut Pen, origin: Point, size: f64, radius: f64, winding: Winding) {
    let r = radius.min(size / 2.0).max(0.0);
    let k = r * ARC_HANDLE_RATIO;
    let (x, y) = (origin.x, origin.y);

    let mut sub = Pen::new();
    sub.move_to((x + r, y));
    sub.line_to((x + size - r, y));
    sub.curve_to((x + size - k, y), (x + size, y + k), (x + size, y + r));
    sub.line_to((x + size, y + size - r));
    sub.curve_to(
        (x + size, y + size - k),
        (x + size - k, y + size),
        (x + size - r, y + size),
    );
    sub.line_to((x + r, y + size));
    sub.curve_to((x + k, y + size), (x, y + size - k), (x, y + size - r));
    sub.line_to((x, y + r));
    sub.curve_to((x, y + k), (x + k, y), (x + r, y));
    sub.close_path();

    for contour in sub.finish() {
        pen.push(contour.with_winding(winding));
    }
}

/// Draw an axis-aligned rectangle between two corners.
pub fn rect(pen: &mut Pen, p0: Point, p1: Point) {
    let (x0, x1) = (p0.x.min(p1.x), p0.x.max(p1.x));
    let (y0, y1) = (p0.y.min(p1.y), p0.y.max(p1.y));
    pen.move_to((x0, y0));
    pen.line_to((x1, y0));
    pen.line_to((x1, y1));
    pen.line_to((x0, y1));
    pen.close_path();
}

/// Draw a line of the given width as a rectangle rotated to its direction.
pub fn thick_line(pen: &mut Pen, p0: Point, p1: Point, width: f64) {
    let angle = (p1 - p0).atan2();
    // the normal to the left of the direction of travel
    let offset = Vec2::new(-angle.sin(), angle.cos()) * (width / 2.0);
    pen.move_to(p0 - offset);
    pen.line_to(p1 - offset);
    pen.line_to(p1 + offset);
    pen.line_to(p0 + offset);
    pen.close_path();
}

/// The width of a digit drawn at `height`.
pub fn digit_width(height: f64) -> f64 {
    height * DIGIT_ASPECT
}

/// Draw a hex digit with its bottom left corner at `origin`.
///
/// Each filled cell of the digit's pattern becomes one rectangle. Unknown
/// symbols draw nothing.
pub fn hex_digit(pen: &mut Pen, digit: char, origin: Point, height: f64) {
    let cell_w = digit_width(height) / COLUMNS as f64;
    let cell_h = height / ROWS as f64;
    for (col, row) in DigitPattern::for_digit(digit).cells() {
        let x = origin.x + col as f64 * cell_w;
        let y = origin.y + row as f64 * cell_h;
        rect(pen, Point::new(x, y), Point::new(x + cell_w, y + cell_h));
    }
}
