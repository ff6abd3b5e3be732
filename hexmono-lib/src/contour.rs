//! Closed outlines, and a pen for drawing them.

use kurbo::{BezPath, PathEl, Point, Rect, Shape};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointType {
    OnCurve { smooth: bool },
    OffCurve,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourPoint {
    pub point: Point,
    pub typ: PointType,
}

/// The direction a closed contour travels, with y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// A single closed outline.
///
/// The first point is always on-curve, and the contour implicitly closes
/// back to it. Curves are cubic; each curve segment is two off-curve points
/// followed by an on-curve point (or the implicit return to the start).
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<ContourPoint>,
}

impl ContourPoint {
    fn on_curve(point: Point) -> Self {
        ContourPoint {
            point,
            typ: PointType::OnCurve { smooth: false },
        }
    }

    fn off_curve(point: Point) -> Self {
        ContourPoint {
            point,
            typ: PointType::OffCurve,
        }
    }

    pub fn is_on_curve(&self) -> bool {
        matches!(self.typ, PointType::OnCurve { .. })
    }
}

impl Winding {
    pub fn reverse(self) -> Winding {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }
}

impl Contour {
    /// Build a contour from the first subpath of a `BezPath`.
    ///
    /// The subpath is always treated as closed. A final point that coincides
    /// with the start is dropped, since the close is implicit.
    pub fn from_bezpath(path: impl IntoIterator<Item = PathEl>) -> Result<Self, &'static str> {
        let mut els = path.into_iter();
        let mut points = Vec::new();

        let start_point = match els.next() {
            Some(PathEl::MoveTo(pt)) => pt,
            _ => return Err("missing initial moveto"),
        };

        points.push(ContourPoint::on_curve(start_point));

        for el in els {
            match el {
                // we only take the first subpath
                PathEl::MoveTo(_) => break,
                PathEl::LineTo(pt) => points.push(ContourPoint::on_curve(pt)),
                PathEl::CurveTo(p0, p1, p2) => {
                    points.push(ContourPoint::off_curve(p0));
                    points.push(ContourPoint::off_curve(p1));
                    points.push(ContourPoint::on_curve(p2));
                }
                PathEl::QuadTo(..) => return Err("quads not currently supported"),
                PathEl::ClosePath => break,
            }
        }

        if points.len() > 1 && points.first().map(|p| p.point) == points.last().map(|p| p.point)
        {
            points.pop();
        }

        if points.len() < 3 {
            return Err("contour has fewer than three points");
        }

        mark_smooth_points(&mut points);
        Ok(Contour { points })
    }

    pub fn points(&self) -> &[ContourPoint] {
        &self.points
    }

    pub fn start(&self) -> Point {
        self.points[0].point
    }

    /// The number of on-curve points; for a contour of lines, the number of
    /// edges.
    pub fn on_curve_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_on_curve()).count()
    }

    pub fn curve_count(&self) -> usize {
        self.points.iter().filter(|p| !p.is_on_curve()).count() / 2
    }

    pub fn bezier(&self) -> BezPath {
        let mut bez = BezPath::new();
        bez.move_to(self.start());
        let mut pending = Vec::with_capacity(2);
        let rest = self.points[1..].iter().map(|p| (p.point, p.is_on_curve()));
        let close = std::iter::once((self.start(), true));
        for (point, on_curve) in rest.chain(close) {
            if !on_curve {
                pending.push(point);
                continue;
            }
            match pending.as_slice() {
                [] => bez.line_to(point),
                [c1, c2] => bez.curve_to(*c1, *c2, point),
                _ => log::warn!("dropping malformed segment with {} controls", pending.len()),
            }
            pending.clear();
        }
        bez.close_path();
        bez
    }

    /// The area enclosed by this contour; positive when counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        self.bezier().area()
    }

    pub fn winding(&self) -> Winding {
        if self.signed_area() < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// The same outline, travelled in the opposite direction.
    pub fn reversed(&self) -> Contour {
        let mut points = self.points.clone();
        points[1..].reverse();
        Contour { points }
    }

    /// Return this contour travelling in the given direction.
    pub fn with_winding(self, winding: Winding) -> Contour {
        if self.winding() == winding {
            self
        } else {
            self.reversed()
        }
    }

    pub fn bounding_box(&self) -> Rect {
        self.bezier().bounding_box()
    }

    /// `true` if `pt` is inside the area enclosed by this contour.
    pub fn contains(&self, pt: Point) -> bool {
        self.bezier().winding(pt) != 0
    }

    pub fn to_norad(&self) -> norad::glyph::Contour {
        use norad::glyph::{ContourPoint as NoradPoint, PointType as NoradPType};
        let mut points = Vec::with_capacity(self.points.len());
        let mut prev_off_curve = self.points.last().map(|p| !p.is_on_curve()).unwrap_or(false);
        for p in &self.points {
            let (typ, smooth) = match p.typ {
                PointType::OffCurve => (NoradPType::OffCurve, false),
                PointType::OnCurve { smooth } if prev_off_curve => (NoradPType::Curve, smooth),
                PointType::OnCurve { smooth } => (NoradPType::Line, smooth),
            };
            let x = p.point.x as f32;
            let y = p.point.y as f32;
            points.push(NoradPoint::new(x, y, typ, smooth, None, None, None));
            prev_off_curve = !p.is_on_curve();
        }
        norad::glyph::Contour::new(points, None, None)
    }
}

/// Mark on-curve points whose neighbouring handles are collinear with them.
fn mark_smooth_points(points: &mut [ContourPoint]) {
    let len = points.len();
    let prev_and_next_idx = |idx: usize| {
        let prev = (idx + len).saturating_sub(1) % len;
        let next = (idx + 1) % len;
        (prev, next)
    };

    for idx in 0..len {
        if !points[idx].is_on_curve() {
            continue;
        }
        let (prev, next) = prev_and_next_idx(idx);
        let pt = points[idx].point;
        let into = pt - points[prev].point;
        let out = points[next].point - pt;
        if into.hypot() == 0.0 || out.hypot() == 0.0 {
            continue;
        }
        // a point between a straight edge and a tangent arc is smooth too
        let cross = into.cross(out) / (into.hypot() * out.hypot());
        let smooth = cross.abs() <= 0.018 && into.dot(out) > 0.0;
        let has_handle = !points[prev].is_on_curve() || !points[next].is_on_curve();
        points[idx].typ = PointType::OnCurve {
            smooth: smooth && has_handle,
        };
    }
}

/// Accumulates drawing commands into closed contours.
#[derive(Debug, Default)]
pub struct Pen {
    current: Option<BezPath>,
    contours: Vec<Contour>,
}

impl Pen {
    pub fn new() -> Pen {
        Pen::default()
    }

    /// Begin a new contour at `pt`. Any open contour is closed first.
    pub fn move_to(&mut self, pt: impl Into<Point>) {
        if self.current.is_some() {
            self.close_path();
        }
        let mut bez = BezPath::new();
        bez.move_to(pt);
        self.current = Some(bez);
    }

    pub fn line_to(&mut self, pt: impl Into<Point>) {
        let bez = bail!(self.current.as_mut(), "line_to without move_to");
        bez.line_to(pt);
    }

    pub fn curve_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>, p3: impl Into<Point>) {
        let bez = bail!(self.current.as_mut(), "curve_to without move_to");
        bez.curve_to(p1.into(), p2.into(), p3.into());
    }

    pub fn close_path(&mut self) {
        let bez = bail!(self.current.take(), "close_path without move_to");
        match Contour::from_bezpath(bez) {
            Ok(contour) => self.contours.push(contour),
            Err(e) => log::warn!("discarding contour: {}", e),
        }
    }

    /// Add an already built contour.
    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Close any open contour and return everything drawn.
    pub fn finish(mut self) -> Vec<Contour> {
        if self.current.is_some() {
            self.close_path();
        }
        self.contours
    }
}
