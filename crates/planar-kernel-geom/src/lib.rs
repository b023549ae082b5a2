#![warn(missing_docs)]

//! Parametric planar curves for the planar modeling kernel.
//!
//! A [`Curve`] is one of six kinds (line, polyline, quadratic and cubic
//! Bezier, circle, circular arc). Every kind shares one contract: curves are
//! built one control point at a time, become usable once their arity is
//! reached, and are evaluated over the normalized parameter domain `[0, 1]`.
//! On top of evaluation the kernel provides flattening into polylines,
//! splitting, point projection, joining of straight curves and parametric
//! curve/curve intersection refinement.
//!
//! # Example
//!
//! ```
//! use planar_kernel_geom::{Curve, CurveKind};
//!
//! let mut curve = Curve::new(CurveKind::QuadBezier);
//! curve.add_ctrl_point(0.0, 0.0);
//! curve.add_ctrl_point(1.0, 2.0);
//! assert!(!curve.is_possible());
//! curve.add_ctrl_point(2.0, 0.0);
//! assert!(curve.is_possible());
//!
//! let polyline = curve.equiv_polyline(1e-3);
//! assert_eq!(polyline.first(), Some(&curve.start_point()));
//! ```

pub mod bezier;
pub mod circle;
mod error;
mod intersect;
mod join;
pub mod line;
pub mod polyline;
mod project;

use std::fmt;

use planar_kernel_math::{polyline as pl, unit_or_zero, BoundBox, Point2, Tolerance, Vec2};

pub use bezier::{CubicBezier, QuadBezier};
pub use circle::{Circle, CircleArc};
pub use error::JoinError;
pub use intersect::{intersect_params, CurveIntersection};
pub use line::Line;
pub use polyline::Polyline;
pub use project::CurveProjection;

/// Curve-parameter coincidence tolerance.
pub const PARAM_TOL: f64 = Tolerance::DEFAULT.param;

/// Tight coordinate equality tolerance.
pub const COORD_TOL: f64 = Tolerance::DEFAULT.coord;

/// Iteration cap for Newton refinements.
pub const MAX_NUM_ITERAT: usize = 100;

/// Smallest damping factor tried before a Newton step is abandoned.
pub const MIN_STEP_REDUCT: f64 = 0.005;

/// Bisection depth cap for recursive flattening.
const MAX_FLATTEN_DEPTH: u32 = 16;

// =============================================================================
// Curve kinds
// =============================================================================

/// Discriminant of the six curve kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// Straight line through two points.
    Line,
    /// Chain of straight pieces.
    Polyline,
    /// Quadratic Bezier.
    QuadBezier,
    /// Cubic Bezier.
    CubicBezier,
    /// Full circle.
    Circle,
    /// Counter-clockwise circular arc.
    CircleArc,
}

impl CurveKind {
    /// All curve kinds.
    pub const ALL: [CurveKind; 6] = [
        CurveKind::Line,
        CurveKind::Polyline,
        CurveKind::QuadBezier,
        CurveKind::CubicBezier,
        CurveKind::Circle,
        CurveKind::CircleArc,
    ];

    /// Upper-case name used in user messages.
    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::Line => "LINE",
            CurveKind::Polyline => "POLYLINE",
            CurveKind::QuadBezier => "QUADBEZIER",
            CurveKind::CubicBezier => "CUBICBEZIER",
            CurveKind::Circle => "CIRCLE",
            CurveKind::CircleArc => "CIRCLEARC",
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Curve
// =============================================================================

/// A planar parametric curve.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// Straight line.
    Line(Line),
    /// Polyline parameterized by arc length.
    Polyline(Polyline),
    /// Quadratic Bezier.
    QuadBezier(QuadBezier),
    /// Cubic Bezier.
    CubicBezier(CubicBezier),
    /// Full circle.
    Circle(Circle),
    /// Circular arc.
    CircleArc(CircleArc),
}

macro_rules! dispatch {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            Curve::Line($c) => $body,
            Curve::Polyline($c) => $body,
            Curve::QuadBezier($c) => $body,
            Curve::CubicBezier($c) => $body,
            Curve::Circle($c) => $body,
            Curve::CircleArc($c) => $body,
        }
    };
}

impl Curve {
    /// An empty curve of the given kind, ready to collect control points.
    pub fn new(kind: CurveKind) -> Self {
        match kind {
            CurveKind::Line => Curve::Line(Line::new()),
            CurveKind::Polyline => Curve::Polyline(Polyline::new()),
            CurveKind::QuadBezier => Curve::QuadBezier(QuadBezier::new()),
            CurveKind::CubicBezier => Curve::CubicBezier(CubicBezier::new()),
            CurveKind::Circle => Curve::Circle(Circle::new()),
            CurveKind::CircleArc => Curve::CircleArc(CircleArc::new()),
        }
    }

    /// A complete line.
    pub fn line(start: Point2, end: Point2) -> Self {
        Curve::Line(Line::from_points(start, end))
    }

    /// A polyline through `points`.
    pub fn polyline(points: Vec<Point2>) -> Self {
        Curve::Polyline(Polyline::from_points(points))
    }

    /// Kind of this curve.
    pub fn kind(&self) -> CurveKind {
        match self {
            Curve::Line(_) => CurveKind::Line,
            Curve::Polyline(_) => CurveKind::Polyline,
            Curve::QuadBezier(_) => CurveKind::QuadBezier,
            Curve::CubicBezier(_) => CurveKind::CubicBezier,
            Curve::Circle(_) => CurveKind::Circle,
            Curve::CircleArc(_) => CurveKind::CircleArc,
        }
    }

    /// Control points collected so far.
    pub fn ctrl_points(&self) -> &[Point2] {
        dispatch!(self, c => c.ctrl_points())
    }

    /// Number of control points collected so far.
    pub fn num_ctrl_points(&self) -> usize {
        self.ctrl_points().len()
    }

    /// Append a control point. Returns `false` once the kind's arity is full.
    pub fn add_ctrl_point(&mut self, x: f64, y: f64) -> bool {
        let p = Point2::new(x, y);
        dispatch!(self, c => c.add_ctrl_point(p))
    }

    /// Move an existing control point. Returns `false` for an out-of-range index.
    ///
    /// Derived data cached by owners (flattened polylines, meshes) must be
    /// refreshed by the caller.
    pub fn set_ctrl_point(&mut self, index: usize, x: f64, y: f64) -> bool {
        let p = Point2::new(x, y);
        dispatch!(self, c => c.set_ctrl_point(index, p))
    }

    /// Whether the curve accepts any number of control points.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Curve::Polyline(_))
    }

    /// Whether enough control points have been collected to use the curve.
    pub fn is_possible(&self) -> bool {
        dispatch!(self, c => c.is_possible())
    }

    /// Whether the curve starts and ends at the same point.
    pub fn is_closed(&self) -> bool {
        if !self.is_possible() {
            return false;
        }
        match self {
            Curve::Circle(_) => true,
            _ => (self.start_point() - self.end_point()).norm() < COORD_TOL,
        }
    }

    /// Point at parameter `t`, clamped to `[0, 1]`.
    ///
    /// An incomplete curve evaluates to its first control point (or the origin).
    pub fn eval_point(&self, t: f64) -> Point2 {
        if !self.is_possible() {
            return self.ctrl_points().first().copied().unwrap_or_else(Point2::origin);
        }
        let t = t.clamp(0.0, 1.0);
        dispatch!(self, c => c.eval_point(t))
    }

    /// Point and unit tangent at parameter `t`.
    ///
    /// Degenerate curves report a zero tangent.
    pub fn eval_point_tangent(&self, t: f64) -> (Point2, Vec2) {
        (self.eval_point(t), unit_or_zero(self.derivative(t)))
    }

    /// Parametric derivative `dP/dt` at `t` (not normalized).
    pub fn derivative(&self, t: f64) -> Vec2 {
        if !self.is_possible() {
            return Vec2::zeros();
        }
        let t = t.clamp(0.0, 1.0);
        dispatch!(self, c => c.derivative(t))
    }

    /// Point at `t = 0`.
    pub fn start_point(&self) -> Point2 {
        self.eval_point(0.0)
    }

    /// Point at `t = 1`.
    pub fn end_point(&self) -> Point2 {
        self.eval_point(1.0)
    }

    /// Whether the curve can be replaced by its chord within `tol`.
    pub fn is_straight(&self, tol: f64) -> bool {
        if !self.is_possible() {
            return false;
        }
        match self {
            Curve::Line(_) => true,
            Curve::Polyline(c) => c.is_straight(tol),
            Curve::QuadBezier(c) => c.is_straight(tol),
            Curve::CubicBezier(c) => c.is_straight(tol),
            Curve::Circle(_) | Curve::CircleArc(_) => false,
        }
    }

    fn split_at(&self, t: f64) -> (Curve, Curve) {
        dispatch!(self, c => c.split_at(t))
    }

    /// Flatten into `(parameter, point)` pairs.
    ///
    /// Beziers are bisected at `t = 0.5` until each piece is straight within
    /// `tol`; circles and arcs are sampled at a fixed angular step.
    pub fn flatten(&self, tol: f64) -> Vec<(f64, Point2)> {
        if !self.is_possible() {
            return Vec::new();
        }
        match self {
            Curve::Line(c) => {
                let p = c.ctrl_points();
                vec![(0.0, p[0]), (1.0, p[1])]
            }
            Curve::Polyline(c) => {
                let p = c.ctrl_points();
                let cum = pl::cumulative_lengths(p);
                let total = cum[cum.len() - 1];
                p.iter()
                    .zip(&cum)
                    .map(|(q, s)| (if total > 0.0 { s / total } else { 0.0 }, *q))
                    .collect()
            }
            Curve::QuadBezier(_) | Curve::CubicBezier(_) => {
                let mut out = Vec::new();
                flatten_recursive(self, 0.0, 1.0, tol, 0, &mut out);
                out.push((1.0, self.end_point()));
                out
            }
            Curve::Circle(c) => c.sample(),
            Curve::CircleArc(c) => c.sample(),
        }
    }

    /// Equivalent polyline within straightness tolerance `tol`.
    pub fn equiv_polyline(&self, tol: f64) -> Vec<Point2> {
        self.flatten(tol).into_iter().map(|(_, p)| p).collect()
    }

    /// Polyline to display while the curve is being collected, with `temp`
    /// as the floating next control point.
    pub fn preview_polyline(&self, temp: Point2, tol: f64) -> Vec<Point2> {
        let mut provisional = self.clone();
        if provisional.add_ctrl_point(temp.x, temp.y) && provisional.is_possible() {
            return provisional.equiv_polyline(tol);
        }
        if self.is_possible() {
            return self.equiv_polyline(tol);
        }
        let mut legs = self.ctrl_points().to_vec();
        legs.push(temp);
        legs
    }

    /// Split at `t` into two curves.
    ///
    /// A split within `PARAM_TOL` of either end returns `None` for the empty
    /// side and the whole curve on the other.
    pub fn split_raw(&self, t: f64) -> (Option<Curve>, Option<Curve>) {
        if !self.is_possible() {
            return (None, None);
        }
        if t <= PARAM_TOL {
            return (None, Some(self.clone()));
        }
        if t >= 1.0 - PARAM_TOL {
            return (Some(self.clone()), None);
        }
        let (left, right) = self.split_at(t);
        (Some(left), Some(right))
    }

    /// Split at several ascending parameters, producing `params.len() + 1` pieces.
    ///
    /// Each cut is applied to the remaining tail and later parameters are
    /// renormalized onto it. When `points` holds the exact cut coordinates,
    /// every cut parameter is first re-projected onto the tail from its
    /// renormalized value. Empty pieces (cuts at an end) are `None`.
    pub fn split_many(&self, params: &[f64], points: &[Point2]) -> Vec<Option<Curve>> {
        let mut params = params.to_vec();
        let mut pieces = Vec::with_capacity(params.len() + 1);
        let mut rest = Some(self.clone());

        for i in 0..params.len() {
            let Some(curve) = rest.take() else {
                pieces.push(None);
                continue;
            };
            if let Some(p) = points.get(i) {
                if let Some(proj) = curve.closest_point_param(p.x, p.y, params[i]) {
                    params[i] = proj.t;
                }
            }
            let ti = params[i];
            let (left, right) = curve.split_raw(ti);
            pieces.push(left);
            rest = right;
            if 1.0 - ti > PARAM_TOL {
                for later in params.iter_mut().skip(i + 1) {
                    *later = ((*later - ti) / (1.0 - ti)).clamp(0.0, 1.0);
                }
            }
        }
        pieces.push(rest);
        pieces
    }

    /// Split into `n` pieces of equal parameter span (equal length for lines and polylines).
    pub fn split_into(&self, n: usize) -> Vec<Curve> {
        if n <= 1 || !self.is_possible() {
            return vec![self.clone()];
        }
        let params: Vec<f64> = (1..n).map(|k| k as f64 / n as f64).collect();
        self.split_many(&params, &[]).into_iter().flatten().collect()
    }

    /// Sum of chord lengths of the flattened curve.
    pub fn length(&self) -> f64 {
        pl::length(&self.equiv_polyline(Tolerance::DEFAULT.flatness))
    }

    /// Bounding box of the flattened curve, or of the control points collected so far.
    pub fn bound_box(&self) -> Option<BoundBox> {
        if self.is_possible() {
            BoundBox::from_points(&self.equiv_polyline(Tolerance::DEFAULT.flatness))
        } else {
            BoundBox::from_points(self.ctrl_points())
        }
    }
}

fn flatten_recursive(
    curve: &Curve,
    t0: f64,
    t1: f64,
    tol: f64,
    depth: u32,
    out: &mut Vec<(f64, Point2)>,
) {
    if depth >= MAX_FLATTEN_DEPTH || curve.is_straight(tol) {
        out.push((t0, curve.start_point()));
        return;
    }
    let (left, right) = curve.split_at(0.5);
    let tm = 0.5 * (t0 + t1);
    flatten_recursive(&left, t0, tm, tol, depth + 1, out);
    flatten_recursive(&right, tm, t1, tol, depth + 1, out);
}
