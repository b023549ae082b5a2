//! Quadratic and cubic Bezier curves.
//!
//! Both are evaluated in Bernstein form and subdivided with the de Casteljau
//! triangle. Straightness is judged from the control polygon: every interior
//! control point must lie within the tolerance of the chord.

use planar_kernel_math::segment::distance_to_segment;
use planar_kernel_math::{Point2, Vec2};

use crate::Curve;

fn lerp(a: &Point2, b: &Point2, t: f64) -> Point2 {
    a + (b - a) * t
}

fn control_polygon_is_straight(pts: &[Point2], tol: f64) -> bool {
    let first = pts[0];
    let last = pts[pts.len() - 1];
    pts[1..pts.len() - 1]
        .iter()
        .all(|p| distance_to_segment(p, &first, &last) <= tol)
}

fn push_ctrl(pts: &mut Vec<Point2>, arity: usize, p: Point2) -> bool {
    if pts.len() >= arity {
        return false;
    }
    pts.push(p);
    true
}

fn set_ctrl(pts: &mut [Point2], index: usize, p: Point2) -> bool {
    match pts.get_mut(index) {
        Some(slot) => {
            *slot = p;
            true
        }
        None => false,
    }
}

// =============================================================================
// Quadratic
// =============================================================================

/// A quadratic Bezier curve with control points `p0, p1, p2`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadBezier {
    pts: Vec<Point2>,
}

impl QuadBezier {
    /// An empty curve, ready to collect control points.
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete curve from its three control points.
    pub fn from_points(p0: Point2, p1: Point2, p2: Point2) -> Self {
        Self {
            pts: vec![p0, p1, p2],
        }
    }

    pub(crate) fn ctrl_points(&self) -> &[Point2] {
        &self.pts
    }

    pub(crate) fn add_ctrl_point(&mut self, p: Point2) -> bool {
        push_ctrl(&mut self.pts, 3, p)
    }

    pub(crate) fn set_ctrl_point(&mut self, index: usize, p: Point2) -> bool {
        set_ctrl(&mut self.pts, index, p)
    }

    pub(crate) fn is_possible(&self) -> bool {
        self.pts.len() == 3
    }

    pub(crate) fn eval_point(&self, t: f64) -> Point2 {
        let [p0, p1, p2] = [self.pts[0], self.pts[1], self.pts[2]];
        let s = 1.0 - t;
        Point2::from(p0.coords * (s * s) + p1.coords * (2.0 * s * t) + p2.coords * (t * t))
    }

    pub(crate) fn derivative(&self, t: f64) -> Vec2 {
        let [p0, p1, p2] = [self.pts[0], self.pts[1], self.pts[2]];
        (p1 - p0) * (2.0 * (1.0 - t)) + (p2 - p1) * (2.0 * t)
    }

    pub(crate) fn second_derivative(&self, _t: f64) -> Vec2 {
        let [p0, p1, p2] = [self.pts[0], self.pts[1], self.pts[2]];
        (p2.coords - p1.coords * 2.0 + p0.coords) * 2.0
    }

    pub(crate) fn is_straight(&self, tol: f64) -> bool {
        control_polygon_is_straight(&self.pts, tol)
    }

    pub(crate) fn split_at(&self, t: f64) -> (Curve, Curve) {
        let [p0, p1, p2] = [self.pts[0], self.pts[1], self.pts[2]];
        let p01 = lerp(&p0, &p1, t);
        let p12 = lerp(&p1, &p2, t);
        let mid = lerp(&p01, &p12, t);
        (
            Curve::QuadBezier(QuadBezier::from_points(p0, p01, mid)),
            Curve::QuadBezier(QuadBezier::from_points(mid, p12, p2)),
        )
    }
}

// =============================================================================
// Cubic
// =============================================================================

/// A cubic Bezier curve with control points `p0, p1, p2, p3`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CubicBezier {
    pts: Vec<Point2>,
}

impl CubicBezier {
    /// An empty curve, ready to collect control points.
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete curve from its four control points.
    pub fn from_points(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self {
            pts: vec![p0, p1, p2, p3],
        }
    }

    pub(crate) fn ctrl_points(&self) -> &[Point2] {
        &self.pts
    }

    pub(crate) fn add_ctrl_point(&mut self, p: Point2) -> bool {
        push_ctrl(&mut self.pts, 4, p)
    }

    pub(crate) fn set_ctrl_point(&mut self, index: usize, p: Point2) -> bool {
        set_ctrl(&mut self.pts, index, p)
    }

    pub(crate) fn is_possible(&self) -> bool {
        self.pts.len() == 4
    }

    pub(crate) fn eval_point(&self, t: f64) -> Point2 {
        let [p0, p1, p2, p3] = [self.pts[0], self.pts[1], self.pts[2], self.pts[3]];
        let s = 1.0 - t;
        Point2::from(
            p0.coords * (s * s * s)
                + p1.coords * (3.0 * s * s * t)
                + p2.coords * (3.0 * s * t * t)
                + p3.coords * (t * t * t),
        )
    }

    pub(crate) fn derivative(&self, t: f64) -> Vec2 {
        let [p0, p1, p2, p3] = [self.pts[0], self.pts[1], self.pts[2], self.pts[3]];
        let s = 1.0 - t;
        (p1 - p0) * (3.0 * s * s) + (p2 - p1) * (6.0 * s * t) + (p3 - p2) * (3.0 * t * t)
    }

    pub(crate) fn second_derivative(&self, t: f64) -> Vec2 {
        let [p0, p1, p2, p3] = [self.pts[0], self.pts[1], self.pts[2], self.pts[3]];
        let a = p2.coords - p1.coords * 2.0 + p0.coords;
        let b = p3.coords - p2.coords * 2.0 + p1.coords;
        a * (6.0 * (1.0 - t)) + b * (6.0 * t)
    }

    pub(crate) fn is_straight(&self, tol: f64) -> bool {
        control_polygon_is_straight(&self.pts, tol)
    }

    pub(crate) fn split_at(&self, t: f64) -> (Curve, Curve) {
        let [p0, p1, p2, p3] = [self.pts[0], self.pts[1], self.pts[2], self.pts[3]];
        let p01 = lerp(&p0, &p1, t);
        let p12 = lerp(&p1, &p2, t);
        let p23 = lerp(&p2, &p3, t);
        let p012 = lerp(&p01, &p12, t);
        let p123 = lerp(&p12, &p23, t);
        let mid = lerp(&p012, &p123, t);
        (
            Curve::CubicBezier(CubicBezier::from_points(p0, p01, p012, mid)),
            Curve::CubicBezier(CubicBezier::from_points(mid, p123, p23, p3)),
        )
    }
}
