//! Full circles and counter-clockwise circular arcs.

use std::f64::consts::{PI, TAU};

use planar_kernel_math::{Point2, Vec2};

use crate::{Curve, COORD_TOL, PARAM_TOL};

/// Fixed angular step used to flatten circles and arcs.
pub const ANGLE_STEP: f64 = PI / 32.0;

fn on_circle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    let (s, c) = angle.sin_cos();
    center + Vec2::new(c, s) * radius
}

fn angle_of(center: &Point2, p: &Point2) -> f64 {
    let d = p - center;
    d.y.atan2(d.x)
}

// =============================================================================
// Circle
// =============================================================================

/// A full circle given by its center and a point on the rim.
///
/// Parameterization: angle `2πt` measured from the +x axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circle {
    pts: Vec<Point2>,
    radius: f64,
}

impl Circle {
    /// An empty circle, ready to collect control points.
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete circle.
    pub fn from_center_radius(center: Point2, radius: f64) -> Self {
        Self {
            pts: vec![center, center + Vec2::new(radius, 0.0)],
            radius,
        }
    }

    /// Center point (origin for an empty circle).
    pub fn center(&self) -> Point2 {
        self.pts.first().copied().unwrap_or_else(Point2::origin)
    }

    /// Radius (zero until the rim point is collected).
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn update_radius(&mut self) {
        self.radius = match self.pts.as_slice() {
            [c, r, ..] => (r - c).norm(),
            _ => 0.0,
        };
    }

    pub(crate) fn ctrl_points(&self) -> &[Point2] {
        &self.pts
    }

    pub(crate) fn add_ctrl_point(&mut self, p: Point2) -> bool {
        if self.pts.len() >= 2 {
            return false;
        }
        self.pts.push(p);
        self.update_radius();
        true
    }

    pub(crate) fn set_ctrl_point(&mut self, index: usize, p: Point2) -> bool {
        let Some(slot) = self.pts.get_mut(index) else {
            return false;
        };
        *slot = p;
        self.update_radius();
        true
    }

    pub(crate) fn is_possible(&self) -> bool {
        self.pts.len() == 2 && self.radius > COORD_TOL
    }

    pub(crate) fn eval_point(&self, t: f64) -> Point2 {
        on_circle(&self.center(), self.radius, TAU * t)
    }

    pub(crate) fn derivative(&self, t: f64) -> Vec2 {
        let (s, c) = (TAU * t).sin_cos();
        Vec2::new(-s, c) * (TAU * self.radius)
    }

    pub(crate) fn sample(&self) -> Vec<(f64, Point2)> {
        let n = (TAU / ANGLE_STEP).round() as usize;
        let mut out: Vec<(f64, Point2)> = (0..n)
            .map(|k| {
                let t = k as f64 / n as f64;
                (t, self.eval_point(t))
            })
            .collect();
        out.push((1.0, out[0].1));
        out
    }

    /// Parameter of the rim point nearest to `p`.
    pub(crate) fn project_param(&self, p: &Point2) -> f64 {
        if (p - self.center()).norm() < COORD_TOL {
            return 0.0;
        }
        angle_of(&self.center(), p).rem_euclid(TAU) / TAU
    }

    pub(crate) fn split_at(&self, t: f64) -> (Curve, Curve) {
        let c = self.center();
        let a = TAU * t;
        (
            Curve::CircleArc(CircleArc::from_angles(c, self.radius, 0.0, a)),
            Curve::CircleArc(CircleArc::from_angles(c, self.radius, a, TAU)),
        )
    }
}

// =============================================================================
// CircleArc
// =============================================================================

/// A counter-clockwise circular arc.
///
/// Control points are the center, the start point (which fixes the radius)
/// and a point giving the end direction. The sweep runs counter-clockwise
/// from the start angle to the end angle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircleArc {
    pts: Vec<Point2>,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
}

impl CircleArc {
    /// An empty arc, ready to collect control points.
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete arc sweeping from `start_angle` to `end_angle` (radians, counter-clockwise).
    pub fn from_angles(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            pts: vec![
                center,
                on_circle(&center, radius, start_angle),
                on_circle(&center, radius, end_angle),
            ],
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Center point (origin for an empty arc).
    pub fn center(&self) -> Point2 {
        self.pts.first().copied().unwrap_or_else(Point2::origin)
    }

    /// Radius (zero until the start point is collected).
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Start and end angles in radians, with `end >= start`.
    pub fn angles(&self) -> (f64, f64) {
        (self.start_angle, self.end_angle)
    }

    fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    fn update_geometry(&mut self) {
        let c = self.center();
        if let Some(start) = self.pts.get(1) {
            self.radius = (start - c).norm();
            self.start_angle = angle_of(&c, start);
        }
        if let Some(end) = self.pts.get(2) {
            let mut ea = angle_of(&c, end);
            if ea < self.start_angle {
                ea += TAU;
            }
            self.end_angle = ea;
        }
    }

    pub(crate) fn ctrl_points(&self) -> &[Point2] {
        &self.pts
    }

    pub(crate) fn add_ctrl_point(&mut self, p: Point2) -> bool {
        if self.pts.len() >= 3 {
            return false;
        }
        self.pts.push(p);
        self.update_geometry();
        true
    }

    pub(crate) fn set_ctrl_point(&mut self, index: usize, p: Point2) -> bool {
        let Some(slot) = self.pts.get_mut(index) else {
            return false;
        };
        *slot = p;
        self.update_geometry();
        true
    }

    pub(crate) fn is_possible(&self) -> bool {
        self.pts.len() == 3 && self.radius > COORD_TOL && self.sweep() > PARAM_TOL
    }

    pub(crate) fn eval_point(&self, t: f64) -> Point2 {
        on_circle(&self.center(), self.radius, self.start_angle + t * self.sweep())
    }

    pub(crate) fn derivative(&self, t: f64) -> Vec2 {
        let (s, c) = (self.start_angle + t * self.sweep()).sin_cos();
        Vec2::new(-s, c) * (self.sweep() * self.radius)
    }

    pub(crate) fn sample(&self) -> Vec<(f64, Point2)> {
        let n = ((self.sweep() / ANGLE_STEP).ceil() as usize).max(2);
        (0..=n)
            .map(|k| {
                let t = k as f64 / n as f64;
                (t, self.eval_point(t))
            })
            .collect()
    }

    /// Parameter of the arc point nearest to `p`.
    pub(crate) fn project_param(&self, p: &Point2) -> f64 {
        let c = self.center();
        if (p - c).norm() < COORD_TOL {
            return 0.0;
        }
        let rel = (angle_of(&c, p) - self.start_angle).rem_euclid(TAU);
        if rel <= self.sweep() {
            return rel / self.sweep();
        }
        let d0 = (p - self.eval_point(0.0)).norm();
        let d1 = (p - self.eval_point(1.0)).norm();
        if d0 <= d1 {
            0.0
        } else {
            1.0
        }
    }

    pub(crate) fn split_at(&self, t: f64) -> (Curve, Curve) {
        let c = self.center();
        let a = self.start_angle + t * self.sweep();
        (
            Curve::CircleArc(CircleArc::from_angles(c, self.radius, self.start_angle, a)),
            Curve::CircleArc(CircleArc::from_angles(c, self.radius, a, self.end_angle)),
        )
    }
}
