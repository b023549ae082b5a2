//! Closest-point projection onto curves.

use planar_kernel_math::polyline as pl;
use planar_kernel_math::segment::closest_point_on_segment;
use planar_kernel_math::{unit_or_zero, Point2, Tolerance, Vec2};

use crate::{Curve, COORD_TOL, MAX_NUM_ITERAT, PARAM_TOL};

/// Result of projecting a point onto a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveProjection {
    /// Closest point on the curve.
    pub point: Point2,
    /// Distance from the query point.
    pub distance: f64,
    /// Curve parameter of the closest point.
    pub t: f64,
    /// Unit tangent at the closest point (zero if degenerate).
    pub tangent: Vec2,
}

impl Curve {
    fn projection_at(&self, p: &Point2, t: f64) -> CurveProjection {
        let (point, tangent) = self.eval_point_tangent(t);
        CurveProjection {
            point,
            distance: (p - point).norm(),
            t,
            tangent,
        }
    }

    fn second_derivative(&self, t: f64) -> Vec2 {
        match self {
            Curve::QuadBezier(c) => c.second_derivative(t),
            Curve::CubicBezier(c) => c.second_derivative(t),
            _ => Vec2::zeros(),
        }
    }

    /// Newton iteration on `(C(t) - p) . C'(t) = 0` starting from `t0`.
    ///
    /// Never returns a parameter farther from `p` than `t0`.
    fn refine_param(&self, p: &Point2, t0: f64) -> f64 {
        let mut t = t0.clamp(0.0, 1.0);
        for _ in 0..MAX_NUM_ITERAT {
            let diff = self.eval_point(t) - p;
            let d1 = self.derivative(t);
            let d2 = self.second_derivative(t);
            let g = diff.dot(&d1);
            let dg = d1.dot(&d1) + diff.dot(&d2);
            if dg.abs() < f64::EPSILON {
                break;
            }
            let next = (t - g / dg).clamp(0.0, 1.0);
            let done = (next - t).abs() < PARAM_TOL;
            t = next;
            if done {
                break;
            }
        }
        if (self.eval_point(t) - p).norm() > (self.eval_point(t0) - p).norm() {
            t0
        } else {
            t
        }
    }

    /// Coarse parameter from the flattened curve, then Newton refinement.
    fn project_flattened(&self, p: &Point2) -> Option<f64> {
        let flat = self.flatten(Tolerance::DEFAULT.flatness);
        let pts: Vec<Point2> = flat.iter().map(|(_, q)| *q).collect();
        let proj = pl::closest_point(&pts, p, None, COORD_TOL)?;
        let k = proj.segment.min(flat.len().saturating_sub(2));
        let t0 = flat[k].0 + proj.local * (flat[k + 1].0 - flat[k].0);
        Some(self.refine_param(p, t0))
    }

    /// Closest point on the curve to `(x, y)`.
    ///
    /// Returns `None` for an incomplete curve.
    pub fn closest_point(&self, x: f64, y: f64) -> Option<CurveProjection> {
        if !self.is_possible() {
            return None;
        }
        let p = Point2::new(x, y);
        let t = match self {
            Curve::Line(c) => {
                let q = c.ctrl_points();
                closest_point_on_segment(&p, &q[0], &q[1]).1
            }
            Curve::Polyline(c) => pl::closest_point(c.ctrl_points(), &p, None, COORD_TOL)?.param,
            Curve::Circle(c) => c.project_param(&p),
            Curve::CircleArc(c) => c.project_param(&p),
            Curve::QuadBezier(_) | Curve::CubicBezier(_) => self.project_flattened(&p)?,
        };
        Some(self.projection_at(&p, t))
    }

    /// Closest point on the curve to `(x, y)`, preferring the branch near `t_start`.
    ///
    /// Short-circuits when the curve at `t_start` already matches the point
    /// within `COORD_TOL`.
    pub fn closest_point_param(&self, x: f64, y: f64, t_start: f64) -> Option<CurveProjection> {
        if !self.is_possible() {
            return None;
        }
        let p = Point2::new(x, y);
        let t_start = t_start.clamp(0.0, 1.0);
        let at_start = self.projection_at(&p, t_start);
        if at_start.distance < COORD_TOL {
            return Some(at_start);
        }
        match self {
            Curve::Polyline(c) => {
                let t = pl::closest_point(c.ctrl_points(), &p, Some(t_start), COORD_TOL)?.param;
                Some(self.projection_at(&p, t))
            }
            Curve::QuadBezier(_) | Curve::CubicBezier(_) => {
                let local = self.projection_at(&p, self.refine_param(&p, t_start));
                let global = self.closest_point(x, y)?;
                if local.distance <= global.distance + COORD_TOL {
                    Some(local)
                } else {
                    Some(global)
                }
            }
            _ => self.closest_point(x, y),
        }
    }

    /// Unit normal pointing to the left of the direction of travel at `t`.
    pub fn normal(&self, t: f64) -> Vec2 {
        let d = unit_or_zero(self.derivative(t));
        Vec2::new(-d.y, d.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circle, CircleArc, CubicBezier, QuadBezier};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_line_projection() {
        let line = Curve::line(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0));
        let proj = line.closest_point(1.0, 2.0).unwrap();
        assert_relative_eq!(proj.t, 0.25, epsilon = 1e-12);
        assert_relative_eq!(proj.distance, 2.0, epsilon = 1e-12);
        assert_relative_eq!(proj.tangent.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circle_projection() {
        let circle = Curve::Circle(Circle::from_center_radius(Point2::origin(), 1.0));
        let proj = circle.closest_point(0.0, 3.0).unwrap();
        assert_relative_eq!(proj.t, 0.25, epsilon = 1e-12);
        assert_relative_eq!(proj.distance, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_arc_projection_clamps_to_end() {
        let arc = Curve::CircleArc(CircleArc::from_angles(Point2::origin(), 1.0, 0.0, PI / 2.0));
        let proj = arc.closest_point(-1.0, 0.1).unwrap();
        assert_eq!(proj.t, 1.0);
    }

    #[test]
    fn test_bezier_projection_refines() {
        let quad = Curve::QuadBezier(QuadBezier::from_points(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 0.0),
        ));
        // Apex of the parabola at t = 0.5 is (1, 1).
        let proj = quad.closest_point(1.0, 1.5).unwrap();
        assert_relative_eq!(proj.t, 0.5, epsilon = 1e-7);
        assert_relative_eq!(proj.distance, 0.5, epsilon = 1e-7);

        let on_curve = quad.eval_point(0.3);
        let proj = quad.closest_point(on_curve.x, on_curve.y).unwrap();
        assert_relative_eq!(proj.t, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_closest_point_param_short_circuit() {
        let cubic = Curve::CubicBezier(CubicBezier::from_points(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ));
        let p = cubic.eval_point(0.42);
        let proj = cubic.closest_point_param(p.x, p.y, 0.42).unwrap();
        assert_eq!(proj.t, 0.42);
    }

    #[test]
    fn test_closest_point_param_keeps_branch() {
        // Cubic loop that crosses itself.
        let cubic = Curve::CubicBezier(CubicBezier::from_points(
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(-1.0, 3.0),
            Point2::new(2.0, 0.0),
        ));
        let a = cubic.eval_point(0.2);
        let near_early = cubic.closest_point_param(a.x, a.y + 1e-4, 0.2).unwrap();
        assert!((near_early.t - 0.2).abs() < 0.05);
    }

    #[test]
    fn test_incomplete_curve_has_no_projection() {
        let empty = Curve::new(crate::CurveKind::Line);
        assert!(empty.closest_point(0.0, 0.0).is_none());
    }

    #[test]
    fn test_normal_points_left() {
        let line = Curve::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let n = line.normal(0.5);
        assert_relative_eq!(n.y, 1.0, epsilon = 1e-12);
    }
}
