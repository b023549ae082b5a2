//! Parametric curve/curve intersection refinement.

use nalgebra::Matrix2;
use planar_kernel_math::Point2;

use crate::{Curve, COORD_TOL, MAX_NUM_ITERAT, MIN_STEP_REDUCT};

/// Outcome of refining an intersection between two curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveIntersection {
    /// Whether the iteration reached `COORD_TOL`.
    pub converged: bool,
    /// Shared point (midpoint of both curve evaluations).
    pub point: Point2,
    /// Parameter on the first curve.
    pub t_a: f64,
    /// Parameter on the second curve.
    pub t_b: f64,
}

fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::from((a.coords + b.coords) * 0.5)
}

/// Refine an approximate intersection of `a` and `b` starting at `(t_a, t_b)`.
///
/// Damped Newton iteration on `A(t_a) - B(t_b) = 0`. When the Jacobian is
/// singular (tangent curves) or the step cannot be reduced any further, the
/// starting parameters are returned with `converged = false`.
pub fn intersect_params(a: &Curve, b: &Curve, t_a: f64, t_b: f64) -> CurveIntersection {
    let start_a = t_a.clamp(0.0, 1.0);
    let start_b = t_b.clamp(0.0, 1.0);
    let (mut ta, mut tb) = (start_a, start_b);
    let mut f = a.eval_point(ta) - b.eval_point(tb);

    for _ in 0..MAX_NUM_ITERAT {
        if f.norm() < COORD_TOL {
            break;
        }
        let da = a.derivative(ta);
        let db = b.derivative(tb);
        let jac = Matrix2::from_columns(&[da, -db]);
        let scale = da.norm() * db.norm();
        if jac.determinant().abs() <= 1e-12 * scale.max(f64::MIN_POSITIVE) {
            break;
        }
        let Some(inv) = jac.try_inverse() else {
            break;
        };
        let step = inv * (-f);

        let mut lambda = 1.0;
        let mut improved = false;
        while lambda >= MIN_STEP_REDUCT {
            let na = (ta + lambda * step.x).clamp(0.0, 1.0);
            let nb = (tb + lambda * step.y).clamp(0.0, 1.0);
            let nf = a.eval_point(na) - b.eval_point(nb);
            if nf.norm() < f.norm() {
                ta = na;
                tb = nb;
                f = nf;
                improved = true;
                break;
            }
            lambda *= 0.5;
        }
        if !improved {
            break;
        }
    }

    if f.norm() < COORD_TOL {
        return CurveIntersection {
            converged: true,
            point: midpoint(&a.eval_point(ta), &b.eval_point(tb)),
            t_a: ta,
            t_b: tb,
        };
    }

    log::debug!(
        "curve intersection did not converge from ({start_a:.6}, {start_b:.6}), residual {:.3e}",
        f.norm()
    );
    CurveIntersection {
        converged: false,
        point: midpoint(&a.eval_point(start_a), &b.eval_point(start_b)),
        t_a: start_a,
        t_b: start_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circle, QuadBezier};
    use approx::assert_relative_eq;

    #[test]
    fn test_crossing_lines() {
        let a = Curve::line(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
        let b = Curve::line(Point2::new(0.0, 2.0), Point2::new(2.0, 0.0));
        let hit = intersect_params(&a, &b, 0.4, 0.6);
        assert!(hit.converged);
        assert_relative_eq!(hit.t_a, 0.5, epsilon = 1e-9);
        assert_relative_eq!(hit.t_b, 0.5, epsilon = 1e-9);
        assert!((hit.point - Point2::new(1.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn test_line_and_circle() {
        let circle = Curve::Circle(Circle::from_center_radius(Point2::origin(), 1.0));
        let line = Curve::line(Point2::new(0.0, -2.0), Point2::new(0.0, 2.0));
        let hit = intersect_params(&line, &circle, 0.74, 0.26);
        assert!(hit.converged);
        assert_relative_eq!(hit.t_a, 0.75, epsilon = 1e-6);
        assert_relative_eq!(hit.t_b, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_bezier_refines_polyline_estimate() {
        let quad = Curve::QuadBezier(QuadBezier::from_points(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 0.0),
        ));
        let line = Curve::line(Point2::new(0.0, 0.5), Point2::new(2.0, 0.5));
        let hit = intersect_params(&quad, &line, 0.2, 0.2);
        assert!(hit.converged);
        assert!((quad.eval_point(hit.t_a).y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_parallel_lines_do_not_converge() {
        let a = Curve::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let b = Curve::line(Point2::new(0.0, 1.0), Point2::new(1.0, 1.0));
        let hit = intersect_params(&a, &b, 0.3, 0.7);
        assert!(!hit.converged);
        assert_eq!(hit.t_a, 0.3);
        assert_eq!(hit.t_b, 0.7);
    }
}
