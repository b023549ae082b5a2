//! Straight line segment primitives: projection and segment/segment intersection.

use crate::{cross, Point2};

/// Projection of a point onto the segment `a`→`b`.
///
/// Returns the closest point and its local parameter in `[0, 1]`.
pub fn closest_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> (Point2, f64) {
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 < f64::EPSILON {
        return (*a, 0.0);
    }
    let t = ((p - a).dot(&d) / len2).clamp(0.0, 1.0);
    (a + d * t, t)
}

/// Distance from `p` to the segment `a`→`b`.
pub fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (q, _) = closest_point_on_segment(p, a, b);
    (p - q).norm()
}

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// Falls back to the distance to `a` when the line is degenerate.
pub fn distance_to_line(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len = d.norm();
    if len < f64::EPSILON {
        return (p - a).norm();
    }
    cross(&d, &(p - a)).abs() / len
}

/// Check if `p` lies on the segment `a`→`b` within `tol`.
pub fn pick_segment(p: &Point2, a: &Point2, b: &Point2, tol: f64) -> bool {
    distance_to_segment(p, a, b) <= tol
}

/// Result of intersecting two straight segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments do not meet.
    None,
    /// The segments meet at a single point with local parameters `s` (first) and `t` (second).
    Point {
        /// Intersection point.
        point: Point2,
        /// Local parameter on the first segment.
        s: f64,
        /// Local parameter on the second segment.
        t: f64,
    },
    /// The segments are collinear and share a stretch of positive length.
    Overlap {
        /// Local parameters on the first segment, ascending.
        s: (f64, f64),
        /// Local parameters on the second segment matching `s.0` and `s.1`.
        t: (f64, f64),
    },
}

/// Intersect segment `a`→`b` with segment `c`→`d`.
///
/// `tol` is a coordinate tolerance: touching within `tol` counts as meeting,
/// and collinearity is decided by distance to the supporting line.
pub fn intersect_segments(
    a: &Point2,
    b: &Point2,
    c: &Point2,
    d: &Point2,
    tol: f64,
) -> SegmentIntersection {
    let r = b - a;
    let s = d - c;
    let len_r = r.norm();
    let len_s = s.norm();
    if len_r < tol || len_s < tol {
        return SegmentIntersection::None;
    }

    let denom = cross(&r, &s);
    let parallel = denom.abs() <= 1e-12 * len_r * len_s;

    if parallel {
        if distance_to_line(c, a, b) > tol {
            return SegmentIntersection::None;
        }
        // Collinear: project the second segment onto the first.
        let len2 = len_r * len_r;
        let tc = (c - a).dot(&r) / len2;
        let td = (d - a).dot(&r) / len2;
        let lo = tc.min(td).max(0.0);
        let hi = tc.max(td).min(1.0);
        let eps = tol / len_r;
        if hi < lo - eps {
            return SegmentIntersection::None;
        }
        let to_t = |u: f64| {
            let p = a + r * u;
            ((p - c).dot(&s) / (len_s * len_s)).clamp(0.0, 1.0)
        };
        if hi - lo <= eps {
            let u = ((lo + hi) * 0.5).clamp(0.0, 1.0);
            return SegmentIntersection::Point {
                point: a + r * u,
                s: u,
                t: to_t(u),
            };
        }
        return SegmentIntersection::Overlap {
            s: (lo, hi),
            t: (to_t(lo), to_t(hi)),
        };
    }

    let ac = c - a;
    let u = cross(&ac, &s) / denom;
    let v = cross(&ac, &r) / denom;
    let eps_u = tol / len_r;
    let eps_v = tol / len_s;
    if u < -eps_u || u > 1.0 + eps_u || v < -eps_v || v > 1.0 + eps_v {
        return SegmentIntersection::None;
    }
    let u = u.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    SegmentIntersection::Point {
        point: a + r * u,
        s: u,
        t: v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn test_closest_point_clamps() {
        let (q, t) = closest_point_on_segment(&p(2.0, 1.0), &p(0.0, 0.0), &p(1.0, 0.0));
        assert_eq!(q, p(1.0, 0.0));
        assert_eq!(t, 1.0);
        let (q, t) = closest_point_on_segment(&p(0.25, 3.0), &p(0.0, 0.0), &p(1.0, 0.0));
        assert!((q.x - 0.25).abs() < 1e-12);
        assert!((t - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_distance_to_line() {
        let d = distance_to_line(&p(0.5, 2.0), &p(0.0, 0.0), &p(1.0, 0.0));
        assert!((d - 2.0).abs() < 1e-12);
        assert!(pick_segment(&p(0.5, 1e-6), &p(0.0, 0.0), &p(1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_crossing_segments() {
        match intersect_segments(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0), 1e-5) {
            SegmentIntersection::Point { point, s, t } => {
                assert!((point - p(1.0, 1.0)).norm() < 1e-12);
                assert!((s - 0.5).abs() < 1e-12);
                assert!((t - 0.5).abs() < 1e-12);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_disjoint_and_touching() {
        let none = intersect_segments(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0), 1e-5);
        assert_eq!(none, SegmentIntersection::None);

        // T-junction: second segment ends on the first.
        match intersect_segments(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 1.0), &p(1.0, 0.0), 1e-5) {
            SegmentIntersection::Point { s, t, .. } => {
                assert!((s - 0.5).abs() < 1e-12);
                assert!((t - 1.0).abs() < 1e-12);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_collinear_overlap() {
        match intersect_segments(&p(0.0, 0.0), &p(2.0, 0.0), &p(3.0, 0.0), &p(1.0, 0.0), 1e-5) {
            SegmentIntersection::Overlap { s, t } => {
                assert!((s.0 - 0.5).abs() < 1e-12);
                assert!((s.1 - 1.0).abs() < 1e-12);
                assert!((t.0 - 1.0).abs() < 1e-12);
                assert!((t.1 - 0.5).abs() < 1e-12);
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_collinear_end_to_end_is_point() {
        match intersect_segments(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0), 1e-5) {
            SegmentIntersection::Point { point, s, t } => {
                assert!((point - p(1.0, 0.0)).norm() < 1e-12);
                assert!((s - 1.0).abs() < 1e-9);
                assert!(t.abs() < 1e-9);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }
}
