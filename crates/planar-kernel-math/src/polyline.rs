//! Open polyline queries parameterized by normalized arc length.
//!
//! A parameter `u` in `[0, 1]` on a polyline is the ratio between the arc
//! length from the first point and the total length. The intersection sweeps
//! report parameters in this form; callers map them back onto the curve the
//! polyline approximates.

use crate::segment::{closest_point_on_segment, intersect_segments, SegmentIntersection};
use crate::{Point2, Vec2};

/// Cumulative arc length at each polyline vertex (first entry is 0).
pub fn cumulative_lengths(points: &[Point2]) -> Vec<f64> {
    let mut cum = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    cum.push(0.0);
    for w in points.windows(2) {
        acc += (w[1] - w[0]).norm();
        cum.push(acc);
    }
    if points.is_empty() {
        cum.clear();
    }
    cum
}

/// Total length of the polyline.
pub fn length(points: &[Point2]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Point at normalized arc length `u`, with the containing segment index and local parameter.
pub fn point_at(points: &[Point2], u: f64) -> Option<(Point2, usize, f64)> {
    match points.len() {
        0 => return None,
        1 => return Some((points[0], 0, 0.0)),
        _ => {}
    }
    let cum = cumulative_lengths(points);
    let total = cum[cum.len() - 1];
    let nseg = points.len() - 1;
    if total <= f64::EPSILON {
        return Some((points[0], 0, 0.0));
    }
    let u = u.clamp(0.0, 1.0);
    if u >= 1.0 {
        return Some((points[nseg], nseg - 1, 1.0));
    }
    let s = u * total;
    let seg = cum.partition_point(|&c| c <= s).saturating_sub(1).min(nseg - 1);
    let seg_len = cum[seg + 1] - cum[seg];
    let local = if seg_len > 0.0 {
        ((s - cum[seg]) / seg_len).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some((points[seg] + (points[seg + 1] - points[seg]) * local, seg, local))
}

/// Closest point on a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineProjection {
    /// Closest point.
    pub point: Point2,
    /// Distance from the query point.
    pub distance: f64,
    /// Index of the segment holding the closest point.
    pub segment: usize,
    /// Local parameter on that segment.
    pub local: f64,
    /// Normalized arc-length parameter of the closest point.
    pub param: f64,
}

/// Project `p` onto the polyline.
///
/// Among candidates within `tie` of the minimum distance the one whose
/// parameter is closest to `hint` wins, which keeps a projection on the
/// expected branch of a self-touching polyline.
pub fn closest_point(
    points: &[Point2],
    p: &Point2,
    hint: Option<f64>,
    tie: f64,
) -> Option<PolylineProjection> {
    if points.len() < 2 {
        return points.first().map(|q| PolylineProjection {
            point: *q,
            distance: (p - q).norm(),
            segment: 0,
            local: 0.0,
            param: 0.0,
        });
    }
    let cum = cumulative_lengths(points);
    let total = cum[cum.len() - 1];
    let candidates: Vec<PolylineProjection> = points
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let (q, local) = closest_point_on_segment(p, &w[0], &w[1]);
            let param = if total > 0.0 {
                (cum[i] + local * (cum[i + 1] - cum[i])) / total
            } else {
                0.0
            };
            PolylineProjection {
                point: q,
                distance: (p - q).norm(),
                segment: i,
                local,
                param,
            }
        })
        .collect();
    let dmin = candidates
        .iter()
        .map(|c| c.distance)
        .fold(f64::INFINITY, f64::min);
    let near = candidates.iter().filter(|c| c.distance <= dmin + tie);
    match hint {
        Some(h) => near
            .min_by(|a, b| (a.param - h).abs().total_cmp(&(b.param - h).abs()))
            .copied(),
        None => near.min_by(|a, b| a.distance.total_cmp(&b.distance)).copied(),
    }
}

/// Unit direction of the polyline segment holding parameter `u`.
pub fn tangent_at(points: &[Point2], u: f64) -> Vec2 {
    match point_at(points, u) {
        Some((_, seg, _)) if points.len() >= 2 => {
            crate::unit_or_zero(points[seg + 1] - points[seg])
        }
        _ => Vec2::zeros(),
    }
}

/// Self-intersections of a single polyline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelfIntersections {
    /// Intersection points ordered by parameter.
    pub points: Vec<Point2>,
    /// Normalized arc-length parameter of each point.
    pub params: Vec<f64>,
    /// `overlap[k]` marks the stretch following `points[k]` as a repeated pass
    /// over an earlier stretch of the same polyline.
    pub overlap: Vec<bool>,
}

impl SelfIntersections {
    /// True when at least one intersection was found.
    pub fn found(&self) -> bool {
        !self.points.is_empty()
    }
}

/// Intersections of a polyline `A` with a polyline `B`, ordered along `A`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyPolyIntersections {
    /// Intersection points ordered by parameter on `A`.
    pub points: Vec<Point2>,
    /// Normalized arc-length parameter of each point on `A`.
    pub params_a: Vec<f64>,
    /// Normalized arc-length parameter of each point on `B`.
    pub params_b: Vec<f64>,
    /// `overlap_a[k]` marks the stretch of `A` following `points[k]` as coincident with `B`.
    pub overlap_a: Vec<bool>,
}

impl PolyPolyIntersections {
    /// True when at least one intersection was found.
    pub fn found(&self) -> bool {
        !self.points.is_empty()
    }
}

struct Hit {
    u: f64,
    v: f64,
    point: Point2,
}

fn param_of(cum: &[f64], seg: usize, local: f64) -> f64 {
    let total = cum[cum.len() - 1];
    if total <= 0.0 {
        return 0.0;
    }
    (cum[seg] + local * (cum[seg + 1] - cum[seg])) / total
}

fn overlap_flags(params: &[f64], discard: &[(f64, f64)]) -> Vec<bool> {
    (0..params.len())
        .map(|k| {
            let lo = params[k];
            let hi = params.get(k + 1).copied().unwrap_or(1.0);
            let mid = 0.5 * (lo + hi);
            hi > lo && discard.iter().any(|&(a, b)| mid > a && mid < b)
        })
        .collect()
}

/// Find where a polyline crosses, touches or retraces itself.
///
/// Each geometric crossing is reported twice, once per pass of the polyline
/// through that point. A stretch that retraces an earlier stretch is flagged
/// in `overlap` so callers can drop the duplicate.
pub fn self_intersections(points: &[Point2], coord_tol: f64, param_tol: f64) -> SelfIntersections {
    let n = points.len();
    if n < 3 {
        return SelfIntersections::default();
    }
    let cum = cumulative_lengths(points);
    let nseg = n - 1;
    let closed = (points[0] - points[n - 1]).norm() < coord_tol;

    let mut hits: Vec<(f64, Point2)> = Vec::new();
    let mut discard: Vec<(f64, f64)> = Vec::new();

    for i in 0..nseg {
        for j in (i + 1)..nseg {
            let adjacent = j == i + 1;
            let wraps = closed && i == 0 && j == nseg - 1;
            match intersect_segments(&points[i], &points[i + 1], &points[j], &points[j + 1], coord_tol) {
                SegmentIntersection::None => {}
                SegmentIntersection::Point { point, s, t } => {
                    if adjacent && s > 1.0 - param_tol && t < param_tol {
                        continue;
                    }
                    if wraps && s < param_tol && t > 1.0 - param_tol {
                        continue;
                    }
                    hits.push((param_of(&cum, i, s), point));
                    hits.push((param_of(&cum, j, t), point));
                }
                SegmentIntersection::Overlap { s, t } => {
                    let pi0 = param_of(&cum, i, s.0);
                    let pi1 = param_of(&cum, i, s.1);
                    let pj0 = param_of(&cum, j, t.0);
                    let pj1 = param_of(&cum, j, t.1);
                    hits.push((pi0, points[i] + (points[i + 1] - points[i]) * s.0));
                    hits.push((pi1, points[i] + (points[i + 1] - points[i]) * s.1));
                    hits.push((pj0, points[j] + (points[j + 1] - points[j]) * t.0));
                    hits.push((pj1, points[j] + (points[j + 1] - points[j]) * t.1));
                    discard.push((pj0.min(pj1), pj0.max(pj1)));
                }
            }
        }
    }

    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.dedup_by(|b, a| (b.0 - a.0).abs() < param_tol);

    let params: Vec<f64> = hits.iter().map(|h| h.0).collect();
    let overlap = overlap_flags(&params, &discard);
    SelfIntersections {
        points: hits.into_iter().map(|h| h.1).collect(),
        params,
        overlap,
    }
}

/// Find where polyline `a` meets polyline `b`.
///
/// Results are ordered by parameter along `a`. Collinear stretches shared by
/// both polylines are reported through their end points and flagged in
/// `overlap_a`.
pub fn poly_poly_intersections(
    a: &[Point2],
    b: &[Point2],
    coord_tol: f64,
    param_tol: f64,
) -> PolyPolyIntersections {
    if a.len() < 2 || b.len() < 2 {
        return PolyPolyIntersections::default();
    }
    let cum_a = cumulative_lengths(a);
    let cum_b = cumulative_lengths(b);

    let mut hits: Vec<Hit> = Vec::new();
    let mut discard: Vec<(f64, f64)> = Vec::new();

    for i in 0..a.len() - 1 {
        for j in 0..b.len() - 1 {
            match intersect_segments(&a[i], &a[i + 1], &b[j], &b[j + 1], coord_tol) {
                SegmentIntersection::None => {}
                SegmentIntersection::Point { point, s, t } => hits.push(Hit {
                    u: param_of(&cum_a, i, s),
                    v: param_of(&cum_b, j, t),
                    point,
                }),
                SegmentIntersection::Overlap { s, t } => {
                    let u0 = param_of(&cum_a, i, s.0);
                    let u1 = param_of(&cum_a, i, s.1);
                    hits.push(Hit {
                        u: u0,
                        v: param_of(&cum_b, j, t.0),
                        point: a[i] + (a[i + 1] - a[i]) * s.0,
                    });
                    hits.push(Hit {
                        u: u1,
                        v: param_of(&cum_b, j, t.1),
                        point: a[i] + (a[i + 1] - a[i]) * s.1,
                    });
                    discard.push((u0, u1));
                }
            }
        }
    }

    hits.sort_by(|x, y| x.u.total_cmp(&y.u).then(x.v.total_cmp(&y.v)));
    hits.dedup_by(|y, x| (y.u - x.u).abs() < param_tol && (y.v - x.v).abs() < param_tol);

    let params_a: Vec<f64> = hits.iter().map(|h| h.u).collect();
    let overlap_a = overlap_flags(&params_a, &discard);
    PolyPolyIntersections {
        points: hits.iter().map(|h| h.point).collect(),
        params_b: hits.iter().map(|h| h.v).collect(),
        params_a,
        overlap_a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COORD: f64 = 1e-5;
    const PARAM: f64 = 1e-7;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn test_point_at_arc_length() {
        let pl = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 3.0)]);
        assert!((length(&pl) - 4.0).abs() < 1e-12);
        let (p, seg, local) = point_at(&pl, 0.5).unwrap();
        assert_eq!(seg, 1);
        assert!((local - 1.0 / 3.0).abs() < 1e-12);
        assert!((p - Point2::new(1.0, 1.0)).norm() < 1e-12);
        assert_eq!(point_at(&pl, 1.0).unwrap().0, pl[2]);
        assert_eq!(point_at(&pl, 0.0).unwrap().0, pl[0]);
    }

    #[test]
    fn test_closest_point_param() {
        let pl = pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]);
        let proj = closest_point(&pl, &Point2::new(3.0, 1.0), None, COORD).unwrap();
        assert!((proj.point - Point2::new(2.0, 1.0)).norm() < 1e-12);
        assert!((proj.distance - 1.0).abs() < 1e-12);
        assert!((proj.param - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_closest_point_hint_picks_branch() {
        // Loop passing through (1, 0) twice.
        let pl = pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, -1.0)]);
        let q = Point2::new(1.0, 0.0);
        let early = closest_point(&pl, &q, Some(0.0), COORD).unwrap();
        let late = closest_point(&pl, &q, Some(1.0), COORD).unwrap();
        assert!(early.param < 0.2);
        assert!(late.param > 0.7);
    }

    #[test]
    fn test_self_intersection_crossing() {
        // Figure with one crossing at (1, 0).
        let pl = pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, -1.0)]);
        let si = self_intersections(&pl, COORD, PARAM);
        assert!(si.found());
        assert_eq!(si.points.len(), 2);
        assert!((si.points[0] - Point2::new(1.0, 0.0)).norm() < 1e-9);
        assert!((si.points[1] - Point2::new(1.0, 0.0)).norm() < 1e-9);
        assert!(si.params[0] < si.params[1]);
        assert!(si.overlap.iter().all(|&o| !o));
    }

    #[test]
    fn test_self_intersection_closed_ring_is_clean() {
        let pl = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let si = self_intersections(&pl, COORD, PARAM);
        assert!(!si.found());
    }

    #[test]
    fn test_self_intersection_retrace_is_overlap() {
        // Goes out to (2,0) and comes back to (1,0).
        let pl = pts(&[(0.0, 0.0), (2.0, 0.0), (1.0, 0.0)]);
        let si = self_intersections(&pl, COORD, PARAM);
        assert!(si.found());
        assert_eq!(si.overlap.len(), si.params.len());
        assert!(si.overlap.iter().any(|&o| o));
        // The retraced stretch starts at the turning point (2,0).
        let k = si.overlap.iter().position(|&o| o).unwrap();
        assert!((si.points[k] - Point2::new(2.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_poly_poly_crossing() {
        let a = pts(&[(0.0, 0.0), (2.0, 2.0)]);
        let b = pts(&[(0.0, 2.0), (2.0, 0.0)]);
        let res = poly_poly_intersections(&a, &b, COORD, PARAM);
        assert_eq!(res.points.len(), 1);
        assert!((res.params_a[0] - 0.5).abs() < 1e-12);
        assert!((res.params_b[0] - 0.5).abs() < 1e-12);
        assert_eq!(res.overlap_a, vec![false]);
    }

    #[test]
    fn test_poly_poly_vertex_hit_reported_once() {
        let a = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let b = pts(&[(1.0, -1.0), (1.0, 1.0)]);
        let res = poly_poly_intersections(&a, &b, COORD, PARAM);
        assert_eq!(res.points.len(), 1);
        assert!((res.params_a[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_poly_poly_overlap_flags() {
        let a = pts(&[(0.0, 0.0), (3.0, 0.0)]);
        let b = pts(&[(1.0, 0.0), (2.0, 0.0)]);
        let res = poly_poly_intersections(&a, &b, COORD, PARAM);
        assert_eq!(res.points.len(), 2);
        assert!((res.params_a[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((res.params_a[1] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(res.overlap_a, vec![true, false]);
    }
}
