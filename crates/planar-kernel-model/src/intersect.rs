//! Self-intersection subdivision and pairwise segment intersection.
//!
//! Both operations start from the cached polylines, map the polyline hits
//! back onto the curves, refine them there and split the segments at the
//! refined parameters. Callers insert the returned pieces and remove the
//! originals.

use planar_kernel_geom::intersect_params;
use planar_kernel_math::{polyline as pl, Point2, Tolerance};

use crate::Segment;

/// One resolved cut: curve parameter, exact coordinate, and whether the
/// stretch following it is a duplicate to drop.
#[derive(Debug, Clone, Copy)]
struct Cut {
    t: f64,
    point: Point2,
    overlap: bool,
}

fn sort_and_dedup(cuts: &mut Vec<Cut>, param_tol: f64) {
    cuts.sort_by(|a, b| a.t.total_cmp(&b.t));
    cuts.dedup_by(|later, kept| {
        if (later.t - kept.t).abs() < param_tol {
            kept.overlap = later.overlap;
            true
        } else {
            false
        }
    });
}

/// Resolve a polyline hit at arc-length fraction `u` onto the segment's curve.
fn resolve(segment: &Segment, u: f64, point: &Point2, tol: &Tolerance) -> (f64, Point2) {
    let t0 = segment.curve_param_at(u);
    match segment.curve().closest_point_param(point.x, point.y, t0) {
        Some(proj) => (tol.snap_param(proj.t), proj.point),
        None => (tol.snap_param(t0), *point),
    }
}

/// Split `segment` at the cuts, dropping pieces that follow an overlap cut.
fn split_at_cuts(segment: &Segment, cuts: &[Cut]) -> Vec<Segment> {
    let params: Vec<f64> = cuts.iter().map(|c| c.t).collect();
    let points: Vec<Point2> = cuts.iter().map(|c| c.point).collect();
    let keep = std::iter::once(false).chain(cuts.iter().map(|c| c.overlap));
    segment
        .split(&params, &points)
        .into_iter()
        .zip(keep)
        .filter_map(|(piece, overlap)| if overlap { None } else { piece })
        .collect()
}

/// Pieces of a segment whose curve crosses or retraces itself.
///
/// Returns `None` when the curve does not intersect itself.
pub fn subdivide_self_intersected(segment: &Segment, tol: &Tolerance) -> Option<Vec<Segment>> {
    let hits = pl::self_intersections(segment.polyline(), tol.coord, tol.param);
    if !hits.found() {
        return None;
    }

    let mut cuts: Vec<Cut> = hits
        .params
        .iter()
        .zip(&hits.points)
        .zip(&hits.overlap)
        .map(|((&u, p), &overlap)| {
            let (t, point) = resolve(segment, u, p, tol);
            Cut { t, point, overlap }
        })
        .collect();

    // Every crossing shows up once per pass; make both passes share one point.
    let curve = segment.curve();
    let mut merged = vec![false; cuts.len()];
    for i in 0..cuts.len() {
        if merged[i] {
            continue;
        }
        for j in (i + 1)..cuts.len() {
            if merged[j]
                || (cuts[i].point - cuts[j].point).norm() > tol.dist
                || tol.is_zero_param(cuts[i].t - cuts[j].t)
            {
                continue;
            }
            let hit = intersect_params(curve, curve, cuts[i].t, cuts[j].t);
            let point = if hit.converged && !tol.is_zero_param(hit.t_a - hit.t_b) {
                cuts[i].t = tol.snap_param(hit.t_a);
                cuts[j].t = tol.snap_param(hit.t_b);
                hit.point
            } else {
                Point2::from((cuts[i].point.coords + cuts[j].point.coords) * 0.5)
            };
            cuts[i].point = point;
            cuts[j].point = point;
            merged[i] = true;
            merged[j] = true;
            break;
        }
    }

    sort_and_dedup(&mut cuts, tol.param);
    let pieces = split_at_cuts(segment, &cuts);
    log::debug!(
        "self-intersection: {} cuts, {} pieces kept",
        cuts.len(),
        pieces.len()
    );
    Some(pieces)
}

/// Pieces produced by intersecting two segments.
#[derive(Debug, Clone)]
pub struct IntersectionPieces {
    /// Pieces of the first segment (overlapping stretches dropped).
    pub first: Vec<Segment>,
    /// Pieces of the second segment.
    pub second: Vec<Segment>,
}

/// Move the end points of `pts` onto `other` when they lie within `attract`.
fn attract_ends(pts: &mut [Point2], other: &[Point2], attract: f64) {
    let n = pts.len();
    for k in [0, n - 1] {
        if let Some(proj) = pl::closest_point(other, &pts[k], None, 0.0) {
            if proj.distance <= attract {
                pts[k] = proj.point;
            }
        }
    }
}

/// Intersect two segments and split both at every meeting point.
///
/// End points lying within `attract` of the other segment are treated as
/// meeting it. Returns `None` when the segments neither meet nor touch.
pub fn intersect_segments(
    a: &Segment,
    b: &Segment,
    tol: &Tolerance,
    attract: f64,
) -> Option<IntersectionPieces> {
    let mut pa = a.polyline().to_vec();
    let mut pb = b.polyline().to_vec();
    attract_ends(&mut pa, b.polyline(), attract);
    attract_ends(&mut pb, &pa, attract);

    let hits = pl::poly_poly_intersections(&pa, &pb, tol.coord, tol.param);
    if !hits.found() {
        return None;
    }

    let mut cuts_a = Vec::with_capacity(hits.points.len());
    let mut cuts_b = Vec::with_capacity(hits.points.len());
    for k in 0..hits.points.len() {
        let hit_point = hits.points[k];
        let (mut ta, mut point) = resolve(a, hits.params_a[k], &hit_point, tol);
        let (mut tb, _) = resolve(b, hits.params_b[k], &hit_point, tol);
        let refined = intersect_params(a.curve(), b.curve(), ta, tb);
        if refined.converged {
            ta = tol.snap_param(refined.t_a);
            tb = tol.snap_param(refined.t_b);
            point = refined.point;
        } else if (point - hit_point).norm() > tol.coord {
            point = hit_point;
        }
        cuts_a.push(Cut {
            t: ta,
            point,
            overlap: hits.overlap_a[k],
        });
        cuts_b.push(Cut {
            t: tb,
            point,
            overlap: false,
        });
    }

    // Ordered along A; B may run the other way or meander.
    sort_and_dedup(&mut cuts_a, tol.param);
    sort_and_dedup(&mut cuts_b, tol.param);

    let first = split_at_cuts(a, &cuts_a);
    let second = split_at_cuts(b, &cuts_b);
    if unchanged(a, &first) && unchanged(b, &second) {
        return None;
    }
    log::debug!(
        "segment intersection: {} points, {} + {} pieces",
        hits.points.len(),
        first.len(),
        second.len()
    );
    Some(IntersectionPieces { first, second })
}

fn unchanged(original: &Segment, pieces: &[Segment]) -> bool {
    match pieces {
        [only] => {
            only.start_point() == original.start_point() && only.end_point() == original.end_point()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planar_kernel_geom::{Curve, CurveKind};

    const FLAT: f64 = 1e-3;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn line(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(Curve::line(p(a.0, a.1), p(b.0, b.1)), FLAT).unwrap()
    }

    #[test]
    fn test_crossing_lines_split_in_two() {
        let a = line((0.0, 0.0), (2.0, 2.0));
        let b = line((0.0, 2.0), (2.0, 0.0));
        let out = intersect_segments(&a, &b, &Tolerance::DEFAULT, 1e-3).unwrap();
        assert_eq!(out.first.len(), 2);
        assert_eq!(out.second.len(), 2);
        let joint = out.first[0].end_point();
        assert_relative_eq!(joint.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(joint.y, 1.0, epsilon = 1e-9);
        assert_eq!(out.first[1].start_point(), joint);
        assert_eq!(out.second[0].end_point(), joint);
        assert_eq!(out.second[1].start_point(), joint);
    }

    #[test]
    fn test_disjoint_segments() {
        let a = line((0.0, 0.0), (1.0, 0.0));
        let b = line((0.0, 1.0), (1.0, 1.0));
        assert!(intersect_segments(&a, &b, &Tolerance::DEFAULT, 1e-3).is_none());
    }

    #[test]
    fn test_shared_corner_is_not_a_split() {
        let a = line((0.0, 0.0), (1.0, 0.0));
        let b = line((1.0, 0.0), (1.0, 1.0));
        assert!(intersect_segments(&a, &b, &Tolerance::DEFAULT, 1e-3).is_none());
    }

    #[test]
    fn test_endpoint_attraction_makes_t_junction() {
        // `a` stops just short of `b`.
        let a = line((0.0, 0.5), (0.9995, 0.5));
        let b = line((1.0, 0.0), (1.0, 1.0));
        let out = intersect_segments(&a, &b, &Tolerance::DEFAULT, 1e-3).unwrap();
        assert_eq!(out.first.len(), 1);
        assert_eq!(out.second.len(), 2);
        let joint = out.second[0].end_point();
        assert_relative_eq!(joint.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(joint.y, 0.5, epsilon = 1e-9);
        assert_eq!(out.first[0].end_point(), joint);
    }

    #[test]
    fn test_reversed_second_segment_is_ordered() {
        // `b` zig-zags across `a` so its hits come out of order along `a`.
        let a = line((0.0, 0.0), (4.0, 0.0));
        let b = Segment::new(
            Curve::polyline(vec![p(3.0, 1.0), p(3.0, -1.0), p(1.0, 1.0), p(1.0, -1.0)]),
            FLAT,
        )
        .unwrap();
        let out = intersect_segments(&a, &b, &Tolerance::DEFAULT, 1e-3).unwrap();
        assert_eq!(out.first.len(), 4);
        assert_eq!(out.second.len(), 4);
        for pair in out.second.windows(2) {
            assert_eq!(pair[0].end_point(), pair[1].start_point());
        }
    }

    #[test]
    fn test_figure_eight_polyline() {
        // Bow tie: the first and third legs cross at (1, 1).
        let seg = Segment::new(
            Curve::polyline(vec![p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)]),
            FLAT,
        )
        .unwrap();
        let pieces = subdivide_self_intersected(&seg, &Tolerance::DEFAULT).unwrap();
        assert_eq!(pieces.len(), 3);
        assert!(pieces.iter().all(|s| s.curve().kind() == CurveKind::Polyline
            || s.curve().kind() == CurveKind::Line));
        let joint = pieces[0].end_point();
        assert_relative_eq!(joint.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(joint.y, 1.0, epsilon = 1e-9);
        assert_eq!(pieces[2].start_point(), joint);
    }

    #[test]
    fn test_simple_curve_has_no_self_intersection() {
        let seg = line((0.0, 0.0), (1.0, 1.0));
        assert!(subdivide_self_intersected(&seg, &Tolerance::DEFAULT).is_none());
    }
}
