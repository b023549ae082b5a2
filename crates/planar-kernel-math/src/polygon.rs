//! Closed polygon queries: winding, containment and ear-clip triangulation.
//!
//! Polygons are plain point slices; the closing edge from the last point back
//! to the first is implicit and the first point is never repeated.

use crate::{area2, Point2};

/// Signed area of the polygon.
/// Positive for counter-clockwise, negative for clockwise.
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// Is the polygon counter-clockwise?
pub fn is_ccw(points: &[Point2]) -> bool {
    signed_area(points) > 0.0
}

/// Even-odd ray-casting containment test.
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Distance from `point` to the nearest polygon edge.
pub fn distance_to_boundary(point: &Point2, polygon: &[Point2]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| crate::segment::distance_to_segment(point, &polygon[i], &polygon[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Check if `p` lies strictly inside triangle `abc` (either winding).
pub fn point_in_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < f64::MIN_POSITIVE {
        return false;
    }
    let inv_denom = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

    // Use small epsilon to avoid boundary issues
    let eps = 1e-10;
    u > eps && v > eps && (u + v) < 1.0 - eps
}

/// Centroid of triangle `abc`.
pub fn triangle_centroid(a: &Point2, b: &Point2, c: &Point2) -> Point2 {
    Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}

/// Triangulate a simple polygon by ear clipping.
///
/// Works for either winding; the returned triangles follow the polygon's
/// winding. Vertices collinear with both neighbors are dropped without
/// emitting a triangle. When no ear can be found (self-overlapping input)
/// the triangles found so far are returned.
pub fn triangulate(points: &[Point2]) -> Vec<[usize; 3]> {
    let mut out = Vec::new();
    if points.len() < 3 {
        return out;
    }

    let ccw = signed_area(points) >= 0.0;
    let scale = points
        .iter()
        .skip(1)
        .map(|p| (p - points[0]).norm_squared())
        .fold(0.0, f64::max);
    let flat = 1e-14 * scale.max(f64::MIN_POSITIVE);

    let mut remaining: Vec<usize> = (0..points.len()).collect();

    while remaining.len() > 3 {
        let n = remaining.len();
        let mut found_ear = false;

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;

            let a = &points[remaining[prev]];
            let b = &points[remaining[i]];
            let c = &points[remaining[next]];

            let cross = area2(a, b, c);
            if cross.abs() <= flat {
                remaining.remove(i);
                found_ear = true;
                break;
            }

            // Check if this is a convex vertex (ear candidate)
            let is_convex = if ccw { cross > 0.0 } else { cross < 0.0 };
            if !is_convex {
                continue;
            }

            // Check if any other vertex is inside this triangle
            let is_ear = (0..n)
                .filter(|&j| j != prev && j != i && j != next)
                .all(|j| !point_in_triangle(&points[remaining[j]], a, b, c));

            if is_ear {
                out.push([remaining[prev], remaining[i], remaining[next]]);
                remaining.remove(i);
                found_ear = true;
                break;
            }
        }

        if !found_ear {
            break;
        }
    }

    // Final triangle
    if remaining.len() == 3 {
        let [a, b, c] = [remaining[0], remaining[1], remaining[2]];
        if area2(&points[a], &points[b], &points[c]).abs() > flat {
            out.push([a, b, c]);
        }
    }

    out
}

/// Area of a simple polygon computed as the sum of its triangulation's signed areas.
pub fn triangulated_area(points: &[Point2]) -> f64 {
    triangulate(points)
        .iter()
        .map(|&[a, b, c]| 0.5 * area2(&points[a], &points[b], &points[c]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_signed_area_and_winding() {
        let mut sq = unit_square();
        assert!((signed_area(&sq) - 1.0).abs() < 1e-12);
        assert!(is_ccw(&sq));
        sq.reverse();
        assert!((signed_area(&sq) + 1.0).abs() < 1e-12);
        assert!(!is_ccw(&sq));
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = unit_square();
        assert!(point_in_polygon(&Point2::new(0.5, 0.5), &sq));
        assert!(!point_in_polygon(&Point2::new(1.5, 0.5), &sq));
        assert!(!point_in_polygon(&Point2::new(0.5, -0.1), &sq));
    }

    #[test]
    fn test_distance_to_boundary() {
        let sq = unit_square();
        let d = distance_to_boundary(&Point2::new(0.5, 0.25), &sq);
        assert!((d - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_triangulate_concave() {
        // L-shape, area 3
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let tris = triangulate(&pts);
        assert_eq!(tris.len(), 4);
        assert!((triangulated_area(&pts) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangulate_with_collinear_vertices() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(1.0, 1.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.5),
        ];
        assert!((triangulated_area(&pts) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangulate_clockwise_area_is_negative() {
        let mut sq = unit_square();
        sq.reverse();
        assert!((triangulated_area(&sq) + 1.0).abs() < 1e-12);
    }
}
