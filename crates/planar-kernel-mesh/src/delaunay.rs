//! Unstructured triangle meshing of patches with holes.
//!
//! The boundary points are triangulated together with interior points laid
//! out on an equilateral lattice whose spacing is the longest boundary edge
//! `L`. The unconstrained Delaunay triangulation is then made to conform to
//! the boundary: every loop edge missing from it is split at its midpoint and
//! the points are triangulated again until all boundary sub-edges appear.
//! Triangles outside the outer loop or inside a hole are removed by flooding
//! from the hull and from a marker inside every hole.
//!
//! The conforming mesh is refined in the manner of Ruppert: a triangle larger
//! than the equilateral triangle of side `L`, or with an angle under 20
//! degrees, gets its circumcenter inserted. A circumcenter that encroaches a
//! boundary sub-edge splits that sub-edge instead. Triangles far below the
//! area target are left alone, so sharp input corners do not refine forever.
//!
//! Split points are appended after the interior points; the boundary points
//! always keep their indices at the front of the node list.

use std::collections::{BTreeSet, HashSet, VecDeque};

use delaunator::Triangulation;
use planar_kernel_math::polygon::{
    distance_to_boundary, point_in_polygon, signed_area, triangle_centroid, triangulate,
};
use planar_kernel_math::{area2, Point2};

use crate::{orient_and_dedup, Element, MeshError, MeshGenerator, PatchMesh, Result};

/// Rounds of boundary recovery allowed after each triangulation.
const MAX_RECOVERY_ROUNDS: usize = 64;

/// Rounds of quality refinement.
const MAX_REFINE_ROUNDS: usize = 64;

/// Smallest angle accepted without refinement, in degrees.
const MIN_ANGLE_DEG: f64 = 20.0;

/// Delaunay mesh of an outer loop and any number of hole loops.
#[derive(Debug, Clone, Default)]
pub struct MeshDelaunay {
    /// Number of boundary points on every loop, outer loop first.
    loop_sizes: Vec<usize>,
}

impl MeshDelaunay {
    /// A generator with no loop configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn tri_nodes(dt: &Triangulation, t: usize) -> [usize; 3] {
    [dt.triangles[3 * t], dt.triangles[3 * t + 1], dt.triangles[3 * t + 2]]
}

fn edge_at(dt: &Triangulation, e: usize) -> (usize, usize) {
    edge_key(dt.triangles[e], dt.triangles[delaunator::next_halfedge(e)])
}

fn delaunay(points: &[Point2]) -> Triangulation {
    let coords: Vec<delaunator::Point> = points
        .iter()
        .map(|p| delaunator::Point { x: p.x, y: p.y })
        .collect();
    delaunator::triangulate(&coords)
}

/// Interior point that is guaranteed to lie inside the polygon.
fn hole_marker(hole: &[Point2]) -> Option<Point2> {
    let [a, b, c] = *triangulate(hole).first()?;
    Some(triangle_centroid(&hole[a], &hole[b], &hole[c]))
}

/// Inclusive containment test, either winding.
fn triangle_contains(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let d0 = area2(a, b, p);
    let d1 = area2(b, c, p);
    let d2 = area2(c, a, p);
    let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
    let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
    !(has_neg && has_pos)
}

fn inside_region(p: &Point2, loops: &[&[Point2]]) -> bool {
    point_in_polygon(p, loops[0]) && !loops[1..].iter().any(|h| point_in_polygon(p, h))
}

/// Lattice points strictly inside the region and away from its boundary.
fn interior_points(loops: &[&[Point2]], spacing: f64) -> Vec<Point2> {
    let outer = loops[0];
    let (mut min, mut max) = (outer[0], outer[0]);
    for p in outer {
        min = min.inf(p);
        max = max.sup(p);
    }

    let clearance = 0.5 * spacing;
    let row_step = spacing * 3.0_f64.sqrt() / 2.0;
    let mut out = Vec::new();
    let mut y = min.y + clearance;
    let mut row = 0usize;
    while y < max.y {
        let mut x = min.x + if row % 2 == 0 { clearance } else { spacing };
        while x < max.x {
            let p = Point2::new(x, y);
            if inside_region(&p, loops) && loops.iter().all(|l| distance_to_boundary(&p, l) > clearance) {
                out.push(p);
            }
            x += spacing;
        }
        y += row_step;
        row += 1;
    }
    out
}

/// Center of the circle through `a`, `b` and `c`.
fn circumcenter(a: &Point2, b: &Point2, c: &Point2) -> Option<Point2> {
    let (b, c) = (b - a, c - a);
    let d = 2.0 * (b.x * c.y - b.y * c.x);
    if d.abs() <= f64::EPSILON * (b.norm_squared() + c.norm_squared()) {
        return None;
    }
    let (bb, cc) = (b.norm_squared(), c.norm_squared());
    Some(Point2::new(a.x + (c.y * bb - b.y * cc) / d, a.y + (b.x * cc - c.x * bb) / d))
}

/// Whether a triangle is too large, or too sharp while not already tiny.
fn needs_refinement(a: &Point2, b: &Point2, c: &Point2, max_area: f64) -> bool {
    let area = 0.5 * area2(a, b, c).abs();
    if area > max_area * (1.0 + 1e-9) {
        return true;
    }
    if area <= max_area * 1e-3 {
        return false;
    }
    let (la, lb, lc) = ((b - c).norm(), (c - a).norm(), (a - b).norm());
    let shortest = la.min(lb).min(lc);
    // Circumradius over shortest edge is 1 / (2 sin(smallest angle)).
    let ratio = la * lb * lc / (4.0 * area * shortest);
    ratio > 0.5 / MIN_ANGLE_DEG.to_radians().sin()
}

/// Boundary sub-edge whose diametral circle strictly contains `p`.
fn encroached(
    p: &Point2,
    points: &[Point2],
    constraints: &BTreeSet<(usize, usize)>,
    tol: f64,
) -> Option<(usize, usize)> {
    constraints
        .iter()
        .find(|&&(a, b)| (points[a] - p).dot(&(points[b] - p)) < -tol * tol)
        .copied()
}

/// Replace a boundary sub-edge by its two halves. Returns `false` if the
/// sub-edge was already split.
fn split_constraint(
    points: &mut Vec<Point2>,
    constraints: &mut BTreeSet<(usize, usize)>,
    edge: (usize, usize),
) -> bool {
    if !constraints.remove(&edge) {
        return false;
    }
    let (a, b) = edge;
    let mid = Point2::from((points[a].coords + points[b].coords) * 0.5);
    let m = points.len();
    points.push(mid);
    constraints.insert(edge_key(a, m));
    constraints.insert(edge_key(m, b));
    true
}

/// Triangles outside the outer loop or inside a hole, found by flooding
/// across non-boundary edges.
fn outside_triangles(
    dt: &Triangulation,
    points: &[Point2],
    constraints: &BTreeSet<(usize, usize)>,
    holes: &[&[Point2]],
) -> Vec<bool> {
    let num_tris = dt.triangles.len() / 3;
    let mut excluded = vec![false; num_tris];
    let mut queue = VecDeque::new();
    for e in 0..dt.halfedges.len() {
        if dt.halfedges[e] == delaunator::EMPTY && !constraints.contains(&edge_at(dt, e)) {
            queue.push_back(e / 3);
        }
    }
    for marker in holes.iter().filter_map(|h| hole_marker(h)) {
        let hit = (0..num_tris).find(|&t| {
            let [a, b, c] = tri_nodes(dt, t);
            triangle_contains(&marker, &points[a], &points[b], &points[c])
        });
        if let Some(t) = hit {
            queue.push_back(t);
        }
    }
    while let Some(t) = queue.pop_front() {
        if excluded[t] {
            continue;
        }
        excluded[t] = true;
        for e in 3 * t..3 * t + 3 {
            let twin = dt.halfedges[e];
            if twin != delaunator::EMPTY && !constraints.contains(&edge_at(dt, e)) && !excluded[twin / 3] {
                queue.push_back(twin / 3);
            }
        }
    }
    excluded
}

/// One refinement step.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Refinement {
    Split((usize, usize)),
    Insert(Point2),
}

/// Refinement steps for every bad triangle inside the region.
fn plan_refinement(
    dt: &Triangulation,
    excluded: &[bool],
    points: &[Point2],
    constraints: &BTreeSet<(usize, usize)>,
    loops: &[&[Point2]],
    max_area: f64,
    tol: f64,
) -> Vec<Refinement> {
    let mut plan = Vec::new();
    let mut queued: Vec<(Point2, f64)> = Vec::new();
    for t in (0..excluded.len()).filter(|&t| !excluded[t]) {
        let [a, b, c] = tri_nodes(dt, t);
        let (pa, pb, pc) = (&points[a], &points[b], &points[c]);
        if !needs_refinement(pa, pb, pc, max_area) {
            continue;
        }
        let Some(center) = circumcenter(pa, pb, pc) else {
            continue;
        };
        if let Some(edge) = encroached(&center, points, constraints, tol) {
            if !plan.contains(&Refinement::Split(edge)) {
                plan.push(Refinement::Split(edge));
            }
            continue;
        }
        let target = if inside_region(&center, loops) {
            center
        } else {
            triangle_centroid(pa, pb, pc)
        };
        // Candidates crowding one queued this round wait for the next round.
        let radius = (center - pa).norm();
        if queued.iter().any(|(q, r)| (q - target).norm() < (0.5 * radius.min(*r)).max(tol)) {
            continue;
        }
        queued.push((target, radius));
        plan.push(Refinement::Insert(target));
    }
    plan
}

impl MeshGenerator for MeshDelaunay {
    fn name(&self) -> &'static str {
        "delaunay"
    }

    fn set_loops(&mut self, loops: &[Vec<usize>]) -> bool {
        self.loop_sizes.clear();
        if loops.is_empty() {
            return false;
        }
        let sizes: Vec<usize> = loops.iter().map(|l| l.iter().sum()).collect();
        if sizes.iter().any(|&n| n < 3) {
            return false;
        }
        self.loop_sizes = sizes;
        true
    }

    fn generate_mesh(&self, boundary: &[Point2]) -> Result<PatchMesh> {
        if self.loop_sizes.is_empty() {
            return Err(MeshError::NotConfigured(self.name()));
        }
        let expected: usize = self.loop_sizes.iter().sum();
        if boundary.len() != expected {
            return Err(MeshError::BoundaryCountMismatch {
                expected,
                found: boundary.len(),
            });
        }

        let mut loops: Vec<&[Point2]> = Vec::with_capacity(self.loop_sizes.len());
        let mut constraints = BTreeSet::new();
        let mut start = 0;
        for &n in &self.loop_sizes {
            loops.push(&boundary[start..start + n]);
            for k in 0..n {
                constraints.insert(edge_key(start + k, start + (k + 1) % n));
            }
            start += n;
        }

        let max_len = loops
            .iter()
            .flat_map(|l| (0..l.len()).map(move |k| (l[(k + 1) % l.len()] - l[k]).norm()))
            .fold(0.0, f64::max);
        let outer_area = signed_area(loops[0]);
        if max_len <= 0.0 || outer_area.abs() <= 1e-12 * max_len * max_len {
            return Err(MeshError::DegenerateBoundary);
        }
        let tol = max_len * 1e-3;
        let max_area = max_len * max_len * 3.0_f64.sqrt() / 4.0;

        let mut points = boundary.to_vec();
        points.extend(interior_points(&loops, max_len));
        let point_limit = 50 * points.len().max(16);

        let mut recovery = 0;
        let mut refinement = 0;
        let (dt, excluded) = loop {
            let dt = delaunay(&points);
            if dt.triangles.is_empty() {
                return Err(MeshError::EmptyTriangulation);
            }
            let present: HashSet<(usize, usize)> = (0..dt.triangles.len()).map(|e| edge_at(&dt, e)).collect();
            let missing: Vec<(usize, usize)> = constraints.iter().filter(|e| !present.contains(e)).copied().collect();
            if !missing.is_empty() {
                if recovery == MAX_RECOVERY_ROUNDS {
                    log::warn!(
                        "delaunay: {} boundary edges still missing after {} splitting rounds",
                        missing.len(),
                        recovery
                    );
                    return Err(MeshError::NonConforming);
                }
                log::debug!("delaunay: splitting {} missing boundary edges", missing.len());
                for edge in missing {
                    split_constraint(&mut points, &mut constraints, edge);
                }
                recovery += 1;
                continue;
            }
            recovery = 0;

            let excluded = outside_triangles(&dt, &points, &constraints, &loops[1..]);
            let plan = plan_refinement(&dt, &excluded, &points, &constraints, &loops, max_area, tol);
            if plan.is_empty() {
                break (dt, excluded);
            }
            if refinement == MAX_REFINE_ROUNDS || points.len() >= point_limit {
                log::warn!(
                    "delaunay: refinement stopped at {} nodes with {} pending steps",
                    points.len(),
                    plan.len()
                );
                break (dt, excluded);
            }
            for step in plan {
                match step {
                    Refinement::Split(edge) => {
                        split_constraint(&mut points, &mut constraints, edge);
                    }
                    Refinement::Insert(p) => points.push(p),
                }
            }
            refinement += 1;
        };

        let num_tris = excluded.len();
        let outer = loops[0];
        let holes = &loops[1..];
        let mut tris = Vec::with_capacity(num_tris);
        for t in (0..num_tris).filter(|&t| !excluded[t]) {
            let tri = tri_nodes(&dt, t);
            let c = triangle_centroid(&points[tri[0]], &points[tri[1]], &points[tri[2]]);
            let in_outer = point_in_polygon(&c, outer) || distance_to_boundary(&c, outer) <= tol;
            let in_hole = holes
                .iter()
                .any(|h| point_in_polygon(&c, h) && distance_to_boundary(&c, h) > tol);
            if in_outer && !in_hole {
                tris.push(tri);
            }
        }

        let sign = outer_area.signum();
        let mut elements = orient_and_dedup(&points, &tris, sign, 1e-14 * max_len * max_len);
        if elements.is_empty() {
            return Err(MeshError::EmptyTriangulation);
        }

        // Boundary points keep their indices; unused interior points are dropped.
        let mut used = vec![false; points.len()];
        used[..boundary.len()].iter_mut().for_each(|u| *u = true);
        for e in &elements {
            for &n in e.nodes() {
                used[n] = true;
            }
        }
        let mut remap = vec![usize::MAX; points.len()];
        let mut kept = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if used[i] {
                remap[i] = kept.len();
                kept.push(*p);
            }
        }
        for e in &mut elements {
            if let Element::Tri(nodes) = e {
                for n in nodes.iter_mut() {
                    *n = remap[*n];
                }
            }
        }

        log::debug!(
            "delaunay mesh: {} nodes ({} added), {} triangles after {} refinement rounds",
            kept.len(),
            kept.len() - boundary.len(),
            elements.len(),
            refinement
        );
        Ok(PatchMesh {
            points: kept,
            elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planar_kernel_math::segment::distance_to_segment;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    /// Square `[x0, x0 + size]^2` with `n` points per side, counter-clockwise from the lower left.
    fn square(x0: f64, size: f64, n: usize) -> Vec<Point2> {
        let corners = [
            Point2::new(x0, x0),
            Point2::new(x0 + size, x0),
            Point2::new(x0 + size, x0 + size),
            Point2::new(x0, x0 + size),
        ];
        let mut out = Vec::new();
        for s in 0..4 {
            let a = corners[s];
            let b = corners[(s + 1) % 4];
            for k in 0..n {
                out.push(a + (b - a) * (k as f64 / n as f64));
            }
        }
        out
    }

    fn assert_centroids_inside(mesh: &PatchMesh, outer: &[Point2], holes: &[&[Point2]]) {
        for e in &mesh.elements {
            let n = e.nodes();
            let c = triangle_centroid(&mesh.points[n[0]], &mesh.points[n[1]], &mesh.points[n[2]]);
            assert!(point_in_polygon(&c, outer), "centroid {c:?} outside");
            assert!(holes.iter().all(|h| !point_in_polygon(&c, h)), "centroid {c:?} in hole");
            assert!(mesh.element_area(e) > 0.0);
        }
    }

    /// Every loop edge is covered end to end by mesh edges lying on it.
    fn assert_boundary_covered(mesh: &PatchMesh, loops: &[&[Point2]]) {
        let mut edges = HashSet::new();
        for e in &mesh.elements {
            let n = e.nodes();
            for k in 0..n.len() {
                edges.insert(edge_key(n[k], n[(k + 1) % n.len()]));
            }
        }
        for l in loops {
            for k in 0..l.len() {
                let (a, b) = (l[k], l[(k + 1) % l.len()]);
                let covered: f64 = edges
                    .iter()
                    .filter(|&&(i, j)| {
                        distance_to_segment(&mesh.points[i], &a, &b) < 1e-9
                            && distance_to_segment(&mesh.points[j], &a, &b) < 1e-9
                    })
                    .map(|&(i, j)| (mesh.points[j] - mesh.points[i]).norm())
                    .sum();
                assert_relative_eq!(covered, (b - a).norm(), epsilon = 1e-9);
            }
        }
    }

    /// Star with `spikes` tips, tip and notch radii varying with `seed`.
    fn star(spikes: usize, seed: usize) -> Vec<Point2> {
        (0..2 * spikes)
            .map(|k| {
                let wobble = ((k * 7 + seed * 3) % 5) as f64 / 10.0;
                let r = if k % 2 == 0 { 2.0 + wobble } else { 0.5 + 0.5 * wobble };
                let a = std::f64::consts::PI * k as f64 / spikes as f64 + 0.1 * seed as f64;
                Point2::new(r * a.cos(), r * a.sin())
            })
            .collect()
    }

    #[test]
    fn test_set_loops() {
        let mut g = MeshDelaunay::new();
        assert!(g.set_loops(&[vec![1, 1, 1]]));
        assert!(g.set_loops(&[vec![4], vec![1, 1, 1, 1]]));
        assert!(!g.set_loops(&[vec![1, 1]]));
        assert!(!g.set_loops(&[vec![4], vec![2]]));
        assert!(!g.set_loops(&[]));
    }

    #[test]
    fn test_convex_square() {
        let boundary = square(0.0, 1.0, 4);
        let mut g = MeshDelaunay::new();
        assert!(g.set_loops(&[vec![4, 4, 4, 4]]));
        let mesh = g.generate_mesh(&boundary).unwrap();
        assert_relative_eq!(mesh.area(), 1.0, epsilon = 1e-9);
        assert_centroids_inside(&mesh, &boundary, &[]);
        // Boundary points keep their positions at the front of the node list.
        assert_eq!(&mesh.points[..boundary.len()], boundary.as_slice());
    }

    #[test]
    fn test_square_with_hole() {
        let outer = square(0.0, 4.0, 4);
        let mut hole = pts(&[(1.5, 1.5), (2.5, 1.5), (2.5, 2.5), (1.5, 2.5)]);
        hole.reverse();
        let boundary: Vec<Point2> = outer.iter().chain(hole.iter()).copied().collect();

        let mut g = MeshDelaunay::new();
        assert!(g.set_loops(&[vec![4, 4, 4, 4], vec![1, 1, 1, 1]]));
        let mesh = g.generate_mesh(&boundary).unwrap();
        assert_relative_eq!(mesh.area(), 15.0, epsilon = 1e-9);
        assert_centroids_inside(&mesh, &outer, &[&hole]);
        assert!(mesh.num_points() > boundary.len());
    }

    #[test]
    fn test_concave_region() {
        let boundary = pts(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
            (0.0, 1.0),
        ]);
        let mut g = MeshDelaunay::new();
        assert!(g.set_loops(&[vec![2, 1, 1, 1, 1, 2]]));
        let mesh = g.generate_mesh(&boundary).unwrap();
        assert_relative_eq!(mesh.area(), 3.0, epsilon = 1e-9);
        assert_centroids_inside(&mesh, &boundary, &[]);
    }

    #[test]
    fn test_degenerate_and_mismatched_boundary() {
        let mut g = MeshDelaunay::new();
        assert!(g.set_loops(&[vec![3]]));
        let flat = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(g.generate_mesh(&flat), Err(MeshError::DegenerateBoundary));
        assert!(matches!(
            g.generate_mesh(&flat[..2]),
            Err(MeshError::BoundaryCountMismatch { expected: 3, found: 2 })
        ));
        assert!(matches!(
            MeshDelaunay::new().generate_mesh(&flat),
            Err(MeshError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_narrow_slit_recovers_boundary() {
        // The slit floor (4, 1)-(1, 1) is not a Delaunay edge of the boundary points.
        let boundary = pts(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (1.0, 1.0),
            (1.0, 1.1),
            (2.5, 1.1),
            (4.0, 1.1),
            (4.0, 2.1),
            (0.0, 2.1),
        ]);
        let mut g = MeshDelaunay::new();
        assert!(g.set_loops(&[vec![1; 9]]));
        let mesh = g.generate_mesh(&boundary).unwrap();
        assert_relative_eq!(mesh.area(), 8.1, epsilon = 1e-9);
        assert_centroids_inside(&mesh, &boundary, &[]);
        assert_boundary_covered(&mesh, &[&boundary]);
        assert_eq!(&mesh.points[..boundary.len()], boundary.as_slice());
    }

    #[test]
    fn test_star_polygons_match_area() {
        for seed in 0..4 {
            let boundary = star(7, seed);
            let mut g = MeshDelaunay::new();
            assert!(g.set_loops(&[vec![1; boundary.len()]]));
            let mesh = g.generate_mesh(&boundary).unwrap();
            assert_relative_eq!(mesh.area(), signed_area(&boundary).abs(), epsilon = 1e-9);
            assert_centroids_inside(&mesh, &boundary, &[]);
            assert_boundary_covered(&mesh, &[&boundary]);
        }
    }

    #[test]
    fn test_star_hole_in_square() {
        let outer = square(-4.0, 8.0, 2);
        let mut hole = star(5, 1);
        hole.reverse();
        let boundary: Vec<Point2> = outer.iter().chain(hole.iter()).copied().collect();
        let mut g = MeshDelaunay::new();
        assert!(g.set_loops(&[vec![2, 2, 2, 2], vec![1; hole.len()]]));
        let mesh = g.generate_mesh(&boundary).unwrap();
        assert_relative_eq!(mesh.area(), 64.0 - signed_area(&hole).abs(), epsilon = 1e-9);
        assert_centroids_inside(&mesh, &outer, &[&hole]);
        assert_boundary_covered(&mesh, &[&outer, &hole]);
    }

    #[test]
    fn test_refines_to_area_and_angle() {
        // One point per side: the bare triangulation is two triangles of area 0.5.
        let boundary = square(0.0, 1.0, 1);
        let mut g = MeshDelaunay::new();
        assert!(g.set_loops(&[vec![1, 1, 1, 1]]));
        let mesh = g.generate_mesh(&boundary).unwrap();
        let max_area = 3.0_f64.sqrt() / 4.0;
        assert!(mesh.num_elements() > 2);
        for e in &mesh.elements {
            assert!(mesh.element_area(e) <= max_area * (1.0 + 1e-9));
            let n = e.nodes();
            assert!(!needs_refinement(&mesh.points[n[0]], &mesh.points[n[1]], &mesh.points[n[2]], max_area));
        }
        assert_relative_eq!(mesh.area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_needs_refinement() {
        let max_area = 1.0;
        let o = Point2::new(0.0, 0.0);
        let x = Point2::new(1.0, 0.0);
        // Equilateral, well under the area target.
        assert!(!needs_refinement(&o, &x, &Point2::new(0.5, 0.75_f64.sqrt()), max_area));
        // Sliver with a 10 degree apex is too sharp.
        let sliver = Point2::new(1.0, 10.0_f64.to_radians().tan());
        assert!(needs_refinement(&o, &x, &sliver, max_area));
        // Same shape scaled far below the area target is left alone.
        let s = 0.01;
        let tiny = Point2::new(s, s * 10.0_f64.to_radians().tan());
        assert!(!needs_refinement(&o, &Point2::new(s, 0.0), &tiny, max_area));
        // Large right triangle.
        assert!(needs_refinement(&o, &Point2::new(2.0, 0.0), &Point2::new(0.0, 2.0), max_area));
    }

    #[test]
    fn test_circumcenter() {
        let c = circumcenter(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), &Point2::new(0.0, 2.0)).unwrap();
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 1.0, epsilon = 1e-12);
        assert!(circumcenter(&Point2::new(0.0, 0.0), &Point2::new(1.0, 0.0), &Point2::new(2.0, 0.0)).is_none());
    }

    #[test]
    fn test_split_constraint() {
        let mut points = pts(&[(0.0, 0.0), (2.0, 0.0)]);
        let mut constraints = BTreeSet::from([(0, 1)]);
        assert!(split_constraint(&mut points, &mut constraints, (0, 1)));
        assert!(!split_constraint(&mut points, &mut constraints, (0, 1)));
        assert_eq!(points[2], Point2::new(1.0, 0.0));
        assert_eq!(constraints, BTreeSet::from([(0, 2), (1, 2)]));
        // A point over the left half encroaches it alone.
        assert_eq!(encroached(&Point2::new(0.5, 0.1), &points, &constraints, 1e-6), Some((0, 2)));
        assert_eq!(encroached(&Point2::new(1.0, 1.0), &points, &constraints, 1e-6), None);
    }
}
