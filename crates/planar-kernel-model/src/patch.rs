//! Patches: closed regions bounded by chains of segments.
//!
//! A chain is traced from a list of segments by linking end points that
//! coincide within the distance tolerance. The outer boundary of a patch is
//! always stored counter-clockwise and hole loops clockwise; the orientation
//! flag of every edge is relative to that stored order.

use planar_kernel_math::polygon::{distance_to_boundary, point_in_polygon, signed_area, triangulated_area};
use planar_kernel_math::{BoundBox, Point2};
use planar_kernel_mesh::PatchMesh;
use slotmap::SlotMap;

use crate::{ModelError, Result, Segment, SegmentId};

slotmap::new_key_type! {
    /// Unique identifier for a patch in the model.
    pub struct PatchId;
}

/// One segment on a patch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchEdge {
    /// The segment.
    pub segment: SegmentId,
    /// Whether the boundary runs along the segment from its start to its end.
    pub forward: bool,
}

/// A closed loop of edges with its flattened points.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLoop {
    edges: Vec<PatchEdge>,
    points: Vec<Point2>,
}

impl BoundaryLoop {
    /// Edges in loop order.
    pub fn edges(&self) -> &[PatchEdge] {
        &self.edges
    }

    /// Flattened points in loop order; the first point is not repeated.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Signed area of the loop polygon.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    fn references(&self, id: SegmentId) -> bool {
        self.edges.iter().any(|e| e.segment == id)
    }

    /// Walk the same loop the other way round, keeping the first edge first.
    fn reversed(&self, segments: &SlotMap<SegmentId, Segment>) -> Result<Self> {
        let mut edges = Vec::with_capacity(self.edges.len());
        if let Some((first, rest)) = self.edges.split_first() {
            edges.push(PatchEdge {
                segment: first.segment,
                forward: !first.forward,
            });
            edges.extend(rest.iter().rev().map(|e| PatchEdge {
                segment: e.segment,
                forward: !e.forward,
            }));
        }
        let points = loop_points(&edges, segments)?;
        Ok(Self { edges, points })
    }
}

fn oriented_polyline(segment: &Segment, forward: bool) -> Vec<Point2> {
    let mut pts = segment.polyline().to_vec();
    if !forward {
        pts.reverse();
    }
    pts
}

/// Concatenate the oriented polylines, dropping each edge's last point.
fn loop_points(edges: &[PatchEdge], segments: &SlotMap<SegmentId, Segment>) -> Result<Vec<Point2>> {
    let mut points = Vec::new();
    for edge in edges {
        let seg = segments.get(edge.segment).ok_or(ModelError::UnknownSegment)?;
        let mut pts = oriented_polyline(seg, edge.forward);
        pts.pop();
        points.extend(pts);
    }
    Ok(points)
}

/// Trace a closed chain through `ids`, starting with the first one.
///
/// The first segment keeps its own direction. Fails when some segment
/// cannot be linked or when the chain does not return to its start.
pub fn assemble_chain(
    ids: &[SegmentId],
    segments: &SlotMap<SegmentId, Segment>,
    tol: f64,
) -> Result<BoundaryLoop> {
    let (&master, rest) = ids.split_first().ok_or(ModelError::NoSegmentForPatch)?;
    let first = segments.get(master).ok_or(ModelError::UnknownSegment)?;
    let start = first.start_point();
    let mut open_end = first.end_point();
    let mut edges = vec![PatchEdge {
        segment: master,
        forward: true,
    }];

    let mut remaining: Vec<(SegmentId, &Segment)> = Vec::with_capacity(rest.len());
    for &id in rest {
        remaining.push((id, segments.get(id).ok_or(ModelError::UnknownSegment)?));
    }

    loop {
        let next = remaining.iter().enumerate().find_map(|(k, (_, seg))| {
            if (seg.start_point() - open_end).norm() < tol {
                Some((k, true))
            } else if (seg.end_point() - open_end).norm() < tol {
                Some((k, false))
            } else {
                None
            }
        });
        let Some((k, forward)) = next else {
            break;
        };
        let (id, seg) = remaining.remove(k);
        open_end = if forward { seg.end_point() } else { seg.start_point() };
        edges.push(PatchEdge { segment: id, forward });
    }

    if !remaining.is_empty() {
        return Err(ModelError::DiscontinuousChain);
    }
    if (open_end - start).norm() >= tol {
        return Err(ModelError::ChainNotClosed);
    }

    let points = loop_points(&edges, segments)?;
    if points.len() < 3 {
        return Err(ModelError::ChainNotClosed);
    }
    Ok(BoundaryLoop { edges, points })
}

/// Capability of the surrounding model to report regions nested in a patch.
pub trait RegionNesting {
    /// Regions directly inside `patch` whose area does not belong to it.
    fn inner_regions(&self, patch: &Patch) -> Vec<&Patch>;

    /// Neighbouring regions that may lie inside `patch`.
    fn sibling_regions(&self, _patch: &Patch) -> Vec<&Patch> {
        Vec::new()
    }
}

/// A closed region of the plane.
#[derive(Debug, Clone)]
pub struct Patch {
    outer: BoundaryLoop,
    holes: Vec<BoundaryLoop>,
    selected: bool,
    mesh: Option<PatchMesh>,
}

impl Patch {
    /// Build a patch from a traced outer loop and hole loops.
    ///
    /// The outer loop is turned counter-clockwise and the holes clockwise.
    /// Every hole point must lie inside the outer boundary.
    pub fn from_loops(
        outer: BoundaryLoop,
        holes: Vec<BoundaryLoop>,
        segments: &SlotMap<SegmentId, Segment>,
        tol: f64,
    ) -> Result<Self> {
        let outer = if outer.signed_area() < 0.0 {
            outer.reversed(segments)?
        } else {
            outer
        };
        let mut oriented = Vec::with_capacity(holes.len());
        for hole in holes {
            let inside = hole
                .points
                .iter()
                .all(|p| point_in_polygon(p, &outer.points) && distance_to_boundary(p, &outer.points) >= tol);
            if !inside {
                return Err(ModelError::HoleOutside);
            }
            oriented.push(if hole.signed_area() > 0.0 {
                hole.reversed(segments)?
            } else {
                hole
            });
        }
        Ok(Self {
            outer,
            holes: oriented,
            selected: false,
            mesh: None,
        })
    }

    /// Counter-clockwise outer boundary points (first point not repeated).
    pub fn points(&self) -> &[Point2] {
        &self.outer.points
    }

    /// Edges of the outer boundary, in counter-clockwise order.
    pub fn boundary_segments(&self) -> impl Iterator<Item = (SegmentId, bool)> + '_ {
        self.outer.edges.iter().map(|e| (e.segment, e.forward))
    }

    /// The outer boundary loop.
    pub fn outer(&self) -> &BoundaryLoop {
        &self.outer
    }

    /// Hole loops, each clockwise.
    pub fn holes(&self) -> &[BoundaryLoop] {
        &self.holes
    }

    /// Hole polygons, each clockwise.
    pub fn hole_polygons(&self) -> impl Iterator<Item = &[Point2]> + '_ {
        self.holes.iter().map(|h| h.points.as_slice())
    }

    /// Whether any boundary or hole edge uses segment `id`.
    pub fn references(&self, id: SegmentId) -> bool {
        self.outer.references(id) || self.holes.iter().any(|h| h.references(id))
    }

    /// Whether the patch is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set the selection flag.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// The cached mesh, if one was generated.
    pub fn mesh(&self) -> Option<&PatchMesh> {
        self.mesh.as_ref()
    }

    /// Replace the cached mesh.
    pub fn set_mesh(&mut self, mesh: PatchMesh) {
        self.mesh = Some(mesh);
    }

    /// Drop the cached mesh.
    pub fn clear_mesh(&mut self) {
        self.mesh = None;
    }

    /// Bounding box of the outer boundary.
    pub fn bound_box(&self) -> Option<BoundBox> {
        BoundBox::from_points(&self.outer.points)
    }

    /// Even-odd containment against the outer boundary, excluding holes.
    pub fn is_point_inside(&self, p: &Point2) -> bool {
        point_in_polygon(p, &self.outer.points)
            && !self.holes.iter().any(|h| point_in_polygon(p, &h.points))
    }

    /// Whether every boundary point of `other` lies inside this patch's
    /// outer boundary (or on it within `tol`), with at least one strictly inside.
    pub fn contains_region(&self, other: &Patch, tol: f64) -> bool {
        let mut strictly = false;
        for p in other.points() {
            let on_boundary = distance_to_boundary(p, &self.outer.points) < tol;
            if on_boundary {
                continue;
            }
            if !point_in_polygon(p, &self.outer.points) {
                return false;
            }
            strictly = true;
        }
        strictly
    }

    /// Area enclosed by the outer boundary minus the holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| triangulated_area(&h.points).abs()).sum();
        triangulated_area(&self.outer.points).abs() - holes
    }

    /// Area with nested regions reported by `nesting` taken out.
    ///
    /// Inner regions subtract their own nested area, so islands inside
    /// inner regions count again. Sibling regions are subtracted when their
    /// first boundary point lies inside this patch.
    pub fn area_nested(&self, nesting: &dyn RegionNesting) -> f64 {
        let mut area = self.area();
        for inner in nesting.inner_regions(self) {
            area -= inner.area_nested(nesting);
        }
        for sibling in nesting.sibling_regions(self) {
            if sibling.points().first().is_some_and(|p| self.is_point_inside(p)) {
                area -= sibling.area();
            }
        }
        area
    }

    fn loops(&self) -> impl Iterator<Item = &BoundaryLoop> + '_ {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Subdivision counts of every edge, one list per loop (outer loop first).
    pub fn mesh_loops(&self, segments: &SlotMap<SegmentId, Segment>) -> Result<Vec<Vec<usize>>> {
        self.loops()
            .map(|l| {
                l.edges
                    .iter()
                    .map(|e| {
                        segments
                            .get(e.segment)
                            .map(|s| s.subdivision().count)
                            .ok_or(ModelError::UnknownSegment)
                    })
                    .collect()
            })
            .collect()
    }

    /// Mesh boundary points: per loop and per edge in loop order, the first
    /// `count` subdivision points of the edge.
    pub fn mesh_boundary_points(&self, segments: &SlotMap<SegmentId, Segment>) -> Result<Vec<Point2>> {
        let mut out = Vec::new();
        for l in self.loops() {
            for e in &l.edges {
                let seg = segments.get(e.segment).ok_or(ModelError::UnknownSegment)?;
                let mut pts = seg.subdivision_points();
                if !e.forward {
                    pts.reverse();
                }
                pts.pop();
                out.extend(pts);
            }
        }
        Ok(out)
    }
}
