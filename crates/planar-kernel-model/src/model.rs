//! The segment and patch store and the modeling operations on it.

use planar_kernel_geom::Curve;
use planar_kernel_math::polygon::point_in_polygon;
use planar_kernel_math::{BoundBox, Point2, Tolerance};
use planar_kernel_mesh::MeshStrategy;
use slotmap::SlotMap;

use crate::intersect::{intersect_segments, subdivide_self_intersected};
use crate::join::{common_end_point, framed_into};
use crate::patch::{assemble_chain, Patch, PatchId, RegionNesting};
use crate::{ModelError, Result, Segment, SegmentId, SegmentSubdivision};

/// Segments and patches of a planar model.
///
/// Every mutating operation computes its new segments and patches first and
/// only then swaps them in, so a failed operation leaves the model untouched.
#[derive(Debug, Clone)]
pub struct Model {
    segments: SlotMap<SegmentId, Segment>,
    patches: SlotMap<PatchId, Patch>,
    /// Selected segments in selection order.
    selection: Vec<SegmentId>,
    tol: Tolerance,
    current_tol: f64,
    default_subdivision: SegmentSubdivision,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// An empty model with default tolerances.
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::DEFAULT)
    }

    /// An empty model with the given tolerances.
    pub fn with_tolerance(tol: Tolerance) -> Self {
        Self {
            segments: SlotMap::with_key(),
            patches: SlotMap::with_key(),
            selection: Vec::new(),
            tol,
            current_tol: tol.dist,
            default_subdivision: SegmentSubdivision::default(),
        }
    }

    /// Model tolerances.
    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }

    /// Session tolerance used to attract end points when intersecting.
    pub fn current_tolerance(&self) -> f64 {
        self.current_tol
    }

    /// Set the session tolerance.
    pub fn set_current_tolerance(&mut self, tol: f64) {
        self.current_tol = tol;
    }

    /// Subdivision given to newly inserted segments.
    pub fn set_default_subdivision(&mut self, subdivision: SegmentSubdivision) {
        self.default_subdivision = subdivision;
    }

    /// Number of segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Number of patches.
    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Look up a segment.
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id)
    }

    /// All segments.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments.iter()
    }

    /// Look up a patch.
    pub fn patch(&self, id: PatchId) -> Option<&Patch> {
        self.patches.get(id)
    }

    /// All patches.
    pub fn patches(&self) -> impl Iterator<Item = (PatchId, &Patch)> {
        self.patches.iter()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select or unselect a segment. Selection order is remembered.
    pub fn select_segment(&mut self, id: SegmentId, selected: bool) -> Result<()> {
        let seg = self.segments.get_mut(id).ok_or(ModelError::UnknownSegment)?;
        seg.set_selected(selected);
        self.selection.retain(|s| *s != id);
        if selected {
            self.selection.push(id);
        }
        Ok(())
    }

    /// Select or unselect a patch.
    pub fn select_patch(&mut self, id: PatchId, selected: bool) -> Result<()> {
        let patch = self.patches.get_mut(id).ok_or(ModelError::UnknownPatch)?;
        patch.set_selected(selected);
        Ok(())
    }

    /// Selected segments in selection order.
    pub fn selected_segments(&self) -> &[SegmentId] {
        &self.selection
    }

    /// Selected patches.
    pub fn selected_patches(&self) -> Vec<PatchId> {
        self.patches
            .iter()
            .filter(|(_, p)| p.is_selected())
            .map(|(id, _)| id)
            .collect()
    }

    /// Clear every selection flag.
    pub fn unselect_all(&mut self) {
        for id in self.selection.drain(..) {
            if let Some(seg) = self.segments.get_mut(id) {
                seg.set_selected(false);
            }
        }
        for patch in self.patches.values_mut() {
            patch.set_selected(false);
        }
    }

    // =========================================================================
    // Segment bookkeeping
    // =========================================================================

    fn insert_segment(&mut self, mut segment: Segment) -> SegmentId {
        segment.set_selected(false);
        self.segments.insert(segment)
    }

    /// Remove segments and every patch that references one of them.
    fn remove_segments(&mut self, ids: &[SegmentId]) -> usize {
        let dependent: Vec<PatchId> = self
            .patches
            .iter()
            .filter(|(_, p)| ids.iter().any(|id| p.references(*id)))
            .map(|(id, _)| id)
            .collect();
        for pid in &dependent {
            self.patches.remove(*pid);
        }
        for id in ids {
            self.segments.remove(*id);
        }
        self.selection.retain(|s| !ids.contains(s));
        dependent.len()
    }

    /// Commit a curve as one or more segments.
    ///
    /// A curve crossing itself is split at the crossings and stretches that
    /// retrace an earlier part of the curve are dropped.
    pub fn insert_curve(&mut self, curve: Curve) -> Result<Vec<SegmentId>> {
        let mut segment = Segment::new(curve, self.tol.flatness).ok_or(ModelError::CurveNotPossible)?;
        segment.set_subdivision(self.default_subdivision);
        let pieces = subdivide_self_intersected(&segment, &self.tol).unwrap_or_else(|| vec![segment]);
        log::debug!("insert curve: {} segment(s)", pieces.len());
        Ok(pieces.into_iter().map(|s| self.insert_segment(s)).collect())
    }

    /// Move control point `index` of a segment's curve.
    ///
    /// Patches built on the segment are deleted. Returns `false` when the
    /// index is out of range.
    pub fn reshape_curve(&mut self, id: SegmentId, index: usize, x: f64, y: f64) -> Result<bool> {
        let seg = self.segments.get_mut(id).ok_or(ModelError::UnknownSegment)?;
        if !seg.set_ctrl_point(index, x, y) {
            return Ok(false);
        }
        self.patches.retain(|_, p| !p.references(id));
        Ok(true)
    }

    /// Delete the selected segments (with their patches) and the selected patches.
    pub fn delete_selected(&mut self) -> (usize, usize) {
        let ids = self.selection.clone();
        let mut removed_patches = self.remove_segments(&ids);
        let selected = self.selected_patches();
        for pid in &selected {
            self.patches.remove(*pid);
        }
        removed_patches += selected.len();
        log::debug!("deleted {} segment(s), {} patch(es)", ids.len(), removed_patches);
        (ids.len(), removed_patches)
    }

    // =========================================================================
    // Intersection, joining, splitting
    // =========================================================================

    /// Intersect the two selected segments and split both at their meeting points.
    ///
    /// Returns the new segments; an empty list means the segments do not meet.
    pub fn intersect_selected(&mut self) -> Result<Vec<SegmentId>> {
        let [a, b] = self.selection[..] else {
            log::warn!("intersect: {} segment(s) selected", self.selection.len());
            return Err(ModelError::IntersectSelection);
        };
        let seg_a = self.segments.get(a).ok_or(ModelError::UnknownSegment)?;
        let seg_b = self.segments.get(b).ok_or(ModelError::UnknownSegment)?;
        let Some(pieces) = intersect_segments(seg_a, seg_b, &self.tol, self.current_tol) else {
            log::debug!("intersect: segments do not meet");
            return Ok(Vec::new());
        };

        let new_ids: Vec<SegmentId> = pieces
            .first
            .into_iter()
            .chain(pieces.second)
            .map(|s| self.insert_segment(s))
            .collect();
        let dropped = self.remove_segments(&[a, b]);
        log::debug!(
            "intersect: {} new segment(s), {} patch(es) invalidated",
            new_ids.len(),
            dropped
        );
        Ok(new_ids)
    }

    /// Join the two selected segments at their common end point.
    pub fn join_selected(&mut self) -> Result<SegmentId> {
        let [a, b] = match self.selection[..] {
            [] => return Err(ModelError::NoSegmentForJoin),
            [_] => return Err(ModelError::TooFewForJoin),
            [a, b] => [a, b],
            _ => return Err(ModelError::TooManyForJoin),
        };
        let seg_a = self.segments.get(a).ok_or(ModelError::UnknownSegment)?;
        let seg_b = self.segments.get(b).ok_or(ModelError::UnknownSegment)?;
        let dist = self.tol.dist;

        let joint = common_end_point(seg_a, seg_b, dist)?;
        let others = self
            .segments
            .iter()
            .filter(|(id, _)| *id != a && *id != b)
            .map(|(_, s)| s);
        if framed_into(&joint, others, dist) {
            return Err(ModelError::ThirdSegmentAtJoint);
        }

        let curve = seg_a
            .curve()
            .join(seg_b.curve(), &joint, dist)
            .inspect_err(|e| log::warn!("join: {e}"))?;
        let mut joined = Segment::new(curve, self.tol.flatness).ok_or(ModelError::CurveNotPossible)?;
        joined.set_subdivision(seg_a.subdivision());

        let id = self.insert_segment(joined);
        self.remove_segments(&[a, b]);
        Ok(id)
    }

    /// Replace each selected segment by `n` equal pieces.
    pub fn split_selected(&mut self, n: usize) -> Result<Vec<SegmentId>> {
        let ids = self.selection.clone();
        let mut pieces = Vec::with_capacity(ids.len() * n);
        for id in &ids {
            let seg = self.segments.get(*id).ok_or(ModelError::UnknownSegment)?;
            pieces.extend(seg.split_into(n));
        }
        let new_ids: Vec<SegmentId> = pieces.into_iter().map(|s| self.insert_segment(s)).collect();
        self.remove_segments(&ids);
        Ok(new_ids)
    }

    /// Set the mesh subdivision of the selected segments.
    ///
    /// Meshes of patches using those segments are discarded.
    pub fn set_subdivision(&mut self, count: usize, ratio: f64) -> usize {
        let subdivision = SegmentSubdivision::new(count, ratio);
        for id in &self.selection {
            if let Some(seg) = self.segments.get_mut(*id) {
                seg.set_subdivision(subdivision);
            }
        }
        for patch in self.patches.values_mut() {
            if self.selection.iter().any(|id| patch.references(*id)) {
                patch.clear_mesh();
            }
        }
        self.selection.len()
    }

    // =========================================================================
    // Patches and meshes
    // =========================================================================

    /// Create a patch from the selected segments, traced in selection order.
    pub fn create_patch(&mut self) -> Result<PatchId> {
        let ids = self.selection.clone();
        let id = self.create_patch_with_holes(&ids, &[])?;
        self.unselect_all();
        Ok(id)
    }

    /// Create a patch from an outer chain of segments and hole chains.
    pub fn create_patch_with_holes(&mut self, outer: &[SegmentId], holes: &[Vec<SegmentId>]) -> Result<PatchId> {
        let dist = self.tol.dist;
        let outer_loop =
            assemble_chain(outer, &self.segments, dist).inspect_err(|e| log::warn!("create patch: {e}"))?;
        let hole_loops = holes
            .iter()
            .map(|h| assemble_chain(h, &self.segments, dist))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| log::warn!("create patch: {e}"))?;
        let patch = Patch::from_loops(outer_loop, hole_loops, &self.segments, dist)
            .inspect_err(|e| log::warn!("create patch: {e}"))?;
        log::debug!(
            "create patch: {} boundary points, {} hole(s), area {:.6}",
            patch.points().len(),
            patch.holes().len(),
            patch.area()
        );
        Ok(self.patches.insert(patch))
    }

    /// Mesh a patch with `strategy` and cache the result on the patch.
    ///
    /// On failure the previous mesh is kept.
    pub fn generate_mesh(&mut self, id: PatchId, strategy: MeshStrategy) -> Result<usize> {
        let patch = self.patches.get(id).ok_or(ModelError::UnknownPatch)?;
        let loops = patch.mesh_loops(&self.segments)?;
        let mut generator = strategy.generator();
        if !generator.set_loops(&loops) {
            log::warn!("{} mesh: loops {loops:?} do not fit", generator.name());
            return Err(ModelError::InvalidPatchConfiguration);
        }
        let boundary = patch.mesh_boundary_points(&self.segments)?;
        let mesh = generator.generate_mesh(&boundary).map_err(|e| {
            log::warn!("{} mesh: {e}", generator.name());
            ModelError::MeshGenerationFailed
        })?;
        let count = mesh.num_elements();
        if let Some(patch) = self.patches.get_mut(id) {
            patch.set_mesh(mesh);
        }
        Ok(count)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Closest point on the nearest segment within `tol` of `(x, y)`.
    pub fn snap_to_segment(&self, x: f64, y: f64, tol: f64) -> Option<(SegmentId, Point2)> {
        let p = Point2::new(x, y);
        self.segments
            .iter()
            .filter(|(_, s)| s.bound_box().is_some_and(|b| b.contains(&p, tol)))
            .filter_map(|(id, s)| s.closest_point(x, y).map(|proj| (id, proj)))
            .filter(|(_, proj)| proj.distance <= tol)
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
            .map(|(id, proj)| (id, proj.point))
    }

    /// Nearest segment end point within `tol` of `(x, y)`.
    pub fn snap_to_point(&self, x: f64, y: f64, tol: f64) -> Option<Point2> {
        let p = Point2::new(x, y);
        self.segments
            .values()
            .flat_map(|s| [s.start_point(), s.end_point()])
            .map(|q| ((q - p).norm(), q))
            .filter(|(d, _)| *d <= tol)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, q)| q)
    }

    /// Bounding box of all segments.
    pub fn bound_box(&self) -> Option<BoundBox> {
        self.segments
            .values()
            .filter_map(Segment::bound_box)
            .reduce(|a, b| a.union(&b))
    }

    /// Area of a patch with patches nested inside it taken out.
    pub fn patch_area(&self, id: PatchId) -> Result<f64> {
        let patch = self.patches.get(id).ok_or(ModelError::UnknownPatch)?;
        Ok(patch.area_nested(self))
    }
}

impl RegionNesting for Model {
    /// Patches directly inside `patch`, excluding those inside its holes or
    /// inside another nested patch.
    fn inner_regions(&self, patch: &Patch) -> Vec<&Patch> {
        let dist = self.tol.dist;
        let inside: Vec<&Patch> = self
            .patches
            .values()
            .filter(|q| !std::ptr::eq(*q, patch) && patch.contains_region(q, dist))
            .filter(|q| {
                !patch
                    .hole_polygons()
                    .any(|h| q.points().iter().any(|p| point_in_polygon(p, h)))
            })
            .collect();
        inside
            .iter()
            .copied()
            .filter(|q| {
                !inside
                    .iter()
                    .any(|r| !std::ptr::eq(*r, *q) && r.contains_region(q, dist))
            })
            .collect()
    }

    /// Patches overlapping the boundary of `patch` that start inside it and
    /// outside its inner regions.
    fn sibling_regions(&self, patch: &Patch) -> Vec<&Patch> {
        let dist = self.tol.dist;
        let inner = self.inner_regions(patch);
        self.patches
            .values()
            .filter(|q| !std::ptr::eq(*q, patch) && !patch.contains_region(q, dist))
            .filter(|q| {
                q.points()
                    .first()
                    .is_some_and(|p| patch.is_point_inside(p) && !inner.iter().any(|r| r.is_point_inside(p)))
            })
            .collect()
    }
}
