//! Segments: committed curves with a cached flattening.

use planar_kernel_geom::{Curve, CurveProjection};
use planar_kernel_math::{polyline as pl, BoundBox, Point2};

use crate::SegmentSubdivision;

slotmap::new_key_type! {
    /// Unique identifier for a segment in the model.
    pub struct SegmentId;
}

/// A curve owned by the model together with its flattened polyline.
///
/// The end points of the polyline are the segment's end points. After a
/// split they are forced onto the exact cut coordinates, so neighbouring
/// pieces share bit-identical end points.
#[derive(Debug, Clone)]
pub struct Segment {
    curve: Curve,
    polyline: Vec<Point2>,
    /// Curve parameter of every polyline vertex.
    params: Vec<f64>,
    flatness: f64,
    selected: bool,
    subdivision: SegmentSubdivision,
}

impl Segment {
    /// Wrap a complete curve, flattening it with straightness tolerance `flatness`.
    ///
    /// Returns `None` when the curve is incomplete or flattens to fewer than two points.
    pub fn new(curve: Curve, flatness: f64) -> Option<Self> {
        if !curve.is_possible() {
            return None;
        }
        let mut segment = Self {
            curve,
            polyline: Vec::new(),
            params: Vec::new(),
            flatness,
            selected: false,
            subdivision: SegmentSubdivision::default(),
        };
        segment.reset_polyline();
        (segment.polyline.len() >= 2).then_some(segment)
    }

    /// The owned curve.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// The cached flattening.
    pub fn polyline(&self) -> &[Point2] {
        &self.polyline
    }

    /// Straightness tolerance of the cached flattening.
    pub fn flatness(&self) -> f64 {
        self.flatness
    }

    /// First point of the cached polyline.
    pub fn start_point(&self) -> Point2 {
        self.polyline[0]
    }

    /// Last point of the cached polyline.
    pub fn end_point(&self) -> Point2 {
        self.polyline[self.polyline.len() - 1]
    }

    /// Whether the segment is a closed loop.
    pub fn is_closed(&self) -> bool {
        self.curve.is_closed()
    }

    /// Whether the segment is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set the selection flag.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Mesh subdivision of the segment.
    pub fn subdivision(&self) -> SegmentSubdivision {
        self.subdivision
    }

    /// Set the mesh subdivision.
    pub fn set_subdivision(&mut self, subdivision: SegmentSubdivision) {
        self.subdivision = subdivision;
    }

    /// Length of the cached polyline.
    pub fn length(&self) -> f64 {
        pl::length(&self.polyline)
    }

    /// Recompute the cached polyline from the curve.
    pub fn reset_polyline(&mut self) {
        let flat = self.curve.flatten(self.flatness);
        self.params = flat.iter().map(|(t, _)| *t).collect();
        self.polyline = flat.into_iter().map(|(_, p)| p).collect();
    }

    /// Move control point `index` of the curve and refresh the polyline.
    ///
    /// Returns `false` (leaving the segment untouched) when the index is out
    /// of range or the moved curve would flatten to a single point.
    pub fn set_ctrl_point(&mut self, index: usize, x: f64, y: f64) -> bool {
        let mut curve = self.curve.clone();
        if !curve.set_ctrl_point(index, x, y) || !curve.is_possible() {
            return false;
        }
        let flat = curve.flatten(self.flatness);
        if flat.len() < 2 {
            return false;
        }
        self.curve = curve;
        self.params = flat.iter().map(|(t, _)| *t).collect();
        self.polyline = flat.into_iter().map(|(_, p)| p).collect();
        true
    }

    pub(crate) fn snap_start(&mut self, p: Point2) {
        self.polyline[0] = p;
    }

    pub(crate) fn snap_end(&mut self, p: Point2) {
        let n = self.polyline.len();
        self.polyline[n - 1] = p;
    }

    /// Map a normalized arc-length parameter on the polyline to a curve parameter.
    pub fn curve_param_at(&self, u: f64) -> f64 {
        match pl::point_at(&self.polyline, u) {
            Some((_, seg, local)) if self.params.len() >= 2 => {
                let seg = seg.min(self.params.len() - 2);
                self.params[seg] + local * (self.params[seg + 1] - self.params[seg])
            }
            _ => 0.0,
        }
    }

    /// Closest point on the curve to `(x, y)`.
    pub fn closest_point(&self, x: f64, y: f64) -> Option<CurveProjection> {
        self.curve.closest_point(x, y)
    }

    /// Distance from `p` to the cached polyline.
    pub fn distance_to(&self, p: &Point2) -> f64 {
        pl::closest_point(&self.polyline, p, None, 0.0)
            .map(|proj| proj.distance)
            .unwrap_or(f64::INFINITY)
    }

    /// Bounding box of the cached polyline.
    pub fn bound_box(&self) -> Option<BoundBox> {
        BoundBox::from_points(&self.polyline)
    }

    /// Split at ascending curve parameters with the exact cut coordinates `points`.
    ///
    /// Produces `params.len() + 1` entries; an entry is `None` when a cut
    /// falls on an end of the remaining curve. The pieces on both sides of
    /// every cut share the cut coordinate exactly.
    pub fn split(&self, params: &[f64], points: &[Point2]) -> Vec<Option<Segment>> {
        let pieces = self.curve.split_many(params, points);
        let last = pieces.len() - 1;
        let mut out: Vec<Option<Segment>> = pieces
            .into_iter()
            .map(|c| c.and_then(|c| Segment::new(c, self.flatness)))
            .collect();

        for (k, piece) in out.iter_mut().enumerate() {
            let Some(seg) = piece else {
                continue;
            };
            seg.subdivision = self.subdivision;
            let start = if k == 0 { Some(self.start_point()) } else { points.get(k - 1).copied() };
            let end = if k == last { Some(self.end_point()) } else { points.get(k).copied() };
            if let Some(p) = start {
                seg.snap_start(p);
            }
            if let Some(p) = end {
                seg.snap_end(p);
            }
        }
        out
    }

    /// Split into `n` equal pieces that share their end points exactly.
    pub fn split_into(&self, n: usize) -> Vec<Segment> {
        let mut out: Vec<Segment> = self
            .curve
            .split_into(n)
            .into_iter()
            .filter_map(|c| Segment::new(c, self.flatness))
            .collect();
        for k in 1..out.len() {
            let joint = out[k - 1].end_point();
            out[k].snap_start(joint);
        }
        if let Some(first) = out.first_mut() {
            first.snap_start(self.start_point());
        }
        if let Some(last) = out.last_mut() {
            last.snap_end(self.end_point());
        }
        for seg in &mut out {
            seg.subdivision = self.subdivision;
        }
        out
    }

    /// The `count + 1` mesh subdivision points from start to end.
    ///
    /// Points are spaced along the arc length of the polyline and then moved
    /// onto the curve. The end points are the polyline's end points.
    pub fn subdivision_points(&self) -> Vec<Point2> {
        let fractions = self.subdivision.fractions();
        let n = fractions.len() - 1;
        fractions
            .iter()
            .enumerate()
            .map(|(i, &u)| match i {
                0 => self.start_point(),
                i if i == n => self.end_point(),
                _ => self.curve.eval_point(self.curve_param_at(u)),
            })
            .collect()
    }
}
