//! Open polyline curve parameterized by normalized arc length.

use planar_kernel_math::polyline as pl;
use planar_kernel_math::segment::distance_to_segment;
use planar_kernel_math::{Point2, Vec2};

use crate::{Curve, COORD_TOL};

/// A chain of straight pieces through an unbounded list of control points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pts: Vec<Point2>,
}

impl Polyline {
    /// An empty polyline, ready to collect control points.
    pub fn new() -> Self {
        Self::default()
    }

    /// A polyline through `points`.
    pub fn from_points(points: Vec<Point2>) -> Self {
        Self { pts: points }
    }

    pub(crate) fn ctrl_points(&self) -> &[Point2] {
        &self.pts
    }

    pub(crate) fn add_ctrl_point(&mut self, p: Point2) -> bool {
        self.pts.push(p);
        true
    }

    pub(crate) fn set_ctrl_point(&mut self, index: usize, p: Point2) -> bool {
        match self.pts.get_mut(index) {
            Some(slot) => {
                *slot = p;
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_possible(&self) -> bool {
        self.pts.len() >= 2
    }

    pub(crate) fn eval_point(&self, t: f64) -> Point2 {
        if t <= 0.0 {
            return self.pts[0];
        }
        if t >= 1.0 {
            return self.pts[self.pts.len() - 1];
        }
        pl::point_at(&self.pts, t).map_or(self.pts[0], |(p, _, _)| p)
    }

    pub(crate) fn derivative(&self, t: f64) -> Vec2 {
        let total = pl::length(&self.pts);
        pl::tangent_at(&self.pts, t) * total
    }

    /// Interior points lie on the chord between the end points.
    pub(crate) fn is_straight(&self, tol: f64) -> bool {
        let first = self.pts[0];
        let last = self.pts[self.pts.len() - 1];
        self.pts[1..self.pts.len() - 1]
            .iter()
            .all(|p| distance_to_segment(p, &first, &last) <= tol)
    }

    pub(crate) fn split_at(&self, t: f64) -> (Curve, Curve) {
        let Some((q, seg, _)) = pl::point_at(&self.pts, t) else {
            return (Curve::Polyline(self.clone()), Curve::Polyline(self.clone()));
        };

        let mut left: Vec<Point2> = self.pts[..=seg].to_vec();
        if (q - self.pts[seg]).norm() >= COORD_TOL || left.len() < 2 {
            left.push(q);
        } else if let Some(last) = left.last_mut() {
            *last = q;
        }

        let mut right: Vec<Point2> = vec![q];
        let tail = &self.pts[seg + 1..];
        match tail.first() {
            Some(p) if (p - q).norm() < COORD_TOL && tail.len() > 1 => {
                right.extend_from_slice(&tail[1..]);
            }
            _ => right.extend_from_slice(tail),
        }

        (
            Curve::Polyline(Polyline::from_points(left)),
            Curve::Polyline(Polyline::from_points(right)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Polyline {
        Polyline::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
        ])
    }

    #[test]
    fn test_polyline_eval_by_arc_length() {
        let p = zigzag();
        assert_eq!(p.eval_point(0.0), Point2::new(0.0, 0.0));
        assert_eq!(p.eval_point(1.0), Point2::new(2.0, 1.0));
        let mid = p.eval_point(0.5);
        assert!((mid - Point2::new(1.0, 0.5)).norm() < 1e-12);
    }

    #[test]
    fn test_polyline_split_inside_segment() {
        let (l, r) = zigzag().split_at(0.5);
        assert_eq!(l.ctrl_points().len(), 3);
        assert_eq!(r.ctrl_points().len(), 3);
        assert!((l.ctrl_points()[2] - Point2::new(1.0, 0.5)).norm() < 1e-12);
        assert!((r.ctrl_points()[0] - Point2::new(1.0, 0.5)).norm() < 1e-12);
    }

    #[test]
    fn test_polyline_split_at_vertex() {
        let (l, r) = zigzag().split_at(1.0 / 3.0);
        assert_eq!(l.ctrl_points().len(), 2);
        assert_eq!(r.ctrl_points().len(), 3);
        assert!((l.ctrl_points()[1] - Point2::new(1.0, 0.0)).norm() < 1e-9);
        assert!((r.ctrl_points()[0] - Point2::new(1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_polyline_straightness() {
        assert!(!zigzag().is_straight(0.1));
        let straight = Polyline::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1e-6),
            Point2::new(2.0, 0.0),
        ]);
        assert!(straight.is_straight(1e-5));
    }
}
