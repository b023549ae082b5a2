//! Straight line curve.

use planar_kernel_math::{Point2, Vec2};

use crate::Curve;

/// A straight line segment between two control points.
///
/// Parameterization: `P(t) = p0 + t * (p1 - p0)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pts: Vec<Point2>,
}

impl Line {
    /// An empty line, ready to collect control points.
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete line from `start` to `end`.
    pub fn from_points(start: Point2, end: Point2) -> Self {
        Self {
            pts: vec![start, end],
        }
    }

    pub(crate) fn ctrl_points(&self) -> &[Point2] {
        &self.pts
    }

    pub(crate) fn add_ctrl_point(&mut self, p: Point2) -> bool {
        if self.pts.len() >= 2 {
            return false;
        }
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
        self.pts.len() == 2
    }

    pub(crate) fn eval_point(&self, t: f64) -> Point2 {
        if t <= 0.0 {
            return self.pts[0];
        }
        if t >= 1.0 {
            return self.pts[1];
        }
        self.pts[0] + (self.pts[1] - self.pts[0]) * t
    }

    pub(crate) fn derivative(&self, _t: f64) -> Vec2 {
        self.pts[1] - self.pts[0]
    }

    pub(crate) fn split_at(&self, t: f64) -> (Curve, Curve) {
        let mid = self.eval_point(t);
        (
            Curve::Line(Line::from_points(self.pts[0], mid)),
            Curve::Line(Line::from_points(mid, self.pts[1])),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_arity() {
        let mut line = Line::new();
        assert!(!line.is_possible());
        assert!(line.add_ctrl_point(Point2::new(0.0, 0.0)));
        assert!(line.add_ctrl_point(Point2::new(1.0, 0.0)));
        assert!(line.is_possible());
        assert!(!line.add_ctrl_point(Point2::new(2.0, 0.0)));
        assert_eq!(line.ctrl_points().len(), 2);
    }

    #[test]
    fn test_line_eval_exact_ends() {
        let line = Line::from_points(Point2::new(0.1, 0.7), Point2::new(3.3, -2.9));
        assert_eq!(line.eval_point(0.0), Point2::new(0.1, 0.7));
        assert_eq!(line.eval_point(1.0), Point2::new(3.3, -2.9));
    }
}
