//! Interactive curve collection, one control point at a time.

use planar_kernel_geom::{Curve, CurveKind};
use planar_kernel_math::Point2;

/// Builds a curve from successive input points.
#[derive(Debug, Clone)]
pub struct CurveCollector {
    curve: Option<Curve>,
    tol: f64,
    flatness: f64,
}

impl CurveCollector {
    /// A collector rejecting repeated points closer than `tol`.
    pub fn new(tol: f64, flatness: f64) -> Self {
        Self {
            curve: None,
            tol,
            flatness,
        }
    }

    /// Start collecting a new curve, discarding any curve in progress.
    pub fn start(&mut self, kind: CurveKind) {
        self.curve = Some(Curve::new(kind));
    }

    /// Kind of the curve in progress.
    pub fn kind(&self) -> Option<CurveKind> {
        self.curve.as_ref().map(Curve::kind)
    }

    /// Whether a curve is being collected.
    pub fn is_collecting(&self) -> bool {
        self.curve.is_some()
    }

    /// Whether the curve in progress is complete enough to be committed.
    pub fn has_finished(&self) -> bool {
        self.curve.as_ref().is_some_and(Curve::is_possible)
    }

    /// Add a control point.
    ///
    /// Returns `false` when nothing is being collected, when the point
    /// repeats the previous one, or when the curve is already full.
    pub fn insert_point(&mut self, x: f64, y: f64) -> bool {
        let Some(curve) = self.curve.as_mut() else {
            return false;
        };
        let p = Point2::new(x, y);
        if curve.ctrl_points().last().is_some_and(|q| (q - p).norm() < self.tol) {
            return false;
        }
        curve.add_ctrl_point(x, y)
    }

    /// Polyline to draw with `temp` as the floating next point.
    pub fn preview(&self, temp: Point2) -> Vec<Point2> {
        match &self.curve {
            Some(curve) => curve.preview_polyline(temp, self.flatness),
            None => Vec::new(),
        }
    }

    /// Finish collecting; returns the curve when it is complete.
    pub fn end_collection(&mut self) -> Option<Curve> {
        self.curve.take().filter(Curve::is_possible)
    }

    /// Abandon the curve in progress.
    pub fn kill(&mut self) {
        self.curve = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_line() {
        let mut c = CurveCollector::new(1e-3, 1e-3);
        assert!(!c.insert_point(0.0, 0.0));
        c.start(CurveKind::Line);
        assert!(c.is_collecting());
        assert!(c.insert_point(0.0, 0.0));
        assert!(!c.insert_point(0.0, 0.0005));
        assert!(!c.has_finished());
        assert_eq!(c.preview(Point2::new(1.0, 1.0)).len(), 2);
        assert!(c.insert_point(1.0, 1.0));
        assert!(c.has_finished());
        assert!(!c.insert_point(2.0, 2.0));
        let curve = c.end_collection().unwrap();
        assert_eq!(curve.kind(), CurveKind::Line);
        assert!(!c.is_collecting());
    }

    #[test]
    fn test_incomplete_curve_is_dropped() {
        let mut c = CurveCollector::new(1e-3, 1e-3);
        c.start(CurveKind::CubicBezier);
        c.insert_point(0.0, 0.0);
        c.insert_point(1.0, 1.0);
        assert!(c.end_collection().is_none());
    }

    #[test]
    fn test_kill() {
        let mut c = CurveCollector::new(1e-3, 1e-3);
        c.start(CurveKind::Polyline);
        c.insert_point(0.0, 0.0);
        c.kill();
        assert!(!c.is_collecting());
        assert!(c.preview(Point2::origin()).is_empty());
    }
}
