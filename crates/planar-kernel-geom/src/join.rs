//! Joining of straight curves that share an end point.

use planar_kernel_math::segment::distance_to_segment;
use planar_kernel_math::Point2;

use crate::{Curve, CurveKind, JoinError};

fn straight_points(curve: &Curve) -> Option<&[Point2]> {
    match curve {
        Curve::Line(_) | Curve::Polyline(_) => Some(curve.ctrl_points()),
        _ => None,
    }
}

/// Orient `pts` so that it ends (`at_end`) or starts at `joint`.
fn oriented(pts: &[Point2], joint: &Point2, tol: f64, at_end: bool) -> Option<Vec<Point2>> {
    let first = pts.first()?;
    let last = pts.last()?;
    let (keep, flip) = if at_end { (last, first) } else { (first, last) };
    if (keep - joint).norm() <= tol {
        Some(pts.to_vec())
    } else if (flip - joint).norm() <= tol {
        Some(pts.iter().rev().copied().collect())
    } else {
        None
    }
}

impl Curve {
    /// Join this curve with `other` at their shared end point `joint`.
    ///
    /// Only lines and polylines join, and neither may be closed. The result
    /// runs from the far end of `self` through the joint to the far end of
    /// `other`. The joint is dropped when it is collinear with its neighbors,
    /// so two collinear lines collapse into a single line; otherwise the
    /// result is a polyline.
    ///
    /// Collinearity is tested against the vertices adjacent to the joint,
    /// not the far ends of the curves. For two lines these coincide. For a
    /// polyline, testing the far ends would straighten away its interior
    /// vertices, so only the joint itself may be removed.
    pub fn join(&self, other: &Curve, joint: &Point2, tol: f64) -> Result<Curve, JoinError> {
        if self.is_closed() {
            return Err(JoinError::ClosedCurve);
        }
        match (self.kind(), other.kind()) {
            (CurveKind::Line, CurveKind::Line | CurveKind::Polyline) => {}
            (CurveKind::Polyline, CurveKind::Line | CurveKind::Polyline) => {}
            (CurveKind::Line, _) => return Err(JoinError::LineIncompatible),
            (CurveKind::Polyline, _) => return Err(JoinError::PolylineIncompatible),
            (kind, _) => return Err(JoinError::NotJoinable(kind)),
        }
        if other.is_closed() {
            return Err(JoinError::ClosedCurve);
        }

        let (Some(a), Some(b)) = (straight_points(self), straight_points(other)) else {
            return Err(JoinError::NotJoinable(self.kind()));
        };
        let mut head = oriented(a, joint, tol, true).ok_or(JoinError::NotEndPoint)?;
        let tail = oriented(b, joint, tol, false).ok_or(JoinError::NotEndPoint)?;

        let n = head.len();
        head[n - 1] = *joint;
        let before = head[n - 2];
        let after = tail[1];
        if distance_to_segment(joint, &before, &after) <= tol {
            head.pop();
        }
        head.extend_from_slice(&tail[1..]);

        if head.len() == 2 {
            Ok(Curve::line(head[0], head[1]))
        } else {
            Ok(Curve::polyline(head))
        }
    }
}
