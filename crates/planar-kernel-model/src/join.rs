//! Checks that precede joining two segments.

use planar_kernel_math::Point2;

use crate::{ModelError, Result, Segment};

/// The single end point shared by `a` and `b` within `tol`.
///
/// Fails when either segment is closed, or when the segments share no end
/// point or touch at both ends.
pub fn common_end_point(a: &Segment, b: &Segment, tol: f64) -> Result<Point2> {
    if a.is_closed() || b.is_closed() {
        return Err(ModelError::ClosedLoop);
    }
    let ends_a = [a.start_point(), a.end_point()];
    let ends_b = [b.start_point(), b.end_point()];
    let mut shared = ends_a
        .iter()
        .filter(|pa| ends_b.iter().any(|pb| (*pa - pb).norm() < tol));
    match (shared.next(), shared.next()) {
        (Some(p), None) => Ok(*p),
        _ => Err(ModelError::NoCommonPoint),
    }
}

/// Whether any segment in `others` has an end point within `tol` of `joint`.
pub fn framed_into<'a>(joint: &Point2, others: impl IntoIterator<Item = &'a Segment>, tol: f64) -> bool {
    others.into_iter().any(|s| {
        (s.start_point() - joint).norm() < tol || (s.end_point() - joint).norm() < tol
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_kernel_geom::{Circle, Curve};

    fn line(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(Curve::line(Point2::new(a.0, a.1), Point2::new(b.0, b.1)), 1e-3).unwrap()
    }

    #[test]
    fn test_common_end_point() {
        let a = line((0.0, 0.0), (1.0, 0.0));
        let b = line((1.0, 1.0), (1.0, 0.0005));
        assert_eq!(common_end_point(&a, &b, 1e-3).unwrap(), Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_rejections() {
        let a = line((0.0, 0.0), (1.0, 0.0));
        let far = line((5.0, 0.0), (6.0, 0.0));
        assert_eq!(common_end_point(&a, &far, 1e-3), Err(ModelError::NoCommonPoint));

        let back = line((1.0, 0.0), (0.0, 0.0));
        assert_eq!(common_end_point(&a, &back, 1e-3), Err(ModelError::NoCommonPoint));

        let ring = Segment::new(
            Curve::Circle(Circle::from_center_radius(Point2::new(0.0, 0.0), 1.0)),
            1e-3,
        )
        .unwrap();
        assert_eq!(common_end_point(&a, &ring, 1e-3), Err(ModelError::ClosedLoop));
    }

    #[test]
    fn test_framed_into() {
        let joint = Point2::new(1.0, 0.0);
        let others = [line((1.0, 0.0), (2.0, 2.0)), line((3.0, 3.0), (4.0, 4.0))];
        assert!(framed_into(&joint, &others, 1e-3));
        assert!(!framed_into(&joint, &others[1..], 1e-3));
    }
}
