#![warn(missing_docs)]

//! Math types for the planar modeling kernel.
//!
//! Thin wrappers around nalgebra providing the 2D point and vector types,
//! tolerance constants, bounding boxes, and the computational-geometry
//! primitives (segment projection and intersection, polygon winding and
//! containment, ear-clip triangulation, polyline intersection sweeps)
//! shared by the curve, model and mesh crates.

pub mod polygon;
pub mod polyline;
pub mod segment;

use nalgebra::Vector2;

/// A point in the modeling plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the modeling plane.
pub type Vec2 = Vector2<f64>;

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Coordinate coincidence distance (`DIST_TOL`).
    pub dist: f64,
    /// Curve-parameter coincidence (`PARAM_TOL`).
    pub param: f64,
    /// Tight coordinate equality used for closure tests (`COORD_TOL`).
    pub coord: f64,
    /// Straightness tolerance used when flattening curves into polylines.
    pub flatness: f64,
}

impl Tolerance {
    /// Default modeling tolerances.
    pub const DEFAULT: Self = Self {
        dist: 1e-3,
        param: 1e-7,
        coord: 1e-5,
        flatness: 1e-3,
    };

    /// Check if two points coincide within the distance tolerance.
    pub fn points_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.dist
    }

    /// Check if two points coincide within the tight coordinate tolerance.
    pub fn coords_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.coord
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.dist
    }

    /// Check if a parameter difference is effectively zero.
    pub fn is_zero_param(&self, dt: f64) -> bool {
        dt.abs() < self.param
    }

    /// Snap a curve parameter lying within `param` of 0 or 1 onto the bound.
    pub fn snap_param(&self, t: f64) -> f64 {
        if t.abs() < self.param {
            0.0
        } else if (t - 1.0).abs() < self.param {
            1.0
        } else {
            t
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    /// Lower-left corner.
    pub min: Point2,
    /// Upper-right corner.
    pub max: Point2,
}

impl BoundBox {
    /// Smallest box containing all `points`, or `None` for an empty slice.
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut bb = Self {
            min: *first,
            max: *first,
        };
        for p in &points[1..] {
            bb.include(p);
        }
        Some(bb)
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Union of two boxes.
    pub fn union(&self, other: &BoundBox) -> BoundBox {
        let mut bb = *self;
        bb.include(&other.min);
        bb.include(&other.max);
        bb
    }

    /// Width and height of the box.
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if `p` lies inside the box, grown by `margin`.
    pub fn contains(&self, p: &Point2, margin: f64) -> bool {
        p.x >= self.min.x - margin
            && p.x <= self.max.x + margin
            && p.y >= self.min.y - margin
            && p.y <= self.max.y + margin
    }
}

/// Z component of the cross product of two planar vectors.
#[inline]
pub fn cross(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area of triangle `abc` (positive when counter-clockwise).
#[inline]
pub fn area2(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    cross(&(b - a), &(c - a))
}

/// Unit vector along `v`, or the zero vector when `v` is degenerate.
pub fn unit_or_zero(v: Vec2) -> Vec2 {
    let len = v.norm();
    if len > f64::EPSILON {
        v / len
    } else {
        Vec2::zeros()
    }
}
