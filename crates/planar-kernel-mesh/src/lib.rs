#![warn(missing_docs)]

//! Mesh generation for planar patches.
//!
//! A patch boundary arrives as one or more loops of points together with the
//! number of subdivisions of every boundary segment on each loop. Generators
//! first validate that shape with [`MeshGenerator::set_loops`] and then build
//! a [`PatchMesh`] from the boundary points:
//!
//! 1. [`TransfinBilinear`]: one loop with four sides, quads by Coons blending
//! 2. [`TransfinTrilinear`]: one loop with three equal sides, triangles
//! 3. [`MeshDelaunay`]: an outer loop plus holes, conforming Delaunay
//!    triangles refined to an area and angle target set by the longest
//!    boundary edge
//!
//! # Example
//!
//! ```
//! use planar_kernel_math::Point2;
//! use planar_kernel_mesh::{MeshGenerator, MeshStrategy};
//!
//! let boundary: Vec<Point2> = [
//!     (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0),
//! ]
//! .iter()
//! .map(|&(x, y)| Point2::new(x, y))
//! .collect();
//!
//! let mut generator = MeshStrategy::TransfiniteBilinear.generator();
//! assert!(generator.set_loops(&[vec![1, 1, 1, 1]]));
//! let mesh = generator.generate_mesh(&boundary).unwrap();
//! assert_eq!(mesh.num_elements(), 1);
//! ```

mod bilinear;
mod delaunay;
mod trilinear;

use std::fmt;

use planar_kernel_math::{area2, Point2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bilinear::TransfinBilinear;
pub use delaunay::MeshDelaunay;
pub use trilinear::TransfinTrilinear;

/// Errors raised while generating a mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The loops handed to `set_loops` do not fit the generator.
    #[error("loop configuration does not fit the {0} generator")]
    InvalidLoops(&'static str),

    /// `generate_mesh` was called before a successful `set_loops`.
    #[error("{0} generator has no loop configuration")]
    NotConfigured(&'static str),

    /// The boundary point count does not match the loop configuration.
    #[error("expected {expected} boundary points, got {found}")]
    BoundaryCountMismatch {
        /// Count implied by the loop configuration.
        expected: usize,
        /// Count received.
        found: usize,
    },

    /// The boundary has no area to mesh.
    #[error("boundary is degenerate")]
    DegenerateBoundary,

    /// Triangulation produced no usable triangle.
    #[error("triangulation produced no triangles")]
    EmptyTriangulation,

    /// Boundary edges could not be recovered in the triangulation.
    #[error("boundary edges missing from the triangulation")]
    NonConforming,
}

/// Result type for mesh generation.
pub type Result<T> = std::result::Result<T, MeshError>;

/// One mesh element, as indices into [`PatchMesh::points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// Triangle.
    Tri([usize; 3]),
    /// Quadrilateral.
    Quad([usize; 4]),
}

impl Element {
    /// Node indices of the element.
    pub fn nodes(&self) -> &[usize] {
        match self {
            Element::Tri(n) => n.as_slice(),
            Element::Quad(n) => n.as_slice(),
        }
    }
}

/// Nodes and connectivity produced for one patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchMesh {
    /// Node coordinates.
    pub points: Vec<Point2>,
    /// Element connectivity.
    pub elements: Vec<Element>,
}

impl PatchMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of elements.
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Signed area of one element (positive when counter-clockwise).
    pub fn element_area(&self, element: &Element) -> f64 {
        let nodes = element.nodes();
        let p0 = &self.points[nodes[0]];
        nodes[1..]
            .windows(2)
            .map(|w| 0.5 * area2(p0, &self.points[w[0]], &self.points[w[1]]))
            .sum()
    }

    /// Sum of signed element areas.
    pub fn area(&self) -> f64 {
        self.elements.iter().map(|e| self.element_area(e)).sum()
    }
}

/// A mesh generation strategy.
pub trait MeshGenerator: fmt::Debug {
    /// Short name used in messages.
    fn name(&self) -> &'static str;

    /// Validate the loop shape: one entry per loop, holding the subdivision
    /// count of every segment on that loop in boundary order.
    ///
    /// Returns `false` when the shape does not fit this generator.
    fn set_loops(&mut self, loops: &[Vec<usize>]) -> bool;

    /// Build the mesh from boundary points laid out as described by the loops.
    fn generate_mesh(&self, boundary: &[Point2]) -> Result<PatchMesh>;
}

/// Selectable mesh generation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshStrategy {
    /// Structured quads by bilinear transfinite interpolation.
    #[default]
    TransfiniteBilinear,
    /// Structured triangles by trilinear transfinite interpolation.
    TransfiniteTrilinear,
    /// Unstructured triangles by Delaunay triangulation.
    Delaunay,
}

impl MeshStrategy {
    /// A fresh generator for this strategy.
    pub fn generator(self) -> Box<dyn MeshGenerator> {
        match self {
            MeshStrategy::TransfiniteBilinear => Box::new(TransfinBilinear::new()),
            MeshStrategy::TransfiniteTrilinear => Box::new(TransfinTrilinear::new()),
            MeshStrategy::Delaunay => Box::new(MeshDelaunay::new()),
        }
    }
}

/// Keep only non-degenerate triangles, oriented like `sign`, without duplicates.
pub(crate) fn orient_and_dedup(points: &[Point2], tris: &[[usize; 3]], sign: f64, eps: f64) -> Vec<Element> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(tris.len());
    for &[a, b, c] in tris {
        let area = area2(&points[a], &points[b], &points[c]);
        if area.abs() <= eps {
            continue;
        }
        let tri = if sign * area < 0.0 { [a, c, b] } else { [a, b, c] };
        let mut key = tri;
        key.sort_unstable();
        if seen.insert(key) {
            out.push(Element::Tri(tri));
        }
    }
    out
}
