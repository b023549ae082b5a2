#![warn(missing_docs)]

//! Segments, patches and modeling operations for the planar kernel.
//!
//! A [`Segment`] owns one curve and caches its flattening. Segments are
//! split where curves cross ([`intersect_segments`]), joined at shared end
//! points, and traced into closed chains that bound a [`Patch`]. The
//! [`Model`] stores segments and patches in slot maps and applies every
//! operation build-then-swap, so a failed operation changes nothing.
//!
//! # Example
//!
//! ```
//! use planar_kernel_geom::Curve;
//! use planar_kernel_math::Point2;
//! use planar_kernel_model::Model;
//!
//! let mut model = Model::new();
//! let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
//! for k in 0..4 {
//!     let (a, b) = (corners[k], corners[(k + 1) % 4]);
//!     let ids = model
//!         .insert_curve(Curve::line(Point2::new(a.0, a.1), Point2::new(b.0, b.1)))
//!         .unwrap();
//!     model.select_segment(ids[0], true).unwrap();
//! }
//! let patch = model.create_patch().unwrap();
//! assert!((model.patch(patch).unwrap().area() - 1.0).abs() < 1e-12);
//! ```

mod collector;
mod error;
mod grid;
mod intersect;
mod join;
mod model;
mod patch;
mod segment;
mod subdivision;

pub use collector::CurveCollector;
pub use error::{ModelError, Result};
pub use grid::Grid;
pub use intersect::{intersect_segments, subdivide_self_intersected, IntersectionPieces};
pub use join::{common_end_point, framed_into};
pub use model::Model;
pub use patch::{assemble_chain, BoundaryLoop, Patch, PatchEdge, PatchId, RegionNesting};
pub use segment::{Segment, SegmentId};
pub use subdivision::SegmentSubdivision;
