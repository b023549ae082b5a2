#![warn(missing_docs)]

//! planar: a 2D CAD geometry kernel.
//!
//! Parametric curves, boundary chains and patches, and structured or
//! Delaunay mesh generation. This crate re-exports the kernel crates and
//! adds a TOML configuration ([`KernelConfig`]).
//!
//! # Example
//!
//! ```
//! use planar::{Curve, KernelConfig, MeshStrategy, Point2};
//!
//! let config = KernelConfig::from_toml_str("[mesh]\nsubdivision_count = 2\n").unwrap();
//! let mut model = config.build_model();
//!
//! let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
//! for k in 0..4 {
//!     let (a, b) = (corners[k], corners[(k + 1) % 4]);
//!     let ids = model
//!         .insert_curve(Curve::line(Point2::new(a.0, a.1), Point2::new(b.0, b.1)))
//!         .unwrap();
//!     model.select_segment(ids[0], true).unwrap();
//! }
//! let patch = model.create_patch().unwrap();
//! let elements = model.generate_mesh(patch, MeshStrategy::TransfiniteBilinear).unwrap();
//! assert_eq!(elements, 4);
//! ```

mod config;

pub use config::{ConfigError, GridConfig, KernelConfig, MeshConfig, ToleranceConfig};

pub use planar_kernel_geom as geom;
pub use planar_kernel_math as math;
pub use planar_kernel_mesh as mesh;
pub use planar_kernel_model as model;

pub use planar_kernel_geom::{
    intersect_params, Circle, CircleArc, CubicBezier, Curve, CurveIntersection, CurveKind,
    CurveProjection, JoinError, Line, Polyline, QuadBezier,
};
pub use planar_kernel_math::{BoundBox, Point2, Tolerance, Vec2};
pub use planar_kernel_mesh::{
    Element, MeshDelaunay, MeshError, MeshGenerator, MeshStrategy, PatchMesh, TransfinBilinear,
    TransfinTrilinear,
};
pub use planar_kernel_model::{
    assemble_chain, common_end_point, framed_into, intersect_segments, subdivide_self_intersected,
    BoundaryLoop, CurveCollector, Grid, IntersectionPieces, Model, ModelError, Patch, PatchEdge,
    PatchId, RegionNesting, Segment, SegmentId, SegmentSubdivision,
};
