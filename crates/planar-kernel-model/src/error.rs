//! Error types for modeling operations.

use planar_kernel_geom::JoinError;
use thiserror::Error;

/// Errors from modeling operations.
///
/// The messages of the user-recoverable variants are shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Patch creation was requested with nothing selected.
    #[error("Cannot create patch:\nNo segment is selected.")]
    NoSegmentForPatch,

    /// Some selected segment could not be linked into the chain.
    #[error("Cannot create patch:\nThe selected segments do not form a continuous chain.")]
    DiscontinuousChain,

    /// The chain does not return to its first point.
    #[error("Cannot create patch:\nThe selected segments do not close off a region.")]
    ChainNotClosed,

    /// A hole loop lies (partly) outside the outer boundary.
    #[error("Cannot create patch:\nA hole loop is not inside the outer boundary.")]
    HoleOutside,

    /// Intersection needs exactly two segments.
    #[error("You need to select exactly two segments to intersect")]
    IntersectSelection,

    /// Join was requested with nothing selected.
    #[error("Cannot join segments:\nNo segment is selected.")]
    NoSegmentForJoin,

    /// Join was requested with a single segment selected.
    #[error("Cannot join segments:\nTwo segments must be selected.")]
    TooFewForJoin,

    /// Join was requested with more than two segments selected.
    #[error("Cannot join segments:\nOnly two segments must be selected.")]
    TooManyForJoin,

    /// One of the segments to join is closed.
    #[error("Cannot join segments:\nOne segment is a closed loop.")]
    ClosedLoop,

    /// The two segments share no end point.
    #[error("Cannot join segments:\nSelected segments do not touch at a common point.")]
    NoCommonPoint,

    /// A third segment ends at the joining point.
    #[error("Cannot join segments:\nThere is another segment framing into the joining point.")]
    ThirdSegmentAtJoint,

    /// Curve-level join failure.
    #[error(transparent)]
    Join(#[from] JoinError),

    /// The curve does not have enough control points to be committed.
    #[error("curve is incomplete")]
    CurveNotPossible,

    /// The patch loops do not fit the chosen mesh generator.
    #[error("Invalid patch configuration for the selected mesh generator.")]
    InvalidPatchConfiguration,

    /// Numerical failure while meshing.
    #[error("Mesh generation failed.")]
    MeshGenerationFailed,

    /// The segment id is not (or no longer) in the model.
    #[error("unknown segment")]
    UnknownSegment,

    /// The patch id is not (or no longer) in the model.
    #[error("unknown patch")]
    UnknownPatch,
}

/// Result type for modeling operations.
pub type Result<T> = std::result::Result<T, ModelError>;
