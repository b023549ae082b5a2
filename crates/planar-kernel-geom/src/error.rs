//! Error types for curve operations.

use thiserror::Error;

use crate::CurveKind;

/// Reasons two curves cannot be joined.
///
/// The messages are user-facing and surfaced verbatim by the modeler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// One of the curves is a closed loop.
    #[error("Cannot join segments:\nA closed curve may not be joined with another curve.")]
    ClosedCurve,

    /// A line was paired with a curve other than a line or polyline.
    #[error("Cannot join segments:\nA LINE curve may be joined only with a LINE or a POLYLINE.")]
    LineIncompatible,

    /// A polyline was paired with a curve other than a line or polyline.
    #[error("Cannot join segments:\nA POLYLINE curve may be joined only with a LINE or a POLYLINE.")]
    PolylineIncompatible,

    /// The curve kind does not support joining at all.
    #[error("Cannot join segments:\nA {0} curve may not be joined with another curve.")]
    NotJoinable(CurveKind),

    /// The joining point is not an end point of both curves.
    #[error("Cannot join segments:\nThe joining point is not an end point of both curves.")]
    NotEndPoint,
}
