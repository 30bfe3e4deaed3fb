use thiserror::Error;

use crate::tree::BendNodeId;

/// Top-level error type for the unbend kernel.
#[derive(Debug, Error)]
pub enum UnbendError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("unsupported face geometry ({kind}): only planar and cylindrical faces unfold")]
    UnsupportedGeometry { kind: String },

    #[error(transparent)]
    Unfold(#[from] UnfoldError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Errors related to geometric queries and computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("face is not planar")]
    NotPlanar,

    #[error("face is not cylindrical")]
    NotCylindrical,

    #[error("bend tangent edge is not a straight line")]
    TangentNotLinear,
}

/// Errors in the bend-graph structure of a sheet.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("bend cycle: a flange is reachable through two distinct bend paths")]
    Cycle,

    #[error("ambiguous bend: cylindrical face borders {flange_count} flanges, expected 2")]
    AmbiguousBend { flange_count: usize },

    #[error("dangling bend: cylindrical face borders {flange_count} flange(s), expected 2")]
    DanglingBend { flange_count: usize },

    #[error("adjacent flanges share an edge with no bend between them")]
    AdjacentFlanges,

    #[error("disconnected sheet: {count} face(s) unreachable from the root flange")]
    Disconnected { count: usize },

    #[error("sheet has no planar face to serve as the root flange")]
    NoRootFlange,
}

/// Degenerate numeric input encountered while flattening.
#[derive(Debug, Error)]
pub enum UnfoldError {
    #[error("bend radius is zero; arc length at the neutral axis is undefined")]
    ZeroRadius,

    #[error("bend radius {0} is negative")]
    NegativeRadius(f64),
}

/// Invalid material or construction parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sheet thickness {0} is not positive")]
    InvalidThickness(f64),

    #[error("k-factor {0} is outside [0, 1]")]
    InvalidKFactor(f64),

    #[error("sheet width {0} is not positive")]
    InvalidWidth(f64),

    #[error("invalid sheet profile: {0}")]
    InvalidProfile(String),
}

/// Errors raised while assembling the flat pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("unfolded outlines overlap: flange {a:?} intersects flange {b:?}")]
    SelfIntersection { a: BendNodeId, b: BendNodeId },

    #[error("tree has not been unfolded; flat lengths are missing")]
    TreeNotUnfolded,
}

/// Convenience type alias for results using [`UnbendError`].
pub type Result<T> = std::result::Result<T, UnbendError>;
