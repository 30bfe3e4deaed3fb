use crate::geometry::surface::{Cylinder, Plane};

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// The geometric surface associated with a face.
///
/// Sheet models only ever unfold planar and cylindrical faces; any other
/// surface is carried as [`FaceSurface::Other`] so it can be named in
/// diagnostics when a sheet is rejected.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    /// A planar surface.
    Plane(Plane),
    /// A cylindrical surface.
    Cylinder(Cylinder),
    /// Any other surface kind (cone, sphere, freeform, ...).
    Other(OtherSurface),
}

/// Descriptive carrier for a surface the unfolder cannot process.
#[derive(Debug, Clone)]
pub struct OtherSurface {
    /// Human-readable surface kind, e.g. `"cone"` or `"b-spline"`.
    pub kind: String,
}

/// Data associated with a topological face.
///
/// A face is a bounded region on a surface, defined by an outer wire
/// and optionally inner wires (holes).
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The geometric surface on which this face lies.
    pub surface: FaceSurface,
    /// The outer boundary wire.
    pub outer_wire: WireId,
    /// Inner boundary wires (holes).
    pub inner_wires: Vec<WireId>,
    /// If `true`, the face normal agrees with the surface normal.
    pub same_sense: bool,
}
