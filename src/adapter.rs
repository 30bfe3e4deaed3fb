//! Narrow geometry-query layer between sheet models and the unfolding core.
//!
//! [`SolidQuery`] prescans one sheet solid: it lists faces in shell order,
//! classifies every face exactly once, and indexes which faces share each
//! edge. Everything downstream (tree building, unfolding, pattern assembly)
//! reads the model through this interface and never touches the topology
//! store directly.

use slotmap::SecondaryMap;

use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::surface::{Cylinder, Plane};
use crate::math::{polygon_2d, Point2, Point3};
use crate::topology::{
    EdgeCurve, EdgeId, FaceData, FaceId, FaceSurface, SolidId, TopologyStore, WireId,
};

/// Angular step used when sampling arc edges into polylines.
const ARC_STEP: f64 = std::f64::consts::PI / 24.0;

/// Cached classification of one sheet face.
///
/// Computed once at query construction; later lookups reuse the payload
/// instead of re-deriving it.
#[derive(Debug, Clone)]
pub enum SurfaceClass {
    /// Flat flange candidate. The plane is sense-adjusted so its normal
    /// is the face normal regardless of the stored surface orientation.
    Planar {
        /// Sense-adjusted plane of the face.
        plane: Plane,
        /// Outline area (holes subtracted).
        area: f64,
    },
    /// Bend candidate with its cylinder surface.
    Cylindrical {
        /// Cylinder of the tracked surface.
        cylinder: Cylinder,
    },
    /// Any other surface; tree construction over this face fails.
    Other {
        /// Surface kind for diagnostics.
        kind: String,
    },
}

/// A face boundary sampled into world-space polylines.
///
/// Rings carry no repeated closing point; the segment from the last
/// point back to the first is implied.
#[derive(Debug, Clone)]
pub struct SampledOutline {
    /// Outer ring.
    pub outer: Vec<Point3>,
    /// Hole rings.
    pub holes: Vec<Vec<Point3>>,
}

/// Read-only query interface over one sheet solid.
#[derive(Debug)]
pub struct SolidQuery<'a> {
    store: &'a TopologyStore,
    faces: Vec<FaceId>,
    classes: SecondaryMap<FaceId, SurfaceClass>,
    edge_faces: SecondaryMap<EdgeId, Vec<FaceId>>,
}

impl<'a> SolidQuery<'a> {
    /// Builds the query for `solid`, classifying every face and indexing
    /// edge adjacency.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or any referenced entity is missing,
    /// or if a face boundary is malformed.
    pub fn new(store: &'a TopologyStore, solid: SolidId) -> Result<Self> {
        let solid_data = store.solid(solid)?;
        let shell = store.shell(solid_data.shell)?;
        let faces = shell.faces.clone();

        let mut classes = SecondaryMap::new();
        let mut edge_faces: SecondaryMap<EdgeId, Vec<FaceId>> = SecondaryMap::new();

        for &face_id in &faces {
            let face = store.face(face_id)?;
            classes.insert(face_id, classify_face(store, face)?);

            for wire_id in face_wires(face) {
                let wire = store.wire(wire_id)?;
                for oe in &wire.edges {
                    let entry = edge_faces.entry(oe.edge).ok_or_else(|| {
                        TopologyError::EntityNotFound("edge".into())
                    })?;
                    let list = entry.or_default();
                    if !list.contains(&face_id) {
                        list.push(face_id);
                    }
                }
            }
        }

        Ok(Self {
            store,
            faces,
            classes,
            edge_faces,
        })
    }

    /// Faces of the sheet in shell (construction) order.
    #[must_use]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Cached classification of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not belong to this solid.
    pub fn classify(&self, face: FaceId) -> Result<&SurfaceClass> {
        self.classes
            .get(face)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()).into())
    }

    /// Sense-adjusted plane of a planar face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not planar.
    pub fn plane(&self, face: FaceId) -> Result<&Plane> {
        match self.classify(face)? {
            SurfaceClass::Planar { plane, .. } => Ok(plane),
            _ => Err(GeometryError::NotPlanar.into()),
        }
    }

    /// Outline area of a planar face (holes subtracted).
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not planar.
    pub fn area(&self, face: FaceId) -> Result<f64> {
        match self.classify(face)? {
            SurfaceClass::Planar { area, .. } => Ok(*area),
            _ => Err(GeometryError::NotPlanar.into()),
        }
    }

    /// Cylinder surface of a bend face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not cylindrical.
    pub fn cylinder(&self, face: FaceId) -> Result<&Cylinder> {
        match self.classify(face)? {
            SurfaceClass::Cylindrical { cylinder } => Ok(cylinder),
            _ => Err(GeometryError::NotCylindrical.into()),
        }
    }

    /// Faces sharing at least one edge with `face`, in first-contact order.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not belong to this solid.
    pub fn adjacent_faces(&self, face: FaceId) -> Result<Vec<FaceId>> {
        let mut result = Vec::new();
        for edge in self.face_edges(face)? {
            if let Some(list) = self.edge_faces.get(edge) {
                for &other in list {
                    if other != face && !result.contains(&other) {
                        result.push(other);
                    }
                }
            }
        }
        Ok(result)
    }

    /// Edges shared by two faces, in `a`'s boundary order.
    ///
    /// # Errors
    ///
    /// Returns an error if `a` does not belong to this solid.
    pub fn shared_edges(&self, a: FaceId, b: FaceId) -> Result<Vec<EdgeId>> {
        let mut result = Vec::new();
        for edge in self.face_edges(a)? {
            let touches_b = self
                .edge_faces
                .get(edge)
                .is_some_and(|list| list.contains(&b));
            if touches_b && !result.contains(&edge) {
                result.push(edge);
            }
        }
        Ok(result)
    }

    /// Samples a face boundary into world-space rings.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary wire is open or malformed.
    pub fn outline(&self, face: FaceId) -> Result<SampledOutline> {
        let data = self.store.face(face)?;
        let outer = sample_wire(self.store, data.outer_wire)?;
        let mut holes = Vec::with_capacity(data.inner_wires.len());
        for &wire in &data.inner_wires {
            holes.push(sample_wire(self.store, wire)?);
        }
        Ok(SampledOutline { outer, holes })
    }

    /// Endpoints of a straight edge in world space.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TangentNotLinear`] if the edge follows an
    /// arc instead of a line.
    pub fn straight_edge(&self, edge: EdgeId) -> Result<(Point3, Point3)> {
        let data = self.store.edge(edge)?;
        match &data.curve {
            EdgeCurve::Line(line) => Ok((line.evaluate(data.t_start), line.evaluate(data.t_end))),
            EdgeCurve::Arc(_) => Err(GeometryError::TangentNotLinear.into()),
        }
    }

    /// All boundary edges of a face, outer wire first.
    fn face_edges(&self, face: FaceId) -> Result<Vec<EdgeId>> {
        let data = self.store.face(face)?;
        let mut edges = Vec::new();
        for wire_id in face_wires(data) {
            let wire = self.store.wire(wire_id)?;
            edges.extend(wire.edges.iter().map(|oe| oe.edge));
        }
        Ok(edges)
    }
}

/// Outer wire followed by the hole wires of a face.
fn face_wires(face: &FaceData) -> impl Iterator<Item = WireId> + '_ {
    std::iter::once(face.outer_wire).chain(face.inner_wires.iter().copied())
}

fn classify_face(store: &TopologyStore, face: &FaceData) -> Result<SurfaceClass> {
    match &face.surface {
        FaceSurface::Plane(plane) => {
            let plane = if face.same_sense {
                plane.clone()
            } else {
                plane.reversed()
            };
            let area = planar_area(store, face, &plane)?;
            Ok(SurfaceClass::Planar { plane, area })
        }
        FaceSurface::Cylinder(cylinder) => Ok(SurfaceClass::Cylindrical {
            cylinder: cylinder.clone(),
        }),
        FaceSurface::Other(other) => Ok(SurfaceClass::Other {
            kind: other.kind.clone(),
        }),
    }
}

/// Area of a planar face from its sampled boundary, holes subtracted.
fn planar_area(store: &TopologyStore, face: &FaceData, plane: &Plane) -> Result<f64> {
    let to_uv = |ring: &[Point3]| -> Vec<Point2> {
        ring.iter()
            .map(|p| {
                let (u, v) = plane.uv_of(p);
                Point2::new(u, v)
            })
            .collect()
    };

    let outer = sample_wire(store, face.outer_wire)?;
    let mut area = polygon_2d::signed_area(&to_uv(&outer)).abs();
    for &wire in &face.inner_wires {
        let hole = sample_wire(store, wire)?;
        area -= polygon_2d::signed_area(&to_uv(&hole)).abs();
    }
    Ok(area)
}

/// Walks a closed wire and samples it into a world-space ring.
///
/// Straight edges contribute their start point; arcs are subdivided at a
/// fixed angular step. Consecutive edges must chain vertex-to-vertex.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn sample_wire(store: &TopologyStore, wire_id: WireId) -> Result<Vec<Point3>> {
    let wire = store.wire(wire_id)?;
    if !wire.is_closed || wire.edges.is_empty() {
        return Err(TopologyError::WireNotClosed.into());
    }

    // Vertex chain check: each edge must start where the previous ended.
    let n = wire.edges.len();
    for i in 0..n {
        let cur = store.edge(wire.edges[i].edge)?;
        let next = store.edge(wire.edges[(i + 1) % n].edge)?;
        let cur_end = if wire.edges[i].forward {
            cur.end
        } else {
            cur.start
        };
        let next_start = if wire.edges[(i + 1) % n].forward {
            next.start
        } else {
            next.end
        };
        if cur_end != next_start {
            return Err(TopologyError::WireNotClosed.into());
        }
    }

    let mut points = Vec::new();
    for oe in &wire.edges {
        let edge = store.edge(oe.edge)?;
        let (t0, t1) = if oe.forward {
            (edge.t_start, edge.t_end)
        } else {
            (edge.t_end, edge.t_start)
        };
        match &edge.curve {
            EdgeCurve::Line(line) => points.push(line.evaluate(t0)),
            EdgeCurve::Arc(circle) => {
                let span = t1 - t0;
                let segments = ((span.abs() / ARC_STEP).ceil() as usize).max(1);
                for i in 0..segments {
                    let t = t0 + span * (i as f64) / (segments as f64);
                    points.push(circle.evaluate(t));
                }
            }
        }
    }
    Ok(points)
}
