//! Profile sweep: turns a [`SheetProfile`] into faces, edges and vertices
//! of a sheet solid.
//!
//! The profile is traced in the xz-plane starting at the origin, heading
//! +x with the sheet normal at +z, and extruded along +y by the sheet
//! width. Each segment becomes one face; neighboring faces share their
//! junction edge, which is what face adjacency is read from later. The
//! final bend of a closed profile reuses the very first junction edge,
//! closing the loop.

use tracing::debug;

use crate::creation::{ProfileSegment, SheetProfile};
use crate::error::{ConfigError, Result};
use crate::geometry::surface::{Cylinder, Plane};
use crate::geometry::{Circle, Line};
use crate::math::{Point3, Vector3};
use crate::topology::{
    EdgeCurve, EdgeData, EdgeId, FaceData, FaceId, FaceSurface, OrientedEdge, ShellData, SolidData,
    SolidId, TopologyStore, VertexData, VertexId, WireData,
};

/// How far a closed profile may miss its start point.
const CLOSURE_TOL: f64 = 1e-6;

/// Position and heading of the sweep within the profile plane.
#[derive(Debug, Clone, Copy)]
struct Frame {
    point: Point3,
    dir: Vector3,
    normal: Vector3,
}

impl Frame {
    fn start() -> Self {
        Self {
            point: Point3::origin(),
            dir: Vector3::x(),
            normal: Vector3::z(),
        }
    }

    /// Frame after turning by `angle` and moving to `point`.
    fn turned(&self, angle: f64, point: Point3) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            point,
            dir: self.dir * cos + self.normal * sin,
            normal: self.normal * cos - self.dir * sin,
        }
    }
}

/// Rail pair crossing the sheet at one profile position.
#[derive(Debug, Clone, Copy)]
struct Junction {
    near: VertexId,
    far: VertexId,
    edge: EdgeId,
}

/// Builds a sheet solid by sweeping a profile.
#[derive(Debug)]
pub struct MakeSheet {
    profile: SheetProfile,
    width: f64,
}

impl MakeSheet {
    /// Creates the operation; `width` is the extrusion extent along +y.
    #[must_use]
    pub fn new(profile: SheetProfile, width: f64) -> Self {
        Self { profile, width }
    }

    /// Sweeps the profile and returns the new solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the width is not positive or a closed profile
    /// does not return to its start point.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ConfigError::InvalidWidth(self.width).into());
        }

        let mut frame = Frame::start();
        let start_point = frame.point;
        let first = self.junction(store, frame.point)?;
        let mut previous = first;
        let mut faces = Vec::with_capacity(self.profile.segments().len());

        let last_index = self.profile.segments().len() - 1;
        for (index, segment) in self.profile.segments().iter().enumerate() {
            match *segment {
                ProfileSegment::Flange { length } => {
                    let end_point = frame.point + frame.dir * length;
                    let end = self.junction(store, end_point)?;
                    faces.push(self.flange_face(store, &frame, length, &previous, &end)?);
                    previous = end;
                    frame.point = end_point;
                }
                ProfileSegment::Bend { radius, angle } => {
                    let sgn = if angle >= 0.0 { 1.0 } else { -1.0 };
                    let span = angle.abs();
                    let center = frame.point + frame.normal * (radius * sgn);
                    let end_point = center - frame.normal * (sgn * radius * span.cos())
                        + frame.dir * (radius * span.sin());

                    let closing = self.profile.is_closed() && index == last_index;
                    let end = if closing {
                        if (end_point - start_point).norm() > CLOSURE_TOL {
                            return Err(ConfigError::InvalidProfile(
                                "closed profile does not return to its start".into(),
                            )
                            .into());
                        }
                        first
                    } else {
                        self.junction(store, end_point)?
                    };
                    faces.push(self.bend_face(
                        store, &frame, radius, sgn, span, center, &previous, &end,
                    )?);
                    previous = end;
                    frame = frame.turned(angle, end_point);
                }
            }
        }

        let shell = store.add_shell(ShellData {
            faces,
            is_closed: self.profile.is_closed(),
        });
        let solid = store.add_solid(SolidData { shell });
        debug!(
            "swept {} profile segments into sheet solid",
            self.profile.segments().len()
        );
        Ok(solid)
    }

    /// Adds the rail pair and junction edge at one profile position.
    fn junction(&self, store: &mut TopologyStore, point: Point3) -> Result<Junction> {
        let near = store.add_vertex(VertexData::new(point));
        let far = store.add_vertex(VertexData::new(point + Vector3::y() * self.width));
        let edge = store.add_edge(EdgeData {
            start: near,
            end: far,
            curve: EdgeCurve::Line(Line::new(point, Vector3::y())?),
            t_start: 0.0,
            t_end: self.width,
        });
        Ok(Junction { near, far, edge })
    }

    fn flange_face(
        &self,
        store: &mut TopologyStore,
        frame: &Frame,
        length: f64,
        start: &Junction,
        end: &Junction,
    ) -> Result<FaceId> {
        let near = store.add_edge(EdgeData {
            start: start.near,
            end: end.near,
            curve: EdgeCurve::Line(Line::new(frame.point, frame.dir)?),
            t_start: 0.0,
            t_end: length,
        });
        let far = store.add_edge(EdgeData {
            start: start.far,
            end: end.far,
            curve: EdgeCurve::Line(Line::new(
                frame.point + Vector3::y() * self.width,
                frame.dir,
            )?),
            t_start: 0.0,
            t_end: length,
        });
        let wire = store.add_wire(WireData {
            edges: vec![
                OrientedEdge::new(near, true),
                OrientedEdge::new(end.edge, true),
                OrientedEdge::new(far, false),
                OrientedEdge::new(start.edge, false),
            ],
            is_closed: true,
        });
        let plane = Plane::new(frame.point, frame.dir, Vector3::y())?;
        Ok(store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            outer_wire: wire,
            inner_wires: Vec::new(),
            same_sense: true,
        }))
    }

    #[allow(clippy::too_many_arguments)]
    fn bend_face(
        &self,
        store: &mut TopologyStore,
        frame: &Frame,
        radius: f64,
        sgn: f64,
        span: f64,
        center: Point3,
        start: &Junction,
        end: &Junction,
    ) -> Result<FaceId> {
        let axis = Vector3::y() * -sgn;
        let ref_dir = frame.normal * -sgn;
        let near = store.add_edge(EdgeData {
            start: start.near,
            end: end.near,
            curve: EdgeCurve::Arc(Circle::new(center, radius, axis, ref_dir)?),
            t_start: 0.0,
            t_end: span,
        });
        let far = store.add_edge(EdgeData {
            start: start.far,
            end: end.far,
            curve: EdgeCurve::Arc(Circle::new(
                center + Vector3::y() * self.width,
                radius,
                axis,
                ref_dir,
            )?),
            t_start: 0.0,
            t_end: span,
        });
        let wire = store.add_wire(WireData {
            edges: vec![
                OrientedEdge::new(start.edge, false),
                OrientedEdge::new(near, true),
                OrientedEdge::new(end.edge, true),
                OrientedEdge::new(far, false),
            ],
            is_closed: true,
        });
        let cylinder = Cylinder::new(center, radius, axis, ref_dir)?;
        Ok(store.add_face(FaceData {
            surface: FaceSurface::Cylinder(cylinder),
            outer_wire: wire,
            inner_wires: Vec::new(),
            same_sense: true,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::UnbendError;

    fn flange(length: f64) -> ProfileSegment {
        ProfileSegment::Flange { length }
    }

    fn bend(radius: f64, angle: f64) -> ProfileSegment {
        ProfileSegment::Bend { radius, angle }
    }

    fn bracket_profile() -> SheetProfile {
        SheetProfile::open(vec![flange(10.0), bend(1.0, FRAC_PI_2), flange(5.0)]).unwrap()
    }

    fn shell_faces(store: &TopologyStore, solid: SolidId) -> Vec<FaceId> {
        let solid_data = store.solid(solid).unwrap();
        store.shell(solid_data.shell).unwrap().faces.clone()
    }

    #[test]
    fn faces_follow_profile_order() {
        let mut store = TopologyStore::new();
        let solid = MakeSheet::new(bracket_profile(), 4.0)
            .execute(&mut store)
            .unwrap();
        let faces = shell_faces(&store, solid);
        assert_eq!(faces.len(), 3);
        assert!(matches!(
            store.face(faces[0]).unwrap().surface,
            FaceSurface::Plane(_)
        ));
        assert!(matches!(
            store.face(faces[1]).unwrap().surface,
            FaceSurface::Cylinder(_)
        ));
        assert!(matches!(
            store.face(faces[2]).unwrap().surface,
            FaceSurface::Plane(_)
        ));
    }

    #[test]
    fn first_flange_spans_the_expected_rectangle() {
        let mut store = TopologyStore::new();
        let solid = MakeSheet::new(bracket_profile(), 4.0)
            .execute(&mut store)
            .unwrap();
        let faces = shell_faces(&store, solid);
        let face = store.face(faces[0]).unwrap();
        let wire = store.wire(face.outer_wire).unwrap();
        assert_eq!(wire.edges.len(), 4);
        let first_edge = store.edge(wire.edges[0].edge).unwrap();
        let start = store.vertex(first_edge.start).unwrap().point;
        let end = store.vertex(first_edge.end).unwrap().point;
        assert_relative_eq!(start.x, 0.0);
        assert_relative_eq!(start.y, 0.0);
        assert_relative_eq!(end.x, 10.0);
        assert_relative_eq!(end.y, 0.0);
    }

    #[test]
    fn quarter_bend_lifts_the_second_flange() {
        let mut store = TopologyStore::new();
        let solid = MakeSheet::new(bracket_profile(), 4.0)
            .execute(&mut store)
            .unwrap();
        let faces = shell_faces(&store, solid);
        let face = store.face(faces[2]).unwrap();
        let FaceSurface::Plane(ref plane) = face.surface else {
            panic!("expected a plane");
        };
        // The second flange stands vertically at x = 11, heading +z.
        assert_relative_eq!(plane.origin().x, 11.0, epsilon = 1e-9);
        assert_relative_eq!(plane.origin().z, 1.0, epsilon = 1e-9);
        assert_relative_eq!(plane.normal().x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(plane.normal().z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn neighboring_faces_share_their_junction_edge() {
        let mut store = TopologyStore::new();
        let solid = MakeSheet::new(bracket_profile(), 4.0)
            .execute(&mut store)
            .unwrap();
        let faces = shell_faces(&store, solid);
        let flange_wire = store
            .wire(store.face(faces[0]).unwrap().outer_wire)
            .unwrap()
            .clone();
        let bend_wire = store
            .wire(store.face(faces[1]).unwrap().outer_wire)
            .unwrap()
            .clone();
        let shared: Vec<_> = flange_wire
            .edges
            .iter()
            .filter(|oe| bend_wire.edges.iter().any(|be| be.edge == oe.edge))
            .collect();
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn closed_profile_reuses_the_first_junction() {
        let mut store = TopologyStore::new();
        let profile = SheetProfile::closed(vec![
            flange(10.0),
            bend(1.0, FRAC_PI_2),
            flange(10.0),
            bend(1.0, FRAC_PI_2),
            flange(10.0),
            bend(1.0, FRAC_PI_2),
            flange(10.0),
            bend(1.0, FRAC_PI_2),
        ])
        .unwrap();
        let solid = MakeSheet::new(profile, 6.0).execute(&mut store).unwrap();
        let faces = shell_faces(&store, solid);
        assert_eq!(faces.len(), 8);
        let first_wire = store
            .wire(store.face(faces[0]).unwrap().outer_wire)
            .unwrap()
            .clone();
        let last_wire = store
            .wire(store.face(faces[7]).unwrap().outer_wire)
            .unwrap()
            .clone();
        let shared: Vec<_> = first_wire
            .edges
            .iter()
            .filter(|oe| last_wire.edges.iter().any(|be| be.edge == oe.edge))
            .collect();
        assert_eq!(shared.len(), 1);
        assert!(store.shell(store.solid(solid).unwrap().shell).unwrap().is_closed);
    }

    #[test]
    fn non_closing_profile_is_rejected() {
        let mut store = TopologyStore::new();
        let profile = SheetProfile::closed(vec![
            flange(11.0),
            bend(1.0, FRAC_PI_2),
            flange(10.0),
            bend(1.0, FRAC_PI_2),
            flange(10.0),
            bend(1.0, FRAC_PI_2),
            flange(10.0),
            bend(1.0, FRAC_PI_2),
        ])
        .unwrap();
        let result = MakeSheet::new(profile, 6.0).execute(&mut store);
        assert!(matches!(
            result,
            Err(UnbendError::Config(ConfigError::InvalidProfile(ref m)))
                if m.contains("does not return")
        ));
    }

    #[test]
    fn width_must_be_positive() {
        let mut store = TopologyStore::new();
        let result = MakeSheet::new(bracket_profile(), 0.0).execute(&mut store);
        assert!(matches!(
            result,
            Err(UnbendError::Config(ConfigError::InvalidWidth(w))) if w == 0.0
        ));
    }

    #[test]
    fn down_bend_sweeps_below_the_base_plane() {
        let mut store = TopologyStore::new();
        let profile =
            SheetProfile::open(vec![flange(5.0), bend(1.0, -FRAC_PI_2), flange(5.0)]).unwrap();
        let solid = MakeSheet::new(profile, 2.0).execute(&mut store).unwrap();
        let faces = shell_faces(&store, solid);
        let face = store.face(faces[2]).unwrap();
        let FaceSurface::Plane(ref plane) = face.surface else {
            panic!("expected a plane");
        };
        assert_relative_eq!(plane.origin().x, 6.0, epsilon = 1e-9);
        assert_relative_eq!(plane.origin().z, -1.0, epsilon = 1e-9);
        // Heading straight down.
        assert_relative_eq!(plane.u_dir().z, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_angle_bend_produces_a_sliver_face() {
        let mut store = TopologyStore::new();
        let profile =
            SheetProfile::open(vec![flange(6.0), bend(1.0, 0.0), flange(4.0)]).unwrap();
        let solid = MakeSheet::new(profile, 2.0).execute(&mut store).unwrap();
        let faces = shell_faces(&store, solid);
        assert_eq!(faces.len(), 3);
        // Both junctions of the sliver bend sit at the same spot, but they
        // are distinct edges, so the flanges stay topologically separated.
        let bend_wire = store
            .wire(store.face(faces[1]).unwrap().outer_wire)
            .unwrap()
            .clone();
        assert_eq!(bend_wire.edges.len(), 4);
        let second = store.face(faces[2]).unwrap();
        let FaceSurface::Plane(ref plane) = second.surface else {
            panic!("expected a plane");
        };
        assert_relative_eq!(plane.origin().x, 6.0, epsilon = 1e-9);
        assert_relative_eq!(plane.origin().z, 0.0, epsilon = 1e-9);
    }
}
