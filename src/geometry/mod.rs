pub mod curve;
pub mod surface;

pub use curve::{Circle, Line};
pub use surface::{Cylinder, Plane};
