mod cylinder;
mod plane;

pub use cylinder::Cylinder;
pub use plane::Plane;
