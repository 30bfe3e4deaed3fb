mod circle;
mod line;

pub use circle::Circle;
pub use line::Line;
