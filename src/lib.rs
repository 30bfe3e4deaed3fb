pub mod adapter;
pub mod creation;
pub mod error;
pub mod export;
pub mod geometry;
pub mod math;
pub mod pattern;
pub mod pipeline;
pub mod topology;
pub mod tree;
pub mod unfold;

pub use error::{Result, UnbendError};
