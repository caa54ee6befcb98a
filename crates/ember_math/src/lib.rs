// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::{Aabb, PADDING_DELTA};
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;
