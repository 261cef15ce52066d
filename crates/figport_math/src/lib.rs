//! Math types for figport: glam plus the bounding-box helpers the scene
//! graph needs to measure rendered extents.

// Re-export glam for convenience
pub use glam::*;

// Figport bounds types
mod interval;
mod aabb;
mod transform;

pub use interval::Interval;
pub use aabb::Aabb;
pub use transform::Mat4Ext;
