//! GPU resource management
//!
//! Handle-based access to mesh data. The CPU-side copy of each mesh is
//! retained for ray picking.

mod mesh;
pub mod primitives;

pub use mesh::*;
