pub mod mesh;
pub mod types;
mod validate;

pub use mesh::SurfaceMesh;
pub use types::*;
