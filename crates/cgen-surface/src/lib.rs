//! CurveGen surface routing.
//!
//! Control points are snapped to their nearest mesh vertex and joined by
//! shortest paths along mesh edges, optionally weighted by a per-vertex
//! scalar field.

pub mod cost;
pub mod graph;
pub mod locator;
pub mod path;

pub use cost::SurfaceCostFunction;
pub use graph::SurfaceGraph;
pub use locator::{PointLocator, VertexMatch};
pub use path::{SurfaceCurve, SurfacePath, SurfacePathFinder};
