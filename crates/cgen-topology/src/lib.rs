//! CurveGen surface topology: the half-edge mesh that surface-constrained
//! curves travel on.

pub mod halfedge;

pub use halfedge::*;
