//! CurveGen: sampled curves through control points.
//!
//! [`CurveGenerator`] turns a [`ControlPoints`] sequence (and, for the
//! surface model, a [`SurfaceMesh`]) into an [`OutputCurve`] according to a
//! [`CurveConfig`]. Results are cached until the points, the mesh or the
//! configuration change.

pub mod config;
pub mod generator;
pub mod output;
pub mod points;

pub use config::{CurveConfig, CurveModel, KochanekConfig, PolynomialConfig};
pub use generator::CurveGenerator;
pub use output::OutputCurve;
pub use points::ControlPoints;

pub use cgen_core::{CurveError, Result};
pub use cgen_geometry::{FitMethod, PointSortingMethod, WeightFunction};
pub use cgen_math::{dvec3, Point3};
pub use cgen_surface::SurfaceCostFunction;
pub use cgen_topology::SurfaceMesh;
