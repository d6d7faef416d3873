//! CurveGen geometry: interpolating splines, polynomial approximation and
//! control point parameterization.

pub mod curve;
pub mod polynomial;
pub mod sort;
pub mod spline;

pub use curve::{Curve, ParametricSpline};
pub use polynomial::{FitMethod, PolynomialApproximation, PolynomialFit, WeightFunction};
pub use sort::PointSortingMethod;
pub use spline::{EndCondition, KochanekParams, Spline, SplineKind};
