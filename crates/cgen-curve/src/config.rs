//! Curve generation settings.

use cgen_core::named_variant_str;
use cgen_core::traits::{NamedVariant, Validate};
use cgen_core::{CurveError, Result};
use cgen_geometry::{FitMethod, PointSortingMethod, WeightFunction};
use cgen_surface::SurfaceCostFunction;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLES_PER_SEGMENT: usize = 5;
/// Highest polynomial order a configuration may request.
pub const MAX_REQUESTED_POLYNOMIAL_ORDER: usize = 9;

/// How the curve relates to its control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurveModel {
    /// Straight segments between control points.
    #[default]
    #[serde(rename = "linear")]
    LinearSpline,
    /// C2 cubic through the control points.
    #[serde(rename = "spline")]
    CardinalSpline,
    /// Kochanek–Bartels cubic through the control points.
    #[serde(rename = "kochanekSpline")]
    KochanekSpline,
    /// Least squares polynomial approximating the control points.
    #[serde(rename = "polynomial")]
    Polynomial,
    /// Shortest paths along the edges of a surface mesh.
    #[serde(rename = "shortestDistanceOnSurface")]
    ShortestDistanceOnSurface,
}

impl NamedVariant for CurveModel {
    const KIND: &'static str = "curve type";
    const VARIANTS: &'static [Self] = &[
        CurveModel::LinearSpline,
        CurveModel::CardinalSpline,
        CurveModel::KochanekSpline,
        CurveModel::Polynomial,
        CurveModel::ShortestDistanceOnSurface,
    ];

    fn as_str(self) -> &'static str {
        match self {
            CurveModel::LinearSpline => "linear",
            CurveModel::CardinalSpline => "spline",
            CurveModel::KochanekSpline => "kochanekSpline",
            CurveModel::Polynomial => "polynomial",
            CurveModel::ShortestDistanceOnSurface => "shortestDistanceOnSurface",
        }
    }
}

named_variant_str!(CurveModel);

impl CurveModel {
    /// Whether the curve passes through every control point.
    pub fn is_interpolating(self) -> bool {
        matches!(
            self,
            CurveModel::LinearSpline | CurveModel::CardinalSpline | CurveModel::KochanekSpline
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KochanekConfig {
    pub bias: f64,
    pub tension: f64,
    pub continuity: f64,
    /// Pin the end derivatives to the first and last finite differences.
    pub copy_nearest_end_derivatives: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolynomialConfig {
    pub order: usize,
    pub sort_method: PointSortingMethod,
    pub fit_method: FitMethod,
    pub weight_function: WeightFunction,
    /// Moving least squares window as a fraction of the parameter range.
    pub sample_width: f64,
}

impl Default for PolynomialConfig {
    fn default() -> Self {
        Self {
            order: cgen_geometry::polynomial::DEFAULT_POLYNOMIAL_ORDER,
            sort_method: PointSortingMethod::default(),
            fit_method: FitMethod::default(),
            weight_function: WeightFunction::default(),
            sample_width: cgen_geometry::polynomial::DEFAULT_SAMPLE_WIDTH,
        }
    }
}

/// Everything that selects and shapes the generated curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurveConfig {
    pub curve_model: CurveModel,
    /// Join the last control point back to the first.
    #[serde(rename = "loop")]
    pub closed: bool,
    pub samples_per_segment: usize,
    pub kochanek: KochanekConfig,
    pub polynomial: PolynomialConfig,
    pub surface_cost_function: SurfaceCostFunction,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            curve_model: CurveModel::default(),
            closed: false,
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
            kochanek: KochanekConfig::default(),
            polynomial: PolynomialConfig::default(),
            surface_cost_function: SurfaceCostFunction::default(),
        }
    }
}

fn in_unit_range(v: f64) -> bool {
    (-1.0..=1.0).contains(&v)
}

fn clamp_unit(name: &str, v: f64) -> f64 {
    if in_unit_range(v) {
        v
    } else {
        let clamped = if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        log::warn!("Kochanek {name} {v} outside [-1, 1], using {clamped}");
        clamped
    }
}

impl CurveConfig {
    /// Copy with every out-of-range value brought into range, logging a
    /// warning for each adjustment.
    pub fn sanitized(&self) -> Self {
        let mut config = *self;
        if config.samples_per_segment == 0 {
            log::warn!("Samples per segment must be at least 1");
            config.samples_per_segment = 1;
        }

        let k = &mut config.kochanek;
        k.bias = clamp_unit("bias", k.bias);
        k.tension = clamp_unit("tension", k.tension);
        k.continuity = clamp_unit("continuity", k.continuity);

        let p = &mut config.polynomial;
        if p.order > MAX_REQUESTED_POLYNOMIAL_ORDER {
            log::warn!(
                "Polynomial order {} above {MAX_REQUESTED_POLYNOMIAL_ORDER}, clamping",
                p.order
            );
            p.order = MAX_REQUESTED_POLYNOMIAL_ORDER;
        }
        if !(p.sample_width > 0.0 && p.sample_width <= 1.0) {
            let width = if p.sample_width > 1.0 {
                1.0
            } else {
                cgen_geometry::polynomial::DEFAULT_SAMPLE_WIDTH
            };
            log::warn!("Sample width {} outside (0, 1], using {width}", p.sample_width);
            p.sample_width = width;
        }
        config
    }
}

impl Validate for CurveConfig {
    fn validate(&self) -> Result<()> {
        if self.samples_per_segment == 0 {
            return Err(CurveError::ConfigurationMismatch(
                "Samples per segment must be at least 1".into(),
            ));
        }
        let k = &self.kochanek;
        for (name, value) in [("bias", k.bias), ("tension", k.tension), ("continuity", k.continuity)] {
            if !in_unit_range(value) {
                return Err(CurveError::ConfigurationMismatch(format!(
                    "Kochanek {name} {value} outside [-1, 1]"
                )));
            }
        }
        if self.polynomial.order > MAX_REQUESTED_POLYNOMIAL_ORDER {
            return Err(CurveError::ConfigurationMismatch(format!(
                "Polynomial order {} above {MAX_REQUESTED_POLYNOMIAL_ORDER}",
                self.polynomial.order
            )));
        }
        let width = self.polynomial.sample_width;
        if !(width > 0.0 && width <= 1.0) {
            return Err(CurveError::ConfigurationMismatch(format!(
                "Sample width {width} outside (0, 1]"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CurveConfig::default();
        assert_eq!(config.curve_model, CurveModel::LinearSpline);
        assert!(!config.closed);
        assert_eq!(config.samples_per_segment, 5);
        assert_eq!(config.polynomial.order, 1);
        assert_eq!(config.polynomial.sort_method, PointSortingMethod::Indices);
        assert_eq!(config.polynomial.fit_method, FitMethod::GlobalLeastSquares);
        assert_eq!(config.polynomial.weight_function, WeightFunction::Gaussian);
        assert_eq!(config.polynomial.sample_width, 0.5);
        assert_eq!(config.surface_cost_function, SurfaceCostFunction::Distance);
        config.validate().unwrap();
    }

    #[test]
    fn test_model_names() {
        for &model in CurveModel::VARIANTS {
            assert_eq!(model.as_str().parse::<CurveModel>(), Ok(model));
        }
        assert_eq!(CurveModel::KochanekSpline.to_string(), "kochanekSpline");
        let err = "bezier".parse::<CurveModel>().unwrap_err();
        assert!(matches!(err, CurveError::ConfigurationMismatch(_)));
    }

    #[test]
    fn test_sanitize_clamps() {
        let mut config = CurveConfig::default();
        config.samples_per_segment = 0;
        config.kochanek.tension = 3.0;
        config.kochanek.bias = f64::NAN;
        config.polynomial.order = 12;
        config.polynomial.sample_width = 0.0;
        assert!(config.validate().is_err());

        let fixed = config.sanitized();
        assert_eq!(fixed.samples_per_segment, 1);
        assert_eq!(fixed.kochanek.tension, 1.0);
        assert_eq!(fixed.kochanek.bias, 0.0);
        assert_eq!(fixed.polynomial.order, 9);
        assert_eq!(fixed.polynomial.sample_width, 0.5);
        fixed.validate().unwrap();
    }

    #[test]
    fn test_interpolating_models() {
        assert!(CurveModel::CardinalSpline.is_interpolating());
        assert!(!CurveModel::Polynomial.is_interpolating());
        assert!(!CurveModel::ShortestDistanceOnSurface.is_interpolating());
    }
}
