//! Edge traversal costs.

use cgen_core::named_variant_str;
use cgen_core::traits::NamedVariant;
use cgen_core::{CurveError, Result};
use serde::{Deserialize, Serialize};

/// How an edge's length and scalar combine into its traversal cost.
///
/// The scalar of an edge is the mean of its two vertex scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceCostFunction {
    /// Edge length only.
    #[default]
    #[serde(alias = "uniform")]
    Distance,
    /// `length + scalar`
    Additive,
    /// `length * scalar`
    #[serde(alias = "scalarWeighted")]
    Multiplicative,
    /// `length / scalar`
    Inverse,
    /// `length / scalar^2`
    InverseSquared,
}

impl NamedVariant for SurfaceCostFunction {
    const KIND: &'static str = "surface cost function";
    const VARIANTS: &'static [Self] = &[
        SurfaceCostFunction::Distance,
        SurfaceCostFunction::Additive,
        SurfaceCostFunction::Multiplicative,
        SurfaceCostFunction::Inverse,
        SurfaceCostFunction::InverseSquared,
    ];

    fn as_str(self) -> &'static str {
        match self {
            SurfaceCostFunction::Distance => "distance",
            SurfaceCostFunction::Additive => "additive",
            SurfaceCostFunction::Multiplicative => "multiplicative",
            SurfaceCostFunction::Inverse => "inverse",
            SurfaceCostFunction::InverseSquared => "inverseSquared",
        }
    }

    /// Also accepts the configuration names `uniform` and `scalarWeighted`.
    fn from_name(name: &str) -> Result<Self> {
        match name {
            "uniform" => Ok(SurfaceCostFunction::Distance),
            "scalarWeighted" => Ok(SurfaceCostFunction::Multiplicative),
            _ => Self::VARIANTS
                .iter()
                .copied()
                .find(|v| v.as_str() == name)
                .ok_or_else(|| {
                    CurveError::ConfigurationMismatch(format!(
                        "Unknown {}: {name:?}",
                        Self::KIND
                    ))
                }),
        }
    }
}

named_variant_str!(SurfaceCostFunction);

impl SurfaceCostFunction {
    /// Whether the cost reads the mesh scalar field.
    pub fn uses_scalars(self) -> bool {
        self != SurfaceCostFunction::Distance
    }

    /// Traversal cost of an edge.
    ///
    /// Never negative; a non-positive divisor or a non-finite result makes
    /// the edge impassable (infinite cost).
    pub fn edge_cost(self, length: f64, scalar: f64) -> f64 {
        let cost = match self {
            SurfaceCostFunction::Distance => length,
            SurfaceCostFunction::Additive => length + scalar,
            SurfaceCostFunction::Multiplicative => length * scalar,
            SurfaceCostFunction::Inverse if scalar > 0.0 => length / scalar,
            SurfaceCostFunction::InverseSquared if scalar > 0.0 => length / (scalar * scalar),
            SurfaceCostFunction::Inverse | SurfaceCostFunction::InverseSquared => f64::INFINITY,
        };
        if cost.is_nan() {
            f64::INFINITY
        } else {
            cost.max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_costs() {
        assert_relative_eq!(SurfaceCostFunction::Distance.edge_cost(2.0, 5.0), 2.0);
        assert_relative_eq!(SurfaceCostFunction::Additive.edge_cost(2.0, 5.0), 7.0);
        assert_relative_eq!(SurfaceCostFunction::Multiplicative.edge_cost(2.0, 5.0), 10.0);
        assert_relative_eq!(SurfaceCostFunction::Inverse.edge_cost(2.0, 4.0), 0.5);
        assert_relative_eq!(SurfaceCostFunction::InverseSquared.edge_cost(2.0, 4.0), 0.125);
    }

    #[test]
    fn test_impassable_and_clamped() {
        assert_eq!(SurfaceCostFunction::Inverse.edge_cost(1.0, 0.0), f64::INFINITY);
        assert_eq!(SurfaceCostFunction::InverseSquared.edge_cost(1.0, -2.0), f64::INFINITY);
        assert_eq!(SurfaceCostFunction::Additive.edge_cost(1.0, -3.0), 0.0);
        assert_eq!(SurfaceCostFunction::Multiplicative.edge_cost(1.0, f64::NAN), f64::INFINITY);
    }

    #[test]
    fn test_names_and_aliases() {
        assert_eq!(
            SurfaceCostFunction::from_name("inverseSquared"),
            Ok(SurfaceCostFunction::InverseSquared)
        );
        assert_eq!("uniform".parse(), Ok(SurfaceCostFunction::Distance));
        assert_eq!("scalarWeighted".parse(), Ok(SurfaceCostFunction::Multiplicative));
        assert!("geodesic".parse::<SurfaceCostFunction>().is_err());

        let parsed: SurfaceCostFunction = serde_json::from_str("\"scalarWeighted\"").unwrap();
        assert_eq!(parsed, SurfaceCostFunction::Multiplicative);
        assert_eq!(
            serde_json::to_string(&SurfaceCostFunction::InverseSquared).unwrap(),
            "\"inverseSquared\""
        );
    }
}
