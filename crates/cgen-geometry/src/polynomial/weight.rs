//! Moving least squares weight functions.

use std::f64::consts::PI;

use cgen_core::named_variant_str;
use cgen_core::traits::NamedVariant;
use serde::{Deserialize, Serialize};

/// Falloff of a sample's influence with its parameter distance from the
/// evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeightFunction {
    Rectangular,
    Triangular,
    Cosine,
    #[default]
    Gaussian,
}

impl NamedVariant for WeightFunction {
    const KIND: &'static str = "weight function";
    const VARIANTS: &'static [Self] = &[
        WeightFunction::Rectangular,
        WeightFunction::Triangular,
        WeightFunction::Cosine,
        WeightFunction::Gaussian,
    ];

    fn as_str(self) -> &'static str {
        match self {
            WeightFunction::Rectangular => "rectangular",
            WeightFunction::Triangular => "triangular",
            WeightFunction::Cosine => "cosine",
            WeightFunction::Gaussian => "gaussian",
        }
    }
}

named_variant_str!(WeightFunction);

impl WeightFunction {
    /// Weight of a sample at parameter `distance` from the evaluation point
    /// inside a window reaching `half_width` to either side.
    ///
    /// Always in `[0, 1]`, 1 at the centre and exactly 0 beyond the window.
    /// The gaussian puts the window edge at three standard deviations.
    pub fn weight(self, distance: f64, half_width: f64) -> f64 {
        if !(half_width > 0.0) {
            return if distance == 0.0 { 1.0 } else { 0.0 };
        }
        let r = distance.abs() / half_width;
        if r > 1.0 {
            return 0.0;
        }
        match self {
            WeightFunction::Rectangular => 1.0,
            WeightFunction::Triangular => 1.0 - r,
            WeightFunction::Cosine => ((PI * r).cos() + 1.0) / 2.0,
            WeightFunction::Gaussian => (-4.5 * r * r).exp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_outside_window() {
        for &f in WeightFunction::VARIANTS {
            assert_eq!(f.weight(0.26, 0.25), 0.0, "{f}");
            assert_eq!(f.weight(-0.3, 0.25), 0.0, "{f}");
            assert_relative_eq!(f.weight(0.0, 0.25), 1.0);
        }
    }

    #[test]
    fn test_falloff_shapes() {
        assert_relative_eq!(WeightFunction::Rectangular.weight(0.2, 0.25), 1.0);
        assert_relative_eq!(WeightFunction::Triangular.weight(0.125, 0.25), 0.5);
        assert_relative_eq!(WeightFunction::Cosine.weight(0.125, 0.25), 0.5, epsilon = 1e-12);
        assert_relative_eq!(WeightFunction::Cosine.weight(0.25, 0.25), 0.0, epsilon = 1e-12);
        // window edge is 3 sigma
        assert_relative_eq!(WeightFunction::Gaussian.weight(0.25, 0.25), (-4.5f64).exp());
    }

    #[test]
    fn test_names() {
        assert_eq!("cosine".parse::<WeightFunction>(), Ok(WeightFunction::Cosine));
        assert_eq!(WeightFunction::default(), WeightFunction::Gaussian);
        let json = serde_json::to_string(&WeightFunction::Triangular).unwrap();
        assert_eq!(json, "\"triangular\"");
    }
}
