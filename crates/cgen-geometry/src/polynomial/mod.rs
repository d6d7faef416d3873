//! Polynomial approximation of a 3D point sequence.
//!
//! [`PolynomialApproximation`] fits one polynomial per axis to
//! `(parameter, point)` samples. A global fit is computed once per input
//! change; a moving least squares fit is recomputed for each evaluation
//! parameter with weights centred on it.

mod fit;
mod weight;

use cgen_core::named_variant_str;
use cgen_core::traits::{NamedVariant, Tracked};
use cgen_core::{CurveError, Result, TimeStamp};
use cgen_math::Point3;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::curve::Curve;

pub use fit::{check_order, fit_polynomial, PolynomialFit, MAX_POLYNOMIAL_ORDER};
pub use weight::WeightFunction;

pub const DEFAULT_POLYNOMIAL_ORDER: usize = 1;
pub const DEFAULT_SAMPLE_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FitMethod {
    /// One fit over all samples with equal weights.
    #[default]
    GlobalLeastSquares,
    /// A local weighted fit per evaluation parameter.
    MovingLeastSquares,
}

impl NamedVariant for FitMethod {
    const KIND: &'static str = "polynomial fit method";
    const VARIANTS: &'static [Self] = &[FitMethod::GlobalLeastSquares, FitMethod::MovingLeastSquares];

    fn as_str(self) -> &'static str {
        match self {
            FitMethod::GlobalLeastSquares => "globalLeastSquares",
            FitMethod::MovingLeastSquares => "movingLeastSquares",
        }
    }
}

named_variant_str!(FitMethod);

/// Relative amount by which the safe half width exceeds the largest
/// parameter gap. Every weight function vanishes at the window edge.
pub const SAFE_WIDTH_MARGIN: f64 = 0.1;

/// Sample width widened so that half of it strictly exceeds every gap
/// between consecutive sorted parameters.
pub fn safe_sample_width(params: &[f64], requested: f64) -> f64 {
    let mut sorted = params.to_vec();
    sorted.sort_by(f64::total_cmp);
    let largest_gap = sorted.windows(2).map(|w| w[1] - w[0]).fold(0.0, f64::max);
    requested.max(2.0 * largest_gap * (1.0 + SAFE_WIDTH_MARGIN))
}

#[derive(Debug, Clone)]
struct LocalFit {
    input: TimeStamp,
    at: f64,
    fit: PolynomialFit,
}

/// Least squares polynomial curve through parameterized samples.
#[derive(Debug, Clone)]
pub struct PolynomialApproximation {
    params: Vec<f64>,
    points: Vec<Point3>,
    order: usize,
    fit_method: FitMethod,
    weight_function: WeightFunction,
    sample_width: f64,
    mtime: TimeStamp,
    global_fit: Option<(TimeStamp, PolynomialFit)>,
    safe_width: Option<(TimeStamp, f64)>,
    local_fit: Option<LocalFit>,
}

impl PolynomialApproximation {
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            points: Vec::new(),
            order: DEFAULT_POLYNOMIAL_ORDER,
            fit_method: FitMethod::default(),
            weight_function: WeightFunction::default(),
            sample_width: DEFAULT_SAMPLE_WIDTH,
            mtime: TimeStamp::now(),
            global_fit: None,
            safe_width: None,
            local_fit: None,
        }
    }

    /// Replace the samples. `params[i]` is the curve parameter of `points[i]`.
    pub fn set_points_and_parameters(&mut self, points: &[Point3], params: &[f64]) -> Result<()> {
        if points.len() != params.len() {
            return Err(CurveError::InvalidOperation(format!(
                "{} points but {} parameters",
                points.len(),
                params.len()
            )));
        }
        self.points = points.to_vec();
        self.params = params.to_vec();
        self.mtime.modified();
        Ok(())
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn parameters(&self) -> &[f64] {
        &self.params
    }

    /// Requested order, capped at [`MAX_POLYNOMIAL_ORDER`] with a warning.
    pub fn set_order(&mut self, order: usize) {
        let capped = check_order(order).unwrap_or_else(|err| {
            log::warn!("{err}, using {MAX_POLYNOMIAL_ORDER}");
            MAX_POLYNOMIAL_ORDER
        });
        if capped != self.order {
            self.order = capped;
            self.mtime.modified();
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn set_fit_method(&mut self, method: FitMethod) {
        if method != self.fit_method {
            self.fit_method = method;
            self.mtime.modified();
        }
    }

    pub fn fit_method(&self) -> FitMethod {
        self.fit_method
    }

    pub fn set_weight_function(&mut self, function: WeightFunction) {
        if function != self.weight_function {
            self.weight_function = function;
            self.mtime.modified();
        }
    }

    pub fn weight_function(&self) -> WeightFunction {
        self.weight_function
    }

    /// Requested moving least squares window, as a fraction of the parameter
    /// range. Values outside `(0, 1]` are clamped with a warning.
    pub fn set_sample_width(&mut self, width: f64) {
        let width = if width > 1.0 {
            log::warn!("Sample width {width} exceeds 1, clamping");
            1.0
        } else if width > 0.0 {
            width
        } else {
            log::warn!("Sample width {width} is not positive, using {DEFAULT_SAMPLE_WIDTH}");
            DEFAULT_SAMPLE_WIDTH
        };
        if width != self.sample_width {
            self.sample_width = width;
            self.mtime.modified();
        }
    }

    pub fn sample_width(&self) -> f64 {
        self.sample_width
    }

    /// Sample width actually used by moving least squares.
    pub fn safe_sample_width(&mut self) -> f64 {
        if let Some((built, width)) = self.safe_width {
            if built == self.mtime {
                return width;
            }
        }
        let width = safe_sample_width(&self.params, self.sample_width);
        if width > self.sample_width {
            log::debug!("Sample width widened from {} to {width}", self.sample_width);
        }
        self.safe_width = Some((self.mtime, width));
        width
    }

    /// Run the global fit if it is out of date.
    pub fn compute(&mut self) -> Result<&PolynomialFit> {
        let fresh = matches!(&self.global_fit, Some((built, _)) if *built == self.mtime);
        if !fresh {
            log::debug!("Computing global polynomial fit of order {}", self.order);
            let fit = fit_polynomial(&self.params, &self.points, None, self.order)?;
            self.global_fit = Some((self.mtime, fit));
        }
        match &self.global_fit {
            Some((_, fit)) => Ok(fit),
            None => Err(CurveError::InvalidOperation("Global fit missing".into())),
        }
    }

    /// Local fit centred on parameter `t`.
    pub fn compute_local(&mut self, t: f64) -> Result<&PolynomialFit> {
        let fresh = matches!(&self.local_fit, Some(local) if local.input == self.mtime && local.at == t);
        if !fresh {
            let half_width = self.safe_sample_width() / 2.0;
            let weights: Vec<f64> = self
                .params
                .iter()
                .map(|&p| self.weight_function.weight(p - t, half_width))
                .collect();
            let fit = fit_polynomial(&self.params, &self.points, Some(&weights), self.order)?;
            self.local_fit = Some(LocalFit {
                input: self.mtime,
                at: t,
                fit,
            });
        }
        match &self.local_fit {
            Some(local) => Ok(&local.fit),
            None => Err(CurveError::InvalidOperation("Local fit missing".into())),
        }
    }

    fn fit_at(&mut self, t: f64) -> Result<&PolynomialFit> {
        match self.fit_method {
            FitMethod::GlobalLeastSquares => self.compute(),
            FitMethod::MovingLeastSquares => self.compute_local(t),
        }
    }

    /// Order of the most recent fit, after reduction for distinct parameters.
    pub fn effective_order(&self) -> Option<usize> {
        self.last_fit().map(PolynomialFit::order)
    }

    /// Coefficient matrix of the most recent fit, `(order + 1) x 3`.
    pub fn coefficients(&self) -> Option<&DMatrix<f64>> {
        self.last_fit().map(PolynomialFit::coefficients)
    }

    fn last_fit(&self) -> Option<&PolynomialFit> {
        match self.fit_method {
            FitMethod::GlobalLeastSquares => self
                .global_fit
                .as_ref()
                .filter(|(built, _)| *built == self.mtime)
                .map(|(_, fit)| fit),
            FitMethod::MovingLeastSquares => self
                .local_fit
                .as_ref()
                .filter(|local| local.input == self.mtime)
                .map(|local| &local.fit),
        }
    }
}

impl Default for PolynomialApproximation {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracked for PolynomialApproximation {
    fn mtime(&self) -> TimeStamp {
        self.mtime
    }
}

impl Curve for PolynomialApproximation {
    fn point_at(&mut self, t: f64) -> Point3 {
        if self.points.is_empty() {
            return Point3::ZERO;
        }
        match self.fit_at(t) {
            Ok(fit) => fit.evaluate(t),
            Err(err) => {
                log::error!("Polynomial evaluation failed: {err}");
                Point3::ZERO
            }
        }
    }
}
