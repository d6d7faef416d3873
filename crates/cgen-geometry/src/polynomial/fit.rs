//! Weighted polynomial least squares.

use cgen_core::{CurveError, Result, Tolerance};
use cgen_math::Point3;
use nalgebra::DMatrix;

/// Highest order fitted; the monomial basis is badly conditioned beyond it.
pub const MAX_POLYNOMIAL_ORDER: usize = 6;

/// Weights at or below this do not count as contributing samples.
const WEIGHT_EPSILON: f64 = 1e-12;

/// Singular values below this are treated as zero in the SVD solve.
const SVD_EPSILON: f64 = 1e-12;

/// Coefficients of one polynomial per axis, `sum c_i * t^i`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    /// `(order + 1) x 3`, row `i` holds the `t^i` coefficient of x, y and z.
    coefficients: DMatrix<f64>,
}

impl PolynomialFit {
    pub fn constant(point: Point3) -> Self {
        Self {
            coefficients: DMatrix::from_row_slice(1, 3, &[point.x, point.y, point.z]),
        }
    }

    pub fn order(&self) -> usize {
        self.coefficients.nrows() - 1
    }

    pub fn coefficients(&self) -> &DMatrix<f64> {
        &self.coefficients
    }

    pub fn evaluate(&self, t: f64) -> Point3 {
        let mut result = [0.0; 3];
        for (axis, value) in result.iter_mut().enumerate() {
            *value = self
                .coefficients
                .column(axis)
                .iter()
                .rev()
                .fold(0.0, |acc, &c| acc * t + c);
        }
        Point3::from_array(result)
    }
}

/// `order` if it can be fitted stably, otherwise a
/// [`CurveError::NumericalInstability`].
pub fn check_order(order: usize) -> Result<usize> {
    if order > MAX_POLYNOMIAL_ORDER {
        return Err(CurveError::NumericalInstability(format!(
            "polynomial order {order} exceeds {MAX_POLYNOMIAL_ORDER}"
        )));
    }
    Ok(order)
}

/// Fit a polynomial of at most `order` through `(params[i], points[i])`.
///
/// `weights` scale both the design row and the target row of each sample;
/// `None` weighs every sample equally. The order is reduced to one less than
/// the number of distinct parameters among samples with non-zero weight. If
/// every weight vanishes, or the solve fails, the fit degrades to a constant.
pub fn fit_polynomial(
    params: &[f64],
    points: &[Point3],
    weights: Option<&[f64]>,
    order: usize,
) -> Result<PolynomialFit> {
    if params.len() != points.len() || weights.is_some_and(|w| w.len() != params.len()) {
        return Err(CurveError::InvalidOperation(format!(
            "Polynomial fit input sizes differ: {} parameters, {} points, {} weights",
            params.len(),
            points.len(),
            weights.map_or(params.len(), <[f64]>::len)
        )));
    }
    if points.is_empty() {
        return Err(CurveError::InsufficientData(
            "Polynomial fit needs at least one sample".into(),
        ));
    }

    let weight_of = |i: usize| weights.map_or(1.0, |w| w[i]);
    let active: Vec<usize> = (0..params.len())
        .filter(|&i| weight_of(i) > WEIGHT_EPSILON)
        .collect();
    if active.is_empty() {
        log::debug!("All polynomial fit weights vanish, using the unweighted mean");
        return Ok(PolynomialFit::constant(mean(points.iter().map(|&p| (p, 1.0)))));
    }

    let distinct = count_distinct(active.iter().map(|&i| params[i]));
    let order = order.min(MAX_POLYNOMIAL_ORDER).min(distinct - 1);
    let weighted_mean = || mean(active.iter().map(|&i| (points[i], weight_of(i))));
    if order == 0 {
        return Ok(PolynomialFit::constant(weighted_mean()));
    }

    let rows = active.len();
    let design = DMatrix::from_fn(rows, order + 1, |r, c| {
        let i = active[r];
        params[i].powi(c as i32) * weight_of(i)
    });
    let targets = DMatrix::from_fn(rows, 3, |r, c| {
        let i = active[r];
        points[i][c] * weight_of(i)
    });

    match design.svd(true, true).solve(&targets, SVD_EPSILON) {
        Ok(coefficients) if coefficients.iter().all(|c| c.is_finite()) => {
            Ok(PolynomialFit { coefficients })
        }
        Ok(_) | Err(_) => {
            log::warn!("Polynomial least squares solve failed for order {order}, using the weighted mean");
            Ok(PolynomialFit::constant(weighted_mean()))
        }
    }
}

fn count_distinct(values: impl Iterator<Item = f64>) -> usize {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);
    let tol = Tolerance::default();
    sorted.dedup_by(|a, b| tol.param_eq(*a, *b));
    sorted.len()
}

fn mean(samples: impl Iterator<Item = (Point3, f64)>) -> Point3 {
    let (sum, total) = samples.fold((Point3::ZERO, 0.0), |(sum, total), (p, w)| {
        (sum + p * w, total + w)
    });
    if total > 0.0 {
        sum / total
    } else {
        Point3::ZERO
    }
}
