//! Curve trait and the 3-axis parametric spline.

mod parametric;

use cgen_math::Point3;

pub use parametric::ParametricSpline;

/// Parametric curve in 3D space.
///
/// Evaluation takes `&mut self` because implementors rebuild cached
/// coefficients lazily on the first evaluation after a change.
pub trait Curve {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&mut self, t: f64) -> Point3;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    /// Whether the curve is closed (start == end).
    fn is_closed(&self) -> bool {
        false
    }

    /// `count` samples evenly spaced over the domain, both ends included.
    fn sample_uniform(&mut self, count: usize) -> Vec<Point3> {
        let (t0, t1) = self.domain();
        match count {
            0 => Vec::new(),
            1 => vec![self.point_at(t0)],
            _ => {
                let step = (t1 - t0) / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        let t = if i == count - 1 { t1 } else { t0 + step * i as f64 };
                        self.point_at(t)
                    })
                    .collect()
            }
        }
    }
}
