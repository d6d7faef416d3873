//! Three axis splines driven by one curve parameter.

use cgen_math::{Point3, Vector3};

use super::Curve;
use crate::spline::{EndCondition, Spline, SplineKind};

/// 3D curve through a sequence of points, one [`Spline`] per axis.
///
/// Node `i` sits at spline parameter `i`; the curve parameter `u` in
/// `[0, 1]` maps to `u * (N - 1)` for an open curve and `u * N` for a
/// closed one, where the extra unit is the wrap-around segment.
#[derive(Debug, Clone)]
pub struct ParametricSpline {
    axes: [Spline; 3],
    points: Vec<Point3>,
    closed: bool,
    copy_nearest_end_derivatives: bool,
}

impl ParametricSpline {
    pub fn new(kind: SplineKind) -> Self {
        Self {
            axes: [Spline::new(kind), Spline::new(kind), Spline::new(kind)],
            points: Vec::new(),
            closed: false,
            copy_nearest_end_derivatives: false,
        }
    }

    pub fn kind(&self) -> SplineKind {
        self.axes[0].kind()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Replace all nodes with `points`, in order.
    pub fn set_points(&mut self, points: &[Point3]) {
        self.points = points.to_vec();
        for (axis, spline) in self.axes.iter_mut().enumerate() {
            spline.remove_all_nodes();
            for (i, p) in points.iter().enumerate() {
                spline.add_node(i as f64, p[axis]);
            }
        }
        self.apply_end_conditions();
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
        for spline in &mut self.axes {
            spline.set_closed(closed);
        }
    }

    /// Pin both end derivatives to the nearest finite difference instead of
    /// the default end condition of the spline kind.
    pub fn set_copy_nearest_end_derivatives(&mut self, enabled: bool) {
        self.copy_nearest_end_derivatives = enabled;
        self.apply_end_conditions();
    }

    pub fn copy_nearest_end_derivatives(&self) -> bool {
        self.copy_nearest_end_derivatives
    }

    fn apply_end_conditions(&mut self) {
        let n = self.points.len();
        let (start, end) = if self.copy_nearest_end_derivatives && n >= 2 {
            (
                Some(self.points[1] - self.points[0]),
                Some(self.points[n - 1] - self.points[n - 2]),
            )
        } else {
            (None, None)
        };
        let default_end = self.kind().default_end_condition();

        for (axis, spline) in self.axes.iter_mut().enumerate() {
            let conditions = match (start, end) {
                (Some(start), Some(end)) => (
                    EndCondition::Derivative(start[axis]),
                    EndCondition::Derivative(end[axis]),
                ),
                _ => (default_end, default_end),
            };
            spline.set_end_conditions(conditions.0, conditions.1);
        }
    }

    fn spline_parameter(&self, u: f64) -> f64 {
        let n = self.points.len();
        let span = if self.closed { n } else { n.saturating_sub(1) };
        u.clamp(0.0, 1.0) * span as f64
    }

    /// Derivative with respect to the curve parameter, by central difference.
    pub fn tangent_at(&mut self, u: f64) -> Vector3 {
        let h = 1e-6;
        let a = (u - h).max(0.0);
        let b = (u + h).min(1.0);
        if b <= a {
            return Vector3::ZERO;
        }
        (self.point_at(b) - self.point_at(a)) / (b - a)
    }
}

impl Curve for ParametricSpline {
    fn point_at(&mut self, u: f64) -> Point3 {
        let t = self.spline_parameter(u);
        let [x, y, z] = &mut self.axes;
        Point3::new(x.evaluate(t), y.evaluate(t), z.evaluate(t))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::KochanekParams;
    use approx::assert_relative_eq;
    use cgen_math::dvec3;

    fn square() -> Vec<Point3> {
        vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 0.0, 0.0),
            dvec3(1.0, 1.0, 0.0),
            dvec3(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_linear_open_hits_points() {
        let mut curve = ParametricSpline::new(SplineKind::Linear);
        curve.set_points(&square());
        assert_eq!(curve.point_at(0.0), dvec3(0.0, 0.0, 0.0));
        assert!((curve.point_at(1.0 / 3.0) - dvec3(1.0, 0.0, 0.0)).length() < 1e-12);
        assert_eq!(curve.point_at(1.0), dvec3(0.0, 1.0, 0.0));
        assert!((curve.point_at(0.5) - dvec3(1.0, 0.5, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_linear_closed_wraps() {
        let mut curve = ParametricSpline::new(SplineKind::Linear);
        curve.set_points(&square());
        curve.set_closed(true);
        assert!(curve.is_closed());
        assert!((curve.point_at(0.875) - dvec3(0.0, 0.5, 0.0)).length() < 1e-12);
        assert!((curve.point_at(1.0) - dvec3(0.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_sample_uniform() {
        let mut curve = ParametricSpline::new(SplineKind::Cardinal);
        curve.set_points(&square());
        let samples = curve.sample_uniform(7);
        assert_eq!(samples.len(), 7);
        assert!((samples[0] - square()[0]).length() < 1e-12);
        assert!((samples[6] - square()[3]).length() < 1e-12);
        assert!(curve.sample_uniform(0).is_empty());
    }

    #[test]
    fn test_copy_nearest_end_derivatives() {
        let points = vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 2.0, 0.0),
            dvec3(2.0, 0.0, 0.0),
        ];
        let mut curve = ParametricSpline::new(SplineKind::Kochanek(KochanekParams::default()));
        curve.set_points(&points);
        curve.set_copy_nearest_end_derivatives(true);

        // du = 1 / 2 per node, so the tangent doubles the finite difference
        let start = curve.tangent_at(0.0);
        assert_relative_eq!(start.x, 2.0, epsilon = 1e-3);
        assert_relative_eq!(start.y, 4.0, epsilon = 1e-3);

        curve.set_copy_nearest_end_derivatives(false);
        let natural = curve.tangent_at(0.0);
        assert!((natural - start).length() > 1e-2);
    }

    #[test]
    fn test_single_point() {
        let mut curve = ParametricSpline::new(SplineKind::Cardinal);
        curve.set_points(&[dvec3(1.0, 2.0, 3.0)]);
        assert_eq!(curve.point_at(0.7), dvec3(1.0, 2.0, 3.0));
    }
}
