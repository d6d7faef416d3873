//! C2 interpolating cubic.
//!
//! Unknowns are the first derivatives `D_i` at every distinct node. Interior
//! rows enforce continuity of the second derivative:
//!
//! `h_i D_{i-1} + 2 (h_{i-1} + h_i) D_i + h_{i-1} D_{i+1} = 3 (h_i d_{i-1} + h_{i-1} d_i)`
//!
//! with `h_i` the interval lengths and `d_i` the secant slopes. Open splines
//! close the system with their end conditions, closed splines wrap around.

use nalgebra::{DMatrix, DVector};

use super::{hermite, EndCondition, Nodes};

pub(crate) fn coefficients(nodes: &Nodes<'_>) -> Vec<[f64; 4]> {
    let segments = nodes.segment_count();
    let slopes: Vec<f64> = (0..segments)
        .map(|i| (nodes.values[i + 1] - nodes.values[i]) / nodes.interval(i))
        .collect();

    let derivatives = solve_derivatives(nodes, &slopes).unwrap_or_else(|| {
        log::warn!("Cardinal spline system is singular, falling back to secant derivatives");
        secant_derivatives(nodes, &slopes)
    });

    (0..segments)
        .map(|i| {
            let h = nodes.interval(i);
            let d1 = derivatives[(i + 1) % derivatives.len()];
            hermite(
                nodes.values[i],
                nodes.values[i + 1],
                derivatives[i] * h,
                d1 * h,
            )
        })
        .collect()
}

/// Node derivatives; closed splines return one per distinct node, open
/// splines one per node.
fn solve_derivatives(nodes: &Nodes<'_>, slopes: &[f64]) -> Option<Vec<f64>> {
    let segments = slopes.len();
    let size = if nodes.closed { segments } else { segments + 1 };
    let mut a = DMatrix::<f64>::zeros(size, size);
    let mut b = DVector::<f64>::zeros(size);

    let interior = |a: &mut DMatrix<f64>, b: &mut DVector<f64>, row: usize, prev: usize, next: usize| {
        let h_prev = nodes.interval(prev);
        let h_next = nodes.interval(row % segments);
        a[(row, prev)] += h_next;
        a[(row, row)] += 2.0 * (h_prev + h_next);
        a[(row, next % size)] += h_prev;
        b[row] = 3.0 * (h_next * slopes[prev] + h_prev * slopes[row % segments]);
    };

    if nodes.closed {
        for row in 0..size {
            let prev = (row + size - 1) % size;
            interior(&mut a, &mut b, row, prev, row + 1);
        }
    } else {
        for row in 1..segments {
            interior(&mut a, &mut b, row, row - 1, row + 1);
        }

        let h0 = nodes.interval(0);
        match nodes.left {
            EndCondition::Secant => {
                a[(0, 0)] = 1.0;
                b[0] = slopes[0];
            }
            EndCondition::Derivative(v) => {
                a[(0, 0)] = 1.0;
                b[0] = v;
            }
            EndCondition::SecondDerivative(v) => {
                a[(0, 0)] = 2.0;
                a[(0, 1)] = 1.0;
                b[0] = 3.0 * slopes[0] - v * h0 / 2.0;
            }
        }

        let last = size - 1;
        let hn = nodes.interval(segments - 1);
        match nodes.right {
            EndCondition::Secant => {
                a[(last, last)] = 1.0;
                b[last] = slopes[segments - 1];
            }
            EndCondition::Derivative(v) => {
                a[(last, last)] = 1.0;
                b[last] = v;
            }
            EndCondition::SecondDerivative(v) => {
                a[(last, last - 1)] = 1.0;
                a[(last, last)] = 2.0;
                b[last] = 3.0 * slopes[segments - 1] + v * hn / 2.0;
            }
        }
    }

    let solution = a.lu().solve(&b)?;
    if solution.iter().all(|d| d.is_finite()) {
        Some(solution.iter().copied().collect())
    } else {
        None
    }
}

/// Average of the adjacent secant slopes, one-sided at open ends.
fn secant_derivatives(nodes: &Nodes<'_>, slopes: &[f64]) -> Vec<f64> {
    let segments = slopes.len();
    let size = if nodes.closed { segments } else { segments + 1 };
    (0..size)
        .map(|i| {
            let before = if i > 0 {
                Some(slopes[i - 1])
            } else if nodes.closed {
                Some(slopes[segments - 1])
            } else {
                None
            };
            let after = slopes.get(i).copied();
            match (before, after) {
                (Some(a), Some(b)) => 0.5 * (a + b),
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::Spline;
    use super::*;
    use approx::assert_relative_eq;

    fn derivative(spline: &mut Spline, t: f64) -> f64 {
        let h = 1e-6;
        (spline.evaluate(t + h) - spline.evaluate(t - h)) / (2.0 * h)
    }

    fn second_derivative(spline: &mut Spline, t: f64) -> f64 {
        let h = 1e-4;
        (spline.evaluate(t + h) - 2.0 * spline.evaluate(t) + spline.evaluate(t - h)) / (h * h)
    }

    #[test]
    fn test_reproduces_straight_line() {
        let mut spline = Spline::cardinal();
        for i in 0..5 {
            spline.add_node(i as f64, 2.0 * i as f64 + 1.0);
        }
        assert_relative_eq!(spline.evaluate(1.5), 4.0, epsilon = 1e-12);
        assert_relative_eq!(spline.evaluate(3.25), 7.5, epsilon = 1e-12);
    }

    #[test]
    fn test_second_derivative_continuous_at_interior_nodes() {
        let mut spline = Spline::cardinal();
        for (t, v) in [(0.0, 0.0), (1.0, 2.0), (2.5, -1.0), (3.0, 1.0), (5.0, 0.5)] {
            spline.add_node(t, v);
        }
        for knot in [1.0, 2.5, 3.0] {
            let left = second_derivative(&mut spline, knot - 2e-4);
            let right = second_derivative(&mut spline, knot + 2e-4);
            assert!((left - right).abs() < 0.05, "jump at {knot}: {left} vs {right}");
        }
    }

    #[test]
    fn test_end_conditions() {
        let mut spline = Spline::cardinal();
        for (i, v) in [0.0, 1.0, 0.0, 1.0].iter().enumerate() {
            spline.add_node(i as f64, *v);
        }

        spline.set_end_conditions(EndCondition::Derivative(2.0), EndCondition::Derivative(-3.0));
        assert_relative_eq!(derivative(&mut spline, 1e-5), 2.0, epsilon = 1e-3);
        assert_relative_eq!(derivative(&mut spline, 3.0 - 1e-5), -3.0, epsilon = 1e-3);

        spline.set_end_conditions(
            EndCondition::SecondDerivative(0.0),
            EndCondition::SecondDerivative(0.0),
        );
        assert!(second_derivative(&mut spline, 2e-4).abs() < 0.05);
        assert!(second_derivative(&mut spline, 3.0 - 2e-4).abs() < 0.05);

        spline.set_end_conditions(EndCondition::Secant, EndCondition::Secant);
        assert_relative_eq!(derivative(&mut spline, 1e-5), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_closed_is_periodic() {
        let mut spline = Spline::cardinal();
        for (i, v) in [0.0, 1.0, 0.0, -1.0].iter().enumerate() {
            spline.add_node(i as f64, *v);
        }
        spline.set_closed(true);
        let start = derivative(&mut spline, 1e-5);
        let end = derivative(&mut spline, 4.0 - 1e-5);
        assert_relative_eq!(start, end, epsilon = 1e-3);
    }

    #[test]
    fn test_two_node_closed_system() {
        let mut spline = Spline::cardinal();
        spline.add_node(0.0, 0.0);
        spline.add_node(1.0, 1.0);
        spline.set_closed(true);
        assert_relative_eq!(spline.evaluate(1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(spline.evaluate(2.0), 0.0, epsilon = 1e-12);
    }
}
