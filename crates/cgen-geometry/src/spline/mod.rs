//! One-dimensional interpolating splines.
//!
//! A [`Spline`] maps a parameter to a scalar through a sorted set of
//! `(parameter, value)` nodes. Three variants share the node, end condition
//! and evaluation machinery and differ only in how per-segment coefficients
//! are derived:
//!
//! * [`SplineKind::Linear`]: piecewise linear.
//! * [`SplineKind::Cardinal`]: C2 cubic through all nodes.
//! * [`SplineKind::Kochanek`]: Kochanek–Bartels cubic with bias, tension and
//!   continuity.
//!
//! Every segment is stored as a cubic in the local coordinate
//! `s = (t - t_i) / (t_{i+1} - t_i)`, so evaluation is the same for all kinds.

mod cardinal;
mod kochanek;
mod linear;

use cgen_core::{CurveError, Result, TimeStamp};
use serde::{Deserialize, Serialize};

/// How the derivative at the first or last node of an open spline is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EndCondition {
    /// Slope of the line through the two nodes nearest to the end.
    Secant,
    /// Prescribed first derivative (per unit parameter).
    Derivative(f64),
    /// Prescribed second derivative; `SecondDerivative(0.0)` is the natural end.
    SecondDerivative(f64),
}

impl Default for EndCondition {
    fn default() -> Self {
        EndCondition::Secant
    }
}

/// Kochanek–Bartels shape controls, each in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KochanekParams {
    pub bias: f64,
    pub tension: f64,
    pub continuity: f64,
}

impl KochanekParams {
    pub fn new(bias: f64, tension: f64, continuity: f64) -> Self {
        Self {
            bias: bias.clamp(-1.0, 1.0),
            tension: tension.clamp(-1.0, 1.0),
            continuity: continuity.clamp(-1.0, 1.0),
        }
    }
}

/// Spline variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SplineKind {
    Linear,
    Cardinal,
    Kochanek(KochanekParams),
}

impl SplineKind {
    /// Kochanek splines default to natural ends, the other kinds to secant ends.
    ///
    /// A Kochanek end tangent taken as the plain slope of the two nearest
    /// nodes ignores the tension, bias and continuity of the neighbouring
    /// node, so the first and last segments bend differently from the
    /// interior. The natural end derives the end tangent from that node's
    /// tangent with zero curvature at the end instead. Use
    /// [`EndCondition::Derivative`] (or copy-nearest end derivatives on a
    /// parametric spline) to pin the finite difference slope.
    pub fn default_end_condition(self) -> EndCondition {
        match self {
            SplineKind::Kochanek(_) => EndCondition::SecondDerivative(0.0),
            _ => EndCondition::Secant,
        }
    }
}

/// Node layout handed to the per-kind coefficient builders.
///
/// For closed splines `values`/`knots` already contain the synthesized
/// wrap-around node, so there is one segment per consecutive pair.
pub(crate) struct Nodes<'a> {
    pub knots: &'a [f64],
    pub values: &'a [f64],
    pub closed: bool,
    pub left: EndCondition,
    pub right: EndCondition,
}

impl Nodes<'_> {
    pub fn segment_count(&self) -> usize {
        self.knots.len() - 1
    }

    pub fn interval(&self, segment: usize) -> f64 {
        self.knots[segment + 1] - self.knots[segment]
    }
}

/// Cubic Hermite segment in local `s`, from end values and end tangents that
/// are already scaled to the segment length.
pub(crate) fn hermite(p0: f64, p1: f64, m0: f64, m1: f64) -> [f64; 4] {
    [
        p0,
        m0,
        3.0 * (p1 - p0) - 2.0 * m0 - m1,
        2.0 * (p0 - p1) + m0 + m1,
    ]
}

/// Scalar spline over sorted `(parameter, value)` nodes.
///
/// Coefficients are rebuilt lazily: any node or setting change refreshes the
/// spline's time stamp and the next [`Spline::evaluate`] recomputes.
#[derive(Debug, Clone)]
pub struct Spline {
    kind: SplineKind,
    closed: bool,
    left: EndCondition,
    right: EndCondition,
    nodes: Vec<(f64, f64)>,
    mtime: TimeStamp,
    knots: Vec<f64>,
    coefficients: Vec<[f64; 4]>,
    compute_time: TimeStamp,
}

impl Spline {
    pub fn new(kind: SplineKind) -> Self {
        let end = kind.default_end_condition();
        Self {
            kind,
            closed: false,
            left: end,
            right: end,
            nodes: Vec::new(),
            mtime: TimeStamp::now(),
            knots: Vec::new(),
            coefficients: Vec::new(),
            compute_time: TimeStamp::NEVER,
        }
    }

    pub fn linear() -> Self {
        Self::new(SplineKind::Linear)
    }

    pub fn cardinal() -> Self {
        Self::new(SplineKind::Cardinal)
    }

    pub fn kochanek(params: KochanekParams) -> Self {
        Self::new(SplineKind::Kochanek(params))
    }

    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        if self.closed != closed {
            self.closed = closed;
            self.mtime.modified();
        }
    }

    pub fn set_end_conditions(&mut self, left: EndCondition, right: EndCondition) {
        if self.left != left || self.right != right {
            self.left = left;
            self.right = right;
            self.mtime.modified();
        }
    }

    pub fn end_conditions(&self) -> (EndCondition, EndCondition) {
        (self.left, self.right)
    }

    /// Add a node, replacing the value of an existing node at the same parameter.
    pub fn add_node(&mut self, t: f64, value: f64) {
        match self.nodes.binary_search_by(|(nt, _)| nt.total_cmp(&t)) {
            Ok(i) => self.nodes[i].1 = value,
            Err(i) => self.nodes.insert(i, (t, value)),
        }
        self.mtime.modified();
    }

    pub fn remove_all_nodes(&mut self) {
        self.nodes.clear();
        self.mtime.modified();
    }

    pub fn nodes(&self) -> &[(f64, f64)] {
        &self.nodes
    }

    /// Parameter range covered by evaluation, including the wrap-around
    /// interval of a closed spline.
    pub fn parametric_range(&self) -> Option<(f64, f64)> {
        let first = self.nodes.first()?.0;
        let last = self.nodes.last()?.0;
        if self.closed && self.nodes.len() > 1 {
            Some((first, last + 1.0))
        } else {
            Some((first, last))
        }
    }

    fn needs_compute(&self) -> bool {
        self.compute_time < self.mtime
    }

    /// Rebuild segment coefficients from the nodes.
    ///
    /// With fewer than two nodes there is nothing to fit: the coefficients
    /// are cleared and evaluation falls back to the nearest node.
    pub fn compute(&mut self) -> Result<()> {
        self.compute_time = TimeStamp::now();
        self.knots.clear();
        self.coefficients.clear();

        if self.nodes.len() < 2 {
            let err = CurveError::InsufficientData(format!(
                "spline fit needs at least 2 nodes, got {}",
                self.nodes.len()
            ));
            log::error!("{err}");
            return Err(err);
        }

        let mut knots: Vec<f64> = self.nodes.iter().map(|&(t, _)| t).collect();
        let mut values: Vec<f64> = self.nodes.iter().map(|&(_, v)| v).collect();
        if self.closed {
            knots.push(knots[knots.len() - 1] + 1.0);
            values.push(values[0]);
        }

        let nodes = Nodes {
            knots: &knots,
            values: &values,
            closed: self.closed,
            left: self.left,
            right: self.right,
        };
        self.coefficients = match self.kind {
            SplineKind::Linear => linear::coefficients(&nodes),
            SplineKind::Cardinal => cardinal::coefficients(&nodes),
            SplineKind::Kochanek(params) => kochanek::coefficients(&nodes, params),
        };
        self.knots = knots;
        Ok(())
    }

    /// Value at parameter `t`, clamped to the parametric range.
    pub fn evaluate(&mut self, t: f64) -> f64 {
        match self.nodes.len() {
            0 => return 0.0,
            1 => return self.nodes[0].1,
            _ => {}
        }
        if self.needs_compute() {
            // a failed compute already logged; fall through to nearest node
            let _ = self.compute();
        }
        if self.coefficients.is_empty() {
            return self.nearest_node_value(t);
        }

        let last_knot = self.knots.len() - 1;
        let t = t.clamp(self.knots[0], self.knots[last_knot]);
        let segment = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(self.coefficients.len() - 1);
        let s = (t - self.knots[segment]) / (self.knots[segment + 1] - self.knots[segment]);
        let [c0, c1, c2, c3] = self.coefficients[segment];
        ((c3 * s + c2) * s + c1) * s + c0
    }

    fn nearest_node_value(&self, t: f64) -> f64 {
        self.nodes
            .iter()
            .min_by(|a, b| (a.0 - t).abs().total_cmp(&(b.0 - t).abs()))
            .map_or(0.0, |&(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn with_nodes(mut spline: Spline, values: &[f64]) -> Spline {
        for (i, &v) in values.iter().enumerate() {
            spline.add_node(i as f64, v);
        }
        spline
    }

    #[test]
    fn test_empty_and_single_node() {
        let mut empty = Spline::cardinal();
        assert_eq!(empty.evaluate(0.3), 0.0);

        let mut single = with_nodes(Spline::linear(), &[4.5]);
        assert_eq!(single.evaluate(-10.0), 4.5);
        assert_eq!(single.evaluate(10.0), 4.5);
    }

    #[test]
    fn test_compute_with_one_node_fails_softly() {
        let mut spline = with_nodes(Spline::kochanek(KochanekParams::default()), &[2.0]);
        assert!(matches!(spline.compute(), Err(CurveError::InsufficientData(_))));
        assert_eq!(spline.evaluate(0.0), 2.0);
    }

    #[test]
    fn test_add_node_replaces_same_parameter() {
        let mut spline = with_nodes(Spline::linear(), &[0.0, 1.0]);
        spline.add_node(1.0, 3.0);
        assert_eq!(spline.nodes().len(), 2);
        assert_relative_eq!(spline.evaluate(1.0), 3.0);
    }

    #[test]
    fn test_evaluate_clamps_parameter() {
        let mut spline = with_nodes(Spline::cardinal(), &[1.0, 2.0, 0.0]);
        assert_relative_eq!(spline.evaluate(-5.0), 1.0);
        assert_relative_eq!(spline.evaluate(5.0), 0.0);
    }

    #[test]
    fn test_all_kinds_interpolate_nodes() {
        let values = [0.0, 2.0, -1.0, 3.0, 3.5];
        let kinds = [
            SplineKind::Linear,
            SplineKind::Cardinal,
            SplineKind::Kochanek(KochanekParams::new(0.3, -0.2, 0.5)),
        ];
        for kind in kinds {
            for closed in [false, true] {
                let mut spline = with_nodes(Spline::new(kind), &values);
                spline.set_closed(closed);
                for (i, &v) in values.iter().enumerate() {
                    assert_relative_eq!(spline.evaluate(i as f64), v, epsilon = 1e-10);
                }
                if closed {
                    // wrap-around node repeats the first value one unit later
                    assert_relative_eq!(spline.evaluate(5.0), values[0], epsilon = 1e-10);
                    assert_eq!(spline.parametric_range(), Some((0.0, 5.0)));
                }
            }
        }
    }

    #[test]
    fn test_recompute_after_node_change() {
        let mut spline = with_nodes(Spline::linear(), &[0.0, 1.0]);
        assert_relative_eq!(spline.evaluate(0.5), 0.5);
        spline.add_node(1.0, 3.0);
        assert_relative_eq!(spline.evaluate(0.5), 1.5);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = with_nodes(Spline::cardinal(), &[0.0, 1.0, 0.0]);
        let mut copy = original.clone();
        original.add_node(1.0, 5.0);
        assert_relative_eq!(copy.evaluate(1.0), 1.0);
        assert_relative_eq!(original.evaluate(1.0), 5.0);
    }
}
