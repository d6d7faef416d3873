//! Piecewise linear segments.

use super::Nodes;

pub(crate) fn coefficients(nodes: &Nodes<'_>) -> Vec<[f64; 4]> {
    nodes
        .values
        .windows(2)
        .map(|w| [w[0], w[1] - w[0], 0.0, 0.0])
        .collect()
}
