//! Curve parameters for control points.
//!
//! Polynomial fitting needs a parameter per sample. Points already in
//! traversal order are parameterized by index; unordered clouds can instead
//! be projected onto the trunk of their minimum spanning tree.

use cgen_core::named_variant_str;
use cgen_core::traits::NamedVariant;
use cgen_core::{CurveError, Result, Tolerance};
use cgen_math::Point3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointSortingMethod {
    #[default]
    Indices,
    MinimumSpanningTreePosition,
}

impl NamedVariant for PointSortingMethod {
    const KIND: &'static str = "point sorting method";
    const VARIANTS: &'static [Self] = &[
        PointSortingMethod::Indices,
        PointSortingMethod::MinimumSpanningTreePosition,
    ];

    fn as_str(self) -> &'static str {
        match self {
            PointSortingMethod::Indices => "indices",
            PointSortingMethod::MinimumSpanningTreePosition => "minimumSpanningTreePosition",
        }
    }
}

named_variant_str!(PointSortingMethod);

impl PointSortingMethod {
    pub fn parameters(self, points: &[Point3]) -> Result<Vec<f64>> {
        match self {
            PointSortingMethod::Indices => Ok(sort_by_index(points.len())),
            PointSortingMethod::MinimumSpanningTreePosition => {
                sort_by_minimum_spanning_tree_position(points)
            }
        }
    }
}

/// `i / (count - 1)` for every index; a single point gets 0.
pub fn sort_by_index(count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![0.0; count];
    }
    let last = (count - 1) as f64;
    (0..count).map(|i| i as f64 / last).collect()
}

/// Parameters from the minimum spanning tree of the complete distance graph.
///
/// The tree is grown from one end of the point set's diameter. The path from
/// the other diameter end back to the root is the trunk; trunk points get
/// their normalized arc length from the root, every other point inherits the
/// parameter of the trunk point its branch hangs off.
pub fn sort_by_minimum_spanning_tree_position(points: &[Point3]) -> Result<Vec<f64>> {
    let n = points.len();
    if n < 2 {
        return Err(CurveError::InsufficientData(format!(
            "Minimum spanning tree sorting needs at least 2 points, got {n}"
        )));
    }

    let distance = |a: usize, b: usize| points[a].distance(points[b]);

    let (mut start, mut end, mut diameter) = (0, 0, -1.0);
    for v in 0..n {
        for u in 0..n {
            let d = distance(v, u);
            if d > diameter {
                diameter = d;
                start = v;
                end = u;
            }
        }
    }

    let parent = prim(n, start, distance);

    let mut trunk = vec![end];
    let mut current = end;
    while let Some(p) = parent[current] {
        trunk.push(p);
        current = p;
    }
    trunk.reverse();

    let mut cumulative = Vec::with_capacity(trunk.len());
    let mut length = 0.0;
    for (i, &v) in trunk.iter().enumerate() {
        if i > 0 {
            length += distance(trunk[i - 1], v);
        }
        cumulative.push(length);
    }
    if Tolerance::default().is_zero(length) {
        let err = CurveError::InsufficientData(
            "Minimum spanning tree trunk has zero length".into(),
        );
        log::warn!("{err}");
        return Err(err);
    }

    let mut params: Vec<Option<f64>> = vec![None; n];
    for (&v, &along) in trunk.iter().zip(&cumulative) {
        params[v] = Some(along / length);
    }

    for v in 0..n {
        if params[v].is_some() {
            continue;
        }
        let mut branch = vec![v];
        let mut current = v;
        let inherited = loop {
            match parent[current] {
                Some(p) => match params[p] {
                    Some(value) => break value,
                    None => {
                        branch.push(p);
                        current = p;
                    }
                },
                // unreachable for a spanning tree rooted on the trunk
                None => break 0.0,
            }
        };
        for b in branch {
            params[b] = Some(inherited);
        }
    }

    Ok(params.into_iter().map(|p| p.unwrap_or(0.0)).collect())
}

/// Parent links of a minimum spanning tree over the complete graph on
/// `n` vertices, grown from `root` (which has no parent).
fn prim(n: usize, root: usize, distance: impl Fn(usize, usize) -> f64) -> Vec<Option<usize>> {
    let mut key = vec![f64::INFINITY; n];
    let mut parent = vec![None; n];
    let mut in_tree = vec![false; n];
    key[root] = 0.0;

    for _ in 0..n {
        let next = (0..n)
            .filter(|&v| !in_tree[v])
            .min_by(|&a, &b| key[a].total_cmp(&key[b]));
        let Some(u) = next else { break };
        in_tree[u] = true;
        for v in 0..n {
            if in_tree[v] {
                continue;
            }
            let d = distance(u, v);
            if d < key[v] {
                key[v] = d;
                parent[v] = Some(u);
            }
        }
    }
    parent
}
