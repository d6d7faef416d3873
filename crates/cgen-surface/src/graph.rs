//! Vertex adjacency of a surface mesh and Dijkstra search over it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use cgen_core::traits::Tracked;
use cgen_core::TimeStamp;
use cgen_topology::{SurfaceMesh, VertexId};
use slotmap::SecondaryMap;

use crate::cost::SurfaceCostFunction;

/// Edge as seen from one of its end vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub length: f64,
    /// Mean of the two vertex scalars; vertices without a scalar count as 0.
    pub scalar: f64,
}

/// Dense-indexed undirected edge graph built from a [`SurfaceMesh`].
#[derive(Debug, Clone)]
pub struct SurfaceGraph {
    vertex_ids: Vec<VertexId>,
    index_of: SecondaryMap<VertexId, usize>,
    adjacency: Vec<Vec<Neighbor>>,
    built_from: TimeStamp,
}

impl SurfaceGraph {
    pub fn from_mesh(mesh: &SurfaceMesh) -> Self {
        let vertex_ids: Vec<VertexId> = mesh.vertices.keys().collect();
        let mut index_of = SecondaryMap::with_capacity(vertex_ids.len());
        for (i, &id) in vertex_ids.iter().enumerate() {
            index_of.insert(id, i);
        }

        let mut adjacency = vec![Vec::new(); vertex_ids.len()];
        for edge in mesh.edges.keys() {
            let Some((a, b)) = mesh.edge_vertices(edge) else {
                continue;
            };
            let (Some(&ia), Some(&ib), Some(length)) =
                (index_of.get(a), index_of.get(b), mesh.edge_length(edge))
            else {
                continue;
            };
            let scalar = (mesh.scalar(a).unwrap_or(0.0) + mesh.scalar(b).unwrap_or(0.0)) / 2.0;
            adjacency[ia].push(Neighbor { index: ib, length, scalar });
            adjacency[ib].push(Neighbor { index: ia, length, scalar });
        }

        Self {
            vertex_ids,
            index_of,
            adjacency,
            built_from: mesh.mtime(),
        }
    }

    /// Mesh time stamp the graph was built from.
    pub fn built_from(&self) -> TimeStamp {
        self.built_from
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_ids.len()
    }

    pub fn index_of(&self, vertex: VertexId) -> Option<usize> {
        self.index_of.get(vertex).copied()
    }

    pub fn vertex_id(&self, index: usize) -> Option<VertexId> {
        self.vertex_ids.get(index).copied()
    }

    pub fn neighbors(&self, index: usize) -> &[Neighbor] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cheapest vertex sequence from `start` to `end`, both included.
    ///
    /// The search runs from `end` and stops as soon as `start` is settled, so
    /// following predecessors from `start` yields the path already in
    /// start-to-end order. Returns `None` when `end` is unreachable.
    pub fn shortest_path(
        &self,
        start: usize,
        end: usize,
        cost: SurfaceCostFunction,
    ) -> Option<Vec<usize>> {
        let n = self.vertex_count();
        if start >= n || end >= n {
            return None;
        }
        if start == end {
            return Some(vec![start]);
        }

        let mut distances = vec![f64::INFINITY; n];
        let mut predecessors: Vec<Option<usize>> = vec![None; n];
        let mut settled = vec![false; n];
        distances[end] = 0.0;

        // non-negative f64 bit patterns order like the values
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0.0_f64.to_bits(), end)));

        while let Some(Reverse((dist_bits, u))) = heap.pop() {
            let dist = f64::from_bits(dist_bits);
            if settled[u] || dist > distances[u] {
                continue;
            }
            settled[u] = true;
            if u == start {
                break;
            }

            for neighbor in &self.adjacency[u] {
                let v = neighbor.index;
                let weight = cost.edge_cost(neighbor.length, neighbor.scalar);
                if settled[v] || !weight.is_finite() {
                    continue;
                }
                let candidate = dist + weight;
                if candidate < distances[v] {
                    distances[v] = candidate;
                    predecessors[v] = Some(u);
                    heap.push(Reverse((candidate.to_bits(), v)));
                }
            }
        }

        if !settled[start] {
            return None;
        }

        let mut path = vec![start];
        let mut current = start;
        while let Some(next) = predecessors[current] {
            path.push(next);
            current = next;
        }
        Some(path)
    }
}
