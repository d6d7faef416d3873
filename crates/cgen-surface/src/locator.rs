//! Nearest mesh vertex lookup (k-d tree).

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use cgen_core::TimeStamp;
use cgen_core::traits::Tracked;
use cgen_math::Point3;
use cgen_topology::{SurfaceMesh, VertexId};
use kiddo::{KdTree, SquaredEuclidean};

/// Result of a nearest-vertex query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMatch {
    pub vertex: VertexId,
    pub position: Point3,
    /// Euclidean distance to the query point
    pub distance: f64,
}

/// Read-only spatial index over the vertices of a [`SurfaceMesh`].
///
/// Coincident vertices share one tree entry. The representative is the first
/// one with an incident edge, or the first one if none has edges. Vertices
/// with non-finite coordinates are not indexed.
#[derive(Debug, Clone)]
pub struct PointLocator {
    tree: KdTree<f64, 3>,
    vertex_ids: Vec<VertexId>,
    positions: Vec<Point3>,
    built_from: TimeStamp,
}

/// Exact position key; `-0.0` and `0.0` map to the same key.
fn position_key(p: Point3) -> [u64; 3] {
    (p + Point3::ZERO).to_array().map(f64::to_bits)
}

impl PointLocator {
    pub fn from_mesh(mesh: &SurfaceMesh) -> Self {
        let mut slot_of: HashMap<[u64; 3], usize> = HashMap::new();
        let mut vertex_ids: Vec<VertexId> = Vec::new();
        let mut positions: Vec<Point3> = Vec::new();

        for (id, vertex) in &mesh.vertices {
            if !vertex.position.is_finite() {
                continue;
            }
            match slot_of.entry(position_key(vertex.position)) {
                Entry::Vacant(entry) => {
                    entry.insert(vertex_ids.len());
                    vertex_ids.push(id);
                    positions.push(vertex.position);
                }
                Entry::Occupied(entry) => {
                    let slot = *entry.get();
                    let isolated = mesh
                        .vertices
                        .get(vertex_ids[slot])
                        .map_or(true, |v| v.halfedge.is_none());
                    if isolated && vertex.halfedge.is_some() {
                        vertex_ids[slot] = id;
                    }
                }
            }
        }
        if vertex_ids.len() < mesh.vertices.len() {
            log::debug!(
                "Indexed {} distinct positions for {} mesh vertices",
                vertex_ids.len(),
                mesh.vertices.len()
            );
        }

        let entries: Vec<[f64; 3]> = positions.iter().map(|p| p.to_array()).collect();
        let tree: KdTree<f64, 3> = (&entries).into();

        Self {
            tree,
            vertex_ids,
            positions,
            built_from: mesh.mtime(),
        }
    }

    /// Mesh time stamp the index was built from.
    pub fn built_from(&self) -> TimeStamp {
        self.built_from
    }

    /// Number of distinct indexed positions.
    pub fn len(&self) -> usize {
        self.vertex_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_ids.is_empty()
    }

    /// Vertex nearest to `query`.
    pub fn nearest(&self, query: Point3) -> Option<VertexMatch> {
        if self.is_empty() {
            return None;
        }
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&query.to_array());
        let index = result.item as usize;
        Some(VertexMatch {
            vertex: *self.vertex_ids.get(index)?,
            position: *self.positions.get(index)?,
            distance: result.distance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgen_math::dvec3;

    #[test]
    fn test_nearest_vertex() {
        let mut mesh = SurfaceMesh::new();
        let a = mesh.add_vertex(dvec3(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(dvec3(10.0, 0.0, 0.0));
        let c = mesh.add_vertex(dvec3(4.0, 3.0, 0.0));
        let locator = PointLocator::from_mesh(&mesh);

        assert_eq!(locator.len(), 3);
        let found = locator.nearest(dvec3(3.9, 2.9, 0.1)).unwrap();
        assert_eq!(found.vertex, c);
        assert!(found.distance < 0.2);
        assert_eq!(locator.nearest(dvec3(-1.0, 0.0, 0.0)).unwrap().vertex, a);
        assert_eq!(locator.nearest(dvec3(9.0, 1.0, 0.0)).unwrap().vertex, b);
    }

    #[test]
    fn test_exact_hit_has_zero_distance() {
        let mut mesh = SurfaceMesh::new();
        mesh.add_vertex(dvec3(1.0, 2.0, 3.0));
        let locator = PointLocator::from_mesh(&mesh);
        let found = locator.nearest(dvec3(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(found.distance, 0.0);
        assert_eq!(found.position, dvec3(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_coincident_vertices_share_an_entry() {
        let mut mesh = SurfaceMesh::new();
        for _ in 0..40 {
            mesh.add_vertex(dvec3(1.0, 1.0, 1.0));
        }
        let a = mesh.add_vertex(dvec3(-0.0, 0.0, 0.0));
        let b = mesh.add_vertex(dvec3(0.0, 0.0, 0.0));
        let c = mesh.add_vertex(dvec3(1.0, 1.0, 1.0));
        let far = mesh.add_vertex(dvec3(5.0, 0.0, 0.0));
        mesh.make_edge(c, far).unwrap();
        mesh.make_edge(b, far).unwrap();

        let locator = PointLocator::from_mesh(&mesh);
        assert_eq!(locator.len(), 3);
        // the connected copy represents its position
        let found = locator.nearest(dvec3(1.0, 1.1, 1.0)).unwrap();
        assert_eq!(found.vertex, c);
        assert_eq!(locator.nearest(Point3::ZERO).unwrap().vertex, b);
        assert_ne!(locator.nearest(Point3::ZERO).unwrap().vertex, a);
    }

    #[test]
    fn test_non_finite_positions_are_skipped() {
        let mut mesh = SurfaceMesh::new();
        mesh.add_vertex(dvec3(f64::NAN, 0.0, 0.0));
        let ok = mesh.add_vertex(dvec3(2.0, 0.0, 0.0));
        let locator = PointLocator::from_mesh(&mesh);
        assert_eq!(locator.len(), 1);
        assert_eq!(locator.nearest(Point3::ZERO).unwrap().vertex, ok);
    }

    #[test]
    fn test_empty_mesh() {
        let locator = PointLocator::from_mesh(&SurfaceMesh::new());
        assert!(locator.is_empty());
        assert!(locator.nearest(Point3::ZERO).is_none());
    }

    #[test]
    fn test_tracks_mesh_stamp() {
        let mut mesh = SurfaceMesh::new();
        mesh.add_vertex(Point3::ZERO);
        let locator = PointLocator::from_mesh(&mesh);
        assert_eq!(locator.built_from(), mesh.mtime());
        mesh.add_vertex(Point3::ONE);
        assert_ne!(locator.built_from(), mesh.mtime());
    }
}
