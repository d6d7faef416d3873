use cgen_core::error::{CurveError, Result};
use cgen_core::traits::Tracked;
use cgen_core::TimeStamp;
use cgen_math::Point3;
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};

use super::types::*;

/// Surface mesh that surface-constrained curves are routed on.
///
/// Half-edge connectivity plus an optional per-vertex scalar field used to
/// weight edge traversal costs. Every mutation refreshes the mesh time stamp
/// so cached search structures built from it can detect staleness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub vertices: SlotMap<VertexId, Vertex>,
    pub halfedges: SlotMap<HalfEdgeId, HalfEdge>,
    pub edges: SlotMap<EdgeId, Edge>,
    pub faces: SlotMap<FaceId, Face>,
    outgoing: SecondaryMap<VertexId, Vec<HalfEdgeId>>,
    scalars: SecondaryMap<VertexId, f64>,
    mtime: TimeStamp,
}

impl SurfaceMesh {
    pub fn new() -> Self {
        Self {
            vertices: SlotMap::with_key(),
            halfedges: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            outgoing: SecondaryMap::new(),
            scalars: SecondaryMap::new(),
            mtime: TimeStamp::now(),
        }
    }

    /// Build a mesh from an indexed triangle list.
    ///
    /// Returns the mesh and the vertex ids in the order of `positions`.
    pub fn from_triangles(
        positions: &[Point3],
        triangles: &[[u32; 3]],
    ) -> Result<(Self, Vec<VertexId>)> {
        let mut mesh = Self::new();
        let ids: Vec<VertexId> = positions.iter().map(|&p| mesh.add_vertex(p)).collect();
        for tri in triangles {
            let mut corners = [VertexId::default(); 3];
            for (corner, &index) in corners.iter_mut().zip(tri) {
                *corner = *ids.get(index as usize).ok_or_else(|| {
                    CurveError::NotFound(format!(
                        "Triangle references vertex {} but only {} exist",
                        index,
                        ids.len()
                    ))
                })?;
            }
            mesh.make_triangle(corners[0], corners[1], corners[2])?;
        }
        Ok((mesh, ids))
    }

    pub fn add_vertex(&mut self, position: Point3) -> VertexId {
        let id = self.vertices.insert(Vertex {
            position,
            halfedge: None,
        });
        self.outgoing.insert(id, Vec::new());
        self.mtime.modified();
        id
    }

    /// Create an edge between two vertices, returning the EdgeId.
    /// Creates two half-edges (twins) and links them.
    pub fn make_edge(&mut self, v1: VertexId, v2: VertexId) -> Result<EdgeId> {
        if !self.vertices.contains_key(v1) || !self.vertices.contains_key(v2) {
            return Err(CurveError::NotFound("Vertex not found".into()));
        }
        if v1 == v2 {
            return Err(CurveError::Topology("Edge endpoints must differ".into()));
        }

        let he_a = self.halfedges.insert(HalfEdge {
            origin: v1,
            twin: None,
            next: None,
            prev: None,
            face: None,
            edge: None,
        });

        let he_b = self.halfedges.insert(HalfEdge {
            origin: v2,
            twin: Some(he_a),
            next: None,
            prev: None,
            face: None,
            edge: None,
        });

        self.halfedges[he_a].twin = Some(he_b);

        let edge_id = self.edges.insert(Edge {
            halfedge_a: he_a,
            halfedge_b: he_b,
        });

        self.halfedges[he_a].edge = Some(edge_id);
        self.halfedges[he_b].edge = Some(edge_id);

        if let Some(list) = self.outgoing.get_mut(v1) {
            list.push(he_a);
        }
        if let Some(list) = self.outgoing.get_mut(v2) {
            list.push(he_b);
        }

        // Set outgoing half-edge for vertices if not set
        if self.vertices[v1].halfedge.is_none() {
            self.vertices[v1].halfedge = Some(he_a);
        }
        if self.vertices[v2].halfedge.is_none() {
            self.vertices[v2].halfedge = Some(he_b);
        }

        self.mtime.modified();
        Ok(edge_id)
    }

    /// Create a face from an ordered list of vertices (CCW winding).
    /// Reuses existing edges/half-edges where possible.
    pub fn make_face(&mut self, vertices: &[VertexId]) -> Result<FaceId> {
        let n = vertices.len();
        if n < 3 {
            return Err(CurveError::Topology(
                "A face requires at least 3 vertices".into(),
            ));
        }

        for &v in vertices {
            if !self.vertices.contains_key(v) {
                return Err(CurveError::NotFound("Vertex not found".into()));
            }
        }

        let mut face_halfedges = Vec::with_capacity(n);
        for i in 0..n {
            let v_from = vertices[i];
            let v_to = vertices[(i + 1) % n];

            let he_id = match self.find_halfedge(v_from, v_to) {
                Some(he_id) => he_id,
                None => {
                    let edge_id = self.make_edge(v_from, v_to)?;
                    self.edges[edge_id].halfedge_a
                }
            };
            if self.halfedges[he_id].face.is_some() {
                return Err(CurveError::Topology(
                    "Half-edge already belongs to a face (non-manifold)".into(),
                ));
            }
            face_halfedges.push(he_id);
        }

        let face_id = self.faces.insert(Face {
            halfedge: face_halfedges[0],
        });

        // Link half-edges: next/prev chain + face assignment
        for i in 0..n {
            let he = face_halfedges[i];
            let next_he = face_halfedges[(i + 1) % n];
            let prev_he = face_halfedges[(n + i - 1) % n];

            self.halfedges[he].next = Some(next_he);
            self.halfedges[he].prev = Some(prev_he);
            self.halfedges[he].face = Some(face_id);
        }

        self.mtime.modified();
        Ok(face_id)
    }

    /// Convenience: create a triangular face.
    pub fn make_triangle(&mut self, v1: VertexId, v2: VertexId, v3: VertexId) -> Result<FaceId> {
        self.make_face(&[v1, v2, v3])
    }

    /// Find a half-edge going from `origin` to `target`.
    pub fn find_halfedge(&self, origin: VertexId, target: VertexId) -> Option<HalfEdgeId> {
        self.outgoing
            .get(origin)?
            .iter()
            .copied()
            .find(|&he_id| self.halfedge_target(he_id) == Some(target))
    }

    /// Get the target (destination) vertex of a half-edge.
    pub fn halfedge_target(&self, he_id: HalfEdgeId) -> Option<VertexId> {
        let he = self.halfedges.get(he_id)?;
        let twin_id = he.twin?;
        let twin = self.halfedges.get(twin_id)?;
        Some(twin.origin)
    }

    /// Vertices sharing an edge with `vertex`.
    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.outgoing
            .get(vertex)
            .into_iter()
            .flatten()
            .filter_map(move |&he_id| self.halfedge_target(he_id))
    }

    /// Both end vertices of an edge.
    pub fn edge_vertices(&self, edge_id: EdgeId) -> Option<(VertexId, VertexId)> {
        let edge = self.edges.get(edge_id)?;
        let a = self.halfedges.get(edge.halfedge_a)?.origin;
        let b = self.halfedges.get(edge.halfedge_b)?.origin;
        Some((a, b))
    }

    /// Euclidean length of an edge.
    pub fn edge_length(&self, edge_id: EdgeId) -> Option<f64> {
        let (a, b) = self.edge_vertices(edge_id)?;
        Some(self.vertices.get(a)?.position.distance(self.vertices.get(b)?.position))
    }

    pub fn position(&self, vertex: VertexId) -> Option<Point3> {
        self.vertices.get(vertex).map(|v| v.position)
    }

    /// Assign the scalar used by weighted traversal costs.
    pub fn set_scalar(&mut self, vertex: VertexId, value: f64) -> Result<()> {
        if !self.vertices.contains_key(vertex) {
            return Err(CurveError::NotFound("Vertex not found".into()));
        }
        self.scalars.insert(vertex, value);
        self.mtime.modified();
        Ok(())
    }

    pub fn scalar(&self, vertex: VertexId) -> Option<f64> {
        self.scalars.get(vertex).copied()
    }

    /// True if any vertex carries a scalar value.
    pub fn has_scalars(&self) -> bool {
        !self.scalars.is_empty()
    }
}

impl Tracked for SurfaceMesh {
    fn mtime(&self) -> TimeStamp {
        self.mtime
    }
}

impl Default for SurfaceMesh {
    fn default() -> Self {
        Self::new()
    }
}
