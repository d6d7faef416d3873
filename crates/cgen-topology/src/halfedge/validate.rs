//! Structural checks run before a mesh is used for routing.

use cgen_core::error::{CurveError, Result};
use cgen_core::traits::Validate;

use super::mesh::SurfaceMesh;

impl Validate for SurfaceMesh {
    fn validate(&self) -> Result<()> {
        self.check_vertices()?;
        self.check_twins()?;
        self.check_face_loops()
    }
}

fn invalid(message: String) -> CurveError {
    CurveError::Topology(message)
}

impl SurfaceMesh {
    /// Positions and scalars must be finite.
    fn check_vertices(&self) -> Result<()> {
        for (id, vertex) in &self.vertices {
            if !vertex.position.is_finite() {
                return Err(invalid(format!(
                    "Vertex {id:?} has non-finite position {}",
                    vertex.position
                )));
            }
            if let Some(value) = self.scalar(id).filter(|v| !v.is_finite()) {
                return Err(invalid(format!("Vertex {id:?} carries a non-finite scalar {value}")));
            }
        }
        Ok(())
    }

    /// Twins point back at each other and start at opposite ends, and every
    /// edge owns a twin pair.
    fn check_twins(&self) -> Result<()> {
        for (he_id, he) in &self.halfedges {
            let Some(twin_id) = he.twin else { continue };
            let paired = self
                .halfedges
                .get(twin_id)
                .is_some_and(|twin| twin.twin == Some(he_id) && twin.origin != he.origin);
            if !paired {
                return Err(invalid(format!("Half-edges {he_id:?} and {twin_id:?} are not twins")));
            }
        }

        for (edge_id, edge) in &self.edges {
            let points_to = |from, to| self.halfedges.get(from).is_some_and(|h| h.twin == Some(to));
            if !points_to(edge.halfedge_a, edge.halfedge_b) || !points_to(edge.halfedge_b, edge.halfedge_a) {
                return Err(invalid(format!("Edge {edge_id:?} does not own a twin pair")));
            }
        }
        Ok(())
    }

    /// Every face loop closes after at least three sides, with consistent
    /// `next`/`prev` links and face assignment.
    fn check_face_loops(&self) -> Result<()> {
        for (face_id, face) in &self.faces {
            let mut current = face.halfedge;
            let mut sides = 0usize;
            loop {
                let next = self
                    .halfedges
                    .get(current)
                    .filter(|he| he.face == Some(face_id))
                    .and_then(|he| he.next)
                    .ok_or_else(|| invalid(format!("Face {face_id:?} loop breaks at {current:?}")))?;
                if self.halfedges.get(next).and_then(|he| he.prev) != Some(current) {
                    return Err(invalid(format!("Half-edge {next:?} does not link back to {current:?}")));
                }

                sides += 1;
                if sides > self.halfedges.len() {
                    return Err(invalid(format!("Face {face_id:?} loop does not close")));
                }
                current = next;
                if current == face.halfedge {
                    break;
                }
            }
            if sides < 3 {
                return Err(invalid(format!("Face {face_id:?} has only {sides} sides")));
            }
        }
        Ok(())
    }
}
