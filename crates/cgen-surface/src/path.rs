//! Shortest paths between points on a surface mesh.

use cgen_core::traits::{Tracked, Validate};
use cgen_core::{CurveError, Result};
use cgen_math::{polyline_length, Point3};
use cgen_topology::{SurfaceMesh, VertexId};

use crate::cost::SurfaceCostFunction;
use crate::graph::SurfaceGraph;
use crate::locator::{PointLocator, VertexMatch};

/// Vertex path along mesh edges.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePath {
    pub vertices: Vec<VertexId>,
    pub points: Vec<Point3>,
    /// Geometric length of the path, independent of the cost function.
    pub length: f64,
}

/// Concatenated paths through a sequence of control points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceCurve {
    pub points: Vec<Point3>,
    /// For each control point, the index of its snapped vertex in `points`.
    /// Non-decreasing.
    pub control_point_indices: Vec<usize>,
    pub length: f64,
}

/// Routes paths over a mesh, caching the locator and edge graph until the
/// mesh changes.
#[derive(Debug, Clone, Default)]
pub struct SurfacePathFinder {
    cost_function: SurfaceCostFunction,
    locator: Option<PointLocator>,
    graph: Option<SurfaceGraph>,
}

impl SurfacePathFinder {
    pub fn new(cost_function: SurfaceCostFunction) -> Self {
        Self {
            cost_function,
            locator: None,
            graph: None,
        }
    }

    pub fn cost_function(&self) -> SurfaceCostFunction {
        self.cost_function
    }

    pub fn set_cost_function(&mut self, cost_function: SurfaceCostFunction) {
        self.cost_function = cost_function;
    }

    /// Rebuild the locator and graph if they were built from another mesh
    /// state. A mesh that fails validation is rejected before anything is
    /// rebuilt.
    fn refresh(&mut self, mesh: &SurfaceMesh) -> Result<(&PointLocator, &SurfaceGraph)> {
        let stamp = mesh.mtime();
        let locator = self.locator.take().filter(|l| l.built_from() == stamp);
        let graph = self.graph.take().filter(|g| g.built_from() == stamp);
        if locator.is_none() || graph.is_none() {
            mesh.validate()?;
        }

        let locator = locator.unwrap_or_else(|| {
            log::debug!("Building surface point locator for mesh {stamp}");
            PointLocator::from_mesh(mesh)
        });
        let graph = graph.unwrap_or_else(|| {
            log::debug!("Building surface edge graph for mesh {stamp}");
            SurfaceGraph::from_mesh(mesh)
        });
        let locator: &PointLocator = self.locator.insert(locator);
        let graph: &SurfaceGraph = self.graph.insert(graph);
        Ok((locator, graph))
    }

    /// Cost function to use on `mesh`; weighted costs need a scalar field.
    fn effective_cost(&self, mesh: &SurfaceMesh) -> SurfaceCostFunction {
        if self.cost_function.uses_scalars() && !mesh.has_scalars() {
            log::warn!(
                "Cost function {} needs vertex scalars but the mesh has none, using distance",
                self.cost_function
            );
            SurfaceCostFunction::Distance
        } else {
            self.cost_function
        }
    }

    /// Nearest mesh vertex to `point`, `None` for an empty or invalid mesh.
    pub fn snap(&mut self, mesh: &SurfaceMesh, point: Point3) -> Option<VertexMatch> {
        match self.refresh(mesh) {
            Ok((locator, _)) => locator.nearest(point),
            Err(err) => {
                log::warn!("Cannot snap to surface: {err}");
                None
            }
        }
    }

    /// Cheapest edge path between two vertices.
    pub fn find_vertex_path(
        &mut self,
        mesh: &SurfaceMesh,
        start: VertexId,
        end: VertexId,
    ) -> Result<SurfacePath> {
        let cost = self.effective_cost(mesh);
        let (_, graph) = self.refresh(mesh)?;
        let (Some(from), Some(to)) = (graph.index_of(start), graph.index_of(end)) else {
            return Err(CurveError::NotFound("Path end vertex is not in the mesh".into()));
        };
        let indices = graph.shortest_path(from, to, cost).ok_or_else(|| {
            CurveError::TopologyUnreachable(format!(
                "No surface path between {start:?} and {end:?}"
            ))
        })?;

        let vertices: Vec<VertexId> = indices.iter().filter_map(|&i| graph.vertex_id(i)).collect();
        let points: Vec<Point3> = vertices.iter().filter_map(|&v| mesh.position(v)).collect();
        let length = polyline_length(&points);
        Ok(SurfacePath {
            vertices,
            points,
            length,
        })
    }

    /// Snap both points to the mesh and find the cheapest path between them.
    pub fn find_path(&mut self, mesh: &SurfaceMesh, start: Point3, end: Point3) -> Result<SurfacePath> {
        let (locator, _) = self.refresh(mesh)?;
        let (Some(from), Some(to)) = (locator.nearest(start), locator.nearest(end)) else {
            return Err(CurveError::NotFound("Mesh has no vertices".into()));
        };
        self.find_vertex_path(mesh, from.vertex, to.vertex)
    }

    /// Join consecutive control points (and the last back to the first when
    /// `closed`) with surface paths.
    ///
    /// The shared vertex between two segments appears once. A segment that
    /// cannot be routed is logged and skipped; the rest of the curve is kept.
    pub fn find_curve(
        &mut self,
        mesh: &SurfaceMesh,
        control_points: &[Point3],
        closed: bool,
    ) -> SurfaceCurve {
        let n = control_points.len();
        if n < 2 {
            return SurfaceCurve::default();
        }

        let segments = if closed { n } else { n - 1 };
        let mut points: Vec<Point3> = Vec::new();
        let mut last_vertex: Option<VertexId> = None;
        let mut control_point_indices = Vec::with_capacity(n);

        for i in 0..segments {
            let start = control_points[i];
            let end = control_points[(i + 1) % n];
            match self.find_path(mesh, start, end) {
                Ok(path) => {
                    let joined = last_vertex.is_some() && last_vertex == path.vertices.first().copied();
                    if joined {
                        control_point_indices.push(points.len() - 1);
                        points.extend_from_slice(&path.points[1..]);
                    } else {
                        control_point_indices.push(points.len());
                        points.extend_from_slice(&path.points);
                    }
                    last_vertex = path.vertices.last().copied();
                }
                Err(err) => {
                    log::warn!("Surface segment {i} skipped: {err}");
                    control_point_indices.push(points.len().saturating_sub(1));
                }
            }
        }
        if !closed {
            control_point_indices.push(points.len().saturating_sub(1));
        }

        let length = polyline_length(&points);
        SurfaceCurve {
            points,
            control_point_indices,
            length,
        }
    }
}
