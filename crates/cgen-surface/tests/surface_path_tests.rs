use approx::assert_relative_eq;
use cgen_math::{dvec3, Point3};
use cgen_surface::{SurfaceCostFunction, SurfacePathFinder};
use cgen_topology::{SurfaceMesh, VertexId};

/// `n x n` vertex grid in the xy plane with unit spacing.
fn grid(n: u32) -> (SurfaceMesh, Vec<VertexId>) {
    let positions: Vec<Point3> = (0..n * n)
        .map(|i| dvec3((i % n) as f64, (i / n) as f64, 0.0))
        .collect();
    let mut triangles = Vec::new();
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let v = row * n + col;
            triangles.push([v, v + 1, v + n + 1]);
            triangles.push([v, v + n + 1, v + n]);
        }
    }
    SurfaceMesh::from_triangles(&positions, &triangles).unwrap()
}

#[test]
fn test_path_along_grid_row() {
    let (mesh, ids) = grid(5);
    let mut finder = SurfacePathFinder::default();
    let path = finder
        .find_path(&mesh, dvec3(0.0, 0.0, 0.0), dvec3(4.0, 0.0, 0.0))
        .unwrap();
    assert_eq!(path.vertices, ids[0..5].to_vec());
    assert_relative_eq!(path.length, 4.0);
}

#[test]
fn test_path_lies_on_mesh_vertices() {
    let (mesh, _) = grid(6);
    let mut finder = SurfacePathFinder::default();
    let path = finder
        .find_path(&mesh, dvec3(0.2, 4.7, 0.5), dvec3(5.0, 0.1, -0.5))
        .unwrap();
    for (&v, &p) in path.vertices.iter().zip(&path.points) {
        assert_eq!(mesh.position(v), Some(p));
    }
    for w in path.vertices.windows(2) {
        assert!(mesh.find_halfedge(w[0], w[1]).is_some());
    }
}

#[test]
fn test_inverse_cost_prefers_high_scalar_band() {
    let (mut mesh, ids) = grid(5);
    // row y = 2 is cheap, everything else expensive
    for (i, &id) in ids.iter().enumerate() {
        let scalar = if i / 5 == 2 { 10.0 } else { 0.5 };
        mesh.set_scalar(id, scalar).unwrap();
    }
    let mut finder = SurfacePathFinder::new(SurfaceCostFunction::Inverse);
    let path = finder
        .find_path(&mesh, dvec3(0.0, 2.0, 0.0), dvec3(4.0, 2.0, 0.0))
        .unwrap();
    assert!(path.points.iter().all(|p| p.y == 2.0));

    // with distance cost the direct row is also optimal but scalars are ignored
    finder.set_cost_function(SurfaceCostFunction::Distance);
    let plain = finder
        .find_path(&mesh, dvec3(0.0, 2.0, 0.0), dvec3(4.0, 2.0, 0.0))
        .unwrap();
    assert_relative_eq!(plain.length, 4.0);
}

#[test]
fn test_looped_surface_curve() {
    let (mesh, _) = grid(4);
    let mut finder = SurfacePathFinder::default();
    let controls = [
        dvec3(0.0, 0.0, 0.0),
        dvec3(3.0, 0.0, 0.0),
        dvec3(3.0, 3.0, 0.0),
        dvec3(0.0, 3.0, 0.0),
    ];
    let curve = finder.find_curve(&mesh, &controls, true);
    assert_eq!(curve.control_point_indices.len(), 4);
    assert_eq!(curve.control_point_indices[0], 0);
    assert_eq!(curve.points[curve.control_point_indices[1]], controls[1]);
    assert_eq!(curve.points[curve.control_point_indices[2]], controls[2]);
    assert_eq!(curve.points[curve.control_point_indices[3]], controls[3]);
    assert_eq!(curve.points.last(), Some(&controls[0]));
    assert_relative_eq!(curve.length, 12.0);
}

#[test]
fn test_unreachable_segments_keep_the_rest_of_the_curve() {
    let (mut mesh, _) = grid(3);
    let island = dvec3(10.0, 10.0, 0.0);
    mesh.add_vertex(island);

    let mut finder = SurfacePathFinder::default();
    let controls = [dvec3(0.0, 0.0, 0.0), island, dvec3(2.0, 0.0, 0.0), dvec3(2.0, 1.0, 0.0)];
    let curve = finder.find_curve(&mesh, &controls, false);

    // only the last segment can be routed
    assert_eq!(curve.points, vec![dvec3(2.0, 0.0, 0.0), dvec3(2.0, 1.0, 0.0)]);
    assert_relative_eq!(curve.length, 1.0);
    assert_eq!(curve.control_point_indices.len(), controls.len());
    assert!(curve.control_point_indices.windows(2).all(|w| w[0] <= w[1]));
    assert!(curve.control_point_indices.iter().all(|&i| i < curve.points.len()));
}

#[test]
fn test_unreachable_middle_segment_in_loop() {
    let (mut mesh, _) = grid(3);
    let island = dvec3(10.0, 10.0, 0.0);
    mesh.add_vertex(island);

    let mut finder = SurfacePathFinder::default();
    let controls = [dvec3(0.0, 0.0, 0.0), dvec3(2.0, 0.0, 0.0), island, dvec3(0.0, 2.0, 0.0)];
    let curve = finder.find_curve(&mesh, &controls, true);

    // bottom row out, left column back; the island segments add nothing
    assert_eq!(curve.points.first(), Some(&dvec3(0.0, 0.0, 0.0)));
    assert_eq!(curve.points.last(), Some(&dvec3(0.0, 0.0, 0.0)));
    assert!(curve.points.contains(&dvec3(2.0, 0.0, 0.0)));
    assert!(curve.points.contains(&dvec3(0.0, 2.0, 0.0)));
    assert!(!curve.points.contains(&island));
    assert_eq!(curve.control_point_indices.len(), controls.len());
    assert!(curve.control_point_indices.windows(2).all(|w| w[0] <= w[1]));
}
