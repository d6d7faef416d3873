pub mod polyline;

pub use glam::{dvec3, DVec3};
pub use polyline::{
    closest_point_index, curve_length, curve_length_between, farthest_point_index,
    polyline_length, position_along_curve, resample_points, CurvePosition,
};

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
