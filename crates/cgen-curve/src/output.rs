//! Generated curve.

use cgen_core::Result;
use cgen_math::{
    closest_point_index, curve_length, curve_length_between, farthest_point_index,
    polyline_length, position_along_curve, resample_points, CurvePosition, Point3,
};

/// Sampled curve with its connectivity and control point lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputCurve {
    points: Vec<Point3>,
    length: f64,
    closed: bool,
    /// Point indices of the single polyline cell; a closed loop repeats the
    /// first index at the end.
    lines: Vec<usize>,
    /// Sample index of each control point, non-decreasing. Empty for
    /// models that do not pass through their control points.
    control_point_indices: Vec<usize>,
    control_points: Vec<Point3>,
}

impl OutputCurve {
    /// Replace the samples. Connectivity is rebuilt only when the point count
    /// or the loop flag changes.
    pub(crate) fn set_points(&mut self, points: Vec<Point3>, closed: bool) {
        let rebuild = points.len() != self.points.len() || closed != self.closed;
        self.length = polyline_length(&points);
        self.points = points;
        self.closed = closed;
        if rebuild {
            log::debug!("Rebuilding curve connectivity for {} points", self.points.len());
            self.lines = (0..self.points.len()).collect();
            if self.is_loop() {
                self.lines.push(0);
            }
        }
    }

    pub(crate) fn set_control_points(&mut self, control_points: &[Point3], indices: Vec<usize>) {
        self.control_points = control_points.to_vec();
        self.control_point_indices = indices;
    }

    pub(crate) fn clear(&mut self) {
        self.set_points(Vec::new(), self.closed);
        self.set_control_points(&[], Vec::new());
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of distances between consecutive samples.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    /// True when the connectivity closes back on the first point, which
    /// needs at least three samples.
    pub fn is_loop(&self) -> bool {
        self.closed && self.points.len() >= 3
    }

    pub fn control_point_indices(&self) -> &[usize] {
        &self.control_point_indices
    }

    /// Control point that owns sample `sample`: the last control point whose
    /// sample index is not after it.
    pub fn control_point_index_for_sample(&self, sample: usize) -> Option<usize> {
        if sample >= self.points.len() || self.control_point_indices.is_empty() {
            return None;
        }
        self.control_point_indices
            .partition_point(|&index| index <= sample)
            .checked_sub(1)
    }

    /// Sample index of control point `index`; the nearest sample for curves
    /// that only approximate their control points.
    pub fn curve_point_index_from_control_point(&self, index: usize) -> Option<usize> {
        if let Some(&sample) = self.control_point_indices.get(index) {
            return Some(sample);
        }
        let position = *self.control_points.get(index)?;
        closest_point_index(&self.points, position)
    }

    /// Length of `count` samples starting at `start`; `None` runs to the end
    /// (and around the loop for closed curves).
    pub fn curve_length(&self, start: usize, count: Option<usize>) -> f64 {
        curve_length(&self.points, self.is_loop(), start, count)
    }

    pub fn curve_length_between(&self, start: usize, end: usize) -> f64 {
        curve_length_between(&self.points, self.is_loop(), start, end)
    }

    pub fn position_along_curve(&self, start: usize, distance: f64) -> Option<CurvePosition> {
        position_along_curve(&self.points, self.is_loop(), start, distance)
    }

    pub fn resample(&self, spacing: f64) -> Result<Vec<Point3>> {
        resample_points(&self.points, spacing, self.is_loop())
    }

    pub fn closest_point_index(&self, position: Point3) -> Option<usize> {
        closest_point_index(&self.points, position)
    }

    pub fn farthest_point_index(&self, position: Point3) -> Option<usize> {
        farthest_point_index(&self.points, position)
    }
}
