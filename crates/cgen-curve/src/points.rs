//! Control point input.

use cgen_core::traits::Tracked;
use cgen_core::{CurveError, Result, TimeStamp};
use cgen_math::Point3;

/// Ordered control points with a modification stamp.
///
/// Every edit refreshes the stamp, which is how a [`crate::CurveGenerator`]
/// notices that its cached curve is stale.
#[derive(Debug, Clone, Default)]
pub struct ControlPoints {
    points: Vec<Point3>,
    mtime: TimeStamp,
}

impl ControlPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    pub fn push(&mut self, point: Point3) {
        self.points.push(point);
        self.mtime.modified();
    }

    pub fn insert(&mut self, index: usize, point: Point3) -> Result<()> {
        if index > self.points.len() {
            return Err(self.out_of_range(index));
        }
        self.points.insert(index, point);
        self.mtime.modified();
        Ok(())
    }

    pub fn set(&mut self, index: usize, point: Point3) -> Result<()> {
        if index >= self.points.len() {
            return Err(self.out_of_range(index));
        }
        if self.points[index] != point {
            self.points[index] = point;
            self.mtime.modified();
        }
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Point3> {
        if index >= self.points.len() {
            return Err(self.out_of_range(index));
        }
        let removed = self.points.remove(index);
        self.mtime.modified();
        Ok(removed)
    }

    /// Replace all points.
    pub fn set_points(&mut self, points: Vec<Point3>) {
        self.points = points;
        self.mtime.modified();
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.mtime.modified();
    }

    fn out_of_range(&self, index: usize) -> CurveError {
        CurveError::NotFound(format!(
            "Control point {index} out of range for {} points",
            self.points.len()
        ))
    }
}

impl Tracked for ControlPoints {
    fn mtime(&self) -> TimeStamp {
        self.mtime
    }
}

impl From<Vec<Point3>> for ControlPoints {
    fn from(points: Vec<Point3>) -> Self {
        Self {
            points,
            mtime: TimeStamp::now(),
        }
    }
}

impl FromIterator<Point3> for ControlPoints {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
