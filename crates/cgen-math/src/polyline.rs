//! Measurements on sampled curves (ordered point sequences).
//!
//! All functions treat the input as an open polyline unless `closed` is set,
//! in which case an implicit segment joins the last point back to the first.

use cgen_core::{CurveError, Result};

use crate::Point3;

/// Result of walking a given arc length along a sampled curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePosition {
    /// Interpolated position on the curve.
    pub position: Point3,
    /// Index of the sample point nearest to `position`.
    pub closest_index: usize,
    /// False if the walk ran off the end of an open curve before covering
    /// the requested distance; `position` is then the clamped end point.
    pub reached: bool,
}

/// Sum of Euclidean distances between consecutive points.
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Length of `count` consecutive points starting at `start`.
///
/// `count == None` measures to the last point. The closing segment of a
/// closed curve is included only when the whole remainder of the curve is
/// requested.
pub fn curve_length(points: &[Point3], closed: bool, start: usize, count: Option<usize>) -> f64 {
    let n = points.len();
    if n < 2 || start >= n {
        return 0.0;
    }

    let mut last = n - 1;
    if let Some(count) = count {
        if count == 0 {
            return 0.0;
        }
        last = last.min(start.saturating_add(count - 1));
    }

    let mut length = polyline_length(&points[start..=last]);
    if closed && count.map_or(true, |c| c >= n) {
        length += points[last].distance(points[0]);
    }
    length
}

/// Length between two sample indices (inclusive), wrapping around on closed
/// curves when `end < start`.
pub fn curve_length_between(points: &[Point3], closed: bool, start: usize, end: usize) -> f64 {
    if start <= end {
        curve_length(points, closed, start, Some(end - start + 1))
    } else {
        curve_length(points, closed, 0, Some(end + 1)) + curve_length(points, closed, start, None)
    }
}

/// Walk `distance` along the curve from sample `start`.
///
/// Negative distances walk backwards. Closed curves wrap around; open curves
/// stop at their ends. Returns `None` for an empty curve, an out-of-range
/// start index, a non-finite distance, or a closed curve of zero length.
pub fn position_along_curve(
    points: &[Point3],
    closed: bool,
    start: usize,
    distance: f64,
) -> Option<CurvePosition> {
    let n = points.len();
    if start >= n || !distance.is_finite() {
        return None;
    }
    if n == 1 || distance == 0.0 {
        return Some(CurvePosition {
            position: points[start],
            closest_index: start,
            reached: distance <= 0.0,
        });
    }

    let step: isize = if distance > 0.0 { 1 } else { -1 };
    let mut remaining = distance.abs();
    if closed {
        let loop_length = curve_length(points, true, 0, None);
        if loop_length <= 0.0 {
            return None;
        }
        // whole turns end where they started
        remaining %= loop_length;
        if remaining == 0.0 {
            return Some(CurvePosition {
                position: points[start],
                closest_index: start,
                reached: true,
            });
        }
    }
    let mut previous = points[start];
    let mut previous_index = start;
    let mut index = start as isize;

    loop {
        index += step;

        if index < 0 || index >= n as isize {
            if !closed {
                let end = if index < 0 { 0 } else { n - 1 };
                return Some(CurvePosition {
                    position: points[end],
                    closest_index: end,
                    reached: false,
                });
            }
            // step lands on the opposite end next iteration
            index = if index < 0 { n as isize } else { -1 };
            continue;
        }

        let next_index = index as usize;
        let next = points[next_index];
        let segment = previous.distance(next);
        remaining -= segment;

        if remaining <= 0.0 {
            let position = next + (next - previous) * (remaining / segment);
            let closest_index = if remaining.abs() <= (remaining + segment).abs() {
                next_index
            } else {
                previous_index
            };
            return Some(CurvePosition {
                position,
                closest_index,
                reached: true,
            });
        }

        previous = next;
        previous_index = next_index;
    }
}

/// Resample a curve with equidistant spacing.
///
/// The last interval is balanced so that it is neither much shorter nor much
/// longer than `spacing`: the end point of an open curve is always kept, and
/// a closed curve does not duplicate its start point.
pub fn resample_points(points: &[Point3], spacing: f64, closed: bool) -> Result<Vec<Point3>> {
    if !(spacing > 0.0) {
        return Err(CurveError::InvalidOperation(format!(
            "Resampling distance must be positive, got {spacing}"
        )));
    }
    let n = points.len();
    if n < 2 {
        return Ok(points.to_vec());
    }

    let mut sampled = vec![points[0]];
    let mut distance_from_last_sample = 0.0;
    let mut remaining = 0.0;
    let mut previous = points[0];
    let mut add_closing_segment = closed;
    let mut index = 0;

    while index < n || add_closing_segment {
        let current = if index >= n {
            add_closing_segment = false;
            points[0]
        } else {
            points[index]
        };
        index += 1;

        let segment = previous.distance(current);
        if segment <= 0.0 {
            continue;
        }
        remaining = distance_from_last_sample + segment;
        if remaining >= spacing {
            let direction = (current - previous) / segment;
            let mut along = spacing - distance_from_last_sample;
            while remaining >= spacing {
                sampled.push(previous + direction * along);
                along += spacing;
                remaining -= spacing;
            }
            distance_from_last_sample = remaining;
        } else {
            distance_from_last_sample += segment;
        }
        previous = current;
    }

    if closed {
        let back_off = if remaining < spacing * 0.5 {
            // last interval too short: drop the last sample
            if sampled.len() > 1 {
                sampled.pop();
            }
            (2.0 * spacing + remaining) / 2.0
        } else {
            (spacing + remaining) / 2.0
        };
        if sampled.len() > 1 {
            if let Some(found) = position_along_curve(points, true, 0, -back_off) {
                if found.reached {
                    if let Some(last) = sampled.last_mut() {
                        *last = found.position;
                    }
                }
            }
        }
    } else {
        let end = points[n - 1];
        if sampled.len() == 1 {
            sampled.push(end);
        } else if remaining > spacing * 0.5 {
            match position_along_curve(points, false, n - 1, -(spacing + remaining) / 2.0) {
                Some(found) if found.reached => {
                    if let Some(last) = sampled.last_mut() {
                        *last = found.position;
                    }
                    sampled.push(end);
                }
                _ => {
                    if let Some(last) = sampled.last_mut() {
                        *last = end;
                    }
                }
            }
        } else if let Some(last) = sampled.last_mut() {
            *last = end;
        }
    }

    Ok(sampled)
}

/// Index of the sample nearest to `position`.
pub fn closest_point_index(points: &[Point3], position: Point3) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.distance_squared(position)
                .total_cmp(&b.distance_squared(position))
        })
        .map(|(i, _)| i)
}

/// Index of the sample farthest from `position`; the first one wins on ties.
pub fn farthest_point_index(points: &[Point3], position: Point3) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance_squared(position);
        if best.map_or(true, |(_, best_d)| d > best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec3;

    fn unit_square() -> Vec<Point3> {
        vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 0.0, 0.0),
            dvec3(1.0, 1.0, 0.0),
            dvec3(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_curve_length_open_and_closed() {
        let pts = unit_square();
        assert_relative_eq!(curve_length(&pts, false, 0, None), 3.0);
        assert_relative_eq!(curve_length(&pts, true, 0, None), 4.0);
        // partial range never includes the closing segment
        assert_relative_eq!(curve_length(&pts, true, 1, Some(2)), 1.0);
        assert_eq!(curve_length(&pts[..1], false, 0, None), 0.0);
    }

    #[test]
    fn test_curve_length_between_wraps() {
        let pts = unit_square();
        assert_relative_eq!(curve_length_between(&pts, true, 1, 3), 2.0);
        // 3 -> 0 -> 1 goes through the closing segment
        assert_relative_eq!(curve_length_between(&pts, true, 3, 1), 2.0);
    }

    #[test]
    fn test_position_along_open_curve() {
        let pts = unit_square();
        let found = position_along_curve(&pts, false, 0, 1.5).unwrap();
        assert!(found.reached);
        assert!((found.position - dvec3(1.0, 0.5, 0.0)).length() < 1e-12);

        let past_end = position_along_curve(&pts, false, 0, 10.0).unwrap();
        assert!(!past_end.reached);
        assert_eq!(past_end.closest_index, 3);
    }

    #[test]
    fn test_position_along_closed_curve_backwards() {
        let pts = unit_square();
        let found = position_along_curve(&pts, true, 0, -0.25).unwrap();
        assert!(found.reached);
        assert!((found.position - dvec3(0.0, 0.25, 0.0)).length() < 1e-12);
        assert_eq!(found.closest_index, 0);
    }

    #[test]
    fn test_position_along_degenerate_closed_curve() {
        let pts = vec![dvec3(1.0, 1.0, 1.0); 3];
        assert!(position_along_curve(&pts, true, 0, 1.0).is_none());
    }

    #[test]
    fn test_position_along_closed_curve_multiple_turns() {
        let pts = unit_square();
        // ten full turns plus 1.5
        let found = position_along_curve(&pts, true, 0, 41.5).unwrap();
        assert!(found.reached);
        assert!((found.position - dvec3(1.0, 0.5, 0.0)).length() < 1e-9);

        let whole = position_along_curve(&pts, true, 2, -8.0).unwrap();
        assert_eq!(whole.position, pts[2]);
        assert_eq!(whole.closest_index, 2);
    }

    #[test]
    fn test_position_along_non_finite_distance() {
        let pts = unit_square();
        for closed in [false, true] {
            for distance in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                assert!(position_along_curve(&pts, closed, 0, distance).is_none());
            }
        }
    }

    #[test]
    fn test_curve_length_huge_count() {
        let pts = unit_square();
        assert_relative_eq!(curve_length(&pts, false, 1, Some(usize::MAX)), 2.0);
        assert_relative_eq!(curve_length(&pts, true, 1, Some(usize::MAX)), 3.0);
    }

    #[test]
    fn test_resample_open_keeps_end_points() {
        let pts = vec![dvec3(0.0, 0.0, 0.0), dvec3(10.0, 0.0, 0.0)];
        let sampled = resample_points(&pts, 2.5, false).unwrap();
        assert_eq!(sampled.len(), 5);
        assert_eq!(sampled[0], pts[0]);
        assert_eq!(*sampled.last().unwrap(), pts[1]);
        for w in sampled.windows(2) {
            assert_relative_eq!(w[0].distance(w[1]), 2.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_resample_closed_square() {
        let sampled = resample_points(&unit_square(), 0.5, true).unwrap();
        // perimeter 4 at spacing 0.5 gives 8 distinct samples
        assert_eq!(sampled.len(), 8);
        assert_eq!(sampled[0], dvec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_resample_rejects_bad_spacing() {
        assert!(resample_points(&unit_square(), 0.0, false).is_err());
    }

    #[test]
    fn test_closest_and_farthest() {
        let pts = unit_square();
        assert_eq!(closest_point_index(&pts, dvec3(0.9, 1.2, 0.0)), Some(2));
        assert_eq!(farthest_point_index(&pts, dvec3(0.1, 0.1, 0.0)), Some(2));
        assert_eq!(closest_point_index(&[], Point3::ZERO), None);
    }
}
