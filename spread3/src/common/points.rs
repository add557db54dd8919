//! Common operations on f64 points in D-dimensional space.

use crate::errors::SpreadError;
use parry3d_f64::na::{Point, SVector};

/// Returns the distance between two points in D-dimensional space. This is the single distance
/// predicate used throughout the crate, so that the range index and a brute-force filter always
/// agree on which points are in range.
///
/// # Arguments
///
/// * `a`: the first point
/// * `b`: the second point
///
/// returns: f64
///
/// # Examples
///
/// ```
/// use spread3::common::points::dist;
/// use spread3::Point3;
/// let a = Point3::new(1.0, 2.0, 0.0);
/// let b = Point3::new(3.0, 2.0, 0.0);
/// let d = dist(&a, &b);
/// assert_eq!(d, 2.0);
/// ```
pub fn dist<const D: usize>(a: &Point<f64, D>, b: &Point<f64, D>) -> f64 {
    (a - b).norm()
}

/// Returns the mean point of a set of points in D-dimensional space.  The mean is found by summing
/// the coordinates of all points and dividing by the number of points.  There is no weighting of
/// the points in this calculation.
///
/// An empty slice has no mean; the result in that case contains NaN coordinates, so callers
/// should check for emptiness first.
///
/// # Examples
///
/// ```
/// use spread3::common::points::mean_point;
/// use spread3::Point3;
/// let points = vec![Point3::new(1.0, 2.0, 0.0), Point3::new(3.0, 4.0, 2.0)];
/// let mean = mean_point(&points);
/// assert_eq!(mean, Point3::new(2.0, 3.0, 1.0));
/// ```
pub fn mean_point<const D: usize>(points: &[Point<f64, D>]) -> Point<f64, D> {
    let mut sum = SVector::<f64, D>::zeros();
    for p in points {
        sum += p.coords;
    }
    Point::<f64, D>::from(sum / points.len() as f64)
}

/// Returns true if every coordinate of the point is finite.
pub fn is_finite<const D: usize>(p: &Point<f64, D>) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

/// Verify that every point in the slice has finite coordinates, returning an
/// `InvalidParameter` error naming the offending index and the role of the slice otherwise.
///
/// # Arguments
///
/// * `points`: the points to check
/// * `what`: a short name for the slice (e.g. "candidates") used in the error message
///
/// returns: Result<(), SpreadError>
pub fn check_finite<const D: usize>(
    points: &[Point<f64, D>],
    what: &str,
) -> Result<(), SpreadError> {
    match points.iter().position(|p| !is_finite(p)) {
        Some(i) => Err(SpreadError::invalid(format!(
            "{}[{}] has a non-finite coordinate",
            what, i
        ))),
        None => Ok(()),
    }
}
