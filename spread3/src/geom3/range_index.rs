//! A static spatial index answering "which points lie within this sphere" queries.
//!
//! The index wraps an immutable kiddo k-d tree over the input points. The tree is asked for a
//! slightly enlarged sphere and every point it returns is then tested against the exact distance
//! predicate, so the results are identical to a brute-force scan regardless of how the tree
//! rounds its squared distances or whether it treats the boundary as inclusive.

use crate::common::points::{check_finite, dist, is_finite};
use crate::errors::SpreadError;
use crate::{Aabb3, Point3};
use kiddo::SquaredEuclidean;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use log::{debug, trace};

pub type KdTree3 = ImmutableKdTree<f64, u64, 3, 32>;

/// Relative enlargement of the squared radius handed to the tree, far larger than the rounding
/// error of a three term sum of squares.
const SEARCH_SLACK: f64 = 1e-9;

/// A point paired with its position in the sequence the index was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentifiedPoint {
    pub id: usize,
    pub point: Point3,
}

/// An immutable index over a set of 3D points, identified by their position in the input.
///
/// Build the index once with [`SpatialRangeIndex::build`] and issue as many queries against it
/// as needed. The index is never modified after construction and can be shared between threads.
#[derive(Debug, Clone)]
pub struct SpatialRangeIndex {
    points: Vec<Point3>,

    /// `None` for an empty index
    tree: Option<KdTree3>,
    aabb: Option<Aabb3>,
}

impl SpatialRangeIndex {
    /// Build an index over the given points. Each point is identified by its position in the
    /// slice. Duplicate points are allowed and each keeps its own identifier.
    ///
    /// # Arguments
    ///
    /// * `points`: the points to index, which must all have finite coordinates
    ///
    /// returns: Result<SpatialRangeIndex, SpreadError>
    ///
    /// # Examples
    ///
    /// ```
    /// use spread3::{Point3, SpatialRangeIndex};
    /// let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)];
    /// let index = SpatialRangeIndex::build(&points).unwrap();
    /// let found = index.query_sphere(&Point3::new(1.0, 0.0, 0.0), 2.0).unwrap();
    /// assert_eq!(found, vec![0]);
    /// ```
    pub fn build(points: &[Point3]) -> Result<Self, SpreadError> {
        check_finite(points, "points")?;

        let (tree, aabb) = if points.is_empty() {
            (None, None)
        } else {
            let coords = points.iter().map(|p| [p.x, p.y, p.z]).collect::<Vec<_>>();
            (
                Some(KdTree3::new_from_slice(&coords)),
                Some(Aabb3::from_points(points)),
            )
        };

        debug!("built range index over {} points", points.len());

        Ok(Self {
            points: points.to_vec(),
            tree,
            aabb,
        })
    }

    /// The number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Retrieve an indexed point by its identifier, or `None` if no point has that identifier.
    pub fn point(&self, id: usize) -> Option<Point3> {
        self.points.get(id).copied()
    }

    /// The indexed points in identifier order.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Iterate over the indexed points paired with their identifiers.
    pub fn entries(&self) -> impl Iterator<Item = IdentifiedPoint> {
        self.points
            .iter()
            .enumerate()
            .map(|(id, point)| IdentifiedPoint { id, point: *point })
    }

    /// The bounding box of all indexed points, or `None` for an empty index.
    pub fn aabb(&self) -> Option<Aabb3> {
        self.aabb
    }

    /// Find the identifiers of all points whose distance to `center` is less than or equal to
    /// `radius`. Each qualifying identifier is reported exactly once, in ascending order.
    ///
    /// A radius of zero matches only points exactly coincident with the center.
    ///
    /// # Arguments
    ///
    /// * `center`: the center of the query sphere, which must be finite
    /// * `radius`: the radius of the query sphere, must be zero or greater
    ///
    /// returns: Result<Vec<usize>, SpreadError>
    pub fn query_sphere(&self, center: &Point3, radius: f64) -> Result<Vec<usize>, SpreadError> {
        check_query(center, radius)?;
        Ok(self.query_unchecked(center, radius))
    }

    /// Run a sphere query whose parameters have already been validated.
    pub(crate) fn query_unchecked(&self, center: &Point3, radius: f64) -> Vec<usize> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };

        // An infinite sphere holds everything, and squared distances between far apart points
        // may themselves overflow to infinity
        if radius.is_infinite() {
            return (0..self.points.len()).collect();
        }

        let r2 = radius * radius;
        let search = r2 + r2 * SEARCH_SLACK + f64::MIN_POSITIVE;
        let query = [center.x, center.y, center.z];
        let near = tree.within_unsorted::<SquaredEuclidean>(&query, search);

        let mut found = near
            .iter()
            .map(|n| n.item as usize)
            .filter(|&id| dist(&self.points[id], center) <= radius)
            .collect::<Vec<_>>();

        trace!(
            "sphere query tested {} tree candidates, {} matches",
            near.len(),
            found.len()
        );

        found.sort_unstable();
        found
    }
}

/// Validate the center and radius of a sphere query.
pub(crate) fn check_query(center: &Point3, radius: f64) -> Result<(), SpreadError> {
    if !is_finite(center) {
        return Err(SpreadError::invalid(
            "query center has a non-finite coordinate",
        ));
    }
    check_radius(radius)
}

pub(crate) fn check_radius(radius: f64) -> Result<(), SpreadError> {
    // NaN fails this comparison as well
    if radius >= 0.0 {
        Ok(())
    } else {
        Err(SpreadError::invalid(format!(
            "radius must be zero or greater, got {}",
            radius
        )))
    }
}
