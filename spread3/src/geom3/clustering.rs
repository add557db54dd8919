//! Range clustering: one sphere query per focus point against a shared index, with the results
//! grouped by focus.

use super::range_index::{SpatialRangeIndex, check_query, check_radius};
use crate::Point3;
use crate::common::points::check_finite;
use crate::errors::SpreadError;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A single sphere query: a center and a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusQuery {
    pub center: Point3,
    pub radius: f64,
}

impl FocusQuery {
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// The result of a clustering request. There is exactly one group per focus point, in focus
/// order, and a focus with no points in range has an explicit empty group. Groups hold the
/// identifiers (input positions) of the search points, not their coordinates, so a caller
/// needing coordinates resolves them against its own point storage, see
/// [`ResultGrouping::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultGrouping {
    groups: Vec<Vec<usize>>,
}

impl ResultGrouping {
    pub fn new(groups: Vec<Vec<usize>>) -> Self {
        Self { groups }
    }

    /// The number of groups, which is the number of focus points in the request.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The identifiers matched by the focus at `focus`, or `None` if there is no such focus.
    pub fn group(&self, focus: usize) -> Option<&[usize]> {
        self.groups.get(focus).map(|g| g.as_slice())
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Iterate over `(focus index, matched identifiers)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.groups.iter().enumerate().map(|(i, g)| (i, g.as_slice()))
    }

    /// The total number of matches across all groups. A search point matched by several foci
    /// is counted once per focus.
    pub fn total_matches(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    /// Look up the coordinates of the points matched by one focus, using the same point slice
    /// that the index was built from.
    ///
    /// # Arguments
    ///
    /// * `focus`: the index of the focus point
    /// * `points`: the search points in their original order
    ///
    /// returns: Option<Vec<OPoint<f64, Const<3>>>>, `None` if the focus index is out of range or
    /// an identifier does not exist in `points`
    pub fn resolve(&self, focus: usize, points: &[Point3]) -> Option<Vec<Point3>> {
        self.groups
            .get(focus)?
            .iter()
            .map(|&id| points.get(id).copied())
            .collect()
    }

    pub fn into_inner(self) -> Vec<Vec<usize>> {
        self.groups
    }
}

impl SpatialRangeIndex {
    /// Run a single focus query against the index.
    pub fn query(&self, query: &FocusQuery) -> Result<Vec<usize>, SpreadError> {
        self.query_sphere(&query.center, query.radius)
    }

    /// Query the index once for every focus point using one shared radius, grouping the matched
    /// identifiers by focus. The queries are independent and are run in parallel.
    ///
    /// # Arguments
    ///
    /// * `foci`: the focus points, which must all be finite
    /// * `radius`: the search radius applied to every focus, must be zero or greater
    ///
    /// returns: Result<ResultGrouping, SpreadError>
    pub fn cluster(&self, foci: &[Point3], radius: f64) -> Result<ResultGrouping, SpreadError> {
        check_finite(foci, "foci")?;
        check_radius(radius)?;

        let groups = foci
            .par_iter()
            .map(|f| self.query_unchecked(f, radius))
            .collect::<Vec<_>>();

        Ok(ResultGrouping::new(groups))
    }

    /// Query the index once for every focus point, where each focus has its own radius.
    ///
    /// # Arguments
    ///
    /// * `foci`: the focus points, which must all be finite
    /// * `radii`: one radius per focus point, each zero or greater
    ///
    /// returns: Result<ResultGrouping, SpreadError>
    pub fn cluster_with_radii(
        &self,
        foci: &[Point3],
        radii: &[f64],
    ) -> Result<ResultGrouping, SpreadError> {
        check_foci_radii(foci, radii)?;

        let groups = foci
            .par_iter()
            .zip(radii.par_iter())
            .map(|(f, r)| self.query_unchecked(f, *r))
            .collect::<Vec<_>>();

        Ok(ResultGrouping::new(groups))
    }
}

/// Find, for every focus point, the identifiers of all search points within `radius` of it.
/// An index is built once over `points` and discarded when the grouping is complete.
///
/// # Arguments
///
/// * `points`: the search points, identified by their position in this slice
/// * `foci`: the focus points
/// * `radius`: the search radius shared by all foci
///
/// returns: Result<ResultGrouping, SpreadError>
///
/// # Examples
///
/// ```
/// use spread3::{cluster, Point3};
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 0.0, 0.0),
///     Point3::new(0.0, 10.0, 0.0),
/// ];
/// let grouping = cluster(&points, &[Point3::new(0.0, 0.0, 0.0)], 5.0).unwrap();
/// assert_eq!(grouping.group(0), Some(&[0][..]));
/// ```
pub fn cluster(
    points: &[Point3],
    foci: &[Point3],
    radius: f64,
) -> Result<ResultGrouping, SpreadError> {
    // Validate the cheap parameters before paying for the build
    check_finite(foci, "foci")?;
    check_radius(radius)?;

    let index = SpatialRangeIndex::build(points)?;
    let grouping = index.cluster(foci, radius)?;
    debug!(
        "clustered {} points around {} foci, {} total matches",
        points.len(),
        foci.len(),
        grouping.total_matches()
    );
    Ok(grouping)
}

/// Like [`cluster`], but with a separate radius for each focus point.
pub fn cluster_with_radii(
    points: &[Point3],
    foci: &[Point3],
    radii: &[f64],
) -> Result<ResultGrouping, SpreadError> {
    check_foci_radii(foci, radii)?;

    let index = SpatialRangeIndex::build(points)?;
    index.cluster_with_radii(foci, radii)
}

/// Every focus needs its own finite center and a radius of zero or greater.
fn check_foci_radii(foci: &[Point3], radii: &[f64]) -> Result<(), SpreadError> {
    if foci.len() != radii.len() {
        return Err(SpreadError::invalid(format!(
            "expected one radius per focus, got {} foci and {} radii",
            foci.len(),
            radii.len()
        )));
    }
    for (f, r) in foci.iter().zip(radii) {
        check_query(f, *r)?;
    }
    Ok(())
}
