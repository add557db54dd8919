//! JSON request documents for the two operations. Coordinates are written as `[x, y, z]` arrays.
//!
//! A clustering request looks like:
//!
//! ```json
//! { "points": [[0, 0, 0], [10, 0, 0]], "foci": [[0, 0, 0]], "radius": 5.0 }
//! ```
//!
//! with `"radii": [...]` (one per focus) in place of `"radius"` for per-focus radii. A spread
//! request looks like:
//!
//! ```json
//! { "candidates": [[0, 0, 0], [10, 0, 0]], "obstacles": [[0, 0, 0]], "steps": 1,
//!   "options": { "first_pick": "farthest_from_centroid" } }
//! ```

use crate::errors::SpreadError;
use crate::geom3::{ResultGrouping, SelectOptions, cluster, cluster_with_radii, select_with};
use crate::{Point3, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

fn to_points(coords: &[[f64; 3]]) -> Vec<Point3> {
    coords.iter().map(|c| Point3::new(c[0], c[1], c[2])).collect()
}

/// Convert points back to the `[x, y, z]` form used in documents.
pub fn to_arrays(points: &[Point3]) -> Vec<[f64; 3]> {
    points.iter().map(|p| [p.x, p.y, p.z]).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRequest {
    pub points: Vec<[f64; 3]>,
    pub foci: Vec<[f64; 3]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
}

impl ClusterRequest {
    /// Run the clustering described by the request. Exactly one of `radius` and `radii` must be
    /// present.
    pub fn run(&self) -> std::result::Result<ResultGrouping, SpreadError> {
        let points = to_points(&self.points);
        let foci = to_points(&self.foci);
        match (self.radius, &self.radii) {
            (Some(radius), None) => cluster(&points, &foci, radius),
            (None, Some(radii)) => cluster_with_radii(&points, &foci, radii),
            (Some(_), Some(_)) => Err(SpreadError::invalid(
                "a request may have a shared radius or per-focus radii, not both",
            )),
            (None, None) => Err(SpreadError::invalid("a request needs a radius")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadRequest {
    pub candidates: Vec<[f64; 3]>,

    #[serde(default)]
    pub obstacles: Vec<[f64; 3]>,

    /// Signed so that a negative count from a host is reported rather than failing to parse
    pub steps: i64,

    #[serde(default)]
    pub options: SelectOptions,
}

impl SpreadRequest {
    /// Run the selection described by the request, returning the obstacles followed by the
    /// selected candidates.
    pub fn run(&self) -> std::result::Result<Vec<Point3>, SpreadError> {
        let steps = usize::try_from(self.steps).map_err(|_| {
            SpreadError::invalid(format!(
                "steps must be zero or greater, got {}",
                self.steps
            ))
        })?;

        select_with(
            &to_points(&self.candidates),
            &to_points(&self.obstacles),
            steps,
            &self.options,
        )
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_cluster_request(path: &Path) -> Result<ClusterRequest> {
    load_json(path)
}

pub fn load_spread_request(path: &Path) -> Result<SpreadRequest> {
    load_json(path)
}

/// Write any serializable result (a `ResultGrouping`, or point arrays from [`to_arrays`]) as
/// JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
