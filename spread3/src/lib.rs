//! Range clustering and greedy spread selection over 3D point sets.
//!
//! The two halves of the crate are independent of each other. [`geom3::SpatialRangeIndex`] is a
//! build-once, query-many index answering "which points lie within this sphere" and
//! [`geom3::select`] grows a set of placed points by repeatedly picking the candidate that is
//! most separated from everything already placed.

use std::error::Error;

pub mod common;
pub mod errors;
pub mod geom3;
pub mod io;

pub use errors::SpreadError;
pub use geom3::{
    FirstPick, FocusQuery, IdentifiedPoint, ResultGrouping, SelectOptions, SpatialRangeIndex,
    cluster, cluster_with_radii, select, select_with,
};

pub type Point3 = parry3d_f64::na::Point3<f64>;
pub type Vector3 = parry3d_f64::na::Vector3<f64>;
pub type Aabb3 = parry3d_f64::bounding_volume::Aabb;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;
