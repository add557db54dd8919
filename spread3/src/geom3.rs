mod clustering;
mod range_index;
mod spread;

pub use clustering::{FocusQuery, ResultGrouping, cluster, cluster_with_radii};
pub use range_index::{IdentifiedPoint, KdTree3, SpatialRangeIndex};
pub use spread::{FirstPick, SelectOptions, select, select_with};
