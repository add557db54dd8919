//! Reading request documents and writing results, for hosts that exchange data through files.

mod requests;

pub use requests::{
    ClusterRequest, SpreadRequest, load_cluster_request, load_spread_request, to_arrays,
    write_json,
};
