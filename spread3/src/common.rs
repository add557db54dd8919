mod index_mask;
pub mod point_key;
pub mod points;

pub use index_mask::IndexMask;
pub use point_key::PointKey;
