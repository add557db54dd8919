//! Exact-value identity for points, used wherever two points must be recognized as "the same
//! point" without any tolerance.

use crate::Point3;

/// A hashable key with the same equality as `Point3`'s exact `PartialEq` on finite coordinates.
/// Negative zero is folded onto positive zero, since `-0.0 == 0.0`. Keys are only meaningful for
/// finite points; NaN coordinates must be rejected before keys are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey([u64; 3]);

impl PointKey {
    pub fn new(p: &Point3) -> Self {
        // Adding +0.0 turns -0.0 into +0.0 and leaves every other finite value unchanged
        PointKey([
            (p.x + 0.0).to_bits(),
            (p.y + 0.0).to_bits(),
            (p.z + 0.0).to_bits(),
        ])
    }
}
