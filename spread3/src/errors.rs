use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures reported by the range index and the spread selector. Both components validate their
/// inputs up front, so a returned error always means no work product was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SpreadError {
    /// A parameter was out of its domain: a negative or NaN radius, a negative step count, a
    /// non-finite coordinate, or a per-focus radius list of the wrong length.
    InvalidParameter(String),

    /// There are not enough distinct, unused candidates to reach the requested number of points.
    InsufficientCandidates { required: usize, available: usize },
}

impl SpreadError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SpreadError::InvalidParameter(msg.into())
    }
}

impl Display for SpreadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            SpreadError::InsufficientCandidates {
                required,
                available,
            } => write!(
                f,
                "insufficient candidates: {} more points required but only {} usable candidates",
                required, available
            ),
        }
    }
}

impl Error for SpreadError {}
