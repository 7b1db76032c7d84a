//! Error types for recency

use std::fmt;

/// Result type alias for fallible cache construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers
///
/// A lookup miss is not an error. Corruption of the recency list is a bug
/// in the cache and panics instead of being reported here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be at least 1
    ZeroCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroCapacity => write!(f, "Invalid capacity: 0 (must be greater than 0)"),
        }
    }
}

impl std::error::Error for Error {}
