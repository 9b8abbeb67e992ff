//! Error types for set configuration and fallible reservation.

use core::fmt;

/// Rejected `SetOptions` value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The minimum capacity must leave at least one bucket to hash into.
    ZeroMinCapacity,
    /// The maximum load factor must be finite and strictly positive.
    InvalidLoadFactor(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMinCapacity => f.write_str("minimum capacity must be at least 1"),
            ConfigError::InvalidLoadFactor(lf) => {
                write!(f, "max load factor must be finite and > 0, got {lf}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to grow the bucket array in `ChainedHashSet::try_reserve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveError {
    /// The required bucket count does not fit in `usize`.
    CapacityOverflow,
    /// The allocator refused a bucket array of this many slots (sentinel included).
    AllocFailed { buckets: usize },
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReserveError::CapacityOverflow => f.write_str("capacity overflow"),
            ReserveError::AllocFailed { buckets } => {
                write!(f, "failed to allocate a bucket array of {buckets} slots")
            }
        }
    }
}

impl std::error::Error for ReserveError {}
