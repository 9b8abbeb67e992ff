//! Construction-time configuration of a `ChainedHashSet`.

use crate::error::ConfigError;

/// Bucket count a fresh or cleared set starts with; the table never shrinks below it.
pub const DEFAULT_MIN_CAPACITY: usize = 7;

/// Growth threshold: `len / table_size` stays at or below this value.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// Validated sizing parameters.
///
/// ```
/// use chained_hashset::{ChainedHashSet, SetOptions};
///
/// let opts = SetOptions::new()
///     .with_min_capacity(3)?
///     .with_max_load_factor(1.0)?;
/// let set: ChainedHashSet<u32> = ChainedHashSet::with_options(opts);
/// assert_eq!(set.table_size(), 3);
/// # Ok::<(), chained_hashset::ConfigError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetOptions {
    min_capacity: usize,
    max_load_factor: f64,
}

impl SetOptions {
    pub const fn new() -> Self {
        Self {
            min_capacity: DEFAULT_MIN_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    pub fn with_min_capacity(self, min_capacity: usize) -> Result<Self, ConfigError> {
        if min_capacity == 0 {
            return Err(ConfigError::ZeroMinCapacity);
        }
        Ok(Self {
            min_capacity,
            ..self
        })
    }

    pub fn with_max_load_factor(self, max_load_factor: f64) -> Result<Self, ConfigError> {
        if !max_load_factor.is_finite() || max_load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(max_load_factor));
        }
        Ok(Self {
            max_load_factor,
            ..self
        })
    }

    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Whether a table of `table_size` buckets may hold `n` keys.
    #[inline]
    pub(crate) fn fits(&self, table_size: usize, n: usize) -> bool {
        n as f64 <= table_size as f64 * self.max_load_factor
    }

    /// Smallest table size `rehash` may pick while holding `len` keys.
    pub(crate) fn floor_for(&self, len: usize) -> usize {
        // Float-to-int casts saturate, which the caller's checked math then rejects.
        let mut needed = (len as f64 / self.max_load_factor).ceil() as usize;
        // The division can round up past an exact quotient (21 / 0.7).
        if needed > 0 && self.fits(needed - 1, len) {
            needed -= 1;
        }
        self.min_capacity.max(needed)
    }
}

impl Default for SetOptions {
    fn default() -> Self {
        Self::new()
    }
}
