//! chained-hashset: a single-threaded hash set with separately chained
//! buckets, a fixed maximum load factor and detached cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a unique-key hash set whose storage engine is easy to reason
//!   about: one bucket array, one chain per slot, one growth rule.
//! - Layers:
//!   - BucketTable<K>: the bucket array plus a generational node arena.
//!     Knows how to probe, prepend, unlink and relink; has no policy.
//!   - ChainedHashSet<K, S>: hashing, the load factor policy, cursors and
//!     the public set API.
//!
//! Constraints
//! - Single-threaded: `!Sync` (no internal locking).
//! - Unique keys; a duplicate insert is a no-op that reports the original.
//! - `len <= table_size * max_load_factor` after every mutation;
//!   `table_size >= min_capacity` always.
//! - Every key lives in the chain at `hash % table_size`.
//!
//! Bucket array and sentinel
//! - The array holds `table_size + 1` buckets. The extra one at index
//!   `table_size` is the terminal sentinel; forward scans over empty
//!   buckets stop on it. It never holds a chain.
//!
//! Growth
//! - Before a fresh key is linked, the set reserves room for `len + 1`.
//!   Reservation takes `2 * size + 1` until the key fits, then rebuilds
//!   the array once and relinks every node by its stored hash.
//! - `rehash(n)` rebuilds to `max(min_capacity, n, ceil(len / lf))`.
//! - Erase never shrinks the table; `clear` returns to `min_capacity`.
//!
//! Hashing
//! - Each node stores the `u64` hash computed on insertion. Probing
//!   compares it before calling `K: Eq`; rebuilds and clones never call
//!   `K: Hash` again.
//!
//! Cursors
//! - A `Cursor` is `(bucket, node, epoch)` and does not borrow the set.
//!   Every set and every rebuild (growth, `rehash`, `clear`) takes a new
//!   epoch from a process-wide counter, so a stale cursor, or one carried
//!   to another set, resolves to `None` rather than to a moved key. Erase
//!   frees one arena slot; only cursors on that node go stale.
//!
//! Reentrancy
//! - Entry points that run `K: Hash`/`K: Eq` hold a debug-only guard.
//!   Re-entering the same set from that user code panics in debug builds.
//!
//! Notes and non-goals
//! - No ordered iteration, no concurrency, no custom allocators.
//! - Keys are immutable once inserted; there is no mutable iterator.
//! - Node teardown is a flat arena clear, never a recursive chain drop.

mod chained_hash_set;
mod chained_hash_set_proptest;
mod cursor;
mod error;
mod options;
mod reentrancy;
mod table;

// Public surface
pub use chained_hash_set::ChainedHashSet;
pub use cursor::{Cursor, Iter};
pub use error::{ConfigError, ReserveError};
pub use options::{SetOptions, DEFAULT_MAX_LOAD_FACTOR, DEFAULT_MIN_CAPACITY};
