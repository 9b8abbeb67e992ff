//! Positions into a `ChainedHashSet` and the borrowing key iterator.

use core::iter::FusedIterator;
use slotmap::DefaultKey;

use crate::chained_hash_set::ChainedHashSet;
use crate::table::BucketTable;

/// A detached position in a set: a bucket index, a node in that bucket's
/// chain, and the table epoch the position was taken in.
///
/// Cursors do not borrow the set. Resolve them with [`Cursor::key`] and
/// move them with [`Cursor::advance`]. Any growth, `rehash` or `clear`
/// starts a new epoch and every older cursor stops resolving. A cursor
/// only resolves against the set holding the contents it was taken from.
/// Erasing a key only invalidates cursors on that key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    pub(crate) bucket: usize,
    pub(crate) node: Option<DefaultKey>,
    pub(crate) epoch: u64,
}

impl Cursor {
    /// True for the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// The key at this position, or `None` for `end` and invalidated cursors.
    pub fn key<'a, K, S>(&self, set: &'a ChainedHashSet<K, S>) -> Option<&'a K> {
        if self.epoch != set.epoch() {
            return None;
        }
        set.table().node(self.node?).map(|n| &n.key)
    }

    /// The next position in bucket order. `end` and invalidated cursors
    /// advance to `set.end()`.
    pub fn advance<K, S>(&self, set: &ChainedHashSet<K, S>) -> Cursor {
        let table = set.table();
        match self.node {
            Some(k) if self.epoch == set.epoch() && table.node(k).is_some() => {
                let (bucket, node) = table.successor(self.bucket, k);
                Cursor {
                    bucket,
                    node,
                    epoch: self.epoch,
                }
            }
            _ => set.end(),
        }
    }
}

/// Iterator over the keys of a `ChainedHashSet`, in bucket order.
pub struct Iter<'a, K> {
    table: &'a BucketTable<K>,
    bucket: usize,
    node: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(table: &'a BucketTable<K>) -> Self {
        let (bucket, node) = table.skip_empty(0);
        Self {
            table,
            bucket,
            node,
            remaining: table.len(),
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        let k = self.node?;
        let table: &'a BucketTable<K> = self.table;
        (self.bucket, self.node) = table.successor(self.bucket, k);
        self.remaining -= 1;
        table.node(k).map(|n| &n.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            bucket: self.bucket,
            node: self.node,
            remaining: self.remaining,
        }
    }
}
