//! ChainedHashSet: unique keys in separately chained buckets with a fixed
//! maximum load factor.

use core::borrow::Borrow;
use core::cell::Cell;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use core::sync::atomic::{AtomicU64, Ordering};
use hashbrown::hash_map::DefaultHashBuilder;
use std::io;

use crate::cursor::{Cursor, Iter};
use crate::error::ReserveError;
use crate::options::SetOptions;
use crate::reentrancy::ReentrancyCheck;
use crate::table::{self, BucketTable};

pub struct ChainedHashSet<K, S = DefaultHashBuilder> {
    hasher: S,
    table: BucketTable<K>,
    options: SetOptions,
    // Replaced on every bucket array rebuild; cursors from other epochs do not resolve.
    epoch: u64,
    reentrancy: ReentrancyCheck,
    _not_sync: PhantomData<Cell<()>>,
}

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(0);

/// A process-wide fresh epoch. Distinct sets never share one, so a cursor
/// carried across `swap` or into another set does not resolve there.
fn fresh_epoch() -> u64 {
    NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

/// Size reached by repeatedly taking `2 * size + 1` from `from` until `n` keys fit.
fn grown_size(options: &SetOptions, from: usize, n: usize) -> Result<usize, ReserveError> {
    let mut size = from;
    while !options.fits(size, n) {
        size = size
            .checked_mul(2)
            .and_then(|s| s.checked_add(1))
            .ok_or(ReserveError::CapacityOverflow)?;
    }
    Ok(size)
}

impl<K> ChainedHashSet<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_options(options: SetOptions) -> Self {
        Self::with_options_and_hasher(options, Default::default())
    }
}

impl<K, S> Default for ChainedHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> ChainedHashSet<K, S> {
    #[inline]
    pub(crate) fn table(&self) -> &BucketTable<K> {
        &self.table
    }

    #[inline]
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    fn cursor_at(&self, bucket: usize, node: slotmap::DefaultKey) -> Cursor {
        Cursor {
            bucket,
            node: Some(node),
            epoch: self.epoch,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of buckets, not counting the terminal sentinel.
    pub fn table_size(&self) -> usize {
        self.table.table_size()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.table_size() as f64
    }

    pub fn max_load_factor(&self) -> f64 {
        self.options.max_load_factor()
    }

    pub fn min_capacity(&self) -> usize {
        self.options.min_capacity()
    }

    pub fn options(&self) -> SetOptions {
        self.options
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Position of the first key in bucket order, or `end()` when empty.
    pub fn begin(&self) -> Cursor {
        let (bucket, node) = self.table.skip_empty(0);
        Cursor {
            bucket,
            node,
            epoch: self.epoch,
        }
    }

    /// The past-the-end position: the sentinel bucket with no node.
    pub fn end(&self) -> Cursor {
        Cursor {
            bucket: self.table.table_size(),
            node: None,
            epoch: self.epoch,
        }
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.table)
    }

    /// Make room for `n` keys without exceeding the max load factor.
    ///
    /// Starting from the current size, the table grows to `2 * size + 1`
    /// until `n` fits, then rebuilds once. No-op if `n` already fits.
    /// Capacity overflow panics and allocation failure aborts; see
    /// [`try_reserve`](Self::try_reserve).
    pub fn reserve(&mut self, n: usize) {
        if let Err(e) = self.try_reserve(n) {
            table::fail(e)
        }
    }

    pub fn try_reserve(&mut self, n: usize) -> Result<(), ReserveError> {
        let size = self.table.table_size();
        if self.options.fits(size, n) {
            return Ok(());
        }
        let target = grown_size(&self.options, size, n)?;
        self.try_rebuild(target)
    }

    /// Rebuild the bucket array with
    /// `max(min_capacity, n, ceil(len / max_load_factor))` buckets.
    ///
    /// Always rebuilds, so it can also shrink a table left large by erases.
    /// Invalidates every outstanding cursor.
    pub fn rehash(&mut self, n: usize) {
        if let Err(e) = self.try_rebuild(n) {
            table::fail(e)
        }
    }

    fn try_rebuild(&mut self, requested: usize) -> Result<(), ReserveError> {
        let size = requested.max(self.options.floor_for(self.len()));
        let buckets = table::try_alloc_buckets(size)?;
        self.table.relink(buckets);
        self.epoch = fresh_epoch();
        Ok(())
    }

    /// Drop every key and return to `min_capacity` buckets.
    pub fn clear(&mut self) {
        self.table.reset(self.options.min_capacity());
        self.epoch = fresh_epoch();
    }

    /// Exchange contents, options and hasher with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Write every bucket's chain, then the sentinel marker.
    ///
    /// ```text
    /// number_of_elements = 3 table_size = 7
    /// 0:
    /// 1: --> 8 --> 1
    /// ...
    /// 7: <end>
    /// ```
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: fmt::Debug,
    {
        let size = self.table.table_size();
        writeln!(
            out,
            "number_of_elements = {} table_size = {}",
            self.len(),
            size
        )?;
        for idx in 0..size {
            write!(out, "{idx}:")?;
            for k in self.table.chain(idx) {
                if let Some(n) = self.table.node(k) {
                    write!(out, " --> {:?}", n.key)?;
                }
            }
            writeln!(out)?;
        }
        if self.table.bucket(size).is_terminal() {
            writeln!(out, "{size}: <end>")?;
        }
        Ok(())
    }
}

impl<K, S> ChainedHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_options_and_hasher(SetOptions::default(), hasher)
    }

    pub fn with_options_and_hasher(options: SetOptions, hasher: S) -> Self {
        Self {
            hasher,
            table: BucketTable::new(options.min_capacity()),
            options,
            epoch: fresh_epoch(),
            reentrancy: ReentrancyCheck::new(),
            _not_sync: PhantomData,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Insert `key` unless an equal key is present.
    ///
    /// Returns the position of the stored key and whether it was inserted.
    /// A duplicate leaves the set untouched and returns the original's
    /// position. A fresh key may grow the table first, which invalidates
    /// older cursors; it is then prepended to its chain.
    pub fn insert(&mut self, key: K) -> (Cursor, bool) {
        let hash = {
            let _g = self.reentrancy.enter("insert");
            let hash = self.make_hash(&key);
            if let Some((bucket, node)) = self.table.locate(hash, &key) {
                return (self.cursor_at(bucket, node), false);
            }
            hash
        };
        // Growth and linking use the stored hashes only.
        self.reserve(self.table.len() + 1);
        let (bucket, node) = self.table.push_front(key, hash);
        (self.cursor_at(bucket, node), true)
    }

    /// Insert each key in turn. Capacity is reserved one new key at a time.
    pub fn insert_all<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.insert(key);
        }
    }

    /// 1 if the key is present, else 0.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.contains(q))
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains");
        let hash = self.make_hash(q);
        self.table.locate(hash, q).is_some()
    }

    /// Position of the key, or `end()` if absent.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("find");
        let hash = self.make_hash(q);
        match self.table.locate(hash, q) {
            Some((bucket, node)) => self.cursor_at(bucket, node),
            None => self.end(),
        }
    }

    /// Remove the key and return it. The table never shrinks.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove");
        let hash = self.make_hash(q);
        self.table.unlink(hash, q)
    }

    /// 1 if the key was removed, 0 if it was absent.
    pub fn erase<Q>(&mut self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.remove(q).is_some())
    }
}

impl<K, S> Clone for ChainedHashSet<K, S>
where
    K: Clone,
    S: Clone,
{
    /// Deep copy into a fresh bucket array sized as `reserve(len)` would
    /// size a new set. Keys are re-linked by their stored hash, which the
    /// cloned hasher reproduces.
    fn clone(&self) -> Self {
        let size = match grown_size(&self.options, self.options.min_capacity(), self.len()) {
            Ok(size) => size,
            Err(e) => table::fail(e),
        };
        Self {
            hasher: self.hasher.clone(),
            table: self.table.deep_copy(size),
            options: self.options,
            epoch: fresh_epoch(),
            reentrancy: ReentrancyCheck::new(),
            _not_sync: PhantomData,
        }
    }
}

impl<K, S> PartialEq for ChainedHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K, S> Eq for ChainedHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, S> fmt::Debug for ChainedHashSet<K, S>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, const M: usize> From<[K; M]> for ChainedHashSet<K>
where
    K: Eq + Hash,
{
    fn from(keys: [K; M]) -> Self {
        let mut set = Self::new();
        set.insert_all(keys);
        set
    }
}

impl<K, S> FromIterator<K> for ChainedHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::default();
        set.insert_all(iter);
        set
    }
}

impl<K, S> Extend<K> for ChainedHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<'a, K, S> Extend<&'a K> for ChainedHashSet<K, S>
where
    K: Eq + Hash + Copy + 'a,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.insert_all(iter.into_iter().copied());
    }
}

impl<'a, K, S> IntoIterator for &'a ChainedHashSet<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::hash::Hasher;

    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            // every key lands in bucket 0
            0
        }
    }

    /// Invariant: a duplicate insert is a no-op that reports the original position.
    #[test]
    fn duplicate_insert_returns_existing_position() {
        let mut s: ChainedHashSet<String> = ChainedHashSet::new();
        let (c1, fresh) = s.insert("dup".to_string());
        assert!(fresh);
        let (c2, again) = s.insert("dup".to_string());
        assert!(!again);
        assert_eq!(c1, c2);
        assert_eq!(s.len(), 1);
        assert_eq!(c2.key(&s).map(String::as_str), Some("dup"));
    }

    /// Invariant: growth follows `2 * size + 1` from the min capacity and
    /// fires exactly when one more key would exceed the load factor.
    #[test]
    fn growth_sequence_from_default_capacity() {
        let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
        assert_eq!(s.table_size(), 7);
        for k in 1..=4 {
            s.insert(k);
        }
        assert_eq!(s.table_size(), 7); // 4 <= 4.9
        s.insert(5);
        assert_eq!(s.table_size(), 15);
        for k in 6..=10 {
            s.insert(k);
        }
        assert_eq!(s.table_size(), 15); // 10 <= 10.5
        s.insert(11);
        assert_eq!(s.table_size(), 31);
        for k in 12..=20 {
            s.insert(k);
        }
        assert_eq!(s.table_size(), 31);
        assert_eq!(s.len(), 20);
        assert!(s.load_factor() <= s.max_load_factor());
    }

    /// Invariant: duplicate inserts never trigger growth.
    #[test]
    fn duplicate_insert_does_not_grow() {
        let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
        s.insert_all(1..=4);
        let before = s.begin();
        s.insert(4);
        assert_eq!(s.table_size(), 7);
        assert_eq!(before.key(&s), s.begin().key(&s));
    }

    /// Invariant: every live key sits in the chain at `hash % table_size`.
    #[test]
    fn keys_live_in_their_home_chain() {
        let mut s: ChainedHashSet<u64> = ChainedHashSet::new();
        s.insert_all(0..200);
        let t = s.table();
        for idx in 0..s.table_size() {
            for k in t.chain(idx) {
                let key = t.node(k).unwrap().key;
                assert_eq!(t.slot(s.make_hash(&key)), idx);
            }
        }
    }

    /// Invariant: chains iterate most-recent-first, and erasing the head or
    /// a middle node leaves cursors on the other nodes valid.
    #[test]
    fn erase_in_single_chain_keeps_sibling_cursors() {
        let mut s: ChainedHashSet<&'static str, ConstBuildHasher> =
            ChainedHashSet::with_hasher(ConstBuildHasher);
        let (ca, _) = s.insert("a");
        let (cb, _) = s.insert("b");
        let (cc, _) = s.insert("c");
        let (cd, _) = s.insert("d");
        let order: Vec<_> = s.iter().copied().collect();
        assert_eq!(order, vec!["d", "c", "b", "a"]);

        assert_eq!(s.erase("d"), 1); // head
        assert_eq!(s.erase("b"), 1); // middle
        assert_eq!(s.erase("b"), 0);
        assert_eq!(s.len(), 2);

        assert_eq!(cd.key(&s), None);
        assert_eq!(cb.key(&s), None);
        assert_eq!(cc.key(&s), Some(&"c"));
        assert_eq!(ca.key(&s), Some(&"a"));
        assert_eq!(cc.advance(&s), ca);
        assert!(ca.advance(&s).is_end());
        assert_eq!(s.begin(), cc);
    }

    /// Invariant: growth invalidates cursors taken before it.
    #[test]
    fn growth_invalidates_cursors() {
        let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
        let (c, _) = s.insert(1);
        let old_end = s.end();
        s.insert_all(2..=4);
        assert_eq!(c.key(&s), Some(&1)); // no growth yet
        s.insert(5);
        assert_eq!(c.key(&s), None);
        assert_ne!(old_end, s.end());
        assert_eq!(c.advance(&s), s.end());
        assert_eq!(s.find(&1).key(&s), Some(&1));
    }

    /// Invariant: walking from `begin` with `advance` visits every key once
    /// and stops at `end`.
    #[test]
    fn cursor_walk_matches_iter() {
        let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
        s.insert_all([3, 17, 42, 8, 99, 1000]);
        let mut walked = Vec::new();
        let mut c = s.begin();
        while c != s.end() {
            walked.push(*c.key(&s).unwrap());
            c = c.advance(&s);
        }
        let iterated: Vec<u32> = s.iter().copied().collect();
        assert_eq!(walked, iterated);
        assert_eq!(s.iter().len(), 6);
        assert!(s.end().advance(&s).is_end());
    }

    #[test]
    fn empty_set_begin_is_end() {
        let s: ChainedHashSet<u8> = ChainedHashSet::new();
        assert_eq!(s.begin(), s.end());
        assert_eq!(s.end(), s.end());
        assert_eq!(s.find(&3), s.end());
        assert!(s.iter().next().is_none());
    }

    #[test]
    fn borrowed_lookup_with_str() {
        let mut s: ChainedHashSet<String> = ChainedHashSet::new();
        s.insert("hello".to_string());
        assert!(s.contains("hello"));
        assert_eq!(s.count("world"), 0);
        assert!(!s.find("hello").is_end());
        assert_eq!(s.remove("hello"), Some("hello".to_string()));
        assert!(s.is_empty());
    }

    /// Invariant: `clear` resets to min capacity and the set is reusable.
    #[test]
    fn clear_resets_table() {
        let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
        s.insert_all(0..50);
        let c = s.find(&7);
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.table_size(), 7);
        assert_eq!(c.key(&s), None);
        assert!(s.insert(7).1);
        assert_eq!(s.count(&7), 1);
    }

    /// Invariant: `rehash` never goes below `ceil(len / max_load_factor)`
    /// nor the min capacity, and may shrink after erases.
    #[test]
    fn rehash_bounds() {
        let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
        s.insert_all(0..100);
        s.rehash(1);
        assert_eq!(s.table_size(), 143); // ceil(100 / 0.7)
        for k in 0..100 {
            assert_eq!(s.count(&k), 1);
        }
        for k in 0..98 {
            s.erase(&k);
        }
        assert_eq!(s.table_size(), 143);
        s.rehash(0);
        assert_eq!(s.table_size(), 7);
        s.rehash(64);
        assert_eq!(s.table_size(), 64);
        assert!(s.contains(&98) && s.contains(&99));

        // 21 / 0.7 is exactly 30 buckets.
        let mut t: ChainedHashSet<u32> = ChainedHashSet::new();
        t.insert_all(0..21);
        t.rehash(0);
        assert_eq!(t.table_size(), 30);
        assert_eq!(t.len(), 21);
    }

    #[test]
    fn reserve_is_noop_when_it_fits() {
        let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
        let b = s.end();
        s.reserve(4);
        assert_eq!(s.end(), b);
        s.reserve(5);
        assert_eq!(s.table_size(), 15);
        s.reserve(100);
        assert!(s.options().fits(s.table_size(), 100));
    }

    #[test]
    fn try_reserve_reports_overflow_and_keeps_state() {
        let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
        s.insert(1);
        assert_eq!(s.try_reserve(usize::MAX), Err(ReserveError::CapacityOverflow));
        assert_eq!(s.table_size(), 7);
        assert!(s.contains(&1));
    }

    /// Invariant: a clone keeps the hasher so stored hashes stay valid, and
    /// mutations of either copy are not seen by the other.
    #[test]
    fn clone_is_deep_and_sized_for_len() {
        let mut a: ChainedHashSet<u32> = ChainedHashSet::new();
        a.insert_all(0..30);
        a.rehash(500);
        let mut b = a.clone();
        assert_eq!(b.table_size(), 63);
        assert_eq!(a, b);
        b.erase(&3);
        b.insert(1000);
        assert!(a.contains(&3));
        assert!(!a.contains(&1000));
        assert!(b.contains(&1000) && !b.contains(&3));
        for k in b.iter() {
            assert_eq!(b.count(k), 1);
        }
    }

    #[test]
    fn swap_exchanges_everything() {
        let mut a: ChainedHashSet<u32> = ChainedHashSet::from([1, 2, 3]);
        let opts = SetOptions::new().with_max_load_factor(2.0).unwrap();
        let mut b: ChainedHashSet<u32> = ChainedHashSet::with_options(opts);
        b.insert(9);
        a.swap(&mut b);
        assert_eq!(a.len(), 1);
        assert_eq!(a.max_load_factor(), 2.0);
        assert_eq!(b.len(), 3);
        assert_eq!(b.max_load_factor(), 0.7);
        assert!(a.contains(&9) && b.contains(&2));
    }

    /// Invariant: a cursor resolves only against the contents it was taken
    /// from; after `swap` it follows those contents into the other set.
    #[test]
    fn cursor_follows_contents_across_swap() {
        let opts = SetOptions::new().with_min_capacity(1000).unwrap();
        let mut a: ChainedHashSet<u32> = ChainedHashSet::with_options(opts);
        let (ca, _) = a.insert(123);
        let mut b: ChainedHashSet<u32> = ChainedHashSet::new();
        b.insert(7);
        a.swap(&mut b);

        assert_eq!(ca.key(&a), None);
        assert_eq!(ca.advance(&a), a.end());
        assert_eq!(ca.key(&b), Some(&123));
        assert!(ca.advance(&b).is_end());

        // Two untouched sets never share positions either.
        let c: ChainedHashSet<u32> = ChainedHashSet::from([123]);
        assert_eq!(ca.key(&c), None);
        assert_ne!(a.end(), c.end());
    }

    #[test]
    fn dump_lists_chains_and_sentinel() {
        let mut s: ChainedHashSet<&'static str, ConstBuildHasher> =
            ChainedHashSet::with_hasher(ConstBuildHasher);
        s.insert_all(["x", "y"]);
        let mut out = Vec::new();
        s.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "number_of_elements = 2 table_size = 7");
        assert_eq!(lines[1], "0: --> \"y\" --> \"x\"");
        assert_eq!(lines[2], "1:");
        assert_eq!(lines[8], "7: <end>");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn debug_prints_as_set() {
        let s: ChainedHashSet<u8> = ChainedHashSet::from([5]);
        assert_eq!(format!("{s:?}"), "{5}");
    }

    #[test]
    fn extend_by_reference_and_collect() {
        let src = [4u16, 4, 8, 15];
        let mut s: ChainedHashSet<u16> = src.iter().copied().collect();
        s.extend(&[16, 23, 42, 8]);
        let got: BTreeSet<u16> = s.iter().copied().collect();
        assert_eq!(got, BTreeSet::from([4, 8, 15, 16, 23, 42]));
    }

    /// Invariant (debug-only): re-entering the set from `K: Eq` while a
    /// probe is running panics; release builds skip this test.
    #[cfg(debug_assertions)]
    #[test]
    fn reentrancy_panics_from_eq_during_find() {
        struct ReentryKey {
            id: &'static str,
            set: *const ChainedHashSet<ReentryKey, ConstBuildHasher>,
            trigger: bool,
        }
        impl PartialEq for ReentryKey {
            fn eq(&self, other: &Self) -> bool {
                if self.id == other.id {
                    return true;
                }
                if other.trigger {
                    // Attempt to re-enter the same set during probing.
                    unsafe {
                        let s = &*other.set;
                        let _ = s.contains(self.id);
                    }
                }
                false
            }
        }
        impl Eq for ReentryKey {}
        impl Hash for ReentryKey {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
        impl Borrow<str> for ReentryKey {
            fn borrow(&self) -> &str {
                self.id
            }
        }

        let mut s: ChainedHashSet<ReentryKey, ConstBuildHasher> =
            ChainedHashSet::with_hasher(ConstBuildHasher);
        s.insert(ReentryKey {
            id: "a",
            set: core::ptr::null(),
            trigger: false,
        });
        let query = ReentryKey {
            id: "b",
            set: &s as *const _,
            trigger: true,
        };
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = s.find(&query);
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }
}
