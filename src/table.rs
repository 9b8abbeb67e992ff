//! BucketTable: the chained bucket array behind `ChainedHashSet`.
//!
//! Layout
//! - `buckets` has `table_size + 1` entries. The last one is the terminal
//!   sentinel: it never heads a chain and is the only bucket with
//!   `terminal == true`. Forward scans stop on it without a bounds check.
//! - Chain nodes live in a generational arena. A link is a `DefaultKey`,
//!   so unlinking one node never moves its siblings, and a key to a freed
//!   node stops resolving instead of aliasing a later node.
//! - Each node keeps the hash computed on insert. Relinking into a new
//!   array and probing both use it; `K: Hash` runs once per key.
//!
//! The table does not decide when to grow. `ChainedHashSet` owns the load
//! factor policy and calls `relink` with the size it picked.

use core::borrow::Borrow;
use slotmap::{DefaultKey, SlotMap};

use crate::error::ReserveError;

#[derive(Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    hash: u64,
    next: Option<DefaultKey>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Bucket {
    head: Option<DefaultKey>,
    terminal: bool,
}

impl Bucket {
    const EMPTY: Bucket = Bucket {
        head: None,
        terminal: false,
    };
    const SENTINEL: Bucket = Bucket {
        head: None,
        terminal: true,
    };

    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.terminal
    }
}

pub(crate) struct BucketTable<K> {
    buckets: Vec<Bucket>,
    nodes: SlotMap<DefaultKey, Node<K>>,
}

/// Allocate `table_size` empty buckets followed by the sentinel.
pub(crate) fn try_alloc_buckets(table_size: usize) -> Result<Vec<Bucket>, ReserveError> {
    let len = table_size
        .checked_add(1)
        .ok_or(ReserveError::CapacityOverflow)?;
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(len)
        .map_err(|_| ReserveError::AllocFailed { buckets: len })?;
    buckets.resize(table_size, Bucket::EMPTY);
    buckets.push(Bucket::SENTINEL);
    Ok(buckets)
}

/// Infallible allocation: overflow panics, allocator failure aborts.
pub(crate) fn alloc_buckets(table_size: usize) -> Vec<Bucket> {
    match try_alloc_buckets(table_size) {
        Ok(buckets) => buckets,
        Err(e) => fail(e),
    }
}

pub(crate) fn fail(e: ReserveError) -> ! {
    match e {
        ReserveError::AllocFailed { buckets } => match std::alloc::Layout::array::<Bucket>(buckets)
        {
            Ok(layout) => std::alloc::handle_alloc_error(layout),
            Err(_) => panic!("{}", ReserveError::CapacityOverflow),
        },
        ReserveError::CapacityOverflow => panic!("{e}"),
    }
}

impl<K> BucketTable<K> {
    pub(crate) fn new(table_size: usize) -> Self {
        debug_assert!(table_size > 0);
        Self {
            buckets: alloc_buckets(table_size),
            nodes: SlotMap::with_key(),
        }
    }

    /// Logical slot count; excludes the sentinel.
    #[inline]
    pub(crate) fn table_size(&self) -> usize {
        self.buckets.len() - 1
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn slot(&self, hash: u64) -> usize {
        (hash % self.table_size() as u64) as usize
    }

    #[inline]
    pub(crate) fn bucket(&self, idx: usize) -> &Bucket {
        &self.buckets[idx]
    }

    #[inline]
    pub(crate) fn node(&self, k: DefaultKey) -> Option<&Node<K>> {
        self.nodes.get(k)
    }

    #[inline]
    pub(crate) fn next_of(&self, k: DefaultKey) -> Option<DefaultKey> {
        self.nodes.get(k).and_then(|n| n.next)
    }

    /// Iterate the node keys of one chain, head first.
    pub(crate) fn chain(&self, idx: usize) -> Chain<'_, K> {
        Chain {
            nodes: &self.nodes,
            cur: self.buckets[idx].head,
        }
    }

    /// First non-empty bucket at or after `idx`, or the sentinel index.
    pub(crate) fn skip_empty(&self, mut idx: usize) -> (usize, Option<DefaultKey>) {
        loop {
            let b = &self.buckets[idx];
            if b.head.is_some() || b.terminal {
                return (idx, b.head);
            }
            idx += 1;
        }
    }

    /// Position following node `k` in bucket `idx`.
    pub(crate) fn successor(&self, idx: usize, k: DefaultKey) -> (usize, Option<DefaultKey>) {
        match self.next_of(k) {
            Some(next) => (idx, Some(next)),
            None => self.skip_empty(idx + 1),
        }
    }

    pub(crate) fn locate<Q>(&self, hash: u64, q: &Q) -> Option<(usize, DefaultKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let idx = self.slot(hash);
        self.chain(idx)
            .find(|&k| {
                let n = &self.nodes[k];
                n.hash == hash && n.key.borrow() == q
            })
            .map(|k| (idx, k))
    }

    /// Prepend a node to its chain. The caller has checked the key is absent.
    pub(crate) fn push_front(&mut self, key: K, hash: u64) -> (usize, DefaultKey) {
        let idx = self.slot(hash);
        let head = self.buckets[idx].head;
        let k = self.nodes.insert(Node {
            key,
            hash,
            next: head,
        });
        self.buckets[idx].head = Some(k);
        (idx, k)
    }

    /// Unlink and free the node matching `q`, returning its key.
    pub(crate) fn unlink<Q>(&mut self, hash: u64, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let idx = self.slot(hash);
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.buckets[idx].head;
        while let Some(k) = cur {
            let n = &self.nodes[k];
            if n.hash == hash && n.key.borrow() == q {
                let next = n.next;
                match prev {
                    None => self.buckets[idx].head = next,
                    Some(p) => self.nodes[p].next = next,
                }
                return self.nodes.remove(k).map(|n| n.key);
            }
            prev = cur;
            cur = n.next;
        }
        None
    }

    /// Move every node into `buckets`, replacing the current array.
    ///
    /// Old buckets are drained in index order and each chain head first,
    /// each node prepended to its new chain. Node keys survive the move.
    pub(crate) fn relink(&mut self, mut buckets: Vec<Bucket>) {
        debug_assert!(buckets.len() > 1);
        debug_assert!(buckets.last().map_or(false, Bucket::is_terminal));
        let new_size = (buckets.len() - 1) as u64;
        let old = core::mem::take(&mut self.buckets);
        for b in &old[..old.len() - 1] {
            let mut cur = b.head;
            while let Some(k) = cur {
                let n = &mut self.nodes[k];
                cur = n.next;
                let idx = (n.hash % new_size) as usize;
                n.next = buckets[idx].head;
                buckets[idx].head = Some(k);
            }
        }
        self.buckets = buckets;
    }

    /// Fresh table of `table_size` buckets holding a clone of every key.
    pub(crate) fn deep_copy(&self, table_size: usize) -> Self
    where
        K: Clone,
    {
        let mut copy = BucketTable::new(table_size);
        copy.nodes.reserve(self.len());
        for idx in 0..self.table_size() {
            for k in self.chain(idx) {
                let n = &self.nodes[k];
                copy.push_front(n.key.clone(), n.hash);
            }
        }
        copy
    }

    /// Drop every node and start over with `table_size` empty buckets.
    pub(crate) fn reset(&mut self, table_size: usize) {
        self.buckets = alloc_buckets(table_size);
        self.nodes.clear();
    }
}

pub(crate) struct Chain<'a, K> {
    nodes: &'a SlotMap<DefaultKey, Node<K>>,
    cur: Option<DefaultKey>,
}

impl<K> Iterator for Chain<'_, K> {
    type Item = DefaultKey;

    #[inline]
    fn next(&mut self) -> Option<DefaultKey> {
        let k = self.cur?;
        self.cur = self.nodes.get(k).and_then(|n| n.next);
        Some(k)
    }
}
