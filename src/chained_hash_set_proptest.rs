#![cfg(test)]

// Property tests for ChainedHashSet kept inside the crate so they can check
// bucket-level invariants that the public API does not expose.

use crate::chained_hash_set::ChainedHashSet;
use crate::cursor::Cursor;
use crate::options::SetOptions;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves towards earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    InsertAll(Vec<usize>),
    Erase(usize),
    Find(usize),
    Count(String),
    Reserve(usize),
    Rehash(usize),
    Clear,
    Walk,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let count_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => idx.clone().prop_map(Op::Insert),
            2 => proptest::collection::vec(idx.clone(), 0..8).prop_map(Op::InsertAll),
            3 => idx.clone().prop_map(Op::Erase),
            2 => idx.clone().prop_map(Op::Find),
            2 => prop_oneof![count_pool.prop_map(|s: String| s), "[a-z]{0,4}".prop_map(|s| s)]
                .prop_map(Op::Count),
            1 => (0usize..64).prop_map(Op::Reserve),
            1 => (0usize..64).prop_map(Op::Rehash),
            1 => Just(Op::Clear),
            1 => Just(Op::Walk),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Structural checks after every step: size bounds, sentinel placement and
/// home-chain placement of each key.
fn check_structure<S: BuildHasher>(
    sut: &ChainedHashSet<Key, S>,
) -> Result<(), TestCaseError> {
    let size = sut.table_size();
    prop_assert!(size >= sut.min_capacity());
    prop_assert!(
        sut.options().fits(size, sut.len()),
        "len {} over capacity of {}",
        sut.len(),
        size
    );

    let t = sut.table();
    for idx in 0..size {
        prop_assert!(!t.bucket(idx).is_terminal());
    }
    prop_assert!(t.bucket(size).is_terminal());
    prop_assert!(t.chain(size).next().is_none());

    let mut linked = 0;
    for idx in 0..size {
        for k in t.chain(idx) {
            let key = &t.node(k).expect("linked node is live").key;
            prop_assert_eq!(t.slot(sut.hasher().hash_one(key)), idx);
            linked += 1;
        }
    }
    prop_assert_eq!(linked, sut.len());
    Ok(())
}

fn run_state_machine<S>(
    mut sut: ChainedHashSet<Key, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashSet<Key> = HashSet::new();
    // Cursors taken at insert time and not yet invalidated.
    let mut live: HashMap<Key, Cursor> = HashMap::new();
    let mut stale: Vec<Cursor> = Vec::new();

    for op in ops {
        let size_before = sut.table_size();
        match op {
            Op::Insert(i) => {
                let k = key_from(&pool, i);
                let already = model.contains(&k);
                let (c, inserted) = sut.insert(k.clone());
                prop_assert_eq!(inserted, !already);
                prop_assert_eq!(c.key(&sut), Some(&k));
                if already {
                    prop_assert_eq!(
                        sut.table_size(),
                        size_before,
                        "duplicate insert must not grow"
                    );
                }
                if sut.table_size() != size_before {
                    stale.extend(live.drain().map(|(_, c)| c));
                }
                model.insert(k.clone());
                live.insert(k, c);
            }
            Op::InsertAll(is) => {
                let keys: Vec<Key> = is.iter().map(|&i| key_from(&pool, i)).collect();
                sut.insert_all(keys.iter().cloned());
                model.extend(keys);
                // Any growth during the batch invalidates older cursors.
                if sut.table_size() != size_before {
                    stale.extend(live.drain().map(|(_, c)| c));
                }
            }
            Op::Erase(i) => {
                let k = key_from(&pool, i);
                let expected = usize::from(model.remove(&k));
                prop_assert_eq!(sut.erase(&k), expected);
                prop_assert_eq!(sut.count(&k), 0);
                if let Some(c) = live.remove(&k) {
                    stale.push(c);
                }
            }
            Op::Find(i) => {
                let k = key_from(&pool, i);
                let c = sut.find(&k);
                prop_assert_eq!(c.is_end(), !model.contains(&k));
                if !c.is_end() {
                    prop_assert_eq!(c.key(&sut), Some(&k));
                } else {
                    prop_assert_eq!(c, sut.end());
                }
            }
            Op::Count(s) => {
                let expected = usize::from(model.iter().any(|k| k.0 == s));
                prop_assert_eq!(sut.count(s.as_str()), expected);
            }
            Op::Reserve(n) => {
                sut.reserve(n);
                prop_assert!(sut.options().fits(sut.table_size(), n));
                if sut.options().fits(size_before, n) {
                    prop_assert_eq!(sut.table_size(), size_before);
                } else {
                    stale.extend(live.drain().map(|(_, c)| c));
                }
            }
            Op::Rehash(n) => {
                sut.rehash(n);
                prop_assert!(sut.table_size() >= n);
                // Always a rebuild, even when the size is unchanged.
                stale.extend(live.drain().map(|(_, c)| c));
            }
            Op::Clear => {
                sut.clear();
                prop_assert_eq!(sut.table_size(), sut.min_capacity());
                stale.extend(live.drain().map(|(_, c)| c));
                model.clear();
            }
            Op::Walk => {
                let mut seen = BTreeSet::new();
                let mut c = sut.begin();
                let mut steps = 0;
                while c != sut.end() {
                    let k = c.key(&sut).expect("walk stays on live keys").clone();
                    prop_assert!(seen.insert(k), "walk yields each key once");
                    c = c.advance(&sut);
                    steps += 1;
                }
                prop_assert_eq!(steps, sut.len());
                let m: BTreeSet<_> = model.iter().cloned().collect();
                prop_assert_eq!(seen, m);
            }
        }

        for c in &stale {
            prop_assert!(c.key(&sut).is_none(), "stale cursor must not resolve");
        }
        for (k, c) in &live {
            prop_assert_eq!(c.key(&sut), Some(k));
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().len(), model.len());
        check_structure(&sut)?;
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashSet.
// - insert reports `inserted` iff the model lacked the key; duplicates never grow.
// - erase/count/find agree with the model, borrowed lookups included.
// - reserve is a no-op when the request already fits.
// - cursors resolve while live and stop resolving after erase or any rebuild.
// - after every op: load factor bound, min capacity, sentinel and home-chain placement.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: ChainedHashSet<Key> = ChainedHashSet::new();
        run_state_machine(sut, pool, ops)?;
    }
}

// Same invariants with a small min capacity and a load factor above one,
// so chains grow long before the table does.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_dense_options((pool, ops) in arb_scenario()) {
        let opts = SetOptions::new()
            .with_min_capacity(1)
            .unwrap()
            .with_max_load_factor(3.0)
            .unwrap();
        let sut: ChainedHashSet<Key> = ChainedHashSet::with_options(opts);
        run_state_machine(sut, pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares one chain.
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
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: ChainedHashSet<Key, ConstBuildHasher> =
            ChainedHashSet::with_hasher(ConstBuildHasher);
        run_state_machine(sut, pool, ops)?;
    }
}

// Property: a clone compares equal, keeps the table size `reserve(len)` gives
// a fresh set, and diverges independently afterwards.
proptest! {
    #[test]
    fn prop_clone_independent(
        keys in proptest::collection::vec(0u32..500, 0..120),
        extra in 500u32..1000,
    ) {
        let mut a: ChainedHashSet<u32> = ChainedHashSet::new();
        a.insert_all(keys.iter().copied());
        let mut b = a.clone();
        prop_assert!(a == b);

        let mut fresh: ChainedHashSet<u32> = ChainedHashSet::new();
        fresh.reserve(a.len());
        prop_assert_eq!(b.table_size(), fresh.table_size());

        b.insert(extra);
        if let Some(&k) = keys.first() {
            b.erase(&k);
            prop_assert_eq!(a.count(&k), 1);
        }
        prop_assert_eq!(a.count(&extra), 0);
        prop_assert!(a != b);
    }
}
