//! Debug-only detection of nested entry into a set.
//!
//! Lookups and inserts call `K: Hash` and `K: Eq`, which are user code. If
//! that code reaches back into the same set while a chain is being walked
//! or relinked, the walk may observe a half-updated table. Debug builds
//! turn that into a panic naming both operations; release builds compile
//! the check away.

#[cfg(debug_assertions)]
use core::cell::Cell;

#[derive(Debug, Default)]
pub(crate) struct ReentrancyCheck {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
}

impl ReentrancyCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
        }
    }

    /// Mark `op` as running until the returned section is dropped.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> Section<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.replace(Some(op)) {
                panic!("reentrant call to `{op}` while `{outer}` is running on the same set");
            }
            Section { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            Section {
                _owner: core::marker::PhantomData,
            }
        }
    }
}

pub(crate) struct Section<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentrancyCheck,
    #[cfg(not(debug_assertions))]
    _owner: core::marker::PhantomData<&'a ReentrancyCheck>,
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(None);
    }
}
