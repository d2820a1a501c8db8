//! Uniqueness registry.
//!
//! The registry is the set of every code issued in the current run plus any
//! codes seeded from earlier catalogs. [`CodeRegistry::register`] is a single
//! check-and-insert step: it either records the code and returns `true`, or
//! leaves the set untouched and returns `false`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::code::Gtin;

pub trait CodeRegistry {
    /// Record `code` if absent. Returns `false` without mutating if present.
    fn register(&mut self, code: &Gtin) -> bool;

    fn contains(&self, code: &Gtin) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bulk-preload codes. Returns how many were new.
    fn seed<I>(&mut self, codes: I) -> usize
    where
        I: IntoIterator<Item = Gtin>,
        Self: Sized,
    {
        let added = codes.into_iter().filter(|c| self.register(c)).count();
        debug!("Registry: seeded {} codes, {} total", added, self.len());
        added
    }
}

/// Single-threaded registry backed by a `HashSet`.
#[derive(Debug, Clone, Default)]
pub struct UniquenessRegistry {
    issued: HashSet<Gtin>,
}

impl UniquenessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            issued: HashSet::with_capacity(capacity),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gtin> + '_ {
        self.issued.iter()
    }

    pub fn clear(&mut self) {
        self.issued.clear();
    }
}

impl CodeRegistry for UniquenessRegistry {
    fn register(&mut self, code: &Gtin) -> bool {
        if self.issued.contains(code) {
            return false;
        }
        self.issued.insert(code.clone())
    }

    fn contains(&self, code: &Gtin) -> bool {
        self.issued.contains(code)
    }

    fn len(&self) -> usize {
        self.issued.len()
    }
}

impl FromIterator<Gtin> for UniquenessRegistry {
    fn from_iter<I: IntoIterator<Item = Gtin>>(iter: I) -> Self {
        Self {
            issued: iter.into_iter().collect(),
        }
    }
}

/// Clonable handle to one registry shared between workers.
///
/// Every clone sees the same set. `register` holds the lock across the
/// check and the insert, so two workers racing on the same candidate can
/// never both win.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<UniquenessRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, UniquenessRegistry> {
        // set is consistent even when poisoned
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Same as [`CodeRegistry::register`] but through a shared reference.
    pub fn try_register(&self, code: &Gtin) -> bool {
        self.lock().register(code)
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> UniquenessRegistry {
        self.lock().clone()
    }
}

impl From<UniquenessRegistry> for SharedRegistry {
    fn from(registry: UniquenessRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }
}

impl CodeRegistry for SharedRegistry {
    fn register(&mut self, code: &Gtin) -> bool {
        self.try_register(code)
    }

    fn contains(&self, code: &Gtin) -> bool {
        self.lock().contains(code)
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
