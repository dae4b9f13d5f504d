//! Listener registration state for one contract.
//!
//! One strong primary slot plus an unordered collection of weak secondary
//! references. There is no remove operation: a secondary detaches by letting
//! its last strong reference expire, after which the dead entry is pruned the
//! next time the collection is scanned.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

pub(crate) struct ListenerRegistry<T: ?Sized> {
    primary: RwLock<Option<Arc<T>>>,
    secondaries: RwLock<Vec<Weak<T>>>,
}

impl<T: ?Sized> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            primary: RwLock::new(None),
            secondaries: RwLock::new(Vec::new()),
        }
    }

    /// Replaces the primary slot; `None` clears it.
    pub fn set_primary(&self, listener: Option<Arc<T>>) {
        *self.primary.write() = listener;
    }

    pub fn primary(&self) -> Option<Arc<T>> {
        self.primary.read().clone()
    }

    pub fn has_primary(&self) -> bool {
        self.primary.read().is_some()
    }

    /// Inserts a weak secondary reference.
    ///
    /// Re-adding a reference that is already present is a no-op; dead entries
    /// are pruned in passing. Returns whether the reference was inserted.
    pub fn add(&self, listener: &Arc<T>) -> bool {
        let mut secondaries = self.secondaries.write();
        secondaries.retain(|entry| entry.strong_count() > 0);

        let candidate = Arc::downgrade(listener);
        if secondaries.iter().any(|entry| Weak::ptr_eq(entry, &candidate)) {
            return false;
        }
        secondaries.push(candidate);
        true
    }

    /// A live snapshot of the secondary collection.
    ///
    /// The order is insertion order after pruning; callers must not rely on
    /// it being stable across registrations.
    pub fn secondaries(&self) -> Vec<Arc<T>> {
        let mut secondaries = self.secondaries.write();
        secondaries.retain(|entry| entry.strong_count() > 0);
        secondaries.iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of live secondary references.
    pub fn secondary_count(&self) -> usize {
        self.secondaries().len()
    }
}
