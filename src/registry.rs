//! Ordered callback registries with unregister handles.
//!
//! The router keeps its guards and listeners in a [`Registry`]. Entries keep
//! registration order, and [`Registration::unregister`] removes an entry at
//! most once: calling it again, or after the registry is gone, does nothing.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

struct Entries<T> {
    next_id: u64,
    items: Vec<(u64, T)>,
}

/// Thread-safe ordered list of `T`.
pub struct Registry<T> {
    entries: Arc<Mutex<Entries<T>>>,
}

impl<T: Clone + Send + 'static> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries {
                next_id: 0,
                items: Vec::new(),
            })),
        }
    }

    /// Append an entry and return its handle.
    pub fn add(&self, item: T) -> Registration {
        let id = {
            let mut entries = self.entries.lock();
            let id = entries.next_id;
            entries.next_id += 1;
            entries.items.push((id, item));
            id
        };

        let weak: Weak<Mutex<Entries<T>>> = Arc::downgrade(&self.entries);
        Registration {
            remove: Arc::new(move || {
                weak.upgrade().is_some_and(|entries| {
                    let mut entries = entries.lock();
                    let before = entries.items.len();
                    entries.items.retain(|(entry_id, _)| *entry_id != id);
                    entries.items.len() != before
                })
            }),
        }
    }

    /// Clone the current entries, in registration order.
    ///
    /// Callers iterate the snapshot so no lock is held while callbacks run.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries
            .lock()
            .items
            .iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().items.len()
    }

    /// Return `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned when a guard or listener is added.
///
/// Dropping the handle does **not** unregister; call
/// [`unregister`](Self::unregister).
#[derive(Clone)]
pub struct Registration {
    remove: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Registration {
    /// Remove the entry. Returns `true` if this call removed it, `false` if
    /// it was already gone.
    pub fn unregister(&self) -> bool {
        (self.remove)()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}
