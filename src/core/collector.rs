use std::sync::{Arc, Mutex, PoisonError};

/// Append-only bag shared by every execution unit of one dispatch run.
///
/// Clones share the same storage. Inserts take a short internal lock, so
/// callers never coordinate with each other. Iteration order is insertion
/// order, which is completion order and unrelated to input order.
#[derive(Debug)]
pub struct ResponseCollector<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for ResponseCollector<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for ResponseCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResponseCollector<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn insert(&self, entry: T) {
        // A panicking inserter cannot leave a half-pushed Vec behind.
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes ownership of everything collected so far.
    ///
    /// Intended to be called once all inserters have been joined; any clone
    /// still alive at that point is left holding an empty bag.
    pub fn into_entries(self) -> Vec<T> {
        match Arc::try_unwrap(self.entries) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => {
                let mut entries = shared.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *entries)
            }
        }
    }
}
