//! Keyed repositories for documents and processing results.
//!
//! Hosting services inject a repository instead of keeping process-wide
//! registries; the in-memory implementation covers tests and single-process
//! hosts.

use std::collections::HashMap;
use std::sync::Mutex;

/// A keyed repository.
pub trait Repository<T>: Send + Sync {
    /// Fetch a value by id.
    fn get(&self, id: &str) -> Option<T>;

    /// Insert or replace a value.
    fn put(&self, id: &str, value: T);

    /// Remove a value. Returns true when something was removed.
    fn delete(&self, id: &str) -> bool;

    /// All stored values, in unspecified order.
    fn list(&self) -> Vec<T>;
}

/// Mutex-guarded in-memory repository.
#[derive(Default)]
pub struct MemoryRepository<T> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone + Send> Repository<T> for MemoryRepository<T> {
    fn get(&self, id: &str) -> Option<T> {
        self.entries.lock().expect("repository lock poisoned").get(id).cloned()
    }

    fn put(&self, id: &str, value: T) {
        self.entries
            .lock()
            .expect("repository lock poisoned")
            .insert(id.to_string(), value);
    }

    fn delete(&self, id: &str) -> bool {
        self.entries
            .lock()
            .expect("repository lock poisoned")
            .remove(id)
            .is_some()
    }

    fn list(&self) -> Vec<T> {
        self.entries
            .lock()
            .expect("repository lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}
