//! Persisted key-value preferences.
//!
//! The theme controller reads and writes through [`PreferenceStore`] so the
//! storage medium can be swapped without touching theme logic. In the browser
//! this is `localStorage`; tests and storage-less hosts use [`MemoryStore`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(test)]
#[path = "prefs_test.rs"]
mod prefs_test;

pub trait PreferenceStore: 'static {
    fn get(&self, key: &str) -> Option<String>;
    /// Best-effort write. Failures are logged by the implementation.
    fn set(&self, key: &str, value: &str);
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.set(key, value);
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_owned(), value.to_owned());
    }
}

impl<S: PreferenceStore> PreferenceStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }
}
