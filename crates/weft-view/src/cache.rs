#![forbid(unsafe_code)]

//! Element content caching.
//!
//! A cache hit short-circuits element resolution, evaluation, and event
//! dispatch entirely. Entries are fully computed before being written and
//! treated as immutable once stored, so concurrent render passes sharing
//! one store never observe partial content.

use std::collections::HashMap;
use std::sync::RwLock;

/// Store contract for cached element output.
pub trait ElementCache: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
}

/// In-process cache over a read/write-locked map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElementCache for MemoryCache {
    fn read(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            // First write wins; entries are immutable once stored.
            entries
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }
}
