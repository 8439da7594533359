//! Parsed side documentation of external modules.
//!
//! Entries are keyed on the module's address and hold only a weak
//! reference to it, so the cache never keeps an unloaded module alive. A
//! lookup whose weak reference no longer points at the same module parses
//! again.

use crate::docs::ModuleDocs;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use throwdoc_model::ExternalModule;
use tracing::{debug, warn};

struct CacheEntry {
    module: Weak<ExternalModule>,
    docs: Arc<ModuleDocs>,
}

#[derive(Default)]
pub struct DocumentationCache {
    entries: DashMap<usize, CacheEntry>,
}

impl DocumentationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(module: &Arc<ExternalModule>) -> usize {
        Arc::as_ptr(module) as usize
    }

    /// Parsed documentation file of `module`; empty when it has none or the
    /// file is malformed.
    pub fn get(&self, module: &Arc<ExternalModule>) -> Arc<ModuleDocs> {
        let key = Self::key(module);
        if let Some(entry) = self.entries.get(&key)
            && let Some(live) = entry.module.upgrade()
            && Arc::ptr_eq(&live, module)
        {
            return Arc::clone(&entry.docs);
        }

        let docs = Arc::new(Self::load(module));
        let entry = CacheEntry {
            module: Arc::downgrade(module),
            docs: Arc::clone(&docs),
        };
        // A concurrent load of the same live module may have committed
        // first; both parsed the same text.
        let mut slot = self.entries.entry(key).or_insert(entry);
        let current = slot.module.upgrade().is_some_and(|live| Arc::ptr_eq(&live, module));
        if !current {
            slot.module = Arc::downgrade(module);
            slot.docs = Arc::clone(&docs);
        }
        Arc::clone(&slot.docs)
    }

    fn load(module: &ExternalModule) -> ModuleDocs {
        let Some(xml) = module.documentation_xml.as_deref() else {
            return ModuleDocs::default();
        };
        match ModuleDocs::parse(xml) {
            Ok(docs) => {
                debug!(module = %module.name, members = docs.len(), "loaded documentation file");
                docs
            }
            Err(error) => {
                warn!(module = %module.name, %error, "ignoring unreadable documentation file");
                ModuleDocs::default()
            }
        }
    }

    /// Drop entries whose module is gone.
    pub fn purge(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.module.strong_count() > 0);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/doc_cache_tests.rs"]
mod tests;
