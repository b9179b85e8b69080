//! In-process [`Kv`] backed by a bounded Moka cache.

use tracing::debug;

use super::Kv;
use crate::cache::{CacheConfig, TypedCache};

/// Process-local memory; contents are lost on restart.
#[derive(Debug, Clone)]
pub struct MemoryKv {
    entries: TypedCache<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::scratch_memory())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: TypedCache::new("kv_memory", config),
        }
    }

    /// Number of live entries.
    #[allow(dead_code)]
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

impl Kv for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(&key.to_string())
    }

    fn set(&self, key: &str, value: String) {
        debug!("kv set {}", key);
        self.entries.insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.remove(&key.to_string()).is_some()
    }
}
