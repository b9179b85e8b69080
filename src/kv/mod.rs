//! Key-value scratch memory for the bot.

mod memory;

pub use memory::MemoryKv;

/// Minimal key-value store used by chat commands.
pub trait Kv: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);

    /// Remove `key`; returns `true` if it was present.
    fn delete(&self, key: &str) -> bool;
}
