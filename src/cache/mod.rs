//! Cache module - bounded in-memory caching using Moka.
//!
//! - `CacheConfig` - capacity and expiry settings
//! - `TypedCache` - thread-safe, clone-friendly typed cache
//!
//! ```rust
//! let cache: TypedCache<String, String> = TypedCache::new("kv", CacheConfig::default());
//! cache.insert("greeting".to_string(), "hello".to_string());
//! ```

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
