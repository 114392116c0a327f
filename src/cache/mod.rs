//! Token cache collaborator.
//!
//! The client only needs key-level `has`/`get`/`set`/`delete`; any store that
//! offers them (shared map, Redis, file) can back the token cache.

pub mod memory;

use std::future::Future;

pub use memory::InMemoryCache;

pub trait CacheStore: Send + Sync {
    fn has(&self, key: &str) -> impl Future<Output = bool> + Send;

    fn get(&self, key: &str) -> impl Future<Output = Option<String>> + Send;

    /// Stores `value` for `ttl_seconds`; expired entries read as absent.
    fn set(&self, key: &str, value: String, ttl_seconds: u64) -> impl Future<Output = ()> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = ()> + Send;
}
