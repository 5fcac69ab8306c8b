//! Seams to the two external caches.
//!
//! Writes go through a blocking client shared by reference across worker
//! threads. Reads are async and each worker drives its own session.

use std::future::Future;

use crate::error::StoreError;

pub mod memcached;
pub mod redis;

pub use self::memcached::MemcachedStore;
pub use self::redis::RedisStore;

/// A store that accepts single-key writes from many threads at once.
pub trait SetStore: Sync {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// A store that hands out one multi-key read session per worker.
pub trait MultiGetStore {
    type Session: MultiGetSession;

    fn session(&self, worker: usize) -> Self::Session;
}

pub trait MultiGetSession: Send + 'static {
    /// Reads `keys` in one round trip and returns how many were found.
    fn mget(&mut self, keys: &[String]) -> impl Future<Output = Result<usize, StoreError>> + Send;
}
