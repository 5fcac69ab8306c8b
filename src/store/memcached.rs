use tracing::info;

use super::SetStore;
use crate::error::StoreError;

/// Blocking memcached client backed by a connection pool.
pub struct MemcachedStore {
    client: memcache::Client,
    expiration: u32,
}

impl MemcachedStore {
    /// Connects to `url` (for example `memcache://127.0.0.1:11211`) with up to
    /// `pool_size` pooled connections. Items are stored without expiry.
    pub fn connect(url: &str, pool_size: u32) -> Result<Self, StoreError> {
        let client = memcache::Client::with_pool_size(url, pool_size.max(1))?;
        info!(url, pool_size, "connected to memcached");
        Ok(Self {
            client,
            expiration: 0,
        })
    }

    /// Server versions keyed by address.
    pub fn version(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self.client.version()?)
    }
}

impl SetStore for MemcachedStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.client.set(key, value, self.expiration)?;
        Ok(())
    }
}
