use crate::error::StoreError;
use crate::store::{MemcachedStore, RedisStore};

/// Confirms the memcached pool can reach every server.
pub fn memcached(store: &MemcachedStore) -> Result<(), StoreError> {
    println!("🧪 Checking memcached...");
    let versions = store.version()?;
    if versions.is_empty() {
        return Err(StoreError::Backend("memcached reported no servers".into()));
    }
    for (server, version) in versions {
        println!("   {} -> memcached {}", server, version);
    }
    Ok(())
}

pub async fn redis(store: &RedisStore) -> Result<(), StoreError> {
    println!("🧪 Checking redis...");
    let pong = store.ping().await?;
    if pong != "PONG" {
        return Err(StoreError::Backend(format!("unexpected PING reply: {pong}")));
    }
    println!("   PING -> {}", pong);
    Ok(())
}
