use thiserror::Error;

/// Failure reported by a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("memcached: {0}")]
    Memcached(#[from] memcache::MemcacheError),

    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("backend: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("worker {worker}: {op} starting at {key} failed")]
    Store {
        worker: usize,
        op: &'static str,
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("worker {worker} panicked")]
    WorkerPanic { worker: usize },

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid benchmark plan: {0}")]
    InvalidPlan(&'static str),
}
