//! Throughput harness for two caches: memcached single-key SETs and Redis
//! batched MGETs, each spread across a fixed pool of concurrent workers.

pub mod error;
pub mod key;
pub mod partition;
pub mod scenarios;
pub mod store;

pub use error::{BenchError, StoreError};
