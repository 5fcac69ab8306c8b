use redis::aio::MultiplexedConnection;
use tracing::{debug, info};

use super::{MultiGetSession, MultiGetStore};
use crate::error::StoreError;
use crate::key::{format_key, format_value};
use crate::partition::WorkRange;

/// Redis client holding a fixed set of multiplexed connections opened up
/// front. Workers are assigned connections round-robin.
pub struct RedisStore {
    connections: Vec<MultiplexedConnection>,
}

impl RedisStore {
    pub async fn connect(url: &str, connections: usize) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let count = connections.max(1);
        let mut opened = Vec::with_capacity(count);
        for _ in 0..count {
            opened.push(client.get_multiplexed_async_connection().await?);
        }
        info!(url, connections = count, "connected to redis");
        Ok(Self {
            connections: opened,
        })
    }

    pub async fn ping(&self) -> Result<String, StoreError> {
        let mut con = self.connections[0].clone();
        let pong: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(pong)
    }

    /// Writes `format_key(i) -> format_value(i)` for every index in `range`,
    /// pipelining `batch_size` SETs per round trip.
    pub async fn seed(&self, range: WorkRange, batch_size: usize) -> Result<usize, StoreError> {
        let mut con = self.connections[0].clone();
        let mut written = 0;
        for batch in range.batches(batch_size) {
            let mut pipe = redis::pipe();
            for i in batch.indices() {
                pipe.set(format_key(i), format_value(i)).ignore();
            }
            let _: () = pipe.query_async(&mut con).await?;
            written += batch.len();
        }
        debug!(written, "seeded redis keyspace");
        Ok(written)
    }
}

impl MultiGetStore for RedisStore {
    type Session = RedisSession;

    fn session(&self, worker: usize) -> RedisSession {
        RedisSession {
            con: self.connections[worker % self.connections.len()].clone(),
        }
    }
}

pub struct RedisSession {
    con: MultiplexedConnection,
}

impl MultiGetSession for RedisSession {
    async fn mget(&mut self, keys: &[String]) -> Result<usize, StoreError> {
        let values: Vec<Option<Vec<u8>>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut self.con)
            .await?;
        Ok(values.iter().filter(|v| v.is_some()).count())
    }
}
