//! In-process stand-ins for the memcached and Redis stores.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cachebench::store::{MultiGetSession, MultiGetStore, SetStore};
use cachebench::StoreError;

// =============================================================================
// SET
// =============================================================================

#[derive(Default)]
pub struct FakeSetStore {
    pub items: Mutex<HashMap<String, Vec<u8>>>,
    pub overwrites: AtomicUsize,
    pub calls: AtomicUsize,
    /// 1-based call number that fails.
    pub fail_on: Option<usize>,
    /// 1-based call number that panics.
    pub panic_on: Option<usize>,
    pub delay: Duration,
}

impl FakeSetStore {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    pub fn panicking_on(call: usize) -> Self {
        Self {
            panic_on: Some(call),
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.items.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

impl SetStore for FakeSetStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.delay > Duration::ZERO {
            std::thread::sleep(self.delay);
        }
        if self.panic_on == Some(call) {
            panic!("injected panic on call {call}");
        }
        if self.fail_on == Some(call) {
            return Err(StoreError::Backend(format!("injected failure on call {call}")));
        }
        if self
            .items
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_vec())
            .is_some()
        {
            self.overwrites.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// =============================================================================
// MGET
// =============================================================================

#[derive(Default)]
pub struct Shared {
    pub calls: AtomicUsize,
    pub trials: AtomicUsize,
    pub batches: Mutex<Vec<(usize, Vec<String>)>>,
    pub fail_on: Option<usize>,
    /// Per-call delay in trial `k` (1-based) is `delay * k`.
    pub delay: Duration,
}

#[derive(Clone, Default)]
pub struct FakeGetStore {
    pub shared: Arc<Shared>,
}

impl FakeGetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                delay,
                ..Shared::default()
            }),
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                fail_on: Some(call),
                ..Shared::default()
            }),
        }
    }

    pub fn calls(&self) -> usize {
        self.shared.calls.load(Ordering::SeqCst)
    }

    pub fn trials(&self) -> usize {
        self.shared.trials.load(Ordering::SeqCst)
    }

    pub fn batches_for(&self, worker: usize) -> Vec<Vec<String>> {
        self.shared
            .batches
            .lock()
            .unwrap()
            .iter()
            .filter(|(w, _)| *w == worker)
            .map(|(_, keys)| keys.clone())
            .collect()
    }
}

impl MultiGetStore for FakeGetStore {
    type Session = FakeSession;

    // Worker 0's session is opened first in every trial.
    fn session(&self, worker: usize) -> FakeSession {
        if worker == 0 {
            self.shared.trials.fetch_add(1, Ordering::SeqCst);
        }
        let trial = self.shared.trials.load(Ordering::SeqCst) as u32;
        FakeSession {
            shared: Arc::clone(&self.shared),
            worker,
            delay: self.shared.delay * trial,
        }
    }
}

pub struct FakeSession {
    shared: Arc<Shared>,
    worker: usize,
    delay: Duration,
}

impl MultiGetSession for FakeSession {
    async fn mget(&mut self, keys: &[String]) -> Result<usize, StoreError> {
        let call = self.shared.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        if self.shared.fail_on == Some(call) {
            return Err(StoreError::Backend(format!("injected failure on call {call}")));
        }
        self.shared
            .batches
            .lock()
            .unwrap()
            .push((self.worker, keys.to_vec()));
        Ok(keys.len())
    }
}
