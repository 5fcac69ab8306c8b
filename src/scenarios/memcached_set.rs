use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::BenchError;
use crate::key::{format_key, format_value};
use crate::partition::{self, WorkRange};
use crate::store::SetStore;

#[derive(Debug, Clone, Copy)]
pub struct SetPlan {
    pub total_items: usize,
    pub workers: usize,
}

impl SetPlan {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.workers == 0 {
            return Err(BenchError::InvalidPlan("SET needs at least one worker"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetOutcome {
    pub elapsed: Duration,
    pub keys_written: usize,
}

/// Writes every key of the plan with one thread per worker range and returns
/// the wall-clock time from spawning the first worker to joining the last.
///
/// The first failed write stops the other workers at their next key and is
/// returned; nothing is measured in that case.
pub fn run<S: SetStore>(store: &S, plan: &SetPlan) -> Result<SetOutcome, BenchError> {
    plan.validate()?;
    let ranges = partition::partition(plan.total_items, plan.workers);
    let dropped = partition::dropped(plan.total_items, plan.workers);
    if dropped > 0 {
        warn!(dropped, "SET item count is not a multiple of the worker count; tail is skipped");
    }

    let abort = AtomicBool::new(false);
    let start = Instant::now();
    let results: Vec<Result<usize, BenchError>> = thread::scope(|s| {
        let handles: Vec<_> = ranges
            .iter()
            .enumerate()
            .map(|(worker, &range)| {
                let abort = &abort;
                s.spawn(move || write_range(store, worker, range, abort))
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(BenchError::WorkerPanic { worker }))
            })
            .collect()
    });
    let elapsed = start.elapsed();

    let mut keys_written = 0;
    for result in results {
        keys_written += result?;
    }
    Ok(SetOutcome {
        elapsed,
        keys_written,
    })
}

fn write_range<S: SetStore>(
    store: &S,
    worker: usize,
    range: WorkRange,
    abort: &AtomicBool,
) -> Result<usize, BenchError> {
    debug!(worker, start = range.start, end = range.end, "SET worker started");
    let _guard = AbortOnPanic(abort);
    let mut written = 0;
    for i in range.indices() {
        if abort.load(Ordering::Relaxed) {
            debug!(worker, written, "SET worker stopped early");
            return Ok(written);
        }
        let key = format_key(i);
        let value = format_value(i);
        if let Err(source) = store.set(&key, value.as_bytes()) {
            abort.store(true, Ordering::Relaxed);
            return Err(BenchError::Store {
                worker,
                op: "SET",
                key,
                source,
            });
        }
        written += 1;
    }
    debug!(worker, written, "SET worker finished");
    Ok(written)
}

/// Raises the abort flag if the worker thread unwinds, so siblings stop
/// without waiting for the join loop to reach the panicked handle.
struct AbortOnPanic<'a>(&'a AtomicBool);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::Relaxed);
        }
    }
}
