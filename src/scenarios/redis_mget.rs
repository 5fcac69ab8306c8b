use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::TrialReport;
use crate::error::BenchError;
use crate::key::format_key;
use crate::partition::{self, WorkRange};
use crate::store::{MultiGetSession, MultiGetStore};

#[derive(Debug, Clone, Copy)]
pub struct GetPlan {
    pub total_items: usize,
    pub workers: usize,
    pub batch_size: usize,
}

impl GetPlan {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.workers == 0 {
            return Err(BenchError::InvalidPlan("MGET needs at least one worker"));
        }
        if self.batch_size == 0 {
            return Err(BenchError::InvalidPlan("MGET batch size must be non-zero"));
        }
        Ok(())
    }

    pub fn keys_per_worker(&self) -> usize {
        self.total_items / self.workers.max(1)
    }
}

/// What one worker did during a trial.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReads {
    pub keys: usize,
    pub hits: usize,
    pub batches: usize,
}

impl WorkerReads {
    fn merge(&mut self, other: &WorkerReads) {
        self.keys += other.keys;
        self.hits += other.hits;
        self.batches += other.batches;
    }
}

/// A single run of every worker.
#[derive(Debug, Clone, Copy)]
pub struct TrialSample {
    pub elapsed: Duration,
    pub reads: WorkerReads,
}

/// Runs one trial: every worker reads its range in `batch_size` MGETs over
/// its own session. Returns once all workers have finished.
///
/// On the first failed read the remaining workers are aborted and the
/// error is returned.
pub async fn run<S: MultiGetStore>(store: &S, plan: &GetPlan) -> Result<TrialSample, BenchError> {
    plan.validate()?;
    let ranges = partition::partition(plan.total_items, plan.workers);

    let start = Instant::now();
    let mut tasks = JoinSet::new();
    for (worker, range) in ranges.into_iter().enumerate() {
        let session = store.session(worker);
        tasks.spawn(read_range(session, worker, range, plan.batch_size));
    }

    let mut reads = WorkerReads::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(worker_reads)) => reads.merge(&worker_reads),
            Ok(Err(e)) => {
                tasks.shutdown().await;
                return Err(e);
            }
            Err(e) => {
                tasks.shutdown().await;
                return Err(e.into());
            }
        }
    }

    Ok(TrialSample {
        elapsed: start.elapsed(),
        reads,
    })
}

async fn read_range<T: MultiGetSession>(
    mut session: T,
    worker: usize,
    range: WorkRange,
    batch_size: usize,
) -> Result<WorkerReads, BenchError> {
    debug!(worker, start = range.start, end = range.end, "MGET worker started");
    let mut reads = WorkerReads::default();
    let mut keys = Vec::with_capacity(batch_size);
    for batch in range.batches(batch_size) {
        keys.clear();
        keys.extend(batch.indices().map(format_key));
        match session.mget(&keys).await {
            Ok(found) => reads.hits += found,
            Err(source) => {
                return Err(BenchError::Store {
                    worker,
                    op: "MGET",
                    key: keys.swap_remove(0),
                    source,
                });
            }
        }
        reads.keys += keys.len();
        reads.batches += 1;
    }
    debug!(worker, keys = reads.keys, hits = reads.hits, "MGET worker finished");
    Ok(reads)
}

/// Runs `trials` sequential trials and collects their durations. Each trial
/// starts only after every worker of the previous one has joined; the first
/// failing trial ends the run.
pub async fn run_trials<S: MultiGetStore>(
    store: &S,
    plan: &GetPlan,
    trials: usize,
) -> Result<TrialReport, BenchError> {
    plan.validate()?;
    if trials == 0 {
        return Err(BenchError::InvalidPlan("at least one trial is required"));
    }
    let dropped = partition::dropped(plan.total_items, plan.workers);
    if dropped > 0 {
        warn!(dropped, "MGET item count is not a multiple of the worker count; tail is skipped");
    }

    println!("NUM Threads: {}", plan.workers);
    let mut report = TrialReport::new(plan.workers, plan.keys_per_worker());
    for trial in 1..=trials {
        let sample = run(store, plan).await?;
        println!(
            "Trial {}/{}: {} keys read ({} found) in {:?}, {} threads, batch {}",
            trial,
            trials,
            sample.reads.keys,
            sample.reads.hits,
            sample.elapsed,
            plan.workers,
            plan.batch_size
        );
        report.record(sample.elapsed);
    }
    Ok(report)
}
