use std::time::Duration;

pub mod memcached_set;
pub mod preflight;
pub mod redis_mget;

/// Durations from repeated runs of the same read benchmark.
#[derive(Debug, Clone)]
pub struct TrialReport {
    pub samples: Vec<Duration>,
    pub workers: usize,
    pub keys_per_worker: usize,
}

impl TrialReport {
    pub fn new(workers: usize, keys_per_worker: usize) -> Self {
        Self {
            samples: Vec::new(),
            workers,
            keys_per_worker,
        }
    }

    pub fn record(&mut self, sample: Duration) {
        self.samples.push(sample);
    }

    /// Arithmetic mean of the samples, zero when there are none.
    pub fn mean(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let sum: u128 = self.samples.iter().map(Duration::as_nanos).sum();
        let nanos = sum / self.samples.len() as u128;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub fn mean_millis(&self) -> f64 {
        self.mean().as_secs_f64() * 1000.0
    }

    /// Keys per second over the mean trial: `workers * keys_per_worker * 1000 / mean_ms`.
    pub fn qps(&self) -> Option<f64> {
        let mean_ms = self.mean_millis();
        if mean_ms > 0.0 {
            Some((self.workers * self.keys_per_worker) as f64 * 1000.0 / mean_ms)
        } else {
            None
        }
    }
}
