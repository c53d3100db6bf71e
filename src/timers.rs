// Named timing registry shared by the pipeline stages. Callers own it and pass
// it into the lister; nothing here is global.

use std::future::Future;
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TimerStats {
    pub count: usize,
    pub total: Duration,
    pub average: Duration,
    pub max: Duration,
}

#[derive(Debug, Default)]
pub struct Timers {
    timings: DashMap<String, TimerStats>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Instant {
        Instant::now()
    }

    pub fn end(&self, name: &str, started: Instant) -> Duration {
        let elapsed = started.elapsed();
        self.record(name, elapsed);
        elapsed
    }

    // Runs `stage` and records its duration under `name`, whatever it returns.
    // A stage dropped before completing is not recorded.
    pub async fn time<F: Future>(&self, name: &str, stage: F) -> F::Output {
        let started = self.start();
        let output = stage.await;
        self.end(name, started);
        output
    }

    pub fn record(&self, name: &str, elapsed: Duration) {
        let mut stats = self.timings.entry(name.to_string()).or_default();
        stats.count += 1;
        stats.total += elapsed;
        stats.average = stats.total.div_f64(stats.count as f64);
        if elapsed > stats.max {
            stats.max = elapsed;
        }
    }

    pub fn get(&self, name: &str) -> Option<TimerStats> {
        self.timings.get(name).map(|stats| stats.clone())
    }

    // Copy of all timings, sorted by name
    pub fn snapshot(&self) -> Vec<(String, TimerStats)> {
        let mut all: Vec<(String, TimerStats)> = self
            .timings
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn reset(&self) {
        self.timings.clear();
    }
}
