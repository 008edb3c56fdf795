//! Frame metrics and structured logging for the simulation.

use crate::world::PopulationStats;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Frames between periodic summary log lines (ten seconds at 60 FPS).
pub const SUMMARY_INTERVAL: u64 = 600;

pub const BIRTHS: &str = "births";
pub const SEEDS: &str = "seeds";
pub const PREDATIONS: &str = "predations";
pub const STARVATIONS: &str = "starvations";

/// Collects per-frame statistics for one simulation run.
pub struct Metrics {
    frame_count: u64,
    population: PopulationStats,
    counters: BTreeMap<&'static str, u64>,
    slowest_frame: Duration,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            population: PopulationStats::default(),
            counters: BTreeMap::new(),
            slowest_frame: Duration::ZERO,
            start_time: Instant::now(),
        }
    }

    /// Records a completed frame with its duration.
    pub fn record_frame(&mut self, duration: Duration, population: PopulationStats) {
        self.frame_count += 1;
        self.population = population;
        self.slowest_frame = self.slowest_frame.max(duration);

        if self.frame_count % SUMMARY_INTERVAL == 0 {
            tracing::info!(
                frame = self.frame_count,
                grass = population.grass,
                lemmings = population.lemmings,
                foxes = population.foxes,
                births = self.counter(BIRTHS),
                predations = self.counter(PREDATIONS),
                starvations = self.counter(STARVATIONS),
                duration_us = duration.as_micros() as u64,
                "Simulation frame"
            );
        }
    }

    pub fn increment_counter(&mut self, name: &'static str, by: u64) {
        if by > 0 {
            *self.counters.entry(name).or_insert(0) += by;
        }
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn population(&self) -> PopulationStats {
        self.population
    }

    #[must_use]
    pub fn slowest_frame(&self) -> Duration {
        self.slowest_frame
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            frames = self.frame_count,
            elapsed_ms = self.elapsed().as_millis() as u64,
            slowest_frame_us = self.slowest_frame.as_micros() as u64,
            grass = self.population.grass,
            lemmings = self.population.lemmings,
            foxes = self.population.foxes,
            counters = ?self.counters,
            "Simulation finished"
        );
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing subscriber for logging to stderr.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Initialize tracing subscriber writing to a file, for when stderr is
/// covered by a full-screen terminal UI.
pub fn init_file_logging(path: &Path) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.frame_count(), 0);
        assert_eq!(metrics.counter(BIRTHS), 0);
    }

    #[test]
    fn test_record_frame() {
        let mut metrics = Metrics::new();
        let population = PopulationStats {
            grass: 3,
            lemmings: 2,
            foxes: 1,
        };
        metrics.record_frame(Duration::from_millis(16), population);
        metrics.record_frame(Duration::from_millis(4), population);
        assert_eq!(metrics.frame_count(), 2);
        assert_eq!(metrics.population().total(), 6);
        assert_eq!(metrics.slowest_frame(), Duration::from_millis(16));
    }

    #[test]
    fn test_increment_counter() {
        let mut metrics = Metrics::new();
        metrics.increment_counter(PREDATIONS, 2);
        metrics.increment_counter(PREDATIONS, 1);
        metrics.increment_counter(SEEDS, 0);
        assert_eq!(metrics.counter(PREDATIONS), 3);
        assert_eq!(metrics.counter(SEEDS), 0);
    }

    #[test]
    fn test_file_logging_creates_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ecosim.log");
        init_file_logging(&path).expect("init");
        assert!(path.exists());
    }
}
