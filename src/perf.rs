//! Pointer-tick profiling.
//!
//! Pointer handlers run on every mouse move, so they have to stay well below
//! a frame. This module times them and aggregates per-handler statistics.
//!
//! Enable with the `profiling` feature:
//! ```toml
//! [dependencies]
//! dragselect = { features = ["profiling"] }
//! ```
//!
//! ```ignore
//! fn pointer_move(&mut self) {
//!     dragselect::profile_scope!("reorder.pointer_move");
//!     // ...
//! }
//! ```

use crate::constants::POINTER_TICK_BUDGET_MS;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;
use tracing::warn;

/// Number of samples kept per operation
const STATS_SAMPLE_COUNT: usize = 100;

static OPERATION_STATS: Lazy<Mutex<HashMap<&'static str, OperationStats>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

// ============================================================================
// Profiling Macros (zero-cost when disabled)
// ============================================================================

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::for_pointer_tick($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
}

// ============================================================================
// Operation Statistics
// ============================================================================

/// Statistics for a specific operation.
#[derive(Debug, Clone)]
pub struct OperationStats {
    samples: VecDeque<f64>,
    count: u64,
    min_ms: f64,
    max_ms: f64,
    sum_ms: f64,
}

impl Default for OperationStats {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(STATS_SAMPLE_COUNT),
            count: 0,
            min_ms: f64::MAX,
            max_ms: 0.0,
            sum_ms: 0.0,
        }
    }
}

impl OperationStats {
    pub fn record(&mut self, ms: f64) {
        if self.samples.len() >= STATS_SAMPLE_COUNT {
            if let Some(old) = self.samples.pop_front() {
                self.sum_ms -= old;
            }
        }
        self.samples.push_back(ms);
        self.sum_ms += ms;
        self.count += 1;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    /// Average over the retained samples.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_ms / self.samples.len() as f64
        }
    }

    pub fn p95(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let idx = ((sorted.len() as f64) * 0.95).floor() as usize;
        sorted.get(idx.min(sorted.len() - 1)).copied().unwrap_or(0.0)
    }

    /// Total invocations, including samples that rolled out of the window.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn max_ms(&self) -> f64 {
        self.max_ms
    }
}

/// Records one timing sample for `name`.
pub fn record_operation(name: &'static str, elapsed_ms: f64) {
    OPERATION_STATS.lock().entry(name).or_default().record(elapsed_ms);
}

/// Snapshot of the statistics collected for `name`.
pub fn operation_stats(name: &str) -> Option<OperationStats> {
    OPERATION_STATS.lock().get(name).cloned()
}

// ============================================================================
// Scoped Timer
// ============================================================================

/// Times a scope, records the sample and warns when it overruns.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Timer with the pointer-handler budget.
    pub fn for_pointer_tick(name: &'static str) -> Self {
        Self::new(name, POINTER_TICK_BUDGET_MS)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        record_operation(self.name, elapsed_ms);

        if elapsed_ms > self.threshold_ms {
            warn!(
                operation = self.name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                threshold_ms = format!("{:.2}", self.threshold_ms),
                "Slow pointer handler"
            );
        }
    }
}
