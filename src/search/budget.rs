//! Time, node and cancellation limits shared by all workers.

use super::config::SolverConfig;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The clock is read once every `CLOCK_CHECK_MASK + 1` nodes.
const CLOCK_CHECK_MASK: u64 = 0xFF;

/// Search limits shared by every worker of one solve.
///
/// Once any limit trips, the stop flag stays set and every worker sees it
/// at its next decision point.
#[derive(Debug)]
pub struct Budget {
    start: Instant,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    nodes: AtomicU64,
    stopped: AtomicBool,
    cancel: Option<Arc<AtomicBool>>,
}

impl Budget {
    /// Starts the clock for the limits in `config`.
    pub fn new(config: &SolverConfig, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            start: Instant::now(),
            time_limit: config.time_budget_ms.map(Duration::from_millis),
            node_limit: config.node_budget,
            nodes: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
            cancel,
        }
    }

    /// A budget without limits.
    pub fn unlimited() -> Self {
        Self::new(&SolverConfig::default(), None)
    }

    /// Counts one node and reports whether the search must stop.
    pub fn tick(&self) -> bool {
        let n = self.nodes.fetch_add(1, Ordering::Relaxed) + 1;
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        let cancelled = self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let over_nodes = self.node_limit.is_some_and(|limit| n > limit);
        let over_time = n & CLOCK_CHECK_MASK == 0
            && self
                .time_limit
                .is_some_and(|limit| self.start.elapsed() > limit);
        if cancelled || over_nodes || over_time {
            self.stopped.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// Whether a limit has tripped.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Nodes counted so far.
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Time since the budget was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
