//! Solver configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Control parameters of a solve.
///
/// # Defaults
///
/// ```
/// use ta_assign::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.time_budget_ms, None);
/// assert_eq!(config.worker_count, 1);
/// assert_eq!(config.optimality_gap, 0.0);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use ta_assign::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_budget_ms(2_000)
///     .with_worker_count(4)
///     .with_optimality_gap(0.01);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Wall-clock budget in milliseconds.
    ///
    /// `None` searches exhaustively (the default). The clock is checked
    /// every few hundred nodes, so the search may overrun slightly.
    pub time_budget_ms: Option<u64>,

    /// Maximum number of search nodes over all workers.
    ///
    /// `None` disables the node budget (the default). With one worker a
    /// budgeted solve is reproducible. With several workers the budget is
    /// shared, so where it runs out depends on thread timing and repeated
    /// solves may return different schedules.
    pub node_budget: Option<u64>,

    /// Number of parallel workers.
    ///
    /// Workers split the search tree at the first branching decision.
    /// Values above 1 need the `parallel` feature; without it the branches
    /// run one after another. Exhaustive solves return the same schedule
    /// for every worker count.
    pub worker_count: usize,

    /// Relative optimality gap.
    ///
    /// A node is pruned once its bound is within `gap * |best cost|` of
    /// the best solution. `0.0` (the default) requires the exact optimum.
    pub optimality_gap: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: None,
            node_budget: None,
            worker_count: 1,
            optimality_gap: 0.0,
        }
    }
}

impl SolverConfig {
    /// Sets the wall-clock budget.
    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = Some(ms);
        self
    }

    /// Sets the node budget.
    pub fn with_node_budget(mut self, nodes: u64) -> Self {
        self.node_budget = Some(nodes);
        self
    }

    /// Sets the number of workers.
    pub fn with_worker_count(mut self, n: usize) -> Self {
        self.worker_count = n;
        self
    }

    /// Sets the relative optimality gap.
    pub fn with_optimality_gap(mut self, gap: f64) -> Self {
        self.optimality_gap = gap;
        self
    }

    /// Whether either budget is set.
    pub fn is_budgeted(&self) -> bool {
        self.time_budget_ms.is_some() || self.node_budget.is_some()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be at least 1".into());
        }
        if !self.optimality_gap.is_finite() || self.optimality_gap < 0.0 {
            return Err(format!(
                "optimality_gap must be a non-negative finite number, got {}",
                self.optimality_gap
            ));
        }
        Ok(())
    }
}
