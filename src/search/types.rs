//! Search statistics and outcome.

use super::incumbent::Incumbent;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Nodes entered.
    pub nodes: u64,
    /// Returns from a child branch.
    pub backtracks: u64,
    /// Nodes cut because their bound could not beat the best solution.
    pub prunings_bound: u64,
    /// Nodes cut by propagation.
    pub prunings_infeasible: u64,
    /// Solutions that improved the shared best.
    pub solutions: u64,
    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}

impl SearchStats {
    /// Adds the counters of `other`; elapsed time takes the maximum.
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.backtracks += other.backtracks;
        self.prunings_bound += other.prunings_bound;
        self.prunings_infeasible += other.prunings_infeasible;
        self.solutions += other.solutions;
        self.elapsed_ms = self.elapsed_ms.max(other.elapsed_ms);
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} backtracks, {} bound / {} infeasible prunings, {} solutions in {} ms",
            self.nodes,
            self.backtracks,
            self.prunings_bound,
            self.prunings_infeasible,
            self.solutions,
            self.elapsed_ms
        )
    }
}

/// Result of one search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best solution found, if any.
    pub best: Option<Incumbent>,
    /// Whether the whole tree was explored (no budget or cancel stop).
    pub exhaustive: bool,
    /// Counters summed over all workers.
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Exhausted without any solution.
    pub fn is_proven_infeasible(&self) -> bool {
        self.exhaustive && self.best.is_none()
    }
}
