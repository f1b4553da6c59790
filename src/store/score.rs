//! Solution scores.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether hard constraints prune the search or are priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Group minimums and load minimums are hard: violating branches fail.
    Strict,
    /// Minimums are penalised instead; only eligibility and maximums stay hard.
    Relaxed,
}

/// A lexicographic score: weighted hard violation first, soft cost second.
///
/// Lower is better. In [`Mode::Strict`] the violation is always zero.
///
/// ```
/// use ta_assign::Score;
///
/// assert!(Score::new(0, 500) < Score::new(1, -500));
/// assert!(Score::new(2, 3) < Score::new(2, 4));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    /// Weighted count of violated minimums.
    pub violation: i64,
    /// Soft objective cost.
    pub cost: i64,
}

impl Score {
    pub fn new(violation: i64, cost: i64) -> Self {
        Self { violation, cost }
    }

    /// A score with no violation.
    pub fn feasible(cost: i64) -> Self {
        Self::new(0, cost)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(violation {}, cost {})", self.violation, self.cost)
    }
}
