//! Undo log for the search state.

/// One reversible mutation of a [`SearchState`](super::SearchState).
///
/// Entries are appended as decisions and propagations are applied and
/// consumed in reverse on backtrack, so an entry is always undone against
/// exactly the state it was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrailEntry {
    /// The pair was moved from candidate to assigned.
    Assign { assistant: usize, group: usize },
    /// The pair was moved from candidate to excluded.
    Exclude { assistant: usize, group: usize },
    /// The assistant stopped accepting groups.
    Close { assistant: usize },
}
