//! Best-solution slot shared between workers.
//!
//! Workers publish complete assignments through [`SharedIncumbent`]. A
//! candidate replaces the current best only if it is strictly better by
//! `(score, branch)`, evaluated under a single mutex. Ordering ties by the
//! top-level branch index makes the surviving solution independent of
//! worker timing: it is always the one a sequential search would keep.

use crate::store::{Assignment, Score};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A complete assignment together with its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incumbent {
    /// Score of the assignment.
    pub score: Score,
    /// The assignment.
    pub assignment: Assignment,
    branch: usize,
}

impl Incumbent {
    pub fn new(score: Score, assignment: Assignment, branch: usize) -> Self {
        Self {
            score,
            assignment,
            branch,
        }
    }

    /// Index of the top-level branch the solution was found in.
    #[inline]
    pub fn branch(&self) -> usize {
        self.branch
    }

    #[inline]
    fn key(&self) -> (Score, usize) {
        (self.score, self.branch)
    }
}

/// Mutex-guarded best solution.
#[derive(Debug, Default)]
pub struct SharedIncumbent {
    best: Mutex<Option<Incumbent>>,
}

impl SharedIncumbent {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Incumbent>> {
        // The slot only ever holds a fully built incumbent, so a poisoned
        // lock still guards a consistent value.
        self.best.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Score and branch of the current best, if any.
    pub fn bound(&self) -> Option<(Score, usize)> {
        self.lock().as_ref().map(Incumbent::key)
    }

    /// Installs a solution if `(score, branch)` beats the current best.
    ///
    /// `assignment` is only called when the candidate wins.
    pub fn try_install<F>(&self, score: Score, branch: usize, assignment: F) -> bool
    where
        F: FnOnce() -> Assignment,
    {
        let mut best = self.lock();
        let better = match best.as_ref() {
            None => true,
            Some(current) => (score, branch) < current.key(),
        };
        if better {
            *best = Some(Incumbent::new(score, assignment(), branch));
        }
        better
    }

    /// Consumes the slot and returns the best solution.
    pub fn into_best(self) -> Option<Incumbent> {
        self.best
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
