//! Incremental search state with an undo trail.
//!
//! Every `(assistant, group)` pair with eligibility is a binary decision.
//! A pair starts as a candidate and is either assigned or excluded; an
//! assistant is *open* while it may still receive groups. Counters needed
//! by propagation and bounding are maintained on every mutation so that a
//! search node never rescans the full pair matrix.

use super::assignment::Assignment;
use super::score::{Mode, Score};
use super::trail::TrailEntry;
use crate::model::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pair {
    Ineligible,
    Candidate,
    Assigned,
    Excluded,
}

/// Mutable partial assignment over a shared [`Model`].
///
/// Cloning yields an independent copy; parallel workers each own one.
///
/// Maintained per assistant: load, open flag, `options` (candidate pairs
/// whose group is below its maximum) and `gain` (sum of positive preference
/// weights over candidate pairs). Maintained per group: assigned count and
/// the number of open assistants still holding a candidate pair for it.
#[derive(Debug, Clone)]
pub struct SearchState<'m> {
    model: &'m Model,
    pairs: Vec<Pair>,
    group_count: Vec<u32>,
    open_candidates: Vec<u32>,
    load: Vec<u32>,
    closed: Vec<bool>,
    options: Vec<u32>,
    gain: Vec<i64>,
    open: usize,
    cost: i64,
    trail: Vec<TrailEntry>,
}

impl<'m> SearchState<'m> {
    /// The empty assignment. Assistants with a zero load maximum start closed.
    pub fn new(model: &'m Model) -> Self {
        let na = model.num_assistants();
        let ng = model.num_groups();
        let mut pairs = vec![Pair::Ineligible; na * ng];
        let mut open_candidates = vec![0; ng];
        let mut closed = vec![false; na];
        let mut options = vec![0; na];
        let mut gain = vec![0; na];
        let mut open = na;

        for (a, assistant) in model.assistants().iter().enumerate() {
            if assistant.load_max == 0 {
                closed[a] = true;
                open -= 1;
            }
            for &g in &assistant.eligible {
                pairs[a * ng + g] = Pair::Candidate;
                if model.group(g).max > 0 {
                    options[a] += 1;
                }
                if !closed[a] {
                    open_candidates[g] += 1;
                }
                gain[a] += model.preference(a, g).max(0);
            }
        }

        Self {
            model,
            pairs,
            group_count: vec![0; ng],
            open_candidates,
            load: vec![0; na],
            closed,
            options,
            gain,
            open,
            cost: 0,
            trail: Vec::new(),
        }
    }

    #[inline]
    pub fn model(&self) -> &'m Model {
        self.model
    }

    #[inline]
    fn pair(&self, a: usize, g: usize) -> Pair {
        self.pairs[a * self.model.num_groups() + g]
    }

    #[inline]
    fn set_pair(&mut self, a: usize, g: usize, p: Pair) {
        let ng = self.model.num_groups();
        self.pairs[a * ng + g] = p;
    }

    /// Whether `a` is assigned to `g`.
    #[inline]
    pub fn is_assigned(&self, a: usize, g: usize) -> bool {
        self.pair(a, g) == Pair::Assigned
    }

    /// Whether `(a, g)` is still undecided.
    #[inline]
    pub fn is_candidate(&self, a: usize, g: usize) -> bool {
        self.pair(a, g) == Pair::Candidate
    }

    #[inline]
    pub fn load(&self, a: usize) -> u32 {
        self.load[a]
    }

    #[inline]
    pub fn group_count(&self, g: usize) -> u32 {
        self.group_count[g]
    }

    /// Whether assistant `a` may still receive groups.
    #[inline]
    pub fn is_open(&self, a: usize) -> bool {
        !self.closed[a]
    }

    /// Number of remaining legal groups for `a`.
    #[inline]
    pub fn options(&self, a: usize) -> u32 {
        self.options[a]
    }

    /// Whether group `g` has reached its maximum.
    #[inline]
    pub fn is_full(&self, g: usize) -> bool {
        self.group_count[g] >= self.model.group(g).max
    }

    /// Whether group `g` already satisfies its minimum.
    #[inline]
    pub fn meets_minimum(&self, g: usize) -> bool {
        self.group_count[g] >= self.model.group(g).min
    }

    /// Assigned count plus open assistants that could still join `g`.
    #[inline]
    pub fn reachable(&self, g: usize) -> u32 {
        self.group_count[g] + self.open_candidates[g]
    }

    /// Current soft objective cost.
    #[inline]
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Whether every assistant is closed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.open == 0
    }

    /// Trail position to later [`undo_to`](Self::undo_to).
    #[inline]
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Remaining legal groups for `a`: eligible, undecided, below maximum.
    pub fn legal_groups(&self, a: usize) -> impl Iterator<Item = usize> + '_ {
        self.model
            .assistant(a)
            .eligible
            .iter()
            .copied()
            .filter(move |&g| self.is_candidate(a, g) && !self.is_full(g))
    }

    /// Cost change of assigning `a` to `g` in the current state.
    fn assign_delta(&self, a: usize, g: usize) -> i64 {
        let w = self.model.weights();
        let group = self.model.group(g);
        let load = i64::from(self.load[a]);
        let neighbours = group
            .pred
            .iter()
            .chain(group.successors.iter())
            .filter(|&&n| self.is_assigned(a, n))
            .count() as i64;
        w.balance * (2 * load + 1) - w.preference * self.model.preference(a, g)
            + w.consecutive * neighbours
    }

    /// Adjusts `options` of every assistant holding a candidate pair for `g`.
    fn shift_options(&mut self, g: usize, up: bool) {
        let model = self.model;
        for &b in &model.group(g).pool {
            if self.is_candidate(b, g) {
                if up {
                    self.options[b] += 1;
                } else {
                    self.options[b] -= 1;
                }
            }
        }
    }

    /// Assigns `a` to `g`, closing `a` if it reaches its load maximum.
    ///
    /// The pair must be a legal group of an open assistant.
    pub fn assign(&mut self, a: usize, g: usize) {
        debug_assert!(self.is_candidate(a, g), "pair ({a}, {g}) is decided");
        debug_assert!(self.is_open(a), "assistant {a} is closed");
        debug_assert!(!self.is_full(g), "group {g} is full");

        self.cost += self.assign_delta(a, g);
        self.set_pair(a, g, Pair::Assigned);
        self.open_candidates[g] -= 1;
        self.options[a] -= 1;
        self.gain[a] -= self.model.preference(a, g).max(0);
        self.load[a] += 1;
        self.group_count[g] += 1;
        if self.is_full(g) {
            self.shift_options(g, false);
        }
        self.trail.push(TrailEntry::Assign {
            assistant: a,
            group: g,
        });

        if self.load[a] >= self.model.assistant(a).load_max {
            self.close(a);
        }
    }

    /// Rules out assigning `a` to `g`.
    pub fn exclude(&mut self, a: usize, g: usize) {
        debug_assert!(self.is_candidate(a, g), "pair ({a}, {g}) is decided");

        self.set_pair(a, g, Pair::Excluded);
        if !self.closed[a] {
            self.open_candidates[g] -= 1;
        }
        if !self.is_full(g) {
            self.options[a] -= 1;
        }
        self.gain[a] -= self.model.preference(a, g).max(0);
        self.trail.push(TrailEntry::Exclude {
            assistant: a,
            group: g,
        });
    }

    /// Stops `a` from receiving further groups.
    pub fn close(&mut self, a: usize) {
        debug_assert!(self.is_open(a), "assistant {a} is closed");

        self.closed[a] = true;
        self.open -= 1;
        let model = self.model;
        for &g in &model.assistant(a).eligible {
            if self.is_candidate(a, g) {
                self.open_candidates[g] -= 1;
            }
        }
        self.trail.push(TrailEntry::Close { assistant: a });
    }

    /// Reverts every mutation recorded after `mark`.
    pub fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let Some(entry) = self.trail.pop() else {
                break;
            };
            match entry {
                TrailEntry::Assign {
                    assistant: a,
                    group: g,
                } => {
                    if self.is_full(g) {
                        self.shift_options(g, true);
                    }
                    self.group_count[g] -= 1;
                    self.load[a] -= 1;
                    self.gain[a] += self.model.preference(a, g).max(0);
                    self.options[a] += 1;
                    self.open_candidates[g] += 1;
                    self.set_pair(a, g, Pair::Candidate);
                    self.cost -= self.assign_delta(a, g);
                }
                TrailEntry::Exclude {
                    assistant: a,
                    group: g,
                } => {
                    self.set_pair(a, g, Pair::Candidate);
                    if !self.closed[a] {
                        self.open_candidates[g] += 1;
                    }
                    if !self.is_full(g) {
                        self.options[a] += 1;
                    }
                    self.gain[a] += self.model.preference(a, g).max(0);
                }
                TrailEntry::Close { assistant: a } => {
                    let model = self.model;
                    for &g in &model.assistant(a).eligible {
                        if self.is_candidate(a, g) {
                            self.open_candidates[g] += 1;
                        }
                    }
                    self.closed[a] = false;
                    self.open += 1;
                }
            }
        }
    }

    /// Most load `a` can still reach.
    #[inline]
    fn reachable_load(&self, a: usize) -> u32 {
        if self.closed[a] {
            self.load[a]
        } else {
            let room = self.model.assistant(a).load_max - self.load[a];
            self.load[a] + self.options[a].min(room)
        }
    }

    /// Closes assistants with no legal group left, then checks minimums.
    ///
    /// Returns `false` when, in [`Mode::Strict`], some group can no longer
    /// reach its minimum from assigned plus open candidate assistants, or
    /// some assistant can no longer reach its load minimum. In
    /// [`Mode::Relaxed`] it never fails.
    pub fn propagate(&mut self, mode: Mode) -> bool {
        for a in 0..self.model.num_assistants() {
            if !self.closed[a] && self.options[a] == 0 {
                self.close(a);
            }
        }
        if mode == Mode::Relaxed {
            return true;
        }
        let groups_ok =
            (0..self.model.num_groups()).all(|g| self.reachable(g) >= self.model.group(g).min);
        groups_ok
            && (0..self.model.num_assistants())
                .all(|a| self.reachable_load(a) >= self.model.assistant(a).load_min)
    }

    /// Optimistic score of any completion of this state.
    ///
    /// Cost: the current cost, plus the balance cost of loads that minimums
    /// force (strict only), minus every remaining positive preference.
    /// Violation (relaxed only): minimums unreachable even if every open
    /// candidate were assigned.
    pub fn lower_bound(&self, mode: Mode) -> Score {
        let w = self.model.weights();
        let mut cost = self.cost;
        let mut violation = 0;

        for (a, assistant) in self.model.assistants().iter().enumerate() {
            if !self.closed[a] {
                cost -= w.preference * self.gain[a];
            }
            match mode {
                Mode::Strict => {
                    if !self.closed[a] && self.load[a] < assistant.load_min {
                        let load = i64::from(self.load[a]);
                        let need = i64::from(assistant.load_min);
                        cost += w.balance * (need * need - load * load);
                    }
                }
                Mode::Relaxed => {
                    let missing = assistant.load_min.saturating_sub(self.reachable_load(a));
                    violation += w.underload * i64::from(missing);
                }
            }
        }
        if mode == Mode::Relaxed {
            for (g, group) in self.model.groups().iter().enumerate() {
                let missing = group.min.saturating_sub(self.reachable(g));
                violation += w.shortfall * i64::from(missing);
            }
        }
        Score::new(violation, cost)
    }

    /// Weighted shortfall of minimums in the current state.
    pub fn violation(&self) -> i64 {
        let w = self.model.weights();
        let shortfall: i64 = self
            .model
            .groups()
            .iter()
            .zip(&self.group_count)
            .map(|(group, &n)| i64::from(group.min.saturating_sub(n)))
            .sum();
        let underload: i64 = self
            .model
            .assistants()
            .iter()
            .zip(&self.load)
            .map(|(assistant, &l)| i64::from(assistant.load_min.saturating_sub(l)))
            .sum();
        w.shortfall * shortfall + w.underload * underload
    }

    /// Score of the current state.
    pub fn score(&self, mode: Mode) -> Score {
        match mode {
            Mode::Strict => Score::feasible(self.cost),
            Mode::Relaxed => Score::new(self.violation(), self.cost),
        }
    }

    /// The open assistant with the fewest legal groups, lowest index first.
    pub fn select_assistant(&self) -> Option<usize> {
        (0..self.model.num_assistants())
            .filter(|&a| !self.closed[a])
            .min_by_key(|&a| (self.options[a], a))
    }

    /// Legal groups of `a` in branching order: preference weight
    /// descending, then group index ascending.
    pub fn branch_groups(&self, a: usize) -> Vec<usize> {
        let mut groups: Vec<usize> = self.legal_groups(a).collect();
        groups.sort_by_key(|&g| (std::cmp::Reverse(self.model.preference(a, g)), g));
        groups
    }

    /// Whether `a` may be closed without failing its load minimum.
    pub fn may_stop(&self, a: usize, mode: Mode) -> bool {
        match mode {
            Mode::Strict => self.load[a] >= self.model.assistant(a).load_min,
            Mode::Relaxed => true,
        }
    }

    /// Snapshot of the assigned pairs.
    pub fn assignment(&self) -> Assignment {
        let pairs = self
            .model
            .assistants()
            .iter()
            .enumerate()
            .flat_map(|(a, assistant)| {
                assistant
                    .eligible
                    .iter()
                    .filter(move |&&g| self.is_assigned(a, g))
                    .map(move |&g| (a, g))
            });
        Assignment::from_pairs(self.model.num_groups(), pairs)
    }
}
