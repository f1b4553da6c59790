//! Branch-and-bound execution loop.
//!
//! The root is propagated once, then split on its first branching decision
//! into top-level branches. Each branch runs as an independent depth-first
//! search on its own copy of the state; with several workers the branches
//! are spread over a rayon pool. All workers share one [`Budget`] and one
//! [`SharedIncumbent`].

use super::budget::Budget;
use super::config::SolverConfig;
use super::incumbent::SharedIncumbent;
use super::types::{SearchOutcome, SearchStats};
use crate::model::Model;
use crate::store::{Mode, Score, SearchState};
use log::{debug, trace};
use std::cmp::Ordering;

/// Nodes between two reads of the shared best bound.
const SYNC_INTERVAL: u32 = 64;

/// Executes the branch-and-bound search.
pub struct SearchRunner;

impl SearchRunner {
    /// Searches for the best assignment of `model` under `mode`.
    ///
    /// In [`Mode::Strict`] only assignments meeting every minimum are
    /// accepted. In [`Mode::Relaxed`] every complete assignment is a
    /// solution, ranked by weighted violation first; the first dive is
    /// always completed even if the budget is already spent, so a relaxed
    /// run returns a solution whenever the model has one.
    pub fn run(model: &Model, mode: Mode, config: &SolverConfig, budget: &Budget) -> SearchOutcome {
        let incumbent = SharedIncumbent::new();
        let mut stats = SearchStats::default();
        let mut root = SearchState::new(model);

        if !root.propagate(mode) {
            debug!("{mode:?} search: root propagation failed");
            stats.nodes = 1;
            stats.prunings_infeasible = 1;
            return finish(incumbent, budget, stats);
        }

        let Some(a) = root.select_assistant() else {
            // No assistant can take any group.
            stats.nodes = 1;
            if incumbent.try_install(root.score(mode), 0, || root.assignment()) {
                stats.solutions = 1;
            }
            return finish(incumbent, budget, stats);
        };

        let groups = root.branch_groups(a);
        let count = groups.len() + usize::from(root.may_stop(a, mode));
        debug!(
            "{mode:?} search: splitting on assistant {} into {count} branches, {} workers",
            model.assistant(a).id,
            config.worker_count
        );

        let root = &root;
        let groups = &groups;
        let incumbent_ref = &incumbent;
        let gap = config.optimality_gap;
        let run_branch = move |branch: usize| -> SearchStats {
            let mut state = root.clone();
            for &g in &groups[..branch.min(groups.len())] {
                state.exclude(a, g);
            }
            if let Some(&g) = groups.get(branch) {
                state.assign(a, g);
            }
            let mut worker = Worker::new(mode, budget, incumbent_ref, branch, gap);
            worker.dfs(&mut state);
            worker.stats
        };

        stats.nodes = 1;
        for branch_stats in explore(config.worker_count, count, run_branch) {
            stats.merge(&branch_stats);
        }
        finish(incumbent, budget, stats)
    }
}

fn finish(incumbent: SharedIncumbent, budget: &Budget, mut stats: SearchStats) -> SearchOutcome {
    stats.elapsed_ms = budget.elapsed().as_millis() as u64;
    let outcome = SearchOutcome {
        best: incumbent.into_best(),
        exhaustive: !budget.is_stopped(),
        stats,
    };
    debug!(
        "search finished ({}): best {}, {}, {} nodes charged to the budget",
        if outcome.exhaustive { "exhaustive" } else { "stopped" },
        outcome
            .best
            .as_ref()
            .map_or_else(|| "none".to_string(), |b| b.score.to_string()),
        outcome.stats,
        budget.nodes()
    );
    outcome
}

/// Runs `count` top-level branches on `workers` threads.
#[cfg(feature = "parallel")]
fn explore<F>(workers: usize, count: usize, run: F) -> Vec<SearchStats>
where
    F: Fn(usize) -> SearchStats + Sync + Send,
{
    use rayon::prelude::*;

    if workers <= 1 || count <= 1 {
        return (0..count).map(run).collect();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| (0..count).into_par_iter().map(&run).collect()),
        Err(e) => {
            log::warn!("could not start {workers} workers ({e}), searching sequentially");
            (0..count).map(run).collect()
        }
    }
}

/// Runs `count` top-level branches one after another.
#[cfg(not(feature = "parallel"))]
fn explore<F>(workers: usize, count: usize, run: F) -> Vec<SearchStats>
where
    F: Fn(usize) -> SearchStats,
{
    if workers > 1 {
        debug!("built without the `parallel` feature, {workers} workers run sequentially");
    }
    (0..count).map(run).collect()
}

/// Depth-first search over one top-level branch.
struct Worker<'a> {
    mode: Mode,
    budget: &'a Budget,
    incumbent: &'a SharedIncumbent,
    branch: usize,
    gap: f64,
    bound: Option<(Score, usize)>,
    since_sync: u32,
    found: bool,
    stats: SearchStats,
}

impl<'a> Worker<'a> {
    fn new(
        mode: Mode,
        budget: &'a Budget,
        incumbent: &'a SharedIncumbent,
        branch: usize,
        gap: f64,
    ) -> Self {
        Self {
            mode,
            budget,
            incumbent,
            branch,
            gap,
            bound: incumbent.bound(),
            since_sync: 0,
            found: false,
            stats: SearchStats::default(),
        }
    }

    fn sync(&mut self) {
        self.bound = self.incumbent.bound();
        self.since_sync = 0;
    }

    /// A relaxed search keeps going until some solution exists.
    fn may_halt(&self) -> bool {
        match self.mode {
            Mode::Strict => true,
            Mode::Relaxed => self.found || self.bound.is_some(),
        }
    }

    /// Whether no completion with bound `lb` can replace the shared best.
    fn dominated(&self, lb: Score) -> bool {
        let Some((best, branch)) = self.bound else {
            return false;
        };
        match lb.cmp(&best) {
            Ordering::Greater => true,
            Ordering::Equal => branch <= self.branch,
            Ordering::Less => {
                self.gap > 0.0
                    && lb.violation == best.violation
                    && lb.cost as f64 >= best.cost as f64 - self.gap * (best.cost as f64).abs()
            }
        }
    }

    fn record(&mut self, state: &SearchState<'_>) {
        let score = state.score(self.mode);
        if self
            .incumbent
            .try_install(score, self.branch, || state.assignment())
        {
            self.stats.solutions += 1;
            trace!("branch {}: new best {score}", self.branch);
        }
        self.found = true;
        self.sync();
    }

    /// Explores the subtree below `state`. Returns `true` when the budget
    /// stopped the search.
    fn dfs(&mut self, state: &mut SearchState<'_>) -> bool {
        if self.budget.tick() && self.may_halt() {
            return true;
        }
        self.stats.nodes += 1;
        self.since_sync += 1;
        if self.since_sync >= SYNC_INTERVAL {
            self.sync();
        }

        if !state.propagate(self.mode) {
            self.stats.prunings_infeasible += 1;
            return false;
        }
        if self.dominated(state.lower_bound(self.mode)) {
            self.stats.prunings_bound += 1;
            return false;
        }
        let Some(a) = state.select_assistant() else {
            self.record(state);
            return false;
        };

        let outer = state.mark();
        for g in state.branch_groups(a) {
            let mark = state.mark();
            state.assign(a, g);
            let halted = self.dfs(state);
            state.undo_to(mark);
            if halted {
                state.undo_to(outer);
                return true;
            }
            self.stats.backtracks += 1;
            // Later siblings never take `g`.
            state.exclude(a, g);
        }
        let halted = state.may_stop(a, self.mode) && self.dfs(state);
        state.undo_to(outer);
        halted
    }
}
