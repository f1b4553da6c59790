//! Solve pipeline: build, search, relax if needed, materialize.

use crate::model::{Instance, Model, ModelError};
use crate::relax::RelaxationAnalyzer;
use crate::schedule::{Schedule, Solution, SolveStatus};
use crate::search::{Budget, SearchRunner, SolverConfig};
use crate::store::{Assignment, Mode, Score};
use log::info;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Solves `instance`.
///
/// Returns `Err` only for malformed input or an invalid configuration.
/// Infeasibility and budget cut-offs are reported through
/// [`Schedule::status`].
///
/// # Examples
///
/// ```
/// use ta_assign::{solve, AssistantSpec, GroupSpec, Instance, SolveStatus, SolverConfig};
///
/// let instance = Instance::new()
///     .with_group(GroupSpec::new("G1", 1, 2))
///     .with_group(GroupSpec::new("G2", 1, 1))
///     .with_assistant(AssistantSpec::new("A1").with_eligible(["G1", "G2"]))
///     .with_assistant(AssistantSpec::new("A2").with_eligible(["G1"]))
///     .with_assistant(AssistantSpec::new("A3").with_eligible(["G2"]));
///
/// let schedule = solve(&instance, &SolverConfig::default()).unwrap();
/// assert!(schedule.feasible);
/// assert_eq!(schedule.status, SolveStatus::Optimal);
/// ```
pub fn solve(instance: &Instance, config: &SolverConfig) -> Result<Schedule, ModelError> {
    solve_with_cancel(instance, config, None)
}

/// Solves `instance`, stopping early once `cancel` is set.
pub fn solve_with_cancel(
    instance: &Instance,
    config: &SolverConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<Schedule, ModelError> {
    config.validate().map_err(ModelError::InvalidConfig)?;
    let model = Model::build(instance)?;
    info!(
        "solving {} assistants x {} groups with {} workers{}",
        model.num_assistants(),
        model.num_groups(),
        config.worker_count,
        if config.is_budgeted() { " under a budget" } else { "" }
    );

    let budget = Budget::new(config, cancel);
    let strict = SearchRunner::run(&model, Mode::Strict, config, &budget);

    let solution = match strict.best {
        Some(best) => {
            let status = if !strict.exhaustive {
                SolveStatus::BudgetExceeded
            } else if config.optimality_gap > 0.0 {
                SolveStatus::WithinGap
            } else {
                SolveStatus::Optimal
            };
            Solution {
                status,
                assignment: best.assignment,
                score: best.score,
                violations: Vec::new(),
                stats: strict.stats,
            }
        }
        None => {
            if strict.exhaustive {
                info!("no feasible assignment exists, relaxing minimums");
            } else {
                info!("budget spent before a feasible assignment was found, relaxing minimums");
            }
            let relaxation = RelaxationAnalyzer::new(&model).analyze(config, &budget);
            // Infeasibility is only final once the relaxed optimum is proven too.
            let status = if strict.exhaustive && relaxation.exhaustive {
                SolveStatus::Infeasible
            } else {
                SolveStatus::BudgetExceeded
            };
            let mut stats = strict.stats;
            stats.merge(&relaxation.stats);
            let (assignment, score) = match relaxation.best {
                Some(best) => (best.assignment, best.score),
                None => (Assignment::empty(model.num_groups()), Score::default()),
            };
            Solution {
                status,
                assignment,
                score,
                violations: relaxation.violations,
                stats,
            }
        }
    };

    let schedule = Schedule::from_solution(&model, solution);
    info!(
        "{}: objective {}, {} violations, {}",
        schedule.status,
        schedule.objective,
        schedule.violations.len(),
        schedule.stats
    );
    Ok(schedule)
}
