//! Branch-and-bound engine for assigning teaching assistants to exercise
//! groups.
//!
//! Each assistant is eligible for a set of groups and may carry load
//! bounds; each group needs between `min` and `max` assistants. Among all
//! assignments meeting these hard constraints the solver returns one of
//! minimal soft cost (load balance, preference weights, consecutive
//! groups). When none exists, minimums are relaxed into penalties and the
//! best-effort assignment is returned together with diagnostics.
//!
//! - **Model** ([`model`]): validation of raw [`Instance`] data into an
//!   index-based [`Model`].
//! - **Constraint store** ([`store`]): incremental [`SearchState`] with an
//!   undo trail, propagation and lower bounds.
//! - **Search** ([`search`]): depth-first branch-and-bound with optional
//!   parallel workers, time/node budgets and cancellation.
//! - **Relaxation** ([`relax`]): best-effort assignments and
//!   [`Violation`] diagnostics for infeasible instances.
//! - **Schedule** ([`schedule`]): the externally consumed result.
//! - **Generator** ([`generator`]): seeded random instances.
//!
//! # Example
//!
//! ```
//! use ta_assign::{solve, AssistantSpec, GroupSpec, Instance, SolverConfig};
//!
//! let instance = Instance::new()
//!     .with_group(GroupSpec::new("Mon-10", 1, 1).with_preference("Ada", 2))
//!     .with_group(GroupSpec::new("Tue-14", 1, 1))
//!     .with_assistant(AssistantSpec::new("Ada").with_eligible(["Mon-10", "Tue-14"]))
//!     .with_assistant(AssistantSpec::new("Bo").with_eligible(["Mon-10", "Tue-14"]));
//!
//! let schedule = solve(&instance, &SolverConfig::default()).unwrap();
//! assert!(schedule.feasible);
//! assert!(schedule.assignment["Mon-10"].contains("Ada"));
//! ```
//!
//! The library logs through the `log` facade and installs no logger.

pub mod generator;
pub mod model;
pub mod relax;
pub mod schedule;
pub mod search;
pub mod store;

mod solver;

pub use model::{AssistantSpec, GroupSpec, Instance, Model, ModelError, ObjectiveWeights};
pub use relax::{Violation, ViolationKind};
pub use schedule::{Penalty, PenaltyKind, Schedule, SolveStatus};
pub use search::{SearchStats, SolverConfig};
pub use solver::{solve, solve_with_cancel};
pub use store::{Assignment, Mode, Score, SearchState};
