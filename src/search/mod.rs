//! Branch-and-bound search.
//!
//! Depth-first search over the decisions of a [`SearchState`](crate::SearchState):
//! pick the open assistant with the fewest legal groups, then try its
//! groups in descending preference, finally closing the assistant.
//! Propagation and the lower bound of the constraint store prune the tree.
//!
//! # Determinism
//!
//! Solutions are ranked by `(score, top-level branch)`. With no budget the
//! result is the same for any worker count.
//!
//! # Example
//!
//! ```
//! use ta_assign::{AssistantSpec, GroupSpec, Instance, Model, Mode};
//! use ta_assign::search::{Budget, SearchRunner};
//! use ta_assign::SolverConfig;
//!
//! let instance = Instance::new()
//!     .with_group(GroupSpec::new("G1", 1, 1))
//!     .with_assistant(AssistantSpec::new("A1").with_eligible(["G1"]));
//! let model = Model::build(&instance).unwrap();
//! let config = SolverConfig::default();
//! let outcome = SearchRunner::run(&model, Mode::Strict, &config, &Budget::unlimited());
//! assert!(outcome.exhaustive);
//! assert!(outcome.best.is_some());
//! ```

mod budget;
mod config;
mod incumbent;
mod runner;
mod types;

pub use budget::Budget;
pub use config::SolverConfig;
pub use incumbent::{Incumbent, SharedIncumbent};
pub use runner::SearchRunner;
pub use types::{SearchOutcome, SearchStats};
