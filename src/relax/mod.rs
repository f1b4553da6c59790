//! Relaxation analysis for infeasible instances.
//!
//! Group minimums and assistant load minimums become weighted penalties
//! (see [`ObjectiveWeights`](crate::ObjectiveWeights)`::shortfall` and
//! `::underload`); eligibility and maximums stay hard. The relaxed search
//! minimises `(violation, cost)` and the analyzer reports which minimums
//! were missed and which parts of the instance make them unreachable.

mod analyzer;
mod types;

pub use analyzer::{Relaxation, RelaxationAnalyzer};
pub use types::{Violation, ViolationKind, INSTANCE_ENTITY};
