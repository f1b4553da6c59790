//! Externally consumed solve result.
//!
//! [`Schedule::from_solution`] turns the index-based search result into an
//! id-keyed table. It performs no search and keeps no state.

use crate::model::Model;
use crate::relax::Violation;
use crate::search::SearchStats;
use crate::store::{Assignment, Score};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolveStatus {
    /// Feasible and proven optimal.
    Optimal,
    /// Feasible; the optimality gap allowed the search to stop early.
    WithinGap,
    /// Proven that no assignment meets every hard constraint. The schedule
    /// holds the proven least-violating assignment.
    Infeasible,
    /// A time, node or cancel limit ended the search. The schedule holds the
    /// best result found so far, which is infeasible if `feasible` is false.
    /// Also reported when strict infeasibility was proven but the relaxed
    /// search was cut short.
    BudgetExceeded,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Optimal => "optimal",
            Self::WithinGap => "within gap",
            Self::Infeasible => "infeasible",
            Self::BudgetExceeded => "budget exceeded",
        };
        f.write_str(name)
    }
}

/// Kind of soft penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PenaltyKind {
    /// Assigned to a group that ranks the assistant negatively.
    Unpreferred,
    /// Assigned to a group and to its predecessor.
    Consecutive,
}

/// A soft constraint the schedule pays for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Penalty {
    /// Which soft constraint is paid for.
    pub kind: PenaltyKind,
    /// The assistant the penalty is charged to.
    pub assistant_id: String,
    /// The group, or the predecessor and the group for
    /// [`PenaltyKind::Consecutive`].
    pub group_ids: Vec<String>,
    /// Contribution to the objective.
    pub cost: i64,
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PenaltyKind::Unpreferred => write!(
                f,
                "{} assigned to unpreferred {} (+{})",
                self.assistant_id,
                self.group_ids.join(", "),
                self.cost
            ),
            PenaltyKind::Consecutive => write!(
                f,
                "{} assigned to consecutive {} (+{})",
                self.assistant_id,
                self.group_ids.join(" -> "),
                self.cost
            ),
        }
    }
}

/// Internal result of a solve, before materialization.
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolveStatus,
    pub assignment: Assignment,
    pub score: Score,
    /// Empty for a feasible assignment.
    pub violations: Vec<Violation>,
    pub stats: SearchStats,
}

/// Result of [`solve`](crate::solve).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    /// How far the search got; see [`SolveStatus`].
    pub status: SolveStatus,
    /// `true` iff `violations` is empty.
    pub feasible: bool,
    /// Group id to assigned assistant ids; every group is present.
    pub assignment: BTreeMap<String, BTreeSet<String>>,
    /// Soft objective of `assignment` (lower is better).
    pub objective: i64,
    /// Hard-constraint violations, ordered by kind then entity id.
    pub violations: Vec<Violation>,
    /// Soft penalties incurred, ordered by kind, assistant, groups.
    pub penalties: Vec<Penalty>,
    /// Counters summed over the strict and relaxed searches.
    pub stats: SearchStats,
}

impl Schedule {
    /// Materializes `solution` against the model it was solved on.
    pub fn from_solution(model: &Model, solution: Solution) -> Self {
        let assignment: BTreeMap<String, BTreeSet<String>> = model
            .groups()
            .iter()
            .enumerate()
            .map(|(g, group)| {
                let members: BTreeSet<String> = solution
                    .assignment
                    .group(g)
                    .iter()
                    .map(|&a| model.assistant(a).id.clone())
                    .collect();
                (group.id.clone(), members)
            })
            .collect();

        Self {
            status: solution.status,
            feasible: solution.violations.is_empty(),
            assignment,
            objective: solution.score.cost,
            penalties: penalties(model, &solution.assignment),
            violations: solution.violations,
            stats: solution.stats,
        }
    }

    /// Whether the result is final: not cut short by a budget.
    pub fn is_final(&self) -> bool {
        self.status != SolveStatus::BudgetExceeded
    }

    /// Assistants of `group_id`, or `None` for an unknown group.
    pub fn group(&self, group_id: &str) -> Option<&BTreeSet<String>> {
        self.assignment.get(group_id)
    }

    /// Groups assigned to `assistant_id`, ascending.
    pub fn groups_of(&self, assistant_id: &str) -> Vec<&str> {
        self.assignment
            .iter()
            .filter(|(_, members)| members.contains(assistant_id))
            .map(|(g, _)| g.as_str())
            .collect()
    }

    /// Number of groups per assistant; assistants without groups are absent.
    pub fn loads(&self) -> BTreeMap<&str, u32> {
        let mut loads = BTreeMap::new();
        for members in self.assignment.values() {
            for a in members {
                *loads.entry(a.as_str()).or_insert(0) += 1;
            }
        }
        loads
    }
}

fn penalties(model: &Model, assignment: &Assignment) -> Vec<Penalty> {
    let w = model.weights();
    let mut out = Vec::new();
    for (a, g) in assignment.pairs() {
        let weight = model.preference(a, g);
        if weight < 0 {
            out.push(Penalty {
                kind: PenaltyKind::Unpreferred,
                assistant_id: model.assistant(a).id.clone(),
                group_ids: vec![model.group(g).id.clone()],
                cost: -weight * w.preference,
            });
        }
        if let Some(p) = model.group(g).pred {
            if assignment.contains(a, p) {
                out.push(Penalty {
                    kind: PenaltyKind::Consecutive,
                    assistant_id: model.assistant(a).id.clone(),
                    group_ids: vec![model.group(p).id.clone(), model.group(g).id.clone()],
                    cost: w.consecutive,
                });
            }
        }
    }
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssistantSpec, GroupSpec, Instance};
    use crate::relax::ViolationKind;

    fn model() -> Model {
        let instance = Instance::new()
            .with_group(GroupSpec::new("Mon", 1, 2).with_preference("Bob", -3))
            .with_group(GroupSpec::new("Tue", 1, 1).with_pred("Mon"))
            .with_group(GroupSpec::new("Wed", 0, 1))
            .with_assistant(AssistantSpec::new("Ann").with_eligible(["Mon", "Tue"]))
            .with_assistant(AssistantSpec::new("Bob").with_eligible(["Mon", "Wed"]));
        Model::build(&instance).unwrap()
    }

    fn solution(pairs: &[(usize, usize)], violations: Vec<Violation>) -> Solution {
        let model = model();
        let assignment = Assignment::from_pairs(3, pairs.iter().copied());
        let score = Score::feasible(assignment.cost(&model));
        Solution {
            status: SolveStatus::Optimal,
            assignment,
            score,
            violations,
            stats: SearchStats::default(),
        }
    }

    #[test]
    fn test_every_group_present() {
        let model = model();
        let schedule = Schedule::from_solution(&model, solution(&[(0, 0)], Vec::new()));
        assert_eq!(schedule.assignment.len(), 3);
        assert!(schedule.group("Wed").unwrap().is_empty());
        assert!(schedule.group("Fri").is_none());
    }

    #[test]
    fn test_ids_and_transpose() {
        let model = model();
        let solved = solution(&[(0, 0), (0, 1), (1, 0)], Vec::new());
        let schedule = Schedule::from_solution(&model, solved);
        assert!(schedule.feasible);
        assert!(schedule.is_final());
        assert_eq!(schedule.groups_of("Ann"), vec!["Mon", "Tue"]);
        assert_eq!(schedule.loads().get("Bob"), Some(&1));
        let mon: Vec<&str> = schedule.group("Mon").unwrap().iter().map(String::as_str).collect();
        assert_eq!(mon, vec!["Ann", "Bob"]);
    }

    #[test]
    fn test_penalties_listed() {
        let model = model();
        let solved = solution(&[(0, 0), (0, 1), (1, 0)], Vec::new());
        let schedule = Schedule::from_solution(&model, solved);
        assert_eq!(
            schedule.penalties,
            vec![
                Penalty {
                    kind: PenaltyKind::Unpreferred,
                    assistant_id: "Bob".into(),
                    group_ids: vec!["Mon".into()],
                    cost: 3,
                },
                Penalty {
                    kind: PenaltyKind::Consecutive,
                    assistant_id: "Ann".into(),
                    group_ids: vec!["Mon".into(), "Tue".into()],
                    cost: 10,
                },
            ]
        );
        let listed: i64 = schedule.penalties.iter().map(|p| p.cost).sum();
        // Ann: 2 groups, Bob: 1 group.
        assert_eq!(schedule.objective, 4 + 1 + listed);
    }

    #[test]
    fn test_violations_make_infeasible() {
        let model = model();
        let violation =
            Violation::new(ViolationKind::GroupShortfall, "Tue", 1, "shortfall=1".into());
        let mut sol = solution(&[(0, 0)], vec![violation]);
        sol.status = SolveStatus::BudgetExceeded;
        let schedule = Schedule::from_solution(&model, sol);
        assert!(!schedule.feasible);
        assert!(!schedule.is_final());
        assert_eq!(schedule.violations[0].entity_id, "Tue");
    }
}
