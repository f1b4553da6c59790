//! Best-effort assignment and violation diagnostics.

use super::types::{Violation, ViolationKind, INSTANCE_ENTITY};
use crate::model::Model;
use crate::search::{Budget, Incumbent, SearchRunner, SearchStats, SolverConfig};
use crate::store::{Assignment, Mode};
use log::debug;

/// Result of a relaxed solve.
#[derive(Debug, Clone)]
pub struct Relaxation {
    /// Best-effort assignment; `None` only if the search found nothing.
    pub best: Option<Incumbent>,
    /// Violations of the best assignment plus structural diagnostics,
    /// ordered by kind, then entity id.
    pub violations: Vec<Violation>,
    /// Whether the relaxed search ran to completion.
    pub exhaustive: bool,
    /// Counters of the relaxed search alone.
    pub stats: SearchStats,
}

/// Reclassifies minimums as penalties and explains what cannot be met.
#[derive(Debug, Clone, Copy)]
pub struct RelaxationAnalyzer<'m> {
    model: &'m Model,
}

impl<'m> RelaxationAnalyzer<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self { model }
    }

    /// Runs the relaxed search and collects diagnostics.
    pub fn analyze(&self, config: &SolverConfig, budget: &Budget) -> Relaxation {
        let outcome = SearchRunner::run(self.model, Mode::Relaxed, config, budget);
        let mut violations = self.structural();
        if let Some(best) = &outcome.best {
            violations.extend(self.assignment_violations(&best.assignment));
        }
        violations.sort();
        debug!(
            "relaxation: {} violations, exhaustive={}",
            violations.len(),
            outcome.exhaustive
        );
        Relaxation {
            best: outcome.best,
            violations,
            exhaustive: outcome.exhaustive,
            stats: outcome.stats,
        }
    }

    /// Shortfalls and underloads of a concrete assignment.
    pub fn assignment_violations(&self, assignment: &Assignment) -> Vec<Violation> {
        let mut out = Vec::new();
        for (g, group) in self.model.groups().iter().enumerate() {
            let count = assignment.group(g).len() as u32;
            if count < group.min {
                let missing = group.min - count;
                out.push(Violation::new(
                    ViolationKind::GroupShortfall,
                    &group.id,
                    missing,
                    format!("shortfall={missing} ({count} assigned, min {})", group.min),
                ));
            }
        }
        let loads = assignment.loads(self.model.num_assistants());
        for (assistant, load) in self.model.assistants().iter().zip(loads) {
            if load < assistant.load_min {
                let missing = assistant.load_min - load;
                out.push(Violation::new(
                    ViolationKind::AssistantUnderload,
                    &assistant.id,
                    missing,
                    format!("underload={missing} (load {load}, min {})", assistant.load_min),
                ));
            }
        }
        out
    }

    /// Violations implied by the instance itself, whatever the assignment.
    pub fn structural(&self) -> Vec<Violation> {
        let model = self.model;
        let mut out = Vec::new();

        for group in model.groups() {
            let pool = group
                .pool
                .iter()
                .filter(|&&a| model.assistant(a).load_max > 0)
                .count() as u32;
            if pool < group.min {
                out.push(Violation::new(
                    ViolationKind::EligibilityPool,
                    &group.id,
                    group.min - pool,
                    format!("{pool} eligible assistants, min {}", group.min),
                ));
            }
        }

        for assistant in model.assistants() {
            let open_groups = assistant
                .eligible
                .iter()
                .filter(|&&g| model.group(g).max > 0)
                .count() as u32;
            let reach = open_groups.min(assistant.load_max);
            if reach < assistant.load_min {
                out.push(Violation::new(
                    ViolationKind::AssistantEligibility,
                    &assistant.id,
                    assistant.load_min - reach,
                    format!("at most {reach} groups reachable, load min {}", assistant.load_min),
                ));
            }
        }

        let supply: u64 = model.assistants().iter().map(|a| u64::from(a.load_max)).sum();
        let demand: u64 = model.groups().iter().map(|g| u64::from(g.min)).sum();
        if supply < demand {
            out.push(Violation::new(
                ViolationKind::TotalSupply,
                INSTANCE_ENTITY,
                clamp_u32(demand - supply),
                format!("assistants offer {supply} slots, groups need {demand}"),
            ));
        }

        let required: u64 = model.assistants().iter().map(|a| u64::from(a.load_min)).sum();
        let capacity: u64 = model.groups().iter().map(|g| u64::from(g.max)).sum();
        if required > capacity {
            out.push(Violation::new(
                ViolationKind::TotalDemand,
                INSTANCE_ENTITY,
                clamp_u32(required - capacity),
                format!("assistants need {required} slots, groups offer {capacity}"),
            ));
        }

        out
    }
}

fn clamp_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssistantSpec, GroupSpec, Instance};

    fn analyze(instance: &Instance) -> Relaxation {
        let model = Model::build(instance).unwrap();
        RelaxationAnalyzer::new(&model).analyze(&SolverConfig::default(), &Budget::unlimited())
    }

    fn kinds(relaxation: &Relaxation) -> Vec<(ViolationKind, &str)> {
        relaxation
            .violations
            .iter()
            .map(|v| (v.kind, v.entity_id.as_str()))
            .collect()
    }

    #[test]
    fn test_capacity_starved_group() {
        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 2, 2))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1"]));
        let relaxation = analyze(&instance);

        assert!(relaxation.exhaustive);
        let best = relaxation.best.as_ref().unwrap();
        assert!(best.assignment.contains(0, 0));
        assert_eq!(
            kinds(&relaxation),
            vec![
                (ViolationKind::GroupShortfall, "G1"),
                (ViolationKind::EligibilityPool, "G1"),
                (ViolationKind::TotalSupply, INSTANCE_ENTITY),
            ]
        );
        let shortfall = &relaxation.violations[0];
        assert_eq!(shortfall.amount, 1);
        assert!(shortfall.detail.contains("shortfall=1"));
    }

    #[test]
    fn test_underloaded_assistant() {
        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 0, 1))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1"]).with_load_min(2));
        let relaxation = analyze(&instance);
        assert_eq!(
            kinds(&relaxation),
            vec![
                (ViolationKind::AssistantUnderload, "A1"),
                (ViolationKind::AssistantEligibility, "A1"),
                (ViolationKind::TotalDemand, INSTANCE_ENTITY),
            ]
        );
        assert_eq!(relaxation.violations[0].amount, 1);
    }

    #[test]
    fn test_competing_minimums_share_shortfall() {
        // One assistant, two groups needing one each.
        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 1, 1))
            .with_group(GroupSpec::new("G2", 1, 1))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1", "G2"]).with_load(0, 1));
        let relaxation = analyze(&instance);
        let best = relaxation.best.as_ref().unwrap();
        assert_eq!(best.score.violation, 1);
        // Ties broken by branch order: the lower group index is taken.
        assert!(best.assignment.contains(0, 0));
        assert_eq!(
            kinds(&relaxation),
            vec![
                (ViolationKind::GroupShortfall, "G2"),
                (ViolationKind::TotalSupply, INSTANCE_ENTITY),
            ]
        );
    }

    #[test]
    fn test_zero_capacity_assistant_not_in_pool() {
        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 1, 1))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1"]).with_load(0, 0));
        let model = Model::build(&instance).unwrap();
        let structural = RelaxationAnalyzer::new(&model).structural();
        assert_eq!(structural[0].kind, ViolationKind::EligibilityPool);
        assert_eq!(structural[0].amount, 1);
    }

    #[test]
    fn test_feasible_instance_has_no_violations() {
        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 1, 1))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1"]));
        let relaxation = analyze(&instance);
        assert!(relaxation.violations.is_empty());
        assert_eq!(relaxation.best.unwrap().score.violation, 0);
    }
}
