//! Normalized constraint model.

use super::error::ModelError;
use super::types::{AssistantSpec, GroupSpec, Instance, ObjectiveWeights};
use std::collections::HashMap;

/// A validated assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assistant {
    /// Identifier from the instance.
    pub id: String,
    /// Eligible group indices, ascending.
    pub eligible: Vec<usize>,
    /// Minimum number of groups.
    pub load_min: u32,
    /// Maximum number of groups, never larger than `eligible.len()`.
    pub load_max: u32,
}

/// A validated group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Identifier from the instance.
    pub id: String,
    /// Minimum number of assistants.
    pub min: u32,
    /// Maximum number of assistants.
    pub max: u32,
    /// Index of the preceding group.
    pub pred: Option<usize>,
    /// Indices of groups naming this one as predecessor.
    pub successors: Vec<usize>,
    /// Indices of assistants eligible for this group, ascending.
    pub pool: Vec<usize>,
}

/// The normalized model shared read-only by all search workers.
///
/// Assistants and groups are sorted by id, so comparing indices is the same
/// as comparing identities. Eligibility and preferences are stored as dense
/// row-major matrices (`assistant * num_groups + group`).
///
/// # Examples
///
/// ```
/// use ta_assign::{AssistantSpec, GroupSpec, Instance, Model};
///
/// let instance = Instance::new()
///     .with_group(GroupSpec::new("G2", 1, 1))
///     .with_group(GroupSpec::new("G1", 1, 2))
///     .with_assistant(AssistantSpec::new("A1").with_eligible(["G1", "G2"]));
///
/// let model = Model::build(&instance).unwrap();
/// assert_eq!(model.group(0).id, "G1");
/// assert_eq!(model.assistant(0).load_max, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    assistants: Vec<Assistant>,
    groups: Vec<Group>,
    eligible: Vec<bool>,
    preference: Vec<i64>,
    weights: ObjectiveWeights,
}

impl Model {
    /// Validates an instance and builds the model.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] found. Groups are checked before
    /// assistants, and each entity class in id order.
    pub fn build(instance: &Instance) -> Result<Self, ModelError> {
        for (field, value) in instance.weights.fields() {
            if value < 0 {
                return Err(ModelError::NegativeWeight { field, value });
            }
        }

        let mut group_specs: Vec<&GroupSpec> = instance.groups.iter().collect();
        group_specs.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = group_specs.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(ModelError::DuplicateGroup(pair[0].id.clone()));
        }

        let mut assistant_specs: Vec<&AssistantSpec> = instance.assistants.iter().collect();
        assistant_specs.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = assistant_specs.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(ModelError::DuplicateAssistant(pair[0].id.clone()));
        }

        let group_index: HashMap<&str, usize> = group_specs
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id.as_str(), i))
            .collect();
        let assistant_index: HashMap<&str, usize> = assistant_specs
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.as_str(), i))
            .collect();

        let mut groups = Vec::with_capacity(group_specs.len());
        for spec in &group_specs {
            let min = non_negative(&spec.id, "min", spec.min)?;
            let max = non_negative(&spec.id, "max", spec.max)?;
            if min > max {
                return Err(ModelError::InvertedGroupBounds {
                    id: spec.id.clone(),
                    min: spec.min,
                    max: spec.max,
                });
            }
            let pred = match &spec.pred {
                None => None,
                Some(p) if *p == spec.id => {
                    return Err(ModelError::SelfPredecessor(spec.id.clone()));
                }
                Some(p) => Some(*group_index.get(p.as_str()).ok_or_else(|| {
                    ModelError::UnknownGroup {
                        entity: spec.id.clone(),
                        group: p.clone(),
                    }
                })?),
            };
            groups.push(Group {
                id: spec.id.clone(),
                min,
                max,
                pred,
                successors: Vec::new(),
                pool: Vec::new(),
            });
        }
        for g in 0..groups.len() {
            if let Some(p) = groups[g].pred {
                groups[p].successors.push(g);
            }
        }

        let num_groups = groups.len();
        let mut eligible = vec![false; assistant_specs.len() * num_groups];
        let mut assistants = Vec::with_capacity(assistant_specs.len());
        for (a, spec) in assistant_specs.iter().enumerate() {
            let mut elig = Vec::with_capacity(spec.eligible_group_ids.len());
            for gid in &spec.eligible_group_ids {
                let g = *group_index
                    .get(gid.as_str())
                    .ok_or_else(|| ModelError::UnknownGroup {
                        entity: spec.id.clone(),
                        group: gid.clone(),
                    })?;
                elig.push(g);
                eligible[a * num_groups + g] = true;
                groups[g].pool.push(a);
            }
            elig.sort_unstable();

            let load_min = match spec.load_min {
                Some(v) => non_negative(&spec.id, "load_min", v)?,
                None => 0,
            };
            let load_max = match spec.load_max {
                Some(v) => Some(non_negative(&spec.id, "load_max", v)?),
                None => None,
            };
            if let (Some(min), Some(max)) = (spec.load_min, spec.load_max) {
                if min > max {
                    return Err(ModelError::InvertedLoadBounds {
                        id: spec.id.clone(),
                        min,
                        max,
                    });
                }
            }
            if elig.is_empty() && load_min > 0 {
                return Err(ModelError::UnsatisfiableLoad {
                    id: spec.id.clone(),
                    load_min: i64::from(load_min),
                });
            }

            let cap = elig.len() as u32;
            assistants.push(Assistant {
                id: spec.id.clone(),
                eligible: elig,
                load_min,
                load_max: load_max.map_or(cap, |m| m.min(cap)),
            });
        }

        let mut preference = vec![0; assistants.len() * num_groups];
        for (g, spec) in group_specs.iter().enumerate() {
            for (aid, &weight) in &spec.preferences {
                let a = *assistant_index.get(aid.as_str()).ok_or_else(|| {
                    ModelError::UnknownAssistant {
                        group: spec.id.clone(),
                        assistant: aid.clone(),
                    }
                })?;
                preference[a * num_groups + g] = weight;
            }
        }

        let within_range = objective_extent(&assistants, &groups, &preference, &instance.weights)
            .is_some_and(|extent| extent <= OBJECTIVE_LIMIT);
        if !within_range {
            return Err(ModelError::ObjectiveOverflow);
        }

        Ok(Self {
            assistants,
            groups,
            eligible,
            preference,
            weights: instance.weights,
        })
    }

    /// Number of assistants.
    #[inline]
    pub fn num_assistants(&self) -> usize {
        self.assistants.len()
    }

    /// Number of groups.
    #[inline]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn assistants(&self) -> &[Assistant] {
        &self.assistants
    }

    #[inline]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// # Panics
    ///
    /// Panics if `a` is out of range.
    #[inline]
    pub fn assistant(&self, a: usize) -> &Assistant {
        &self.assistants[a]
    }

    /// # Panics
    ///
    /// Panics if `g` is out of range.
    #[inline]
    pub fn group(&self, g: usize) -> &Group {
        &self.groups[g]
    }

    /// Whether assistant `a` may be assigned to group `g`.
    #[inline]
    pub fn is_eligible(&self, a: usize, g: usize) -> bool {
        self.eligible[a * self.groups.len() + g]
    }

    /// Preference weight of assistant `a` for group `g`.
    #[inline]
    pub fn preference(&self, a: usize, g: usize) -> i64 {
        self.preference[a * self.groups.len() + g]
    }

    #[inline]
    pub fn weights(&self) -> &ObjectiveWeights {
        &self.weights
    }

    /// Looks up an assistant index by id.
    pub fn assistant_index(&self, id: &str) -> Option<usize> {
        self.assistants
            .binary_search_by(|a| a.id.as_str().cmp(id))
            .ok()
    }

    /// Looks up a group index by id.
    pub fn group_index(&self, id: &str) -> Option<usize> {
        self.groups.binary_search_by(|g| g.id.as_str().cmp(id)).ok()
    }
}

/// Bound on the worst-case objective magnitude. Costs, bounds and their
/// incremental updates each stay within twice this value, so `i64` holds
/// them without overflow.
const OBJECTIVE_LIMIT: i128 = i64::MAX as i128 / 2;

/// Sum of the largest magnitude each objective term can reach, or `None`
/// if even `i128` overflows.
fn objective_extent(
    assistants: &[Assistant],
    groups: &[Group],
    preference: &[i64],
    w: &ObjectiveWeights,
) -> Option<i128> {
    let mut terms = Vec::with_capacity(3 * assistants.len() + groups.len() + 1);
    for a in assistants {
        let load = i128::from(a.load_min.max(a.load_max));
        terms.push(i128::from(w.balance).checked_mul(load * load));
        terms.push(i128::from(w.consecutive).checked_mul(i128::from(a.load_max)));
        terms.push(i128::from(w.underload).checked_mul(i128::from(a.load_min)));
    }
    for g in groups {
        terms.push(i128::from(w.shortfall).checked_mul(i128::from(g.min)));
    }
    let weights = preference
        .iter()
        .try_fold(0i128, |acc, &p| acc.checked_add(i128::from(p).abs()));
    terms.push(weights.and_then(|sum| i128::from(w.preference).checked_mul(sum)));
    terms
        .into_iter()
        .try_fold(0i128, |acc, term| acc.checked_add(term?))
}

fn non_negative(entity: &str, field: &'static str, value: i64) -> Result<u32, ModelError> {
    if value < 0 {
        return Err(ModelError::NegativeBound {
            entity: entity.to_string(),
            field,
            value,
        });
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssistantSpec, GroupSpec};

    fn scenario_a() -> Instance {
        Instance::new()
            .with_group(GroupSpec::new("G1", 1, 2))
            .with_group(GroupSpec::new("G2", 1, 1))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1", "G2"]))
            .with_assistant(AssistantSpec::new("A2").with_eligible(["G1"]))
            .with_assistant(AssistantSpec::new("A3").with_eligible(["G2"]))
    }

    #[test]
    fn test_build_valid() {
        let model = Model::build(&scenario_a()).unwrap();
        assert_eq!(model.num_assistants(), 3);
        assert_eq!(model.num_groups(), 2);
        assert!(model.is_eligible(0, 0));
        assert!(model.is_eligible(0, 1));
        assert!(!model.is_eligible(1, 1));
        assert_eq!(model.group(0).pool, vec![0, 1]);
        assert_eq!(model.group(1).pool, vec![0, 2]);
    }

    #[test]
    fn test_entities_sorted_by_id() {
        let instance = Instance::new()
            .with_group(GroupSpec::new("b", 0, 1))
            .with_group(GroupSpec::new("a", 0, 1))
            .with_assistant(AssistantSpec::new("z").with_eligible(["a"]))
            .with_assistant(AssistantSpec::new("y").with_eligible(["b"]));
        let model = Model::build(&instance).unwrap();

        assert_eq!(model.group(0).id, "a");
        assert_eq!(model.assistant(0).id, "y");
        assert_eq!(model.assistant(0).eligible, vec![1]);
        assert_eq!(model.group_index("b"), Some(1));
        assert_eq!(model.assistant_index("z"), Some(1));
        assert_eq!(model.assistant_index("nobody"), None);
    }

    #[test]
    fn test_load_defaults_and_clamping() {
        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 0, 1))
            .with_group(GroupSpec::new("G2", 0, 1))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1", "G2"]))
            .with_assistant(
                AssistantSpec::new("A2")
                    .with_eligible(["G1"])
                    .with_load_max(5),
            );
        let model = Model::build(&instance).unwrap();

        assert_eq!(model.assistant(0).load_min, 0);
        assert_eq!(model.assistant(0).load_max, 2);
        assert_eq!(model.assistant(1).load_max, 1);
    }

    #[test]
    fn test_preferences_and_predecessors() {
        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 0, 1).with_preference("A1", 3))
            .with_group(GroupSpec::new("G2", 0, 1).with_pred("G1"))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1", "G2"]));
        let model = Model::build(&instance).unwrap();

        assert_eq!(model.preference(0, 0), 3);
        assert_eq!(model.preference(0, 1), 0);
        assert_eq!(model.group(1).pred, Some(0));
        assert_eq!(model.group(0).successors, vec![1]);
    }

    #[test]
    fn test_duplicate_ids() {
        let instance = scenario_a().with_group(GroupSpec::new("G1", 0, 1));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::DuplicateGroup("G1".into())
        );

        let instance = scenario_a().with_assistant(AssistantSpec::new("A2"));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::DuplicateAssistant("A2".into())
        );
    }

    #[test]
    fn test_inverted_bounds() {
        let instance = Instance::new().with_group(GroupSpec::new("G1", 2, 1));
        assert!(matches!(
            Model::build(&instance),
            Err(ModelError::InvertedGroupBounds { .. })
        ));

        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 0, 1))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1"]).with_load(2, 1));
        assert!(matches!(
            Model::build(&instance),
            Err(ModelError::InvertedLoadBounds { .. })
        ));
    }

    #[test]
    fn test_negative_bounds() {
        let instance = Instance::new().with_group(GroupSpec::new("G1", -1, 1));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::NegativeBound {
                entity: "G1".into(),
                field: "min",
                value: -1
            }
        );

        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 0, 1))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1"]).with_load_max(-2));
        assert!(matches!(
            Model::build(&instance),
            Err(ModelError::NegativeBound { field: "load_max", .. })
        ));
    }

    #[test]
    fn test_dangling_references() {
        let instance = scenario_a().with_assistant(AssistantSpec::new("A4").with_eligible(["G9"]));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::UnknownGroup {
                entity: "A4".into(),
                group: "G9".into()
            }
        );

        let instance = scenario_a().with_group(GroupSpec::new("G3", 0, 1).with_preference("A9", 1));
        assert!(matches!(
            Model::build(&instance),
            Err(ModelError::UnknownAssistant { .. })
        ));

        let instance = scenario_a().with_group(GroupSpec::new("G3", 0, 1).with_pred("G7"));
        assert!(matches!(
            Model::build(&instance),
            Err(ModelError::UnknownGroup { .. })
        ));

        let instance = scenario_a().with_group(GroupSpec::new("G3", 0, 1).with_pred("G3"));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::SelfPredecessor("G3".into())
        );
    }

    #[test]
    fn test_empty_eligibility_with_positive_minimum() {
        let instance = scenario_a().with_assistant(AssistantSpec::new("A4").with_load_min(1));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::UnsatisfiableLoad {
                id: "A4".into(),
                load_min: 1
            }
        );

        // Zero minimum is fine: the assistant simply stays idle.
        let instance = scenario_a().with_assistant(AssistantSpec::new("A4"));
        assert!(Model::build(&instance).is_ok());
    }

    #[test]
    fn test_huge_preferences_rejected() {
        let big = i64::MAX / 2;
        let instance = Instance::new()
            .with_group(
                GroupSpec::new("G1", 1, 2)
                    .with_preference("A1", big)
                    .with_preference("A2", big),
            )
            .with_group(GroupSpec::new("G2", 1, 1).with_preference("A1", big))
            .with_assistant(AssistantSpec::new("A1").with_eligible(["G1", "G2"]))
            .with_assistant(AssistantSpec::new("A2").with_eligible(["G1"]));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::ObjectiveOverflow
        );
    }

    #[test]
    fn test_huge_weights_and_loads_rejected() {
        let weights = ObjectiveWeights::default().with_balance(i64::MAX / 4);
        let instance = scenario_a().with_weights(weights);
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::ObjectiveOverflow
        );

        // A load minimum far beyond the eligible set still counts.
        let instance = Instance::new()
            .with_group(GroupSpec::new("G1", 0, 1))
            .with_assistant(
                AssistantSpec::new("A1")
                    .with_eligible(["G1"])
                    .with_load_min(i64::from(u32::MAX)),
            )
            .with_weights(ObjectiveWeights::default().with_balance(1_000));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::ObjectiveOverflow
        );
    }

    #[test]
    fn test_large_but_representable_weights_accepted() {
        let instance = scenario_a()
            .with_group(GroupSpec::new("G3", 0, 1).with_preference("A1", 1_000_000_000))
            .with_weights(ObjectiveWeights::default().with_preference(1_000_000));
        assert!(Model::build(&instance).is_ok());
    }

    #[test]
    fn test_negative_weight() {
        let instance = scenario_a().with_weights(ObjectiveWeights::default().with_balance(-1));
        assert_eq!(
            Model::build(&instance).unwrap_err(),
            ModelError::NegativeWeight {
                field: "balance",
                value: -1
            }
        );
    }
}
