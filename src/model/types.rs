//! Raw instance data consumed by the model builder.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An assistant as supplied by the caller.
///
/// Bounds are signed so that negative input can be reported instead of
/// silently wrapping; the builder rejects them.
///
/// # Examples
///
/// ```
/// use ta_assign::AssistantSpec;
///
/// let a = AssistantSpec::new("alice")
///     .with_eligible(["mon-10", "tue-12"])
///     .with_load(1, 2);
/// assert_eq!(a.eligible_group_ids.len(), 2);
/// assert_eq!(a.load_max, Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssistantSpec {
    /// Unique identifier.
    pub id: String,
    /// Groups this assistant may be assigned to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub eligible_group_ids: BTreeSet<String>,
    /// Minimum number of groups. Defaults to 0.
    #[cfg_attr(feature = "serde", serde(default))]
    pub load_min: Option<i64>,
    /// Maximum number of groups. Defaults to the size of the eligibility set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub load_max: Option<i64>,
}

impl AssistantSpec {
    /// Creates an assistant with no eligible groups and no load bounds.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            eligible_group_ids: BTreeSet::new(),
            load_min: None,
            load_max: None,
        }
    }

    /// Adds groups to the eligibility set.
    pub fn with_eligible<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_group_ids
            .extend(groups.into_iter().map(Into::into));
        self
    }

    /// Sets the load minimum.
    pub fn with_load_min(mut self, n: i64) -> Self {
        self.load_min = Some(n);
        self
    }

    /// Sets the load maximum.
    pub fn with_load_max(mut self, n: i64) -> Self {
        self.load_max = Some(n);
        self
    }

    /// Sets both load bounds.
    pub fn with_load(self, min: i64, max: i64) -> Self {
        self.with_load_min(min).with_load_max(max)
    }
}

/// An exercise group as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupSpec {
    /// Unique identifier.
    pub id: String,
    /// Minimum number of assistants.
    pub min: i64,
    /// Maximum number of assistants.
    pub max: i64,
    /// Preference weight per assistant id. Higher is better; absent means 0.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preferences: BTreeMap<String, i64>,
    /// The group held immediately before this one.
    ///
    /// Teaching both a group and its predecessor is penalised with
    /// [`ObjectiveWeights::consecutive`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub pred: Option<String>,
}

impl GroupSpec {
    /// Creates a group requiring between `min` and `max` assistants.
    pub fn new(id: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            id: id.into(),
            min,
            max,
            preferences: BTreeMap::new(),
            pred: None,
        }
    }

    /// Sets the preference weight of an assistant for this group.
    pub fn with_preference(mut self, assistant: impl Into<String>, weight: i64) -> Self {
        self.preferences.insert(assistant.into(), weight);
        self
    }

    /// Sets the predecessor group.
    pub fn with_pred(mut self, group: impl Into<String>) -> Self {
        self.pred = Some(group.into());
        self
    }
}

/// Weights of the objective terms.
///
/// The soft objective is a cost (lower is better):
///
/// ```text
/// cost = balance * sum(load^2)
///      - preference * sum(weight of assigned pairs)
///      + consecutive * (pairs teaching a group and its predecessor)
/// ```
///
/// `shortfall` and `underload` only apply to relaxed (infeasible) solves,
/// where they price one missing assistant in a group and one missing group
/// in an assistant's load respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObjectiveWeights {
    /// Multiplier for preference weights.
    pub preference: i64,
    /// Multiplier for the sum of squared loads.
    pub balance: i64,
    /// Penalty per consecutive-groups pair.
    pub consecutive: i64,
    /// Relaxation penalty per missing assistant in a group.
    pub shortfall: i64,
    /// Relaxation penalty per missing group in an assistant's load.
    pub underload: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            preference: 1,
            balance: 1,
            consecutive: 10,
            shortfall: 1,
            underload: 1,
        }
    }
}

impl ObjectiveWeights {
    /// Sets the preference multiplier.
    pub fn with_preference(mut self, w: i64) -> Self {
        self.preference = w;
        self
    }

    /// Sets the load-balance multiplier.
    pub fn with_balance(mut self, w: i64) -> Self {
        self.balance = w;
        self
    }

    /// Sets the consecutive-groups penalty.
    pub fn with_consecutive(mut self, w: i64) -> Self {
        self.consecutive = w;
        self
    }

    /// Sets the group shortfall penalty used by relaxation.
    pub fn with_shortfall(mut self, w: i64) -> Self {
        self.shortfall = w;
        self
    }

    /// Sets the assistant underload penalty used by relaxation.
    pub fn with_underload(mut self, w: i64) -> Self {
        self.underload = w;
        self
    }

    pub(crate) fn fields(&self) -> [(&'static str, i64); 5] {
        [
            ("preference", self.preference),
            ("balance", self.balance),
            ("consecutive", self.consecutive),
            ("shortfall", self.shortfall),
            ("underload", self.underload),
        ]
    }
}

/// A complete problem instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Instance {
    /// All assistants.
    #[cfg_attr(feature = "serde", serde(default))]
    pub assistants: Vec<AssistantSpec>,
    /// All groups.
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<GroupSpec>,
    /// Objective weights.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weights: ObjectiveWeights,
}

impl Instance {
    /// Creates an empty instance with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assistant.
    pub fn with_assistant(mut self, assistant: AssistantSpec) -> Self {
        self.assistants.push(assistant);
        self
    }

    /// Adds a group.
    pub fn with_group(mut self, group: GroupSpec) -> Self {
        self.groups.push(group);
        self
    }

    /// Replaces the objective weights.
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }
}
