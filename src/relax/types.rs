//! Violation diagnostics.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Entity id used for diagnostics about the instance as a whole.
pub const INSTANCE_ENTITY: &str = "instance";

/// Kind of a hard-constraint violation.
///
/// The declaration order is the order in which diagnostics are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ViolationKind {
    /// A group has fewer assistants than its minimum.
    GroupShortfall,
    /// An assistant has fewer groups than its load minimum.
    AssistantUnderload,
    /// A group's eligible pool is smaller than its minimum.
    EligibilityPool,
    /// An assistant's eligible groups cannot absorb its load minimum.
    AssistantEligibility,
    /// Summed load maximums are below summed group minimums.
    TotalSupply,
    /// Summed load minimums exceed summed group maximums.
    TotalDemand,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GroupShortfall => "group shortfall",
            Self::AssistantUnderload => "assistant underload",
            Self::EligibilityPool => "eligibility pool",
            Self::AssistantEligibility => "assistant eligibility",
            Self::TotalSupply => "total supply",
            Self::TotalDemand => "total demand",
        };
        f.write_str(name)
    }
}

/// One violated hard constraint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Violation {
    /// Which constraint is violated.
    pub kind: ViolationKind,
    /// Group or assistant id, or [`INSTANCE_ENTITY`].
    pub entity_id: String,
    /// Size of the violation in assistants or groups.
    pub amount: u32,
    /// Human-readable figures behind the violation.
    pub detail: String,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        entity_id: impl Into<String>,
        amount: u32,
        detail: String,
    ) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            amount,
            detail,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.kind, self.entity_id, self.detail)
    }
}
