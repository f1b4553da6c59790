//! Model construction errors.

/// Malformed or self-contradictory input, detected before any search.
///
/// Every variant names the offending entity so the caller can fix the
/// input; these errors are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("assistant '{0}' is defined twice")]
    DuplicateAssistant(String),

    #[error("group '{0}' is defined twice")]
    DuplicateGroup(String),

    #[error("group '{id}': min ({min}) exceeds max ({max})")]
    InvertedGroupBounds { id: String, min: i64, max: i64 },

    #[error("assistant '{id}': load_min ({min}) exceeds load_max ({max})")]
    InvertedLoadBounds { id: String, min: i64, max: i64 },

    #[error("'{entity}' references undefined group '{group}'")]
    UnknownGroup { entity: String, group: String },

    #[error("group '{group}' has a preference for undefined assistant '{assistant}'")]
    UnknownAssistant { group: String, assistant: String },

    #[error("group '{0}' is its own predecessor")]
    SelfPredecessor(String),

    #[error("'{entity}': {field} must be non-negative (got {value})")]
    NegativeBound {
        entity: String,
        field: &'static str,
        value: i64,
    },

    #[error("objective weight '{field}' must be non-negative (got {value})")]
    NegativeWeight { field: &'static str, value: i64 },

    #[error("assistant '{id}' is eligible for no group but needs at least {load_min}")]
    UnsatisfiableLoad { id: String, load_min: i64 },

    #[error("weights and bounds let the objective exceed the supported integer range")]
    ObjectiveOverflow,

    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}

impl ModelError {
    /// The id of the assistant or group at fault, if the error concerns one.
    pub fn entity(&self) -> Option<&str> {
        match self {
            ModelError::DuplicateAssistant(id)
            | ModelError::DuplicateGroup(id)
            | ModelError::SelfPredecessor(id)
            | ModelError::InvertedGroupBounds { id, .. }
            | ModelError::InvertedLoadBounds { id, .. }
            | ModelError::UnsatisfiableLoad { id, .. } => Some(id),
            ModelError::UnknownGroup { entity, .. } | ModelError::NegativeBound { entity, .. } => {
                Some(entity)
            }
            ModelError::UnknownAssistant { group, .. } => Some(group),
            ModelError::NegativeWeight { .. }
            | ModelError::ObjectiveOverflow
            | ModelError::InvalidConfig(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_entity() {
        let err = ModelError::InvertedGroupBounds {
            id: "G1".into(),
            min: 3,
            max: 2,
        };
        assert_eq!(err.to_string(), "group 'G1': min (3) exceeds max (2)");
        assert_eq!(err.entity(), Some("G1"));
    }

    #[test]
    fn test_entity_of_reference_errors() {
        let err = ModelError::UnknownGroup {
            entity: "A1".into(),
            group: "G9".into(),
        };
        assert_eq!(err.entity(), Some("A1"));

        let err = ModelError::NegativeWeight {
            field: "balance",
            value: -1,
        };
        assert_eq!(err.entity(), None);
    }
}
