use serde::{Deserialize, Serialize};

/// How a rule's constraint-shape conditions are decided when the caller did
/// not name a constraint shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingConstraintShapePolicy {
    /// Validate the shapes graph (or an empty graph) against each referenced
    /// shape using the shape's own declared targets. Shapes without targets
    /// pass.
    #[default]
    TargetBased,
    /// Rules carrying constraint-shape conditions never match.
    Inapplicable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringOptions {
    pub missing_constraint_shape: MissingConstraintShapePolicy,
    /// Decide literal conditions whose only constraint is `sh:datatype`
    /// without calling the validator.
    pub datatype_fast_path: bool,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            missing_constraint_shape: MissingConstraintShapePolicy::TargetBased,
            datatype_fast_path: true,
        }
    }
}

impl ScoringOptions {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_missing_constraint_shape(mut self, policy: MissingConstraintShapePolicy) -> Self {
        self.missing_constraint_shape = policy;
        self
    }

    pub fn with_datatype_fast_path(mut self, enabled: bool) -> Self {
        self.datatype_fast_path = enabled;
        self
    }
}
