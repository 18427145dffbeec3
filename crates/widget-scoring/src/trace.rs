use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use widget_scoring_rdf::Node;

use crate::ranking::ScoringResult;

/// Verdict for one shape reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Conforms,
    DoesNotConform,
    /// The shape could not be evaluated (undefined shape or validator
    /// error). Counts as not conforming.
    Failed(String),
}

impl Outcome {
    pub fn conforms(&self) -> bool {
        matches!(self, Outcome::Conforms)
    }
}

impl From<bool> for Outcome {
    fn from(conforms: bool) -> Self {
        if conforms {
            Outcome::Conforms
        } else {
            Outcome::DoesNotConform
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCheck {
    pub shape: Node,
    pub outcome: Outcome,
}

/// Why the constraint axis was decided without evaluating any shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSkip {
    /// No constraint shape was supplied and the policy makes such rules
    /// inapplicable.
    NoConstraintShape,
}

/// How one rule was evaluated. Only references that were actually checked
/// appear; evaluation stops at the first non-conforming one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStep {
    pub rule: Node,
    pub widget: Node,
    pub weight: BigDecimal,
    pub value_checks: Vec<ShapeCheck>,
    pub constraint_checks: Vec<ShapeCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_skip: Option<AxisSkip>,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringReport {
    pub result: ScoringResult,
    pub steps: Vec<RuleStep>,
}

impl ScoringReport {
    pub fn matched_steps(&self) -> impl Iterator<Item = &RuleStep> {
        self.steps.iter().filter(|s| s.matched)
    }
}
