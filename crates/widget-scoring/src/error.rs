use std::fmt;

use widget_scoring_rdf::Node;

/// Fatal errors of a scoring call. Any of these aborts the call before a
/// single rule is evaluated; no partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("malformed scoring rule {rule}: {reason}")]
    MalformedRule { rule: Node, reason: String },
    #[error("invalid focus value: {0}")]
    InvalidFocusValue(String),
    #[error("missing graph: {0}")]
    MissingGraph(MissingGraph),
}

impl ScoringError {
    pub(crate) fn malformed(rule: &Node, reason: impl Into<String>) -> Self {
        ScoringError::MalformedRule {
            rule: rule.clone(),
            reason: reason.into(),
        }
    }
}

/// Which supplementary graph a call needed but did not receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingGraph {
    /// A graph-resident focus item was supplied without a context graph.
    ContextGraph,
    /// A constraint shape was supplied without the shapes graph defining it.
    ShapesGraph,
}

impl fmt::Display for MissingGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingGraph::ContextGraph => {
                f.write_str("a context graph is required for IRI or blank node focus items")
            }
            MissingGraph::ShapesGraph => {
                f.write_str("a shapes graph is required when a constraint shape is given")
            }
        }
    }
}

pub type Result<T, E = ScoringError> = std::result::Result<T, E>;
