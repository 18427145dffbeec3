use std::fmt;

use widget_scoring_rdf::{Literal, Node, Term};

use crate::error::ScoringError;

/// The item being scored for widget suitability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusItem {
    /// A literal; fully described by its lexical form and datatype.
    Value(Literal),
    /// An IRI or blank node whose properties live in a context graph.
    Resource(Node),
}

impl FocusItem {
    pub fn is_graph_resident(&self) -> bool {
        matches!(self, FocusItem::Resource(_))
    }
}

impl TryFrom<&Term> for FocusItem {
    type Error = ScoringError;

    fn try_from(term: &Term) -> Result<Self, Self::Error> {
        match term {
            Term::Literal(lit) => Ok(FocusItem::Value(lit.clone())),
            Term::Node(node) if node.as_str().is_empty() => Err(ScoringError::InvalidFocusValue(
                format!("{term} has an empty identifier"),
            )),
            Term::Node(node) => Ok(FocusItem::Resource(node.clone())),
            Term::Variable(_) => Err(ScoringError::InvalidFocusValue(format!(
                "{term} is a variable, expected a literal, IRI or blank node"
            ))),
        }
    }
}

impl From<Literal> for FocusItem {
    fn from(lit: Literal) -> Self {
        FocusItem::Value(lit)
    }
}

impl From<Node> for FocusItem {
    fn from(node: Node) -> Self {
        FocusItem::Resource(node)
    }
}

impl fmt::Display for FocusItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusItem::Value(lit) => lit.fmt(f),
            FocusItem::Resource(node) => node.fmt(f),
        }
    }
}
