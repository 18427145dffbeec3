//! Scoring rules and their extraction from a rule graph.
//!
//! A rule is any `shui:Score` instance:
//!
//! ```text
//! ex:booleanSelectScore a shui:Score ;
//!     shui:widget ex:BooleanSelectEditor ;
//!     shui:score 10 ;
//!     shui:dataGraphShape ex:BooleanShape .
//! ```
//!
//! Extraction checks every rule before returning any of them, so a single
//! malformed rule aborts the whole scoring call.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use widget_scoring_rdf::vocab::{rdf, shui, xsd};
use widget_scoring_rdf::{Graph, Node, Term};

use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Identifier of the `shui:Score` instance, only used in diagnostics.
    pub id: Node,
    pub widget: Node,
    pub weight: BigDecimal,
    /// `shui:dataGraphShape` references, checked against the focus item.
    pub value_shapes: Vec<Node>,
    /// `shui:shapesGraphShape` references, checked against the constraint shape.
    pub constraint_shapes: Vec<Node>,
}

impl Rule {
    pub fn is_unconditional(&self) -> bool {
        self.value_shapes.is_empty() && self.constraint_shapes.is_empty()
    }
}

/// Extract and validate every rule in `rules`, in deterministic subject order.
pub fn extract_rules(rules: &Graph) -> Result<Vec<Rule>> {
    let score_class = Term::iri(shui::SCORE);
    rules
        .subjects(rdf::TYPE, &score_class)
        .map(|id| extract_rule(rules, id))
        .collect()
}

fn extract_rule(rules: &Graph, id: &Node) -> Result<Rule> {
    let widget = exactly_one(rules, id, shui::WIDGET, "shui:widget")?;
    let Term::Node(widget) = widget else {
        return Err(ScoringError::malformed(
            id,
            format!("shui:widget must be an IRI or blank node, got {widget}"),
        ));
    };

    let score = exactly_one(rules, id, shui::SCORE_VALUE, "shui:score")?;
    let weight = parse_weight(score).map_err(|reason| ScoringError::malformed(id, reason))?;

    Ok(Rule {
        id: id.clone(),
        widget: widget.clone(),
        weight,
        value_shapes: shape_refs(rules, id, shui::DATA_GRAPH_SHAPE, "shui:dataGraphShape")?,
        constraint_shapes: shape_refs(
            rules,
            id,
            shui::SHAPES_GRAPH_SHAPE,
            "shui:shapesGraphShape",
        )?,
    })
}

fn exactly_one<'g>(rules: &'g Graph, id: &Node, predicate: &str, name: &str) -> Result<&'g Term> {
    let values: Vec<&Term> = rules.objects(id, predicate).collect();
    match values.as_slice() {
        [only] => Ok(*only),
        [] => Err(ScoringError::malformed(
            id,
            format!("a Score must have exactly one {name}, found none"),
        )),
        many => Err(ScoringError::malformed(
            id,
            format!("a Score must have exactly one {name}, found {}", many.len()),
        )),
    }
}

fn shape_refs(rules: &Graph, id: &Node, predicate: &str, name: &str) -> Result<Vec<Node>> {
    rules
        .objects(id, predicate)
        .map(|term| match term {
            Term::Node(node) => Ok(node.clone()),
            other => Err(ScoringError::malformed(
                id,
                format!("{name} must reference an IRI or blank node, got {other}"),
            )),
        })
        .collect()
}

/// Parse a `shui:score` literal into an exact decimal of any precision.
fn parse_weight(term: &Term) -> std::result::Result<BigDecimal, String> {
    let Term::Literal(lit) = term else {
        return Err(format!("shui:score must be a literal, got {term}"));
    };
    let integer_only = match lit.datatype.as_str() {
        xsd::INTEGER => true,
        xsd::DECIMAL => false,
        other => {
            return Err(format!(
                "shui:score must have datatype xsd:decimal or xsd:integer, got <{other}>"
            ))
        }
    };

    let normalized = normalize_decimal_lexical(&lit.lexical, integer_only)
        .ok_or_else(|| format!("shui:score `{}` is not a valid number", lit.lexical))?;
    BigDecimal::from_str(&normalized)
        .map_err(|e| format!("shui:score `{}` is not a valid number: {e}", lit.lexical))
}

/// Check an `xsd:decimal` (or `xsd:integer`) lexical form and rewrite it into
/// `-?digits(.digits)?`.
fn normalize_decimal_lexical(lexical: &str, integer_only: bool) -> Option<String> {
    let s = lexical.trim();
    let (negative, unsigned) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some(_) if integer_only => return None,
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let mut out = String::with_capacity(unsigned.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}
