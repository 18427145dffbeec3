//! Test-only validators.
//!
//! `MiniShacl` checks a small SHACL Core subset, enough to drive scoring
//! scenarios end to end. It is not a conformant SHACL engine.
#![allow(dead_code)]

use std::cell::RefCell;
use std::str::FromStr;

use regex::Regex;
use widget_scoring::evaluate::shape_constraints;
use widget_scoring::rdf::vocab::{rdf, sh};
use widget_scoring::rdf::{Graph, Literal, Node, Term, Triple};
use widget_scoring::{BigDecimal, ShapeValidator, ValidationError};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

pub fn ex(local: &str) -> Node {
    Node::iri(format!("http://example.org/{local}"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MiniShacl;

impl ShapeValidator for MiniShacl {
    fn validate_node(
        &self,
        focus: &Node,
        shape: &Node,
        data: &Graph,
        shapes: &Graph,
    ) -> Result<bool, ValidationError> {
        conforms(&Term::from(focus.clone()), shape, data, shapes)
    }

    fn validate_graph(
        &self,
        shape: &Node,
        data: &Graph,
        shapes: &Graph,
    ) -> Result<bool, ValidationError> {
        for focus in target_nodes(shape, data, shapes) {
            if !conforms(&focus, shape, data, shapes)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn target_nodes(shape: &Node, data: &Graph, shapes: &Graph) -> Vec<Term> {
    let mut targets: Vec<Term> = shapes.objects(shape, sh::TARGET_NODE).cloned().collect();
    for class in shapes.objects(shape, sh::TARGET_CLASS) {
        targets.extend(data.subjects(rdf::TYPE, class).cloned().map(Term::from));
    }
    targets
}

fn conforms(focus: &Term, shape: &Node, data: &Graph, shapes: &Graph) -> Result<bool, ValidationError> {
    let values: Vec<Term> = match shapes.objects(shape, sh::PATH).next() {
        Some(Term::Node(Node::Iri(path))) => match focus {
            Term::Node(node) => data.objects(node, path).cloned().collect(),
            _ => Vec::new(),
        },
        Some(other) => {
            return Err(ValidationError::MalformedShape {
                shape: shape.clone(),
                reason: format!("only predicate paths are supported, got {other}"),
            })
        }
        None => vec![focus.clone()],
    };

    for constraint in shape_constraints(shape, shapes) {
        if !check(constraint, shape, &values, data, shapes)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn check(
    constraint: &Triple,
    shape: &Node,
    values: &[Term],
    data: &Graph,
    shapes: &Graph,
) -> Result<bool, ValidationError> {
    let param = &constraint.object;
    let malformed = |reason: &str| ValidationError::MalformedShape {
        shape: shape.clone(),
        reason: format!("{}: {reason}", constraint.predicate),
    };

    let ok = match constraint.predicate.as_str() {
        sh::DATATYPE => {
            let datatype = param.as_iri().ok_or_else(|| malformed("expected an IRI"))?;
            values
                .iter()
                .all(|v| v.as_literal().is_some_and(|l| l.datatype == datatype))
        }
        sh::CLASS => values.iter().all(|v| match v {
            Term::Node(node) => data.objects(node, rdf::TYPE).any(|c| c == param),
            _ => false,
        }),
        sh::NODE_KIND => {
            let kind = param.as_iri().ok_or_else(|| malformed("expected an IRI"))?;
            values.iter().all(|v| match (kind, v) {
                (sh::IRI, Term::Node(n)) => n.is_iri(),
                (sh::BLANK_NODE, Term::Node(n)) => n.is_blank(),
                (sh::LITERAL, Term::Literal(_)) => true,
                (sh::BLANK_NODE_OR_IRI, Term::Node(_)) => true,
                _ => false,
            })
        }
        sh::HAS_VALUE => values.contains(param),
        sh::IN => {
            let allowed = shapes
                .list_items(param)
                .map_err(|e| malformed(&e.to_string()))?;
            values.iter().all(|v| allowed.contains(v))
        }
        sh::MIN_LENGTH | sh::MAX_LENGTH => {
            let bound = count_param(param).ok_or_else(|| malformed("expected an integer"))?;
            values.iter().all(|v| {
                let len = match v {
                    Term::Literal(l) => l.lexical.chars().count(),
                    Term::Node(Node::Iri(iri)) => iri.chars().count(),
                    _ => return false,
                };
                if constraint.predicate == sh::MIN_LENGTH {
                    len >= bound
                } else {
                    len <= bound
                }
            })
        }
        sh::PATTERN => {
            let pattern = param
                .as_literal()
                .ok_or_else(|| malformed("expected a string"))?;
            let re = Regex::new(&pattern.lexical).map_err(|e| malformed(&e.to_string()))?;
            values.iter().all(|v| match v {
                Term::Literal(l) => re.is_match(&l.lexical),
                Term::Node(Node::Iri(iri)) => re.is_match(iri),
                _ => false,
            })
        }
        sh::MIN_INCLUSIVE | sh::MAX_INCLUSIVE => {
            let bound = param
                .as_literal()
                .and_then(numeric)
                .ok_or_else(|| malformed("expected a number"))?;
            values.iter().all(|v| match v.as_literal().and_then(numeric) {
                Some(n) if constraint.predicate == sh::MIN_INCLUSIVE => n >= bound,
                Some(n) => n <= bound,
                None => false,
            })
        }
        sh::MIN_COUNT => {
            let bound = count_param(param).ok_or_else(|| malformed("expected an integer"))?;
            values.len() >= bound
        }
        sh::MAX_COUNT => {
            let bound = count_param(param).ok_or_else(|| malformed("expected an integer"))?;
            values.len() <= bound
        }
        sh::PROPERTY | sh::NODE => {
            let Term::Node(nested) = param else {
                return Err(malformed("expected a shape node"));
            };
            for value in values {
                if !conforms(value, nested, data, shapes)? {
                    return Ok(false);
                }
            }
            true
        }
        other if other.starts_with(sh::NS) => {
            return Err(ValidationError::UnsupportedConstraint {
                shape: shape.clone(),
                constraint: other.to_string(),
            })
        }
        _ => true,
    };
    Ok(ok)
}

fn count_param(term: &Term) -> Option<usize> {
    term.as_literal()?.lexical.trim().parse().ok()
}

fn numeric(literal: &Literal) -> Option<BigDecimal> {
    BigDecimal::from_str(literal.lexical.trim()).ok()
}

/// Records every validator call before delegating.
#[derive(Debug, Default)]
pub struct Recording<V> {
    pub inner: V,
    pub node_calls: RefCell<Vec<(Node, Node)>>,
    pub graph_calls: RefCell<Vec<Node>>,
}

impl<V> Recording<V> {
    pub fn new(inner: V) -> Self {
        Self {
            inner,
            node_calls: RefCell::new(Vec::new()),
            graph_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn node_shapes(&self) -> Vec<Node> {
        self.node_calls.borrow().iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn total_calls(&self) -> usize {
        self.node_calls.borrow().len() + self.graph_calls.borrow().len()
    }
}

impl<V: ShapeValidator> ShapeValidator for Recording<V> {
    fn validate_node(
        &self,
        focus: &Node,
        shape: &Node,
        data: &Graph,
        shapes: &Graph,
    ) -> Result<bool, ValidationError> {
        self.node_calls
            .borrow_mut()
            .push((focus.clone(), shape.clone()));
        self.inner.validate_node(focus, shape, data, shapes)
    }

    fn validate_graph(
        &self,
        shape: &Node,
        data: &Graph,
        shapes: &Graph,
    ) -> Result<bool, ValidationError> {
        self.graph_calls.borrow_mut().push(shape.clone());
        self.inner.validate_graph(shape, data, shapes)
    }
}

/// Never reaches a verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failing;

impl ShapeValidator for Failing {
    fn validate_node(&self, _: &Node, _: &Node, _: &Graph, _: &Graph) -> Result<bool, ValidationError> {
        Err(ValidationError::Engine("validator unavailable".into()))
    }

    fn validate_graph(&self, _: &Node, _: &Graph, _: &Graph) -> Result<bool, ValidationError> {
        Err(ValidationError::Engine("validator unavailable".into()))
    }
}
