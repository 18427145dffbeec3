//! Evaluating shape conditions against a focus item.
//!
//! IRIs and blank nodes are handed to the validator directly, with the
//! caller's context graph as data. Literals have no position in a graph, so
//! they are evaluated in one of two ways:
//!
//! - **datatype fast path**: a shape whose only constraint is
//!   `sh:datatype D` is decided by comparing the literal's datatype with `D`;
//! - **surrogate**: the literal becomes the value of a throwaway property on a
//!   throwaway subject, and the shape's constraints are copied onto a property
//!   shape over that property, targeting that subject:
//!
//! ```text
//! data:    _:x <urn:uuid:…> "literal" .
//! shapes:  <definition graph> +
//!          _:w a sh:PropertyShape ; sh:path <urn:uuid:…> ; sh:targetNode _:x ;
//!              <every constraint of the referenced shape> .
//! ```
//!
//! Any failure to reach a verdict is logged and counts as "does not conform".

use tracing::{trace, warn};
use widget_scoring_rdf::vocab::{rdf, rdfs, sh};
use widget_scoring_rdf::{Graph, Literal, Node, Term, Triple};

use crate::config::ScoringOptions;
use crate::focus::FocusItem;
use crate::trace::{Outcome, ShapeCheck};
use crate::validator::{ShapeValidator, ValidationError};

/// Statements about a shape that do not constrain its focus nodes.
const NON_CONSTRAINT_PREDICATES: &[&str] = &[
    rdf::TYPE,
    sh::TARGET_NODE,
    sh::TARGET_CLASS,
    sh::TARGET_SUBJECTS_OF,
    sh::TARGET_OBJECTS_OF,
    sh::PATH,
    sh::NAME,
    sh::DESCRIPTION,
    sh::MESSAGE,
    sh::SEVERITY,
    sh::ORDER,
    sh::GROUP,
    rdfs::LABEL,
    rdfs::COMMENT,
];

/// Why a single shape reference could not be evaluated. Never escapes this
/// module as an error; it is logged and turned into a non-match.
#[derive(Debug, thiserror::Error)]
enum ShapeEvaluationFailure {
    #[error("shape {0} has no constraints in its definition graph")]
    UndefinedShape(Node),
    #[error(transparent)]
    Validator(#[from] ValidationError),
}

/// The constraint statements of `shape` in `defs`.
pub fn shape_constraints<'g>(shape: &'g Node, defs: &'g Graph) -> Vec<&'g Triple> {
    defs.statements_about(shape)
        .filter(|t| !NON_CONSTRAINT_PREDICATES.contains(&t.predicate.as_str()))
        .collect()
}

/// `Some(D)` if the only constraint is `sh:datatype D`.
fn sole_datatype<'g>(constraints: &[&'g Triple]) -> Option<&'g str> {
    match constraints {
        [only] if only.predicate == sh::DATATYPE => only.object.as_iri(),
        _ => None,
    }
}

/// Graphs that let a literal be validated as the value of a property.
struct LiteralSurrogate {
    subject: Node,
    wrapper: Node,
    data: Graph,
    shapes: Graph,
}

impl LiteralSurrogate {
    fn build(literal: &Literal, constraints: &[&Triple], defs: &Graph) -> Self {
        let subject = Node::fresh_blank();
        let wrapper = Node::fresh_blank();
        let property = format!("urn:uuid:{}", uuid::Uuid::new_v4());

        let mut data = Graph::new();
        data.insert(subject.clone(), property.as_str(), literal.clone());

        let mut shapes = defs.clone();
        shapes.insert(wrapper.clone(), rdf::TYPE, Node::iri(sh::PROPERTY_SHAPE));
        shapes.insert(wrapper.clone(), sh::PATH, Node::iri(property));
        shapes.insert(wrapper.clone(), sh::TARGET_NODE, subject.clone());
        shapes.extend(
            constraints
                .iter()
                .map(|t| Triple::new(wrapper.clone(), t.predicate.clone(), t.object.clone())),
        );

        Self {
            subject,
            wrapper,
            data,
            shapes,
        }
    }
}

/// Evaluates shape references for one scoring call.
pub struct ConditionEvaluator<'a, V: ?Sized> {
    validator: &'a V,
    options: &'a ScoringOptions,
}

impl<'a, V: ShapeValidator + ?Sized> ConditionEvaluator<'a, V> {
    pub fn new(validator: &'a V, options: &'a ScoringOptions) -> Self {
        Self { validator, options }
    }

    /// Does `focus` conform to `shape` (defined in `defs`)? `context` is the
    /// data graph for IRI and blank node focus items.
    pub fn holds(&self, focus: &FocusItem, shape: &Node, defs: &Graph, context: &Graph) -> bool {
        self.check(focus, shape, defs, context).conforms()
    }

    /// Like [`holds`](Self::holds), keeping the reason for a failure.
    pub fn check(&self, focus: &FocusItem, shape: &Node, defs: &Graph, context: &Graph) -> Outcome {
        let verdict = match focus {
            FocusItem::Value(literal) => self.literal_conforms(literal, shape, defs),
            FocusItem::Resource(node) => self.node_conforms(node, shape, defs, context),
        };
        contain(verdict, shape, focus)
    }

    /// Logical AND over `shapes` in order, stopping at the first reference
    /// that does not hold. Every performed check is appended to `checks`.
    /// An empty list holds.
    pub fn check_all(
        &self,
        focus: &FocusItem,
        shapes: &[Node],
        defs: &Graph,
        context: &Graph,
        checks: &mut Vec<ShapeCheck>,
    ) -> bool {
        for shape in shapes {
            let outcome = self.check(focus, shape, defs, context);
            let conforms = outcome.conforms();
            checks.push(ShapeCheck {
                shape: shape.clone(),
                outcome,
            });
            if !conforms {
                return false;
            }
        }
        true
    }

    pub fn holds_all(&self, focus: &FocusItem, shapes: &[Node], defs: &Graph, context: &Graph) -> bool {
        self.check_all(focus, shapes, defs, context, &mut Vec::new())
    }

    /// Validate `data` against `shape` through the shape's own targets.
    pub fn check_targets(&self, shape: &Node, data: &Graph, defs: &Graph) -> Outcome {
        let verdict = self
            .validator
            .validate_graph(shape, data, defs)
            .map_err(ShapeEvaluationFailure::from);
        match verdict {
            Ok(conforms) => Outcome::from(conforms),
            Err(err) => {
                warn!(
                    shape = %shape,
                    error = %err,
                    "target-based shape validation failed; treating as not satisfied"
                );
                Outcome::Failed(err.to_string())
            }
        }
    }

    /// AND over `shapes` using target-based validation, short-circuiting.
    pub fn check_all_targets(
        &self,
        shapes: &[Node],
        data: &Graph,
        defs: &Graph,
        checks: &mut Vec<ShapeCheck>,
    ) -> bool {
        for shape in shapes {
            let outcome = self.check_targets(shape, data, defs);
            let conforms = outcome.conforms();
            checks.push(ShapeCheck {
                shape: shape.clone(),
                outcome,
            });
            if !conforms {
                return false;
            }
        }
        true
    }

    fn node_conforms(
        &self,
        node: &Node,
        shape: &Node,
        defs: &Graph,
        context: &Graph,
    ) -> Result<bool, ShapeEvaluationFailure> {
        if shape_constraints(shape, defs).is_empty() {
            return Err(ShapeEvaluationFailure::UndefinedShape(shape.clone()));
        }
        Ok(self.validator.validate_node(node, shape, context, defs)?)
    }

    fn literal_conforms(
        &self,
        literal: &Literal,
        shape: &Node,
        defs: &Graph,
    ) -> Result<bool, ShapeEvaluationFailure> {
        let constraints = shape_constraints(shape, defs);
        if constraints.is_empty() {
            return Err(ShapeEvaluationFailure::UndefinedShape(shape.clone()));
        }

        if self.options.datatype_fast_path {
            if let Some(datatype) = sole_datatype(&constraints) {
                let conforms = literal.datatype == datatype;
                trace!(shape = %shape, literal = %literal, conforms, "datatype fast path");
                return Ok(conforms);
            }
        }

        let surrogate = LiteralSurrogate::build(literal, &constraints, defs);
        Ok(self.validator.validate_node(
            &surrogate.subject,
            &surrogate.wrapper,
            &surrogate.data,
            &surrogate.shapes,
        )?)
    }
}

fn contain(verdict: Result<bool, ShapeEvaluationFailure>, shape: &Node, focus: &FocusItem) -> Outcome {
    match verdict {
        Ok(conforms) => Outcome::from(conforms),
        Err(err) => {
            warn!(
                shape = %shape,
                focus = %focus,
                error = %err,
                "shape condition could not be evaluated; treating as not satisfied"
            );
            Outcome::Failed(err.to_string())
        }
    }
}

/// Value nodes of a literal surrogate, for validators that want to recognise
/// one. Returns the literal if `data` is exactly one statement about `subject`.
pub fn surrogate_value<'g>(subject: &Node, data: &'g Graph) -> Option<&'g Term> {
    let mut statements = data.statements_about(subject);
    let only = statements.next()?;
    statements.next().is_none().then_some(&only.object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use widget_scoring_rdf::vocab::xsd;

    /// Records every call and answers from a fixed script.
    #[derive(Default)]
    struct Scripted {
        answer: Option<bool>,
        node_calls: RefCell<Vec<(Node, Node, Graph, Graph)>>,
        graph_calls: RefCell<usize>,
    }

    impl ShapeValidator for Scripted {
        fn validate_node(
            &self,
            focus: &Node,
            shape: &Node,
            data: &Graph,
            shapes: &Graph,
        ) -> Result<bool, ValidationError> {
            self.node_calls
                .borrow_mut()
                .push((focus.clone(), shape.clone(), data.clone(), shapes.clone()));
            self.answer
                .ok_or_else(|| ValidationError::Engine("scripted failure".into()))
        }

        fn validate_graph(&self, _: &Node, _: &Graph, _: &Graph) -> Result<bool, ValidationError> {
            *self.graph_calls.borrow_mut() += 1;
            self.answer
                .ok_or_else(|| ValidationError::Engine("scripted failure".into()))
        }
    }

    fn ex(local: &str) -> Node {
        Node::iri(format!("http://example.org/{local}"))
    }

    fn datatype_shape(defs: &mut Graph, shape: &Node, datatype: &str) {
        defs.insert(shape.clone(), rdf::TYPE, Node::iri(sh::NODE_SHAPE));
        defs.insert(shape.clone(), sh::DATATYPE, Node::iri(datatype));
    }

    #[test]
    fn fast_path_compares_datatypes_without_the_validator() {
        let mut defs = Graph::new();
        datatype_shape(&mut defs, &ex("BooleanShape"), xsd::BOOLEAN);
        datatype_shape(&mut defs, &ex("DateShape"), xsd::DATE);

        let validator = Scripted::default();
        let options = ScoringOptions::default();
        let eval = ConditionEvaluator::new(&validator, &options);
        let focus = FocusItem::Value(Literal::boolean(true));
        let empty = Graph::new();

        assert!(eval.holds(&focus, &ex("BooleanShape"), &defs, &empty));
        assert!(!eval.holds(&focus, &ex("DateShape"), &defs, &empty));
        assert!(validator.node_calls.borrow().is_empty());
    }

    #[test]
    fn annotations_do_not_disable_the_fast_path() {
        let mut defs = Graph::new();
        let shape = ex("Labelled");
        datatype_shape(&mut defs, &shape, xsd::BOOLEAN);
        defs.insert(shape.clone(), rdfs::LABEL, Literal::string("boolean values"));

        let validator = Scripted::default();
        let options = ScoringOptions::default();
        let eval = ConditionEvaluator::new(&validator, &options);
        assert!(eval.holds(
            &FocusItem::Value(Literal::boolean(false)),
            &shape,
            &defs,
            &Graph::new()
        ));
        assert!(validator.node_calls.borrow().is_empty());
    }

    #[test]
    fn disabled_fast_path_goes_through_the_surrogate() {
        let mut defs = Graph::new();
        datatype_shape(&mut defs, &ex("BooleanShape"), xsd::BOOLEAN);

        let validator = Scripted {
            answer: Some(true),
            ..Default::default()
        };
        let options = ScoringOptions::default().with_datatype_fast_path(false);
        let eval = ConditionEvaluator::new(&validator, &options);
        assert!(eval.holds(
            &FocusItem::Value(Literal::boolean(true)),
            &ex("BooleanShape"),
            &defs,
            &Graph::new()
        ));
        assert_eq!(validator.node_calls.borrow().len(), 1);
    }

    #[test]
    fn surrogate_carries_the_literal_and_copied_constraints() {
        let mut defs = Graph::new();
        let shape = ex("ShortString");
        datatype_shape(&mut defs, &shape, xsd::STRING);
        defs.insert(shape.clone(), sh::MAX_LENGTH, Literal::integer(5));
        defs.insert(shape.clone(), sh::TARGET_CLASS, ex("Thing"));

        let validator = Scripted {
            answer: Some(true),
            ..Default::default()
        };
        let options = ScoringOptions::default();
        let eval = ConditionEvaluator::new(&validator, &options);
        let literal = Literal::string("abc");
        assert!(eval.holds(&FocusItem::Value(literal.clone()), &shape, &defs, &Graph::new()));

        let calls = validator.node_calls.borrow();
        let (focus, wrapper, data, shapes) = &calls[0];
        assert!(focus.is_blank());
        assert_eq!(surrogate_value(focus, data), Some(&Term::from(literal)));

        let path = shapes.objects(wrapper, sh::PATH).next().and_then(Term::as_iri);
        assert!(path.is_some_and(|p| p.starts_with("urn:uuid:")));
        assert_eq!(
            shapes.objects(wrapper, sh::TARGET_NODE).next(),
            Some(&Term::from(focus.clone()))
        );
        assert_eq!(
            shapes.objects(wrapper, sh::DATATYPE).next(),
            Some(&Term::iri(xsd::STRING))
        );
        assert_eq!(
            shapes.objects(wrapper, sh::MAX_LENGTH).next(),
            Some(&Term::from(Literal::integer(5)))
        );
        assert!(shapes.objects(wrapper, sh::TARGET_CLASS).next().is_none());
        // Definitions stay available for nested shape references.
        assert!(shapes.has_subject(&shape));
    }

    #[test]
    fn undefined_shapes_never_hold() {
        let mut defs = Graph::new();
        defs.insert(ex("OnlyTyped"), rdf::TYPE, Node::iri(sh::NODE_SHAPE));

        let validator = Scripted {
            answer: Some(true),
            ..Default::default()
        };
        let options = ScoringOptions::default();
        let eval = ConditionEvaluator::new(&validator, &options);
        let literal = FocusItem::Value(Literal::string("x"));
        let resource = FocusItem::Resource(ex("item"));

        for focus in [&literal, &resource] {
            assert!(matches!(
                eval.check(focus, &ex("Missing"), &defs, &Graph::new()),
                Outcome::Failed(_)
            ));
            assert!(!eval.holds(focus, &ex("OnlyTyped"), &defs, &Graph::new()));
        }
        assert!(validator.node_calls.borrow().is_empty());
    }

    #[test]
    fn validator_errors_become_non_matches() {
        let mut defs = Graph::new();
        defs.insert(ex("PersonShape"), sh::CLASS, ex("Person"));

        let validator = Scripted::default();
        let options = ScoringOptions::default();
        let eval = ConditionEvaluator::new(&validator, &options);
        let outcome = eval.check(
            &FocusItem::Resource(ex("alice")),
            &ex("PersonShape"),
            &defs,
            &Graph::new(),
        );
        assert_eq!(
            outcome,
            Outcome::Failed("validation engine failed: scripted failure".to_string())
        );
    }

    #[test]
    fn resources_are_validated_against_the_context_graph() {
        let mut defs = Graph::new();
        defs.insert(ex("PersonShape"), sh::CLASS, ex("Person"));
        let mut context = Graph::new();
        context.insert(ex("alice"), rdf::TYPE, ex("Person"));

        let validator = Scripted {
            answer: Some(true),
            ..Default::default()
        };
        let options = ScoringOptions::default();
        let eval = ConditionEvaluator::new(&validator, &options);
        assert!(eval.holds(&FocusItem::Resource(ex("alice")), &ex("PersonShape"), &defs, &context));

        let calls = validator.node_calls.borrow();
        let (focus, shape, data, shapes) = &calls[0];
        assert_eq!(focus, &ex("alice"));
        assert_eq!(shape, &ex("PersonShape"));
        assert_eq!(data, &context);
        assert_eq!(shapes, &defs);
    }

    #[test]
    fn conjunction_short_circuits_and_empty_holds() {
        let mut defs = Graph::new();
        datatype_shape(&mut defs, &ex("BooleanShape"), xsd::BOOLEAN);
        datatype_shape(&mut defs, &ex("DateShape"), xsd::DATE);

        let validator = Scripted::default();
        let options = ScoringOptions::default();
        let eval = ConditionEvaluator::new(&validator, &options);
        let focus = FocusItem::Value(Literal::boolean(true));
        let empty = Graph::new();

        assert!(eval.holds_all(&focus, &[], &defs, &empty));

        let mut checks = Vec::new();
        let shapes = [ex("DateShape"), ex("BooleanShape")];
        assert!(!eval.check_all(&focus, &shapes, &defs, &empty, &mut checks));
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].shape, ex("DateShape"));
        assert_eq!(checks[0].outcome, Outcome::DoesNotConform);
    }

    #[test]
    fn target_checks_contain_errors() {
        let validator = Scripted::default();
        let options = ScoringOptions::default();
        let eval = ConditionEvaluator::new(&validator, &options);
        let outcome = eval.check_targets(&ex("Any"), &Graph::new(), &Graph::new());
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(*validator.graph_calls.borrow(), 1);
    }
}
