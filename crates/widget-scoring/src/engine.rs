//! The scoring algorithm.
//!
//! Every call validates its inputs, extracts all rules, and then evaluates
//! each rule on two independent axes:
//!
//! - **value axis**: the focus item against every `shui:dataGraphShape`;
//! - **constraint axis**: the constraint shape against every
//!   `shui:shapesGraphShape`.
//!
//! A rule whose two axes both hold contributes its `(widget, weight)` pair.
//! Pairs are never merged; [`rank`] orders them.

use tracing::debug;
use widget_scoring_rdf::{Graph, Node, Term};

use crate::config::{MissingConstraintShapePolicy, ScoringOptions};
use crate::error::{MissingGraph, Result, ScoringError};
use crate::evaluate::ConditionEvaluator;
use crate::focus::FocusItem;
use crate::ranking::{rank, ScoringResult, WidgetScore};
use crate::rule::{extract_rules, Rule};
use crate::trace::{AxisSkip, RuleStep, ScoringReport};
use crate::validator::ShapeValidator;

/// Inputs of one scoring call. Everything is borrowed; nothing outlives
/// the call.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRequest<'a> {
    focus: &'a Term,
    rules: &'a Graph,
    context_graph: Option<&'a Graph>,
    constraint_shape: Option<&'a Node>,
    shapes_graph: Option<&'a Graph>,
    value_shape_defs: Option<&'a Graph>,
    constraint_shape_defs: Option<&'a Graph>,
}

impl<'a> ScoringRequest<'a> {
    pub fn new(focus: &'a Term, rules: &'a Graph) -> Self {
        Self {
            focus,
            rules,
            context_graph: None,
            constraint_shape: None,
            shapes_graph: None,
            value_shape_defs: None,
            constraint_shape_defs: None,
        }
    }

    /// Graph describing an IRI or blank node focus item.
    pub fn context_graph(mut self, graph: &'a Graph) -> Self {
        self.context_graph = Some(graph);
        self
    }

    /// The shape governing the focus item's property.
    pub fn constraint_shape(mut self, shape: &'a Node) -> Self {
        self.constraint_shape = Some(shape);
        self
    }

    /// Graph in which the constraint shape is defined.
    pub fn shapes_graph(mut self, graph: &'a Graph) -> Self {
        self.shapes_graph = Some(graph);
        self
    }

    /// Definitions for `shui:dataGraphShape` references. Defaults to the
    /// rule graph.
    pub fn value_shape_defs(mut self, graph: &'a Graph) -> Self {
        self.value_shape_defs = Some(graph);
        self
    }

    /// Definitions for `shui:shapesGraphShape` references. Defaults to the
    /// rule graph.
    pub fn constraint_shape_defs(mut self, graph: &'a Graph) -> Self {
        self.constraint_shape_defs = Some(graph);
        self
    }
}

/// Ranks widgets for focus items using an injected [`ShapeValidator`].
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine<V> {
    validator: V,
    options: ScoringOptions,
}

impl<V: ShapeValidator> ScoringEngine<V> {
    pub fn new(validator: V) -> Self {
        Self::with_options(validator, ScoringOptions::default())
    }

    pub fn with_options(validator: V, options: ScoringOptions) -> Self {
        Self { validator, options }
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Score the request's focus item.
    ///
    /// Fails before evaluating anything if the focus item is unusable, a
    /// required graph is missing, or any rule is malformed.
    pub fn score(&self, request: &ScoringRequest<'_>) -> Result<ScoringResult> {
        self.explain(request).map(|report| report.result)
    }

    /// Like [`score`](Self::score), also returning how every rule was decided.
    pub fn explain(&self, request: &ScoringRequest<'_>) -> Result<ScoringReport> {
        let focus = FocusItem::try_from(request.focus)?;
        if focus.is_graph_resident() && request.context_graph.is_none() {
            return Err(ScoringError::MissingGraph(MissingGraph::ContextGraph));
        }
        if request.constraint_shape.is_some() && request.shapes_graph.is_none() {
            return Err(ScoringError::MissingGraph(MissingGraph::ShapesGraph));
        }

        let rules = extract_rules(request.rules)?;
        debug!(focus = %focus, rules = rules.len(), "scoring focus item");

        let empty = Graph::new();
        let inputs = AxisInputs {
            focus: &focus,
            context: request.context_graph.unwrap_or(&empty),
            value_defs: request.value_shape_defs.unwrap_or(request.rules),
            constraint_defs: request.constraint_shape_defs.unwrap_or(request.rules),
            constraint_shape: request.constraint_shape,
            shapes: request.shapes_graph.unwrap_or(&empty),
        };
        let evaluator = ConditionEvaluator::new(&self.validator, &self.options);

        let steps: Vec<RuleStep> = rules
            .into_iter()
            .map(|rule| self.evaluate_rule(&evaluator, &inputs, rule))
            .collect();

        let matched: Vec<WidgetScore> = steps
            .iter()
            .filter(|step| step.matched)
            .map(|step| WidgetScore::new(step.widget.clone(), step.weight.clone()))
            .collect();
        let result = rank(matched);
        debug!(
            focus = %focus,
            matched = result.len(),
            top = ?result.default_widget().map(Node::as_str),
            "scoring finished"
        );

        Ok(ScoringReport { result, steps })
    }

    fn evaluate_rule(
        &self,
        evaluator: &ConditionEvaluator<'_, V>,
        inputs: &AxisInputs<'_>,
        rule: Rule,
    ) -> RuleStep {
        let mut value_checks = Vec::new();
        let mut constraint_checks = Vec::new();
        let mut constraint_skip = None;

        let value_ok = evaluator.check_all(
            inputs.focus,
            &rule.value_shapes,
            inputs.value_defs,
            inputs.context,
            &mut value_checks,
        );

        let constraint_ok = value_ok
            && if rule.constraint_shapes.is_empty() {
                true
            } else if let Some(shape) = inputs.constraint_shape {
                evaluator.check_all(
                    &FocusItem::Resource(shape.clone()),
                    &rule.constraint_shapes,
                    inputs.constraint_defs,
                    inputs.shapes,
                    &mut constraint_checks,
                )
            } else {
                match self.options.missing_constraint_shape {
                    MissingConstraintShapePolicy::TargetBased => evaluator.check_all_targets(
                        &rule.constraint_shapes,
                        inputs.shapes,
                        inputs.constraint_defs,
                        &mut constraint_checks,
                    ),
                    MissingConstraintShapePolicy::Inapplicable => {
                        constraint_skip = Some(AxisSkip::NoConstraintShape);
                        false
                    }
                }
            };

        debug!(
            rule = %rule.id,
            widget = %rule.widget,
            weight = %rule.weight,
            value_ok,
            constraint_ok,
            "rule evaluated"
        );

        RuleStep {
            rule: rule.id,
            widget: rule.widget,
            weight: rule.weight,
            value_checks,
            constraint_checks,
            constraint_skip,
            matched: value_ok && constraint_ok,
        }
    }
}

/// Per-call graphs with defaults already applied.
struct AxisInputs<'a> {
    focus: &'a FocusItem,
    context: &'a Graph,
    value_defs: &'a Graph,
    constraint_defs: &'a Graph,
    constraint_shape: Option<&'a Node>,
    shapes: &'a Graph,
}
