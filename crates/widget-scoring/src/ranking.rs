use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use serde::Serialize;
use widget_scoring_rdf::Node;

/// A widget proposed by one matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WidgetScore {
    pub widget: Node,
    pub weight: BigDecimal,
}

impl WidgetScore {
    pub fn new(widget: Node, weight: BigDecimal) -> Self {
        Self { widget, weight }
    }
}

impl Ord for WidgetScore {
    /// Higher weights first; ties broken by the widget's canonical form,
    /// then by node kind so that `Ord` agrees with `Eq`.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.widget.as_str().cmp(other.widget.as_str()))
            .then_with(|| self.widget.cmp(&other.widget))
    }
}

impl PartialOrd for WidgetScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ranked scores, best first. Several entries may name the same widget
/// when several rules matched for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoringResult {
    scores: Vec<WidgetScore>,
}

impl ScoringResult {
    pub fn scores(&self) -> &[WidgetScore] {
        &self.scores
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WidgetScore> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn top(&self) -> Option<&WidgetScore> {
        self.scores.first()
    }

    /// The widget to render when the caller has no further preference.
    pub fn default_widget(&self) -> Option<&Node> {
        self.top().map(|s| &s.widget)
    }

    pub fn default_weight(&self) -> Option<BigDecimal> {
        self.top().map(|s| s.weight.clone())
    }

    /// Scores with `weight >= threshold`, in rank order.
    pub fn at_least(&self, threshold: &BigDecimal) -> Vec<&WidgetScore> {
        self.scores
            .iter()
            .take_while(|s| &s.weight >= threshold)
            .collect()
    }

    pub fn into_scores(self) -> Vec<WidgetScore> {
        self.scores
    }
}

impl<'a> IntoIterator for &'a ScoringResult {
    type Item = &'a WidgetScore;
    type IntoIter = std::slice::Iter<'a, WidgetScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.scores.iter()
    }
}

/// Order matched scores best first. The sort is stable, so entries equal
/// in weight and widget keep their emission order.
pub fn rank(mut scores: Vec<WidgetScore>) -> ScoringResult {
    scores.sort();
    ScoringResult { scores }
}
