//! Rule-based ranking of UI input widgets.
//!
//! A rule graph declares `shui:Score` rules, each naming a widget, a decimal
//! weight and SHACL shapes the focus item (and optionally the constraint
//! shape governing it) must conform to. [`ScoringEngine`] evaluates every
//! rule through an injected [`ShapeValidator`] and returns the matching
//! widgets ranked by weight.
//!
//! ```ignore
//! let engine = ScoringEngine::new(my_validator);
//! let focus = Term::from(Literal::boolean(true));
//! let result = engine.score(&ScoringRequest::new(&focus, &rules))?;
//! if let Some(best) = result.top() {
//!     println!("{} ({})", best.widget, best.weight);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod focus;
pub mod ranking;
pub mod rule;
pub mod trace;
pub mod validator;

pub use config::{MissingConstraintShapePolicy, ScoringOptions};
pub use engine::{ScoringEngine, ScoringRequest};
pub use error::{MissingGraph, Result, ScoringError};
pub use evaluate::ConditionEvaluator;
pub use focus::FocusItem;
pub use ranking::{rank, ScoringResult, WidgetScore};
pub use rule::{extract_rules, Rule};
pub use trace::{AxisSkip, Outcome, RuleStep, ScoringReport, ShapeCheck};
pub use validator::{ShapeValidator, ValidationError};

pub use bigdecimal::BigDecimal;
pub use widget_scoring_rdf as rdf;
