//! The shape-conformance capability the engine consumes.
//!
//! Scoring never checks SHACL constraints itself: it hands a focus node (or a
//! whole data graph) and a shape reference to a [`ShapeValidator`] and only
//! looks at the verdict. Engines are generic over the validator so tests can
//! substitute scripted ones.

use std::rc::Rc;
use std::sync::Arc;

use widget_scoring_rdf::{Graph, Node};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unsupported constraint <{constraint}> in shape {shape}")]
    UnsupportedConstraint { shape: Node, constraint: String },
    #[error("malformed shape {shape}: {reason}")]
    MalformedShape { shape: Node, reason: String },
    #[error("validation engine failed: {0}")]
    Engine(String),
}

/// Decides whether data conforms to a shape.
///
/// Both methods report ordinary non-conformance as `Ok(false)`. An `Err`
/// means the validator could not reach a verdict; callers treat it as
/// non-conformance as well.
pub trait ShapeValidator {
    /// Validate `focus` in `data` against `shape`, whose definition lives in
    /// `shapes`. The shape's own target declarations are ignored.
    fn validate_node(
        &self,
        focus: &Node,
        shape: &Node,
        data: &Graph,
        shapes: &Graph,
    ) -> Result<bool, ValidationError>;

    /// Validate `data` against `shape` using only the shape's declared
    /// targets. A shape without targets conforms trivially.
    fn validate_graph(
        &self,
        shape: &Node,
        data: &Graph,
        shapes: &Graph,
    ) -> Result<bool, ValidationError>;
}

macro_rules! forward_validator {
    ($($ptr:ty),*) => {
        $(
            impl<V: ShapeValidator + ?Sized> ShapeValidator for $ptr {
                fn validate_node(
                    &self,
                    focus: &Node,
                    shape: &Node,
                    data: &Graph,
                    shapes: &Graph,
                ) -> Result<bool, ValidationError> {
                    (**self).validate_node(focus, shape, data, shapes)
                }

                fn validate_graph(
                    &self,
                    shape: &Node,
                    data: &Graph,
                    shapes: &Graph,
                ) -> Result<bool, ValidationError> {
                    (**self).validate_graph(shape, data, shapes)
                }
            }
        )*
    };
}

forward_validator!(&V, Box<V>, Rc<V>, Arc<V>);
