//! RDF plumbing for widget scoring.
//!
//! - [`Term`], [`Node`], [`Literal`]: owned RDF terms.
//! - [`Graph`]: a deterministic in-memory triple set with the lookups the
//!   scoring engine needs (objects, subjects, collections).
//! - [`RdfFormat`] / [`Graph::parse`]: loading N-Triples, Turtle and RDF/XML
//!   through Sophia.
//! - [`vocab`]: IRIs for `rdf:`, `rdfs:`, `xsd:`, `sh:` and `shui:`.

pub mod graph;
pub mod parse;
pub mod term;
pub mod vocab;

pub use graph::{CollectionError, Graph};
pub use parse::RdfFormat;
pub use term::{Literal, Node, Term, TermSyntaxError, Triple};
