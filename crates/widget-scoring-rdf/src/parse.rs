//! Loading graphs from RDF text.
//!
//! Parsing is delegated to **Sophia**; its terms are converted into the owned
//! [`Term`] model through their N-Triples display form. Supported
//! serializations:
//! - N-Triples (`.nt`)
//! - Turtle (`.ttl`)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)

use anyhow::{anyhow, Context, Result};
use sophia::api::prelude::*;
use sophia::api::triple::Triple as _;
use std::path::Path;

use crate::graph::Graph;
use crate::term::{Node, Term, Triple};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    RdfXml,
}

impl RdfFormat {
    /// Guess the serialization from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "rdf" | "owl" | "xml" => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            RdfFormat::NTriples => "N-Triples",
            RdfFormat::Turtle => "Turtle",
            RdfFormat::RdfXml => "RDF/XML",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct GraphSinkError {
    message: String,
}

impl From<anyhow::Error> for GraphSinkError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

fn node_from_display(text: &str) -> Result<Node> {
    match Term::parse(text)? {
        Term::Node(node) => Ok(node),
        other => Err(anyhow!("expected IRI or blank node, got {other}")),
    }
}

fn triple_from_display(s: &str, p: &str, o: &str) -> Result<Triple> {
    let subject = node_from_display(s)?;
    let Node::Iri(predicate) = node_from_display(p)? else {
        return Err(anyhow!("predicate must be an IRI: {p}"));
    };
    let object = Term::parse(o)?;
    if let Term::Variable(name) = &object {
        return Err(anyhow!("variables cannot appear in data: ?{name}"));
    }
    Ok(Triple {
        subject,
        predicate,
        object,
    })
}

impl Graph {
    pub fn parse(bytes: &[u8], format: RdfFormat) -> Result<Graph> {
        let reader = std::io::BufReader::new(std::io::Cursor::new(bytes));
        let mut graph = Graph::new();

        let mut sink = |s: String, p: String, o: String| -> std::result::Result<(), GraphSinkError> {
            let triple = triple_from_display(&s, &p, &o).map_err(GraphSinkError::from)?;
            graph.insert_triple(triple);
            Ok(())
        };

        let outcome = match format {
            RdfFormat::NTriples => sophia::turtle::parser::nt::parse_bufread(reader)
                .try_for_each_triple(|t| sink(t.s().to_string(), t.p().to_string(), t.o().to_string()))
                .map_err(|e| anyhow!("{e}")),
            RdfFormat::Turtle => sophia::turtle::parser::turtle::parse_bufread(reader)
                .try_for_each_triple(|t| sink(t.s().to_string(), t.p().to_string(), t.o().to_string()))
                .map_err(|e| anyhow!("{e}")),
            RdfFormat::RdfXml => sophia::xml::parser::parse_bufread(reader)
                .try_for_each_triple(|t| sink(t.s().to_string(), t.p().to_string(), t.o().to_string()))
                .map_err(|e| anyhow!("{e}")),
        };
        outcome.with_context(|| format!("failed to parse {}", format.name()))?;

        Ok(graph)
    }

    pub fn from_turtle(text: &str) -> Result<Graph> {
        Self::parse(text.as_bytes(), RdfFormat::Turtle)
    }

    pub fn from_ntriples(text: &str) -> Result<Graph> {
        Self::parse(text.as_bytes(), RdfFormat::NTriples)
    }

    /// Load a file, choosing the serialization from its extension.
    pub fn load_file(path: &Path) -> Result<Graph> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let format = RdfFormat::from_extension(ext)
            .ok_or_else(|| anyhow!("unsupported RDF format: .{ext}"))?;
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&bytes, format).with_context(|| format!("in {}", path.display()))
    }
}
