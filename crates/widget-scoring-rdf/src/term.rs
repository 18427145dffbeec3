//! RDF term model.
//!
//! Small owned representation of the three RDF term kinds plus query
//! variables. Everything is `Ord` so graphs iterate deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab::{rdf, xsd};

// ============================================================================
// Nodes
// ============================================================================

/// A resource that can stand in subject position: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Node {
    Iri(String),
    BlankNode(String),
}

impl Node {
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Node::BlankNode(label.into())
    }

    /// A blank node whose label cannot collide with labels produced by parsers.
    pub fn fresh_blank() -> Self {
        Node::BlankNode(format!("fresh-{}", uuid::Uuid::new_v4().simple()))
    }

    /// Canonical string form: the IRI text, or the blank node label.
    pub fn as_str(&self) -> &str {
        match self {
            Node::Iri(iri) => iri,
            Node::BlankNode(label) => label,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::BlankNode(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::BlankNode(label) => write!(f, "_:{label}"),
        }
    }
}

// ============================================================================
// Literals
// ============================================================================

/// An RDF 1.1 literal. The datatype is always present: simple literals are
/// `xsd:string`, language-tagged literals are `rdf:langString`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: String,
    pub language: Option<String>,
}

impl Literal {
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    pub fn string(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, xsd::STRING)
    }

    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: rdf::LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(if value { "true" } else { "false" }, xsd::BOOLEAN)
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), xsd::INTEGER)
    }

    /// A decimal literal from its lexical form (e.g. `"10.5"`).
    pub fn decimal(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, xsd::DECIMAL)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_rdf_string(&self.lexical))?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")
        } else if self.datatype == xsd::STRING {
            Ok(())
        } else {
            write!(f, "^^<{}>", self.datatype)
        }
    }
}

// ============================================================================
// Terms
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Term {
    Node(Node),
    Literal(Literal),
    /// A query variable (`?name`). Never a member of a stored triple.
    Variable(String),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Node(Node::iri(iri))
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Term::Node(Node::blank(label))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Term::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The IRI text if this term is an IRI.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Node(Node::Iri(iri)) => Some(iri),
            _ => None,
        }
    }

    /// Parse N-Triples style term text: `<iri>`, `_:label`, `"lex"`,
    /// `"lex"@lang`, `"lex"^^<datatype>` or `?var`.
    pub fn parse(text: &str) -> Result<Self, TermSyntaxError> {
        let s = text.trim();
        let err = |reason: &str| TermSyntaxError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        if let Some(rest) = s.strip_prefix('<') {
            let iri = rest.strip_suffix('>').ok_or_else(|| err("missing closing `>`"))?;
            return Ok(Term::iri(iri));
        }

        if let Some(label) = s.strip_prefix("_:") {
            if label.is_empty() {
                return Err(err("empty blank node label"));
            }
            return Ok(Term::blank(label));
        }

        if let Some(name) = s.strip_prefix('?') {
            if name.is_empty() {
                return Err(err("empty variable name"));
            }
            return Ok(Term::Variable(name.to_string()));
        }

        if s.starts_with('"') {
            let end = closing_quote(s).ok_or_else(|| err("missing closing quote"))?;
            let lexical = unescape_rdf_string(&s[1..end]);
            let rest = s[end + 1..].trim();

            if rest.is_empty() {
                return Ok(Term::Literal(Literal::string(lexical)));
            }
            if let Some(lang) = rest.strip_prefix('@') {
                if lang.is_empty() {
                    return Err(err("empty language tag"));
                }
                return Ok(Term::Literal(Literal::lang(lexical, lang)));
            }
            if let Some(dt) = rest.strip_prefix("^^") {
                let dt = dt.trim();
                let dt = dt
                    .strip_prefix('<')
                    .and_then(|d| d.strip_suffix('>'))
                    .unwrap_or(dt);
                if dt.is_empty() {
                    return Err(err("empty datatype"));
                }
                return Ok(Term::Literal(Literal::typed(lexical, dt)));
            }
            return Err(err("unexpected text after literal"));
        }

        Err(err("unsupported term form"))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Node(node) => node.fmt(f),
            Term::Literal(lit) => lit.fmt(f),
            Term::Variable(name) => write!(f, "?{name}"),
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Term::Node(node)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid RDF term `{input}`: {reason}")]
pub struct TermSyntaxError {
    pub input: String,
    pub reason: String,
}

// ============================================================================
// Triples
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Node, predicate: impl Into<String>, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

// ============================================================================
// String escapes
// ============================================================================

fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in s.char_indices().skip(1) {
        match ch {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

fn unescape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn escape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}
