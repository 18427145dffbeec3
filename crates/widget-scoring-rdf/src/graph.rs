//! In-memory RDF graph.

use std::collections::{BTreeSet, HashSet};

use crate::term::{Node, Term, Triple};
use crate::vocab::rdf;

/// A set of triples with deterministic (sorted) iteration order.
///
/// Graphs are plain values: scoring code borrows them read-only and clones
/// them when it needs a scratch copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement. Returns `false` if it was already present.
    pub fn insert(
        &mut self,
        subject: Node,
        predicate: impl Into<String>,
        object: impl Into<Term>,
    ) -> bool {
        self.triples.insert(Triple::new(subject, predicate, object))
    }

    pub fn insert_triple(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Union `other` into this graph.
    pub fn extend_from(&mut self, other: &Graph) {
        self.triples.extend(other.triples.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// All statements whose subject is `subject`, in predicate/object order.
    pub fn statements_about<'a, 's>(
        &'a self,
        subject: &'s Node,
    ) -> impl Iterator<Item = &'a Triple> + 's
    where
        'a: 's,
    {
        // Empty predicate and empty IRI object sort before every real statement.
        let lowest = Triple::new(subject.clone(), String::new(), Node::iri(String::new()));
        self.triples
            .range(lowest..)
            .take_while(move |t| &t.subject == subject)
    }

    pub fn has_subject(&self, subject: &Node) -> bool {
        self.statements_about(subject).next().is_some()
    }

    /// Objects of `subject predicate ?o`.
    pub fn objects<'a, 's>(
        &'a self,
        subject: &'s Node,
        predicate: &'s str,
    ) -> impl Iterator<Item = &'a Term> + 's
    where
        'a: 's,
    {
        self.statements_about(subject)
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Subjects of `?s predicate object`.
    pub fn subjects<'a, 's>(
        &'a self,
        predicate: &'s str,
        object: &'s Term,
    ) -> impl Iterator<Item = &'a Node> + 's
    where
        'a: 's,
    {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate && &t.object == object)
            .map(|t| &t.subject)
    }

    /// Members of the RDF collection starting at `head`.
    pub fn list_items(&self, head: &Term) -> Result<Vec<Term>, CollectionError> {
        let mut items = Vec::new();
        let mut seen: HashSet<&Node> = HashSet::new();
        let mut cursor = head;

        loop {
            if cursor.as_iri() == Some(rdf::NIL) {
                return Ok(items);
            }
            let Some(cell) = cursor.as_node() else {
                return Err(CollectionError::NotANode(cursor.to_string()));
            };
            if !seen.insert(cell) {
                return Err(CollectionError::Cycle(cell.to_string()));
            }

            let first = single(self.objects(cell, rdf::FIRST))
                .ok_or_else(|| CollectionError::MalformedCell(cell.to_string(), "rdf:first"))?;
            let rest = single(self.objects(cell, rdf::REST))
                .ok_or_else(|| CollectionError::MalformedCell(cell.to_string(), "rdf:rest"))?;

            items.push(first.clone());
            cursor = rest;
        }
    }
}

fn single<'a>(mut iter: impl Iterator<Item = &'a Term>) -> Option<&'a Term> {
    let first = iter.next()?;
    match iter.next() {
        Some(_) => None,
        None => Some(first),
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("collection cell is not a node: {0}")]
    NotANode(String),
    #[error("collection cell {0} must have exactly one {1}")]
    MalformedCell(String, &'static str),
    #[error("collection contains a cycle at {0}")]
    Cycle(String),
}
