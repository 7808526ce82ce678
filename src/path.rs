//! Node locations inside a schema tree

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered segments from the root to a node.
///
/// - root: `[]`
/// - object child: `[.., "<property>"]`
/// - array child: `[.., "items"]`
/// - combinator variant: `[.., "anyOf", "0"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaPath(Vec<String>);

impl SchemaPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path of a child reached through `segments`
    pub fn join<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.0.clone();
        next.extend(segments.into_iter().map(Into::into));
        Self(next)
    }

    pub(crate) fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<Vec<String>> for SchemaPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl<'a> From<&[&'a str]> for SchemaPath {
    fn from(segments: &[&'a str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl PartialEq<[&str]> for SchemaPath {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}
