//! Component Registry
//!
//! The set of component and decorator keys a renderer knows how to resolve.
//! Schemas are checked against it before rendering.

use std::collections::HashSet;

use crate::bindings::BindingTable;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRegistry {
    keys: HashSet<String>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every key `table` can assign
    pub fn from_table(table: &BindingTable) -> Self {
        table.components().into_iter().collect()
    }

    pub fn register(&mut self, key: impl Into<String>) -> &mut Self {
        self.keys.insert(key.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> &HashSet<String> {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in lexical order
    pub fn sorted(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl<S: Into<String>> FromIterator<S> for ComponentRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for ComponentRegistry {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.keys.extend(iter.into_iter().map(Into::into));
    }
}
