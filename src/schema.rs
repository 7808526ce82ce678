//! Schema Shape Detection
//!
//! A schema node is a plain `serde_json::Value`. Everything that needs to know
//! which children a node has (walker, binder, validator) goes through
//! [`detect_shape`] so the three agree on what gets visited and in which order:
//!
//! 1. `properties` entries, in authoring order
//! 2. the resolved `items` schema, only when `type` is `"array"`
//! 3. `anyOf`, then `oneOf`, then `allOf` variants

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

use crate::error::{Result, SchemaError};
use crate::path::SchemaPath;

/// Attribute naming the component that renders a node
pub const COMPONENT_KEY: &str = "x-component";
/// Attribute naming the wrapper (label, error slot) around the component
pub const DECORATOR_KEY: &str = "x-decorator";

pub const TYPE_KEY: &str = "type";
pub const PROPERTIES_KEY: &str = "properties";
pub const ITEMS_KEY: &str = "items";

// =============================================================================
// Combinators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    #[serde(rename = "anyOf")]
    AnyOf,
    #[serde(rename = "oneOf")]
    OneOf,
    #[serde(rename = "allOf")]
    AllOf,
}

impl Combinator {
    /// Visiting order
    pub const ALL: [Combinator; 3] = [Combinator::AnyOf, Combinator::OneOf, Combinator::AllOf];

    pub fn keyword(&self) -> &'static str {
        match self {
            Combinator::AnyOf => "anyOf",
            Combinator::OneOf => "oneOf",
            Combinator::AllOf => "allOf",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// =============================================================================
// Node accessors
// =============================================================================

/// The `type` tag, when it is a plain string
pub fn node_type(node: &Value) -> Option<&str> {
    node.get(TYPE_KEY).and_then(Value::as_str)
}

/// `null` and `""` bind nothing
fn is_unset(value: &Value) -> bool {
    value.is_null() || value.as_str() == Some("")
}

pub fn component_of(node: &Value) -> Option<&Value> {
    node.get(COMPONENT_KEY).filter(|v| !is_unset(v))
}

pub fn decorator_of(node: &Value) -> Option<&Value> {
    node.get(DECORATOR_KEY).filter(|v| !is_unset(v))
}

/// Read and parse a schema file. The top level must be a JSON object.
pub fn load_schema(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    let schema: Value = serde_json::from_str(&content)?;
    if !schema.is_object() {
        return Err(SchemaError::InvalidFormat(format!(
            "{}: top-level schema must be an object",
            path.display()
        )));
    }
    Ok(schema)
}

/// Resolve an `items` attribute to the single schema that describes elements.
///
/// Tuple arrays contribute their first schema. An empty sequence resolves to
/// itself and is visited as a leaf. Anything else (string, number, ...) has no
/// element schema.
pub fn resolve_items(items: &Value) -> Option<&Value> {
    match items {
        Value::Object(_) => Some(items),
        Value::Array(seq) => Some(seq.first().unwrap_or(items)),
        _ => None,
    }
}

fn resolve_items_mut(items: &mut Value) -> Option<&mut Value> {
    let resolves_to_self = match &*items {
        Value::Object(_) => true,
        Value::Array(seq) => seq.is_empty(),
        _ => return None,
    };
    if resolves_to_self {
        return Some(items);
    }
    match items {
        Value::Array(seq) => seq.first_mut(),
        _ => None,
    }
}

// =============================================================================
// Shape
// =============================================================================

/// One structural facet of a node. A node can carry several at once
/// (an object with `properties` and an `allOf`, for instance).
#[derive(Debug, Clone, Copy)]
pub enum ShapeFacet<'a> {
    Object {
        properties: &'a Map<String, Value>,
    },
    Array {
        /// Already resolved through [`resolve_items`]
        items: &'a Value,
    },
    Combinator {
        kind: Combinator,
        variants: &'a [Value],
    },
}

/// How a child hangs off its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildEdge<'a> {
    Property(&'a str),
    Items,
    Variant(Combinator, usize),
}

impl ChildEdge<'_> {
    pub(crate) fn push_onto(&self, path: &mut SchemaPath) {
        match self {
            ChildEdge::Property(name) => path.push(*name),
            ChildEdge::Items => path.push(ITEMS_KEY),
            ChildEdge::Variant(kind, index) => {
                path.push(kind.keyword());
                path.push(index.to_string());
            }
        }
    }
}

/// Facets of a node in visiting order. No facets means a leaf.
#[derive(Debug, Clone, Default)]
pub struct NodeShape<'a> {
    facets: Vec<ShapeFacet<'a>>,
}

impl<'a> NodeShape<'a> {
    pub fn is_leaf(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn facets(&self) -> &[ShapeFacet<'a>] {
        &self.facets
    }

    /// Direct children, flattened across facets, in visiting order
    pub fn children(&self) -> Vec<(ChildEdge<'a>, &'a Value)> {
        let mut children = Vec::new();
        for facet in &self.facets {
            match *facet {
                ShapeFacet::Object { properties } => {
                    children.extend(
                        properties
                            .iter()
                            .map(|(name, child)| (ChildEdge::Property(name.as_str()), child)),
                    );
                }
                ShapeFacet::Array { items } => children.push((ChildEdge::Items, items)),
                ShapeFacet::Combinator { kind, variants } => {
                    children.extend(
                        variants
                            .iter()
                            .enumerate()
                            .map(|(i, variant)| (ChildEdge::Variant(kind, i), variant)),
                    );
                }
            }
        }
        children
    }
}

/// Classify a node by structure. Only the array facet looks at `type`;
/// `properties` and combinators are recognised whatever the tag says.
pub fn detect_shape(node: &Value) -> NodeShape<'_> {
    let Some(obj) = node.as_object() else {
        return NodeShape::default();
    };

    let mut facets = Vec::new();

    if let Some(properties) = obj.get(PROPERTIES_KEY).and_then(Value::as_object) {
        facets.push(ShapeFacet::Object { properties });
    }

    if node_type(node) == Some("array") {
        if let Some(items) = obj.get(ITEMS_KEY).and_then(resolve_items) {
            facets.push(ShapeFacet::Array { items });
        }
    }

    for kind in Combinator::ALL {
        if let Some(variants) = obj.get(kind.keyword()).and_then(Value::as_array) {
            if !variants.is_empty() {
                facets.push(ShapeFacet::Combinator { kind, variants });
            }
        }
    }

    NodeShape { facets }
}

/// Mutable counterpart of [`NodeShape::children`], same rules and order
pub(crate) fn for_each_child_mut<F>(node: &mut Value, f: &mut F)
where
    F: FnMut(ChildEdge<'_>, &mut Value),
{
    let is_array = node_type(node) == Some("array");
    let Some(obj) = node.as_object_mut() else {
        return;
    };

    if let Some(Value::Object(properties)) = obj.get_mut(PROPERTIES_KEY) {
        for (name, child) in properties.iter_mut() {
            f(ChildEdge::Property(name), child);
        }
    }

    if is_array {
        if let Some(items) = obj.get_mut(ITEMS_KEY).and_then(resolve_items_mut) {
            f(ChildEdge::Items, items);
        }
    }

    for kind in Combinator::ALL {
        if let Some(Value::Array(variants)) = obj.get_mut(kind.keyword()) {
            for (i, variant) in variants.iter_mut().enumerate() {
                f(ChildEdge::Variant(kind, i), variant);
            }
        }
    }
}
