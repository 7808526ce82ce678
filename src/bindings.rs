//! Default Component Bindings
//!
//! Infers `x-component` / `x-decorator` for schema nodes from their `type`.
//! The transform never touches its input: it clones the whole tree and
//! annotates the copy.
//!
//! | type      | component         | decorator  |
//! |-----------|-------------------|------------|
//! | `string`  | `Input`           | `FormItem` |
//! | `number`  | `NumberInput`     | `FormItem` |
//! | `integer` | `NumberInput`     | `FormItem` |
//! | `boolean` | `Checkbox`        | `FormItem` |
//! | `array`   | `ArrayCards`      | `FormItem` |
//! | `object`  | `ObjectContainer` | -          |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::path::SchemaPath;
use crate::schema::{component_of, for_each_child_mut, node_type, COMPONENT_KEY, DECORATOR_KEY};

/// Component keys that mark a field as not rendered; such nodes get no decorator
pub const DEFAULT_HIDDEN_COMPONENTS: [&str; 2] = ["Hidden", "hidden"];

pub const DEFAULT_DECORATOR: &str = "FormItem";

/// What a schema `type` binds to by default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBinding {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorator: Option<String>,
}

impl TypeBinding {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            decorator: None,
        }
    }

    pub fn decorated(component: impl Into<String>, decorator: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            decorator: Some(decorator.into()),
        }
    }
}

/// Lookup table from schema `type` to its default binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTable {
    bindings: BTreeMap<String, TypeBinding>,
    hidden: BTreeSet<String>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::empty()
            .with_binding("string", TypeBinding::decorated("Input", DEFAULT_DECORATOR))
            .with_binding("number", TypeBinding::decorated("NumberInput", DEFAULT_DECORATOR))
            .with_binding("integer", TypeBinding::decorated("NumberInput", DEFAULT_DECORATOR))
            .with_binding("boolean", TypeBinding::decorated("Checkbox", DEFAULT_DECORATOR))
            .with_binding("array", TypeBinding::decorated("ArrayCards", DEFAULT_DECORATOR))
            .with_binding("object", TypeBinding::new("ObjectContainer"))
            .with_hidden_components(DEFAULT_HIDDEN_COMPONENTS)
    }
}

impl BindingTable {
    /// A table with no bindings and no hidden spellings
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
            hidden: BTreeSet::new(),
        }
    }

    /// Add or replace the binding for `schema_type`
    pub fn with_binding(mut self, schema_type: impl Into<String>, binding: TypeBinding) -> Self {
        self.bindings.insert(schema_type.into(), binding);
        self
    }

    /// Replace the set of component keys that suppress the default decorator.
    /// Matching is exact, not case-folded.
    pub fn with_hidden_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn get(&self, schema_type: &str) -> Option<&TypeBinding> {
        self.bindings.get(schema_type)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &TypeBinding)> {
        self.bindings.iter().map(|(t, b)| (t.as_str(), b))
    }

    pub fn is_hidden(&self, component: &str) -> bool {
        self.hidden.contains(component)
    }

    pub fn hidden_components(&self) -> impl Iterator<Item = &str> {
        self.hidden.iter().map(String::as_str)
    }

    /// Every component and decorator key this table can emit
    pub fn components(&self) -> BTreeSet<&str> {
        self.bindings
            .values()
            .flat_map(|b| std::iter::once(b.component.as_str()).chain(b.decorator.as_deref()))
            .collect()
    }

    /// Return an annotated copy of `root`
    pub fn apply(&self, root: &Value) -> Value {
        let mut annotated = root.clone();
        let mut path = SchemaPath::root();
        self.apply_in_place(&mut annotated, &mut path);
        annotated
    }

    fn apply_in_place(&self, node: &mut Value, path: &mut SchemaPath) {
        self.bind_node(node, path);

        for_each_child_mut(node, &mut |edge, child| {
            let depth = path.depth();
            edge.push_onto(path);
            self.apply_in_place(child, path);
            path.truncate(depth);
        });
    }

    fn bind_node(&self, node: &mut Value, path: &SchemaPath) {
        let Some(binding) = node_type(node).and_then(|t| self.bindings.get(t)) else {
            return;
        };
        let needs_component = component_of(node).is_none();
        let Some(obj) = node.as_object_mut() else {
            return;
        };

        if needs_component {
            debug!(path = %path, component = %binding.component, "assigning default component");
            obj.insert(COMPONENT_KEY.to_string(), Value::String(binding.component.clone()));
        }

        let Some(decorator) = &binding.decorator else {
            return;
        };

        let hidden = obj
            .get(COMPONENT_KEY)
            .and_then(Value::as_str)
            .is_some_and(|component| self.is_hidden(component));
        if hidden {
            debug!(path = %path, "hidden component, no decorator");
            return;
        }

        debug!(path = %path, decorator = %decorator, "assigning default decorator");
        obj.insert(DECORATOR_KEY.to_string(), Value::String(decorator.clone()));
    }
}

/// Annotate a copy of `root` using the default table.
///
/// Nodes with an explicit `x-component` keep it; the decorator of every other
/// typed node is set from the table. Object nodes get no default decorator,
/// and neither do nodes bound to `Hidden` / `hidden`.
pub fn apply_default_bindings(root: &Value) -> Value {
    BindingTable::default().apply(root)
}
