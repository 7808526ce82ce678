//! Depth-first schema traversal
//!
//! Pre-order: a node is visited before any of its children, children in the
//! order [`detect_shape`](crate::schema::detect_shape) lists them. The visitor
//! decides per node whether to descend; pruning a node leaves its siblings
//! and the rest of the tree untouched.

use std::convert::Infallible;

use serde_json::Value;

use crate::path::SchemaPath;
use crate::schema::detect_shape;

/// Visitor verdict for the node just visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Descend into the node's children
    #[default]
    Continue,
    /// Do not visit any descendant of this node
    Skip,
}

impl From<()> for Visit {
    fn from(_: ()) -> Self {
        Visit::Continue
    }
}

/// `false` prunes, `true` descends
impl From<bool> for Visit {
    fn from(descend: bool) -> Self {
        if descend {
            Visit::Continue
        } else {
            Visit::Skip
        }
    }
}

/// Visit `root` and every reachable descendant once.
///
/// The visitor may return `()`, a `bool`, or a [`Visit`].
///
/// ```
/// use form_schemas::traverse;
/// use serde_json::json;
///
/// let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
/// let mut paths = Vec::new();
/// traverse(&schema, |_, path| paths.push(path.to_string()));
/// assert_eq!(paths, vec!["", "name"]);
/// ```
pub fn traverse<F, R>(root: &Value, mut visit: F)
where
    F: FnMut(&Value, &SchemaPath) -> R,
    R: Into<Visit>,
{
    let result = try_traverse(root, |node, path| Ok::<_, Infallible>(visit(node, path).into()));
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Fallible traversal: the first visitor error aborts the walk and is returned.
pub fn try_traverse<F, E>(root: &Value, mut visit: F) -> Result<(), E>
where
    F: FnMut(&Value, &SchemaPath) -> Result<Visit, E>,
{
    let mut path = SchemaPath::root();
    walk(root, &mut path, &mut visit)
}

fn walk<F, E>(node: &Value, path: &mut SchemaPath, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&Value, &SchemaPath) -> Result<Visit, E>,
{
    if visit(node, path)? == Visit::Skip {
        return Ok(());
    }

    for (edge, child) in detect_shape(node).children() {
        let depth = path.depth();
        edge.push_onto(path);
        let result = walk(child, path, visit);
        path.truncate(depth);
        result?;
    }

    Ok(())
}
