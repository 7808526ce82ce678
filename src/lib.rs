//! Form Schemas
//!
//! Walks, annotates and validates JSON-Schema-like form schemas whose nodes
//! name the UI component that renders them (`x-component`) and the wrapper
//! around it (`x-decorator`).
//!
//! ## Features
//!
//! - **Traversal**: depth-first, pre-order, with node paths and subtree pruning
//! - **Default Bindings**: infer components and decorators from each node's `type`
//! - **Reference Validation**: check every bound key against a component registry,
//!   reporting all violations at once
//!
//! ## Example
//!
//! ```
//! use form_schemas::{apply_default_bindings, validate_component_references, ComponentRegistry, BindingTable};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string"},
//!         "tags": {"type": "array", "items": {"type": "string"}}
//!     }
//! });
//!
//! let bound = apply_default_bindings(&schema);
//! assert_eq!(bound["properties"]["name"]["x-component"], "Input");
//!
//! let registry = ComponentRegistry::from_table(&BindingTable::default());
//! assert!(validate_component_references(&bound, registry.keys()).is_ok());
//! ```

pub mod bindings;
pub mod config;
pub mod error;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validate;
pub mod walker;

pub use bindings::{apply_default_bindings, BindingTable, TypeBinding};
pub use config::{FormSchemaConfig, OutputFormat};
pub use error::{Result, SchemaError, SchemaValidationError};
pub use path::SchemaPath;
pub use registry::ComponentRegistry;
pub use schema::{detect_shape, Combinator, NodeShape, ShapeFacet, COMPONENT_KEY, DECORATOR_KEY};
pub use validate::{
    collect_component_violations, lint_directory, validate_component_references,
    ComponentViolation, SchemaReport, ViolationKind,
};
pub use walker::{traverse, try_traverse, Visit};
