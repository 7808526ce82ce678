//! Component Reference Validation
//!
//! Cross-checks every `x-component` and `x-decorator` in a schema tree against
//! a set of registered keys. The whole tree is always walked; all violations
//! are reported together.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::SchemaValidationError;
use crate::path::SchemaPath;
use crate::schema::{component_of, decorator_of, load_schema};
use crate::walker::traverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    UnknownComponent,
    UnknownDecorator,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::UnknownComponent => f.write_str("UnknownComponent"),
            ViolationKind::UnknownDecorator => f.write_str("UnknownDecorator"),
        }
    }
}

/// A reference to a key missing from the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentViolation {
    pub kind: ViolationKind,
    pub key: String,
    pub path: SchemaPath,
}

impl fmt::Display for ComponentViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' at path '{}' is not registered in the provided components.",
            self.kind, self.key, self.path
        )
    }
}

fn key_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Every unregistered component/decorator reference, in traversal order
pub fn collect_component_violations(
    root: &Value,
    known: &HashSet<String>,
) -> Vec<ComponentViolation> {
    let mut violations = Vec::new();

    traverse(root, |node, path| {
        let references = [
            (ViolationKind::UnknownComponent, component_of(node)),
            (ViolationKind::UnknownDecorator, decorator_of(node)),
        ];
        for (kind, reference) in references {
            let Some(reference) = reference else { continue };
            let key = key_text(reference);
            if !known.contains(&key) {
                debug!(%kind, %key, %path, "unregistered reference");
                violations.push(ComponentViolation {
                    kind,
                    key,
                    path: path.clone(),
                });
            }
        }
    });

    violations
}

/// Fail with a single aggregate error if any reference is unregistered
pub fn validate_component_references(
    root: &Value,
    known: &HashSet<String>,
) -> Result<(), SchemaValidationError> {
    let violations = collect_component_violations(root, known);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::new(violations))
    }
}

// =============================================================================
// Directory linting
// =============================================================================

/// Outcome of checking a single schema file
#[derive(Debug, Default, Serialize)]
pub struct SchemaReport {
    /// Path relative to the linted directory
    pub schema_id: String,
    pub violations: Vec<ComponentViolation>,
    /// Set when the file could not be read or parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.load_error.is_none()
    }
}

/// Check one already-parsed schema
pub fn check_schema(schema_id: &str, schema: &Value, known: &HashSet<String>) -> SchemaReport {
    SchemaReport {
        schema_id: schema_id.to_string(),
        violations: collect_component_violations(schema, known),
        load_error: None,
    }
}

/// Check every `*.json` file below `schema_dir`.
///
/// Only files with violations or load errors are returned, sorted by path.
pub fn lint_directory(schema_dir: &Path, known: &HashSet<String>) -> Vec<SchemaReport> {
    let mut reports = Vec::new();

    for entry in walkdir::WalkDir::new(schema_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|x| x == "json").unwrap_or(false))
    {
        let path = entry.path();
        let schema_id = path
            .strip_prefix(schema_dir)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| path.to_string_lossy().to_string());

        let report = match load_schema(path) {
            Ok(schema) => check_schema(&schema_id, &schema, known),
            Err(err) => {
                warn!(schema = %schema_id, error = %err, "skipping unreadable schema");
                SchemaReport {
                    schema_id,
                    violations: Vec::new(),
                    load_error: Some(err.to_string()),
                }
            }
        };

        if !report.is_clean() {
            reports.push(report);
        }
    }

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn known(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_clean_schema_passes() {
        let schema = json!({
            "type": "object",
            "properties": {"name": {"type": "string", "x-component": "Input", "x-decorator": "FormItem"}}
        });
        assert!(validate_component_references(&schema, &known(&["Input", "FormItem"])).is_ok());
    }

    #[test]
    fn test_unregistered_component_reported() {
        let schema = json!({
            "type": "object",
            "properties": {"name": {"type": "string", "x-component": "UnregisteredInput"}}
        });
        let err = validate_component_references(&schema, &known(&["Input"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("UnregisteredInput"));
        assert!(message.contains("is not registered"));
        assert_eq!(
            message,
            "Schema validation failed:\n\
             UnknownComponent 'UnregisteredInput' at path 'name' is not registered in the provided components."
        );
    }

    #[test]
    fn test_all_violations_collected() {
        let schema = json!({
            "x-decorator": "Card",
            "type": "object",
            "properties": {
                "a": {"x-component": "Ghost"},
                "b": {"type": "array", "items": {"x-component": "Phantom", "x-decorator": "FormItem"}}
            }
        });
        let err = validate_component_references(&schema, &known(&["FormItem"])).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].kind, ViolationKind::UnknownDecorator);
        assert!(violations[0].path.is_root());
        assert_eq!(violations[1].key, "Ghost");
        assert_eq!(violations[2].path.to_string(), "b.items");

        let message = err.to_string();
        assert!(message.starts_with("Schema validation failed:\n"));
        assert!(message.contains("UnknownDecorator 'Card' at path '' is not registered"));
        assert!(message.contains("UnknownComponent 'Ghost' at path 'a'"));
        assert!(message.contains("UnknownComponent 'Phantom' at path 'b.items'"));
        assert_eq!(message.lines().count(), 4);
    }

    #[test]
    fn test_combinator_paths() {
        let schema = json!({"anyOf": [{}, {"x-component": "Nope"}]});
        let violations = collect_component_violations(&schema, &known(&[]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path.to_string(), "anyOf.1");
    }

    #[test]
    fn test_empty_key_not_a_reference() {
        let schema = json!({"x-component": "", "x-decorator": ""});
        assert!(validate_component_references(&schema, &known(&[])).is_ok());
    }

    #[test]
    fn test_non_string_key_reported_as_json() {
        let schema = json!({"x-component": 42, "x-decorator": null});
        let violations = collect_component_violations(&schema, &known(&[]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "42");
    }

    #[test]
    fn test_lint_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("good.json"),
            r#"{"type": "string", "x-component": "Input"}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("bad.json"),
            r#"{"type": "string", "x-component": "Mystery"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let reports = lint_directory(dir.path(), &known(&["Input"]));
        assert_eq!(reports.len(), 2);

        assert_eq!(reports[0].schema_id, "bad.json");
        assert_eq!(reports[0].violations[0].key, "Mystery");

        assert_eq!(reports[1].schema_id, "broken.json");
        assert!(reports[1]
            .load_error
            .as_deref()
            .is_some_and(|e| e.starts_with("JSON error")));
    }
}
