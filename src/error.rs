//! Error types for schema walking, binding and validation

use thiserror::Error;

use crate::validate::ComponentViolation;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Crate-wide errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error(transparent)]
    Validation(#[from] SchemaValidationError),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

/// Aggregate failure raised when a schema references unregistered components.
///
/// Always carries at least one violation; every violation found in the tree
/// is listed, not just the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Schema validation failed:{}", render_lines(.violations))]
pub struct SchemaValidationError {
    violations: Vec<ComponentViolation>,
}

impl SchemaValidationError {
    pub(crate) fn new(violations: Vec<ComponentViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub fn violations(&self) -> &[ComponentViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<ComponentViolation> {
        self.violations
    }
}

fn render_lines(violations: &[ComponentViolation]) -> String {
    violations.iter().map(|v| format!("\n{}", v)).collect()
}
