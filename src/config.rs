//! Configuration management for form schema tooling
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (form-schemas.toml)
//! - Environment variables (FORM_SCHEMAS__*)
//!
//! ## Example config file (form-schemas.toml):
//! ```toml
//! [bindings]
//! hidden_components = ["Hidden", "hidden"]
//!
//! [bindings.overrides.string]
//! component = "TextField"
//! decorator = "FormItem"
//!
//! [registry]
//! include_defaults = true
//! components = ["Select", "DatePicker", "Upload"]
//!
//! [output]
//! format = "pretty"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bindings::{BindingTable, TypeBinding, DEFAULT_HIDDEN_COMPONENTS};
use crate::error::{Result, SchemaError};
use crate::registry::ComponentRegistry;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSchemaConfig {
    /// Default binding settings
    #[serde(default)]
    pub bindings: BindingsConfig,

    /// Known component keys
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Binding table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingsConfig {
    /// Component keys that suppress the default decorator
    #[serde(default = "default_hidden_components")]
    pub hidden_components: Vec<String>,

    /// Per-type bindings layered over the built-in table
    #[serde(default)]
    pub overrides: BTreeMap<String, TypeBinding>,
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Register every component the binding table can assign
    #[serde(default = "default_true")]
    pub include_defaults: bool,

    /// Extra component/decorator keys provided by the renderer
    #[serde(default)]
    pub components: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    pub fn render(&self, value: &serde_json::Value) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_hidden_components() -> Vec<String> {
    DEFAULT_HIDDEN_COMPONENTS.iter().map(|s| s.to_string()).collect()
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            hidden_components: default_hidden_components(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            components: Vec::new(),
        }
    }
}

impl FormSchemaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "form-schemas.toml",
            ".form-schemas.toml",
            "config/form-schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "form-schemas") {
            let xdg_config = config_dir.config_dir().join("form-schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (FORM_SCHEMAS__*)
        builder = builder.add_source(
            Environment::with_prefix("FORM_SCHEMAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SchemaError::InvalidFormat(e.to_string()))
    }

    /// Built-in table with configured overrides and hidden spellings applied
    pub fn binding_table(&self) -> BindingTable {
        let table = self
            .bindings
            .overrides
            .iter()
            .fold(BindingTable::default(), |table, (schema_type, binding)| {
                table.with_binding(schema_type.clone(), binding.clone())
            });
        table.with_hidden_components(self.bindings.hidden_components.iter().cloned())
    }

    /// Registry of keys considered valid during validation
    pub fn component_registry(&self) -> ComponentRegistry {
        let mut registry = if self.registry.include_defaults {
            ComponentRegistry::from_table(&self.binding_table())
        } else {
            ComponentRegistry::new()
        };
        registry.extend(self.registry.components.iter().cloned());
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormSchemaConfig::default();
        assert!(config.registry.include_defaults);
        assert_eq!(config.bindings.hidden_components, vec!["Hidden", "hidden"]);
        assert_eq!(config.binding_table(), BindingTable::default());
    }

    #[test]
    fn test_serialize_config() {
        let config = FormSchemaConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[bindings]"));
        assert!(toml_str.contains("[registry]"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_overrides_and_registry() {
        let config: FormSchemaConfig = toml::from_str(
            r#"
            [bindings.overrides.string]
            component = "TextField"
            decorator = "Labeled"

            [registry]
            components = ["Select"]

            [output]
            format = "compact"
            "#,
        )
        .unwrap();

        let table = config.binding_table();
        assert_eq!(table.get("string").map(|b| b.component.as_str()), Some("TextField"));
        assert_eq!(table.get("number").map(|b| b.component.as_str()), Some("NumberInput"));
        assert!(table.is_hidden("hidden"));

        let registry = config.component_registry();
        assert!(registry.contains("TextField"));
        assert!(registry.contains("Labeled"));
        assert!(registry.contains("Select"));
        assert!(!registry.contains("Input"));
        assert_eq!(config.output.format, OutputFormat::Compact);
    }

    #[test]
    fn test_registry_without_defaults() {
        let mut config = FormSchemaConfig::default();
        config.registry.include_defaults = false;
        config.registry.components = vec!["Only".to_string()];
        assert_eq!(config.component_registry().sorted(), vec!["Only"]);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let result = FormSchemaConfig::load_from(path.to_str());
        assert!(matches!(result, Err(SchemaError::Config(_))));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = FormSchemaConfig::default();
        config.registry.components = vec!["Select".to_string()];
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = FormSchemaConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.registry.components, vec!["Select"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[registry]\ncomponents = [\"Upload\"]\n").unwrap();

        let config = FormSchemaConfig::load_from(path.to_str()).unwrap();
        assert!(config.component_registry().contains("Upload"));
        assert!(config.component_registry().contains("Input"));
    }
}
