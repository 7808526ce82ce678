//! Schema Bindings CLI
//!
//! Applies default component bindings and validates component references.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use form_schemas::{
    collect_component_violations, lint_directory,
    schema::{load_schema, node_type},
    traverse, FormSchemaConfig, Visit,
};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-bindings")]
#[command(about = "Apply and validate component bindings in form schemas")]
struct Cli {
    /// Config file (defaults to form-schemas.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a copy of a schema with default bindings filled in
    Apply {
        /// Schema file (JSON)
        file: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check component references in a schema file or directory
    Validate {
        /// Schema file, or directory of *.json schemas
        path: PathBuf,
        /// Additional registered component keys
        #[arg(short = 'C', long = "component")]
        components: Vec<String>,
    },

    /// Print every node path in traversal order
    Walk {
        /// Schema file (JSON)
        file: PathBuf,
        /// Do not descend below this depth
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration to this path instead
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn read_schema(path: &Path) -> Result<Value> {
    load_schema(path).with_context(|| format!("loading {}", path.display()))
}

/// Returns `false` when the command found problems
fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config.as_deref().map(|p| p.to_string_lossy().to_string());
    let config = FormSchemaConfig::load_from(config_path.as_deref())?;

    match cli.command {
        Commands::Apply { file, output } => {
            let schema = read_schema(&file)?;
            let bound = config.binding_table().apply(&schema);
            let rendered = config.output.format.render(&bound)?;

            if let Some(path) = output {
                std::fs::write(&path, rendered)?;
                info!(input = %file.display(), output = %path.display(), "bindings applied");
                println!("✅ Bindings written to {:?}", path);
            } else {
                println!("{}", rendered);
            }
            Ok(true)
        }

        Commands::Validate { path, components } => {
            let mut registry = config.component_registry();
            registry.extend(components);
            info!(registered = registry.len(), "validating component references");

            if path.is_dir() {
                let reports = lint_directory(&path, registry.keys());
                if reports.is_empty() {
                    println!("✅ All schemas in {:?} reference registered components", path);
                    return Ok(true);
                }
                for report in &reports {
                    println!("❌ {}", report.schema_id);
                    if let Some(err) = &report.load_error {
                        println!("   └─ could not load: {}", err);
                    }
                    for violation in &report.violations {
                        println!("   └─ {}", violation);
                    }
                }
                println!();
                println!("❌ {} schema(s) failed validation", reports.len());
                Ok(false)
            } else {
                let schema = read_schema(&path)?;
                let violations = collect_component_violations(&schema, registry.keys());
                if violations.is_empty() {
                    println!("✅ {:?} references registered components only", path);
                    return Ok(true);
                }
                println!("❌ {} unregistered reference(s) in {:?}", violations.len(), path);
                for violation in &violations {
                    println!("   └─ {}", violation);
                }
                Ok(false)
            }
        }

        Commands::Walk { file, max_depth } => {
            let schema = read_schema(&file)?;
            traverse(&schema, |node, path| {
                let label = if path.is_root() { "<root>".to_string() } else { path.to_string() };
                println!(
                    "{}{} ({})",
                    "  ".repeat(path.depth()),
                    label,
                    node_type(node).unwrap_or("-")
                );
                match max_depth {
                    Some(max) if path.depth() >= max => Visit::Skip,
                    _ => Visit::Continue,
                }
            });
            Ok(true)
        }

        Commands::Config { init } => {
            if let Some(path) = init {
                let path = path.to_string_lossy().to_string();
                FormSchemaConfig::default().save(&path)?;
                println!("✅ Default configuration written to {}", path);
            } else {
                print!("{}", config.to_toml()?);
            }
            Ok(true)
        }
    }
}
