//! CLI commands

mod load;
mod read;
mod schema;
mod write;

pub use load::LoadCommand;
pub use read::{ReadCommand, ScanCommand};
pub use schema::SchemaCommand;
pub use write::{DeleteCommand, InsertCommand, UpdateCommand};

use asterbench_core::{AsterbenchError, ClientConfig};
use asterbench_parser::{load_or_default, ConfigValidator};
use asterbench_types::FieldValues;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;

/// Asterbench - benchmark client for SQL++ query services
#[derive(Parser, Debug)]
#[command(name = "asterbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    ///
    /// A missing file means the built-in defaults. This is a *global* option
    /// so it can be specified after subcommands, e.g.
    /// `asterbench load -f bench.yaml`.
    #[arg(
        short = 'f',
        long = "file",
        global = true,
        default_value = "asterbench.yaml"
    )]
    pub config: String,

    /// Backwards/compat alias for `-f/--file`
    #[arg(short = 'c', long = "config", global = true, hide = true)]
    pub config_compat: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that take precedence over the configuration file
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Query service URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Scope (dataverse) holding the relation
    #[arg(long, global = true)]
    pub scope: Option<String>,

    /// Relation (dataset) to operate on
    #[arg(long, global = true)]
    pub relation: Option<String>,

    /// Inserts per statement
    #[arg(long, global = true)]
    pub batch_inserts: Option<u64>,

    /// Updates per statement
    #[arg(long, global = true)]
    pub batch_updates: Option<u64>,

    /// Use UPSERT for inserts
    #[arg(long, global = true)]
    pub upsert: bool,

    /// Log every statement sent
    #[arg(long, global = true)]
    pub print_statements: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the discovered primary key and fields
    Schema(SchemaCommand),

    /// Read one record
    Read(ReadCommand),

    /// Read a range of records in key order
    Scan(ScanCommand),

    /// Insert one record
    Insert(InsertCommand),

    /// Update fields of one record
    Update(UpdateCommand),

    /// Delete one record
    Delete(DeleteCommand),

    /// Load records with concurrent clients and print a run summary
    Load(LoadCommand),
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Effective configuration path, accounting for compat flags.
    pub fn config_path(&self) -> &str {
        self.config_compat.as_deref().unwrap_or(&self.config)
    }

    /// Load the configuration file, apply flag overrides and validate
    pub fn load_config(&self) -> Result<ClientConfig, AsterbenchError> {
        let config = self.overrides.apply(load_or_default(self.config_path())?);
        ConfigValidator::new().validate(&config)?;
        Ok(config)
    }
}

impl ConfigOverrides {
    /// Apply the overrides on top of `config`
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(scope) = &self.scope {
            config.scope = scope.clone();
        }
        if let Some(relation) = &self.relation {
            config.relation = relation.clone();
        }
        if let Some(size) = self.batch_inserts {
            config.batch_inserts = size;
        }
        if let Some(size) = self.batch_updates {
            config.batch_updates = size;
        }
        config.upsert |= self.upsert;
        config.print_statements |= self.print_statements;
        config
    }
}

/// Parse a `field=value` argument
pub(crate) fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got '{}'", raw)),
    }
}

/// Build a field map from `field=value` arguments
pub(crate) fn field_values(assignments: &[(String, String)]) -> FieldValues {
    assignments
        .iter()
        .map(|(field, value)| (field.clone(), value.as_bytes().to_vec()))
        .collect()
}

/// Render a decoded record for printing, payloads as lossy UTF-8
pub(crate) fn printable(values: &FieldValues) -> BTreeMap<String, String> {
    values
        .iter()
        .map(|(field, bytes)| (field.clone(), String::from_utf8_lossy(bytes).into_owned()))
        .collect()
}
