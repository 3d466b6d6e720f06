//! Configuration parsing for Asterbench
//!
//! This crate handles parsing of YAML client configuration files,
//! validation, and environment variable substitution.

pub mod env;
pub mod validator;
pub mod yaml;

pub use validator::ConfigValidator;
pub use yaml::YamlParser;

use asterbench_core::{AsterbenchError, ClientConfig};
use std::path::Path;
use tracing::debug;

/// Parse a configuration file from a path
pub fn parse_file(path: &str) -> Result<ClientConfig, AsterbenchError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AsterbenchError::Config(format!("Failed to read file '{}': {}", path, e)))?;

    parse_string(&content)
}

/// Parse a configuration file if it exists, otherwise fall back to defaults
pub fn load_or_default(path: &str) -> Result<ClientConfig, AsterbenchError> {
    if Path::new(path).exists() {
        parse_file(path)
    } else {
        debug!("No configuration file at '{}', using defaults", path);
        Ok(ClientConfig::default())
    }
}

/// Parse a configuration from a string
pub fn parse_string(content: &str) -> Result<ClientConfig, AsterbenchError> {
    // Parse YAML
    let config = YamlParser::parse(content)?;

    // Validate configuration
    let validator = ConfigValidator::new();
    validator.validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
url: "http://localhost:19002/query/service"
scope: bench
relation: usertable
batch_inserts: 50
"#;
        let config = parse_string(yaml).unwrap();
        assert_eq!(config.scope, "bench");
        assert_eq!(config.batch_inserts, 50);
        assert_eq!(config.batch_updates, 1);
    }

    #[test]
    fn test_parse_rejects_invalid_config() {
        let yaml = r#"
scope: "bad-name"
"#;
        assert!(parse_string(yaml).is_err());
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "relation: orders\nupsert: true").unwrap();

        let config = parse_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.relation, "orders");
        assert!(config.upsert);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");

        let config = load_or_default(missing.to_str().unwrap()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
