//! YAML configuration parser

use asterbench_core::{AsterbenchError, ClientConfig, FeedConfig};
use serde::Deserialize;
use std::str::FromStr;

use crate::env::EnvSubstitutor;

/// YAML parser for Asterbench client configuration files
pub struct YamlParser;

/// Benchmark-properties style schema (`db.url`, `db.batchinserts`, ...).
///
/// Values may be written as strings or as YAML scalars.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PropertiesConfig {
    #[serde(rename = "db.url", default)]
    url: Option<serde_yaml::Value>,

    #[serde(rename = "db.dataverse", default)]
    dataverse: Option<serde_yaml::Value>,

    #[serde(default)]
    table: Option<serde_yaml::Value>,

    #[serde(rename = "db.batchinserts", default)]
    batch_inserts: Option<serde_yaml::Value>,

    #[serde(rename = "db.batchupdates", default)]
    batch_updates: Option<serde_yaml::Value>,

    #[serde(rename = "db.upsertenabled", default)]
    upsert: Option<serde_yaml::Value>,

    #[serde(rename = "db.feedenabled", default)]
    feed_enabled: Option<serde_yaml::Value>,

    #[serde(rename = "db.feedhost", default)]
    feed_host: Option<serde_yaml::Value>,

    #[serde(rename = "db.feedport", default)]
    feed_port: Option<serde_yaml::Value>,

    #[serde(default)]
    printcmd: Option<serde_yaml::Value>,
}

impl YamlParser {
    /// Parse a YAML string into a client configuration
    pub fn parse(content: &str) -> Result<ClientConfig, AsterbenchError> {
        // First, substitute environment variables in the YAML content
        let substituted = EnvSubstitutor::new().substitute(content)?;
        Self::parse_raw(&substituted)
    }

    /// Parse a YAML string without environment variable substitution
    pub fn parse_raw(content: &str) -> Result<ClientConfig, AsterbenchError> {
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| AsterbenchError::Config(format!("YAML parse error: {}", e)))?;

        if value.is_null() {
            return Ok(ClientConfig::default());
        }

        if is_properties_style(&value) {
            let props = serde_yaml::from_value::<PropertiesConfig>(value)
                .map_err(|e| AsterbenchError::Config(format!("YAML parse error: {}", e)))?;
            return properties_to_config(props);
        }

        serde_yaml::from_value::<ClientConfig>(value)
            .map_err(|e| AsterbenchError::Config(format!("YAML parse error: {}", e)))
    }
}

/// Properties-style files use dotted `db.*` keys or `printcmd`
fn is_properties_style(value: &serde_yaml::Value) -> bool {
    match value.as_mapping() {
        Some(mapping) => mapping.keys().filter_map(|k| k.as_str()).any(|key| {
            key.starts_with("db.") || key == "printcmd"
        }),
        None => false,
    }
}

fn properties_to_config(props: PropertiesConfig) -> Result<ClientConfig, AsterbenchError> {
    let defaults = ClientConfig::default();

    let feed = if parse_flag("db.feedenabled", props.feed_enabled)? {
        let host = props
            .feed_host
            .and_then(yaml_scalar_to_string)
            .unwrap_or_default();
        let port = parse_scalar::<u16>("db.feedport", props.feed_port)?.ok_or_else(|| {
            AsterbenchError::Config("db.feedport is required when db.feedenabled is true".into())
        })?;
        Some(FeedConfig::new(host, port))
    } else {
        None
    };

    Ok(ClientConfig {
        url: props
            .url
            .and_then(yaml_scalar_to_string)
            .unwrap_or(defaults.url),
        scope: props
            .dataverse
            .and_then(yaml_scalar_to_string)
            .unwrap_or(defaults.scope),
        relation: props
            .table
            .and_then(yaml_scalar_to_string)
            .unwrap_or(defaults.relation),
        batch_inserts: parse_scalar("db.batchinserts", props.batch_inserts)?
            .unwrap_or(defaults.batch_inserts),
        batch_updates: parse_scalar("db.batchupdates", props.batch_updates)?
            .unwrap_or(defaults.batch_updates),
        upsert: parse_flag("db.upsertenabled", props.upsert)?,
        feed,
        print_statements: parse_flag("printcmd", props.printcmd)?,
    })
}

fn parse_scalar<T: FromStr>(
    key: &str,
    value: Option<serde_yaml::Value>,
) -> Result<Option<T>, AsterbenchError> {
    match value.and_then(yaml_scalar_to_string) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AsterbenchError::Config(format!("Invalid value for {}: '{}'", key, raw))),
    }
}

fn parse_flag(key: &str, value: Option<serde_yaml::Value>) -> Result<bool, AsterbenchError> {
    Ok(parse_scalar::<bool>(key, value)?.unwrap_or(false))
}

fn yaml_scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s),
        // For non-scalars (seq/map), just serialize them.
        other => serde_yaml::to_string(&other)
            .ok()
            .map(|s| s.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = YamlParser::parse("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_parse_native_config() {
        let yaml = r#"
url: "http://db1:19002/query/service"
dataverse: bench
dataset: users
batch_inserts: 100
batch_updates: 10
upsert: true
feed:
  host: db1
  port: 10001
print_statements: true
"#;
        let config = YamlParser::parse(yaml).unwrap();
        assert_eq!(config.url, "http://db1:19002/query/service");
        assert_eq!(config.scope, "bench");
        assert_eq!(config.relation, "users");
        assert_eq!(config.batch_inserts, 100);
        assert_eq!(config.batch_updates, 10);
        assert!(config.upsert);
        assert_eq!(config.feed, Some(FeedConfig::new("db1", 10001)));
        assert!(config.print_statements);
    }

    #[test]
    fn test_parse_properties_config() {
        let yaml = r#"
db.url: "http://db2:19002/query/service"
db.dataverse: ycsb
table: usertable
db.batchinserts: "20"
db.batchupdates: 5
db.upsertenabled: "true"
db.feedenabled: true
db.feedhost: db2
db.feedport: "10001"
printcmd: false
"#;
        let config = YamlParser::parse(yaml).unwrap();
        assert_eq!(config.url, "http://db2:19002/query/service");
        assert_eq!(config.batch_inserts, 20);
        assert_eq!(config.batch_updates, 5);
        assert!(config.upsert);
        assert_eq!(config.feed, Some(FeedConfig::new("db2", 10001)));
        assert!(!config.print_statements);
    }

    #[test]
    fn test_parse_properties_bad_number() {
        let yaml = r#"
db.batchinserts: "many"
"#;
        let err = YamlParser::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("db.batchinserts"));
    }

    #[test]
    fn test_parse_properties_feed_without_port() {
        let yaml = r#"
db.feedenabled: "true"
db.feedhost: localhost
"#;
        assert!(YamlParser::parse(yaml).is_err());
    }

    #[test]
    fn test_parse_native_bad_value_is_reported() {
        let yaml = r#"
relation: orders
batch_inserts: many
"#;
        assert!(YamlParser::parse(yaml).is_err());
    }

    #[test]
    fn test_parse_comment_only_config() {
        let config = YamlParser::parse("# all defaults\n").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let yaml = "invalid: yaml: content: [";
        assert!(YamlParser::parse(yaml).is_err());
    }
}
