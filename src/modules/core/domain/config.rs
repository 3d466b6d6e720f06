//! Client configuration

use serde::{Deserialize, Serialize};

/// Default query service endpoint
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:19002/query/service";

/// Configuration for one benchmark client (connector + executor pair)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Query service URL that SQL++ statements are posted to
    #[serde(default = "default_url")]
    pub url: String,

    /// Namespace containing the relation
    #[serde(default = "default_scope", alias = "dataverse")]
    pub scope: String,

    /// Relation the operations target
    #[serde(default = "default_relation", alias = "dataset", alias = "table")]
    pub relation: String,

    /// Number of inserts combined into one statement (1 disables batching)
    #[serde(default = "default_batch")]
    pub batch_inserts: u64,

    /// Number of updates combined into one statement (1 disables batching)
    #[serde(default = "default_batch")]
    pub batch_updates: u64,

    /// Use UPSERT instead of INSERT for inserts
    #[serde(default)]
    pub upsert: bool,

    /// Socket feed used for inserts instead of SQL++ (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<FeedConfig>,

    /// Log every statement before it is sent
    #[serde(default)]
    pub print_statements: bool,
}

/// Socket feed endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    pub host: String,
    pub port: u16,
}

fn default_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_scope() -> String {
    "ycsb".to_string()
}

fn default_relation() -> String {
    "usertable".to_string()
}

fn default_batch() -> u64 {
    1
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            scope: default_scope(),
            relation: default_relation(),
            batch_inserts: default_batch(),
            batch_updates: default_batch(),
            upsert: false,
            feed: None,
            print_statements: false,
        }
    }
}

impl ClientConfig {
    /// Returns true if inserts are buffered
    pub fn batches_inserts(&self) -> bool {
        self.batch_inserts > 1
    }

    /// Returns true if updates are buffered
    pub fn batches_updates(&self) -> bool {
        self.batch_updates > 1
    }

    /// Keyword used for inserts
    pub fn insert_keyword(&self) -> &'static str {
        if self.upsert {
            "UPSERT"
        } else {
            "INSERT"
        }
    }
}

impl FeedConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port` pair for socket connection
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
