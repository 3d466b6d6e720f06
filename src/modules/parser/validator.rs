//! Configuration validation

use asterbench_core::{AsterbenchError, ClientConfig, FeedConfig, ServiceEndpoint};
use once_cell::sync::Lazy;
use regex::Regex;

/// Valid scope/relation names: a letter, then letters, digits or underscores,
/// ending with a letter or digit
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z](?:[A-Za-z0-9_]*[A-Za-z0-9])?$").unwrap());

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate the entire client configuration
    pub fn validate(&self, config: &ClientConfig) -> Result<(), AsterbenchError> {
        ServiceEndpoint::parse(&config.url)?;
        Self::validate_name("scope", &config.scope)?;
        Self::validate_name("relation", &config.relation)?;
        Self::validate_batch("batch_inserts", config.batch_inserts)?;
        Self::validate_batch("batch_updates", config.batch_updates)?;
        if let Some(feed) = &config.feed {
            Self::validate_feed(feed)?;
        }
        Ok(())
    }

    /// Check if a name can be used unquoted as a scope or relation
    pub fn is_valid_name(name: &str) -> bool {
        NAME_PATTERN.is_match(name)
    }

    fn validate_name(what: &str, name: &str) -> Result<(), AsterbenchError> {
        if name.is_empty() {
            return Err(AsterbenchError::Validation(format!("{} cannot be empty", what)));
        }

        if !Self::is_valid_name(name) {
            return Err(AsterbenchError::Validation(format!(
                "Invalid {} \"{}\"",
                what, name
            )));
        }

        Ok(())
    }

    fn validate_batch(what: &str, size: u64) -> Result<(), AsterbenchError> {
        if size == 0 {
            return Err(AsterbenchError::Validation(format!(
                "{} must be at least 1",
                what
            )));
        }
        Ok(())
    }

    fn validate_feed(feed: &FeedConfig) -> Result<(), AsterbenchError> {
        if feed.host.is_empty() {
            return Err(AsterbenchError::Validation(
                "Feed host cannot be empty".to_string(),
            ));
        }

        ServiceEndpoint::parse(&format!("http://{}:{}/", feed.host, feed.port)).map_err(|_| {
            AsterbenchError::Validation(format!(
                "Invalid hostname \"{}\" or invalid port {}",
                feed.host, feed.port
            ))
        })?;

        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
