//! Environment variable substitution for configuration files

use asterbench_core::AsterbenchError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Regex pattern for environment variable placeholders: {{ env.VAR_NAME }}
static ENV_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Replaces `{{ env.NAME }}` placeholders with environment values
pub struct EnvSubstitutor {
    /// Whether to fail on missing environment variables
    strict: bool,
}

impl EnvSubstitutor {
    /// Substitutor that fails when a referenced variable is unset
    pub fn new() -> Self {
        Self { strict: true }
    }

    /// Substitutor that leaves placeholders for unset variables untouched
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Substitute environment variables in the given content
    pub fn substitute(&self, content: &str) -> Result<String, AsterbenchError> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();

        let mut missing: Vec<String> = Vec::new();
        let result = ENV_PATTERN.replace_all(content, |cap: &Captures<'_>| {
            match std::env::var(&cap[1]) {
                Ok(value) => value,
                Err(_) => {
                    if self.strict && !missing.iter().any(|m| m == &cap[1]) {
                        missing.push(cap[1].to_string());
                    }
                    cap[0].to_string()
                }
            }
        });

        if !missing.is_empty() {
            return Err(AsterbenchError::Config(format!(
                "Environment variable not found: {}",
                missing.join(", ")
            )));
        }

        Ok(result.into_owned())
    }

    /// Check if a string contains environment variable placeholders
    pub fn has_placeholders(content: &str) -> bool {
        ENV_PATTERN.is_match(content)
    }
}

impl Default for EnvSubstitutor {
    fn default() -> Self {
        Self::new()
    }
}
