//! Validated query service endpoint

use std::fmt;
use url::Url;

use crate::error::AsterbenchError;

/// An absolute `http`/`https` URL with a host.
///
/// Only constructed through [`ServiceEndpoint::parse`], so holding one means
/// the endpoint was validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    url: Url,
}

impl ServiceEndpoint {
    /// Validate and wrap a service URL
    pub fn parse(raw: &str) -> Result<Self, AsterbenchError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| AsterbenchError::InvalidEndpoint(format!("'{}': {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AsterbenchError::InvalidEndpoint(format!(
                "'{}': scheme must be http or https",
                raw
            )));
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self { url }),
            _ => Err(AsterbenchError::InvalidEndpoint(format!(
                "'{}': missing host",
                raw
            ))),
        }
    }

    /// Endpoint of the query service API on `host:port`
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, AsterbenchError> {
        Self::parse(&format!("http://{}:{}/query/service", host, port))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
