//! Error types for Asterbench

use std::fmt;
use thiserror::Error;

/// Main error type for Asterbench operations
#[derive(Error, Debug)]
pub enum AsterbenchError {
    /// Configuration file parsing error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The query service URL is not a usable HTTP(S) endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Socket feed connection error
    #[error("Feed error: {0}")]
    Feed(String),

    /// Connection, send or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status; carries the service message or reason phrase
    #[error("Query service error: {0}")]
    Protocol(String),

    /// A result record could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// No record matched the key
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A statement was started while another one is still open
    #[error("Another statement is running.")]
    StatementInFlight,

    /// Results were requested without an open statement
    #[error("No statement executed.")]
    NoStatement,

    /// Catalog introspection returned something unusable
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// The relation's primary key has more than one component
    #[error("Composite primary key unsupported: {0}")]
    CompositePrimaryKey(String),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad configuration; fatal at startup
    Configuration,
    /// Connection or encoding failure; the connector stays usable
    Transport,
    /// The service answered with a non-success status
    Protocol,
    /// A returned record could not be decoded
    Decode,
    /// Statement sequencing was violated by the caller
    Discipline,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Protocol => write!(f, "protocol"),
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Discipline => write!(f, "discipline"),
        }
    }
}

impl AsterbenchError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AsterbenchError::Config(_)
            | AsterbenchError::Validation(_)
            | AsterbenchError::InvalidEndpoint(_)
            | AsterbenchError::Feed(_) => ErrorKind::Configuration,
            AsterbenchError::Transport(_) | AsterbenchError::Io(_) => ErrorKind::Transport,
            AsterbenchError::Protocol(_) => ErrorKind::Protocol,
            AsterbenchError::StatementInFlight | AsterbenchError::NoStatement => {
                ErrorKind::Discipline
            }
            AsterbenchError::Decode(_)
            | AsterbenchError::NotFound(_)
            | AsterbenchError::Metadata(_)
            | AsterbenchError::CompositePrimaryKey(_)
            | AsterbenchError::Json(_)
            | AsterbenchError::Internal(_) => ErrorKind::Decode,
        }
    }

    /// Returns true if no operation may proceed after this error
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// The bare textual cause, without the category prefix
    pub fn cause(&self) -> String {
        match self {
            AsterbenchError::Config(msg)
            | AsterbenchError::Validation(msg)
            | AsterbenchError::InvalidEndpoint(msg)
            | AsterbenchError::Feed(msg)
            | AsterbenchError::Transport(msg)
            | AsterbenchError::Protocol(msg)
            | AsterbenchError::Decode(msg)
            | AsterbenchError::NotFound(msg)
            | AsterbenchError::Metadata(msg)
            | AsterbenchError::CompositePrimaryKey(msg)
            | AsterbenchError::Internal(msg) => msg.clone(),
            AsterbenchError::Io(e) => e.to_string(),
            AsterbenchError::Json(e) => e.to_string(),
            AsterbenchError::StatementInFlight | AsterbenchError::NoStatement => self.to_string(),
        }
    }
}

/// Result type alias using AsterbenchError
pub type Result<T> = std::result::Result<T, AsterbenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AsterbenchError::InvalidEndpoint("ftp://x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(AsterbenchError::Transport("refused".into()).kind(), ErrorKind::Transport);
        assert_eq!(AsterbenchError::Protocol("syntax error".into()).kind(), ErrorKind::Protocol);
        assert_eq!(AsterbenchError::Decode("bad".into()).kind(), ErrorKind::Decode);
        assert_eq!(AsterbenchError::StatementInFlight.kind(), ErrorKind::Discipline);
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(AsterbenchError::Validation("bad name".into()).is_fatal());
        assert!(AsterbenchError::Feed("refused".into()).is_fatal());
        assert!(!AsterbenchError::Transport("reset".into()).is_fatal());
        assert!(!AsterbenchError::StatementInFlight.is_fatal());
    }

    #[test]
    fn test_error_cause() {
        let err = AsterbenchError::Protocol("syntax error".into());
        assert_eq!(err.cause(), "syntax error");
        assert_eq!(err.to_string(), "Query service error: syntax error");

        assert_eq!(
            AsterbenchError::StatementInFlight.cause(),
            "Another statement is running."
        );
    }
}
