//! Core domain logic for Asterbench
//!
//! This crate contains the client configuration model, the schema metadata
//! discovered from the query service, and the error types shared by every
//! other crate.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{AsterbenchError, ErrorKind, Result};
