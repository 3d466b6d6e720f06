//! Type definitions for Asterbench
//!
//! This crate contains shared type definitions used across the Asterbench codebase,
//! including operation kinds, operation status, and run summaries.

pub mod operation;
pub mod status;
pub mod summary;

pub use operation::Operation;
pub use status::Status;
pub use summary::{OperationCounts, RunSummary};

use std::collections::HashMap;

/// Decoded record: field name to raw byte payload
pub type FieldValues = HashMap<String, Vec<u8>>;
