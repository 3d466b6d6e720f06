//! Runtime for Asterbench
//!
//! This crate provides the query service connector, the socket feed writer,
//! and the operation executor that translates benchmark operations into
//! SQL++ statements.

pub mod connectors;
pub mod executor;
pub mod sqlpp;

pub use connectors::{CursorState, FeedWriter, QueryConnector, QueryServiceConnector, ResultCursor};
pub use executor::{OperationExecutor, Outcome, StatementBuilder};
