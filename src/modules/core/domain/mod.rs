//! Domain models for Asterbench

mod config;
mod endpoint;
mod schema;

pub use config::{ClientConfig, FeedConfig};
pub use endpoint::ServiceEndpoint;
pub use schema::{FieldInfo, TableSchema};
