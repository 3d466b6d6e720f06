//! Query service connectors for Asterbench
//!
//! The HTTP connector, its streaming result cursor, and the socket feed used
//! as an alternate ingestion path.

mod cursor;
mod feed;
mod query_service;
mod traits;

pub use cursor::{CursorState, ResultCursor};
pub use feed::FeedWriter;
pub use query_service::QueryServiceConnector;
pub use traits::QueryConnector;
