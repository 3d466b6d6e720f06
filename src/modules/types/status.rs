//! Tri-state operation status reported to the benchmark harness

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one benchmark operation as seen by the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The operation was executed and committed
    Ok,
    /// The operation was buffered and will be committed with a later batch
    BatchedOk,
    /// The operation failed
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::BatchedOk => write!(f, "BATCHED_OK"),
            Status::Error => write!(f, "ERROR"),
        }
    }
}

impl Status {
    /// Returns true unless the operation failed
    pub fn is_ok(&self) -> bool {
        !matches!(self, Status::Error)
    }
}
