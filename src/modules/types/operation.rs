//! Benchmark operation kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of key-value operations a benchmark workload issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Point read by primary key
    Read,
    /// Ordered range scan starting at a key
    Scan,
    /// Delete by primary key
    Delete,
    /// Insert (or upsert) of a full record
    Insert,
    /// Partial field update of an existing record
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Operation::Read),
            "scan" => Ok(Operation::Scan),
            "delete" => Ok(Operation::Delete),
            "insert" => Ok(Operation::Insert),
            "update" => Ok(Operation::Update),
            _ => Err(format!("Unknown operation: {}", s)),
        }
    }
}

impl Operation {
    /// Returns all operation kinds
    pub fn all() -> &'static [Operation] {
        &[
            Operation::Read,
            Operation::Scan,
            Operation::Delete,
            Operation::Insert,
            Operation::Update,
        ]
    }

    /// Upper-case label used when printing statements
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Read => "READ",
            Operation::Scan => "SCAN",
            Operation::Delete => "DELETE",
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
        }
    }

    /// Returns true if the operation pulls records back from the service
    pub fn yields_records(&self) -> bool {
        matches!(self, Operation::Read | Operation::Scan)
    }

    /// Returns true if the operation may be buffered into a batch
    pub fn is_batchable(&self) -> bool {
        matches!(self, Operation::Insert | Operation::Update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_from_str() {
        assert_eq!(Operation::from_str("read").unwrap(), Operation::Read);
        assert_eq!(Operation::from_str("READ").unwrap(), Operation::Read);
        assert_eq!(Operation::from_str("scan").unwrap(), Operation::Scan);
        assert_eq!(Operation::from_str("delete").unwrap(), Operation::Delete);
        assert_eq!(Operation::from_str("Insert").unwrap(), Operation::Insert);
        assert_eq!(Operation::from_str("update").unwrap(), Operation::Update);
        assert!(Operation::from_str("merge").is_err());
        assert!(Operation::from_str("get").is_err());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Read.to_string(), "READ");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
    }

    #[test]
    fn test_operation_classes() {
        assert!(Operation::Scan.yields_records());
        assert!(!Operation::Delete.yields_records());
        assert!(Operation::Insert.is_batchable());
        assert!(!Operation::Read.is_batchable());
        assert_eq!(Operation::all().len(), 5);
    }

    #[test]
    fn test_operation_serde() {
        let json = serde_json::to_string(&Operation::Scan).unwrap();
        assert_eq!(json, "\"scan\"");

        let op: Operation = serde_json::from_str("\"insert\"").unwrap();
        assert_eq!(op, Operation::Insert);
    }
}
