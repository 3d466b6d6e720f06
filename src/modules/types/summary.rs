//! Aggregated results of a benchmark run

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Operation, Status};

/// Per-operation status counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCounts {
    pub ok: u64,
    pub batched: u64,
    pub error: u64,
}

impl OperationCounts {
    /// Count one status
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Ok => self.ok += 1,
            Status::BatchedOk => self.batched += 1,
            Status::Error => self.error += 1,
        }
    }

    /// Total number of operations counted
    pub fn total(&self) -> u64 {
        self.ok + self.batched + self.error
    }

    fn merge(&mut self, other: &OperationCounts) {
        self.ok += other.ok;
        self.batched += other.batched;
        self.error += other.error;
    }
}

/// Summary of one client or of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of independent clients that contributed
    pub clients: u32,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,

    /// Counters keyed by operation kind
    #[serde(default)]
    pub operations: BTreeMap<Operation, OperationCounts>,
}

impl RunSummary {
    /// Summary for a single client
    pub fn for_client() -> Self {
        Self {
            clients: 1,
            ..Self::default()
        }
    }

    /// Count the status of one operation
    pub fn record(&mut self, operation: Operation, status: Status) {
        self.operations.entry(operation).or_default().record(status);
    }

    /// Fold another client's summary into this one
    pub fn merge(&mut self, other: &RunSummary) {
        self.clients += other.clients;
        self.elapsed_ms = self.elapsed_ms.max(other.elapsed_ms);
        for (operation, counts) in &other.operations {
            self.operations.entry(*operation).or_default().merge(counts);
        }
    }

    /// Total number of failed operations across all kinds
    pub fn errors(&self) -> u64 {
        self.operations.values().map(|c| c.error).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_totals() {
        let mut summary = RunSummary::for_client();
        summary.record(Operation::Insert, Status::BatchedOk);
        summary.record(Operation::Insert, Status::Ok);
        summary.record(Operation::Read, Status::Error);

        let inserts = summary.operations[&Operation::Insert];
        assert_eq!(inserts.batched, 1);
        assert_eq!(inserts.ok, 1);
        assert_eq!(inserts.total(), 2);
        assert_eq!(summary.errors(), 1);
    }

    #[test]
    fn test_merge() {
        let mut a = RunSummary::for_client();
        a.elapsed_ms = 10;
        a.record(Operation::Update, Status::Ok);

        let mut b = RunSummary::for_client();
        b.elapsed_ms = 25;
        b.record(Operation::Update, Status::Error);
        b.record(Operation::Delete, Status::Ok);

        a.merge(&b);
        assert_eq!(a.clients, 2);
        assert_eq!(a.elapsed_ms, 25);
        assert_eq!(a.operations[&Operation::Update].total(), 2);
        assert_eq!(a.operations[&Operation::Delete].ok, 1);
    }

    #[test]
    fn test_summary_serializes_operation_keys() {
        let mut summary = RunSummary::for_client();
        summary.record(Operation::Scan, Status::Ok);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"scan\":{\"ok\":1,\"batched\":0,\"error\":0}"));
    }
}
