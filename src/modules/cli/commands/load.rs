//! Load command implementation
//!
//! Spawns independent clients, each owning its own connector and executor,
//! and inserts a range of generated records through them.

use asterbench_core::{AsterbenchError, ClientConfig};
use asterbench_runtime::{OperationExecutor, Outcome};
use asterbench_types::{FieldValues, Operation, RunSummary, Status};
use clap::Args;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Load command arguments
#[derive(Args, Debug, Clone)]
pub struct LoadCommand {
    /// Number of records to insert
    #[arg(long, default_value_t = 1000)]
    pub records: u64,

    /// Number of concurrent clients
    #[arg(long, default_value_t = 1)]
    pub clients: u32,

    /// Bytes per generated field value
    #[arg(long, default_value_t = 100)]
    pub field_length: usize,

    /// Prefix of generated keys
    #[arg(long, default_value = "user")]
    pub key_prefix: String,
}

impl LoadCommand {
    /// Execute the load command
    pub async fn execute(&self, config: ClientConfig) -> Result<(), AsterbenchError> {
        let summary = self.run(config).await?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }

    /// Run every client to completion and merge their summaries
    pub async fn run(&self, config: ClientConfig) -> Result<RunSummary, AsterbenchError> {
        if self.clients == 0 {
            return Err(AsterbenchError::Validation(
                "clients must be at least 1".to_string(),
            ));
        }

        info!(
            records = self.records,
            clients = self.clients,
            "Loading {}.{}",
            config.scope,
            config.relation
        );

        let started = Instant::now();
        let mut handles = Vec::with_capacity(self.clients as usize);
        for client in 0..self.clients {
            let keys = self.client_keys(client);
            let config = config.clone();
            let field_length = self.field_length;
            handles.push(tokio::spawn(async move {
                load_client(config, keys, field_length).await
            }));
        }

        let mut summary = RunSummary::default();
        for handle in handles {
            let client = handle
                .await
                .map_err(|e| AsterbenchError::Internal(format!("Client task failed: {}", e)))??;
            summary.merge(&client);
        }
        summary.elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            elapsed_ms = summary.elapsed_ms,
            errors = summary.errors(),
            "Load finished"
        );
        Ok(summary)
    }

    /// Keys inserted by one client; clients interleave over the key space
    fn client_keys(&self, client: u32) -> Vec<String> {
        (u64::from(client)..self.records)
            .step_by(self.clients as usize)
            .map(|n| format!("{}{}", self.key_prefix, n))
            .collect()
    }
}

async fn load_client(
    config: ClientConfig,
    keys: Vec<String>,
    field_length: usize,
) -> Result<RunSummary, AsterbenchError> {
    let started = Instant::now();
    let mut executor = OperationExecutor::connect(config).await?;
    let fields = executor.schema().fields.clone();
    let mut rng = StdRng::from_entropy();
    let mut summary = RunSummary::for_client();

    for key in &keys {
        let values = random_values(&mut rng, &fields, field_length);
        let result = executor.insert(key, &values).await;
        if let Err(e) = &result {
            warn!(key = %key, "Insert failed: {}", e);
        }
        summary.record(Operation::Insert, Outcome::status_of(&result));
    }

    if let Err(e) = executor.shutdown().await {
        warn!("Final flush failed: {}", e);
        summary.record(Operation::Insert, Status::Error);
    }

    summary.elapsed_ms = started.elapsed().as_millis() as u64;
    debug!(keys = keys.len(), elapsed_ms = summary.elapsed_ms, "Client finished");
    Ok(summary)
}

/// Random printable payload for every field
fn random_values<R: Rng>(rng: &mut R, fields: &[String], length: usize) -> FieldValues {
    fields
        .iter()
        .map(|field| {
            let bytes: Vec<u8> = (0..length).map(|_| rng.sample(Alphanumeric)).collect();
            (field.clone(), bytes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(records: u64, clients: u32) -> LoadCommand {
        LoadCommand {
            records,
            clients,
            field_length: 8,
            key_prefix: "user".to_string(),
        }
    }

    #[test]
    fn test_client_keys_partition() {
        let cmd = command(7, 3);
        assert_eq!(cmd.client_keys(0), vec!["user0", "user3", "user6"]);
        assert_eq!(cmd.client_keys(1), vec!["user1", "user4"]);
        assert_eq!(cmd.client_keys(2), vec!["user2", "user5"]);

        let total: usize = (0..3).map(|c| cmd.client_keys(c).len()).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn test_more_clients_than_records() {
        let cmd = command(1, 4);
        assert_eq!(cmd.client_keys(0), vec!["user0"]);
        assert!(cmd.client_keys(3).is_empty());
    }

    #[test]
    fn test_random_values() {
        let mut rng = StdRng::seed_from_u64(7);
        let fields = vec!["field0".to_string(), "field1".to_string()];
        let values = random_values(&mut rng, &fields, 16);
        assert_eq!(values.len(), 2);
        assert!(values.values().all(|v| v.len() == 16));
        assert!(values["field0"].iter().all(|b| b.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_zero_clients_rejected() {
        let err = command(10, 0).run(ClientConfig::default()).await.unwrap_err();
        assert!(err.is_fatal());
    }
}
