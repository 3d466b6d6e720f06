//! Single-record write command implementations

use asterbench_core::{AsterbenchError, ClientConfig};
use asterbench_runtime::{OperationExecutor, Outcome};
use asterbench_types::Status;
use clap::Args;
use tracing::warn;

use super::{field_values, parse_assignment};

/// Insert command arguments
#[derive(Args, Debug)]
pub struct InsertCommand {
    /// Primary key of the record
    pub key: String,

    /// Field values as `field=value`
    #[arg(value_parser = parse_assignment)]
    pub values: Vec<(String, String)>,
}

/// Update command arguments
#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Primary key of the record
    pub key: String,

    /// Replaced field values as `field=value`
    #[arg(value_parser = parse_assignment, required = true)]
    pub values: Vec<(String, String)>,
}

/// Delete command arguments
#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Primary key of the record
    pub key: String,
}

impl InsertCommand {
    /// Execute the insert command
    pub async fn execute(&self, config: ClientConfig) -> Result<(), AsterbenchError> {
        let mut executor = OperationExecutor::connect(config).await?;
        let result = executor.insert(&self.key, &field_values(&self.values)).await;
        finish(executor, result).await
    }
}

impl UpdateCommand {
    /// Execute the update command
    pub async fn execute(&self, config: ClientConfig) -> Result<(), AsterbenchError> {
        let mut executor = OperationExecutor::connect(config).await?;
        let result = executor.update(&self.key, &field_values(&self.values)).await;
        finish(executor, result).await
    }
}

impl DeleteCommand {
    /// Execute the delete command
    pub async fn execute(&self, config: ClientConfig) -> Result<(), AsterbenchError> {
        let mut executor = OperationExecutor::connect(config).await?;
        let result = executor.delete(&self.key).await.map(|_| Outcome::Committed);
        finish(executor, result).await
    }
}

/// Print the status, then flush whatever the write left buffered
async fn finish(
    executor: OperationExecutor,
    result: Result<Outcome, AsterbenchError>,
) -> Result<(), AsterbenchError> {
    let status = Outcome::status_of(&result);
    println!("{}", status);

    let shutdown = executor.shutdown().await;
    if status == Status::BatchedOk {
        if let Err(e) = &shutdown {
            warn!("Buffered write was not committed: {}", e);
        }
    }

    result?;
    shutdown
}

#[cfg(test)]
mod tests {
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_insert_values() {
        let cli = Cli::try_parse_from(["asterbench", "insert", "user1", "field0=a", "field1=b"])
            .unwrap();
        match cli.command {
            Commands::Insert(cmd) => {
                assert_eq!(cmd.key, "user1");
                assert_eq!(
                    cmd.values,
                    vec![
                        ("field0".to_string(), "a".to_string()),
                        ("field1".to_string(), "b".to_string())
                    ]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_requires_values() {
        assert!(Cli::try_parse_from(["asterbench", "update", "user1"]).is_err());
        assert!(Cli::try_parse_from(["asterbench", "update", "user1", "novalue"]).is_err());
    }
}
