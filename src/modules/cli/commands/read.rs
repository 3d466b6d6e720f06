//! Read and scan command implementations

use asterbench_core::{AsterbenchError, ClientConfig};
use asterbench_runtime::OperationExecutor;
use clap::Args;

use super::printable;

/// Read command arguments
#[derive(Args, Debug)]
pub struct ReadCommand {
    /// Primary key of the record
    pub key: String,

    /// Fields to return (all when omitted)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

/// Scan command arguments
#[derive(Args, Debug)]
pub struct ScanCommand {
    /// First key of the range
    pub start: String,

    /// Maximum number of records
    pub count: usize,

    /// Fields to return (all when omitted)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

impl ReadCommand {
    /// Execute the read command
    pub async fn execute(&self, config: ClientConfig) -> Result<(), AsterbenchError> {
        let mut executor = OperationExecutor::connect(config).await?;
        let record = executor.read(&self.key, self.fields.as_deref()).await;
        executor.shutdown().await?;

        println!("{}", serde_json::to_string_pretty(&printable(&record?))?);
        Ok(())
    }
}

impl ScanCommand {
    /// Execute the scan command
    pub async fn execute(&self, config: ClientConfig) -> Result<(), AsterbenchError> {
        let mut executor = OperationExecutor::connect(config).await?;
        let records = executor
            .scan(&self.start, self.count, self.fields.as_deref())
            .await;
        executor.shutdown().await?;

        let printed: Vec<_> = records?.iter().map(printable).collect();
        println!("{}", serde_json::to_string_pretty(&printed)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_read_fields_list() {
        let cli = Cli::try_parse_from(["asterbench", "read", "user1", "--fields", "field0,field1"])
            .unwrap();
        match cli.command {
            Commands::Read(cmd) => {
                assert_eq!(cmd.key, "user1");
                assert_eq!(
                    cmd.fields,
                    Some(vec!["field0".to_string(), "field1".to_string()])
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scan_args() {
        let cli = Cli::try_parse_from(["asterbench", "scan", "user5", "10"]).unwrap();
        match cli.command {
            Commands::Scan(cmd) => {
                assert_eq!(cmd.start, "user5");
                assert_eq!(cmd.count, 10);
                assert!(cmd.fields.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
