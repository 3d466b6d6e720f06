//! Schema command implementation

use asterbench_core::{AsterbenchError, ClientConfig};
use asterbench_runtime::OperationExecutor;
use clap::Args;
use tracing::info;

/// Schema command arguments
#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Print the schema as JSON
    #[arg(long)]
    pub json: bool,
}

impl SchemaCommand {
    /// Execute the schema command
    pub async fn execute(&self, config: ClientConfig) -> Result<(), AsterbenchError> {
        info!("Discovering schema of {}.{}", config.scope, config.relation);

        let executor = OperationExecutor::connect(config).await?;
        let schema = executor.schema().clone();
        executor.shutdown().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&schema)?);
        } else {
            println!("primary key: {}", schema.primary_key);
            println!("fields:      {}", schema.fields.join(", "));
        }

        Ok(())
    }
}
