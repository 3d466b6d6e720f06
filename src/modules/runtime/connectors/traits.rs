//! Connector trait definition

use async_trait::async_trait;
use asterbench_core::{AsterbenchError, FieldInfo};

/// Statement-level access to a SQL++ query service
///
/// Implementations are used by one logical client at a time and are not
/// internally synchronized: a result-bearing statement must be drained or
/// closed before the next statement starts.
#[async_trait]
pub trait QueryConnector: Send {
    /// Execute a statement and discard its response body
    async fn execute_for_effect(&mut self, statement: &str) -> Result<(), AsterbenchError>;

    /// Execute a statement and keep its response open for [`next_result`]
    ///
    /// [`next_result`]: QueryConnector::next_result
    async fn execute_for_results(&mut self, statement: &str) -> Result<(), AsterbenchError>;

    /// Next record of the open statement, `None` once the results are exhausted
    ///
    /// With no statement open this is also `None`, and [`error`] reports
    /// "No statement executed.".
    ///
    /// [`error`]: QueryConnector::error
    async fn next_result(&mut self) -> Result<Option<String>, AsterbenchError>;

    /// Collect every remaining record of the open statement
    async fn drain_all(&mut self) -> Result<Vec<String>, AsterbenchError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_result().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Release the open statement, if any
    fn close_current_response(&mut self);

    /// Single-component primary key of `scope.relation`
    async fn primary_key(&mut self, scope: &str, relation: &str)
        -> Result<String, AsterbenchError>;

    /// Field descriptors of `scope.relation`, in catalog order
    async fn fields(
        &mut self,
        scope: &str,
        relation: &str,
    ) -> Result<Vec<FieldInfo>, AsterbenchError>;

    /// Cause recorded by the last operation, empty after a success
    fn error(&self) -> &str;

    /// Get the connector type name
    fn connector_type(&self) -> &'static str;
}
