//! SQL++ query service connector
//!
//! Statements are posted as the `statement` form field with `mode=immediate`.
//! A 200 response is success; anything else is a failure whose cause is the
//! service-reported `"msg"` when one can be found in the body.

use async_trait::async_trait;
use asterbench_core::{AsterbenchError, FieldInfo, ServiceEndpoint};
use futures::TryStreamExt;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::io;
use std::time::{Duration, Instant};
use tokio::io::AsyncBufRead;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use super::cursor::{CursorState, ResultCursor};
use super::traits::QueryConnector;
use crate::sqlpp::quote_literal;

type BodyReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// At most one statement is open per connector
enum StatementState {
    Idle,
    Open(ResultCursor<BodyReader>),
}

/// Connector for one query service endpoint
pub struct QueryServiceConnector {
    client: Client,
    endpoint: ServiceEndpoint,
    statement: StatementState,
    error: String,
    elapsed: Duration,
}

impl QueryServiceConnector {
    /// Create a connector for a service URL
    pub fn new(url: &str) -> Result<Self, AsterbenchError> {
        Self::with_endpoint(ServiceEndpoint::parse(url)?)
    }

    /// Create a connector for `http://host:port/query/service`
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, AsterbenchError> {
        Self::with_endpoint(ServiceEndpoint::from_host_port(host, port)?)
    }

    /// Create a connector for an already validated endpoint
    pub fn with_endpoint(endpoint: ServiceEndpoint) -> Result<Self, AsterbenchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AsterbenchError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            statement: StatementState::Idle,
            error: String::new(),
            elapsed: Duration::ZERO,
        })
    }

    /// Returns true if the last operation failed
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Time the last request took until its response headers arrived
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Cursor position of the open statement, if there is one
    pub fn cursor_state(&self) -> Option<CursorState> {
        match &self.statement {
            StatementState::Idle => None,
            StatementState::Open(cursor) => Some(cursor.state()),
        }
    }

    fn is_in_flight(&self) -> bool {
        matches!(self.statement, StatementState::Open(_))
    }

    /// Remember the cause of a failure, or forget the previous one
    fn record<T>(&mut self, result: Result<T, AsterbenchError>) -> Result<T, AsterbenchError> {
        match &result {
            Ok(_) => self.error.clear(),
            Err(e) => self.error = e.cause(),
        }
        result
    }

    async fn send(&mut self, statement: &str) -> Result<Response, AsterbenchError> {
        if self.is_in_flight() {
            return Err(AsterbenchError::StatementInFlight);
        }

        debug!(endpoint = %self.endpoint, statement, "Sending statement");

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint.url().clone())
            .form(&[("statement", statement), ("mode", "immediate")])
            .send()
            .await
            .map_err(|e| AsterbenchError::Transport(e.to_string()))?;
        self.elapsed = started.elapsed();

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }

        let reason = status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Failed to read error body: {}", e);
                String::new()
            }
        };
        let message = extract_service_message(&body).unwrap_or(reason);
        warn!(status = status.as_u16(), "Statement failed: {}", message);

        Err(AsterbenchError::Protocol(message))
    }

    async fn run_for_effect(&mut self, statement: &str) -> Result<(), AsterbenchError> {
        let mut response = self.send(statement).await?;
        while response
            .chunk()
            .await
            .map_err(|e| AsterbenchError::Transport(format!("Failed to read response body: {}", e)))?
            .is_some()
        {}
        Ok(())
    }

    async fn run_for_results(&mut self, statement: &str) -> Result<(), AsterbenchError> {
        let response = self.send(statement).await?;
        self.statement = StatementState::Open(ResultCursor::new(body_reader(response)));
        Ok(())
    }

    async fn discover_primary_key(
        &mut self,
        scope: &str,
        relation: &str,
    ) -> Result<String, AsterbenchError> {
        require_names(scope, relation)?;

        let statement = format!(
            "SELECT VALUE InternalDetails.PrimaryKey FROM Metadata.`Dataset` \
             WHERE DataverseName={} AND DatasetName={};",
            quote_literal(scope),
            quote_literal(relation)
        );
        self.run_for_results(&statement).await?;
        let records = self.drain_all().await?;

        let mut keys: Vec<Vec<String>> = Vec::new();
        for record in &records {
            let parsed: Vec<Vec<String>> = serde_json::from_str(record).map_err(|e| {
                AsterbenchError::Metadata(format!("Unexpected primary key '{}': {}", record, e))
            })?;
            keys.extend(parsed);
        }

        match keys.as_slice() {
            [] => Err(AsterbenchError::Metadata(format!(
                "No primary key can be found for {}.{}",
                scope, relation
            ))),
            [path] if path.len() == 1 => Ok(path[0].clone()),
            _ => Err(AsterbenchError::CompositePrimaryKey(format!(
                "{}.{} has primary key {:?}",
                scope, relation, keys
            ))),
        }
    }

    async fn discover_fields(
        &mut self,
        scope: &str,
        relation: &str,
    ) -> Result<Vec<FieldInfo>, AsterbenchError> {
        require_names(scope, relation)?;

        let statement = format!(
            "SELECT VALUE dt.Derived.Record.Fields FROM Metadata.`Dataset` ds, Metadata.`Datatype` dt \
             WHERE ds.DataverseName={} AND ds.DatasetName={} \
             AND dt.DataverseName=ds.DataverseName AND dt.DatatypeName=ds.DatatypeName;",
            quote_literal(scope),
            quote_literal(relation)
        );
        self.run_for_results(&statement).await?;
        let records = self.drain_all().await?;

        let mut fields = Vec::new();
        for record in &records {
            let parsed: Vec<FieldInfo> = serde_json::from_str(record).map_err(|e| {
                AsterbenchError::Metadata(format!("Unexpected field list '{}': {}", record, e))
            })?;
            fields.extend(parsed);
        }

        if fields.is_empty() {
            return Err(AsterbenchError::Metadata(format!(
                "No field can be found for {}.{}",
                scope, relation
            )));
        }

        Ok(fields)
    }
}

#[async_trait]
impl QueryConnector for QueryServiceConnector {
    async fn execute_for_effect(&mut self, statement: &str) -> Result<(), AsterbenchError> {
        let result = self.run_for_effect(statement).await;
        self.record(result)
    }

    async fn execute_for_results(&mut self, statement: &str) -> Result<(), AsterbenchError> {
        let result = self.run_for_results(statement).await;
        self.record(result)
    }

    async fn next_result(&mut self) -> Result<Option<String>, AsterbenchError> {
        let cursor = match &mut self.statement {
            StatementState::Open(cursor) => cursor,
            StatementState::Idle => {
                // nothing open still ends in the sentinel, with the cause kept
                self.error = AsterbenchError::NoStatement.cause();
                return Ok(None);
            }
        };
        let result = cursor.next_record().await.map_err(|e| {
            AsterbenchError::Transport(format!("Failed to read response body: {}", e))
        });

        if !matches!(result, Ok(Some(_))) {
            self.close_current_response();
        }
        self.record(result)
    }

    fn close_current_response(&mut self) {
        self.statement = StatementState::Idle;
    }

    async fn primary_key(
        &mut self,
        scope: &str,
        relation: &str,
    ) -> Result<String, AsterbenchError> {
        if self.is_in_flight() {
            return self.record(Err(AsterbenchError::StatementInFlight));
        }
        let result = self.discover_primary_key(scope, relation).await;
        self.close_current_response();
        self.record(result)
    }

    async fn fields(
        &mut self,
        scope: &str,
        relation: &str,
    ) -> Result<Vec<FieldInfo>, AsterbenchError> {
        if self.is_in_flight() {
            return self.record(Err(AsterbenchError::StatementInFlight));
        }
        let result = self.discover_fields(scope, relation).await;
        self.close_current_response();
        self.record(result)
    }

    fn error(&self) -> &str {
        &self.error
    }

    fn connector_type(&self) -> &'static str {
        "query-service"
    }
}

/// Line reader over a streaming response body
fn body_reader(response: Response) -> BodyReader {
    let stream = response
        .bytes_stream()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
    Box::new(StreamReader::new(Box::pin(stream)))
}

fn require_names(scope: &str, relation: &str) -> Result<(), AsterbenchError> {
    if scope.is_empty() || relation.is_empty() {
        return Err(AsterbenchError::Validation(
            "Scope and relation names cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Find the service-reported `"msg"` in an error body.
///
/// Well-formed bodies are searched as JSON; otherwise the first line carrying
/// a `"msg":` member is used.
fn extract_service_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = find_message(&value) {
            return Some(message);
        }
    }

    body.lines().find_map(|line| {
        let (_, rest) = line.split_once("\"msg\":")?;
        let literal = rest.trim().trim_end_matches(',').trim_end();
        serde_json::from_str::<String>(literal).ok()
    })
}

fn find_message(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(message)) = map.get("msg") {
                return Some(message.clone());
            }
            map.values().find_map(find_message)
        }
        Value::Array(items) => items.iter().find_map(find_message),
        _ => None,
    }
}
