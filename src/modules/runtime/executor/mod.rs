//! Operation execution module
//!
//! Translates the five benchmark operations into SQL++ against a discovered
//! schema, applies the batching and upsert policy, and decodes returned
//! records.

mod builder;
mod codec;

pub use builder::StatementBuilder;
pub use codec::decode_record;

use asterbench_core::{AsterbenchError, ClientConfig, TableSchema};
use asterbench_types::{FieldValues, Operation, Status};
use tracing::{debug, info, warn};

use crate::connectors::{FeedWriter, QueryConnector, QueryServiceConnector};

/// Result of an insert or update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The write reached the service
    Committed,
    /// The write is buffered until its batch fills up
    Batched,
}

impl Outcome {
    /// Collapse a write result into the tri-state status
    pub fn status_of(result: &Result<Outcome, AsterbenchError>) -> Status {
        match result {
            Ok(outcome) => Status::from(*outcome),
            Err(_) => Status::Error,
        }
    }
}

impl From<Outcome> for Status {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Committed => Status::Ok,
            Outcome::Batched => Status::BatchedOk,
        }
    }
}

/// Per-client session: one connector, the cached schema and the batch buffers
pub struct OperationExecutor<C: QueryConnector = QueryServiceConnector> {
    config: ClientConfig,
    connector: C,
    schema: TableSchema,
    builder: StatementBuilder,
    insert_batch: Vec<String>,
    update_batch: Vec<String>,
    feed: Option<FeedWriter>,
}

impl OperationExecutor<QueryServiceConnector> {
    /// Connect to the configured service and discover the schema
    pub async fn connect(config: ClientConfig) -> Result<Self, AsterbenchError> {
        let connector = QueryServiceConnector::new(&config.url)?;
        Self::initialize(config, connector).await
    }
}

impl<C: QueryConnector> OperationExecutor<C> {
    /// Discover the relation's schema through `connector` and open the feed
    /// if one is configured
    pub async fn initialize(config: ClientConfig, mut connector: C) -> Result<Self, AsterbenchError> {
        let primary_key = connector
            .primary_key(&config.scope, &config.relation)
            .await?;
        let fields = connector.fields(&config.scope, &config.relation).await?;
        let schema = TableSchema::new(primary_key, &fields);

        info!(
            scope = %config.scope,
            relation = %config.relation,
            primary_key = %schema.primary_key,
            fields = schema.fields.len(),
            "Discovered schema"
        );

        let feed = match &config.feed {
            Some(feed) => Some(FeedWriter::connect(feed.clone()).await?),
            None => None,
        };

        let builder = StatementBuilder::new(&config.scope, &config.relation, &schema.primary_key);

        Ok(Self {
            config,
            connector,
            schema,
            builder,
            insert_batch: Vec::new(),
            update_batch: Vec::new(),
            feed,
        })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Number of inserts waiting for their batch to fill
    pub fn pending_inserts(&self) -> usize {
        self.insert_batch.len()
    }

    /// Number of updates waiting for their batch to fill
    pub fn pending_updates(&self) -> usize {
        self.update_batch.len()
    }

    /// Read one record; `None` requests every field
    pub async fn read(
        &mut self,
        key: &str,
        fields: Option<&[String]>,
    ) -> Result<FieldValues, AsterbenchError> {
        let fields = self.requested_fields(fields)?;
        let statement = self.builder.read(key, &fields);

        let records = self.fetch_records(Operation::Read, &statement, &fields).await?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| AsterbenchError::NotFound(key.to_string()))
    }

    /// Read up to `count` records in key order starting at `start_key`
    pub async fn scan(
        &mut self,
        start_key: &str,
        count: usize,
        fields: Option<&[String]>,
    ) -> Result<Vec<FieldValues>, AsterbenchError> {
        let fields = self.requested_fields(fields)?;
        let statement = self.builder.scan(start_key, count, &fields);

        let mut records = self.fetch_records(Operation::Scan, &statement, &fields).await?;
        records.truncate(count);
        Ok(records)
    }

    pub async fn delete(&mut self, key: &str) -> Result<(), AsterbenchError> {
        let statement = self.builder.delete(key);
        self.execute(Operation::Delete, &statement).await
    }

    /// Insert one record, through the feed when one is configured
    pub async fn insert(
        &mut self,
        key: &str,
        values: &FieldValues,
    ) -> Result<Outcome, AsterbenchError> {
        let literal = self.builder.record_literal(key, &self.schema.fields, values);

        if self.feed.is_some() {
            self.log_statement(Operation::Insert, &literal);
            self.write_feed(&literal).await?;
            return Ok(Outcome::Committed);
        }

        if !self.config.batches_inserts() {
            let statement = self
                .builder
                .insert(self.config.insert_keyword(), &[literal]);
            self.execute(Operation::Insert, &statement).await?;
            return Ok(Outcome::Committed);
        }

        self.insert_batch.push(literal);
        if self.insert_batch.len() as u64 >= self.config.batch_inserts {
            self.flush_inserts().await?;
            return Ok(Outcome::Committed);
        }
        Ok(Outcome::Batched)
    }

    /// Replace some fields of one record.
    ///
    /// Runs as an upsert of the stored record re-projected with the new
    /// values, so fields missing from `values` keep their stored contents.
    pub async fn update(
        &mut self,
        key: &str,
        values: &FieldValues,
    ) -> Result<Outcome, AsterbenchError> {
        let projection = self
            .builder
            .update_projection(key, &self.schema.fields, values);

        if !self.config.batches_updates() {
            let statement = self.builder.upsert_projections(&[projection]);
            self.execute(Operation::Update, &statement).await?;
            return Ok(Outcome::Committed);
        }

        self.update_batch.push(projection);
        if self.update_batch.len() as u64 >= self.config.batch_updates {
            self.flush_updates().await?;
            return Ok(Outcome::Committed);
        }
        Ok(Outcome::Batched)
    }

    /// Commit partially filled batches
    pub async fn flush(&mut self) -> Result<(), AsterbenchError> {
        let inserts = self.flush_inserts().await;
        let updates = self.flush_updates().await;
        inserts.and(updates)
    }

    /// Flush the batches and close the feed
    pub async fn shutdown(mut self) -> Result<(), AsterbenchError> {
        let flushed = self.flush().await;
        let closed = match self.feed.take() {
            Some(feed) => feed.close().await,
            None => Ok(()),
        };
        self.connector.close_current_response();
        debug!(relation = %self.config.relation, "Executor shut down");
        flushed.and(closed)
    }

    async fn flush_inserts(&mut self) -> Result<(), AsterbenchError> {
        if self.insert_batch.is_empty() {
            return Ok(());
        }
        let literals = std::mem::take(&mut self.insert_batch);
        let statement = self
            .builder
            .insert(self.config.insert_keyword(), &literals);
        self.execute(Operation::Insert, &statement).await
    }

    async fn flush_updates(&mut self) -> Result<(), AsterbenchError> {
        if self.update_batch.is_empty() {
            return Ok(());
        }
        let projections = std::mem::take(&mut self.update_batch);
        let statement = self.builder.upsert_projections(&projections);
        self.execute(Operation::Update, &statement).await
    }

    async fn write_feed(&mut self, literal: &str) -> Result<(), AsterbenchError> {
        let feed = match self.feed.as_mut() {
            Some(feed) => feed,
            None => return Err(AsterbenchError::Feed("Feed is not configured".to_string())),
        };

        if let Err(e) = feed.write_record(literal).await {
            warn!("Feed write failed, reconnecting: {}", e);
            // the next insert may succeed over the new connection
            let _ = feed.reconnect().await;
            return Err(e);
        }
        Ok(())
    }

    async fn execute(&mut self, operation: Operation, statement: &str) -> Result<(), AsterbenchError> {
        self.log_statement(operation, statement);
        self.connector.execute_for_effect(statement).await
    }

    async fn fetch_records(
        &mut self,
        operation: Operation,
        statement: &str,
        fields: &[String],
    ) -> Result<Vec<FieldValues>, AsterbenchError> {
        self.log_statement(operation, statement);
        self.connector.execute_for_results(statement).await?;

        // a bad record fails the operation only after the stream is drained
        let mut records = Vec::new();
        let mut failure = None;
        while let Some(line) = self.connector.next_result().await? {
            if failure.is_some() {
                continue;
            }
            match decode_record(&line, fields) {
                Ok(values) => records.push(values),
                Err(e) => failure = Some(e),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(records),
        }
    }

    /// Resolve and check a requested field list against the schema
    fn requested_fields(&self, fields: Option<&[String]>) -> Result<Vec<String>, AsterbenchError> {
        let fields = match fields {
            None => return Ok(self.schema.fields.clone()),
            Some(fields) => fields,
        };

        if let Some(unknown) = fields.iter().find(|f| !self.schema.has_field(f)) {
            return Err(AsterbenchError::Decode(format!(
                "Unknown field '{}' in {}",
                unknown, self.config.relation
            )));
        }
        Ok(fields.to_vec())
    }

    fn log_statement(&self, operation: Operation, statement: &str) {
        if self.config.print_statements {
            info!(target: "asterbench::statement", operation = %operation, "{}", statement);
        }
    }
}
