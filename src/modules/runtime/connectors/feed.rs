//! Socket feed writer
//!
//! An alternate ingestion path: record literals are streamed, one per line,
//! to a feed adapter listening on a plain TCP socket.

use asterbench_core::{AsterbenchError, FeedConfig};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{info, warn};

/// Persistent connection to a socket feed
pub struct FeedWriter {
    config: FeedConfig,
    writer: Option<BufWriter<TcpStream>>,
}

impl FeedWriter {
    /// Open the feed connection
    pub async fn connect(config: FeedConfig) -> Result<Self, AsterbenchError> {
        let writer = Self::open(&config).await?;
        info!(address = %config.address(), "Connected to feed");
        Ok(Self {
            config,
            writer: Some(writer),
        })
    }

    async fn open(config: &FeedConfig) -> Result<BufWriter<TcpStream>, AsterbenchError> {
        let stream = TcpStream::connect(config.address()).await.map_err(|e| {
            AsterbenchError::Feed(format!("Failed to connect to {}: {}", config.address(), e))
        })?;
        Ok(BufWriter::new(stream))
    }

    /// Write one record and flush it to the socket
    pub async fn write_record(&mut self, record: &str) -> Result<(), AsterbenchError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AsterbenchError::Feed("Feed connection is closed".to_string()))?;

        let written = async {
            writer.write_all(record.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;

        written.map_err(|e| {
            AsterbenchError::Feed(format!("Failed to write to {}: {}", self.config.address(), e))
        })
    }

    /// Replace the connection with a fresh one
    pub async fn reconnect(&mut self) -> Result<(), AsterbenchError> {
        self.writer = None;
        match Self::open(&self.config).await {
            Ok(writer) => {
                self.writer = Some(writer);
                info!(address = %self.config.address(), "Reconnected to feed");
                Ok(())
            }
            Err(e) => {
                warn!("Feed reconnect failed: {}", e);
                Err(e)
            }
        }
    }

    /// Flush and close the connection
    pub async fn close(mut self) -> Result<(), AsterbenchError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            writer.shutdown().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, FeedConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, FeedConfig::new("127.0.0.1", port))
    }

    #[tokio::test]
    async fn test_records_are_newline_terminated() {
        let (listener, config) = listener().await;
        let accept = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut lines = BufReader::new(socket).lines();
            let mut received = Vec::new();
            while let Some(line) = lines.next_line().await.unwrap() {
                received.push(line);
            }
            received
        });

        let mut feed = FeedWriter::connect(config).await.unwrap();
        feed.write_record("{\"id\":\"user1\"}").await.unwrap();
        feed.write_record("{\"id\":\"user2\"}").await.unwrap();
        feed.close().await.unwrap();

        let received = accept.await.unwrap();
        assert_eq!(received, vec!["{\"id\":\"user1\"}", "{\"id\":\"user2\"}"]);
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let (listener, config) = listener().await;
        drop(listener);

        let err = FeedWriter::connect(config).await.err().unwrap();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("127.0.0.1"));
    }

    #[tokio::test]
    async fn test_reconnect() {
        let (listener, config) = listener().await;
        let accept = tokio::spawn(async move {
            let first = listener.accept().await.unwrap();
            let second = listener.accept().await.unwrap();
            (first, second)
        });

        let mut feed = FeedWriter::connect(config).await.unwrap();
        feed.reconnect().await.unwrap();
        feed.write_record("{}").await.unwrap();
        let _sockets = accept.await.unwrap();
    }
}
