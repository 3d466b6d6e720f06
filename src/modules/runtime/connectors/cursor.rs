//! Incremental reader over the query service's result stream
//!
//! The service renders its response one JSON member per line, with the
//! `"results"` array spread over consecutive lines:
//!
//! ```text
//! {
//!     "requestID": "...",
//!     "results": [ {"id":"user1","field0":"0102"}
//! , {"id":"user2","field0":"0304"}
//!  ],
//!     "status": "success"
//! }
//! ```
//!
//! [`ResultCursor`] peels one array element per call off such a stream
//! without buffering the rest of the body.

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

const RESULTS_MEMBER: &str = "\"results\":";

/// Position of the cursor within the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Skipping preamble lines until the results array opens
    BeforeResults,
    /// Each line is one record until the closing `]`
    InsideResults,
}

/// Two-state line parser extracting one result record at a time
pub struct ResultCursor<R> {
    lines: Lines<R>,
    state: CursorState,
}

impl<R: AsyncBufRead + Unpin> ResultCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            state: CursorState::BeforeResults,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` once the results array closes or the stream ends;
    /// the state is back at [`CursorState::BeforeResults`] afterwards.
    pub async fn next_record(&mut self) -> io::Result<Option<String>> {
        while let Some(raw) = self.lines.next_line().await? {
            let line = raw.trim();

            let candidate = match self.state {
                CursorState::BeforeResults => match open_results(line) {
                    Some(rest) => {
                        self.state = CursorState::InsideResults;
                        rest
                    }
                    None => continue,
                },
                CursorState::InsideResults => line,
            };

            match strip_separators(candidate) {
                "" => continue,
                "]" => {
                    self.state = CursorState::BeforeResults;
                    return Ok(None);
                }
                record => return Ok(Some(record.to_string())),
            }
        }

        self.state = CursorState::BeforeResults;
        Ok(None)
    }
}

/// Remainder of the line that opens the results array, if it is that line
fn open_results(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(RESULTS_MEMBER)?.trim_start();
    Some(rest.strip_prefix('[').unwrap_or(rest))
}

/// Drop one leading and one trailing element separator
fn strip_separators(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix(',').unwrap_or(line);
    let line = line.strip_suffix(',').unwrap_or(line);
    line.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(body: &'static str) -> ResultCursor<&'static [u8]> {
        ResultCursor::new(body.as_bytes())
    }

    #[tokio::test]
    async fn test_two_records() {
        let mut c = cursor(
            "{\n\t\"requestID\": \"5a\",\n\t\"results\": [ {\"a\":1}\n, {\"a\":2}\n ],\n\t\"status\": \"success\"\n}\n",
        );
        assert_eq!(c.state(), CursorState::BeforeResults);

        assert_eq!(c.next_record().await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(c.state(), CursorState::InsideResults);
        assert_eq!(c.next_record().await.unwrap().as_deref(), Some("{\"a\":2}"));
        assert_eq!(c.next_record().await.unwrap(), None);
        assert_eq!(c.state(), CursorState::BeforeResults);
    }

    #[tokio::test]
    async fn test_empty_results() {
        let mut c = cursor("{\n\"results\": [ ],\n\"status\": \"success\"\n}\n");
        assert_eq!(c.next_record().await.unwrap(), None);

        let mut c = cursor("{\n\"results\": []\n}\n");
        assert_eq!(c.next_record().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_trailing_comma_strips_one_character() {
        let mut c = cursor("\"results\": [ {\"a\":\"x\"},\n{\"a\":\"y\"},\n]\n");
        assert_eq!(c.next_record().await.unwrap().as_deref(), Some("{\"a\":\"x\"}"));
        assert_eq!(c.next_record().await.unwrap().as_deref(), Some("{\"a\":\"y\"}"));
        assert_eq!(c.next_record().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_array_records_and_crlf() {
        let mut c = cursor("{\r\n\"results\": [ [ [ \"id\" ] ]\r\n ]\r\n}\r\n");
        assert_eq!(c.next_record().await.unwrap().as_deref(), Some("[ [ \"id\" ] ]"));
        assert_eq!(c.next_record().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_lines_inside_results_are_skipped() {
        let mut c = cursor("\"results\": [ {\"a\":1}\n\n, {\"a\":2}\n]\n");
        assert_eq!(c.next_record().await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(c.next_record().await.unwrap().as_deref(), Some("{\"a\":2}"));
        assert_eq!(c.next_record().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stream_without_results() {
        let mut c = cursor("{\n\"status\": \"success\"\n}\n");
        assert_eq!(c.next_record().await.unwrap(), None);
        assert_eq!(c.state(), CursorState::BeforeResults);
    }

    #[tokio::test]
    async fn test_truncated_stream_ends_results() {
        let mut c = cursor("\"results\": [ {\"a\":1}\n");
        assert_eq!(c.next_record().await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(c.next_record().await.unwrap(), None);
    }
}
