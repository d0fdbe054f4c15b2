// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Streaming cursor over one query execution
//!
//! Rows are pulled lazily from the driver, one record at a time. A stream
//! moves `Active → {Exhausted, Failed} → Closed`; server-reported query
//! failures are inspectable state (`check_failure`, `failure_details`) and
//! never abort iteration, while transport failures surface as errors from
//! the fetching call itself.

use crate::connection::{Connection, ConnectionCore};
use crate::engine::{
    FailureDetails, StreamHandle, SubmitMode, STATEMENT_CONTROL, STATEMENT_READ_ONLY,
    STATEMENT_READ_WRITE, STATEMENT_SCHEMA_UPDATE, STATEMENT_WRITE_ONLY,
};
use crate::error::{Error, Result};
use crate::row::Row;
use crate::value::Value;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle state of a result stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamState {
    /// Rows may still be fetched
    Active,
    /// The stream drained normally; further fetches return no rows
    Exhausted,
    /// A server-side query failure or a transport failure stopped the stream
    Failed,
    /// Resources have been released
    Closed,
}

/// Classification of the submitted statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    ReadOnly,
    WriteOnly,
    ReadWrite,
    SchemaUpdate,
    Control,
}

impl StatementType {
    fn from_code(code: i32) -> Option<Self> {
        match code {
            STATEMENT_READ_ONLY => Some(StatementType::ReadOnly),
            STATEMENT_WRITE_ONLY => Some(StatementType::WriteOnly),
            STATEMENT_READ_WRITE => Some(StatementType::ReadWrite),
            STATEMENT_SCHEMA_UPDATE => Some(StatementType::SchemaUpdate),
            STATEMENT_CONTROL => Some(StatementType::Control),
            _ => None,
        }
    }
}

/// Cursor over the rows produced by one query execution.
///
/// `fetch_next` and `peek` must be called sequentially by a single logical
/// owner; the stream is not an internally synchronized shared resource.
pub struct ResultStream {
    /// Shared ownership keeps the session alive for the stream's duration
    connection: Arc<ConnectionCore>,
    handle: Box<dyn StreamHandle>,
    query: String,
    state: StreamState,
    /// Column names, captured once the stream starts producing rows
    fields: OnceCell<Arc<[String]>>,
}

impl ResultStream {
    pub(crate) fn submit(
        connection: Arc<ConnectionCore>,
        query: &str,
        params: Value,
        mode: SubmitMode,
    ) -> Result<Self> {
        let handle = connection
            .session
            .lock()
            .submit(query, params.as_wire(), mode)
            .map_err(|e| Error::Submit(e.to_string()))?;
        Ok(Self {
            connection,
            handle,
            query: query.to_string(),
            state: StreamState::Active,
            fields: OnceCell::new(),
        })
    }

    /// The connection this stream is executing on
    pub fn connection(&self) -> Connection {
        Connection::from_core(self.connection.clone())
    }

    /// The submitted query text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current lifecycle state
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Advance the stream by one row.
    ///
    /// Returns `Ok(None)` once the stream is exhausted, and keeps doing so
    /// on subsequent calls. A transport failure is an error and leaves the
    /// stream unusable; a server-side query failure is not an error, it
    /// surfaces through [`ResultStream::check_failure`] while fetches yield
    /// no rows.
    pub fn fetch_next(&mut self) -> Result<Option<Row>> {
        if !matches!(self.state, StreamState::Active) {
            return Ok(None);
        }
        match self.handle.fetch() {
            Ok(Some(record)) => {
                let fields = self.field_names();
                Ok(Some(Row::new(record, fields)))
            }
            Ok(None) => {
                self.state = if self.handle.failure().is_some() {
                    StreamState::Failed
                } else {
                    StreamState::Exhausted
                };
                Ok(None)
            }
            Err(e) => {
                self.state = StreamState::Failed;
                Err(Error::Transport(e.to_string()))
            }
        }
    }

    /// Look at the row `depth` positions ahead (1 = next) without consuming
    /// it: a subsequent [`ResultStream::fetch_next`] still returns that row.
    ///
    /// Depth is 1-based; depth 0 is rejected. Peeking past the end of the
    /// stream returns `Ok(None)` and consumes nothing.
    pub fn peek(&mut self, depth: usize) -> Result<Option<Row>> {
        if depth == 0 {
            return Err(Error::IndexOutOfRange { index: 0, size: 0 });
        }
        if !matches!(self.state, StreamState::Active) {
            return Ok(None);
        }
        match self.handle.peek(depth) {
            Ok(Some(record)) => {
                let fields = self.field_names();
                Ok(Some(Row::new(record, fields)))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.state = StreamState::Failed;
                Err(Error::Transport(e.to_string()))
            }
        }
    }

    /// Whether the server reported a query-level failure. Non-blocking and
    /// orthogonal to transport failures.
    pub fn check_failure(&self) -> bool {
        self.handle.failure().is_some()
    }

    /// Structured details of the server-reported failure
    pub fn failure_details(&self) -> Result<FailureDetails> {
        self.handle.failure().ok_or(Error::NoFailure)
    }

    /// Server error code of the reported failure, or empty when none
    pub fn error_code(&self) -> String {
        self.handle
            .failure()
            .map(|details| details.code)
            .unwrap_or_default()
    }

    /// Server error message of the reported failure, or empty when none
    pub fn error_message(&self) -> String {
        self.handle
            .failure()
            .map(|details| details.message)
            .unwrap_or_default()
    }

    /// Number of result columns
    pub fn nfields(&self) -> usize {
        self.handle.field_count()
    }

    /// Name of result column `index`
    pub fn fieldname(&self, index: usize) -> Result<String> {
        self.handle
            .field_name(index)
            .ok_or_else(|| Error::IndexOutOfRange {
                index,
                size: self.handle.field_count(),
            })
    }

    /// Classification of the submitted statement
    pub fn statement_type(&self) -> Result<StatementType> {
        let code = self
            .handle
            .statement_kind()
            .map_err(|e| Error::Protocol(e.to_string()))?;
        StatementType::from_code(code).ok_or_else(|| {
            Error::Protocol(format!("Unknown statement classification code: {}", code))
        })
    }

    /// Release the stream, telling the driver to discard any buffered rows.
    /// Dropping the stream does the same best-effort.
    pub fn close(mut self) -> Result<()> {
        self.state = StreamState::Closed;
        self.handle
            .close()
            .map_err(|e| Error::Transport(e.to_string()))
    }

    fn field_names(&self) -> Arc<[String]> {
        self.fields
            .get_or_init(|| {
                (0..self.handle.field_count())
                    .map(|i| self.handle.field_name(i).unwrap_or_default())
                    .collect()
            })
            .clone()
    }
}

impl Drop for ResultStream {
    fn drop(&mut self) {
        if self.state == StreamState::Closed {
            return;
        }
        if let Err(e) = self.handle.close() {
            log::warn!("Failed to discard result stream for {:?}: {}", self.query, e);
        }
    }
}
