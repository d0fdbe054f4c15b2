// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver engine boundary
//!
//! The engine is the external runtime that owns sockets, TLS negotiation and
//! the wire encoding of the query protocol. This crate only depends on the
//! trait surface below: a session is opened through [`Engine`], queries are
//! submitted through [`SessionHandle`], and rows are pulled through
//! [`StreamHandle`] as reference-counted [`RecordHandle`]s.
//!
//! Engine errors are opaque text; the client layer maps them into its own
//! error taxonomy at each call site.

pub mod mock;
pub mod wire;

use crate::config::{Config, ConnectOptions};
use crate::record::RecordHandle;
use self::wire::WireValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Statement classification codes reported by the engine.
///
/// Anything outside this set is treated as a protocol violation by the
/// client layer.
pub const STATEMENT_READ_ONLY: i32 = 0;
pub const STATEMENT_WRITE_ONLY: i32 = 1;
pub const STATEMENT_READ_WRITE: i32 = 2;
pub const STATEMENT_SCHEMA_UPDATE: i32 = 3;
pub const STATEMENT_CONTROL: i32 = 4;

/// Opaque error reported by the driver engine
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// How a query is handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitMode {
    /// Queue for pipelined execution; do not block for the first result
    Queued,
    /// Execute and begin streaming immediately
    Immediate,
}

/// Structured description of a server-reported query failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureDetails {
    /// Server error code, e.g. `Neo.ClientError.Statement.SyntaxError`
    pub code: String,
    /// Short message
    pub message: String,
    /// Long description
    pub description: String,
    /// 1-based line of the failing token
    pub line: u32,
    /// 1-based column of the failing token
    pub column: u32,
    /// Byte offset of the failing token within the statement
    pub offset: u32,
    /// Source text surrounding the failing token
    pub context: String,
    /// Offset of the failing token within `context`
    pub context_offset: u32,
}

/// Entry point of a driver engine implementation
pub trait Engine: Send + Sync {
    /// Establish a session from a connection URI
    fn connect(
        &self,
        uri: &str,
        config: &Config,
        options: &ConnectOptions,
    ) -> Result<Box<dyn SessionHandle>, EngineError>;

    /// Establish a session from an explicit host and port
    fn connect_tcp(
        &self,
        hostname: &str,
        port: u16,
        config: &Config,
        insecure: bool,
    ) -> Result<Box<dyn SessionHandle>, EngineError>;
}

/// One live session against the database
///
/// Callers serialize access externally; implementations are not required to
/// be internally synchronized.
pub trait SessionHandle: Send {
    /// Submit a query with bound parameters, producing a result stream
    fn submit(
        &mut self,
        query: &str,
        params: WireValue,
        mode: SubmitMode,
    ) -> Result<Box<dyn StreamHandle>, EngineError>;

    /// Discard any in-flight or queued query state
    fn reset(&mut self) -> Result<(), EngineError>;

    /// Release the session
    fn close(&mut self) -> Result<(), EngineError>;

    fn hostname(&self) -> String;
    fn port(&self) -> u16;
    fn username(&self) -> Option<String>;
    fn is_secure(&self) -> bool;
    fn credentials_expired(&self) -> bool;
    fn server_id(&self) -> Option<String>;
}

/// The in-flight state of one submitted query
pub trait StreamHandle: Send {
    /// Pull the next decoded record; `None` means the stream is drained
    fn fetch(&mut self) -> Result<Option<RecordHandle>, EngineError>;

    /// Look at the record `depth` positions ahead (1 = next) without
    /// consuming it; `None` when fewer than `depth` records remain
    fn peek(&mut self, depth: usize) -> Result<Option<RecordHandle>, EngineError>;

    /// Server-reported query failure, if any
    fn failure(&self) -> Option<FailureDetails>;

    /// Number of result columns
    fn field_count(&self) -> usize;

    /// Name of a result column; `None` for an invalid index
    fn field_name(&self, index: usize) -> Option<String>;

    /// Raw statement classification code (see the `STATEMENT_*` constants)
    fn statement_kind(&self) -> Result<i32, EngineError>;

    /// Discard any rows still buffered and release the stream
    fn close(&mut self) -> Result<(), EngineError>;
}
