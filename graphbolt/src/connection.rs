// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Database connection and query submission
//!
//! A [`Connection`] owns exactly one driver session. Ownership is shared:
//! clones of the connection and every [`ResultStream`] spawned from it keep
//! the session alive, and the session closes (best-effort) when the last
//! owner goes away.

use crate::engine::{SessionHandle, SubmitMode};
use crate::error::{Error, Result};
use crate::stream::ResultStream;
use crate::value::Value;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared internals of a connection.
///
/// The mutex serializes calls into the driver session; it does not make
/// concurrent query submission from multiple threads a supported pattern,
/// and cursor sequencing remains the caller's obligation.
pub(crate) struct ConnectionCore {
    pub(crate) session: Mutex<Box<dyn SessionHandle>>,
}

impl Drop for ConnectionCore {
    fn drop(&mut self) {
        // Best-effort close: a failure here is logged, never propagated.
        if let Err(e) = self.session.lock().close() {
            log::warn!("Failed to close connection session: {}", e);
        }
    }
}

/// An open session to the database
#[derive(Clone)]
pub struct Connection {
    core: Arc<ConnectionCore>,
}

impl Connection {
    pub(crate) fn new(session: Box<dyn SessionHandle>) -> Self {
        Self {
            core: Arc::new(ConnectionCore {
                session: Mutex::new(session),
            }),
        }
    }

    pub(crate) fn from_core(core: Arc<ConnectionCore>) -> Self {
        Self { core }
    }

    /// Hostname the session is connected to
    pub fn hostname(&self) -> String {
        self.core.session.lock().hostname()
    }

    /// Port the session is connected to
    pub fn port(&self) -> u16 {
        self.core.session.lock().port()
    }

    /// Username the session authenticated as, if any
    pub fn username(&self) -> Option<String> {
        self.core.session.lock().username()
    }

    /// Whether the channel is encrypted
    pub fn is_secure(&self) -> bool {
        self.core.session.lock().is_secure()
    }

    /// Whether the server flagged the credentials as expired
    pub fn credentials_expired(&self) -> bool {
        self.core.session.lock().credentials_expired()
    }

    /// Server-reported identifier, if any
    pub fn server_id(&self) -> Option<String> {
        self.core.session.lock().server_id()
    }

    /// Discard any in-flight or queued query state on this connection
    pub fn reset(&self) -> Result<()> {
        self.core
            .session
            .lock()
            .reset()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    /// Queue a query for pipelined execution without blocking for results
    pub fn send(&self, query: &str) -> Result<ResultStream> {
        self.send_with(query, Value::null())
    }

    /// Queue a query with bound parameters
    pub fn send_with(&self, query: &str, params: Value) -> Result<ResultStream> {
        ResultStream::submit(self.core.clone(), query, params, SubmitMode::Queued)
    }

    /// Execute a query and begin streaming results immediately
    pub fn run(&self, query: &str) -> Result<ResultStream> {
        self.run_with(query, Value::null())
    }

    /// Execute a query with bound parameters
    pub fn run_with(&self, query: &str, params: Value) -> Result<ResultStream> {
        ResultStream::submit(self.core.clone(), query, params, SubmitMode::Immediate)
    }
}
