// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Scriptable in-memory engine
//!
//! Drives the client layer without a live server: outcomes are scripted per
//! query text. Used throughout the test suite and usable by downstream
//! crates for their own tests.

use super::wire::WireValue;
use super::{
    Engine, EngineError, FailureDetails, SessionHandle, StreamHandle, SubmitMode,
    STATEMENT_READ_ONLY,
};
use crate::config::{Config, ConnectOptions};
use crate::record::RecordHandle;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Scripted outcome for one query
#[derive(Clone)]
pub enum Script {
    /// Stream the given rows
    Rows(ScriptedRows),
    /// Report a server-side query failure; fetches yield no rows
    Failure(FailureDetails),
    /// Reject the submission outright
    RejectSubmit(String),
}

/// A scripted result set
#[derive(Clone)]
pub struct ScriptedRows {
    fields: Vec<String>,
    rows: Vec<Vec<WireValue>>,
    statement_kind: i32,
    fault_after: Option<usize>,
}

impl ScriptedRows {
    pub fn new<S: Into<String>>(fields: Vec<S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            statement_kind: STATEMENT_READ_ONLY,
            fault_after: None,
        }
    }

    pub fn row(mut self, values: Vec<WireValue>) -> Self {
        self.rows.push(values);
        self
    }

    pub fn statement_kind(mut self, code: i32) -> Self {
        self.statement_kind = code;
        self
    }

    /// Inject a transport fault once this many rows have been produced
    pub fn fault_after(mut self, rows: usize) -> Self {
        self.fault_after = Some(rows);
        self
    }
}

/// Read-only snapshot the mock reports for its session
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub hostname: String,
    pub port: u16,
    pub username: Option<String>,
    pub secure: bool,
    pub credentials_expired: bool,
    pub server_id: Option<String>,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 7687,
            username: None,
            secure: true,
            credentials_expired: false,
            server_id: Some("Mock/1.0".to_string()),
        }
    }
}

/// Counters observable from tests
#[derive(Debug, Default)]
pub struct MockStats {
    submits: AtomicUsize,
    resets: AtomicUsize,
    session_closes: AtomicUsize,
    stream_closes: AtomicUsize,
}

impl MockStats {
    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::Relaxed)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::Relaxed)
    }

    pub fn session_closes(&self) -> usize {
        self.session_closes.load(Ordering::Relaxed)
    }

    pub fn stream_closes(&self) -> usize {
        self.stream_closes.load(Ordering::Relaxed)
    }
}

/// One recorded submission
#[derive(Clone)]
pub struct Submission {
    pub query: String,
    pub params: WireValue,
    pub mode: SubmitMode,
}

struct MockShared {
    scripts: Mutex<HashMap<String, Script>>,
    submissions: Mutex<Vec<Submission>>,
    stats: MockStats,
    refuse: Mutex<Option<String>>,
    server: ServerInfo,
}

/// In-memory engine with per-query scripted outcomes
pub struct MockEngine {
    shared: Arc<MockShared>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::with_server(ServerInfo::default())
    }

    pub fn with_server(server: ServerInfo) -> Self {
        Self {
            shared: Arc::new(MockShared {
                scripts: Mutex::new(HashMap::new()),
                submissions: Mutex::new(Vec::new()),
                stats: MockStats::default(),
                refuse: Mutex::new(None),
                server,
            }),
        }
    }

    /// Script the outcome of `query`; an unscripted query streams an empty
    /// result set
    pub fn script(self, query: impl Into<String>, script: Script) -> Self {
        self.shared.scripts.lock().insert(query.into(), script);
        self
    }

    /// Make every subsequent connect attempt fail with `message`
    pub fn refuse_connections(self, message: impl Into<String>) -> Self {
        *self.shared.refuse.lock() = Some(message.into());
        self
    }

    pub fn stats(&self) -> &MockStats {
        &self.shared.stats
    }

    /// Every submission recorded so far, in order
    pub fn submissions(&self) -> Vec<Submission> {
        self.shared.submissions.lock().clone()
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for MockEngine {
    fn connect(
        &self,
        _uri: &str,
        config: &Config,
        options: &ConnectOptions,
    ) -> Result<Box<dyn SessionHandle>, EngineError> {
        if let Some(message) = self.shared.refuse.lock().clone() {
            return Err(EngineError::new(message));
        }
        let mut info = self.shared.server.clone();
        if let Some(username) = config.username() {
            info.username = Some(username.to_string());
        }
        info.secure = info.secure && !options.insecure;
        Ok(Box::new(MockSession {
            shared: self.shared.clone(),
            info,
        }))
    }

    fn connect_tcp(
        &self,
        hostname: &str,
        port: u16,
        config: &Config,
        insecure: bool,
    ) -> Result<Box<dyn SessionHandle>, EngineError> {
        if let Some(message) = self.shared.refuse.lock().clone() {
            return Err(EngineError::new(message));
        }
        let mut info = self.shared.server.clone();
        info.hostname = hostname.to_string();
        info.port = port;
        if let Some(username) = config.username() {
            info.username = Some(username.to_string());
        }
        info.secure = info.secure && !insecure;
        Ok(Box::new(MockSession {
            shared: self.shared.clone(),
            info,
        }))
    }
}

struct MockSession {
    shared: Arc<MockShared>,
    info: ServerInfo,
}

impl SessionHandle for MockSession {
    fn submit(
        &mut self,
        query: &str,
        params: WireValue,
        mode: SubmitMode,
    ) -> Result<Box<dyn StreamHandle>, EngineError> {
        self.shared.stats.submits.fetch_add(1, Ordering::Relaxed);
        self.shared.submissions.lock().push(Submission {
            query: query.to_string(),
            params,
            mode,
        });
        let script = self.shared.scripts.lock().get(query).cloned();
        match script {
            Some(Script::RejectSubmit(message)) => Err(EngineError::new(message)),
            Some(Script::Failure(details)) => Ok(Box::new(MockStream::failed(
                self.shared.clone(),
                details,
            ))),
            Some(Script::Rows(rows)) => Ok(Box::new(MockStream::rows(self.shared.clone(), rows))),
            None => Ok(Box::new(MockStream::rows(
                self.shared.clone(),
                ScriptedRows::new(Vec::<String>::new()),
            ))),
        }
    }

    fn reset(&mut self) -> Result<(), EngineError> {
        self.shared.stats.resets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn close(&mut self) -> Result<(), EngineError> {
        self.shared
            .stats
            .session_closes
            .fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn hostname(&self) -> String {
        self.info.hostname.clone()
    }

    fn port(&self) -> u16 {
        self.info.port
    }

    fn username(&self) -> Option<String> {
        self.info.username.clone()
    }

    fn is_secure(&self) -> bool {
        self.info.secure
    }

    fn credentials_expired(&self) -> bool {
        self.info.credentials_expired
    }

    fn server_id(&self) -> Option<String> {
        self.info.server_id.clone()
    }
}

struct MockStream {
    shared: Arc<MockShared>,
    fields: Vec<String>,
    rows: VecDeque<RecordHandle>,
    produced: usize,
    fault_after: Option<usize>,
    failure: Option<FailureDetails>,
    statement_kind: i32,
}

impl MockStream {
    fn rows(shared: Arc<MockShared>, script: ScriptedRows) -> Self {
        let rows = script.rows.into_iter().map(RecordHandle::new).collect();
        Self {
            shared,
            fields: script.fields,
            rows,
            produced: 0,
            fault_after: script.fault_after,
            failure: None,
            statement_kind: script.statement_kind,
        }
    }

    fn failed(shared: Arc<MockShared>, details: FailureDetails) -> Self {
        Self {
            shared,
            fields: Vec::new(),
            rows: VecDeque::new(),
            produced: 0,
            fault_after: None,
            failure: Some(details),
            statement_kind: STATEMENT_READ_ONLY,
        }
    }

    fn faulted(&self) -> bool {
        self.fault_after
            .map_or(false, |threshold| self.produced >= threshold)
    }
}

impl StreamHandle for MockStream {
    fn fetch(&mut self) -> Result<Option<RecordHandle>, EngineError> {
        if self.faulted() {
            return Err(EngineError::new("connection reset by peer"));
        }
        if self.failure.is_some() {
            return Ok(None);
        }
        match self.rows.pop_front() {
            Some(record) => {
                self.produced += 1;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn peek(&mut self, depth: usize) -> Result<Option<RecordHandle>, EngineError> {
        if self.faulted() {
            return Err(EngineError::new("connection reset by peer"));
        }
        if self.failure.is_some() {
            return Ok(None);
        }
        Ok(self.rows.get(depth.saturating_sub(1)).cloned())
    }

    fn failure(&self) -> Option<FailureDetails> {
        self.failure.clone()
    }

    fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn field_name(&self, index: usize) -> Option<String> {
        self.fields.get(index).cloned()
    }

    fn statement_kind(&self) -> Result<i32, EngineError> {
        Ok(self.statement_kind)
    }

    fn close(&mut self) -> Result<(), EngineError> {
        self.shared
            .stats
            .stream_closes
            .fetch_add(1, Ordering::Relaxed);
        self.rows.clear();
        Ok(())
    }
}
