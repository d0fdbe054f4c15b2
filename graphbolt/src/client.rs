// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Client entry point
//!
//! A [`Client`] binds a driver engine implementation and opens connections
//! through it. Engines are injected rather than discovered: tests use the
//! in-memory [`crate::engine::mock::MockEngine`], production code wires in a
//! real driver.

use crate::config::{Config, ConnectOptions};
use crate::connection::Connection;
use crate::engine::Engine;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Entry point for opening connections through a driver engine
#[derive(Clone)]
pub struct Client {
    engine: Arc<dyn Engine>,
}

impl Client {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Library version
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Client identifier reported to servers when none is configured
    pub fn default_client_id() -> String {
        format!("{}/{}", env!("CARGO_PKG_NAME"), Self::version())
    }

    /// Open a connection from a URI
    pub fn connect(&self, uri: &str, options: ConnectOptions) -> Result<Connection> {
        self.connect_with_config(uri, Config::default(), options)
    }

    /// Open a connection from a URI with an explicit configuration bundle
    pub fn connect_with_config(
        &self,
        uri: &str,
        config: Config,
        options: ConnectOptions,
    ) -> Result<Connection> {
        let session = self
            .engine
            .connect(uri, &config, &options)
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Connection::new(session))
    }

    /// Open a connection from an explicit host and port
    pub fn open(
        &self,
        hostname: &str,
        port: u16,
        config: Config,
        insecure: bool,
    ) -> Result<Connection> {
        let session = self
            .engine
            .connect_tcp(hostname, port, &config, insecure)
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Connection::new(session))
    }
}
