// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphBolt - client value model and result streaming for Bolt-style graph
//! databases
//!
//! GraphBolt models heterogeneous query results (scalars, collections, and
//! graph entities) and streams them lazily from a query executing against a
//! live session. The wire protocol itself lives in a pluggable driver
//! engine; this crate owns everything above it.
//!
//! # Features
//!
//! - **Uniform value model**: one [`Value`] type covers both caller-built
//!   query parameters and zero-copy views into decoded result rows
//! - **Reference-counted records**: values derived from a row stay valid
//!   until their last owner is gone, independent of the stream
//! - **Lazy streaming**: fetch-next / bounded-lookahead-peek cursor over an
//!   in-flight query, with inspectable server-side failures
//! - **Pluggable engines**: the driver boundary is a trait surface; an
//!   in-memory scriptable engine ships for tests
//!
//! # Usage
//!
//! ```ignore
//! use graphbolt::{Client, ConnectOptions};
//!
//! let client = Client::new(engine);
//! let con = client.connect("bolt://localhost:7687", ConnectOptions::default())?;
//! let mut stream = con.run("MATCH (n:Person) RETURN n")?;
//! while let Some(row) = stream.fetch_next()? {
//!     println!("{}", row.field(0)?.dump());
//! }
//! ```

// Public modules - exposed to external users
pub mod engine;

// Internal modules - API surface re-exported below
pub(crate) mod client;
pub(crate) mod config;
pub(crate) mod connection;
pub(crate) mod error;
pub(crate) mod record;
pub(crate) mod row;
pub(crate) mod stream;
pub(crate) mod value;

// Re-export the public API
pub use client::Client;
pub use config::{Config, ConnectOptions, HostVerification};
pub use connection::Connection;
pub use engine::FailureDetails;
pub use error::{Error, Result};
pub use record::RecordHandle;
pub use row::Row;
pub use stream::{ResultStream, StatementType, StreamState};
pub use value::{Direction, Kind, Value};

/// GraphBolt version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GraphBolt crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
