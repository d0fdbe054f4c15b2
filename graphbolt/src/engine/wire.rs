// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Decoded wire values produced by the driver engine
//!
//! These are the typed nodes the engine's decoder produces from a record
//! buffer. Heavy payloads (text, bytes, containers, graph entities) sit
//! behind shared immutable buffers, so cloning a `WireValue` is a shallow
//! copy regardless of how much data it refers to.

use std::sync::Arc;

/// One decoded wire value.
///
/// The `Identity` payload is the raw 64-bit wire integer; the client layer
/// exposes it as a signed id without going through a textual form.
/// `Unknown` carries the unrecognized type marker for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Arc<str>),
    Bytes(Arc<[u8]>),
    List(Arc<[WireValue]>),
    Map(Arc<[MapEntry]>),
    Node(Arc<WireNode>),
    Relationship(Arc<WireRelationship>),
    Path(Arc<WirePath>),
    Identity(i64),
    Unknown(u8),
}

impl WireValue {
    /// Build a string value from any text-like input
    pub fn string(text: impl AsRef<str>) -> Self {
        WireValue::String(Arc::from(text.as_ref()))
    }

    /// Build a byte-array value
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        WireValue::Bytes(Arc::from(data.into()))
    }

    /// Build a list value from already-decoded entries
    pub fn list(entries: Vec<WireValue>) -> Self {
        WireValue::List(Arc::from(entries))
    }

    /// Build a map value from already-decoded entries (wire order preserved)
    pub fn map(entries: Vec<MapEntry>) -> Self {
        WireValue::Map(Arc::from(entries))
    }
}

/// One key/value pair of a wire map
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Arc<str>,
    pub value: WireValue,
}

impl MapEntry {
    pub fn new(key: impl AsRef<str>, value: WireValue) -> Self {
        Self {
            key: Arc::from(key.as_ref()),
            value,
        }
    }
}

/// A decoded graph node
#[derive(Debug, PartialEq)]
pub struct WireNode {
    pub identity: i64,
    /// Label list as sent by the server; may contain duplicates
    pub labels: Vec<Arc<str>>,
    pub properties: Vec<MapEntry>,
}

/// A decoded relationship
///
/// Endpoint identities are `None` when the server sent an unbound
/// relationship (e.g. inside a path projection that elided the endpoints).
#[derive(Debug, PartialEq)]
pub struct WireRelationship {
    pub identity: i64,
    pub start_node: Option<i64>,
    pub end_node: Option<i64>,
    pub reltype: Arc<str>,
    pub properties: Vec<MapEntry>,
}

/// A decoded path: a path of length N carries N+1 nodes and N segments
#[derive(Debug, PartialEq)]
pub struct WirePath {
    pub nodes: Vec<Arc<WireNode>>,
    pub segments: Vec<WireSegment>,
}

/// One traversal step of a path
#[derive(Debug, PartialEq)]
pub struct WireSegment {
    pub relationship: Arc<WireRelationship>,
    /// Whether the relationship is traversed start-to-end at this hop
    pub forward: bool,
}
