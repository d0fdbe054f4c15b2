// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Tagged value model for query parameters and decoded results
//!
//! A [`Value`] is either *owned* (built by client code, e.g. query
//! parameters) or a *record view* (decoded from a fetched row). Both satisfy
//! the same accessor surface. Record views never copy payloads: they share
//! ownership of the backing [`RecordHandle`], so a value stays usable for as
//! long as any clone of it is alive, regardless of what the stream does
//! afterwards.

use crate::engine::wire::{MapEntry, WireNode, WirePath, WireRelationship, WireValue};
use crate::error::{Error, Result};
use crate::record::RecordHandle;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Classification of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Bytes,
    List,
    Map,
    Node,
    Relationship,
    Path,
    Identity,
    Unknown,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Node => "node",
            Kind::Relationship => "relationship",
            Kind::Path => "path",
            Kind::Identity => "identity",
            Kind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Traversal direction of a relationship within a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

/// A query value: scalar, container, or graph entity.
///
/// Owned values are built through the constructors and `From` impls below.
/// Record views come out of [`crate::Row::field`] and the nested accessors.
#[derive(Debug, Clone)]
pub struct Value {
    raw: WireValue,
    origin: Origin,
}

/// Exactly one of the two ownership modes applies to a value.
#[derive(Debug, Clone)]
enum Origin {
    /// Client-constructed. Scalars live entirely in `raw`; containers also
    /// retain their child values so entries handed back to the caller keep
    /// whatever record handles those children carry.
    Owned(Option<OwnedChildren>),
    /// View into a decoded record, sharing ownership of the backing row.
    Record(RecordHandle),
}

#[derive(Debug, Clone)]
enum OwnedChildren {
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// The null value
    pub fn null() -> Self {
        Self::owned(WireValue::Null)
    }

    /// Build a string value, or an opaque byte sequence when `as_bytes` is
    /// set (matches the wire protocol's distinction between the two).
    pub fn string(text: impl Into<String>, as_bytes: bool) -> Self {
        let text = text.into();
        if as_bytes {
            Self::owned(WireValue::Bytes(Arc::from(text.into_bytes())))
        } else {
            Self::owned(WireValue::String(Arc::from(text)))
        }
    }

    /// Build a byte-array value, taking ownership of the buffer
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::owned(WireValue::Bytes(Arc::from(data.into())))
    }

    /// Build a list value, taking ownership of the entries.
    ///
    /// The flat wire form is realized here, once; submitting the list later
    /// does not re-traverse the tree.
    pub fn list(entries: Vec<Value>) -> Self {
        let wire: Vec<WireValue> = entries.iter().map(Value::as_wire).collect();
        Value {
            raw: WireValue::List(Arc::from(wire)),
            origin: Origin::Owned(Some(OwnedChildren::List(entries))),
        }
    }

    /// Build a map value, taking ownership of the entries.
    ///
    /// As with [`Value::list`], the wire form is realized eagerly.
    pub fn map(entries: BTreeMap<String, Value>) -> Self {
        let wire: Vec<MapEntry> = entries
            .iter()
            .map(|(key, value)| MapEntry::new(key, value.as_wire()))
            .collect();
        Value {
            raw: WireValue::Map(Arc::from(wire)),
            origin: Origin::Owned(Some(OwnedChildren::Map(entries))),
        }
    }

    fn owned(raw: WireValue) -> Self {
        Value {
            raw,
            origin: Origin::Owned(None),
        }
    }

    /// View into a decoded record. Shares ownership of the backing row.
    pub(crate) fn from_record(record: RecordHandle, raw: WireValue) -> Self {
        Value {
            raw,
            origin: Origin::Record(record),
        }
    }

    /// Derive a child view, propagating this value's origin
    fn derive(&self, raw: WireValue) -> Value {
        match &self.origin {
            Origin::Record(record) => Value::from_record(record.clone(), raw),
            Origin::Owned(_) => Value::owned(raw),
        }
    }

    /// The value's wire form, ready for submission. O(1): owned containers
    /// realized their wire form at construction time.
    pub fn as_wire(&self) -> WireValue {
        self.raw.clone()
    }

    /// The record backing this value, when it is a record view
    pub fn record(&self) -> Option<&RecordHandle> {
        match &self.origin {
            Origin::Record(record) => Some(record),
            Origin::Owned(_) => None,
        }
    }

    /// O(1) classification
    pub fn kind(&self) -> Kind {
        match &self.raw {
            WireValue::Null => Kind::Null,
            WireValue::Bool(_) => Kind::Bool,
            WireValue::Int(_) => Kind::Int,
            WireValue::Float(_) => Kind::Float,
            WireValue::String(_) => Kind::String,
            WireValue::Bytes(_) => Kind::Bytes,
            WireValue::List(_) => Kind::List,
            WireValue::Map(_) => Kind::Map,
            WireValue::Node(_) => Kind::Node,
            WireValue::Relationship(_) => Kind::Relationship,
            WireValue::Path(_) => Kind::Path,
            WireValue::Identity(_) => Kind::Identity,
            WireValue::Unknown(_) => Kind::Unknown,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    pub fn is_bool(&self) -> bool {
        self.kind() == Kind::Bool
    }

    pub fn is_int(&self) -> bool {
        self.kind() == Kind::Int
    }

    pub fn is_float(&self) -> bool {
        self.kind() == Kind::Float
    }

    pub fn is_string(&self) -> bool {
        self.kind() == Kind::String
    }

    pub fn is_bytes(&self) -> bool {
        self.kind() == Kind::Bytes
    }

    pub fn is_list(&self) -> bool {
        self.kind() == Kind::List
    }

    pub fn is_map(&self) -> bool {
        self.kind() == Kind::Map
    }

    pub fn is_node(&self) -> bool {
        self.kind() == Kind::Node
    }

    pub fn is_relationship(&self) -> bool {
        self.kind() == Kind::Relationship
    }

    pub fn is_path(&self) -> bool {
        self.kind() == Kind::Path
    }

    pub fn is_identity(&self) -> bool {
        self.kind() == Kind::Identity
    }

    fn mismatch(&self, expected: Kind) -> Error {
        Error::TypeMismatch {
            expected,
            actual: self.kind(),
        }
    }

    pub fn to_bool(&self) -> Result<bool> {
        match &self.raw {
            WireValue::Bool(b) => Ok(*b),
            _ => Err(self.mismatch(Kind::Bool)),
        }
    }

    pub fn to_int(&self) -> Result<i64> {
        match &self.raw {
            WireValue::Int(i) => Ok(*i),
            _ => Err(self.mismatch(Kind::Int)),
        }
    }

    pub fn to_float(&self) -> Result<f64> {
        match &self.raw {
            WireValue::Float(f) => Ok(*f),
            _ => Err(self.mismatch(Kind::Float)),
        }
    }

    /// The decoded text of a string value. Exact length, no terminator.
    pub fn as_str(&self) -> Result<&str> {
        match &self.raw {
            WireValue::String(s) => Ok(s),
            _ => Err(self.mismatch(Kind::String)),
        }
    }

    /// The decoded payload of a byte-array value
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match &self.raw {
            WireValue::Bytes(b) => Ok(b),
            _ => Err(self.mismatch(Kind::Bytes)),
        }
    }

    /// The signed integer form of an identity, decoded directly from the
    /// 64-bit wire value
    pub fn to_identity(&self) -> Result<i64> {
        match &self.raw {
            WireValue::Identity(id) => Ok(*id),
            _ => Err(self.mismatch(Kind::Identity)),
        }
    }

    pub fn list_size(&self) -> Result<usize> {
        match &self.raw {
            WireValue::List(items) => Ok(items.len()),
            _ => Err(self.mismatch(Kind::List)),
        }
    }

    /// Entry `index` of a list. Record-view entries share the list's record
    /// handle; owned-list entries are clones of the retained children and
    /// stay valid independent of the list.
    pub fn list_entry(&self, index: usize) -> Result<Value> {
        let items = match &self.raw {
            WireValue::List(items) => items,
            _ => return Err(self.mismatch(Kind::List)),
        };
        if index >= items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                size: items.len(),
            });
        }
        match &self.origin {
            Origin::Owned(Some(OwnedChildren::List(children))) => Ok(children[index].clone()),
            _ => Ok(self.derive(items[index].clone())),
        }
    }

    /// All entries of a map, keyed in sorted order. Wire order is not
    /// preserved: maps are unordered on the wire.
    pub fn to_map(&self) -> Result<BTreeMap<String, Value>> {
        let entries = match &self.raw {
            WireValue::Map(entries) => entries,
            _ => return Err(self.mismatch(Kind::Map)),
        };
        match &self.origin {
            Origin::Owned(Some(OwnedChildren::Map(children))) => Ok(children.clone()),
            _ => Ok(entries
                .iter()
                .map(|e| (e.key.to_string(), self.derive(e.value.clone())))
                .collect()),
        }
    }

    pub fn map_keys(&self) -> Result<BTreeSet<String>> {
        match &self.raw {
            WireValue::Map(entries) => Ok(entries.iter().map(|e| e.key.to_string()).collect()),
            _ => Err(self.mismatch(Kind::Map)),
        }
    }

    /// Entry `key` of a map. A missing key yields a null value, per driver
    /// convention, not an error.
    pub fn map_entry(&self, key: &str) -> Result<Value> {
        let entries = match &self.raw {
            WireValue::Map(entries) => entries,
            _ => return Err(self.mismatch(Kind::Map)),
        };
        if let Origin::Owned(Some(OwnedChildren::Map(children))) = &self.origin {
            return Ok(children.get(key).cloned().unwrap_or_else(Value::null));
        }
        match entries.iter().find(|e| &*e.key == key) {
            Some(entry) => Ok(self.derive(entry.value.clone())),
            None => Ok(self.derive(WireValue::Null)),
        }
    }

    fn node(&self) -> Result<&Arc<WireNode>> {
        match &self.raw {
            WireValue::Node(node) => Ok(node),
            _ => Err(self.mismatch(Kind::Node)),
        }
    }

    pub fn node_id(&self) -> Result<i64> {
        Ok(self.node()?.identity)
    }

    /// Labels as a set: order is not significant and duplicates collapse
    pub fn node_labels(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .node()?
            .labels
            .iter()
            .map(|label| label.to_string())
            .collect())
    }

    pub fn node_properties(&self) -> Result<BTreeMap<String, Value>> {
        let node = self.node()?;
        Ok(node
            .properties
            .iter()
            .map(|e| (e.key.to_string(), self.derive(e.value.clone())))
            .collect())
    }

    fn relationship(&self) -> Result<&Arc<WireRelationship>> {
        match &self.raw {
            WireValue::Relationship(rel) => Ok(rel),
            _ => Err(self.mismatch(Kind::Relationship)),
        }
    }

    pub fn relationship_id(&self) -> Result<i64> {
        Ok(self.relationship()?.identity)
    }

    /// Start-node id, or `0` when the endpoint identity is unresolved in the
    /// source record (driver convention)
    pub fn relationship_start_node_id(&self) -> Result<i64> {
        Ok(self.relationship()?.start_node.unwrap_or(0))
    }

    /// End-node id, or `0` when the endpoint identity is unresolved
    pub fn relationship_end_node_id(&self) -> Result<i64> {
        Ok(self.relationship()?.end_node.unwrap_or(0))
    }

    pub fn relationship_type(&self) -> Result<String> {
        Ok(self.relationship()?.reltype.to_string())
    }

    pub fn relationship_properties(&self) -> Result<BTreeMap<String, Value>> {
        let rel = self.relationship()?;
        Ok(rel
            .properties
            .iter()
            .map(|e| (e.key.to_string(), self.derive(e.value.clone())))
            .collect())
    }

    fn path(&self) -> Result<&Arc<WirePath>> {
        match &self.raw {
            WireValue::Path(path) => Ok(path),
            _ => Err(self.mismatch(Kind::Path)),
        }
    }

    /// Number of relationships in the path; a path of length N has N+1 nodes
    pub fn path_length(&self) -> Result<usize> {
        Ok(self.path()?.segments.len())
    }

    /// Node at hop `hop` (0 = start node, length = end node)
    pub fn path_node(&self, hop: usize) -> Result<Value> {
        let path = self.path()?;
        let node = path.nodes.get(hop).ok_or(Error::IndexOutOfRange {
            index: hop,
            size: path.nodes.len(),
        })?;
        Ok(self.derive(WireValue::Node(node.clone())))
    }

    /// Relationship at hop `hop`, with its traversal direction relative to
    /// the path's declared order
    pub fn path_relationship(&self, hop: usize) -> Result<(Value, Direction)> {
        let path = self.path()?;
        let segment = path.segments.get(hop).ok_or(Error::IndexOutOfRange {
            index: hop,
            size: path.segments.len(),
        })?;
        let direction = if segment.forward {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        Ok((
            self.derive(WireValue::Relationship(segment.relationship.clone())),
            direction,
        ))
    }

    /// Deterministic human-readable rendering of the value tree. Keys and
    /// labels render in sorted order so output is reproducible.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    /// JSON rendering of the value tree (lossy for graph entities: nodes,
    /// relationships and paths become plain objects)
    pub fn to_json(&self) -> serde_json::Value {
        json_from_wire(&self.raw)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::owned(WireValue::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::owned(WireValue::Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::owned(WireValue::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s, false)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s, false)
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Value::bytes(data)
    }
}

impl From<Vec<Value>> for Value {
    fn from(entries: Vec<Value>) -> Self {
        Value::list(entries)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::map(entries)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_wire(&self.raw, f)
    }
}

fn fmt_wire(value: &WireValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        WireValue::Null => write!(f, "null"),
        WireValue::Bool(b) => write!(f, "{}", b),
        WireValue::Int(i) => write!(f, "{}", i),
        WireValue::Float(x) => write!(f, "{}", x),
        WireValue::String(s) => write!(f, "{:?}", &**s),
        WireValue::Bytes(b) => write!(f, "bytes(len={})", b.len()),
        WireValue::Identity(id) => write!(f, "identity({})", id),
        WireValue::Unknown(tag) => write!(f, "unknown(0x{:02x})", tag),
        WireValue::List(items) => {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                fmt_wire(item, f)?;
            }
            write!(f, "]")
        }
        WireValue::Map(entries) => fmt_entries(entries, f),
        WireValue::Node(node) => fmt_node(node, f),
        WireValue::Relationship(rel) => fmt_relationship(rel, f),
        WireValue::Path(path) => {
            write!(f, "path({}) [", path.segments.len())?;
            for (i, segment) in path.segments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                if let Some(node) = path.nodes.get(i) {
                    fmt_node(node, f)?;
                    write!(f, ", ")?;
                }
                fmt_relationship(&segment.relationship, f)?;
            }
            if let Some(last) = path.nodes.last() {
                if !path.segments.is_empty() {
                    write!(f, ", ")?;
                }
                fmt_node(last, f)?;
            }
            write!(f, "]")
        }
    }
}

/// Render map entries with sorted keys for reproducible output
fn fmt_entries(entries: &[MapEntry], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut sorted: Vec<&MapEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    write!(f, "{{")?;
    for (i, entry) in sorted.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: ", entry.key)?;
        fmt_wire(&entry.value, f)?;
    }
    write!(f, "}}")
}

fn fmt_node(node: &WireNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let labels: BTreeSet<&str> = node.labels.iter().map(|l| &**l).collect();
    write!(f, "node {} (", node.identity)?;
    for label in &labels {
        write!(f, ":{}", label)?;
    }
    write!(f, ") ")?;
    fmt_entries(&node.properties, f)
}

fn fmt_relationship(rel: &WireRelationship, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "({})-[{}:{}]-({}) ",
        rel.start_node.unwrap_or(0),
        rel.identity,
        rel.reltype,
        rel.end_node.unwrap_or(0)
    )?;
    fmt_entries(&rel.properties, f)
}

fn json_from_wire(value: &WireValue) -> serde_json::Value {
    use serde_json::json;
    match value {
        WireValue::Null => serde_json::Value::Null,
        WireValue::Bool(b) => json!(b),
        WireValue::Int(i) => json!(i),
        WireValue::Float(x) => json!(x),
        WireValue::String(s) => json!(&**s),
        WireValue::Bytes(b) => json!(&**b),
        WireValue::Identity(id) => json!(id),
        WireValue::Unknown(_) => serde_json::Value::Null,
        WireValue::List(items) => {
            serde_json::Value::Array(items.iter().map(json_from_wire).collect())
        }
        WireValue::Map(entries) => json_from_entries(entries),
        WireValue::Node(node) => json!({
            "id": node.identity,
            "labels": node.labels.iter().map(|l| &**l).collect::<BTreeSet<_>>(),
            "properties": json_from_entries(&node.properties),
        }),
        WireValue::Relationship(rel) => json_from_relationship(rel),
        WireValue::Path(path) => json!({
            "length": path.segments.len(),
            "nodes": path
                .nodes
                .iter()
                .map(|n| json_from_wire(&WireValue::Node(n.clone())))
                .collect::<Vec<_>>(),
            "relationships": path
                .segments
                .iter()
                .map(|s| {
                    let mut rel = json_from_relationship(&s.relationship);
                    rel["forward"] = json!(s.forward);
                    rel
                })
                .collect::<Vec<_>>(),
        }),
    }
}

fn json_from_entries(entries: &[MapEntry]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    let mut sorted: Vec<&MapEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    for entry in sorted {
        map.insert(entry.key.to_string(), json_from_wire(&entry.value));
    }
    serde_json::Value::Object(map)
}

fn json_from_relationship(rel: &WireRelationship) -> serde_json::Value {
    use serde_json::json;
    json!({
        "id": rel.identity,
        "start": rel.start_node,
        "end": rel.end_node,
        "type": &*rel.reltype,
        "properties": json_from_entries(&rel.properties),
    })
}
