// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Reference-counted backing store for one decoded row

use crate::engine::wire::WireValue;
use std::sync::Arc;

/// Shared handle to one decoded row of a query result.
///
/// The handle is created when a row is fetched or peeked and stays alive for
/// as long as any owner remains: the `Row` it came from, or any value view
/// derived from that row, however deeply nested. Cloning is a reference-count
/// increment; all clones denote the identical underlying record.
#[derive(Debug, Clone)]
pub struct RecordHandle {
    inner: Arc<Record>,
}

#[derive(Debug)]
struct Record {
    fields: Box<[WireValue]>,
}

impl RecordHandle {
    /// Wrap a decoded row. Called by engine implementations when a record
    /// has been pulled off the wire.
    pub fn new(fields: Vec<WireValue>) -> Self {
        Self {
            inner: Arc::new(Record {
                fields: fields.into_boxed_slice(),
            }),
        }
    }

    /// Number of fields in this record
    pub fn field_count(&self) -> usize {
        self.inner.fields.len()
    }

    /// Decoded wire value of one field; `None` for an invalid index
    pub fn field(&self, index: usize) -> Option<&WireValue> {
        self.inner.fields.get(index)
    }

    /// Number of live owners of this record
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two handles denote the identical underlying record
    pub fn same_record(&self, other: &RecordHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
