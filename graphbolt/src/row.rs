// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! A single fetched or peeked result row

use crate::error::{Error, Result};
use crate::record::RecordHandle;
use crate::value::Value;
use std::sync::Arc;

/// One row of a query result.
///
/// End-of-stream is represented by the stream returning `None` rather than a
/// sentinel row, so a `Row` always has a backing record. The row shares
/// ownership of that record with every value derived from it: dropping the
/// row (or the stream) does not invalidate values already handed out.
#[derive(Debug, Clone)]
pub struct Row {
    record: RecordHandle,
    fields: Arc<[String]>,
}

impl Row {
    pub(crate) fn new(record: RecordHandle, fields: Arc<[String]>) -> Self {
        Self { record, fields }
    }

    /// Number of fields in this row
    pub fn field_count(&self) -> usize {
        self.record.field_count()
    }

    /// Value of field `index` as a view sharing this row's record
    pub fn field(&self, index: usize) -> Result<Value> {
        match self.record.field(index) {
            Some(raw) => Ok(Value::from_record(self.record.clone(), raw.clone())),
            None => Err(Error::IndexOutOfRange {
                index,
                size: self.record.field_count(),
            }),
        }
    }

    /// Value of the field named `name`, if the result has such a column
    pub fn get(&self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|field| field == name)?;
        self.field(index).ok()
    }

    /// The backing record shared by all values derived from this row
    pub fn record(&self) -> &RecordHandle {
        &self.record
    }
}
