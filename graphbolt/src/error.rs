// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Client error types

use crate::value::Kind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the client layer.
///
/// Server-side query failures are deliberately absent: they are state on the
/// stream, inspected through `ResultStream::check_failure` and
/// `ResultStream::failure_details`, and never abort iteration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Submission rejected: {0}")]
    Submit(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: Kind, actual: Kind },

    #[error("Index {index} out of range (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("No failure has been reported on this stream")]
    NoFailure,

    #[error("Protocol error: {0}")]
    Protocol(String),
}
