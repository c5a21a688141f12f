// Dweve GraphTap - Tuple-to-Graph Sink
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for graph sinks.

use thiserror::Error;

/// Error type for scheme construction, record mapping and store access.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Invalid scheme, index or field configuration, raised before any record is sunk.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A field the scheme needs is absent from the tuple.
    #[error("tuple has no field '{field}'")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// A record cannot be mapped (bad width, empty relationship type, ...).
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// An endpoint key has no match in its index.
    #[error("no node in index '{index}' with {key} = '{value}'")]
    Resolution {
        /// The index that was searched.
        index: String,
        /// The index key.
        key: String,
        /// The looked-up value, rendered as text.
        value: String,
    },

    /// An endpoint key matched more than one node and the scheme rejects ambiguity.
    #[error("{matches} nodes in index '{index}' with {key} = '{value}', expected exactly one")]
    AmbiguousResolution {
        /// The index that was searched.
        index: String,
        /// The index key.
        key: String,
        /// The looked-up value, rendered as text.
        value: String,
        /// Number of nodes returned by the index.
        matches: usize,
    },

    /// A skipping sink exceeded its failure budget.
    #[error("{failed} records failed, more than the allowed {max_failures}")]
    TooManyFailures {
        /// Records failed so far.
        failed: usize,
        /// Configured budget.
        max_failures: usize,
    },

    /// The store could not make a batch durable.
    ///
    /// Every record of the batch was written; the failure belongs to the run.
    #[error("flush of {pending} written records failed: {source}")]
    Flush {
        /// Records written since the last successful flush.
        pending: usize,
        /// The store error.
        source: Box<SinkError>,
    },

    /// The graph store failed (connection, server or storage error).
    #[error("graph store error: {0}")]
    Transport(String),

    /// I/O error while reading a tuple source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited source parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration (de)serialization error from serde_json.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SinkError {
    /// Whether this error belongs to a single record rather than to the whole run.
    ///
    /// Per-record errors may be skipped under [`FailurePolicy::Skip`](crate::FailurePolicy::Skip);
    /// everything else always aborts. A CSV error caused by a failed read is
    /// not per-record: the reader cannot continue past it.
    pub fn is_per_record(&self) -> bool {
        match self {
            SinkError::MissingField { .. }
            | SinkError::InvalidRecord(_)
            | SinkError::Resolution { .. }
            | SinkError::AmbiguousResolution { .. } => true,
            SinkError::Csv(e) => !e.is_io_error(),
            _ => false,
        }
    }
}

/// Result type alias for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;
