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

//! Error types for the Neo4j graph store.

use graphtap::SinkError;
use thiserror::Error;

/// Error type for Neo4j store operations.
#[derive(Debug, Error)]
pub enum Neo4jError {
    /// A label, property key or relationship type cannot be written as Cypher.
    #[error("invalid Cypher identifier: '{0}'")]
    InvalidIdentifier(String),

    /// String length limit exceeded.
    #[error("String length {length} exceeds maximum allowed length {max_length} for property '{property}'")]
    StringLengthExceeded {
        /// Actual length of the string.
        length: usize,
        /// Maximum allowed length.
        max_length: usize,
        /// Property name where the violation occurred.
        property: String,
    },

    /// A result row lacks an expected column.
    #[error("missing column '{column}' in result of {statement}")]
    MissingColumn {
        /// The expected column.
        column: String,
        /// Kind of statement that produced the row.
        statement: String,
    },

    /// A statement that must touch exactly one entity touched none.
    #[error("{0} not found")]
    NotFound(String),

    /// Could not reach or authenticate with the server.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server rejected or failed a query.
    #[error("query error: {0}")]
    Query(String),
}

/// Result type alias for Neo4j operations.
pub type Result<T> = std::result::Result<T, Neo4jError>;

/// Naming and size violations belong to the record being written; everything
/// else is a store failure.
impl From<Neo4jError> for SinkError {
    fn from(err: Neo4jError) -> Self {
        match err {
            Neo4jError::InvalidIdentifier(_) | Neo4jError::StringLengthExceeded { .. } => {
                SinkError::InvalidRecord(err.to_string())
            }
            other => SinkError::Transport(other.to_string()),
        }
    }
}
