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

//! Neo4j graph store for GraphTap sinks.
//!
//! [`CypherGraph`] implements [`graphtap::GraphStore`] by issuing one
//! parameterised Cypher statement per capability. The statements are run by a
//! [`CypherExecutor`]; with the `bolt` feature, `BoltExecutor` connects to a
//! server through `neo4rs`.
//!
//! # Mapping Strategy
//!
//! | GraphTap | Neo4j |
//! |----------|-------|
//! | node | node without labels |
//! | index `users`, key `name` | label `users`, property `name`, schema index on both |
//! | relationship type | relationship type, verbatim |
//! | property | property, value passed as a parameter |
//!
//! # Example
//!
//! ```rust,ignore
//! use graphtap::{GraphSink, IndexSpec, NodeScheme, Tuple};
//! use graphtap_neo4j::{BoltExecutor, ConnectionConfig, CypherGraph};
//!
//! let executor = BoltExecutor::connect(&ConnectionConfig::from_env())?;
//! let scheme = NodeScheme::indexed(IndexSpec::on("users", ["name"])?);
//! let mut sink = GraphSink::new(CypherGraph::new(executor), scheme);
//! sink.write(&Tuple::from_pairs([("name", "pingles")])?)?;
//! sink.complete()?;
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

#[cfg(feature = "bolt")]
pub mod bolt;
pub mod config;
pub mod cypher;
pub mod error;
pub mod graph;

#[cfg(feature = "bolt")]
pub use bolt::BoltExecutor;
pub use config::{ConnectionConfig, CypherGraphConfig, DEFAULT_MAX_STRING_LENGTH, DEFAULT_URI};
pub use cypher::{CypherStatement, CypherValue, Row, StatementType};
pub use error::{Neo4jError, Result};
pub use graph::{CypherExecutor, CypherGraph};
