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

//! Write pipeline tuples into a graph database as nodes and relationships.
//!
//! A batch pipeline hands a sink one flat tuple at a time. A *scheme* decides
//! what that tuple becomes in the graph, and a [`GraphStore`] carries out the
//! writes.
//!
//! # Mapping Strategy
//!
//! | Tuple | Graph |
//! |-------|-------|
//! | every field (node scheme) | node property of the same name |
//! | indexed field (node scheme) | entry in a named index, keyed by field name and value |
//! | field 0 / field 1 (relationship scheme) | start / end node, found via the from / to index |
//! | field 2 (relationship scheme) | relationship type, verbatim |
//! | fields 3.. (relationship scheme) | relationship properties |
//!
//! # Example
//!
//! ```rust
//! use graphtap::{
//!     Fields, GraphSink, IndexSpec, MemoryGraph, NodeScheme, RelationshipScheme, Tuple,
//! };
//!
//! fn example() -> graphtap::Result<()> {
//!     let users = IndexSpec::on("users", ["name"])?;
//!     let nations = IndexSpec::on("nations", ["name"])?;
//!
//!     let mut sink = GraphSink::new(MemoryGraph::new(), NodeScheme::indexed(users.clone()));
//!     sink.write(&Tuple::from_pairs([("name", "pingles")])?)?;
//!     let graph = sink.complete()?;
//!
//!     let mut sink = GraphSink::new(graph, NodeScheme::indexed(nations.clone()));
//!     sink.write(&Tuple::from_pairs([("name", "british")])?)?;
//!     let graph = sink.complete()?;
//!
//!     let scheme = RelationshipScheme::new(
//!         Fields::new(["name", "nationality", "relationship"])?,
//!         users,
//!         nations,
//!     )?;
//!     let mut sink = GraphSink::new(graph, scheme);
//!     sink.write(&Tuple::from_pairs([
//!         ("name", "pingles"),
//!         ("nationality", "british"),
//!         ("relationship", "NATIONALITY"),
//!     ])?)?;
//!
//!     assert_eq!(sink.complete()?.relationship_count(), 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Stores
//!
//! - [`MemoryGraph`]: in-process store for embedded use and tests.
//! - `graphtap-neo4j`: Neo4j over Cypher.
//!
//! Any other database can be plugged in by implementing [`GraphStore`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod index;
pub mod memory;
pub mod scheme;
pub mod sink;
pub mod source;
pub mod store;
pub mod tuple;
pub mod value;

// Re-export main types at crate root for convenience
pub use config::{FailurePolicy, SinkConfig, SinkConfigBuilder, DEFAULT_BATCH_SIZE};
pub use error::{Result, SinkError};
pub use index::IndexSpec;
pub use memory::{MemoryGraph, NodeRecord, RelationshipRecord};
pub use scheme::{AmbiguityPolicy, GraphScheme, NodeScheme, RelationshipScheme, Scheme, Written};
pub use sink::{GraphSink, RecordFailure, SinkReport, SinkStats};
pub use source::{DelimitedOptions, DelimitedSource};
pub use store::{EntityRef, GraphStore, NodeId, RelationshipId};
pub use tuple::{Fields, Tuple};
pub use value::Value;
