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

//! Mapping schemes from tuples to graph writes.
//!
//! | Scheme | One tuple becomes |
//! |--------|-------------------|
//! | [`NodeScheme`] | one node, every field a property, optionally indexed |
//! | [`RelationshipScheme`] | one typed relationship between two indexed nodes, trailing fields as properties |
//!
//! Schemes hold configuration only, so one instance can serve any number of
//! sinks and threads.

pub mod node;
pub mod relationship;

pub use node::NodeScheme;
pub use relationship::{AmbiguityPolicy, RelationshipScheme};

use crate::error::Result;
use crate::store::{GraphStore, NodeId, RelationshipId};
use crate::tuple::Tuple;

/// What a successful sink wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Written {
    /// A node was created.
    Node(NodeId),
    /// A relationship was created.
    Relationship(RelationshipId),
}

/// A strategy mapping one tuple to graph writes.
pub trait Scheme: Send + Sync {
    /// Map `tuple` onto `graph`.
    ///
    /// Store errors propagate unchanged; nothing is retried or rolled back.
    fn sink(&self, tuple: &Tuple, graph: &mut dyn GraphStore) -> Result<Written>;
}

/// Either scheme, for sinks configured at runtime.
#[derive(Debug, Clone)]
pub enum GraphScheme {
    /// Node creation.
    Node(NodeScheme),
    /// Relationship creation.
    Relationship(RelationshipScheme),
}

impl From<NodeScheme> for GraphScheme {
    fn from(scheme: NodeScheme) -> Self {
        GraphScheme::Node(scheme)
    }
}

impl From<RelationshipScheme> for GraphScheme {
    fn from(scheme: RelationshipScheme) -> Self {
        GraphScheme::Relationship(scheme)
    }
}

impl Scheme for GraphScheme {
    fn sink(&self, tuple: &Tuple, graph: &mut dyn GraphStore) -> Result<Written> {
        match self {
            GraphScheme::Node(scheme) => scheme.sink(tuple, graph),
            GraphScheme::Relationship(scheme) => scheme.sink(tuple, graph),
        }
    }
}

impl<S: Scheme + ?Sized> Scheme for &S {
    fn sink(&self, tuple: &Tuple, graph: &mut dyn GraphStore) -> Result<Written> {
        (**self).sink(tuple, graph)
    }
}
