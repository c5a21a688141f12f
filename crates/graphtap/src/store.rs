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

//! The capability surface schemes need from a graph database.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::value::Value;

/// Identifier of a node, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Identifier of a relationship, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationshipId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relationship {}", self.0)
    }
}

/// A property-carrying graph entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A node.
    Node(NodeId),
    /// A relationship.
    Relationship(RelationshipId),
}

impl From<NodeId> for EntityRef {
    fn from(id: NodeId) -> Self {
        EntityRef::Node(id)
    }
}

impl From<RelationshipId> for EntityRef {
    fn from(id: RelationshipId) -> Self {
        EntityRef::Relationship(id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Node(id) => id.fmt(f),
            EntityRef::Relationship(id) => id.fmt(f),
        }
    }
}

/// A graph database handle.
///
/// Implementations own their connection; the sink never shares a handle
/// between workers. Every failure is reported as
/// [`SinkError::Transport`](crate::SinkError::Transport) and is never retried
/// by the caller.
pub trait GraphStore {
    /// Create an empty node.
    fn create_node(&mut self) -> Result<NodeId>;

    /// Set `key` to `value` on a node or relationship, replacing any previous value.
    fn set_property(&mut self, entity: EntityRef, key: &str, value: &Value) -> Result<()>;

    /// Register `node` in the named index under `key = value`.
    fn add_to_index(&mut self, index: &str, node: NodeId, key: &str, value: &Value) -> Result<()>;

    /// All nodes registered in the named index under `key = value`, in index order.
    ///
    /// An unknown index yields an empty list.
    fn lookup_index(&mut self, index: &str, key: &str, value: &Value) -> Result<Vec<NodeId>>;

    /// Create a relationship of type `rel_type` from `from` to `to`.
    fn create_relationship(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel_type: &str,
    ) -> Result<RelationshipId>;

    /// Make buffered writes durable. Called at batch boundaries and on completion.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<G: GraphStore + ?Sized> GraphStore for &mut G {
    fn create_node(&mut self) -> Result<NodeId> {
        (**self).create_node()
    }

    fn set_property(&mut self, entity: EntityRef, key: &str, value: &Value) -> Result<()> {
        (**self).set_property(entity, key, value)
    }

    fn add_to_index(&mut self, index: &str, node: NodeId, key: &str, value: &Value) -> Result<()> {
        (**self).add_to_index(index, node, key, value)
    }

    fn lookup_index(&mut self, index: &str, key: &str, value: &Value) -> Result<Vec<NodeId>> {
        (**self).lookup_index(index, key, value)
    }

    fn create_relationship(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel_type: &str,
    ) -> Result<RelationshipId> {
        (**self).create_relationship(from, to, rel_type)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
