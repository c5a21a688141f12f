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

//! In-process graph store for embedded use and tests.
//!
//! Indexes are exact-match and keyed on the value's text, so `Int(3)` and
//! `String("3")` land on the same entry, the way a Lucene-backed legacy
//! index behaves. `Null` is never indexed and never found, matching a
//! Cypher equality against null.

use std::collections::BTreeMap;

use crate::error::{Result, SinkError};
use crate::store::{EntityRef, GraphStore, NodeId, RelationshipId};
use crate::value::Value;

/// A stored node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRecord {
    /// Node properties.
    pub properties: BTreeMap<String, Value>,
}

impl NodeRecord {
    /// Get a property value.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// A stored relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipRecord {
    /// Start node.
    pub from: NodeId,
    /// End node.
    pub to: NodeId,
    /// Relationship type, verbatim.
    pub rel_type: String,
    /// Relationship properties.
    pub properties: BTreeMap<String, Value>,
}

impl RelationshipRecord {
    /// Get a property value.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

type IndexEntries = BTreeMap<(String, String), Vec<NodeId>>;

/// The text an index entry is keyed on; `None` for values that are not indexed.
fn index_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// An in-memory [`GraphStore`].
///
/// Node and relationship ids start at 1.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    nodes: BTreeMap<NodeId, NodeRecord>,
    relationships: BTreeMap<RelationshipId, RelationshipRecord>,
    indexes: BTreeMap<String, IndexEntries>,
    next_node: u64,
    next_relationship: u64,
}

impl MemoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    /// Look up a relationship.
    pub fn relationship(&self, id: RelationshipId) -> Option<&RelationshipRecord> {
        self.relationships.get(&id)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeRecord)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// All relationships in id order.
    pub fn relationships(&self) -> impl Iterator<Item = (RelationshipId, &RelationshipRecord)> {
        self.relationships.iter().map(|(id, rel)| (*id, rel))
    }

    /// Relationships starting or ending at `node`, in id order.
    pub fn relationships_of(&self, node: NodeId) -> Vec<(RelationshipId, &RelationshipRecord)> {
        self.relationships()
            .filter(|(_, rel)| rel.from == node || rel.to == node)
            .collect()
    }

    /// Names of the indexes holding at least one entry.
    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    /// Drop an index and all its entries. Returns whether it existed.
    pub fn delete_index(&mut self, name: &str) -> bool {
        self.indexes.remove(name).is_some()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| SinkError::Transport(format!("no such {}", id)))
    }
}

impl GraphStore for MemoryGraph {
    fn create_node(&mut self) -> Result<NodeId> {
        self.next_node += 1;
        let id = NodeId(self.next_node);
        self.nodes.insert(id, NodeRecord::default());
        Ok(id)
    }

    fn set_property(&mut self, entity: EntityRef, key: &str, value: &Value) -> Result<()> {
        let properties = match entity {
            EntityRef::Node(id) => &mut self.node_mut(id)?.properties,
            EntityRef::Relationship(id) => {
                &mut self
                    .relationships
                    .get_mut(&id)
                    .ok_or_else(|| SinkError::Transport(format!("no such {}", id)))?
                    .properties
            }
        };
        properties.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn add_to_index(&mut self, index: &str, node: NodeId, key: &str, value: &Value) -> Result<()> {
        self.node_mut(node)?;
        let Some(text) = index_text(value) else {
            return Ok(());
        };
        let entries = self
            .indexes
            .entry(index.to_string())
            .or_default()
            .entry((key.to_string(), text))
            .or_default();
        if !entries.contains(&node) {
            entries.push(node);
        }
        Ok(())
    }

    fn lookup_index(&mut self, index: &str, key: &str, value: &Value) -> Result<Vec<NodeId>> {
        let Some(text) = index_text(value) else {
            return Ok(Vec::new());
        };
        Ok(self
            .indexes
            .get(index)
            .and_then(|entries| entries.get(&(key.to_string(), text)))
            .cloned()
            .unwrap_or_default())
    }

    fn create_relationship(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel_type: &str,
    ) -> Result<RelationshipId> {
        self.node_mut(from)?;
        self.node_mut(to)?;
        self.next_relationship += 1;
        let id = RelationshipId(self.next_relationship);
        self.relationships.insert(
            id,
            RelationshipRecord {
                from,
                to,
                rel_type: rel_type.to_string(),
                properties: BTreeMap::new(),
            },
        );
        Ok(id)
    }
}
