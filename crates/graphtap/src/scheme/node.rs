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

//! One tuple, one node.

use tracing::debug;

use crate::error::Result;
use crate::index::IndexSpec;
use crate::scheme::{Scheme, Written};
use crate::store::{EntityRef, GraphStore};
use crate::tuple::Tuple;

/// Creates a node per tuple with every field copied into a property.
///
/// With an [`IndexSpec`], the node is also registered in the named index
/// under each indexed field, keyed by the node's own value for it.
/// Duplicate nodes are not detected here.
///
/// # Examples
///
/// ```
/// # use graphtap::{GraphStore, IndexSpec, MemoryGraph, NodeScheme, Scheme, Tuple, Value};
/// let scheme = NodeScheme::indexed(IndexSpec::on("users", ["name", "nationality"]).unwrap());
/// let mut graph = MemoryGraph::new();
///
/// let tuple = Tuple::from_pairs([("name", "pingles"), ("nationality", "british")]).unwrap();
/// scheme.sink(&tuple, &mut graph).unwrap();
///
/// let found = graph.lookup_index("users", "nationality", &Value::from("british")).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NodeScheme {
    index: Option<IndexSpec>,
}

impl NodeScheme {
    /// A scheme that creates nodes without indexing them.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheme that indexes each created node according to `index`.
    pub fn indexed(index: IndexSpec) -> Self {
        Self { index: Some(index) }
    }

    /// The configured index, if any.
    pub fn index(&self) -> Option<&IndexSpec> {
        self.index.as_ref()
    }
}

impl Scheme for NodeScheme {
    fn sink(&self, tuple: &Tuple, graph: &mut dyn GraphStore) -> Result<Written> {
        // Resolve indexed values up front so a short tuple writes nothing.
        let index_entries = match &self.index {
            Some(spec) => spec
                .fields()
                .iter()
                .map(|field| tuple.require(field).map(|value| (field, value)))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let node = graph.create_node()?;
        for (key, value) in tuple.iter() {
            graph.set_property(EntityRef::Node(node), key, value)?;
        }

        if let Some(spec) = &self.index {
            for (key, value) in index_entries {
                graph.add_to_index(spec.name(), node, key, value)?;
            }
        }

        debug!(
            node = node.0,
            properties = tuple.len(),
            index = self.index.as_ref().map(IndexSpec::name),
            "created node"
        );
        Ok(Written::Node(node))
    }
}
