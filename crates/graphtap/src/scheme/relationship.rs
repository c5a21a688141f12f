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

//! One tuple, one relationship between two indexed nodes.
//!
//! The declared fields are read positionally:
//!
//! | Position | Meaning |
//! |----------|---------|
//! | 0 | key of the start node, looked up in the from-index |
//! | 1 | key of the end node, looked up in the to-index |
//! | 2 | relationship type, used verbatim |
//! | 3.. | relationship properties, named after the field |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SinkError};
use crate::index::IndexSpec;
use crate::scheme::{Scheme, Written};
use crate::store::{EntityRef, GraphStore, NodeId};
use crate::tuple::{Fields, Tuple};
use crate::value::Value;

/// Number of structural fields at the head of a relationship tuple.
pub const STRUCTURAL_FIELDS: usize = 3;

/// What to do when an endpoint key matches more than one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AmbiguityPolicy {
    /// Fail the record with [`SinkError::AmbiguousResolution`].
    #[default]
    Reject,
    /// Use the first node in index order.
    First,
}

/// Creates a typed relationship per tuple between two nodes found by index.
///
/// # Examples
///
/// ```
/// # use graphtap::{Fields, IndexSpec, RelationshipScheme};
/// let scheme = RelationshipScheme::new(
///     Fields::new(["name", "nationality", "relationship", "yearsofcitizenship"]).unwrap(),
///     IndexSpec::on("users", ["name"]).unwrap(),
///     IndexSpec::on("nations", ["name"]).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(scheme.property_fields(), ["yearsofcitizenship"]);
///
/// // from, to and type are the minimum
/// assert!(RelationshipScheme::new(
///     Fields::new(["blah"]).unwrap(),
///     IndexSpec::on("users", ["name"]).unwrap(),
///     IndexSpec::on("users", ["name"]).unwrap(),
/// )
/// .is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RelationshipScheme {
    fields: Fields,
    from_index: IndexSpec,
    to_index: IndexSpec,
    ambiguity: AmbiguityPolicy,
}

impl RelationshipScheme {
    /// Create a relationship scheme.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Configuration`] when fewer than three fields are declared.
    pub fn new(fields: Fields, from_index: IndexSpec, to_index: IndexSpec) -> Result<Self> {
        if fields.len() < STRUCTURAL_FIELDS {
            return Err(SinkError::Configuration(format!(
                "not enough fields to draw a relationship: need from, to and relationship type, got {}",
                fields.len()
            )));
        }
        Ok(Self {
            fields,
            from_index,
            to_index,
            ambiguity: AmbiguityPolicy::default(),
        })
    }

    /// Set the policy for endpoint keys matching several nodes.
    pub fn with_ambiguity_policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// All declared fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Fields copied onto the relationship as properties.
    pub fn property_fields(&self) -> &[String] {
        self.fields.split_at(STRUCTURAL_FIELDS).1
    }

    /// Index the start node is resolved in.
    pub fn from_index(&self) -> &IndexSpec {
        &self.from_index
    }

    /// Index the end node is resolved in.
    pub fn to_index(&self) -> &IndexSpec {
        &self.to_index
    }

    /// The configured ambiguity policy.
    pub fn ambiguity_policy(&self) -> AmbiguityPolicy {
        self.ambiguity
    }

    fn structural(&self, position: usize) -> &str {
        // new() guarantees the structural positions exist
        &self.fields.as_slice()[position]
    }

    fn resolve(
        &self,
        graph: &mut dyn GraphStore,
        index: &IndexSpec,
        field: &str,
        value: &Value,
    ) -> Result<NodeId> {
        let key = index.lookup_key(field);
        let matches = graph.lookup_index(index.name(), key, value)?;
        match (matches.as_slice(), self.ambiguity) {
            ([], _) => Err(SinkError::Resolution {
                index: index.name().to_string(),
                key: key.to_string(),
                value: value.to_string(),
            }),
            ([node], _) | ([node, ..], AmbiguityPolicy::First) => Ok(*node),
            (many, AmbiguityPolicy::Reject) => Err(SinkError::AmbiguousResolution {
                index: index.name().to_string(),
                key: key.to_string(),
                value: value.to_string(),
                matches: many.len(),
            }),
        }
    }
}

impl Scheme for RelationshipScheme {
    fn sink(&self, tuple: &Tuple, graph: &mut dyn GraphStore) -> Result<Written> {
        let from_field = self.structural(0);
        let to_field = self.structural(1);
        let from_key = tuple.require(from_field)?;
        let to_key = tuple.require(to_field)?;
        let rel_type = tuple.require(self.structural(2))?.to_string();
        if rel_type.is_empty() {
            return Err(SinkError::InvalidRecord(format!(
                "empty relationship type in field '{}'",
                self.structural(2)
            )));
        }
        let properties = self
            .property_fields()
            .iter()
            .map(|field| tuple.require(field).map(|value| (field.as_str(), value)))
            .collect::<Result<Vec<_>>>()?;

        let from = self.resolve(graph, &self.from_index, from_field, from_key)?;
        let to = self.resolve(graph, &self.to_index, to_field, to_key)?;

        let rel = graph.create_relationship(from, to, &rel_type)?;
        for (key, value) in properties {
            graph.set_property(EntityRef::Relationship(rel), key, value)?;
        }

        debug!(
            relationship = rel.0,
            from = from.0,
            to = to.0,
            rel_type = %rel_type,
            properties = self.property_fields().len(),
            "created relationship"
        );
        Ok(Written::Relationship(rel))
    }
}
