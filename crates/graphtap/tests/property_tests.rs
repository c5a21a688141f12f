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

//! Property-based tests for scheme invariants.
//!
//! Test coverage:
//! - Relationship scheme field-count validation
//! - Trailing fields map one-to-one onto relationship properties
//! - Empty index field sets never write index entries
//! - Indexed nodes are discoverable by every indexed value

use graphtap::{
    Fields, GraphStore, IndexSpec, MemoryGraph, NodeScheme, RelationshipScheme, Scheme,
    SinkError, Tuple, Value, Written,
};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

/// Distinct field names, always starting with the three structural ones.
fn relationship_fields(extra: usize) -> impl Strategy<Value = Vec<String>> {
    btree_set("p_[a-z]{1,8}", extra).prop_map(|props| {
        let mut names = vec!["from".to_string(), "to".to_string(), "type".to_string()];
        names.extend(props);
        names
    })
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn users() -> IndexSpec {
    IndexSpec::on("users", ["name"]).unwrap()
}

/// A graph holding "a" and "b" in the users index.
fn two_users() -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    let scheme = NodeScheme::indexed(users());
    for name in ["a", "b"] {
        scheme
            .sink(&Tuple::from_pairs([("name", name)]).unwrap(), &mut graph)
            .unwrap();
    }
    graph
}

// ============================================================================
// Construction
// ============================================================================

proptest! {
    /// Fewer than three declared fields is always a configuration error.
    #[test]
    fn prop_too_few_fields_rejected(names in btree_set("[a-z]{1,8}", 0..3)) {
        let fields = Fields::new(names).unwrap();
        let result = RelationshipScheme::new(fields, users(), users());
        prop_assert!(matches!(result, Err(SinkError::Configuration(_))));
    }

    /// Three or more declared fields always construct.
    #[test]
    fn prop_enough_fields_accepted(names in (0usize..8).prop_flat_map(relationship_fields)) {
        let count = names.len();
        let scheme =
            RelationshipScheme::new(Fields::new(names).unwrap(), users(), users()).unwrap();
        prop_assert_eq!(scheme.property_fields().len(), count - 3);
    }
}

// ============================================================================
// Relationship properties
// ============================================================================

proptest! {
    /// A relationship carries exactly the trailing fields, with the tuple's values.
    #[test]
    fn prop_trailing_fields_become_properties(
        (names, values) in (0usize..6)
            .prop_flat_map(relationship_fields)
            .prop_flat_map(|names| {
                let n = names.len() - 3;
                (Just(names), vec(scalar(), n))
            })
    ) {
        let mut graph = two_users();
        let scheme = RelationshipScheme::new(Fields::new(names.clone()).unwrap(), users(), users())
            .unwrap();

        let mut row = vec![Value::from("a"), Value::from("b"), Value::from("KNOWS")];
        row.extend(values.iter().cloned());
        let tuple = Tuple::new(Fields::new(names.clone()).unwrap(), row).unwrap();

        let written = scheme.sink(&tuple, &mut graph).unwrap();
        let Written::Relationship(id) = written else {
            return Err(TestCaseError::fail("expected a relationship"));
        };
        let rel = graph.relationship(id).unwrap();

        prop_assert_eq!(rel.properties.len(), names.len() - 3);
        for (name, value) in names[3..].iter().zip(values.iter()) {
            prop_assert_eq!(rel.property(name), Some(value));
        }
    }

    /// The relationship type is stored exactly as given.
    #[test]
    fn prop_type_is_verbatim(rel_type in "[A-Za-z_]{1,16}") {
        let mut graph = two_users();
        let scheme = RelationshipScheme::new(
            Fields::new(["from", "to", "type"]).unwrap(),
            users(),
            users(),
        )
        .unwrap();
        let tuple = Tuple::from_pairs([
            ("from", "a"),
            ("to", "b"),
            ("type", rel_type.as_str()),
        ])
        .unwrap();

        let Written::Relationship(id) = scheme.sink(&tuple, &mut graph).unwrap() else {
            return Err(TestCaseError::fail("expected a relationship"));
        };
        prop_assert_eq!(&graph.relationship(id).unwrap().rel_type, &rel_type);
    }
}

// ============================================================================
// Node indexing
// ============================================================================

proptest! {
    /// An index spec without fields never writes index entries.
    #[test]
    fn prop_empty_index_writes_nothing(values in vec(scalar(), 1..6)) {
        let names: Vec<String> = (0..values.len()).map(|i| format!("f{}", i)).collect();
        let tuple = Tuple::new(Fields::new(names).unwrap(), values).unwrap();
        let scheme = NodeScheme::indexed(IndexSpec::new("users", Fields::empty()).unwrap());

        let mut graph = MemoryGraph::new();
        scheme.sink(&tuple, &mut graph).unwrap();

        prop_assert_eq!(graph.node_count(), 1);
        prop_assert_eq!(graph.index_names().count(), 0);
    }

    /// Every indexed field makes the node discoverable by its value.
    #[test]
    fn prop_indexed_node_is_discoverable(
        name in "[a-z]{1,10}",
        nationality in "[a-z]{1,10}",
    ) {
        let scheme = NodeScheme::indexed(IndexSpec::on("users", ["name", "nationality"]).unwrap());
        let tuple = Tuple::from_pairs([
            ("name", name.as_str()),
            ("nationality", nationality.as_str()),
        ])
        .unwrap();

        let mut graph = MemoryGraph::new();
        let Written::Node(id) = scheme.sink(&tuple, &mut graph).unwrap() else {
            return Err(TestCaseError::fail("expected a node"));
        };

        let by_name = graph.lookup_index("users", "name", &Value::from(name)).unwrap();
        prop_assert_eq!(by_name, vec![id]);
        let by_nationality = graph
            .lookup_index("users", "nationality", &Value::from(nationality))
            .unwrap();
        prop_assert_eq!(by_nationality, vec![id]);
    }
}
