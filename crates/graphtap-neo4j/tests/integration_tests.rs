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

//! Integration tests for graphtap-neo4j against a real Neo4j instance.
//!
//! These tests require a running Neo4j instance (NEO4J_URI, default localhost:7687).
//! Run with: cargo test -p graphtap-neo4j --features integration-tests --test integration_tests

#![cfg(feature = "integration-tests")]

use graphtap::{
    Fields, GraphSink, GraphStore, IndexSpec, NodeScheme, RelationshipScheme, SinkError, Tuple,
    Value, Written,
};
use graphtap_neo4j::{
    BoltExecutor, ConnectionConfig, CypherExecutor, CypherGraph, CypherStatement, StatementType,
};
use serial_test::serial;

/// Connect and wipe the database.
fn connect() -> CypherGraph<BoltExecutor> {
    let mut executor =
        BoltExecutor::connect(&ConnectionConfig::from_env()).expect("Failed to connect to Neo4j");
    executor
        .run(&CypherStatement::new(
            "MATCH (n) DETACH DELETE n",
            StatementType::Query,
        ))
        .expect("Failed to cleanup");
    CypherGraph::new(executor)
}

fn sink_names(graph: &mut CypherGraph<BoltExecutor>, index: &str, names: &[&str]) {
    let scheme = NodeScheme::indexed(IndexSpec::on(index, ["name"]).unwrap());
    let mut sink = GraphSink::new(graph, scheme);
    for name in names {
        sink.write(&Tuple::from_pairs([("name", *name)]).unwrap())
            .unwrap();
    }
    sink.complete().unwrap();
}

#[test]
#[serial]
fn test_indexed_nodes_are_found() {
    let mut graph = connect();
    sink_names(&mut graph, "users", &["pingles", "angrymike"]);

    let found = graph
        .lookup_index("users", "name", &Value::from("pingles"))
        .unwrap();
    assert_eq!(found.len(), 1);
    let missing = graph
        .lookup_index("users", "name", &Value::from("nobody"))
        .unwrap();
    assert!(missing.is_empty());
}

#[test]
#[serial]
fn test_relationship_with_properties() {
    let mut graph = connect();
    sink_names(&mut graph, "users", &["pingles"]);
    sink_names(&mut graph, "Nationality", &["british"]);

    let scheme = RelationshipScheme::new(
        Fields::new(["name", "nationality", "relationship", "age"]).unwrap(),
        IndexSpec::on("users", ["name"]).unwrap(),
        IndexSpec::on("Nationality", ["name"]).unwrap(),
    )
    .unwrap();
    let mut sink = GraphSink::new(&mut graph, scheme);
    let written = sink
        .write(
            &Tuple::from_pairs([
                ("name", "pingles"),
                ("nationality", "british"),
                ("relationship", "NATIONALITY"),
                ("age", "31"),
            ])
            .unwrap(),
        )
        .unwrap();
    sink.complete().unwrap();
    let Written::Relationship(rel) = written else {
        panic!("expected a relationship, got {:?}", written);
    };

    let id = i64::try_from(rel.0).unwrap();
    let mut executor = graph.into_executor();
    let rows = executor
        .run(
            &CypherStatement::new(
                "MATCH (a:users {name: 'pingles'})-[r:NATIONALITY]->(b:Nationality {name: 'british'}) \
                 WHERE id(r) = $id AND r.age = '31' RETURN id(r) AS id",
                StatementType::Query,
            )
            .with_param("id", id),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"].as_int(), Some(id));

    let all = executor
        .run(&CypherStatement::new(
            "MATCH ()-[r]->() RETURN id(r) AS id",
            StatementType::Query,
        ))
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
#[serial]
fn test_unresolved_endpoint() {
    let mut graph = connect();
    sink_names(&mut graph, "users", &["pingles"]);

    let scheme = RelationshipScheme::new(
        Fields::new(["name", "nationality", "relationship"]).unwrap(),
        IndexSpec::on("users", ["name"]).unwrap(),
        IndexSpec::on("Nationality", ["name"]).unwrap(),
    )
    .unwrap();
    let mut sink = GraphSink::new(&mut graph, scheme);
    let err = sink
        .write(
            &Tuple::from_pairs([
                ("name", "pingles"),
                ("nationality", "martian"),
                ("relationship", "NATIONALITY"),
            ])
            .unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, SinkError::Resolution { .. }));
}
