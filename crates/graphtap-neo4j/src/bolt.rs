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

//! Bolt executor backed by `neo4rs`.
//!
//! Sinks are synchronous, so the executor owns a private tokio runtime and
//! blocks on each statement. Statements run in auto-commit mode.

use neo4rs::{query, BoltNull, BoltType, ConfigBuilder, Graph};
use tokio::runtime::Runtime;
use tracing::info;

use crate::config::ConnectionConfig;
use crate::cypher::{CypherStatement, CypherValue, Row};
use crate::error::{Neo4jError, Result};
use crate::graph::CypherExecutor;

/// Runs statements against a Neo4j server over Bolt.
pub struct BoltExecutor {
    graph: Graph,
    runtime: Runtime,
}

impl std::fmt::Debug for BoltExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoltExecutor").finish_non_exhaustive()
    }
}

impl BoltExecutor {
    /// Connect using `config`.
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let runtime = Runtime::new().map_err(|e| Neo4jError::Connection(e.to_string()))?;

        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str());
        if let Some(database) = &config.database {
            builder = builder.db(database.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| Neo4jError::Connection(e.to_string()))?;

        let graph = {
            let _guard = runtime.enter();
            Graph::connect(neo_config).map_err(|e| Neo4jError::Connection(e.to_string()))?
        };

        info!(uri = %config.uri, "connected to Neo4j");
        Ok(Self { graph, runtime })
    }
}

fn to_bolt(value: &CypherValue) -> BoltType {
    match value {
        CypherValue::Null => BoltType::Null(BoltNull),
        CypherValue::Bool(b) => (*b).into(),
        CypherValue::Int(i) => (*i).into(),
        CypherValue::Float(f) => (*f).into(),
        CypherValue::String(s) => s.clone().into(),
    }
}

impl CypherExecutor for BoltExecutor {
    /// Only the integer `id` column is read back from result rows.
    fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Row>> {
        let mut q = query(&statement.query);
        for (name, value) in &statement.parameters {
            q = q.param(name, to_bolt(value));
        }

        let graph = &self.graph;
        self.runtime.block_on(async move {
            let mut stream = graph
                .execute(q)
                .await
                .map_err(|e| Neo4jError::Query(e.to_string()))?;

            let mut rows = Vec::new();
            while let Some(row) = stream
                .next()
                .await
                .map_err(|e| Neo4jError::Query(e.to_string()))?
            {
                let mut out = Row::new();
                if let Ok(id) = row.get::<i64>("id") {
                    out.insert("id".to_string(), CypherValue::Int(id));
                }
                rows.push(out);
            }
            Ok(rows)
        })
    }
}
