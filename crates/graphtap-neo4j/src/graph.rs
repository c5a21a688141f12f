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

//! [`GraphStore`] over Cypher.
//!
//! Named indexes map onto labels: a node added to index `users` under
//! `name = "pingles"` gets the label `users` and the property `name`, and a
//! schema index on `(users, name)` is created the first time that pair is used.

use std::collections::HashSet;

use graphtap::{EntityRef, GraphStore, NodeId, RelationshipId, Value};
use tracing::{debug, trace};

use crate::config::CypherGraphConfig;
use crate::cypher::{
    escape_label, escape_name, escape_relationship_type, validate_string_length, CypherStatement,
    CypherValue, Row, StatementType,
};
use crate::error::{Neo4jError, Result};

/// Column every id-returning statement yields.
const ID_COLUMN: &str = "id";

/// Something that runs Cypher statements.
///
/// `BoltExecutor` (feature `bolt`) talks to a server; tests substitute
/// an in-process fake.
pub trait CypherExecutor {
    /// Run one statement and collect its result rows.
    fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Row>>;

    /// Make everything run so far durable.
    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<E: CypherExecutor + ?Sized> CypherExecutor for &mut E {
    fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Row>> {
        (**self).run(statement)
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }
}

/// A graph store that translates every capability into Cypher.
#[derive(Debug)]
pub struct CypherGraph<E> {
    executor: E,
    config: CypherGraphConfig,
    ensured: HashSet<(String, String)>,
}

impl<E: CypherExecutor> CypherGraph<E> {
    /// Wrap an executor with the default configuration.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, CypherGraphConfig::default())
    }

    /// Wrap an executor with an explicit configuration.
    pub fn with_config(executor: E, config: CypherGraphConfig) -> Self {
        Self {
            executor,
            config,
            ensured: HashSet::new(),
        }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &CypherGraphConfig {
        &self.config
    }

    /// Borrow the executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Release the executor.
    pub fn into_executor(self) -> E {
        self.executor
    }

    fn run(&mut self, statement: &CypherStatement) -> Result<Vec<Row>> {
        trace!(
            kind = %statement.statement_type,
            cypher = %statement.render_inline(),
            "running statement"
        );
        self.executor.run(statement)
    }

    /// Run a statement that must yield exactly one id.
    fn run_for_id(
        &mut self,
        statement: &CypherStatement,
        subject: impl FnOnce() -> String,
    ) -> Result<u64> {
        let rows = self.run(statement)?;
        match rows.first() {
            Some(row) => id_of(row, statement.statement_type),
            None => Err(Neo4jError::NotFound(subject())),
        }
    }

    fn parameter(&self, key: &str, value: &Value) -> Result<CypherValue> {
        if let Value::String(s) = value {
            validate_string_length(s, key, &self.config)?;
        }
        Ok(CypherValue::from(value))
    }

    fn ensure_index(&mut self, index: &str, key: &str) -> Result<()> {
        if !self.config.create_indexes {
            return Ok(());
        }
        let pair = (index.to_string(), key.to_string());
        if self.ensured.contains(&pair) {
            return Ok(());
        }

        let statement = CypherStatement::new(
            format!(
                "CREATE INDEX IF NOT EXISTS FOR (n{}) ON (n.{})",
                escape_label(index)?,
                escape_name(key)?
            ),
            StatementType::Index,
        );
        self.run(&statement)?;
        debug!(index, key, "ensured schema index");
        self.ensured.insert(pair);
        Ok(())
    }

    fn try_create_node(&mut self) -> Result<NodeId> {
        let statement =
            CypherStatement::new("CREATE (n) RETURN id(n) AS id", StatementType::CreateNode);
        let id = self.run_for_id(&statement, || "created node".to_string())?;
        Ok(NodeId(id))
    }

    fn try_set_property(&mut self, entity: EntityRef, key: &str, value: &Value) -> Result<()> {
        let value = self.parameter(key, value)?;
        let key = escape_name(key)?;
        let (query, id) = match entity {
            EntityRef::Node(NodeId(id)) => (
                format!("MATCH (n) WHERE id(n) = $id SET n.{} = $value RETURN id(n) AS id", key),
                id,
            ),
            EntityRef::Relationship(RelationshipId(id)) => (
                format!(
                    "MATCH ()-[r]->() WHERE id(r) = $id SET r.{} = $value RETURN id(r) AS id",
                    key
                ),
                id,
            ),
        };
        let statement = CypherStatement::new(query, StatementType::SetProperty)
            .with_param("id", to_param_id(id)?)
            .with_param("value", value);
        self.run_for_id(&statement, || entity.to_string())?;
        Ok(())
    }

    fn try_add_to_index(
        &mut self,
        index: &str,
        node: NodeId,
        key: &str,
        value: &Value,
    ) -> Result<()> {
        let value = self.parameter(key, value)?;
        self.ensure_index(index, key)?;

        let statement = CypherStatement::new(
            format!(
                "MATCH (n) WHERE id(n) = $id SET n{}, n.{} = $value RETURN id(n) AS id",
                escape_label(index)?,
                escape_name(key)?
            ),
            StatementType::AddToIndex,
        )
        .with_param("id", to_param_id(node.0)?)
        .with_param("value", value);
        self.run_for_id(&statement, || node.to_string())?;
        Ok(())
    }

    fn try_lookup_index(&mut self, index: &str, key: &str, value: &Value) -> Result<Vec<NodeId>> {
        let statement = CypherStatement::new(
            format!(
                "MATCH (n{}) WHERE n.{} = $value RETURN id(n) AS id ORDER BY id",
                escape_label(index)?,
                escape_name(key)?
            ),
            StatementType::Lookup,
        )
        .with_param("value", CypherValue::from(value));

        self.run(&statement)?
            .iter()
            .map(|row| id_of(row, StatementType::Lookup).map(NodeId))
            .collect()
    }

    fn try_create_relationship(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel_type: &str,
    ) -> Result<RelationshipId> {
        let statement = CypherStatement::new(
            format!(
                "MATCH (a), (b) WHERE id(a) = $from AND id(b) = $to \
                 CREATE (a)-[r{}]->(b) RETURN id(r) AS id",
                escape_relationship_type(rel_type)?
            ),
            StatementType::CreateRelationship,
        )
        .with_param("from", to_param_id(from.0)?)
        .with_param("to", to_param_id(to.0)?);
        let id = self.run_for_id(&statement, || format!("{} or {}", from, to))?;
        Ok(RelationshipId(id))
    }
}

fn id_of(row: &Row, statement_type: StatementType) -> Result<u64> {
    let missing = || Neo4jError::MissingColumn {
        column: ID_COLUMN.to_string(),
        statement: statement_type.to_string(),
    };
    let id = row.get(ID_COLUMN).and_then(CypherValue::as_int).ok_or_else(missing)?;
    u64::try_from(id)
        .map_err(|_| Neo4jError::Query(format!("negative id {} from {}", id, statement_type)))
}

fn to_param_id(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| Neo4jError::Query(format!("id {} out of range", id)))
}

impl<E: CypherExecutor> GraphStore for CypherGraph<E> {
    fn create_node(&mut self) -> graphtap::Result<NodeId> {
        Ok(self.try_create_node()?)
    }

    fn set_property(
        &mut self,
        entity: EntityRef,
        key: &str,
        value: &Value,
    ) -> graphtap::Result<()> {
        Ok(self.try_set_property(entity, key, value)?)
    }

    fn add_to_index(
        &mut self,
        index: &str,
        node: NodeId,
        key: &str,
        value: &Value,
    ) -> graphtap::Result<()> {
        Ok(self.try_add_to_index(index, node, key, value)?)
    }

    fn lookup_index(
        &mut self,
        index: &str,
        key: &str,
        value: &Value,
    ) -> graphtap::Result<Vec<NodeId>> {
        Ok(self.try_lookup_index(index, key, value)?)
    }

    fn create_relationship(
        &mut self,
        from: NodeId,
        to: NodeId,
        rel_type: &str,
    ) -> graphtap::Result<RelationshipId> {
        Ok(self.try_create_relationship(from, to, rel_type)?)
    }

    fn flush(&mut self) -> graphtap::Result<()> {
        Ok(self.executor.commit()?)
    }
}
