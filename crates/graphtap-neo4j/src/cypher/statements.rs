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

//! Cypher statements, parameters and result rows.

use graphtap::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Cypher parameter or result value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CypherValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    String(String),
}

impl From<bool> for CypherValue {
    fn from(v: bool) -> Self {
        CypherValue::Bool(v)
    }
}

impl From<i64> for CypherValue {
    fn from(v: i64) -> Self {
        CypherValue::Int(v)
    }
}

impl From<f64> for CypherValue {
    fn from(v: f64) -> Self {
        CypherValue::Float(v)
    }
}

impl From<String> for CypherValue {
    fn from(v: String) -> Self {
        CypherValue::String(v)
    }
}

impl From<&str> for CypherValue {
    fn from(v: &str) -> Self {
        CypherValue::String(v.to_string())
    }
}

impl From<&Value> for CypherValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => CypherValue::Null,
            Value::Bool(b) => CypherValue::Bool(*b),
            Value::Int(i) => CypherValue::Int(*i),
            Value::Float(f) => CypherValue::Float(*f),
            Value::String(s) => CypherValue::String(s.clone()),
        }
    }
}

impl CypherValue {
    /// Convert to Cypher literal syntax.
    pub fn to_cypher_literal(&self) -> String {
        match self {
            CypherValue::Null => "null".to_string(),
            CypherValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            CypherValue::Int(i) => i.to_string(),
            CypherValue::Float(f) => {
                if f.is_nan() {
                    "0.0/0.0".to_string()
                } else if f.is_infinite() {
                    if *f > 0.0 {
                        "1.0/0.0".to_string()
                    } else {
                        "-1.0/0.0".to_string()
                    }
                } else {
                    let s = f.to_string();
                    if s.contains('.') || s.contains('e') || s.contains('E') {
                        s
                    } else {
                        format!("{}.0", s)
                    }
                }
            }
            CypherValue::String(s) => super::escape::quote_string(s),
        }
    }

    /// Try to get as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CypherValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// A result row, keyed by column name.
pub type Row = BTreeMap<String, CypherValue>;

/// What a statement does; used in logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    /// Index creation.
    Index,
    /// Node creation.
    CreateNode,
    /// Relationship creation.
    CreateRelationship,
    /// Property update on a node or relationship.
    SetProperty,
    /// Label and key assignment that places a node in an index.
    AddToIndex,
    /// Index lookup.
    Lookup,
    /// Any other statement.
    Query,
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A single Cypher statement with parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CypherStatement {
    /// The Cypher query text.
    pub query: String,
    /// Parameters referenced as `$name` in the query.
    pub parameters: BTreeMap<String, CypherValue>,
    /// Type of statement.
    pub statement_type: StatementType,
}

impl CypherStatement {
    /// Create a new Cypher statement.
    pub fn new(query: impl Into<String>, statement_type: StatementType) -> Self {
        Self {
            query: query.into(),
            parameters: BTreeMap::new(),
            statement_type,
        }
    }

    /// Add a parameter to this statement.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<CypherValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Check if this statement has parameters.
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Render this statement with parameter values inlined.
    ///
    /// For logs only; executors send parameters separately.
    pub fn render_inline(&self) -> String {
        // Longest names first so `$id` never clobbers a prefix of `$idx`.
        let mut params: Vec<_> = self.parameters.iter().collect();
        params.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut result = self.query.clone();
        for (name, value) in params {
            let placeholder = format!("${}", name);
            result = result.replace(&placeholder, &value.to_cypher_literal());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cypher_value_from_value() {
        assert_eq!(CypherValue::from(&Value::Null), CypherValue::Null);
        assert_eq!(CypherValue::from(&Value::Int(31)), CypherValue::Int(31));
        assert_eq!(
            CypherValue::from(&Value::from("british")),
            CypherValue::String("british".to_string())
        );
        assert_eq!(CypherValue::from(&Value::Bool(true)), CypherValue::Bool(true));
    }

    #[test]
    fn test_cypher_literal() {
        assert_eq!(CypherValue::Null.to_cypher_literal(), "null");
        assert_eq!(CypherValue::Bool(false).to_cypher_literal(), "false");
        assert_eq!(CypherValue::Int(-3).to_cypher_literal(), "-3");
        assert_eq!(CypherValue::Float(2.0).to_cypher_literal(), "2.0");
        assert_eq!(CypherValue::Float(2.5).to_cypher_literal(), "2.5");
        assert_eq!(CypherValue::from("it's").to_cypher_literal(), "'it\\'s'");
    }

    #[test]
    fn test_render_inline() {
        let stmt = CypherStatement::new(
            "MATCH (n) WHERE id(n) = $id SET n.name = $value",
            StatementType::SetProperty,
        )
        .with_param("id", 7i64)
        .with_param("value", "pingles");

        assert!(stmt.has_parameters());
        assert_eq!(
            stmt.render_inline(),
            "MATCH (n) WHERE id(n) = 7 SET n.name = 'pingles'"
        );
    }

    #[test]
    fn test_render_inline_overlapping_names() {
        let stmt = CypherStatement::new("RETURN $to, $total", StatementType::Lookup)
            .with_param("to", 1i64)
            .with_param("total", 2i64);
        assert_eq!(stmt.render_inline(), "RETURN 1, 2");
    }

    #[test]
    fn test_statement_type_display() {
        assert_eq!(StatementType::CreateNode.to_string(), "CreateNode");
    }
}
