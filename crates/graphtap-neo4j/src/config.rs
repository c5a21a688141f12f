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

//! Configuration types for the Neo4j graph store.

use serde::{Deserialize, Serialize};

/// Default maximum string length for property values: 100 MB.
///
/// For stricter limits, use `CypherGraphConfig::with_max_string_length()`.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 100 * 1024 * 1024; // 100 MB

/// Default Bolt endpoint.
pub const DEFAULT_URI: &str = "bolt://localhost:7687";

/// Behaviour of [`CypherGraph`](crate::CypherGraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CypherGraphConfig {
    /// Issue `CREATE INDEX IF NOT EXISTS` the first time an index key is used (default: true).
    pub create_indexes: bool,

    /// Maximum string length for property values (default: 100MB, None = unlimited).
    pub max_string_length: Option<usize>,
}

impl Default for CypherGraphConfig {
    fn default() -> Self {
        Self {
            create_indexes: true,
            max_string_length: Some(DEFAULT_MAX_STRING_LENGTH),
        }
    }
}

impl CypherGraphConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not create schema indexes; assume they are managed elsewhere.
    pub fn without_index_creation(mut self) -> Self {
        self.create_indexes = false;
        self
    }

    /// Set maximum string length for property values.
    pub fn with_max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = Some(max);
        self
    }

    /// Remove string length limit (use with caution).
    pub fn without_string_length_limit(mut self) -> Self {
        self.max_string_length = None;
        self
    }
}

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Bolt URI (default: `bolt://localhost:7687`).
    pub uri: String,
    /// User name (default: `neo4j`).
    pub user: String,
    /// Password (default: empty).
    pub password: String,
    /// Database name (default: the server's default database).
    pub database: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: None,
        }
    }
}

impl ConnectionConfig {
    /// Create a configuration for `uri` with default credentials.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Read `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` and `NEO4J_DATABASE`,
    /// falling back to the defaults for unset variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            uri: lookup("NEO4J_URI").unwrap_or(defaults.uri),
            user: lookup("NEO4J_USER").unwrap_or(defaults.user),
            password: lookup("NEO4J_PASSWORD").unwrap_or(defaults.password),
            database: lookup("NEO4J_DATABASE").or(defaults.database),
        }
    }

    /// Set the credentials.
    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}
