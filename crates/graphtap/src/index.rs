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

//! Named node indexes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SinkError};
use crate::tuple::Fields;

/// An index name plus the fields nodes are indexed on.
///
/// An empty field set is valid: nothing is indexed when nodes are sunk, but
/// relationship schemes may still look nodes up under the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIndexSpec")]
pub struct IndexSpec {
    name: String,
    fields: Fields,
}

#[derive(Deserialize)]
struct RawIndexSpec {
    name: String,
    #[serde(default)]
    fields: Fields,
}

impl TryFrom<RawIndexSpec> for IndexSpec {
    type Error = SinkError;

    fn try_from(raw: RawIndexSpec) -> Result<Self> {
        IndexSpec::new(raw.name, raw.fields)
    }
}

impl IndexSpec {
    /// Create an index spec.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Configuration`] when `name` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use graphtap::{Fields, IndexSpec};
    /// let users = IndexSpec::new("users", Fields::new(["name"]).unwrap()).unwrap();
    /// assert_eq!(users.name(), "users");
    /// assert!(IndexSpec::new("", Fields::empty()).is_err());
    /// ```
    pub fn new(name: impl Into<String>, fields: Fields) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SinkError::Configuration(
                "index name must not be empty".to_string(),
            ));
        }
        Ok(Self { name, fields })
    }

    /// Shorthand for `IndexSpec::new(name, Fields::new(fields)?)`.
    pub fn on<I, S>(name: impl Into<String>, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexSpec::new(name, Fields::new(fields)?)
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The indexed fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The key endpoint lookups use: the first indexed field, or `fallback`
    /// when no fields are indexed.
    pub fn lookup_key<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.fields.get(0).unwrap_or(fallback)
    }
}
