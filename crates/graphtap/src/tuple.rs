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

//! Field sets and tuples: the flat records a pipeline hands to a sink.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SinkError};
use crate::value::Value;

/// An ordered, duplicate-free list of field names.
///
/// Order only matters for positional slicing, e.g. a relationship scheme's
/// first three fields are structural and the rest are properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Fields {
    names: Vec<String>,
}

impl Fields {
    /// Create a field set, rejecting empty and duplicate names.
    ///
    /// # Examples
    ///
    /// ```
    /// # use graphtap::Fields;
    /// let fields = Fields::new(["name", "nationality"]).unwrap();
    /// assert_eq!(fields.len(), 2);
    /// assert!(Fields::new(["name", "name"]).is_err());
    /// ```
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = Vec::new();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(SinkError::Configuration(
                    "field names must not be empty".to_string(),
                ));
            }
            if fields.contains(&name) {
                return Err(SinkError::Configuration(format!(
                    "duplicate field name '{}'",
                    name
                )));
            }
            fields.push(name);
        }
        Ok(Self { names: fields })
    }

    /// An empty field set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Field name at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Position of `name`, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Whether `name` is one of the fields.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterate the names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The names as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Split into the first `mid` names and the rest.
    ///
    /// `mid` is clamped to the field count.
    pub fn split_at(&self, mid: usize) -> (&[String], &[String]) {
        self.names.split_at(mid.min(self.names.len()))
    }
}

impl TryFrom<Vec<String>> for Fields {
    type Error = SinkError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Fields::new(names)
    }
}

impl From<Fields> for Vec<String> {
    fn from(fields: Fields) -> Self {
        fields.names
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// One record of named, ordered values.
///
/// Schemes only read tuples; they never mutate them.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    fields: Fields,
    values: Vec<Value>,
}

impl Tuple {
    /// Create a tuple from a field set and one value per field.
    pub fn new(fields: Fields, values: Vec<Value>) -> Result<Self> {
        if fields.len() != values.len() {
            return Err(SinkError::Configuration(format!(
                "tuple has {} fields but {} values",
                fields.len(),
                values.len()
            )));
        }
        Ok(Self { fields, values })
    }

    /// Build a tuple from `(name, value)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// # use graphtap::{Tuple, Value};
    /// let tuple = Tuple::from_pairs([("name", "pingles"), ("nationality", "british")]).unwrap();
    /// assert_eq!(tuple.get("nationality"), Some(&Value::from("british")));
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (names, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Tuple::new(Fields::new(names)?, values)
    }

    /// The tuple's field set.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the tuple carries no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the named field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.position(name).map(|i| &self.values[i])
    }

    /// Value of the named field, or [`SinkError::MissingField`].
    pub fn require(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| SinkError::MissingField {
            field: name.to_string(),
        })
    }

    /// Value at `index`.
    pub fn get_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterate `(name, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().zip(self.values.iter())
    }

    /// Project onto `selection`, in the selection's order.
    pub fn select(&self, selection: &Fields) -> Result<Tuple> {
        let values = selection
            .iter()
            .map(|name| self.require(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Tuple {
            fields: selection.clone(),
            values,
        })
    }
}
