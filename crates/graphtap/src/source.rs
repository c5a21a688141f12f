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

//! Delimited text files as tuple sources.
//!
//! Files have no header row; columns are named by the declared [`Fields`] in
//! order. Every value is read as a string.

use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::{Result, SinkError};
use crate::tuple::{Fields, Tuple};
use crate::value::Value;

/// Options for reading delimited text.
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    /// Field delimiter (default: `,`).
    pub delimiter: u8,
    /// Trim whitespace around values (default: false).
    pub trim: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl DelimitedOptions {
    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Trim whitespace around values.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

/// An iterator of tuples read from delimited text.
///
/// # Examples
///
/// ```
/// # use graphtap::{DelimitedSource, Fields, Value};
/// let fields = Fields::new(["name", "nationality"]).unwrap();
/// let mut source = DelimitedSource::from_str("pingles,british\n", fields, Default::default());
///
/// let tuple = source.next().unwrap().unwrap();
/// assert_eq!(tuple.get("nationality"), Some(&Value::from("british")));
/// assert!(source.next().is_none());
/// ```
pub struct DelimitedSource<R> {
    fields: Fields,
    records: StringRecordsIntoIter<R>,
    record: usize,
}

impl<R: Read> DelimitedSource<R> {
    /// Read tuples from `reader`.
    pub fn from_reader(reader: R, fields: Fields, options: DelimitedOptions) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter)
            .trim(if options.trim { Trim::All } else { Trim::None })
            .from_reader(reader);
        Self {
            fields,
            records: reader.into_records(),
            record: 0,
        }
    }

    /// The declared fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl DelimitedSource<File> {
    /// Read tuples from a file.
    pub fn from_path(
        path: impl AsRef<Path>,
        fields: Fields,
        options: DelimitedOptions,
    ) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, fields, options))
    }
}

impl DelimitedSource<Cursor<Vec<u8>>> {
    /// Read tuples from an in-memory string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, fields: Fields, options: DelimitedOptions) -> Self {
        Self::from_reader(Cursor::new(text.as_bytes().to_vec()), fields, options)
    }
}

impl<R: Read> Iterator for DelimitedSource<R> {
    type Item = Result<Tuple>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.record += 1;

        let record = match record {
            Ok(record) => record,
            Err(e) => return Some(Err(SinkError::Csv(e))),
        };
        if record.len() != self.fields.len() {
            return Some(Err(SinkError::InvalidRecord(format!(
                "record {} has {} values, expected {}",
                self.record,
                record.len(),
                self.fields.len()
            ))));
        }

        let values = record.iter().map(Value::from).collect();
        Some(Tuple::new(self.fields.clone(), values))
    }
}
