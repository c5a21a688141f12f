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

//! Configuration types for graph sinks.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default number of records between store flushes.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// How a sink reacts to a record that fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure and return it.
    #[default]
    Abort,
    /// Record per-record failures and continue with the next record.
    ///
    /// Store and configuration errors still abort.
    Skip,
}

/// Configuration for [`GraphSink`](crate::GraphSink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Failure handling (default: abort).
    pub failure_policy: FailurePolicy,

    /// Records between calls to [`GraphStore::flush`](crate::GraphStore::flush)
    /// (default: 1000, 0 = flush only on completion).
    pub batch_size: usize,

    /// Under [`FailurePolicy::Skip`], abort once more than this many records
    /// have failed (default: None = unlimited).
    pub max_failures: Option<usize>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            batch_size: DEFAULT_BATCH_SIZE,
            max_failures: None,
        }
    }
}

/// Builder for SinkConfig.
///
/// # Examples
///
/// ```
/// # use graphtap::{FailurePolicy, SinkConfig};
/// let config = SinkConfig::builder()
///     .failure_policy(FailurePolicy::Skip)
///     .max_failures(10)
///     .batch_size(500)
///     .build();
/// assert_eq!(config.batch_size, 500);
/// ```
#[derive(Default)]
pub struct SinkConfigBuilder {
    failure_policy: Option<FailurePolicy>,
    batch_size: Option<usize>,
    max_failures: Option<Option<usize>>,
}

impl SinkConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure policy.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Set the number of records between flushes.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Set the failure budget for skip mode.
    pub fn max_failures(mut self, max: usize) -> Self {
        self.max_failures = Some(Some(max));
        self
    }

    /// Build the SinkConfig instance.
    ///
    /// All unset fields will use their default values.
    pub fn build(self) -> SinkConfig {
        let defaults = SinkConfig::default();
        SinkConfig {
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            max_failures: self.max_failures.unwrap_or(defaults.max_failures),
        }
    }
}

impl SinkConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for SinkConfig.
    pub fn builder() -> SinkConfigBuilder {
        SinkConfigBuilder::default()
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    ///
    /// ```
    /// # use graphtap::{FailurePolicy, SinkConfig};
    /// let config = SinkConfig::from_json(r#"{"failure_policy": "skip"}"#).unwrap();
    /// assert_eq!(config.failure_policy, FailurePolicy::Skip);
    /// assert_eq!(config.batch_size, 1000);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Skip failing records instead of aborting.
    pub fn skipping_failures(mut self) -> Self {
        self.failure_policy = FailurePolicy::Skip;
        self
    }

    /// Set the number of records between flushes.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the failure budget for skip mode.
    pub fn with_max_failures(mut self, max: usize) -> Self {
        self.max_failures = Some(max);
        self
    }
}
