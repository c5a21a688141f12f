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

//! The pipeline-facing sink.
//!
//! A [`GraphSink`] owns one graph store handle and one scheme. It accepts one
//! tuple at a time and reports success or failure for that tuple; parallel
//! pipelines run one sink, and one connection, per worker.

use tracing::{error, info, warn};

use crate::config::{FailurePolicy, SinkConfig};
use crate::error::{Result, SinkError};
use crate::scheme::{GraphScheme, Scheme, Written};
use crate::store::GraphStore;
use crate::tuple::Tuple;

/// Running counters for a sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Records written successfully.
    pub written: usize,
    /// Records that failed.
    pub failed: usize,
    /// Calls to the store's flush.
    pub flushes: usize,
}

/// A record skipped under [`FailurePolicy::Skip`].
#[derive(Debug)]
pub struct RecordFailure {
    /// Position of the record in the source, from 0.
    pub record: usize,
    /// Why it failed.
    pub error: SinkError,
}

/// Outcome of [`GraphSink::write_all`].
#[derive(Debug, Default)]
pub struct SinkReport {
    /// Records written in this run.
    pub written: usize,
    /// Records skipped in this run.
    pub failures: Vec<RecordFailure>,
}

impl SinkReport {
    /// Whether every record was written.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes tuples into a graph store through a scheme.
///
/// # Examples
///
/// ```
/// # use graphtap::{GraphSink, IndexSpec, MemoryGraph, NodeScheme, Tuple};
/// let scheme = NodeScheme::indexed(IndexSpec::on("users", ["name"]).unwrap());
/// let mut sink = GraphSink::new(MemoryGraph::new(), scheme);
///
/// sink.write(&Tuple::from_pairs([("name", "pingles")]).unwrap()).unwrap();
///
/// let graph = sink.complete().unwrap();
/// assert_eq!(graph.node_count(), 1);
/// ```
#[derive(Debug)]
pub struct GraphSink<G, S = GraphScheme> {
    graph: G,
    scheme: S,
    config: SinkConfig,
    stats: SinkStats,
    unflushed: usize,
}

impl<G: GraphStore, S: Scheme> GraphSink<G, S> {
    /// Create a sink owning `graph`, with default configuration.
    pub fn new(graph: G, scheme: S) -> Self {
        Self {
            graph,
            scheme,
            config: SinkConfig::default(),
            stats: SinkStats::default(),
            unflushed: 0,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SinkConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// The scheme in use.
    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// The underlying store.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// The underlying store, mutably.
    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    /// Counters since the sink was created.
    pub fn stats(&self) -> SinkStats {
        self.stats
    }

    /// Sink one tuple.
    ///
    /// Flushes the store every `batch_size` successful records. The error of
    /// a failed record is returned as-is. A failed batch flush comes back as
    /// [`SinkError::Flush`]: the record itself was written and is counted.
    pub fn write(&mut self, tuple: &Tuple) -> Result<Written> {
        let written = self.write_record(tuple)?;
        self.flush_if_due()?;
        Ok(written)
    }

    fn write_record(&mut self, tuple: &Tuple) -> Result<Written> {
        match self.scheme.sink(tuple, &mut self.graph) {
            Ok(written) => {
                self.stats.written += 1;
                self.unflushed += 1;
                Ok(written)
            }
            Err(e) => {
                self.stats.failed += 1;
                Err(e)
            }
        }
    }

    fn flush_if_due(&mut self) -> Result<()> {
        if self.config.batch_size > 0 && self.unflushed >= self.config.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Sink every tuple from a source, then flush.
    ///
    /// Source errors count as failed records. Under [`FailurePolicy::Abort`]
    /// the first failure is returned; under [`FailurePolicy::Skip`]
    /// per-record failures are collected in the report and the run continues.
    pub fn write_all<I>(&mut self, tuples: I) -> Result<SinkReport>
    where
        I: IntoIterator<Item = Result<Tuple>>,
    {
        let mut report = SinkReport::default();

        for (record, tuple) in tuples.into_iter().enumerate() {
            let outcome = match tuple {
                Ok(tuple) => self.write_record(&tuple),
                Err(e) => {
                    self.stats.failed += 1;
                    Err(e)
                }
            };

            let e = match outcome {
                Ok(_) => {
                    report.written += 1;
                    if let Err(e) = self.flush_if_due() {
                        error!(record, error = %e, "sink aborted");
                        return Err(e);
                    }
                    continue;
                }
                Err(e) => e,
            };

            if self.config.failure_policy == FailurePolicy::Abort || !e.is_per_record() {
                error!(record, error = %e, "sink aborted");
                return Err(e);
            }

            warn!(record, error = %e, "skipping record");
            report.failures.push(RecordFailure { record, error: e });

            if let Some(max_failures) = self.config.max_failures {
                if report.failures.len() > max_failures {
                    error!(
                        failed = report.failures.len(),
                        max_failures, "failure budget exhausted"
                    );
                    return Err(SinkError::TooManyFailures {
                        failed: report.failures.len(),
                        max_failures,
                    });
                }
            }
        }

        self.flush()?;
        info!(
            written = report.written,
            failed = report.failures.len(),
            "sink run complete"
        );
        Ok(report)
    }

    /// [`write_all`](Self::write_all) for infallible sources.
    pub fn write_tuples<I>(&mut self, tuples: I) -> Result<SinkReport>
    where
        I: IntoIterator<Item = Tuple>,
    {
        self.write_all(tuples.into_iter().map(Ok))
    }

    /// Flush the store.
    ///
    /// # Errors
    ///
    /// [`SinkError::Flush`] wrapping the store error; the pending count is
    /// kept so a later flush covers the same records.
    pub fn flush(&mut self) -> Result<()> {
        if let Err(e) = self.graph.flush() {
            return Err(SinkError::Flush {
                pending: self.unflushed,
                source: Box::new(e),
            });
        }
        self.stats.flushes += 1;
        self.unflushed = 0;
        Ok(())
    }

    /// Flush and hand back the store.
    pub fn complete(mut self) -> Result<G> {
        self.flush()?;
        info!(
            written = self.stats.written,
            failed = self.stats.failed,
            "sink completed"
        );
        Ok(self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexSpec;
    use crate::memory::MemoryGraph;
    use crate::scheme::{NodeScheme, RelationshipScheme};
    use crate::store::{EntityRef, NodeId, RelationshipId};
    use crate::tuple::Fields;
    use crate::value::Value;

    /// Counts flushes and fails every call once `broken` is set; only
    /// flushes fail when `flush_broken` is set.
    #[derive(Default)]
    struct FlakyGraph {
        inner: MemoryGraph,
        flushes: usize,
        broken: bool,
        flush_broken: bool,
    }

    impl FlakyGraph {
        fn check(&self) -> Result<()> {
            if self.broken {
                Err(SinkError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl GraphStore for FlakyGraph {
        fn create_node(&mut self) -> Result<NodeId> {
            self.check()?;
            self.inner.create_node()
        }

        fn set_property(&mut self, entity: EntityRef, key: &str, value: &Value) -> Result<()> {
            self.check()?;
            self.inner.set_property(entity, key, value)
        }

        fn add_to_index(
            &mut self,
            index: &str,
            node: NodeId,
            key: &str,
            value: &Value,
        ) -> Result<()> {
            self.check()?;
            self.inner.add_to_index(index, node, key, value)
        }

        fn lookup_index(&mut self, index: &str, key: &str, value: &Value) -> Result<Vec<NodeId>> {
            self.check()?;
            self.inner.lookup_index(index, key, value)
        }

        fn create_relationship(
            &mut self,
            from: NodeId,
            to: NodeId,
            rel_type: &str,
        ) -> Result<RelationshipId> {
            self.check()?;
            self.inner.create_relationship(from, to, rel_type)
        }

        fn flush(&mut self) -> Result<()> {
            self.check()?;
            if self.flush_broken {
                return Err(SinkError::Transport("commit rejected".to_string()));
            }
            self.flushes += 1;
            Ok(())
        }
    }

    fn names(names: &[&str]) -> Vec<Tuple> {
        names
            .iter()
            .map(|n| Tuple::from_pairs([("name", *n)]).unwrap())
            .collect()
    }

    fn relationship_sink(graph: MemoryGraph) -> GraphSink<MemoryGraph, RelationshipScheme> {
        let scheme = RelationshipScheme::new(
            Fields::new(["from", "to", "type"]).unwrap(),
            IndexSpec::on("users", ["name"]).unwrap(),
            IndexSpec::on("users", ["name"]).unwrap(),
        )
        .unwrap();
        GraphSink::new(graph, scheme)
    }

    fn edge(from: &str, to: &str) -> Tuple {
        Tuple::from_pairs([("from", from), ("to", to), ("type", "KNOWS")]).unwrap()
    }

    fn users_graph(users: &[&str]) -> MemoryGraph {
        let mut sink = GraphSink::new(
            MemoryGraph::new(),
            NodeScheme::indexed(IndexSpec::on("users", ["name"]).unwrap()),
        );
        sink.write_tuples(names(users)).unwrap();
        sink.complete().unwrap()
    }

    #[test]
    fn test_write_counts() {
        let mut sink = GraphSink::new(MemoryGraph::new(), NodeScheme::new());
        sink.write(&names(&["a"])[0]).unwrap();
        sink.write(&names(&["b"])[0]).unwrap();
        assert_eq!(sink.stats().written, 2);
        assert_eq!(sink.graph().node_count(), 2);
    }

    #[test]
    fn test_runtime_scheme_variant() {
        let scheme: GraphScheme = NodeScheme::new().into();
        let mut sink: GraphSink<MemoryGraph> = GraphSink::new(MemoryGraph::new(), scheme);
        assert!(matches!(
            sink.write(&names(&["a"])[0]).unwrap(),
            Written::Node(_)
        ));
    }

    #[test]
    fn test_flushes_at_batch_boundaries() {
        let mut sink = GraphSink::new(FlakyGraph::default(), NodeScheme::new())
            .with_config(SinkConfig::new().with_batch_size(2));
        sink.write_tuples(names(&["a", "b", "c", "d", "e"])).unwrap();

        // two full batches plus the final flush
        assert_eq!(sink.graph().flushes, 3);
        assert_eq!(sink.stats().flushes, 3);
    }

    #[test]
    fn test_zero_batch_size_flushes_on_completion_only() {
        let mut sink = GraphSink::new(FlakyGraph::default(), NodeScheme::new())
            .with_config(SinkConfig::new().with_batch_size(0));
        for t in names(&["a", "b", "c"]) {
            sink.write(&t).unwrap();
        }
        assert_eq!(sink.graph().flushes, 0);
        let graph = sink.complete().unwrap();
        assert_eq!(graph.flushes, 1);
    }

    #[test]
    fn test_abort_policy_stops_at_first_failure() {
        let mut sink = relationship_sink(users_graph(&["a", "b"]));
        let err = sink
            .write_tuples(vec![edge("a", "b"), edge("a", "zz"), edge("b", "a")])
            .unwrap_err();

        assert!(matches!(err, SinkError::Resolution { .. }));
        assert_eq!(sink.graph().relationship_count(), 1);
        assert_eq!(sink.stats().failed, 1);
    }

    #[test]
    fn test_skip_policy_attributes_failures() {
        let mut sink = relationship_sink(users_graph(&["a", "b"]))
            .with_config(SinkConfig::new().skipping_failures());
        let report = sink
            .write_tuples(vec![edge("a", "b"), edge("a", "zz"), edge("b", "a")])
            .unwrap();

        assert_eq!(report.written, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].record, 1);
        assert!(matches!(
            report.failures[0].error,
            SinkError::Resolution { .. }
        ));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_skip_policy_counts_source_errors() {
        let mut sink = GraphSink::new(MemoryGraph::new(), NodeScheme::new())
            .with_config(SinkConfig::new().skipping_failures());
        let source = vec![
            Ok(names(&["a"]).remove(0)),
            Err(SinkError::InvalidRecord("record 2 has 3 values".to_string())),
            Ok(names(&["b"]).remove(0)),
        ];
        let report = sink.write_all(source).unwrap();
        assert_eq!(report.written, 2);
        assert_eq!(report.failures[0].record, 1);
        assert_eq!(sink.stats().failed, 1);
    }

    #[test]
    fn test_skip_policy_failure_budget() {
        let mut sink = relationship_sink(users_graph(&["a"]))
            .with_config(SinkConfig::new().skipping_failures().with_max_failures(1));
        let err = sink
            .write_tuples(vec![edge("a", "x"), edge("a", "y"), edge("a", "a")])
            .unwrap_err();
        assert!(matches!(
            err,
            SinkError::TooManyFailures {
                failed: 2,
                max_failures: 1
            }
        ));
    }

    #[test]
    fn test_transport_errors_abort_even_when_skipping() {
        let graph = FlakyGraph {
            broken: true,
            ..Default::default()
        };
        let mut sink = GraphSink::new(graph, NodeScheme::new())
            .with_config(SinkConfig::new().skipping_failures());
        let err = sink.write_tuples(names(&["a", "b"])).unwrap_err();
        assert!(matches!(err, SinkError::Transport(_)));
        assert_eq!(sink.stats().failed, 1);
    }

    #[test]
    fn test_failed_batch_flush_is_not_a_record_failure() {
        let graph = FlakyGraph {
            flush_broken: true,
            ..Default::default()
        };
        let mut sink = GraphSink::new(graph, NodeScheme::new())
            .with_config(SinkConfig::new().with_batch_size(1));

        let err = sink.write(&names(&["a"])[0]).unwrap_err();
        assert!(matches!(
            err,
            SinkError::Flush { pending: 1, ref source }
                if matches!(**source, SinkError::Transport(_))
        ));
        assert!(!err.is_per_record());
        assert_eq!(sink.stats().written, 1);
        assert_eq!(sink.stats().failed, 0);
        assert_eq!(sink.stats().flushes, 0);
        assert_eq!(sink.graph().inner.node_count(), 1);
    }

    #[test]
    fn test_failed_batch_flush_aborts_skipping_run() {
        let graph = FlakyGraph {
            flush_broken: true,
            ..Default::default()
        };
        let mut sink = GraphSink::new(graph, NodeScheme::new())
            .with_config(SinkConfig::new().skipping_failures().with_batch_size(2));

        let err = sink.write_tuples(names(&["a", "b", "c"])).unwrap_err();
        assert!(matches!(err, SinkError::Flush { pending: 2, .. }));
        assert_eq!(sink.stats().written, 2);
        assert_eq!(sink.stats().failed, 0);
        assert_eq!(sink.graph().inner.node_count(), 2);
    }

    #[test]
    fn test_pending_count_survives_failed_flush() {
        let graph = FlakyGraph {
            flush_broken: true,
            ..Default::default()
        };
        let mut sink = GraphSink::new(graph, NodeScheme::new())
            .with_config(SinkConfig::new().with_batch_size(0));
        sink.write(&names(&["a"])[0]).unwrap();
        sink.write(&names(&["b"])[0]).unwrap();

        assert!(matches!(sink.flush(), Err(SinkError::Flush { pending: 2, .. })));
        sink.graph_mut().flush_broken = false;
        sink.flush().unwrap();
        assert_eq!(sink.graph().flushes, 1);
    }

    /// Fails its first read, then serves `data`.
    struct FailingReader {
        failed: bool,
        data: std::io::Cursor<&'static [u8]>,
    }

    impl std::io::Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
            }
            std::io::Read::read(&mut self.data, buf)
        }
    }

    #[test]
    fn test_source_read_failure_aborts_skipping_run() {
        let reader = FailingReader {
            failed: false,
            data: std::io::Cursor::new(b"a\nb\n"),
        };
        let source = crate::source::DelimitedSource::from_reader(
            reader,
            Fields::new(["name"]).unwrap(),
            Default::default(),
        );
        let mut sink = GraphSink::new(MemoryGraph::new(), NodeScheme::new())
            .with_config(SinkConfig::new().skipping_failures());

        let err = sink.write_all(source).unwrap_err();
        assert!(matches!(err, SinkError::Csv(ref e) if e.is_io_error()));
        assert_eq!(sink.stats().failed, 1);
    }

    #[test]
    fn test_sink_through_borrowed_store() {
        let mut graph = MemoryGraph::new();
        {
            let mut sink = GraphSink::new(&mut graph, NodeScheme::new());
            sink.write_tuples(names(&["a"])).unwrap();
        }
        assert_eq!(graph.node_count(), 1);
    }
}
