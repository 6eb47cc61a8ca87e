// Dweve Cloudbench - Cross-cloud benchmark aggregation and analytics
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

//! The aggregation pass.
//!
//! For each search root: discover benchmark directories, resolve each one,
//! extract every thread count, and insert the results into a per-root
//! document. Per-root documents are then unioned into the output. A
//! directory or thread that fails is skipped with a warning; only an
//! inaccessible root aborts the pass.

use crate::discover::{discover, BenchmarkDir};
use crate::error::{AggregateError, ExtractError, ResolveError};
use crate::extractor::{Extraction, PatternExtractor};
use crate::overrides::OverrideRegistry;
use crate::resolver::{HierarchyResolver, Resolution, ResolveMethod};
use crate::strategy::Provenance;
use cloudbench_core::merge::{absorb, MergeStats};
use cloudbench_core::{CanonicalDocument, GenerationLog, MachineLut};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for [`Aggregator`].
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Minimum number of benchmark directories in a root to process them
    /// in parallel. Default: 10
    pub parallel_threshold: usize,

    /// Maximum size in bytes of any artifact read.
    /// Default: `CLOUDBENCH_MAX_FILE_SIZE` or 1 GiB
    pub max_file_size: u64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 10,
            max_file_size: cloudbench_core::io::max_file_size(),
        }
    }
}

/// Counters and warnings of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    /// Search roots processed.
    pub roots: usize,
    /// Benchmark directories discovered.
    pub benchmarks_found: usize,
    /// Benchmark directories skipped because they could not be resolved.
    pub benchmarks_skipped: usize,
    /// Thread entries in the output.
    pub thread_entries: usize,
    /// Test results in the output.
    pub tests: usize,
    /// Thread counts with artifacts but no extractable result.
    pub empty_threads: usize,
    /// Thread counts whose artifacts could not be read or parsed.
    pub failed_threads: usize,
    /// Thread entries recovered from the perf summary alone.
    pub recovered_threads: usize,
    /// Machines placed by path layout because the LUT does not know them.
    pub unknown_machines: BTreeSet<String>,
    /// Warning messages, in encounter order.
    pub warnings: Vec<String>,
}

impl AggregateSummary {
    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }
}

/// Result of a pass.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// The canonical document.
    pub document: CanonicalDocument,
    /// What happened along the way.
    pub summary: AggregateSummary,
}

enum DirOutcome {
    Skipped(PathBuf, ResolveError),
    Resolved {
        dir: PathBuf,
        resolution: Resolution,
        threads: Vec<(u32, Result<Option<Extraction>, ExtractError>)>,
    },
}

/// Builds a canonical document from results trees.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    lut: &'a MachineLut,
    overrides: OverrideRegistry,
    config: AggregateConfig,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator with the built-in overrides and default config.
    pub fn new(lut: &'a MachineLut) -> Self {
        Self::with_config(lut, AggregateConfig::default())
    }

    /// Creates an aggregator with the built-in overrides.
    pub fn with_config(lut: &'a MachineLut, config: AggregateConfig) -> Self {
        Self {
            lut,
            overrides: OverrideRegistry::builtin(),
            config,
        }
    }

    /// Replaces the override registry.
    pub fn with_overrides(mut self, overrides: OverrideRegistry) -> Self {
        self.overrides = overrides;
        self
    }

    /// Aggregates every search root into one document.
    pub fn aggregate(&self, roots: &[PathBuf]) -> Result<Aggregation, AggregateError> {
        let header = GenerationLog::current();
        let mut document = CanonicalDocument::new(header.clone());
        let mut summary = AggregateSummary::default();
        let mut merge_stats = MergeStats::default();
        let mut seen = BTreeSet::new();

        for root in roots {
            let canonical = fs::canonicalize(root).map_err(|e| AggregateError::RootNotFound {
                path: root.clone(),
                message: e.to_string(),
            })?;
            if !seen.insert(canonical.clone()) {
                summary.warn(format!("search root '{}' given more than once", root.display()));
                continue;
            }
            summary.roots += 1;

            let root_doc = self.aggregate_root(&canonical, header.clone(), &mut summary)?;
            absorb(&mut document, root_doc, &mut merge_stats);
        }

        if merge_stats.overlapping_tests > 0 {
            summary.warn(format!(
                "{} test results appear under more than one search root; the later root wins",
                merge_stats.overlapping_tests
            ));
        }
        if merge_stats.metadata_conflicts > 0 {
            summary.warn(format!(
                "{} machines have conflicting metadata across search roots",
                merge_stats.metadata_conflicts
            ));
        }

        summary.thread_entries = document.thread_entry_count();
        summary.tests = document.test_count();
        info!(
            roots = summary.roots,
            benchmarks = summary.benchmarks_found,
            skipped = summary.benchmarks_skipped,
            thread_entries = summary.thread_entries,
            tests = summary.tests,
            "aggregation complete"
        );
        Ok(Aggregation { document, summary })
    }

    fn aggregate_root(
        &self,
        root: &Path,
        header: GenerationLog,
        summary: &mut AggregateSummary,
    ) -> Result<CanonicalDocument, AggregateError> {
        let dirs = discover(root)?;
        summary.benchmarks_found += dirs.len();
        info!(root = %root.display(), benchmarks = dirs.len(), "scanning search root");

        let outcomes: Vec<DirOutcome> = if dirs.len() < self.config.parallel_threshold {
            dirs.iter().map(|d| self.process(root, d)).collect()
        } else {
            dirs.par_iter().map(|d| self.process(root, d)).collect()
        };

        let mut document = CanonicalDocument::new(header);
        for outcome in outcomes {
            match outcome {
                DirOutcome::Skipped(dir, error) => {
                    summary.benchmarks_skipped += 1;
                    summary.warn(format!("skipping '{}': {error}", dir.display()));
                }
                DirOutcome::Resolved {
                    dir,
                    resolution,
                    threads,
                } => {
                    if resolution.method == ResolveMethod::Fallback
                        && summary.unknown_machines.insert(resolution.location.machine.clone())
                    {
                        summary.warn(format!(
                            "machine '{}' is not in the lookup table; its metadata is unknown",
                            resolution.location.machine
                        ));
                    }
                    for (thread, result) in threads {
                        match result {
                            Ok(Some(extraction)) => {
                                if extraction.provenance == Provenance::PerfSummaryOnly {
                                    summary.recovered_threads += 1;
                                }
                                let replaced = document.insert_thread(
                                    &resolution.record,
                                    &resolution.location,
                                    thread,
                                    extraction.entry,
                                );
                                if replaced.is_some() {
                                    summary.warn(format!(
                                        "'{}' duplicates {} at {thread} threads; keeping the later directory",
                                        dir.display(),
                                        resolution.location
                                    ));
                                }
                            }
                            Ok(None) => {
                                summary.empty_threads += 1;
                                debug!(dir = %dir.display(), thread, "no result for thread count");
                            }
                            Err(error) => {
                                summary.failed_threads += 1;
                                summary.warn(format!(
                                    "skipping '{}' at {thread} threads: {error}",
                                    dir.display()
                                ));
                            }
                        }
                    }
                }
            }
        }
        Ok(document)
    }

    fn process(&self, root: &Path, dir: &BenchmarkDir) -> DirOutcome {
        let resolver = HierarchyResolver::new(self.lut);
        let resolution = match resolver.resolve(root, &dir.path) {
            Ok(resolution) => resolution,
            Err(error) => return DirOutcome::Skipped(dir.path.clone(), error),
        };

        let extractor = PatternExtractor::new(&self.overrides, self.config.max_file_size);
        let threads = dir
            .threads
            .iter()
            .map(|&thread| (thread, extractor.extract(&dir.path, thread)))
            .collect();

        DirOutcome::Resolved {
            dir: dir.path.clone(),
            resolution,
            threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudbench_test::fixtures::{logs, ResultsTree};

    #[test]
    fn test_default_config() {
        let config = AggregateConfig::default();
        assert_eq!(config.parallel_threshold, 10);
        assert!(config.max_file_size > 0);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let lut = MachineLut::builtin();
        let err = Aggregator::new(&lut)
            .aggregate(&[PathBuf::from("/nonexistent/cloudbench")])
            .unwrap_err();
        assert!(matches!(err, AggregateError::RootNotFound { .. }));
    }

    #[test]
    fn test_unresolvable_dir_is_skipped() {
        let tree = ResultsTree::new();
        tree.bench("m8g.xlarge/Ubuntu/Processor/coremark-1.0.1")
            .log(4, "Average: 1 Iterations/Sec\n");
        tree.bench("loose/bench-1.0").log(4, "Average: 2 Iterations/Sec\n");

        let lut = MachineLut::builtin();
        let result = Aggregator::new(&lut)
            .aggregate(&[tree.root().to_path_buf()])
            .unwrap();
        assert_eq!(result.summary.benchmarks_found, 2);
        assert_eq!(result.summary.benchmarks_skipped, 1);
        assert_eq!(result.summary.thread_entries, 1);
        assert_eq!(result.summary.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_root_counted_once() {
        let tree = ResultsTree::new();
        tree.bench("m8g.xlarge/Ubuntu/Processor/stream-1.3.4")
            .log(4, logs::STREAM);
        let lut = MachineLut::builtin();
        let root = tree.root().to_path_buf();
        let result = Aggregator::new(&lut)
            .aggregate(&[root.clone(), root])
            .unwrap();
        assert_eq!(result.summary.roots, 1);
        assert_eq!(result.summary.tests, 4);
    }
}
