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

//! Structural union of canonical documents.
//!
//! Production runs may produce one document per machine; merging unions them
//! at every level of the hierarchy. All inputs must carry the same
//! generation-log version tag.

use crate::document::{CanonicalDocument, MachineNode, ThreadEntry};
use crate::error::{CoreError, Result};
use crate::generation::GenerationLog;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Counters describing what a merge had to reconcile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Documents merged.
    pub documents: usize,
    /// Machines present in more than one input with differing metadata.
    pub metadata_conflicts: usize,
    /// Test results present in more than one input (later input wins).
    pub overlapping_tests: usize,
}

/// Merges labelled documents into one.
///
/// Every input must carry the version tag of the first; a mismatch is fatal.
/// The result keeps that tag and is stamped with the current date.
pub fn merge_documents(inputs: Vec<(PathBuf, CanonicalDocument)>) -> Result<(CanonicalDocument, MergeStats)> {
    let mut inputs = inputs.into_iter();
    let (first_label, first) = inputs.next().ok_or(CoreError::EmptyMerge)?;
    debug!(label = %first_label.display(), "merge base");

    let version = first.generation_log.version_info.clone();
    let mut merged = CanonicalDocument {
        generation_log: GenerationLog::with_version(version.clone()),
        machines: first.machines,
    };
    let mut stats = MergeStats {
        documents: 1,
        ..Default::default()
    };

    for (label, document) in inputs {
        if !merged.generation_log.is_compatible(&document.generation_log) {
            return Err(CoreError::VersionMismatch {
                expected: version,
                found: document.generation_log.version_info,
                path: label,
            });
        }
        absorb(&mut merged, document, &mut stats);
        stats.documents += 1;
    }

    Ok((merged, stats))
}

/// Unions `other` into `target` without version checks.
pub fn absorb(target: &mut CanonicalDocument, other: CanonicalDocument, stats: &mut MergeStats) {
    for (name, incoming) in other.machines {
        match target.machines.get_mut(&name) {
            None => {
                target.machines.insert(name, incoming);
            }
            Some(existing) => union_machine(&name, existing, incoming, stats),
        }
    }
}

fn union_machine(name: &str, existing: &mut MachineNode, incoming: MachineNode, stats: &mut MergeStats) {
    if !existing.same_metadata(&incoming) {
        warn!(machine = name, "machine metadata differs between merge inputs, keeping the first");
        stats.metadata_conflicts += 1;
    }

    for (os, categories) in incoming.os {
        let os_node = existing.os.entry(os).or_default();
        for (category, benchmarks) in categories {
            let category_node = os_node.entry(category).or_default();
            for (benchmark, threads) in benchmarks {
                let bench_node = category_node.entry(benchmark).or_default();
                for (thread, entry) in threads {
                    match bench_node.get_mut(&thread) {
                        None => {
                            bench_node.insert(thread, entry);
                        }
                        Some(current) => union_thread(current, entry, stats),
                    }
                }
            }
        }
    }
}

fn union_thread(current: &mut ThreadEntry, incoming: ThreadEntry, stats: &mut MergeStats) {
    current.perf_stat.fill_from(&incoming.perf_stat);
    for (key, test) in incoming.test_name {
        if current.test_name.insert(key, test).is_some() {
            stats.overlapping_tests += 1;
        }
    }
}
