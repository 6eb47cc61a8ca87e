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

//! Benchmark-directory discovery.

use crate::error::AggregateError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

static ARTIFACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)-thread(?:\.log|\.json|_perf_summary\.json|_freq_start\.txt|_freq_end\.txt)$")
        .expect("valid artifact pattern")
});

/// Thread count encoded in an artifact file name, if it is one.
pub fn artifact_thread(file_name: &str) -> Option<u32> {
    let caps = ARTIFACT_RE.captures(file_name)?;
    caps[1].parse().ok().filter(|n| *n > 0)
}

/// A directory holding per-thread artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkDir {
    /// Directory path.
    pub path: PathBuf,
    /// Thread counts with at least one artifact, ascending.
    pub threads: BTreeSet<u32>,
}

/// Finds every benchmark directory under `root`, sorted by path.
pub fn discover(root: &Path) -> Result<Vec<BenchmarkDir>, AggregateError> {
    let mut found: BTreeMap<PathBuf, BTreeSet<u32>> = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| AggregateError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(thread) = entry.file_name().to_str().and_then(artifact_thread) else {
            continue;
        };
        if let Some(parent) = entry.path().parent() {
            found.entry(parent.to_path_buf()).or_default().insert(thread);
        }
    }

    debug!(root = %root.display(), benchmarks = found.len(), "discovered benchmark directories");
    Ok(found
        .into_iter()
        .map(|(path, threads)| BenchmarkDir { path, threads })
        .collect())
}
